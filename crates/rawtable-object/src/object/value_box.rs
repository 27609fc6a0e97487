//! Single-field wrapper that turns any value into a storable resource.

use rawtable_core::Resource;
use serde::Serialize;

/// Holds one table value. Exactly one exists per live (handle, key).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(in crate::object) struct ValueBox<V> {
    val: V,
}

impl<V> ValueBox<V> {
    pub(in crate::object) fn new(val: V) -> Self {
        Self { val }
    }

    pub(in crate::object) fn get(&self) -> &V {
        &self.val
    }

    pub(in crate::object) fn get_mut(&mut self) -> &mut V {
        &mut self.val
    }

    pub(in crate::object) fn into_inner(self) -> V {
        self.val
    }
}

impl<V: Serialize + Send + 'static> Resource for ValueBox<V> {}
