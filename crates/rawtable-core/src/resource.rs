//! Storable resources and the type-erased slot the backend keeps them in.
//!
//! Backends hold values of many unrelated types in one map, so each entry
//! is erased behind [`ErasedResource`] and downcast on typed access. Only
//! types that opt in through [`Resource`] can be stored at all; plain
//! values have to be wrapped by the caller first.

use std::any::Any;

use serde::Serialize;

use crate::error::StoreResult;

/// Marker for types the backend accepts as individually tracked entries.
pub trait Resource: Serialize + Any + Send {}

/// Object-safe view of a stored resource.
pub trait ErasedResource: Send {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
    /// Canonical bytes used for digests and change sets.
    fn encode(&self) -> StoreResult<Vec<u8>>;
    fn type_name(&self) -> &'static str;
}

impl<R: Resource> ErasedResource for R {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }

    fn encode(&self) -> StoreResult<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<R>()
    }
}

/// Serialize a table key.
pub fn encode_key<K: Serialize + ?Sized>(key: &K) -> StoreResult<Vec<u8>> {
    Ok(bincode::serialize(key)?)
}
