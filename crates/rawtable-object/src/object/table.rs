//! Typed tables.
//!
//! A `Table<K, V>` can only be obtained from [`Table::new`], which allocates
//! a fresh handle, so callers cannot point it at someone else's storage. It
//! is not `Clone`: destroying it consumes the only owner.
//!
//! A table does not remember which [`ObjectStore`] created it. Every call
//! must pass that same store. Another store either lacks the handle and
//! fails with `TableNotFound`, or, if it was seeded with the same
//! transaction hash, holds an unrelated table under it.

use std::fmt;
use std::marker::PhantomData;

use rawtable_core::{ObjectId, StoreResult, TableBackend, TableInfo};
use serde::Serialize;

use super::{raw_table, ObjectStore};

/// Key-value table with keys `K` and values `V`.
///
/// All operations go through the [`ObjectStore`] passed to [`Table::new`];
/// errors are the backend's and carry their stable abort codes unchanged.
/// After any error the enclosing transaction should be aborted.
pub struct Table<K, V> {
    handle: ObjectId,
    _marker: PhantomData<fn() -> (K, V)>,
}

impl<K, V> Table<K, V>
where
    K: Serialize,
    V: Serialize + Send + 'static,
{
    /// Create an empty table with a fresh handle.
    pub fn new<B: TableBackend>(store: &mut ObjectStore<B>) -> StoreResult<Self> {
        let handle = store.fresh_object_id();
        raw_table::create(&mut store.backend, handle)?;
        Ok(Self {
            handle,
            _marker: PhantomData,
        })
    }

    pub fn handle(&self) -> ObjectId {
        self.handle
    }

    /// Add `val` under `key`; fails with code 1 if `key` is present.
    pub fn add<B>(&mut self, store: &mut ObjectStore<B>, key: &K, val: V) -> StoreResult<()>
    where
        B: TableBackend,
    {
        raw_table::add(&mut store.backend, self.handle, key, val)
    }

    /// Value under `key`; fails with code 2 if absent.
    pub fn borrow<'a, B>(&self, store: &'a ObjectStore<B>, key: &K) -> StoreResult<&'a V>
    where
        B: TableBackend,
    {
        raw_table::borrow(&store.backend, self.handle, key)
    }

    /// Value under `key`, or `default` if absent. Never inserts.
    pub fn borrow_with_default<'a, B: TableBackend>(
        &self,
        store: &'a ObjectStore<B>,
        key: &K,
        default: &'a V,
    ) -> StoreResult<&'a V> {
        raw_table::borrow_with_default(&store.backend, self.handle, key, default)
    }

    /// Mutable value under `key`; fails with code 2 if absent.
    pub fn borrow_mut<'a, B: TableBackend>(
        &mut self,
        store: &'a mut ObjectStore<B>,
        key: &K,
    ) -> StoreResult<&'a mut V> {
        raw_table::borrow_mut(&mut store.backend, self.handle, key)
    }

    /// Mutable value under `key`, inserting `default` first if absent.
    pub fn borrow_mut_with_default<'a, B: TableBackend>(
        &mut self,
        store: &'a mut ObjectStore<B>,
        key: &K,
        default: V,
    ) -> StoreResult<&'a mut V> {
        raw_table::borrow_mut_with_default(&mut store.backend, self.handle, key, default)
    }

    /// Insert or overwrite the value under `key`.
    pub fn upsert<B>(&mut self, store: &mut ObjectStore<B>, key: &K, val: V) -> StoreResult<()>
    where
        B: TableBackend,
    {
        raw_table::upsert(&mut store.backend, self.handle, key, val)
    }

    /// Remove and return the value under `key`; fails with code 2 if absent.
    pub fn remove<B>(&mut self, store: &mut ObjectStore<B>, key: &K) -> StoreResult<V>
    where
        B: TableBackend,
    {
        raw_table::remove(&mut store.backend, self.handle, key)
    }

    pub fn contains<B: TableBackend>(&self, store: &ObjectStore<B>, key: &K) -> StoreResult<bool> {
        raw_table::contains(&store.backend, self.handle, key)
    }

    /// Number of entries.
    pub fn length<B: TableBackend>(&self, store: &ObjectStore<B>) -> StoreResult<u64> {
        raw_table::length(&store.backend, self.handle)
    }

    pub fn is_empty<B: TableBackend>(&self, store: &ObjectStore<B>) -> StoreResult<bool> {
        raw_table::is_empty(&store.backend, self.handle)
    }

    /// State root and size of this table.
    pub fn info<B: TableBackend>(&self, store: &ObjectStore<B>) -> StoreResult<TableInfo> {
        raw_table::info(&store.backend, self.handle)
    }

    /// Destroy an empty table; fails with code 4 otherwise.
    pub fn destroy_empty<B: TableBackend>(self, store: &mut ObjectStore<B>) -> StoreResult<()> {
        raw_table::destroy_empty(&mut store.backend, self.handle)
    }

    /// Destroy the table together with every entry in it.
    pub fn drop_unchecked<B: TableBackend>(self, store: &mut ObjectStore<B>) -> StoreResult<()> {
        raw_table::drop_unchecked(&mut store.backend, self.handle)
    }
}

impl<K, V> fmt::Debug for Table<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Table").field("handle", &self.handle).finish()
    }
}
