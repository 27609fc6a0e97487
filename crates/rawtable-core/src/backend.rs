//! The backing storage engine contract.
//!
//! A backend maps `(table handle, serialized key)` to one stored resource
//! and maintains a [`TableInfo`] per live handle. Box operations are
//! generic over the key type and the resource type; callers store plain
//! values by wrapping them in a resource first.

use serde::{Deserialize, Serialize};

use crate::changes::StateChangeSet;
use crate::digest::H256;
use crate::error::StoreResult;
use crate::object_id::ObjectId;
use crate::resource::Resource;

/// Per-table metadata record
///
/// Produced and updated by the backend; callers only read it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableInfo {
    state_root: H256,
    size: u64,
}

impl TableInfo {
    pub fn new(state_root: H256, size: u64) -> Self {
        Self { state_root, size }
    }

    /// Authenticated digest of the table's entries.
    pub fn state_root(&self) -> H256 {
        self.state_root
    }

    /// Number of live entries.
    pub fn size(&self) -> u64 {
        self.size
    }
}

/// Authenticated, table-scoped key-value storage.
///
/// Every entry operation fails with `TableNotFound` when `handle` has no
/// metadata record. No operation performs a partial mutation on failure.
pub trait TableBackend {
    /// Allocate empty storage and a metadata record for `handle`.
    ///
    /// Fails with `TableAlreadyExists` if `handle` is live.
    fn new_table(&mut self, handle: ObjectId) -> StoreResult<()>;

    /// Drop `handle` with all entries and metadata. Unknown handles are ignored.
    fn drop_table(&mut self, handle: ObjectId) -> StoreResult<()>;

    /// Insert `resource` under `key` if absent, else `KeyAlreadyExists`.
    fn add_box<K, R>(&mut self, handle: ObjectId, key: &K, resource: R) -> StoreResult<()>
    where
        K: Serialize + ?Sized,
        R: Resource;

    /// Insert `resource` under `key` and hand back an exclusive view of it.
    ///
    /// Costs the same as `add_box` followed by `borrow_box_mut`, charged
    /// once up front, so running out of gas leaves the table untouched.
    fn add_box_mut<K, R>(&mut self, handle: ObjectId, key: &K, resource: R) -> StoreResult<&mut R>
    where
        K: Serialize + ?Sized,
        R: Resource;

    /// Shared view of the resource under `key`, else `KeyNotFound`.
    fn borrow_box<K, R>(&self, handle: ObjectId, key: &K) -> StoreResult<&R>
    where
        K: Serialize + ?Sized,
        R: Resource;

    /// Exclusive view of the resource under `key`, else `KeyNotFound`.
    ///
    /// The table's state root is recomputed after the view is released.
    fn borrow_box_mut<K, R>(&mut self, handle: ObjectId, key: &K) -> StoreResult<&mut R>
    where
        K: Serialize + ?Sized,
        R: Resource;

    /// Take the resource under `key` out of the table, else `KeyNotFound`.
    fn remove_box<K, R>(&mut self, handle: ObjectId, key: &K) -> StoreResult<R>
    where
        K: Serialize + ?Sized,
        R: Resource;

    fn contains_box<K>(&self, handle: ObjectId, key: &K) -> StoreResult<bool>
    where
        K: Serialize + ?Sized;

    /// Number of live entries under `handle`.
    fn box_length(&self, handle: ObjectId) -> StoreResult<u64>;

    fn table_info(&self, handle: ObjectId) -> StoreResult<TableInfo>;

    /// Finish the current transaction and report what it changed.
    ///
    /// On error the transaction stays open with its pending changes and gas.
    fn commit(&mut self) -> StoreResult<StateChangeSet>;

    /// Gas consumed by the current transaction.
    fn gas_used(&self) -> u64;
}
