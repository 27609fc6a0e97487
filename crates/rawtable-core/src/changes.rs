//! Transaction change sets.
//!
//! The tracker records every (table, key) a transaction touches together
//! with whether that key existed when it was first touched. At commit the
//! backend turns that into net `Op`s against the committed state, reading
//! the current value bytes so in-place mutations are captured too. The
//! tracker is drained only after the change set has been built.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::backend::TableInfo;
use crate::object_id::ObjectId;

/// Net effect of a transaction on one key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Op {
    /// Key was absent before the transaction
    New(Vec<u8>),
    /// Key existed before and still exists
    Modify(Vec<u8>),
    /// Key existed before and is gone
    Delete,
}

/// Changes to one table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableChange {
    /// Metadata record after the transaction
    pub info: TableInfo,
    /// Serialized key -> net op, ordered by key bytes
    pub entries: BTreeMap<Vec<u8>, Op>,
}

/// Everything a transaction changed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateChangeSet {
    pub new_tables: BTreeSet<ObjectId>,
    pub removed_tables: BTreeSet<ObjectId>,
    pub changes: BTreeMap<ObjectId, TableChange>,
}

impl StateChangeSet {
    pub fn is_empty(&self) -> bool {
        self.new_tables.is_empty() && self.removed_tables.is_empty() && self.changes.is_empty()
    }
}

/// Tracks which tables and keys the current transaction touched.
#[derive(Debug, Default)]
pub struct ChangeTracker {
    new_tables: BTreeSet<ObjectId>,
    removed_tables: BTreeSet<ObjectId>,
    /// Every handle dropped in this transaction, new or not
    dropped: BTreeSet<ObjectId>,
    /// handle -> key -> existed at first touch
    touched: BTreeMap<ObjectId, BTreeMap<Vec<u8>, bool>>,
}

impl ChangeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a touch of `key`. Only the first touch per transaction counts.
    pub fn touch(&mut self, handle: ObjectId, key: &[u8], existed: bool) {
        let keys = self.touched.entry(handle).or_default();
        if !keys.contains_key(key) {
            keys.insert(key.to_vec(), existed);
        }
    }

    pub fn table_created(&mut self, handle: ObjectId) {
        self.new_tables.insert(handle);
    }

    /// Record that `handle` was dropped along with every key under it.
    pub fn table_dropped(&mut self, handle: ObjectId) {
        if !self.new_tables.remove(&handle) {
            self.removed_tables.insert(handle);
        }
        self.dropped.insert(handle);
        self.touched.remove(&handle);
    }

    /// Whether `handle` was dropped earlier in this transaction.
    pub fn was_dropped(&self, handle: &ObjectId) -> bool {
        self.dropped.contains(handle)
    }

    /// handle -> key -> existed at first touch, for every key touched so far.
    pub fn touched(&self) -> &BTreeMap<ObjectId, BTreeMap<Vec<u8>, bool>> {
        &self.touched
    }

    /// Number of keys touched so far.
    pub fn touched_count(&self) -> usize {
        self.touched.values().map(BTreeMap::len).sum()
    }

    /// Drain the tracker, leaving it ready for the next transaction.
    pub fn take(&mut self) -> TrackedChanges {
        let taken = std::mem::take(self);
        TrackedChanges {
            new_tables: taken.new_tables,
            removed_tables: taken.removed_tables,
        }
    }
}

/// Drained tracker state, consumed by a backend at commit.
#[derive(Debug)]
pub struct TrackedChanges {
    pub new_tables: BTreeSet<ObjectId>,
    pub removed_tables: BTreeSet<ObjectId>,
}

/// Net op for a key given its state at first touch and its current bytes.
pub fn net_op(existed: bool, current: Option<Vec<u8>>) -> Option<Op> {
    match (existed, current) {
        (false, Some(bytes)) => Some(Op::New(bytes)),
        (true, Some(bytes)) => Some(Op::Modify(bytes)),
        (true, None) => Some(Op::Delete),
        (false, None) => None,
    }
}
