//! In-memory backend: the reference `TableBackend`.
//!
//! MemoryStorage keeps one hash table of type-erased resources per handle,
//! tracks what the current transaction touched, meters gas, and computes
//! state roots lazily.
//!
//! **Mutation path**: check, charge, record the touch, mutate, invalidate the root
//! **Read path**: check, charge, downcast
//! **Commit**: settle roots, encode net ops, then drain the tracker and reset the meter

use std::collections::BTreeMap;

use hashbrown::HashMap;
use parking_lot::Mutex;
use serde::Serialize;

use crate::backend::{TableBackend, TableInfo};
use crate::changes::{net_op, ChangeTracker, StateChangeSet, TableChange};
use crate::config::{Config, OpCost};
use crate::digest::{leaf_hash, merkle_root, H256};
use crate::error::{StoreError, StoreResult};
use crate::meter::GasMeter;
use crate::object_id::ObjectId;
use crate::resource::{encode_key, ErasedResource, Resource};

/// Storage for one handle
struct TableData {
    entries: HashMap<Vec<u8>, Box<dyn ErasedResource>>,
    /// Cached state root; `None` after any mutation
    root: Mutex<Option<H256>>,
}

impl TableData {
    fn new() -> Self {
        Self {
            entries: HashMap::new(),
            root: Mutex::new(Some(H256::ZERO)),
        }
    }

    fn invalidate(&mut self) {
        *self.root.get_mut() = None;
    }

    fn len(&self) -> u64 {
        self.entries.len() as u64
    }

    fn state_root(&self) -> StoreResult<H256> {
        let mut cached = self.root.lock();
        if let Some(root) = *cached {
            return Ok(root);
        }

        let mut sorted: Vec<(&Vec<u8>, &Box<dyn ErasedResource>)> = self.entries.iter().collect();
        sorted.sort_by(|(a, _), (b, _)| a.cmp(b));
        let leaves = sorted
            .into_iter()
            .map(|(key, slot)| -> StoreResult<H256> { Ok(leaf_hash(key, &slot.encode()?)) })
            .collect::<StoreResult<Vec<H256>>>()?;

        let root = merkle_root(leaves);
        *cached = Some(root);
        Ok(root)
    }

    /// Check that `key` holds an `R`. Returns whether it is present at all.
    fn probe<R: Resource>(&self, handle: ObjectId, key: &[u8]) -> StoreResult<bool> {
        match self.entries.get(key) {
            None => Ok(false),
            Some(slot) if slot.as_any().is::<R>() => Ok(true),
            Some(slot) => Err(type_mismatch::<R>(handle, key, slot.type_name())),
        }
    }
}

fn type_mismatch<R: Resource>(handle: ObjectId, key: &[u8], found: &'static str) -> StoreError {
    StoreError::TypeMismatch {
        handle,
        key: key.to_vec(),
        expected: std::any::type_name::<R>(),
        found,
    }
}

/// Reference backend holding every table in RAM.
///
/// Intended for tests, tooling and single-process hosts. Rolling back a
/// failed transaction means discarding this value together with its
/// uncommitted changes.
pub struct MemoryStorage {
    tables: HashMap<ObjectId, TableData>,
    tracker: ChangeTracker,
    meter: Mutex<GasMeter>,
    config: Config,
}

impl MemoryStorage {
    /// Create an empty store after validating `config`.
    pub fn open(config: Config) -> StoreResult<Self> {
        config
            .validate()
            .map_err(|reason| StoreError::InvalidConfig { reason })?;
        Ok(Self::with_config(config))
    }

    fn with_config(config: Config) -> Self {
        Self {
            tables: HashMap::new(),
            tracker: ChangeTracker::new(),
            meter: Mutex::new(GasMeter::new(config.gas_limit)),
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Number of live tables.
    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    /// Keys touched by the current transaction so far.
    pub fn pending_count(&self) -> usize {
        self.tracker.touched_count()
    }

    /// Root over every live table: a Merkle root of `(handle, table root)`
    /// leaves ordered by handle.
    pub fn global_state_root(&self) -> StoreResult<H256> {
        let mut handles: Vec<&ObjectId> = self.tables.keys().collect();
        handles.sort();
        let mut leaves = Vec::with_capacity(handles.len());
        for handle in handles {
            let root = self.table(*handle)?.state_root()?;
            leaves.push(leaf_hash(handle.as_bytes(), root.as_bytes()));
        }
        Ok(merkle_root(leaves))
    }

    fn table(&self, handle: ObjectId) -> StoreResult<&TableData> {
        self.tables
            .get(&handle)
            .ok_or(StoreError::TableNotFound { handle })
    }

    fn table_mut(&mut self, handle: ObjectId) -> StoreResult<&mut TableData> {
        self.tables
            .get_mut(&handle)
            .ok_or(StoreError::TableNotFound { handle })
    }

    fn encode_key<K: Serialize + ?Sized>(&self, key: &K) -> StoreResult<Vec<u8>> {
        let key = encode_key(key)?;
        if key.len() > self.config.max_key_size {
            return Err(StoreError::OversizedKey {
                size: key.len(),
                max_size: self.config.max_key_size,
            });
        }
        Ok(key)
    }

    fn charge(&self, amount: u64) -> StoreResult<()> {
        self.meter.lock().charge(amount)
    }

    /// One box operation plus the lookup it implies.
    fn box_cost(&self, op: OpCost, key_len: usize, found: bool) -> u64 {
        op.cost(key_len)
            .saturating_add(self.config.gas.common.cost(key_len, found))
    }

    fn charge_box(&self, op: OpCost, key_len: usize, found: bool) -> StoreResult<()> {
        self.charge(self.box_cost(op, key_len, found))
    }

    /// Check, charge and insert a new entry. With `then_borrow` the charge
    /// also covers an exclusive borrow of the inserted entry.
    fn insert_box<K, R>(
        &mut self,
        handle: ObjectId,
        key: &K,
        resource: R,
        then_borrow: bool,
    ) -> StoreResult<&mut R>
    where
        K: Serialize + ?Sized,
        R: Resource,
    {
        let key = self.encode_key(key)?;
        let found = self.table(handle)?.entries.contains_key(&key);
        // Stored values must always encode
        resource.encode()?;

        let mut amount = self.box_cost(self.config.gas.add_box, key.len(), found);
        if then_borrow && !found {
            let borrow = self.box_cost(self.config.gas.borrow_box, key.len(), true);
            amount = amount.saturating_add(borrow);
        }
        self.charge(amount)?;
        if found {
            return Err(StoreError::KeyAlreadyExists { handle, key });
        }

        tracing::trace!(%handle, key_len = key.len(), then_borrow, "add_box");
        self.tracker.touch(handle, &key, false);
        let table = self.table_mut(handle)?;
        table.invalidate();
        table.entries.insert(key.clone(), Box::new(resource));
        match table.entries.get_mut(&key) {
            Some(slot) => {
                let found_type = slot.type_name();
                slot.as_any_mut()
                    .downcast_mut::<R>()
                    .ok_or_else(|| type_mismatch::<R>(handle, &key, found_type))
            }
            None => Err(StoreError::KeyNotFound { handle, key }),
        }
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::with_config(Config::default())
    }
}

impl std::fmt::Debug for MemoryStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let meter = self.meter.lock();
        f.debug_struct("MemoryStorage")
            .field("tables", &self.tables.len())
            .field("pending", &self.tracker.touched_count())
            .field("gas_used", &meter.used())
            .field("gas_remaining", &meter.remaining())
            .finish()
    }
}

impl TableBackend for MemoryStorage {
    fn new_table(&mut self, handle: ObjectId) -> StoreResult<()> {
        if self.tables.contains_key(&handle) {
            return Err(StoreError::TableAlreadyExists { handle });
        }
        if self.tracker.was_dropped(&handle) {
            return Err(StoreError::DuplicateOperation { handle });
        }

        self.tables.insert(handle, TableData::new());
        self.tracker.table_created(handle);
        tracing::debug!(%handle, "table created");
        Ok(())
    }

    fn drop_table(&mut self, handle: ObjectId) -> StoreResult<()> {
        self.charge(self.config.gas.drop_unchecked_box)?;

        match self.tables.remove(&handle) {
            Some(table) => {
                if !table.entries.is_empty() {
                    tracing::warn!(%handle, size = table.len(), "dropping non-empty table");
                }
                self.tracker.table_dropped(handle);
                tracing::debug!(%handle, "table dropped");
            }
            None => {
                tracing::debug!(%handle, "drop of unknown table ignored");
            }
        }
        Ok(())
    }

    fn add_box<K, R>(&mut self, handle: ObjectId, key: &K, resource: R) -> StoreResult<()>
    where
        K: Serialize + ?Sized,
        R: Resource,
    {
        self.insert_box(handle, key, resource, false).map(|_| ())
    }

    fn add_box_mut<K, R>(&mut self, handle: ObjectId, key: &K, resource: R) -> StoreResult<&mut R>
    where
        K: Serialize + ?Sized,
        R: Resource,
    {
        self.insert_box(handle, key, resource, true)
    }

    fn borrow_box<K, R>(&self, handle: ObjectId, key: &K) -> StoreResult<&R>
    where
        K: Serialize + ?Sized,
        R: Resource,
    {
        let key = self.encode_key(key)?;
        let table = self.table(handle)?;
        let found = table.probe::<R>(handle, &key)?;
        self.charge_box(self.config.gas.borrow_box, key.len(), found)?;

        tracing::trace!(%handle, key_len = key.len(), found, "borrow_box");
        table
            .entries
            .get(&key)
            .and_then(|slot| slot.as_any().downcast_ref::<R>())
            .ok_or(StoreError::KeyNotFound { handle, key })
    }

    fn borrow_box_mut<K, R>(&mut self, handle: ObjectId, key: &K) -> StoreResult<&mut R>
    where
        K: Serialize + ?Sized,
        R: Resource,
    {
        let key = self.encode_key(key)?;
        let found = self.table(handle)?.probe::<R>(handle, &key)?;
        self.charge_box(self.config.gas.borrow_box, key.len(), found)?;
        if !found {
            return Err(StoreError::KeyNotFound { handle, key });
        }

        tracing::trace!(%handle, key_len = key.len(), "borrow_box_mut");
        self.tracker.touch(handle, &key, true);
        let table = self.table_mut(handle)?;
        table.invalidate();
        match table.entries.get_mut(&key) {
            Some(slot) => {
                let found_type = slot.type_name();
                slot.as_any_mut()
                    .downcast_mut::<R>()
                    .ok_or_else(|| type_mismatch::<R>(handle, &key, found_type))
            }
            None => Err(StoreError::KeyNotFound { handle, key }),
        }
    }

    fn remove_box<K, R>(&mut self, handle: ObjectId, key: &K) -> StoreResult<R>
    where
        K: Serialize + ?Sized,
        R: Resource,
    {
        let key = self.encode_key(key)?;
        let found = self.table(handle)?.probe::<R>(handle, &key)?;
        self.charge_box(self.config.gas.remove_box, key.len(), found)?;
        if !found {
            return Err(StoreError::KeyNotFound { handle, key });
        }

        tracing::trace!(%handle, key_len = key.len(), "remove_box");
        self.tracker.touch(handle, &key, true);
        let table = self.table_mut(handle)?;
        let slot = table
            .entries
            .remove(&key)
            .ok_or_else(|| StoreError::KeyNotFound { handle, key: key.clone() })?;
        table.invalidate();

        let found_type = slot.type_name();
        slot.into_any()
            .downcast::<R>()
            .map(|boxed| *boxed)
            .map_err(|_| type_mismatch::<R>(handle, &key, found_type))
    }

    fn contains_box<K>(&self, handle: ObjectId, key: &K) -> StoreResult<bool>
    where
        K: Serialize + ?Sized,
    {
        let key = self.encode_key(key)?;
        let found = self.table(handle)?.entries.contains_key(&key);
        self.charge_box(self.config.gas.contains_box, key.len(), found)?;
        Ok(found)
    }

    fn box_length(&self, handle: ObjectId) -> StoreResult<u64> {
        let len = self.table(handle)?.len();
        self.charge(self.config.gas.box_length)?;
        Ok(len)
    }

    fn table_info(&self, handle: ObjectId) -> StoreResult<TableInfo> {
        let table = self.table(handle)?;
        Ok(TableInfo::new(table.state_root()?, table.len()))
    }

    fn commit(&mut self) -> StoreResult<StateChangeSet> {
        let mut changes = BTreeMap::new();
        for (handle, keys) in self.tracker.touched() {
            let table = self.table(*handle)?;
            let mut entries = BTreeMap::new();
            for (key, existed) in keys {
                let current = match table.entries.get(key) {
                    Some(slot) => Some(slot.encode()?),
                    None => None,
                };
                if let Some(op) = net_op(*existed, current) {
                    entries.insert(key.clone(), op);
                }
            }
            if !entries.is_empty() {
                let info = TableInfo::new(table.state_root()?, table.len());
                changes.insert(*handle, TableChange { info, entries });
            }
        }

        // Drain only once nothing else can fail
        let tracked = self.tracker.take();
        let change_set = StateChangeSet {
            new_tables: tracked.new_tables,
            removed_tables: tracked.removed_tables,
            changes,
        };

        let gas_used = {
            let mut meter = self.meter.lock();
            let used = meter.used();
            meter.reset();
            used
        };
        tracing::debug!(
            new_tables = change_set.new_tables.len(),
            removed_tables = change_set.removed_tables.len(),
            changed_tables = change_set.changes.len(),
            gas_used,
            "transaction committed"
        );
        Ok(change_set)
    }

    fn gas_used(&self) -> u64 {
        self.meter.lock().used()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::changes::Op;

    #[derive(Serialize, Debug, PartialEq)]
    struct Slot<V>(V);

    impl<V: Serialize + Send + 'static> Resource for Slot<V> {}

    /// Serializes only while `broken` is false.
    #[derive(Debug)]
    struct Flaky {
        value: u8,
        broken: bool,
    }

    impl Serialize for Flaky {
        fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            if self.broken {
                return Err(<S::Error as serde::ser::Error>::custom("unencodable"));
            }
            serializer.serialize_u8(self.value)
        }
    }

    impl Resource for Flaky {}

    fn id(n: u8) -> ObjectId {
        ObjectId::new([n; 32])
    }

    fn test_store() -> MemoryStorage {
        let mut store = MemoryStorage::default();
        store.new_table(id(1)).unwrap();
        store
    }

    #[test]
    fn test_open_empty() {
        let store = MemoryStorage::open(Config::unmetered()).unwrap();
        assert_eq!(store.table_count(), 0);
        assert_eq!(store.global_state_root().unwrap(), H256::ZERO);
        assert_eq!(store.gas_used(), 0);
    }

    #[test]
    fn test_open_rejects_invalid_config() {
        let config = Config::default().with_gas_limit(0);
        assert!(matches!(MemoryStorage::open(config), Err(StoreError::InvalidConfig { .. })));
    }

    #[test]
    fn test_new_table_twice() {
        let mut store = test_store();
        let err = store.new_table(id(1)).unwrap_err();
        assert_eq!(err, StoreError::TableAlreadyExists { handle: id(1) });
        assert_eq!(store.table_count(), 1);
    }

    #[test]
    fn test_add_borrow() {
        let mut store = test_store();
        store.add_box(id(1), "k", Slot(7u64)).unwrap();
        assert_eq!(store.borrow_box::<_, Slot<u64>>(id(1), "k").unwrap(), &Slot(7));
        assert_eq!(store.box_length(id(1)).unwrap(), 1);
        assert!(store.contains_box(id(1), "k").unwrap());
    }

    #[test]
    fn test_add_existing_key() {
        let mut store = test_store();
        store.add_box(id(1), "k", Slot(1u64)).unwrap();
        let root = store.table_info(id(1)).unwrap().state_root();

        let err = store.add_box(id(1), "k", Slot(2u64)).unwrap_err();
        assert_eq!(err.abort_code(), Some(1));
        assert_eq!(store.borrow_box::<_, Slot<u64>>(id(1), "k").unwrap(), &Slot(1));
        assert_eq!(store.table_info(id(1)).unwrap(), TableInfo::new(root, 1));
    }

    #[test]
    fn test_missing_key_errors() {
        let mut store = test_store();
        let err = store.borrow_box::<_, Slot<u64>>(id(1), "nope").unwrap_err();
        assert_eq!(err.abort_code(), Some(2));
        assert!(store.borrow_box_mut::<_, Slot<u64>>(id(1), "nope").is_err());
        assert!(store.remove_box::<_, Slot<u64>>(id(1), "nope").is_err());
        assert_eq!(store.pending_count(), 0);
    }

    #[test]
    fn test_missing_table() {
        let mut store = MemoryStorage::default();
        let err = store.add_box(id(9), "k", Slot(1u8)).unwrap_err();
        assert_eq!(err, StoreError::TableNotFound { handle: id(9) });
        assert!(store.box_length(id(9)).is_err());
        assert!(store.table_info(id(9)).is_err());
    }

    #[test]
    fn test_type_mismatch_does_not_mutate() {
        let mut store = test_store();
        store.add_box(id(1), "k", Slot(1u64)).unwrap();
        store.commit().unwrap();

        let err = store.remove_box::<_, Slot<String>>(id(1), "k").unwrap_err();
        assert!(matches!(err, StoreError::TypeMismatch { .. }));
        assert_eq!(err.abort_code(), None);
        assert!(store.borrow_box_mut::<_, Slot<u8>>(id(1), "k").is_err());
        assert_eq!(store.box_length(id(1)).unwrap(), 1);
        assert!(store.commit().unwrap().is_empty());
    }

    #[test]
    fn test_borrow_mut_changes_root() {
        let mut store = test_store();
        store.add_box(id(1), "k", Slot(1u64)).unwrap();
        let before = store.table_info(id(1)).unwrap();

        store.borrow_box_mut::<_, Slot<u64>>(id(1), "k").unwrap().0 = 2;
        let after = store.table_info(id(1)).unwrap();
        assert_ne!(before.state_root(), after.state_root());
        assert_eq!(before.size(), after.size());
    }

    #[test]
    fn test_root_is_insertion_order_independent() {
        let mut a = test_store();
        a.add_box(id(1), "x", Slot(1u8)).unwrap();
        a.add_box(id(1), "y", Slot(2u8)).unwrap();

        let mut b = test_store();
        b.add_box(id(1), "y", Slot(2u8)).unwrap();
        b.add_box(id(1), "x", Slot(1u8)).unwrap();

        assert_eq!(a.table_info(id(1)).unwrap(), b.table_info(id(1)).unwrap());
        assert_eq!(a.global_state_root().unwrap(), b.global_state_root().unwrap());
    }

    #[test]
    fn test_remove_restores_empty_root() {
        let mut store = test_store();
        store.add_box(id(1), "k", Slot(5u32)).unwrap();
        let slot: Slot<u32> = store.remove_box(id(1), "k").unwrap();
        assert_eq!(slot, Slot(5));
        assert_eq!(store.table_info(id(1)).unwrap(), TableInfo::new(H256::ZERO, 0));
    }

    #[test]
    fn test_drop_table_unchecked() {
        let mut store = test_store();
        store.add_box(id(1), "k", Slot(1u8)).unwrap();
        store.drop_table(id(1)).unwrap();
        assert_eq!(store.table_count(), 0);
        // Unknown handles are ignored
        store.drop_table(id(2)).unwrap();
    }

    #[test]
    fn test_recreate_dropped_handle_is_duplicate() {
        let mut store = test_store();
        store.drop_table(id(1)).unwrap();
        let err = store.new_table(id(1)).unwrap_err();
        assert_eq!(err.abort_code(), Some(3));

        store.commit().unwrap();
        store.new_table(id(1)).unwrap();
    }

    #[test]
    fn test_oversized_key() {
        let mut config = Config::unmetered();
        config.max_key_size = 8;
        let mut store = MemoryStorage::open(config).unwrap();
        store.new_table(id(1)).unwrap();
        let err = store.add_box(id(1), "a long key", Slot(0u8)).unwrap_err();
        assert!(matches!(err, StoreError::OversizedKey { max_size: 8, .. }));
    }

    #[test]
    fn test_gas_charges() {
        let mut store = test_store();
        // "k" encodes as 9 bytes: u64 length prefix + 1 byte
        store.add_box(id(1), "k", Slot(1u8)).unwrap();
        assert_eq!(store.gas_used(), 500 + 90 + 5);

        store.contains_box(id(1), "k").unwrap();
        assert_eq!(store.gas_used(), 595 + 500 + 90 + 1000 + 90);

        store.commit().unwrap();
        assert_eq!(store.gas_used(), 0);
    }

    #[test]
    fn test_out_of_gas_does_not_mutate() {
        let mut store = MemoryStorage::open(Config::metered().with_gas_limit(600)).unwrap();
        store.new_table(id(1)).unwrap();
        store.add_box(id(1), "k", Slot(1u8)).unwrap();

        let err = store.add_box(id(1), "j", Slot(2u8)).unwrap_err();
        assert!(matches!(err, StoreError::OutOfGas { .. }));
        assert_eq!(store.gas_used(), 595);
        assert_eq!(store.tables[&id(1)].len(), 1);
        assert_eq!(store.pending_count(), 1);
    }

    #[test]
    fn test_add_box_mut_charges_add_and_borrow() {
        let mut store = test_store();
        store.add_box_mut(id(1), "k", Slot(1u8)).unwrap().0 = 2;
        assert_eq!(store.gas_used(), (500 + 90 + 5) + (500 + 90 + 1000 + 90));
        assert_eq!(store.borrow_box::<_, Slot<u8>>(id(1), "k").unwrap(), &Slot(2));

        let err = store.add_box_mut(id(1), "k", Slot(3u8)).unwrap_err();
        assert_eq!(err.abort_code(), Some(1));
    }

    #[test]
    fn test_add_box_mut_out_of_gas_does_not_insert() {
        // Enough for a plain add, not for add plus borrow
        let mut store = MemoryStorage::open(Config::metered().with_gas_limit(1_000)).unwrap();
        store.new_table(id(1)).unwrap();

        let err = store.add_box_mut(id(1), "k", Slot(1u8)).unwrap_err();
        assert_eq!(err, StoreError::OutOfGas { required: 595 + 1680, remaining: 1_000 });
        assert_eq!(store.gas_used(), 0);
        assert!(store.tables[&id(1)].entries.is_empty());
        assert_eq!(store.pending_count(), 0);
    }

    #[test]
    fn test_add_rejects_unencodable_value() {
        let mut store = test_store();
        let err = store
            .add_box(id(1), "k", Flaky { value: 1, broken: true })
            .unwrap_err();
        assert!(matches!(err, StoreError::Encoding { .. }));
        assert_eq!(store.gas_used(), 0);
        assert_eq!(store.pending_count(), 0);
        assert_eq!(store.table_info(id(1)).unwrap(), TableInfo::new(H256::ZERO, 0));
    }

    #[test]
    fn test_failed_commit_keeps_transaction_open() {
        let mut store = test_store();
        store.add_box(id(1), "k", Flaky { value: 7, broken: false }).unwrap();
        store.borrow_box_mut::<_, Flaky>(id(1), "k").unwrap().broken = true;
        let gas = store.gas_used();

        let err = store.commit().unwrap_err();
        assert!(matches!(err, StoreError::Encoding { .. }));
        assert_eq!(store.pending_count(), 1);
        assert_eq!(store.gas_used(), gas);

        store.borrow_box_mut::<_, Flaky>(id(1), "k").unwrap().broken = false;
        let change_set = store.commit().unwrap();
        assert!(change_set.new_tables.contains(&id(1)));
        assert_eq!(
            change_set.changes[&id(1)].entries[&encode_key("k").unwrap()],
            Op::New(vec![7])
        );
        assert_eq!(store.gas_used(), 0);
    }

    #[test]
    fn test_commit_reports_net_ops() {
        let mut store = test_store();
        store.add_box(id(1), "keep", Slot(1u8)).unwrap();
        store.add_box(id(1), "gone", Slot(2u8)).unwrap();
        store.add_box(id(1), "edit", Slot(3u8)).unwrap();
        let first = store.commit().unwrap();
        assert!(first.new_tables.contains(&id(1)));
        assert_eq!(first.changes[&id(1)].entries.len(), 3);

        store.remove_box::<_, Slot<u8>>(id(1), "gone").unwrap();
        store.borrow_box_mut::<_, Slot<u8>>(id(1), "edit").unwrap().0 = 30;
        store.add_box(id(1), "temp", Slot(4u8)).unwrap();
        store.remove_box::<_, Slot<u8>>(id(1), "temp").unwrap();
        let second = store.commit().unwrap();

        let change = &second.changes[&id(1)];
        assert_eq!(change.entries.len(), 2);
        assert_eq!(change.entries[&encode_key("gone").unwrap()], Op::Delete);
        assert_eq!(change.entries[&encode_key("edit").unwrap()], Op::Modify(vec![30]));
        assert_eq!(change.info, store.table_info(id(1)).unwrap());
        assert!(second.new_tables.is_empty());
    }

    #[test]
    fn test_commit_reports_removed_tables() {
        let mut store = test_store();
        store.new_table(id(2)).unwrap();
        store.commit().unwrap();

        store.drop_table(id(2)).unwrap();
        store.new_table(id(3)).unwrap();
        store.drop_table(id(3)).unwrap();
        let change_set = store.commit().unwrap();
        assert_eq!(change_set.removed_tables.into_iter().collect::<Vec<_>>(), vec![id(2)]);
        assert!(change_set.new_tables.is_empty());
    }
}
