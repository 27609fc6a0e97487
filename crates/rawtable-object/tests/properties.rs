//! Property tests: size and membership against a model map.

use std::collections::BTreeMap;

use proptest::prelude::*;
use rawtable_core::{Config, MemoryStorage, H256};
use rawtable_object::{ObjectStore, Table};

#[derive(Debug, Clone)]
enum Action {
    Add(u16, u32),
    Upsert(u16, u32),
    Remove(u16),
    BorrowWithDefault(u16),
    BorrowMutWithDefault(u16, u32),
}

fn action() -> impl Strategy<Value = Action> {
    let key = 0u16..32;
    prop_oneof![
        (key.clone(), any::<u32>()).prop_map(|(k, v)| Action::Add(k, v)),
        (key.clone(), any::<u32>()).prop_map(|(k, v)| Action::Upsert(k, v)),
        key.clone().prop_map(Action::Remove),
        key.clone().prop_map(Action::BorrowWithDefault),
        (key, any::<u32>()).prop_map(|(k, v)| Action::BorrowMutWithDefault(k, v)),
    ]
}

proptest! {
    #[test]
    fn size_matches_model(actions in prop::collection::vec(action(), 0..64)) {
        let backend = MemoryStorage::open(Config::unmetered()).unwrap();
        let mut store = ObjectStore::new(backend, H256::hash(b"prop"));
        let mut table: Table<u16, u32> = Table::new(&mut store).unwrap();
        let mut model: BTreeMap<u16, u32> = BTreeMap::new();

        for action in actions {
            match action {
                Action::Add(k, v) => {
                    let result = table.add(&mut store, &k, v);
                    if model.contains_key(&k) {
                        prop_assert_eq!(result.unwrap_err().abort_code(), Some(1));
                    } else {
                        prop_assert!(result.is_ok());
                        model.insert(k, v);
                    }
                }
                Action::Upsert(k, v) => {
                    table.upsert(&mut store, &k, v).unwrap();
                    model.insert(k, v);
                }
                Action::Remove(k) => {
                    let result = table.remove(&mut store, &k);
                    match model.remove(&k) {
                        Some(v) => {
                            prop_assert_eq!(result.unwrap(), v);
                        }
                        None => {
                            prop_assert_eq!(result.unwrap_err().abort_code(), Some(2));
                        }
                    }
                }
                Action::BorrowWithDefault(k) => {
                    let default = u32::MAX;
                    let got = *table.borrow_with_default(&store, &k, &default).unwrap();
                    prop_assert_eq!(got, model.get(&k).copied().unwrap_or(default));
                }
                Action::BorrowMutWithDefault(k, v) => {
                    let got = *table.borrow_mut_with_default(&mut store, &k, v).unwrap();
                    prop_assert_eq!(got, *model.entry(k).or_insert(v));
                }
            }

            prop_assert_eq!(table.length(&store).unwrap(), model.len() as u64);
            prop_assert_eq!(table.is_empty(&store).unwrap(), model.is_empty());
        }

        for (k, v) in &model {
            prop_assert!(table.contains(&store, k).unwrap());
            prop_assert_eq!(table.borrow(&store, k).unwrap(), v);
        }
    }
}
