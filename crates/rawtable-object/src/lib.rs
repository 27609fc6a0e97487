//! rawtable object layer
//!
//! Typed key-value tables over any `rawtable_core::TableBackend`.
//!
//! # Architecture
//!
//! The crate has two layers:
//! - `object::raw_table`: the raw table engine: lifecycle, CRUD, default
//!   and upsert policies, value wrapping. Unchecked and generic.
//! - [`object`]: the trusted caller: allocates handles per transaction and
//!   exposes [`Table<K, V>`]. The raw engine is private to this module tree,
//!   so the boundary is enforced by the compiler rather than at runtime.
//!
//! ```ignore
//! let mut store = ObjectStore::new(MemoryStorage::default(), tx_hash);
//! let mut balances: Table<String, u64> = Table::new(&mut store)?;
//! balances.add(&mut store, &"alice".to_string(), 100)?;
//! let change_set = store.commit(next_tx_hash)?;
//! ```

pub mod object;

pub use object::{ObjectStore, Table, TxContext};
