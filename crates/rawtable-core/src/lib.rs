//! rawtable Core — Authenticated Table Backend
//!
//! The storage side of a deterministic global state store: tables keyed by
//! opaque handles, each holding type-erased resources under serialized keys,
//! with a per-table metadata record (state root + live entry count).
//!
//! # Architecture
//!
//! - **Contract**: [`TableBackend`]: create/drop tables, box CRUD, counts, metadata
//! - **Reference backend**: [`MemoryStorage`]: RAM hash tables, lazy Merkle roots
//! - **Per transaction**: gas metering and a net [`StateChangeSet`] at commit
//!
//! This crate knows nothing about the typed table API built on top of it.
//! The raw table engine and its trusted caller live in `rawtable-object`.

pub mod backend;
pub mod changes;
pub mod config;
pub mod digest;
pub mod error;
pub mod memory;
pub mod meter;
pub mod object_id;
pub mod resource;

// Re-export key types for convenience
pub use backend::{TableBackend, TableInfo};
pub use changes::{Op, StateChangeSet, TableChange};
pub use config::{Config, GasSchedule};
pub use digest::H256;
pub use error::{
    StoreError, StoreResult, E_ALREADY_EXISTS, E_DUPLICATE_OPERATION, E_NOT_EMPTY, E_NOT_FOUND,
    E_TABLE_ALREADY_EXISTS,
};
pub use memory::MemoryStorage;
pub use meter::GasMeter;
pub use object_id::ObjectId;
pub use resource::Resource;
