//! Object layer — the only caller of the raw table engine.
//!
//! `ObjectStore` owns the backend and the current transaction context, and
//! allocates table handles deterministically from that context. `Table<K, V>`
//! is the typed, unforgeable owner of one handle. The raw engine in
//! [`raw_table`] is visible to this module tree and nowhere else, so every
//! table operation in the crate goes through the checks made here.

mod raw_table;
mod table;
mod value_box;

pub use table::Table;

use rawtable_core::{ObjectId, StateChangeSet, StoreResult, TableBackend, H256};

/// Identity of the transaction currently executing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxContext {
    tx_hash: H256,
    ids_created: u64,
}

impl TxContext {
    pub fn new(tx_hash: H256) -> Self {
        Self { tx_hash, ids_created: 0 }
    }

    pub fn tx_hash(&self) -> H256 {
        self.tx_hash
    }

    /// Objects allocated so far in this transaction.
    pub fn ids_created(&self) -> u64 {
        self.ids_created
    }

    /// Next handle for this transaction; never repeats within it.
    fn fresh_object_id(&mut self) -> ObjectId {
        let id = ObjectId::derive(&self.tx_hash, self.ids_created);
        self.ids_created += 1;
        id
    }
}

/// Backend plus transaction context.
pub struct ObjectStore<B: TableBackend> {
    backend: B,
    ctx: TxContext,
}

impl<B: TableBackend> ObjectStore<B> {
    /// Wrap `backend` and start executing transaction `tx_hash`.
    pub fn new(backend: B, tx_hash: H256) -> Self {
        Self {
            backend,
            ctx: TxContext::new(tx_hash),
        }
    }

    pub fn tx_context(&self) -> &TxContext {
        &self.ctx
    }

    /// Gas consumed by the current transaction.
    pub fn gas_used(&self) -> u64 {
        self.backend.gas_used()
    }

    /// Finish the current transaction and begin `next_tx_hash`.
    pub fn commit(&mut self, next_tx_hash: H256) -> StoreResult<StateChangeSet> {
        let change_set = self.backend.commit()?;
        tracing::debug!(
            tx_hash = %self.ctx.tx_hash,
            ids_created = self.ctx.ids_created,
            next = %next_tx_hash,
            "object store committed"
        );
        self.ctx = TxContext::new(next_tx_hash);
        Ok(change_set)
    }

    fn fresh_object_id(&mut self) -> ObjectId {
        self.ctx.fresh_object_id()
    }
}

impl<B: TableBackend + std::fmt::Debug> std::fmt::Debug for ObjectStore<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectStore")
            .field("backend", &self.backend)
            .field("ctx", &self.ctx)
            .finish()
    }
}
