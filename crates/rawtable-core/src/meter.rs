//! Per-transaction gas accounting.

use crate::error::{StoreError, StoreResult};

/// Accumulates gas for the current transaction against an optional limit.
#[derive(Debug, Clone, Default)]
pub struct GasMeter {
    limit: Option<u64>,
    used: u64,
}

impl GasMeter {
    pub fn new(limit: Option<u64>) -> Self {
        Self { limit, used: 0 }
    }

    /// Charge `amount`. On failure nothing is recorded.
    pub fn charge(&mut self, amount: u64) -> StoreResult<()> {
        if let Some(remaining) = self.remaining() {
            if amount > remaining {
                return Err(StoreError::OutOfGas { required: amount, remaining });
            }
        }
        self.used = self.used.saturating_add(amount);
        Ok(())
    }

    pub fn used(&self) -> u64 {
        self.used
    }

    /// Gas left before the limit, or `None` when unlimited.
    pub fn remaining(&self) -> Option<u64> {
        self.limit.map(|limit| limit.saturating_sub(self.used))
    }

    /// Start a new transaction.
    pub fn reset(&mut self) {
        self.used = 0;
    }
}
