//! Configuration management for rawtable backends
//!
//! Provides the gas schedule charged by every box operation, presets for
//! metered and unmetered execution, and key size limits.

/// Scale factor applied to every gas constant in the standard schedule.
pub const MUL: u64 = 1;

/// Cost of one box operation: a fixed base plus a charge per serialized key byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpCost {
    pub base: u64,
    pub per_byte_serialized: u64,
}

impl OpCost {
    pub const fn new(base: u64, per_byte_serialized: u64) -> Self {
        Self { base, per_byte_serialized }
    }

    /// Gas for an operation on a key of `key_len` serialized bytes.
    pub fn cost(&self, key_len: usize) -> u64 {
        self.base
            .saturating_add(self.per_byte_serialized.saturating_mul(key_len as u64))
    }
}

/// Cost of resolving a key in the backing store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadCost {
    /// Charged when the key resolves to an entry
    pub load_base: u64,
    /// Charged per serialized key byte when the key resolves
    pub load_per_byte: u64,
    /// Charged instead of the above when the key is absent
    pub load_failure: u64,
}

impl LoadCost {
    /// Gas for one lookup of a `key_len`-byte key that did or did not hit.
    pub fn cost(&self, key_len: usize, found: bool) -> u64 {
        if found {
            self.load_base
                .saturating_add(self.load_per_byte.saturating_mul(key_len as u64))
        } else {
            self.load_failure
        }
    }
}

/// Gas charged by table operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GasSchedule {
    pub common: LoadCost,
    pub add_box: OpCost,
    pub borrow_box: OpCost,
    pub contains_box: OpCost,
    pub remove_box: OpCost,
    pub drop_unchecked_box: u64,
    pub box_length: u64,
}

impl GasSchedule {
    /// Default on-chain schedule
    pub fn standard() -> Self {
        Self {
            common: LoadCost {
                load_base: 1000 * MUL,
                load_per_byte: 10 * MUL,
                load_failure: 5 * MUL,
            },
            add_box: OpCost::new(500 * MUL, 10 * MUL),
            borrow_box: OpCost::new(500 * MUL, 10 * MUL),
            contains_box: OpCost::new(500 * MUL, 10 * MUL),
            remove_box: OpCost::new(500 * MUL, 10 * MUL),
            drop_unchecked_box: 100 * MUL,
            box_length: 100 * MUL,
        }
    }

    /// Everything free
    pub fn zero() -> Self {
        Self {
            common: LoadCost { load_base: 0, load_per_byte: 0, load_failure: 0 },
            add_box: OpCost::new(0, 0),
            borrow_box: OpCost::new(0, 0),
            contains_box: OpCost::new(0, 0),
            remove_box: OpCost::new(0, 0),
            drop_unchecked_box: 0,
            box_length: 0,
        }
    }
}

/// Backend configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Gas charged per operation
    pub gas: GasSchedule,
    /// Per-transaction gas limit; `None` means unlimited
    pub gas_limit: Option<u64>,
    /// Maximum serialized key size in bytes
    pub max_key_size: usize,
}

impl Config {
    /// Standard schedule, unlimited budget
    pub fn metered() -> Self {
        Self {
            gas: GasSchedule::standard(),
            gas_limit: None,
            max_key_size: 1024,
        }
    }

    /// No charges at all (tooling, genesis, tests)
    pub fn unmetered() -> Self {
        Self {
            gas: GasSchedule::zero(),
            gas_limit: None,
            max_key_size: 1024,
        }
    }

    /// Same configuration with a per-transaction gas limit.
    pub fn with_gas_limit(mut self, limit: u64) -> Self {
        self.gas_limit = Some(limit);
        self
    }

    /// Validate all configuration parameters
    pub fn validate(&self) -> Result<(), String> {
        if self.gas_limit == Some(0) {
            return Err("gas_limit must be > 0 when set".into());
        }
        if self.max_key_size == 0 || self.max_key_size > 64 * 1024 {
            return Err("max_key_size must be in [1, 64KB]".into());
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self { Self::metered() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_presets_valid() {
        assert!(Config::metered().validate().is_ok());
        assert!(Config::unmetered().validate().is_ok());
        assert!(Config::metered().with_gas_limit(10_000).validate().is_ok());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut config = Config::default();
        config.max_key_size = 0;
        assert!(config.validate().is_err());

        let config = Config::default().with_gas_limit(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_op_cost_scales_with_key() {
        let schedule = GasSchedule::standard();
        assert_eq!(schedule.add_box.cost(0), 500);
        assert_eq!(schedule.add_box.cost(4), 540);
        assert_eq!(schedule.common.cost(4, true), 1040);
        assert_eq!(schedule.common.cost(4, false), 5);
    }
}
