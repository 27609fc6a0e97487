//! Error types for rawtable operations
//!
//! All backend failures are represented by the StoreError enum. The five
//! existence and lifecycle failures carry stable numeric abort codes that
//! trusted callers match on; every other variant is an internal error with
//! no stable code.

use thiserror::Error;

use crate::object_id::ObjectId;

/// Key is already bound in the table.
pub const E_ALREADY_EXISTS: u64 = 1;
/// Key is not bound in the table.
pub const E_NOT_FOUND: u64 = 2;
/// Reserved: operation repeated inside one unit of work.
pub const E_DUPLICATE_OPERATION: u64 = 3;
/// Table still holds entries.
pub const E_NOT_EMPTY: u64 = 4;
/// A table already exists for the handle.
pub const E_TABLE_ALREADY_EXISTS: u64 = 5;

/// rawtable error types with detailed context
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// `add` on a key that is already present
    #[error("key 0x{} already exists in table {handle}", hex::encode(.key))]
    KeyAlreadyExists {
        /// Table the key was added to
        handle: ObjectId,
        /// Serialized key bytes
        key: Vec<u8>,
    },

    /// Lookup or removal of a key that is not present
    #[error("key 0x{} not found in table {handle}", hex::encode(.key))]
    KeyNotFound {
        /// Table that was searched
        handle: ObjectId,
        /// Serialized key bytes
        key: Vec<u8>,
    },

    /// A handle was reused within the same uncommitted transaction
    #[error("duplicate operation on table {handle} within one transaction")]
    DuplicateOperation {
        /// Handle that was reused
        handle: ObjectId,
    },

    /// Guarded destruction of a table that still has entries
    #[error("table {handle} is not empty: {size} live entries")]
    TableNotEmpty {
        /// Table that was to be destroyed
        handle: ObjectId,
        /// Live entry count at the time of the call
        size: u64,
    },

    /// Creation of a table whose handle is already live
    #[error("table {handle} already exists")]
    TableAlreadyExists {
        /// Handle that is already live
        handle: ObjectId,
    },

    /// Entry operation against a handle with no metadata record
    #[error("table {handle} does not exist")]
    TableNotFound {
        /// Handle that was looked up
        handle: ObjectId,
    },

    /// Stored resource has a different type than the caller asked for
    #[error("type mismatch for key 0x{} in table {handle}: expected {expected}, found {found}", hex::encode(.key))]
    TypeMismatch {
        /// Table holding the entry
        handle: ObjectId,
        /// Serialized key bytes
        key: Vec<u8>,
        /// Type requested by the caller
        expected: &'static str,
        /// Type actually stored
        found: &'static str,
    },

    /// Serialized key exceeds the configured maximum
    #[error("key too large: {size} bytes exceeds limit of {max_size} bytes")]
    OversizedKey {
        /// Serialized key size
        size: usize,
        /// Configured maximum
        max_size: usize,
    },

    /// Key or value could not be serialized
    #[error("encoding failed: {message}")]
    Encoding {
        /// Description from the encoder
        message: String,
    },

    /// Charging an operation would exceed the transaction gas limit
    #[error("out of gas: operation needs {required}, {remaining} remaining")]
    OutOfGas {
        /// Gas the operation needs
        required: u64,
        /// Gas left before the call
        remaining: u64,
    },

    /// Configuration rejected by `Config::validate`
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Validation failure
        reason: String,
    },
}

impl StoreError {
    /// Stable abort code for existence and lifecycle errors.
    ///
    /// Internal errors return `None`; the trusted caller decides how to
    /// surface them.
    pub fn abort_code(&self) -> Option<u64> {
        match self {
            StoreError::KeyAlreadyExists { .. } => Some(E_ALREADY_EXISTS),
            StoreError::KeyNotFound { .. } => Some(E_NOT_FOUND),
            StoreError::DuplicateOperation { .. } => Some(E_DUPLICATE_OPERATION),
            StoreError::TableNotEmpty { .. } => Some(E_NOT_EMPTY),
            StoreError::TableAlreadyExists { .. } => Some(E_TABLE_ALREADY_EXISTS),
            StoreError::TableNotFound { .. }
            | StoreError::TypeMismatch { .. }
            | StoreError::OversizedKey { .. }
            | StoreError::Encoding { .. }
            | StoreError::OutOfGas { .. }
            | StoreError::InvalidConfig { .. } => None,
        }
    }
}

/// Convert bincode failures to StoreError::Encoding
impl From<bincode::Error> for StoreError {
    fn from(err: bincode::Error) -> Self {
        StoreError::Encoding {
            message: err.to_string(),
        }
    }
}

/// Result type alias for rawtable operations
pub type StoreResult<T> = Result<T, StoreError>;
