//! Table digests
//!
//! Each table's state root is a binary Merkle root over its entries sorted
//! by serialized key:
//!
//! - leaf:  `SHA-256(0x00 || key_len(u32 LE) || key || SHA-256(value))`
//! - node:  `SHA-256(0x01 || left || right)`
//!
//! An odd node at the end of a level is promoted unchanged. The root of an
//! empty table is `H256::ZERO`.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

const LEAF_PREFIX: u8 = 0x00;
const NODE_PREFIX: u8 = 0x01;

/// 32-byte SHA-256 digest
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct H256([u8; 32]);

impl H256 {
    /// Root of an empty table
    pub const ZERO: H256 = H256([0u8; 32]);

    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// SHA-256 of `data`.
    pub fn hash(data: &[u8]) -> Self {
        Self(Sha256::digest(data).into())
    }
}

impl fmt::Display for H256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for H256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "H256({})", self)
    }
}

/// Hash one `(key, value)` pair into a Merkle leaf.
pub fn leaf_hash(key: &[u8], value: &[u8]) -> H256 {
    let mut hasher = Sha256::new();
    hasher.update([LEAF_PREFIX]);
    hasher.update((key.len() as u32).to_le_bytes());
    hasher.update(key);
    hasher.update(Sha256::digest(value));
    H256(hasher.finalize().into())
}

fn node_hash(left: &H256, right: &H256) -> H256 {
    let mut hasher = Sha256::new();
    hasher.update([NODE_PREFIX]);
    hasher.update(left.0);
    hasher.update(right.0);
    H256(hasher.finalize().into())
}

/// Fold ordered leaves into a single root.
pub fn merkle_root(leaves: Vec<H256>) -> H256 {
    if leaves.is_empty() {
        return H256::ZERO;
    }

    let mut level = leaves;
    while level.len() > 1 {
        let mut next = Vec::with_capacity((level.len() + 1) / 2);
        for pair in level.chunks(2) {
            match pair {
                [left, right] => next.push(node_hash(left, right)),
                [single] => next.push(*single),
                _ => {}
            }
        }
        level = next;
    }
    level[0]
}
