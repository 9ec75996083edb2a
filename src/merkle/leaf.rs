use std::fmt;

use alloy::{primitives::keccak256, sol_types::SolValue};
use serde::{Deserialize, Serialize};

use airdrop_core::core::bits::{Address, Amount, Hash};

/// Shape of the tuple hashed into each leaf
///
/// One distributor commits to exactly one encoding. Trees generated with
/// one encoding never verify against the other.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Hash, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum LeafEncoding {
    /// `keccak256(abi.encodePacked(address user, uint256 amount))`
    Plain,

    /// `keccak256(abi.encodePacked(address user, uint256 amount, uint256 lockTime))`
    WithLockTime,
}

impl fmt::Display for LeafEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeafEncoding::Plain => write!(f, "plain"),
            LeafEncoding::WithLockTime => write!(f, "with_lock_time"),
        }
    }
}

impl LeafEncoding {
    /// Compute leaf hash for this encoding
    ///
    /// `lock_time` is ignored by [`LeafEncoding::Plain`].
    pub fn leaf(&self, user: Address, amount: Amount, lock_time: Amount) -> Hash {
        match self {
            LeafEncoding::Plain => plain_leaf(user, amount),
            LeafEncoding::WithLockTime => lock_time_leaf(user, amount, lock_time),
        }
    }
}

/// Compute leaf hash identical to Solidity `keccak256(abi.encodePacked(user, amount))`
pub fn plain_leaf(user: Address, amount: Amount) -> Hash {
    keccak256((user, amount).abi_encode_packed())
}

/// Compute leaf hash identical to Solidity `keccak256(abi.encodePacked(user, amount, lockTime))`
pub fn lock_time_leaf(user: Address, amount: Amount, lock_time: Amount) -> Hash {
    keccak256((user, amount, lock_time).abi_encode_packed())
}
