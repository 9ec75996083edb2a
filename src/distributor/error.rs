use thiserror::Error;

use airdrop_core::core::bits::{Address, Amount};

use crate::{merkle::leaf::LeafEncoding, token::token_transfer::TokenError};

/// Reason a claim or privileged operation was rejected
///
/// Every variant is specific, so that callers can tell "nothing to claim
/// here" apart from "proof is stale, regenerate it". No state is changed
/// when any of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClaimError {
    #[error("Airdrop already claimed by {user}")]
    AlreadyClaimed { user: Address },

    #[error("Invalid merkle proof for {user}")]
    InvalidProof { user: Address },

    #[error("Lock time {lock_time} exceeds maximum lock duration {max}")]
    InvalidLockDuration { lock_time: Amount, max: Amount },

    #[error("Token transfer failed: {0}")]
    TransferFailed(TokenError),

    #[error("Token lock failed: {0}")]
    LockFailed(TokenError),

    #[error("No token locker configured")]
    LockerNotConfigured,

    #[error("Proof of {len} hashes exceeds maximum depth {max}")]
    ProofTooLong { len: usize, max: usize },

    #[error("Claim variant not supported by {encoding} distributor")]
    UnsupportedClaimVariant { encoding: LeafEncoding },

    #[error("Caller {caller} is not governor")]
    NotGovernor { caller: Address },

    #[error("Total claimed overflow")]
    Overflow,
}
