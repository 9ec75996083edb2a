use std::sync::Arc;

use alloy::primitives::U256;
use chrono::Utc;
use parking_lot::Mutex;

use airdrop_core::core::{
    bits::{short_hex, Address, Amount, Hash, Timestamp},
    functional::{IntoObservableSingle, PublishSingle, SingleObserver},
};

use crate::{
    governance::governance_policy::GovernancePolicy,
    merkle::{
        leaf::LeafEncoding,
        proof::{verify_proof, MAX_PROOF_DEPTH},
    },
    token::{
        token_locker::{LockId, TokenLocker},
        token_transfer::TokenTransfer,
    },
};

use super::{
    claim_ledger::{ClaimLedger, ClaimRecord},
    error::ClaimError,
};

/// Longest lock a claimant may choose: four years, in seconds
pub const DEFAULT_MAX_LOCK_DURATION: u64 = 4 * 365 * 24 * 60 * 60;

/// Notifications other systems subscribe to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DistributorEvent {
    Claimed {
        user: Address,
        amount: Amount,
        lock_time: Amount,
        lock_id: Option<LockId>,
        timestamp: Timestamp,
    },
    GovernorRecoverAirdropTokens {
        amount: Amount,
        timestamp: Timestamp,
    },
    MerkleRootSet {
        root: Hash,
        timestamp: Timestamp,
    },
}

/// Outcome of a successful claim
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimReceipt {
    pub user: Address,
    pub amount: Amount,
    pub lock_time: Amount,

    /// Set when tokens went to the locker instead of the user
    pub lock_id: Option<LockId>,

    pub claimed_at: Timestamp,
}

impl From<&ClaimReceipt> for ClaimRecord {
    fn from(receipt: &ClaimReceipt) -> Self {
        ClaimRecord {
            user: receipt.user,
            amount: receipt.amount,
            lock_time: receipt.lock_time,
            lock_id: receipt.lock_id,
            claimed_at: receipt.claimed_at,
        }
    }
}

struct DistributorState {
    merkle_root: Hash,
    ledger: ClaimLedger,
}

/// Merkle airdrop claim verifier
///
/// Validates claims against the published root, and keeps track of claim
/// keys consumed. Each operation runs as one transactional unit under a
/// single lock: the claimed flag is read, the proof checked, the tokens
/// moved, and only then the flag is set. Two claims for the same key are
/// therefore serialized, and the second one observes `AlreadyClaimed`.
///
/// Events are published while the lock is held, so that their order is the
/// order of commits. Observers must not call back into the distributor.
pub struct MerkleDistributor {
    encoding: LeafEncoding,
    max_lock_duration: Amount,
    token_transfer: Arc<dyn TokenTransfer>,
    token_locker: Option<Arc<dyn TokenLocker>>,
    governance: Arc<dyn GovernancePolicy>,
    state: Mutex<DistributorState>,
    observer: SingleObserver<DistributorEvent>,
}

impl MerkleDistributor {
    pub fn new(
        merkle_root: Hash,
        encoding: LeafEncoding,
        max_lock_duration: Amount,
        ledger: ClaimLedger,
        token_transfer: Arc<dyn TokenTransfer>,
        token_locker: Option<Arc<dyn TokenLocker>>,
        governance: Arc<dyn GovernancePolicy>,
    ) -> Self {
        Self {
            encoding,
            max_lock_duration,
            token_transfer,
            token_locker,
            governance,
            state: Mutex::new(DistributorState {
                merkle_root,
                ledger,
            }),
            observer: SingleObserver::new(),
        }
    }

    pub fn merkle_root(&self) -> Hash {
        self.state.lock().merkle_root
    }

    /// Address of the token being distributed
    pub fn token(&self) -> Address {
        self.token_transfer.token()
    }

    pub fn encoding(&self) -> LeafEncoding {
        self.encoding
    }

    pub fn max_lock_duration(&self) -> Amount {
        self.max_lock_duration
    }

    pub fn token_locker(&self) -> Option<Address> {
        self.token_locker.as_ref().map(|locker| locker.address())
    }

    pub fn total_claimed(&self) -> Amount {
        self.state.lock().ledger.total_claimed()
    }

    pub fn has_claimed(&self, user: &Address) -> bool {
        self.state.lock().ledger.has_claimed(user)
    }

    /// Copy of the ledger, e.g. for persisting it
    pub fn ledger_snapshot(&self) -> ClaimLedger {
        self.state.lock().ledger.clone()
    }

    /// Claim for distributor committed to [`LeafEncoding::Plain`] leaves
    pub fn claim(
        &self,
        user: Address,
        amount: Amount,
        proof: &[Hash],
    ) -> Result<ClaimReceipt, ClaimError> {
        if self.encoding != LeafEncoding::Plain {
            return Err(ClaimError::UnsupportedClaimVariant {
                encoding: self.encoding,
            });
        }
        self.process_claim(user, amount, U256::ZERO, proof)
    }

    /// Claim for distributor committed to [`LeafEncoding::WithLockTime`] leaves
    ///
    /// Non-zero `lock_time` sends the tokens into the locker instead of the user.
    pub fn claim_with_lock(
        &self,
        user: Address,
        amount: Amount,
        lock_time: Amount,
        proof: &[Hash],
    ) -> Result<ClaimReceipt, ClaimError> {
        if self.encoding != LeafEncoding::WithLockTime {
            return Err(ClaimError::UnsupportedClaimVariant {
                encoding: self.encoding,
            });
        }
        self.process_claim(user, amount, lock_time, proof)
    }

    fn process_claim(
        &self,
        user: Address,
        amount: Amount,
        lock_time: Amount,
        proof: &[Hash],
    ) -> Result<ClaimReceipt, ClaimError> {
        if proof.len() > MAX_PROOF_DEPTH {
            return Err(ClaimError::ProofTooLong {
                len: proof.len(),
                max: MAX_PROOF_DEPTH,
            });
        }

        let mut state = self.state.lock();

        let total_claimed = state.ledger.prepare(&user, amount)?;

        if lock_time > self.max_lock_duration {
            return Err(ClaimError::InvalidLockDuration {
                lock_time,
                max: self.max_lock_duration,
            });
        }

        let token_locker = match (lock_time.is_zero(), &self.token_locker) {
            (true, _) => None,
            (false, Some(locker)) => Some(locker),
            (false, None) => return Err(ClaimError::LockerNotConfigured),
        };

        let leaf = self.encoding.leaf(user, amount, lock_time);
        if !verify_proof(proof, &state.merkle_root, leaf) {
            tracing::debug!(
                %user,
                %amount,
                %lock_time,
                leaf = %short_hex(leaf.as_slice()),
                "Rejected claim with invalid proof"
            );
            return Err(ClaimError::InvalidProof { user });
        }

        let lock_id = match token_locker {
            Some(locker) => Some(
                locker
                    .create_lock(user, amount, lock_time)
                    .map_err(ClaimError::LockFailed)?,
            ),
            None => {
                self.token_transfer
                    .transfer(user, amount)
                    .map_err(ClaimError::TransferFailed)?;
                None
            }
        };

        let receipt = ClaimReceipt {
            user,
            amount,
            lock_time,
            lock_id,
            claimed_at: Utc::now(),
        };

        state.ledger.commit(ClaimRecord::from(&receipt), total_claimed);

        tracing::info!(
            %user,
            %amount,
            %lock_time,
            lock_id = ?lock_id,
            %total_claimed,
            "Airdrop claimed"
        );

        self.observer.publish_single(DistributorEvent::Claimed {
            user,
            amount,
            lock_time,
            lock_id,
            timestamp: receipt.claimed_at,
        });

        Ok(receipt)
    }

    /// Replace the published root
    ///
    /// Keys already claimed stay claimed under the new root.
    pub fn set_merkle_root(&self, caller: &Address, root: Hash) -> Result<(), ClaimError> {
        self.ensure_governor(caller)?;

        let mut state = self.state.lock();
        let previous = state.merkle_root;
        state.merkle_root = root;

        tracing::info!(
            previous = %short_hex(previous.as_slice()),
            root = %short_hex(root.as_slice()),
            "Merkle root set"
        );

        self.observer.publish_single(DistributorEvent::MerkleRootSet {
            root,
            timestamp: Utc::now(),
        });

        Ok(())
    }

    /// Sweep whole remaining balance to the governor
    pub fn governor_recover_airdrop_tokens(&self, caller: &Address) -> Result<Amount, ClaimError> {
        self.ensure_governor(caller)?;

        // Held so that no claim interleaves with the sweep
        let _state = self.state.lock();

        let amount = self.token_transfer.balance();
        if !amount.is_zero() {
            self.token_transfer
                .transfer(*caller, amount)
                .map_err(ClaimError::TransferFailed)?;
        }

        tracing::info!(%caller, %amount, "Governor recovered airdrop tokens");

        self.observer
            .publish_single(DistributorEvent::GovernorRecoverAirdropTokens {
                amount,
                timestamp: Utc::now(),
            });

        Ok(amount)
    }

    fn ensure_governor(&self, caller: &Address) -> Result<(), ClaimError> {
        if self.governance.is_governor(caller) {
            Ok(())
        } else {
            tracing::warn!(%caller, "Rejected privileged call from non-governor");
            Err(ClaimError::NotGovernor { caller: *caller })
        }
    }
}

impl IntoObservableSingle<DistributorEvent> for MerkleDistributor {
    fn get_single_observer_mut(&mut self) -> &mut SingleObserver<DistributorEvent> {
        &mut self.observer
    }
}
