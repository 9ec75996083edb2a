use alloy::primitives::U256;

use airdrop_core::core::bits::{Address, Amount};

use super::token_transfer::TokenError;

/// Handle of the lock created for a claimant
pub type LockId = U256;

/// External locking collaborator, which vests claimed tokens
pub trait TokenLocker: Send + Sync {
    /// Address that receives the locked tokens
    fn address(&self) -> Address;

    /// Lock `amount` for `user` during `lock_time` seconds
    ///
    /// The locker pulls `amount` out of the distributor balance as part of
    /// creating the lock. Failure must leave both balances untouched.
    fn create_lock(
        &self,
        user: Address,
        amount: Amount,
        lock_time: Amount,
    ) -> Result<LockId, TokenError>;
}
