use thiserror::Error;

use airdrop_core::core::bits::{Address, Amount};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("Insufficient balance: available {available}, requested {requested}")]
    InsufficientBalance { available: Amount, requested: Amount },

    #[error("Transfer rejected: {0}")]
    Rejected(String),
}

/// Capability to move the distributed token out of the distributor
///
/// Implementations must be all-or-nothing: a failed transfer leaves every
/// balance untouched.
pub trait TokenTransfer: Send + Sync {
    /// Address of the token being distributed
    fn token(&self) -> Address;

    /// Balance currently held by the distributor
    fn balance(&self) -> Amount;

    /// Transfer `amount` from the distributor to `to`
    fn transfer(&self, to: Address, amount: Amount) -> Result<(), TokenError>;
}
