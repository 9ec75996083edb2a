use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use alloy::primitives::U256;
use chrono::Utc;
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};

use airdrop_core::core::bits::{Address, Amount, Timestamp};

use super::{
    token_locker::{LockId, TokenLocker},
    token_transfer::{TokenError, TokenTransfer},
};

/// In-memory token ledger
///
/// Acts as the distributor wallet: [`TokenTransfer`] moves tokens out of
/// the `holder` balance.
pub struct SimulatedToken {
    token: Address,
    holder: Address,
    balances: RwLock<HashMap<Address, Amount>>,
    frozen: AtomicBool,
}

impl SimulatedToken {
    pub fn new(token: Address, holder: Address) -> Self {
        Self {
            token,
            holder,
            balances: RwLock::new(HashMap::new()),
            frozen: AtomicBool::new(false),
        }
    }

    /// Create token with `amount` already held by distributor
    pub fn new_funded(token: Address, holder: Address, amount: Amount) -> Arc<Self> {
        let token = Arc::new(Self::new(token, holder));
        token.mint(holder, amount);
        token
    }

    pub fn holder(&self) -> Address {
        self.holder
    }

    pub fn mint(&self, to: Address, amount: Amount) {
        let mut balances = self.balances.write();
        let balance = balances.entry(to).or_default();
        *balance = balance.saturating_add(amount);
    }

    pub fn balance_of(&self, owner: &Address) -> Amount {
        self.balances.read().get(owner).copied().unwrap_or_default()
    }

    /// While frozen every transfer is rejected
    pub fn set_frozen(&self, frozen: bool) {
        self.frozen.store(frozen, Ordering::Relaxed);
    }

    pub fn transfer_from(
        &self,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), TokenError> {
        if self.frozen.load(Ordering::Relaxed) {
            return Err(TokenError::Rejected(format!("Token {} is frozen", self.token)));
        }

        let mut balances = self.balances.write();

        let available = balances.get(&from).copied().unwrap_or_default();
        let remaining = available
            .checked_sub(amount)
            .ok_or(TokenError::InsufficientBalance {
                available,
                requested: amount,
            })?;

        let received = balances
            .get(&to)
            .copied()
            .unwrap_or_default()
            .checked_add(amount)
            .ok_or_else(|| TokenError::Rejected("Balance overflow".into()))?;

        balances.insert(from, remaining);
        balances.insert(to, received);

        Ok(())
    }
}

impl TokenTransfer for SimulatedToken {
    fn token(&self) -> Address {
        self.token
    }

    fn balance(&self) -> Amount {
        self.balance_of(&self.holder)
    }

    fn transfer(&self, to: Address, amount: Amount) -> Result<(), TokenError> {
        self.transfer_from(self.holder, to, amount)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenLock {
    pub lock_id: LockId,
    pub user: Address,
    pub amount: Amount,
    pub lock_time: Amount,
    pub created_at: Timestamp,
}

struct LockBook {
    next_lock_id: LockId,
    locks: Vec<TokenLock>,
}

/// In-memory locker, pulling tokens from the distributor wallet
pub struct SimulatedLocker {
    address: Address,
    token: Arc<SimulatedToken>,
    book: Mutex<LockBook>,
}

impl SimulatedLocker {
    pub fn new(address: Address, token: Arc<SimulatedToken>) -> Self {
        Self {
            address,
            token,
            book: Mutex::new(LockBook {
                next_lock_id: U256::from(1),
                locks: Vec::new(),
            }),
        }
    }

    pub fn locks(&self) -> Vec<TokenLock> {
        self.book.lock().locks.clone()
    }

    pub fn locked_balance(&self) -> Amount {
        self.token.balance_of(&self.address)
    }
}

impl TokenLocker for SimulatedLocker {
    fn address(&self) -> Address {
        self.address
    }

    fn create_lock(
        &self,
        user: Address,
        amount: Amount,
        lock_time: Amount,
    ) -> Result<LockId, TokenError> {
        let mut book = self.book.lock();

        self.token
            .transfer_from(self.token.holder(), self.address, amount)?;

        let lock_id = book.next_lock_id;
        book.next_lock_id += U256::from(1);
        book.locks.push(TokenLock {
            lock_id,
            user,
            amount,
            lock_time,
            created_at: Utc::now(),
        });

        Ok(lock_id)
    }
}
