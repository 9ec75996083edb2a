use std::collections::BTreeMap;

use eyre::Context;
use serde::{Deserialize, Serialize};

use airdrop_core::core::{
    bits::{Address, Amount, Timestamp},
    persistence::Persistence,
};

use crate::token::token_locker::LockId;

use super::error::ClaimError;

/// Consumed allocation of a single claim key
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClaimRecord {
    pub user: Address,
    pub amount: Amount,
    pub lock_time: Amount,
    pub lock_id: Option<LockId>,
    pub claimed_at: Timestamp,
}

/// Set of claim keys already consumed
///
/// Append-only: a key once recorded is never removed.
#[derive(Debug, Clone, Default)]
pub struct ClaimLedger {
    claims: BTreeMap<Address, ClaimRecord>,
    total_claimed: Amount,
}

impl ClaimLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<ClaimRecord>) -> Result<Self, ClaimError> {
        let mut ledger = Self::new();
        for record in records {
            let total_claimed = ledger.prepare(&record.user, record.amount)?;
            ledger.commit(record, total_claimed);
        }
        Ok(ledger)
    }

    pub fn has_claimed(&self, user: &Address) -> bool {
        self.claims.contains_key(user)
    }

    pub fn get(&self, user: &Address) -> Option<&ClaimRecord> {
        self.claims.get(user)
    }

    pub fn len(&self) -> usize {
        self.claims.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }

    pub fn total_claimed(&self) -> Amount {
        self.total_claimed
    }

    pub fn records(&self) -> impl Iterator<Item = &ClaimRecord> {
        self.claims.values()
    }

    /// Check that key can be recorded, and tell total claimed after recording it
    pub fn prepare(&self, user: &Address, amount: Amount) -> Result<Amount, ClaimError> {
        if self.has_claimed(user) {
            return Err(ClaimError::AlreadyClaimed { user: *user });
        }
        self.total_claimed
            .checked_add(amount)
            .ok_or(ClaimError::Overflow)
    }

    /// Record key with the total obtained from [`ClaimLedger::prepare`]
    pub fn commit(&mut self, record: ClaimRecord, total_claimed: Amount) {
        self.claims.insert(record.user, record);
        self.total_claimed = total_claimed;
    }
}

#[derive(Serialize, Deserialize)]
struct ClaimLedgerData {
    claims: Vec<ClaimRecord>,
}

/// Loads and stores [`ClaimLedger`] as JSON document
pub struct ClaimLedgerStore {
    persistence: Box<dyn Persistence>,
}

impl ClaimLedgerStore {
    pub fn new(persistence: Box<dyn Persistence>) -> Self {
        Self { persistence }
    }

    /// Load ledger, or empty one when nothing was stored yet
    pub fn load(&self) -> eyre::Result<ClaimLedger> {
        let Some(value) = self.persistence.load_value()? else {
            return Ok(ClaimLedger::new());
        };

        let data: ClaimLedgerData =
            serde_json::from_value(value).context("Failed to deserialize claim ledger")?;

        let ledger = ClaimLedger::from_records(data.claims).context("Corrupt claim ledger")?;

        tracing::debug!(
            claims = ledger.len(),
            total_claimed = %ledger.total_claimed(),
            "Loaded claim ledger"
        );

        Ok(ledger)
    }

    pub fn store(&self, ledger: &ClaimLedger) -> eyre::Result<()> {
        let data = ClaimLedgerData {
            claims: ledger.records().cloned().collect(),
        };
        let value = serde_json::to_value(&data).context("Failed to serialize claim ledger")?;
        self.persistence.store_value(value)
    }
}
