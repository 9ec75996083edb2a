//! # Configuration Module
//!
//! JSON configuration of the simulated airdrop: which token is distributed,
//! who governs it, and where tree and claim ledger are stored.
//!
//! ## Example JSON Structure
//!
//! ```json
//! {
//!   "distributor": {
//!     "token": "0x501ace9c35e60f03a2af4d484f49f9b1efde9f40",
//!     "governor": "0x0000000000000000000000000000000000000a11",
//!     "wallet": "0x00000000000000000000000000000000000000d1",
//!     "initial_balance": "0x3635c9adc5dea00000"
//!   },
//!   "storage": {
//!     "tree_path": "./airdrop/tree.json",
//!     "ledger_path": "./airdrop/ledger.json"
//!   }
//! }
//! ```

use std::path::{Path, PathBuf};

use alloy::primitives::U256;
use derive_builder::UninitializedFieldError;
use eyre::Report;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use airdrop_core::core::bits::{Address, Amount};

use crate::distributor::distributor::DEFAULT_MAX_LOCK_DURATION;

/// Configuration build errors
#[derive(Debug, Error)]
pub enum ConfigBuildError {
    /// A required configuration field is missing or uninitialized
    #[error("Configuration missing or invalid `{0}`")]
    UninitializedField(&'static str),
    /// General configuration error with context
    #[error("Configuration error `{0}`")]
    Other(String),
    /// File system or parsing error when loading configuration files
    #[error("Configuration file error: {0}")]
    FileError(String),
    /// Configuration validation error with specific validation failure details
    #[error("Configuration validation error: {0}")]
    ValidationError(String),
}

impl From<UninitializedFieldError> for ConfigBuildError {
    fn from(err: UninitializedFieldError) -> Self {
        ConfigBuildError::UninitializedField(err.field_name())
    }
}

impl From<Report> for ConfigBuildError {
    fn from(report: Report) -> Self {
        ConfigBuildError::Other(format!("{:?}", report))
    }
}

impl From<std::io::Error> for ConfigBuildError {
    fn from(err: std::io::Error) -> Self {
        ConfigBuildError::FileError(format!("IO error: {:?}", err))
    }
}

impl From<serde_json::Error> for ConfigBuildError {
    fn from(err: serde_json::Error) -> Self {
        ConfigBuildError::FileError(format!("JSON parsing error: {}", err))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AirdropConfig {
    pub distributor: DistributorSettings,
    pub storage: StorageSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistributorSettings {
    /// Address of the distributed token
    pub token: Address,
    /// The only address allowed to replace root or recover tokens
    pub governor: Address,
    /// Address holding the airdrop balance
    pub wallet: Address,
    /// Balance of the wallet before any claim
    pub initial_balance: Amount,
    /// Address of the token locker, enables claims with lock time
    #[serde(default)]
    pub locker: Option<Address>,
    /// Longest lock duration a claimant may choose, in seconds
    #[serde(default = "default_max_lock_duration")]
    pub max_lock_duration: Amount,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Tree file written by `build-tree`
    pub tree_path: PathBuf,
    /// Claim ledger, created on first claim
    pub ledger_path: PathBuf,
}

fn default_max_lock_duration() -> Amount {
    U256::from(DEFAULT_MAX_LOCK_DURATION)
}

impl AirdropConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigBuildError> {
        let path = path.as_ref();
        tracing::info!(path = %path.display(), "Loading airdrop configuration");

        let json = std::fs::read_to_string(path).map_err(|e| {
            ConfigBuildError::FileError(format!("Failed to read {}: {:?}", path.display(), e))
        })?;

        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigBuildError> {
        if self.distributor.governor.is_zero() {
            return Err(ConfigBuildError::ValidationError(
                "Governor must not be zero address".to_string(),
            ));
        }
        if self.distributor.wallet.is_zero() {
            return Err(ConfigBuildError::ValidationError(
                "Wallet must not be zero address".to_string(),
            ));
        }
        if self.distributor.locker == Some(self.distributor.wallet) {
            return Err(ConfigBuildError::ValidationError(
                "Locker must differ from wallet".to_string(),
            ));
        }
        if self.storage.tree_path == self.storage.ledger_path {
            return Err(ConfigBuildError::ValidationError(
                "Tree and ledger must be stored in different files".to_string(),
            ));
        }
        Ok(())
    }
}
