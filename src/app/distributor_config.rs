use std::sync::Arc;

use alloy::primitives::U256;
use derive_builder::Builder;
use eyre::{OptionExt, Result};

use airdrop_core::core::{
    bits::{Amount, Hash},
    functional::{IntoObservableSingle, NotificationHandlerOnce},
};

use crate::{
    distributor::{
        claim_ledger::ClaimLedger,
        distributor::{DistributorEvent, MerkleDistributor, DEFAULT_MAX_LOCK_DURATION},
    },
    governance::governance_policy::GovernancePolicy,
    merkle::leaf::LeafEncoding,
    token::{token_locker::TokenLocker, token_transfer::TokenTransfer},
};

use super::config::ConfigBuildError;

#[derive(Clone, Builder)]
#[builder(
    pattern = "owned",
    build_fn(name = "try_build", error = "ConfigBuildError")
)]
pub struct DistributorConfig {
    pub merkle_root: Hash,

    #[builder(default = "LeafEncoding::Plain")]
    pub encoding: LeafEncoding,

    #[builder(setter(into, strip_option), default)]
    pub max_lock_duration: Option<Amount>,

    /// Claims made before, e.g. loaded from the ledger file
    #[builder(default)]
    pub ledger: ClaimLedger,

    pub token_transfer: Arc<dyn TokenTransfer>,

    #[builder(setter(strip_option), default)]
    pub token_locker: Option<Arc<dyn TokenLocker>>,

    pub governance: Arc<dyn GovernancePolicy>,

    #[builder(setter(skip))]
    pub(crate) distributor: Option<Arc<MerkleDistributor>>,
}

impl DistributorConfig {
    #[must_use]
    pub fn builder() -> DistributorConfigBuilder {
        DistributorConfigBuilder::default()
    }

    pub fn expect_distributor_cloned(&self) -> Arc<MerkleDistributor> {
        self.distributor
            .clone()
            .ok_or(())
            .expect("Failed to get distributor")
    }

    pub fn try_get_distributor_cloned(&self) -> Result<Arc<MerkleDistributor>> {
        self.distributor
            .clone()
            .ok_or_eyre("Failed to get distributor")
    }
}

impl DistributorConfigBuilder {
    pub fn build(self) -> Result<DistributorConfig, ConfigBuildError> {
        self.build_distributor(None)
    }

    /// Build with observer receiving [`DistributorEvent`]s
    pub fn build_with_observer(
        self,
        observer: impl NotificationHandlerOnce<DistributorEvent> + 'static,
    ) -> Result<DistributorConfig, ConfigBuildError> {
        self.build_distributor(Some(Box::new(observer)))
    }

    fn build_distributor(
        self,
        observer: Option<Box<dyn NotificationHandlerOnce<DistributorEvent>>>,
    ) -> Result<DistributorConfig, ConfigBuildError> {
        let mut config = self.try_build()?;

        if config.token_locker.is_some() && config.encoding != LeafEncoding::WithLockTime {
            return Err(ConfigBuildError::ValidationError(format!(
                "Token locker requires {} encoding, but {} was given",
                LeafEncoding::WithLockTime,
                config.encoding
            )));
        }

        let mut distributor = MerkleDistributor::new(
            config.merkle_root,
            config.encoding,
            config
                .max_lock_duration
                .unwrap_or(U256::from(DEFAULT_MAX_LOCK_DURATION)),
            config.ledger.clone(),
            config.token_transfer.clone(),
            config.token_locker.clone(),
            config.governance.clone(),
        );

        if let Some(observer) = observer {
            distributor.get_single_observer_mut().set_observer(observer);
        }

        config.distributor.replace(Arc::new(distributor));

        Ok(config)
    }
}
