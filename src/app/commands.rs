use std::{path::Path, sync::Arc};

use eyre::{eyre, Context, OptionExt, Result};

use airdrop_core::core::{
    bits::{Address, Amount, Hash},
    json_file_async::read_from_json_file_async,
    persistence::util::JsonFilePersistence,
};

use crate::{
    distributor::{claim_ledger::ClaimLedgerStore, distributor::ClaimReceipt},
    governance::governance_policy::SingleGovernor,
    merkle::{allocation::AllocationTree, leaf::LeafEncoding, proof::verify_proof},
    token::simulated_token::{SimulatedLocker, SimulatedToken},
};

use super::{
    config::AirdropConfig,
    distributor_config::DistributorConfig,
    tree_file::{AllocationFile, TreeFile},
};

/// Generate tree from allocations, and optionally write the tree file
pub async fn build_tree(
    allocations_path: impl AsRef<Path>,
    encoding: LeafEncoding,
    output: Option<&Path>,
) -> Result<TreeFile> {
    let allocations_path = allocations_path.as_ref();
    let allocation_file: AllocationFile = read_from_json_file_async(allocations_path).await?;

    if encoding == LeafEncoding::Plain
        && allocation_file
            .allocations
            .iter()
            .any(|allocation| !allocation.lock_time.is_zero())
    {
        tracing::warn!("Lock times are ignored with {} encoding", encoding);
    }

    let tree = AllocationTree::build(encoding, allocation_file.allocations)
        .with_context(|| format!("Failed to build tree from {}", allocations_path.display()))?;

    let tree_file = TreeFile::from_tree(&tree)?;

    if let Some(output) = output {
        tree_file.save(output).await?;
        tracing::info!(output = %output.display(), "Tree file written");
    }

    tracing::info!(
        root = %tree_file.root,
        %encoding,
        claims = tree_file.claims.len(),
        "Tree built"
    );

    Ok(tree_file)
}

/// Stateless proof check
///
/// Presence of `lock_time` selects [`LeafEncoding::WithLockTime`].
pub fn verify_claim(
    root: &Hash,
    user: Address,
    amount: Amount,
    lock_time: Option<Amount>,
    proof: &[Hash],
) -> bool {
    let leaf = match lock_time {
        Some(lock_time) => LeafEncoding::WithLockTime.leaf(user, amount, lock_time),
        None => LeafEncoding::Plain.leaf(user, amount, Amount::ZERO),
    };
    verify_proof(proof, root, leaf)
}

/// Run claim of the user against tree file and ledger named in config
///
/// The wallet is funded with the initial balance less everything the ledger
/// says was claimed already. Ledger file is updated only on success.
pub async fn simulate_claim(config: &AirdropConfig, user: Address) -> Result<ClaimReceipt> {
    let settings = &config.distributor;

    let tree_file = TreeFile::load(&config.storage.tree_path).await?;
    let claim = tree_file
        .find_claim(&user)
        .ok_or_else(|| eyre!("User {} is not part of the airdrop", user))?;

    let ledger_store = ClaimLedgerStore::new(Box::new(JsonFilePersistence::new(
        &config.storage.ledger_path,
    )));
    let ledger = ledger_store.load()?;

    let available = settings
        .initial_balance
        .checked_sub(ledger.total_claimed())
        .ok_or_eyre("Ledger records more claims than the initial balance")?;

    let token = SimulatedToken::new_funded(settings.token, settings.wallet, available);

    let mut builder = DistributorConfig::builder()
        .merkle_root(tree_file.root)
        .encoding(tree_file.encoding)
        .max_lock_duration(settings.max_lock_duration)
        .ledger(ledger)
        .token_transfer(token.clone())
        .governance(Arc::new(SingleGovernor::new(settings.governor)));

    if let Some(locker) = settings.locker {
        builder = builder.token_locker(Arc::new(SimulatedLocker::new(locker, token.clone())));
    }

    let distributor = builder.build()?.try_get_distributor_cloned()?;

    let result = match tree_file.encoding {
        LeafEncoding::Plain => distributor.claim(user, claim.amount, &claim.proof),
        LeafEncoding::WithLockTime => {
            distributor.claim_with_lock(user, claim.amount, claim.lock_time, &claim.proof)
        }
    };

    match result {
        Ok(receipt) => {
            ledger_store
                .store(&distributor.ledger_snapshot())
                .context("Failed to store claim ledger")?;
            Ok(receipt)
        }
        Err(err) => {
            tracing::warn!(%user, %err, "Claim rejected");
            Err(err.into())
        }
    }
}
