use clap::Parser;
use eyre::Result;

use airdrop_core::{core::logging::log_init, init_log};
use solace_airdrop::{
    app::{
        commands::{build_tree, simulate_claim, verify_claim},
        config::AirdropConfig,
    },
    cli::{Cli, Commands},
    merkle::leaf::LeafEncoding,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_log!(cli.log_outputs());

    match cli.command {
        Commands::BuildTree {
            allocations,
            with_lock_time,
            output,
        } => {
            let encoding = if with_lock_time {
                LeafEncoding::WithLockTime
            } else {
                LeafEncoding::Plain
            };

            let tree_file = build_tree(&allocations, encoding, output.as_deref()).await?;

            if output.is_none() {
                println!("{}", serde_json::to_string_pretty(&tree_file)?);
            } else {
                println!("{}", tree_file.root);
            }
        }
        Commands::Verify {
            root,
            user,
            amount,
            lock_time,
            proof,
        } => {
            let valid = verify_claim(&root, user, amount, lock_time, &proof);
            tracing::info!(%user, %amount, valid, "Verified claim");
            println!("{}", if valid { "valid" } else { "invalid" });
            if !valid {
                std::process::exit(1);
            }
        }
        Commands::Claim { config, user } => {
            let config = AirdropConfig::load(&config)?;
            let receipt = simulate_claim(&config, user).await?;
            println!(
                "Claimed {} for {} (lock time {}, lock id {})",
                receipt.amount,
                receipt.user,
                receipt.lock_time,
                receipt
                    .lock_id
                    .map(|lock_id| lock_id.to_string())
                    .unwrap_or_else(|| String::from("none"))
            );
        }
    }

    Ok(())
}
