use std::path::PathBuf;

use clap::{Parser, Subcommand};

use airdrop_core::core::{
    bits::{Address, Amount, Hash},
    logging::LogOutputs,
};

/// Command line interface definition
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Application command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Log file path
    #[arg(long, short, global = true)]
    pub log_path: Option<String>,

    /// Disable terminal logging
    #[arg(long, short, global = true)]
    pub term_log_off: bool,

    /// OpenTelemetry trace URL
    #[arg(long, global = true)]
    pub otlp_trace_url: Option<String>,

    /// OpenTelemetry log URL
    #[arg(long, global = true)]
    pub otlp_log_url: Option<String>,
}

impl Cli {
    pub fn log_outputs(&self) -> LogOutputs {
        LogOutputs {
            log_path: self.log_path.clone(),
            term_log_off: self.term_log_off,
            otlp_trace_url: self.otlp_trace_url.clone(),
            otlp_log_url: self.otlp_log_url.clone(),
        }
    }
}

/// Available application commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build merkle tree from allocations and print its root
    BuildTree {
        /// Allocations JSON file
        #[arg(long, short)]
        allocations: PathBuf,
        /// Commit to lock time in leaves
        #[arg(long, short)]
        with_lock_time: bool,
        /// Tree file to write
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Check proof of a claim against a root
    Verify {
        /// Merkle root
        #[arg(long)]
        root: Hash,
        /// Claimant address
        #[arg(long)]
        user: Address,
        /// Claimed amount
        #[arg(long)]
        amount: Amount,
        /// Lock time, selects leaves with lock time
        #[arg(long)]
        lock_time: Option<Amount>,
        /// Comma separated proof hashes
        #[arg(long, value_delimiter = ',', num_args = 0..)]
        proof: Vec<Hash>,
    },
    /// Claim airdrop of a user against simulated token
    Claim {
        /// Configuration file path
        #[arg(long, short)]
        config: PathBuf,
        /// Claimant address
        #[arg(long, short)]
        user: Address,
    },
}

#[cfg(test)]
mod test {
    use alloy::primitives::{B256, U256};
    use clap::Parser;

    use airdrop_core::core::test_util::get_mock_address_1;

    use super::{Cli, Commands};

    #[test]
    fn test_parse_verify() {
        let cli = Cli::try_parse_from([
            "solace-airdrop",
            "verify",
            "--root",
            "0x1111111111111111111111111111111111111111111111111111111111111111",
            "--user",
            "0xd8da6bf26964af9d7eed9e03e53415d37aa96045",
            "--amount",
            "100",
            "--proof",
            "0x2222222222222222222222222222222222222222222222222222222222222222,0x3333333333333333333333333333333333333333333333333333333333333333",
            "--log-path",
            "logs",
        ])
        .unwrap();

        assert_eq!(cli.log_path.as_deref(), Some("logs"));
        match cli.command {
            Commands::Verify {
                root,
                user,
                amount,
                lock_time,
                proof,
            } => {
                assert_eq!(root, B256::repeat_byte(0x11));
                assert_eq!(user, get_mock_address_1());
                assert_eq!(amount, U256::from(100));
                assert_eq!(lock_time, None);
                assert_eq!(proof, vec![B256::repeat_byte(0x22), B256::repeat_byte(0x33)]);
            }
            other => panic!("Unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_build_tree() {
        let cli = Cli::try_parse_from([
            "solace-airdrop",
            "--term-log-off",
            "build-tree",
            "--allocations",
            "allocations.json",
            "--with-lock-time",
        ])
        .unwrap();

        assert!(cli.term_log_off);
        assert!(matches!(
            cli.command,
            Commands::BuildTree {
                with_lock_time: true,
                output: None,
                ..
            }
        ));
    }

    #[test]
    fn test_parse_rejects_bad_address() {
        assert!(Cli::try_parse_from([
            "solace-airdrop",
            "claim",
            "--config",
            "config.json",
            "--user",
            "not-an-address",
        ])
        .is_err());
    }
}
