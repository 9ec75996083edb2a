use alloy::primitives::{B256, U256};
use chrono::{DateTime, Utc};

pub type Address = alloy::primitives::Address; // claimant or token address (EVM)
pub type Amount = U256; // token quantity in base units, or a duration in seconds
pub type Hash = B256; // keccak-256 digest (leaf, node or root)
pub type Timestamp = DateTime<Utc>;

/// Compact hex form used in log lines, e.g. `0xd8da…6045`
pub fn short_hex(bytes: &[u8]) -> String {
    let full = alloy::hex::encode(bytes);
    if full.len() <= 12 {
        format!("0x{}", full)
    } else {
        format!("0x{}…{}", &full[..4], &full[full.len() - 4..])
    }
}
