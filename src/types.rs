//! Core types and data structures for lucky mint prediction.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Address classification derived from the textual prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressType {
    /// Pay-to-pubkey-hash, prefix `1`
    Legacy,
    /// Pay-to-script-hash, prefix `3`
    Segwit,
    /// Native segwit, prefix `bc1`
    Bech32,
    /// Anything else
    Unknown,
}

impl AddressType {
    /// Returns the lowercase tag used in logs and JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            AddressType::Legacy => "legacy",
            AddressType::Segwit => "segwit",
            AddressType::Bech32 => "bech32",
            AddressType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for AddressType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A point-in-time read of the chain tip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainSnapshot {
    /// Height of the latest block
    pub height: u64,
    /// Unix timestamp (seconds) of the latest block
    pub timestamp: i64,
}

/// A predicted future block at which an address wins a lucky mint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LuckyMintEvent {
    /// The eligible block height
    pub block_height: u64,
    /// Predicted unix timestamp (seconds) of that block
    #[serde(rename = "timestamp")]
    pub predicted_timestamp: i64,
    /// `predicted_timestamp` rendered for display
    pub timestamp_str: String,
}
