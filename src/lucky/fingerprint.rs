//! Address classification and fingerprinting.
//!
//! An address is reduced to an integer by summing the code points of its
//! last 8 characters. Only bech32 addresses are lowercased first; legacy and
//! segwit addresses keep their case, so their fingerprints are case-sensitive.

use crate::error::{LuckyMintError, Result};
use crate::types::AddressType;
use tracing::{debug, warn};

/// Number of trailing characters that make up a fingerprint.
pub const FINGERPRINT_CHARS: usize = 8;

/// Classify an address by its prefix, ignoring case and surrounding whitespace.
pub fn address_type(address: &str) -> AddressType {
    let address = address.trim().to_lowercase();

    if address.starts_with('1') {
        AddressType::Legacy
    } else if address.starts_with('3') {
        AddressType::Segwit
    } else if address.starts_with("bc1") {
        AddressType::Bech32
    } else {
        AddressType::Unknown
    }
}

/// Compute the fingerprint of an address.
///
/// Fails with `InvalidArgument` when the address has fewer than 8 characters.
/// An unknown address type is logged and otherwise treated like legacy.
pub fn address_number(address: &str) -> Result<u64> {
    let trimmed = address.trim();
    if trimmed.chars().count() < FINGERPRINT_CHARS {
        return Err(LuckyMintError::invalid(format!(
            "address length should be >= {}: {:?}",
            FINGERPRINT_CHARS, address
        )));
    }

    let kind = address_type(trimmed);
    let number = match kind {
        AddressType::Bech32 => string_number(&trimmed.to_lowercase()),
        AddressType::Unknown => {
            warn!("unknown address type {}", trimmed);
            string_number(trimmed)
        }
        AddressType::Legacy | AddressType::Segwit => string_number(trimmed),
    };

    debug!("address {} ({}) fingerprint {}", trimmed, kind, number);
    Ok(number)
}

fn string_number(s: &str) -> u64 {
    s.chars()
        .rev()
        .take(FINGERPRINT_CHARS)
        .map(|c| c as u64)
        .sum()
}
