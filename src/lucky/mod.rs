//! Lucky mint module - address fingerprints, eligibility and prediction.
//!
//! A block height is a lucky mint for an address when
//! `(height + fingerprint) % threshold == 0`, where the fingerprint is the sum
//! of the code points of the address's last 8 characters.

pub mod fingerprint;
pub mod scan;
pub mod time_format;
pub mod predictor;

// Re-export the core operations
pub use fingerprint::{address_number, address_type};
pub use scan::{is_lucky_mint, next_n_lucky_mints, LuckyMintScan};
pub use time_format::{TimestampFormatter, TIMESTAMP_FORMAT};
pub use predictor::LuckyMintPredictor;
