//! Lucky mint tools
//!
//! Predicts the future block heights at which an address wins a lucky mint,
//! and estimates historical block heights from a known reference block.

pub mod types;
pub mod error;
pub mod config;
pub mod chain;
pub mod lucky;
pub mod estimator;

// Re-export main types for convenience
pub use types::{AddressType, ChainSnapshot, LuckyMintEvent};
pub use error::LuckyMintError;
pub use config::{LuckyMintConfig, LuckyMintConfigBuilder};
pub use lucky::LuckyMintPredictor;
