//! Error types for lucky mint prediction.

use thiserror::Error;

/// Errors surfaced by the fingerprint, eligibility and enumeration operations.
#[derive(Debug, Error)]
pub enum LuckyMintError {
    /// A caller-supplied value violates a precondition
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The chain info source could not produce a snapshot
    #[error("chain info source failed: {0:#}")]
    ExternalSourceFailure(#[source] anyhow::Error),

    /// The configured scan bound was reached before enough heights were found
    #[error("scan limit of {limit} blocks reached after finding {found} of {wanted} lucky mints")]
    ScanLimitExceeded {
        limit: u64,
        found: usize,
        wanted: usize,
    },
}

impl LuckyMintError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        LuckyMintError::InvalidArgument(msg.into())
    }

    /// Whether this error came from a bad input rather than the environment.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, LuckyMintError::InvalidArgument(_))
    }
}

pub type Result<T> = std::result::Result<T, LuckyMintError>;
