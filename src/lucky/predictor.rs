//! Lucky mint predictor tying a chain source to the forward scan.

use crate::chain::ChainInfoSource;
use crate::config::LuckyMintConfig;
use crate::error::{LuckyMintError, Result};
use crate::lucky::fingerprint::address_number;
use crate::lucky::scan::next_n_lucky_mints;
use crate::lucky::time_format::TimestampFormatter;
use crate::types::LuckyMintEvent;
use tracing::{info, instrument};

/// Predicts upcoming lucky mint heights for an address.
pub struct LuckyMintPredictor<S> {
    source: S,
    config: LuckyMintConfig,
    formatter: TimestampFormatter,
}

impl<S: ChainInfoSource> LuckyMintPredictor<S> {
    /// Create a predictor; the configuration is validated here.
    pub fn new(source: S, config: LuckyMintConfig, formatter: TimestampFormatter) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            source,
            config,
            formatter,
        })
    }

    pub fn config(&self) -> &LuckyMintConfig {
        &self.config
    }

    /// Whether `block_height` is a lucky mint for `address`.
    pub fn is_lucky_mint(&self, address: &str, block_height: u64) -> Result<bool> {
        let fingerprint = address_number(address)?;
        crate::lucky::scan::is_lucky_mint(fingerprint, block_height, self.config.threshold)
    }

    /// Read the chain tip once and return the next `n` lucky mints for `address`.
    #[instrument(skip(self), fields(source = self.source.name()))]
    pub async fn next_n_lucky_mint(&self, address: &str, n: usize) -> Result<Vec<LuckyMintEvent>> {
        if n == 0 {
            return Err(LuckyMintError::invalid("n should be greater than 0"));
        }
        let fingerprint = address_number(address)?;

        let snapshot = self
            .source
            .latest_block_info()
            .await
            .map_err(LuckyMintError::ExternalSourceFailure)?;

        info!("address: {}", address);
        info!("current lucky mint block threshold: {}", self.config.threshold);
        info!("current block height: {}", snapshot.height);
        info!(
            "current block timestamp: {}, {}",
            snapshot.timestamp,
            self.formatter.format(snapshot.timestamp)?
        );

        next_n_lucky_mints(
            fingerprint,
            n,
            snapshot,
            self.config.threshold,
            self.config.block_interval_seconds,
            self.config.max_scan_offset,
            &self.formatter,
        )
    }
}
