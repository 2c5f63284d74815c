//! Chain tip sources.
//!
//! A source answers one question: what is the latest block height and its
//! timestamp. Failures are returned as `anyhow` errors and never retried here.

pub mod explorer;
pub mod node;

use crate::config::{ChainSourceConfig, LuckyMintConfig};
use crate::types::ChainSnapshot;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

pub use explorer::BlockchainInfoClient;
pub use node::BitcoinRpcClient;

/// Supplies the current chain tip.
#[async_trait]
pub trait ChainInfoSource: Send + Sync {
    /// Fetch the latest block height and timestamp.
    async fn latest_block_info(&self) -> Result<ChainSnapshot>;

    /// Short name used in logs.
    fn name(&self) -> &str;
}

#[async_trait]
impl<T: ChainInfoSource + ?Sized> ChainInfoSource for Box<T> {
    async fn latest_block_info(&self) -> Result<ChainSnapshot> {
        (**self).latest_block_info().await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Build the source selected by `config`.
pub fn from_config(config: &LuckyMintConfig) -> Result<Box<dyn ChainInfoSource>> {
    let http_client = Client::builder()
        .timeout(Duration::from_secs(config.request_timeout_seconds))
        .build()
        .context("Failed to build HTTP client")?;

    let source: Box<dyn ChainInfoSource> = match &config.chain_source {
        ChainSourceConfig::Explorer { url } => {
            Box::new(BlockchainInfoClient::new(http_client, url.clone()))
        }
        ChainSourceConfig::Node { url, auth } => {
            Box::new(BitcoinRpcClient::new(http_client, url.clone(), auth)?)
        }
    };
    Ok(source)
}
