//! Public explorer source (`blockchain.info/latestblock`).

use crate::chain::ChainInfoSource;
use crate::types::ChainSnapshot;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

/// Subset of the explorer's latest block payload.
#[derive(Debug, Deserialize)]
struct LatestBlock {
    height: u64,
    time: i64,
}

/// Reads the chain tip from a blockchain.info compatible endpoint.
pub struct BlockchainInfoClient {
    http_client: Client,
    url: String,
}

impl BlockchainInfoClient {
    pub fn new(http_client: Client, url: impl Into<String>) -> Self {
        Self {
            http_client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl ChainInfoSource for BlockchainInfoClient {
    #[instrument(skip(self), fields(url = %self.url))]
    async fn latest_block_info(&self) -> Result<ChainSnapshot> {
        let response = self
            .http_client
            .get(&self.url)
            .send()
            .await
            .context("Failed to fetch latest block")?;

        if !response.status().is_success() {
            return Err(anyhow!("Failed to fetch latest block: {}", response.status()));
        }

        let block: LatestBlock = response
            .json()
            .await
            .context("Failed to parse latest block")?;

        debug!("Latest block {} at {}", block.height, block.time);
        Ok(ChainSnapshot {
            height: block.height,
            timestamp: block.time,
        })
    }

    fn name(&self) -> &str {
        "blockchain.info"
    }
}
