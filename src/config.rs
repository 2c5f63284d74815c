//! Typed configuration for the lucky mint predictor.

use crate::error::{LuckyMintError, Result};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default lucky mint divisor.
pub const DEFAULT_LUCKY_MINT_THRESHOLD: u64 = 8;
/// Default assumed seconds between blocks (12 minutes).
pub const DEFAULT_BLOCK_INTERVAL_SECONDS: u64 = 60 * 12;
/// Public explorer endpoint returning the latest block.
pub const DEFAULT_EXPLORER_URL: &str = "https://blockchain.info/latestblock";
/// Local Bitcoin Core JSON-RPC endpoint.
pub const DEFAULT_NODE_URL: &str = "http://localhost:8332";
/// HTTP timeout for chain source requests.
pub const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 30;

/// Credentials for a node's JSON-RPC endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RpcAuth {
    /// No authentication
    None,
    /// Explicit username and password
    UserPass { username: String, password: String },
    /// A `user:password` cookie string
    Cookie { cookie: String },
    /// Path to a `.cookie` file containing `user:password`
    CookieFile { path: String },
}

impl Default for RpcAuth {
    fn default() -> Self {
        RpcAuth::None
    }
}

/// Where the current chain tip is read from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChainSourceConfig {
    /// Public block explorer HTTP API
    Explorer {
        url: String,
    },
    /// Bitcoin Core compatible node JSON-RPC
    Node {
        url: String,
        #[serde(default)]
        auth: RpcAuth,
    },
}

impl Default for ChainSourceConfig {
    fn default() -> Self {
        ChainSourceConfig::Explorer {
            url: DEFAULT_EXPLORER_URL.to_string(),
        }
    }
}

impl ChainSourceConfig {
    pub fn url(&self) -> &str {
        match self {
            ChainSourceConfig::Explorer { url } | ChainSourceConfig::Node { url, .. } => url,
        }
    }
}

/// Predictor configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LuckyMintConfig {
    /// Divisor of the eligibility rule
    pub threshold: u64,
    /// Assumed seconds between consecutive blocks
    pub block_interval_seconds: u64,
    /// Chain tip source
    pub chain_source: ChainSourceConfig,
    /// HTTP timeout for chain source requests
    pub request_timeout_seconds: u64,
    /// Optional cap on the number of heights scanned per prediction
    pub max_scan_offset: Option<u64>,
}

impl Default for LuckyMintConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_LUCKY_MINT_THRESHOLD,
            block_interval_seconds: DEFAULT_BLOCK_INTERVAL_SECONDS,
            chain_source: ChainSourceConfig::default(),
            request_timeout_seconds: DEFAULT_REQUEST_TIMEOUT_SECONDS,
            max_scan_offset: None,
        }
    }
}

impl LuckyMintConfig {
    /// Load and validate a JSON configuration file. Missing fields take defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))
            .map_err(|e| LuckyMintError::invalid(format!("{:#}", e)))?;
        Self::from_json_str(&raw)
    }

    /// Parse and validate a JSON configuration string.
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let config: LuckyMintConfig = serde_json::from_str(raw)
            .map_err(|e| LuckyMintError::invalid(format!("malformed config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Check every field invariant.
    pub fn validate(&self) -> Result<()> {
        if self.threshold == 0 {
            return Err(LuckyMintError::invalid("threshold should be greater than 0"));
        }
        if self.block_interval_seconds == 0 {
            return Err(LuckyMintError::invalid(
                "block_interval_seconds should be greater than 0",
            ));
        }
        if self.request_timeout_seconds == 0 {
            return Err(LuckyMintError::invalid(
                "request_timeout_seconds should be greater than 0",
            ));
        }
        if self.max_scan_offset == Some(0) {
            return Err(LuckyMintError::invalid("max_scan_offset should be greater than 0"));
        }
        if self.chain_source.url().trim().is_empty() {
            return Err(LuckyMintError::invalid("chain source url is empty"));
        }
        Ok(())
    }
}

/// Builder for [`LuckyMintConfig`] starting from the defaults.
pub struct LuckyMintConfigBuilder {
    config: LuckyMintConfig,
}

impl LuckyMintConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: LuckyMintConfig::default(),
        }
    }

    /// Start from an existing configuration, e.g. one loaded from a file.
    pub fn from_config(config: LuckyMintConfig) -> Self {
        Self { config }
    }

    pub fn with_threshold(mut self, threshold: u64) -> Self {
        self.config.threshold = threshold;
        self
    }

    pub fn with_block_interval(mut self, seconds: u64) -> Self {
        self.config.block_interval_seconds = seconds;
        self
    }

    /// Read the chain tip from a public explorer.
    pub fn with_explorer(mut self, url: impl Into<String>) -> Self {
        self.config.chain_source = ChainSourceConfig::Explorer { url: url.into() };
        self
    }

    /// Read the chain tip from a node's JSON-RPC endpoint.
    pub fn with_node(mut self, url: impl Into<String>, auth: RpcAuth) -> Self {
        self.config.chain_source = ChainSourceConfig::Node {
            url: url.into(),
            auth,
        };
        self
    }

    pub fn with_request_timeout(mut self, seconds: u64) -> Self {
        self.config.request_timeout_seconds = seconds;
        self
    }

    pub fn with_max_scan_offset(mut self, max_scan_offset: u64) -> Self {
        self.config.max_scan_offset = Some(max_scan_offset);
        self
    }

    /// Validate and return the configuration.
    pub fn build(self) -> Result<LuckyMintConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for LuckyMintConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
