//! Bitcoin Core JSON-RPC source.
//!
//! Reads the tip with three calls: `getblockcount`, `getblockhash`, `getblock`.

use crate::chain::ChainInfoSource;
use crate::config::RpcAuth;
use crate::types::ChainSnapshot;
use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, instrument};

#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct BlockHeader {
    height: u64,
    time: i64,
}

/// JSON-RPC client for a Bitcoin Core compatible node.
pub struct BitcoinRpcClient {
    http_client: Client,
    url: String,
    credentials: Option<(String, String)>,
}

impl BitcoinRpcClient {
    /// Create a client; a cookie file is read once here.
    pub fn new(http_client: Client, url: impl Into<String>, auth: &RpcAuth) -> Result<Self> {
        Ok(Self {
            http_client,
            url: url.into(),
            credentials: resolve_credentials(auth)?,
        })
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T> {
        let payload = json!({
            "jsonrpc": "2.0",
            "id": 0,
            "method": method,
            "params": params,
        });

        let mut request = self.http_client.post(&self.url).json(&payload);
        if let Some((user, password)) = &self.credentials {
            request = request.basic_auth(user, Some(password));
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("Failed to call {}", method))?;

        // Bitcoin Core answers RPC errors with 500 and a JSON body, so try the
        // body before giving up on the status.
        let status = response.status();
        let body = response
            .text()
            .await
            .with_context(|| format!("Failed to read {} response", method))?;

        let parsed: RpcResponse<T> = match serde_json::from_str(&body) {
            Ok(parsed) => parsed,
            Err(e) if status.is_success() => {
                return Err(e).with_context(|| format!("Failed to parse {} response", method))
            }
            Err(_) => bail!("{} failed: {}", method, status),
        };

        if let Some(err) = parsed.error {
            bail!("{} failed: {} (code {})", method, err.message, err.code);
        }
        parsed
            .result
            .ok_or_else(|| anyhow!("{} returned no result", method))
    }
}

#[async_trait]
impl ChainInfoSource for BitcoinRpcClient {
    #[instrument(skip(self), fields(url = %self.url))]
    async fn latest_block_info(&self) -> Result<ChainSnapshot> {
        let height: u64 = self.call("getblockcount", json!([])).await?;
        let hash: String = self.call("getblockhash", json!([height])).await?;
        let block: BlockHeader = self.call("getblock", json!([hash])).await?;

        debug!("Block {} ({}) at {}", block.height, hash, block.time);
        Ok(ChainSnapshot {
            height: block.height,
            timestamp: block.time,
        })
    }

    fn name(&self) -> &str {
        "bitcoin-rpc"
    }
}

fn resolve_credentials(auth: &RpcAuth) -> Result<Option<(String, String)>> {
    match auth {
        RpcAuth::None => Ok(None),
        RpcAuth::UserPass { username, password } => {
            Ok(Some((username.clone(), password.clone())))
        }
        RpcAuth::Cookie { cookie } => split_cookie(cookie).map(Some),
        RpcAuth::CookieFile { path } => {
            let cookie = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read cookie file {}", path))?;
            split_cookie(&cookie).map(Some)
        }
    }
}

fn split_cookie(cookie: &str) -> Result<(String, String)> {
    let (user, password) = cookie
        .trim()
        .split_once(':')
        .ok_or_else(|| anyhow!("cookie should be in user:password form"))?;
    Ok((user.to_string(), password.to_string()))
}
