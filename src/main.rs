//! Lucky mint helper
//!
//! Reads the current chain tip and prints the next N blocks at which the
//! given address wins a lucky mint.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use lucky_mint::chain;
use lucky_mint::config::{
    ChainSourceConfig, LuckyMintConfig, LuckyMintConfigBuilder, RpcAuth, DEFAULT_EXPLORER_URL,
    DEFAULT_NODE_URL,
};
use lucky_mint::lucky::{LuckyMintPredictor, TimestampFormatter};
use std::path::PathBuf;
use tracing::{info, Level};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Source {
    /// Public block explorer
    Explorer,
    /// Local node JSON-RPC
    Node,
}

#[derive(Debug, Parser)]
#[command(about = "Lucky Mint Helper")]
struct Args {
    /// User BTC address
    #[arg(long, short = 'a')]
    address: String,

    /// Number of lucky mints to predict
    #[arg(long, short = 'n', default_value_t = 5)]
    n: usize,

    /// Timezone name such as Asia/Shanghai, default is local time
    #[arg(long, short = 't')]
    timezone: Option<String>,

    /// JSON configuration file
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Override the lucky mint block threshold
    #[arg(long)]
    threshold: Option<u64>,

    /// Override the assumed seconds per block
    #[arg(long)]
    block_interval: Option<u64>,

    /// Give up after scanning this many blocks
    #[arg(long)]
    max_scan_offset: Option<u64>,

    /// Where to read the chain tip from
    #[arg(long, value_enum)]
    source: Option<Source>,

    /// Explorer latest block endpoint
    #[arg(long)]
    explorer_url: Option<String>,

    /// Node JSON-RPC endpoint
    #[arg(long)]
    rpc_url: Option<String>,

    #[arg(long, requires = "rpc_password")]
    rpc_user: Option<String>,

    #[arg(long, requires = "rpc_user")]
    rpc_password: Option<String>,

    /// `user:password` cookie
    #[arg(long, conflicts_with_all = ["rpc_user", "rpc_cookie_file"])]
    rpc_cookie: Option<String>,

    /// Path to the node's .cookie file
    #[arg(long, conflicts_with = "rpc_user")]
    rpc_cookie_file: Option<String>,
}

impl Args {
    /// Credentials given on the command line, if any.
    fn rpc_auth(&self) -> Option<RpcAuth> {
        if let (Some(username), Some(password)) = (&self.rpc_user, &self.rpc_password) {
            Some(RpcAuth::UserPass {
                username: username.clone(),
                password: password.clone(),
            })
        } else if let Some(cookie) = &self.rpc_cookie {
            Some(RpcAuth::Cookie { cookie: cookie.clone() })
        } else {
            self.rpc_cookie_file
                .as_ref()
                .map(|path| RpcAuth::CookieFile { path: path.clone() })
        }
    }

    /// Apply source flags on top of `current`; fields without a flag keep
    /// their configured value.
    fn chain_source(&self, current: ChainSourceConfig) -> ChainSourceConfig {
        let cli_auth = self.rpc_auth();

        // An endpoint or credential flag alone selects its source
        let source = self.source.or(if self.rpc_url.is_some() || cli_auth.is_some() {
            Some(Source::Node)
        } else if self.explorer_url.is_some() {
            Some(Source::Explorer)
        } else {
            None
        });

        match source {
            None => current,
            Some(Source::Explorer) => {
                let configured = match current {
                    ChainSourceConfig::Explorer { url } => Some(url),
                    ChainSourceConfig::Node { .. } => None,
                };
                ChainSourceConfig::Explorer {
                    url: self
                        .explorer_url
                        .clone()
                        .or(configured)
                        .unwrap_or_else(|| DEFAULT_EXPLORER_URL.to_string()),
                }
            }
            Some(Source::Node) => {
                let (configured_url, configured_auth) = match current {
                    ChainSourceConfig::Node { url, auth } => (Some(url), auth),
                    ChainSourceConfig::Explorer { .. } => (None, RpcAuth::None),
                };
                ChainSourceConfig::Node {
                    url: self
                        .rpc_url
                        .clone()
                        .or(configured_url)
                        .unwrap_or_else(|| DEFAULT_NODE_URL.to_string()),
                    auth: cli_auth.unwrap_or(configured_auth),
                }
            }
        }
    }

    fn build_config(&self) -> Result<LuckyMintConfig> {
        let mut base = match &self.config {
            Some(path) => LuckyMintConfig::from_json_file(path)?,
            None => LuckyMintConfig::default(),
        };
        base.chain_source = self.chain_source(base.chain_source);
        let mut builder = LuckyMintConfigBuilder::from_config(base);

        if let Some(threshold) = self.threshold {
            builder = builder.with_threshold(threshold);
        }
        if let Some(seconds) = self.block_interval {
            builder = builder.with_block_interval(seconds);
        }
        if let Some(limit) = self.max_scan_offset {
            builder = builder.with_max_scan_offset(limit);
        }

        Ok(builder.build()?)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    let args = Args::parse();
    let config = args.build_config()?;
    let formatter = TimestampFormatter::from_name(args.timezone.as_deref())?;

    let source = chain::from_config(&config)?;
    info!("Reading chain tip from {}", source.name());

    let predictor = LuckyMintPredictor::new(source, config, formatter)?;
    let lucky_mints = predictor.next_n_lucky_mint(&args.address, args.n).await?;

    let rendered = serde_json::to_string_pretty(&lucky_mints)
        .context("Failed to serialize lucky mints")?;
    println!("Next {} lucky mints: {}", args.n, rendered);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const NODE_CONFIG: &str = r#"{
        "threshold": 4,
        "chain_source": {
            "type": "node",
            "url": "http://10.0.0.5:8332",
            "auth": { "type": "user_pass", "username": "user", "password": "password" }
        }
    }"#;

    fn write_config(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "lucky-mint-{}-{}.json",
            name,
            std::process::id()
        ));
        std::fs::write(&path, contents).unwrap();
        path
    }

    fn file_auth() -> RpcAuth {
        RpcAuth::UserPass {
            username: "user".to_string(),
            password: "password".to_string(),
        }
    }

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["lucky-mint", "--address", "1BvBMSEYstWetqTFn5Au4m4GFg7xJaNVN2"]);
        assert_eq!(args.n, 5);
        assert!(args.timezone.is_none());

        let config = args.build_config().unwrap();
        assert_eq!(config, LuckyMintConfig::default());
    }

    #[test]
    fn test_node_overrides() {
        let args = Args::parse_from([
            "lucky-mint",
            "-a",
            "bc1qar0srrr7xfkvy5l643lydnw9re59gtzzwf5mdq",
            "--source",
            "node",
            "--rpc-cookie",
            "__cookie__:secret",
            "--threshold",
            "64",
        ]);

        let config = args.build_config().unwrap();
        assert_eq!(config.threshold, 64);
        assert_eq!(
            config.chain_source,
            ChainSourceConfig::Node {
                url: DEFAULT_NODE_URL.to_string(),
                auth: RpcAuth::Cookie { cookie: "__cookie__:secret".to_string() },
            }
        );
    }

    #[test]
    fn test_rpc_url_implies_node() {
        let args = Args::parse_from([
            "lucky-mint",
            "-a",
            "1BvBMSEYstWetqTFn5Au4m4GFg7xJaNVN2",
            "--rpc-url",
            "http://127.0.0.1:18332",
            "--rpc-user",
            "user",
            "--rpc-password",
            "password",
        ]);

        let config = args.build_config().unwrap();
        assert_eq!(
            config.chain_source,
            ChainSourceConfig::Node {
                url: "http://127.0.0.1:18332".to_string(),
                auth: RpcAuth::UserPass {
                    username: "user".to_string(),
                    password: "password".to_string(),
                },
            }
        );
    }

    #[test]
    fn test_source_flag_keeps_configured_node() {
        let path = write_config("source-node", NODE_CONFIG);
        let args = Args::parse_from([
            "lucky-mint",
            "-a",
            "1BvBMSEYstWetqTFn5Au4m4GFg7xJaNVN2",
            "-c",
            path.to_str().unwrap(),
            "--source",
            "node",
        ]);

        let config = args.build_config().unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.threshold, 4);
        assert_eq!(
            config.chain_source,
            ChainSourceConfig::Node {
                url: "http://10.0.0.5:8332".to_string(),
                auth: file_auth(),
            }
        );
    }

    #[test]
    fn test_rpc_url_keeps_configured_auth() {
        let path = write_config("rpc-url", NODE_CONFIG);
        let args = Args::parse_from([
            "lucky-mint",
            "-a",
            "1BvBMSEYstWetqTFn5Au4m4GFg7xJaNVN2",
            "-c",
            path.to_str().unwrap(),
            "--rpc-url",
            "http://10.0.0.6:8332",
        ]);

        let config = args.build_config().unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(
            config.chain_source,
            ChainSourceConfig::Node {
                url: "http://10.0.0.6:8332".to_string(),
                auth: file_auth(),
            }
        );
    }

    #[test]
    fn test_credentials_alone_select_node() {
        let args = Args::parse_from([
            "lucky-mint",
            "-a",
            "1BvBMSEYstWetqTFn5Au4m4GFg7xJaNVN2",
            "--rpc-user",
            "u",
            "--rpc-password",
            "p",
        ]);

        let config = args.build_config().unwrap();
        assert_eq!(
            config.chain_source,
            ChainSourceConfig::Node {
                url: DEFAULT_NODE_URL.to_string(),
                auth: RpcAuth::UserPass {
                    username: "u".to_string(),
                    password: "p".to_string(),
                },
            }
        );
    }

    #[test]
    fn test_no_source_flags_keep_file_source() {
        let path = write_config("no-flags", NODE_CONFIG);
        let args = Args::parse_from([
            "lucky-mint",
            "-a",
            "1BvBMSEYstWetqTFn5Au4m4GFg7xJaNVN2",
            "-c",
            path.to_str().unwrap(),
        ]);

        let config = args.build_config().unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(
            config.chain_source,
            ChainSourceConfig::Node {
                url: "http://10.0.0.5:8332".to_string(),
                auth: file_auth(),
            }
        );
    }

    #[test]
    fn test_zero_threshold_rejected() {
        let args = Args::parse_from([
            "lucky-mint",
            "-a",
            "1BvBMSEYstWetqTFn5Au4m4GFg7xJaNVN2",
            "--threshold",
            "0",
        ]);
        assert!(args.build_config().is_err());
    }

    #[test]
    fn test_address_required() {
        assert!(Args::try_parse_from(["lucky-mint"]).is_err());
    }
}
