//! Global CLI options and engine configuration resolution.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use pathtree_model::{EngineConfig, KeyMismatchPolicy};

/// Options shared by every command.
#[derive(Args, Debug, Clone)]
pub struct GlobalOpts {
    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Log debug output to stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Engine configuration file (JSON) (env: PATHTREE_CONFIG)
    #[arg(long, global = true, env = "PATHTREE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Key mismatch policy: warn, ignore or deny
    #[arg(long, global = true)]
    pub key_mismatch: Option<KeyMismatchPolicy>,

    /// Create missing parent containers when grafting
    #[arg(long, global = true)]
    pub create_containers: bool,
}

impl GlobalOpts {
    /// Config file if given, otherwise the environment; flags override either.
    pub fn engine_config(&self) -> Result<EngineConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("read config {}", path.display()))?;
                serde_json::from_str(&text)
                    .with_context(|| format!("parse config {}", path.display()))?
            }
            None => EngineConfig::from_env().context("engine config from environment")?,
        };
        if let Some(policy) = self.key_mismatch {
            config.key_mismatch = policy;
        }
        if self.create_containers {
            config.create_missing_containers = true;
        }
        tracing::debug!(
            key_mismatch = %config.key_mismatch,
            create_missing_containers = config.create_missing_containers,
            "engine config"
        );
        Ok(config)
    }
}
