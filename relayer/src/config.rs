//! Configuration for the bridge relayer binary.
//!
//! A `type`-discriminated JSON chain list:
//! `{ "chains": [ { "type": "evm", "id": 1, "bridge": "0x...", ... }, ... ] }`.
//! Only `"evm"` chains are implemented; any other `type` is a fatal
//! configuration error surfaced at start-up.

use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use alloy_primitives::Address;
use clap::Parser;
use serde::Deserialize;
use url::Url;

/// CLI flags, each with an environment-variable fallback.
#[derive(Parser, Debug)]
#[command(name = "bridge-relayer")]
#[command(about = "Cross-chain bridge relayer")]
pub struct CliArgs {
    /// Path to the JSON chain configuration file.
    #[arg(long, env = "CONFIG", default_value = "config.json")]
    pub config: PathBuf,

    /// Path to the sled database used for block-height checkpoints.
    #[arg(long, env = "BLOCKSTORE_PATH", default_value = "./blockstore")]
    pub blockstore_path: PathBuf,

    /// Ignore any persisted block heights and restart every chain from its
    /// configured (or latest) start block.
    #[arg(long, env = "FRESH_START", default_value_t = false)]
    pub fresh_start: bool,

    /// When a chain has no persisted height and no configured start block,
    /// start from the chain's current head instead of block 0.
    #[arg(long, env = "LATEST_BLOCK", default_value_t = false)]
    pub latest_block: bool,

    /// Address the health/metrics HTTP endpoint binds to.
    #[arg(long, env = "METRICS_ADDR", default_value = "0.0.0.0:9616")]
    pub metrics_addr: SocketAddr,

    /// Hex-encoded secp256k1 private key used to sign every outgoing vote
    /// transaction. Never logged.
    #[arg(long, env = "PRIVATE_KEY", hide_env_values = true)]
    pub private_key: String,
}

/// One chain participating in the bridge.
#[derive(Debug, Clone, Deserialize)]
pub struct ChainConfig {
    /// Discriminator; only `"evm"` is implemented.
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub id: u8,
    pub endpoint: Url,
    pub bridge: Address,
    #[serde(rename = "erc20Handler")]
    pub erc20_handler: Address,
    #[serde(rename = "startBlock")]
    pub start_block: Option<u64>,

    /// The chain's real EIP-155 id, used for transaction signing. Distinct
    /// from `id` (the bridge's internal [`bridge_types::DomainId`]) and, like
    /// the rest of this field set, never inferred from it. When absent, the
    /// client falls back to whatever `eth_chainId` reports at connect time,
    /// and tolerates that failing too — some networks simply don't return one.
    #[serde(default, rename = "chainId")]
    pub chain_id: Option<u64>,

    #[serde(default)]
    pub use_latest_block: Option<bool>,
    #[serde(default)]
    pub fresh_start: Option<bool>,
    #[serde(default = "default_block_confirmations")]
    pub block_confirmations: u64,
    #[serde(default = "default_block_retry_interval_ms")]
    pub block_retry_interval_ms: u64,
    #[serde(default)]
    pub eip1559: bool,

    /// Fixed gas limit to attach to every outgoing transaction on this
    /// chain, bypassing `eth_estimateGas`. Absent by default.
    #[serde(default)]
    pub gas_limit: Option<u64>,
}

fn default_block_confirmations() -> u64 {
    bridge_core::DEFAULT_BLOCK_DELAY
}

fn default_block_retry_interval_ms() -> u64 {
    bridge_core::DEFAULT_BLOCK_RETRY_INTERVAL.as_millis() as u64
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawConfig {
    pub chains: Vec<ChainConfig>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file at {0}: {1}")]
    FileRead(PathBuf, std::io::Error),
    #[error("failed to parse config file: {0}")]
    JsonParse(#[from] serde_json::Error),
    #[error("chain '{0}': unsupported chain type '{1}', only \"evm\" is implemented")]
    UnsupportedChainType(String, String),
    #[error("no chains configured")]
    NoChains,
    #[error("duplicate domain id {0} configured for chains '{1}' and '{2}'")]
    DuplicateDomain(u8, String, String),
}

impl RawConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|e| ConfigError::FileRead(path.to_path_buf(), e))?;
        let config: RawConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.chains.is_empty() {
            return Err(ConfigError::NoChains);
        }
        let mut seen: Vec<(u8, &str)> = Vec::with_capacity(self.chains.len());
        for chain in &self.chains {
            if chain.kind != "evm" {
                return Err(ConfigError::UnsupportedChainType(
                    chain.name.clone(),
                    chain.kind.clone(),
                ));
            }
            if let Some((_, existing_name)) = seen.iter().find(|(id, _)| *id == chain.id) {
                return Err(ConfigError::DuplicateDomain(
                    chain.id,
                    existing_name.to_string(),
                    chain.name.clone(),
                ));
            }
            seen.push((chain.id, &chain.name));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_evm_chain_type() {
        let cfg = RawConfig {
            chains: vec![ChainConfig {
                kind: "solana".into(),
                name: "sol".into(),
                id: 1,
                endpoint: "http://localhost:8545".parse().unwrap(),
                bridge: Address::ZERO,
                erc20_handler: Address::ZERO,
                start_block: None,
                chain_id: Some(1),
                use_latest_block: None,
                fresh_start: None,
                block_confirmations: 3,
                block_retry_interval_ms: 10_000,
                eip1559: false,
                gas_limit: None,
            }],
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::UnsupportedChainType(_, _))
        ));
    }

    #[test]
    fn rejects_duplicate_domain_ids() {
        let chain = |name: &str, id: u8| ChainConfig {
            kind: "evm".into(),
            name: name.into(),
            id,
            endpoint: "http://localhost:8545".parse().unwrap(),
            bridge: Address::ZERO,
            erc20_handler: Address::ZERO,
            start_block: None,
            chain_id: Some(id as u64),
            use_latest_block: None,
            fresh_start: None,
            block_confirmations: 3,
            block_retry_interval_ms: 10_000,
            eip1559: false,
            gas_limit: None,
        };
        let cfg = RawConfig {
            chains: vec![chain("a", 1), chain("b", 1)],
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::DuplicateDomain(1, _, _))));
    }

    #[test]
    fn rejects_empty_chain_list() {
        let cfg = RawConfig { chains: vec![] };
        assert!(matches!(cfg.validate(), Err(ConfigError::NoChains)));
    }
}
