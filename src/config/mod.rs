use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Default location of compiled contract binaries, relative to the working directory
pub const DEFAULT_ARTIFACTS_DIR: &str = "contracts/artifacts";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub network: NetworkConfig,
    pub deploy: DeployConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NetworkKind {
    /// LocalTerra; falls back to the well-known test1 key when none is given
    Local,
    Testnet,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub kind: NetworkKind,
    /// gRPC endpoint URL (e.g., "http://localhost:9090")
    pub grpc_endpoint: String,
    pub chain_id: String,
    /// Gas price per unit of gas, per fee denomination
    pub gas_prices: BTreeMap<String, f64>,
    /// Denomination fees are paid in; must be present in `gas_prices`
    pub fee_denom: String,
    /// Multiplier applied to simulated gas usage
    pub gas_adjustment: f64,
    /// Connection timeout in seconds
    pub connection_timeout: u64,
    /// Request timeout in seconds
    pub request_timeout: u64,
    /// Retry attempts for read-only queries; transactions are never retried
    pub max_retries: u32,
    /// Delay between inclusion checks after a broadcast
    pub tx_poll_interval_ms: u64,
    /// Inclusion checks before a broadcast is reported as timed out
    pub tx_poll_attempts: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeployConfig {
    // Note: the signing mnemonic is provided via DEPLOYER_MNEMONIC or --mnemonic,
    // never stored in the config file.
    pub artifacts_dir: PathBuf,
}

impl NetworkConfig {
    /// LocalTerra defaults
    pub fn local() -> Self {
        Self {
            kind: NetworkKind::Local,
            grpc_endpoint: "http://localhost:9090".to_string(),
            chain_id: "localterra".to_string(),
            gas_prices: BTreeMap::from([
                ("uluna".to_string(), 0.15),
                ("uusd".to_string(), 0.15),
            ]),
            fee_denom: "uluna".to_string(),
            gas_adjustment: 1.5,
            connection_timeout: 10,
            request_timeout: 30,
            max_retries: 3,
            tx_poll_interval_ms: 500,
            tx_poll_attempts: 60,
        }
    }

    /// Public testnet defaults
    pub fn testnet() -> Self {
        Self {
            kind: NetworkKind::Testnet,
            grpc_endpoint: "https://terra-testnet-grpc.polkachu.com:11790".to_string(),
            chain_id: "pisco-1".to_string(),
            gas_prices: BTreeMap::from([("uluna".to_string(), 0.015)]),
            fee_denom: "uluna".to_string(),
            gas_adjustment: 1.5,
            connection_timeout: 10,
            request_timeout: 30,
            max_retries: 3,
            tx_poll_interval_ms: 1000,
            tx_poll_attempts: 60,
        }
    }

    pub fn is_local(&self) -> bool {
        self.kind == NetworkKind::Local
    }

    /// Gas price of the configured fee denomination
    pub fn gas_price(&self) -> Result<f64> {
        self.gas_prices.get(&self.fee_denom).copied().ok_or_else(|| {
            Error::Config(format!(
                "fee denom {} has no entry in the gas price table",
                self.fee_denom
            ))
        })
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self::local()
    }
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            artifacts_dir: PathBuf::from(DEFAULT_ARTIFACTS_DIR),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            network: NetworkConfig::local(),
            deploy: DeployConfig::default(),
        }
    }
}

impl Config {
    pub fn for_network(kind: NetworkKind) -> Self {
        let network = match kind {
            NetworkKind::Local => NetworkConfig::local(),
            NetworkKind::Testnet => NetworkConfig::testnet(),
        };
        Self {
            network,
            deploy: DeployConfig::default(),
        }
    }

    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
