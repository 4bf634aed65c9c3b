// Library exports for terra_deployer

pub mod account;
pub mod asset;
pub mod chain;
pub mod config;
pub mod contract;
pub mod contracts;
pub mod error;
pub mod json;
pub mod scenario;

// Re-export main types for convenience
pub use account::Account;
pub use asset::{native_asset, token_asset, Asset, AssetInfo};
pub use chain::{ChainClient, GrpcClient, Message, TerraWallet, TxOutcome};
pub use config::{Config, NetworkConfig, NetworkKind};
pub use contract::Contract;
pub use error::{Error, Result};
