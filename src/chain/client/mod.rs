mod grpc;
#[cfg(test)]
pub(crate) mod mock;

pub use grpc::GrpcClient;

use async_trait::async_trait;
use serde_json::Value;

use crate::chain::account_types::AccountInfo;
use crate::chain::outcome::TxOutcome;
use crate::error::Result;

/// Everything the session needs from a chain node
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Account number and current sequence. Accounts the chain has not seen
    /// yet report zero for both.
    async fn account(&self, address: &str) -> Result<AccountInfo>;

    /// Simulate signed transaction bytes and return the gas used
    async fn simulate(&self, tx_bytes: Vec<u8>) -> Result<u64>;

    /// Broadcast signed transaction bytes and wait until they are included in
    /// a block. A transaction the node refuses outright is an error; one that
    /// is included but fails comes back as an outcome with a non-zero code.
    async fn broadcast(&self, tx_bytes: Vec<u8>) -> Result<TxOutcome>;

    /// Smart query against a contract, returning the decoded JSON response
    async fn query_contract_smart(&self, address: &str, query: Vec<u8>) -> Result<Value>;

    /// Drop the connection. Safe to call more than once.
    fn disconnect(&mut self);
}
