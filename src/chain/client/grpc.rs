use async_trait::async_trait;
use cosmos_sdk_proto::cosmos::auth::v1beta1::{
    query_client::QueryClient as AuthQueryClient, QueryAccountRequest,
};
use cosmos_sdk_proto::cosmos::tx::v1beta1::{
    service_client::ServiceClient, BroadcastMode, BroadcastTxRequest, GetTxRequest,
    SimulateRequest,
};
use cosmos_sdk_proto::cosmwasm::wasm::v1::{
    query_client::QueryClient as WasmQueryClient, QuerySmartContractStateRequest,
};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::time::Duration;
use tonic::transport::{Channel, ClientTlsConfig, Endpoint};
use tonic::Code;

use super::ChainClient;
use crate::chain::account_types::{AccountInfo, ChainAccount};
use crate::chain::outcome::TxOutcome;
use crate::config::NetworkConfig;
use crate::error::{Error, Result};

/// gRPC client for a Terra node
#[derive(Clone)]
pub struct GrpcClient {
    config: NetworkConfig,
    channel: Option<Channel>,
}

impl GrpcClient {
    pub fn new(config: NetworkConfig) -> Self {
        Self {
            config,
            channel: None,
        }
    }

    /// Connect to the gRPC endpoint
    pub async fn connect(&mut self) -> Result<()> {
        log::info!("Connecting to {} at {}", self.config.chain_id, self.config.grpc_endpoint);

        let mut endpoint = Endpoint::from_shared(self.config.grpc_endpoint.clone())?
            .timeout(Duration::from_secs(self.config.request_timeout))
            .connect_timeout(Duration::from_secs(self.config.connection_timeout));

        if self.config.grpc_endpoint.starts_with("https://") {
            endpoint = endpoint.tls_config(ClientTlsConfig::new())?;
        }

        self.channel = Some(endpoint.connect().await?);

        log::info!("Connected to {}", self.config.chain_id);
        Ok(())
    }

    pub fn is_connected(&self) -> bool {
        self.channel.is_some()
    }

    fn channel(&self) -> Result<Channel> {
        self.channel.clone().ok_or(Error::NotConnected)
    }

    /// Poll for the transaction until it shows up in a block
    async fn wait_for_tx(&self, tx_hash: &str) -> Result<TxOutcome> {
        let interval = Duration::from_millis(self.config.tx_poll_interval_ms);

        for attempt in 1..=self.config.tx_poll_attempts {
            tokio::time::sleep(interval).await;

            let mut client = ServiceClient::new(self.channel()?);
            let request = tonic::Request::new(GetTxRequest {
                hash: tx_hash.to_string(),
            });

            match client.get_tx(request).await {
                Ok(response) => {
                    if let Some(tx_response) = response.into_inner().tx_response {
                        log::info!(
                            "Transaction {} included at height {} (code {})",
                            tx_hash,
                            tx_response.height,
                            tx_response.code
                        );
                        return Ok(tx_response.into());
                    }
                }
                Err(status) if is_tx_not_found(&status) => {
                    log::debug!("Transaction {} not in a block yet (check {})", tx_hash, attempt);
                }
                Err(status) => return Err(status.into()),
            }
        }

        Err(Error::TxTimeout(tx_hash.to_string()))
    }

    /// Retry helper for read-only network operations
    async fn with_retry<T, F, Fut>(&self, f: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        let mut retries = 0;
        loop {
            match f().await {
                Ok(result) => return Ok(result),
                Err(e) if retries < self.config.max_retries && is_transient(&e) => {
                    retries += 1;
                    log::debug!("Transient error, retry {}: {}", retries, e);
                    tokio::time::sleep(Duration::from_millis(100 * retries as u64)).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[async_trait]
impl ChainClient for GrpcClient {
    async fn account(&self, address: &str) -> Result<AccountInfo> {
        let response = self
            .with_retry(|| async move {
                let mut client = AuthQueryClient::new(self.channel()?);
                let request = tonic::Request::new(QueryAccountRequest {
                    address: address.to_string(),
                });
                Ok::<_, Error>(client.account(request).await?)
            })
            .await;

        let response = match response {
            Ok(response) => response,
            Err(Error::Grpc(status)) if status.code() == Code::NotFound => {
                log::info!("Account {} not found, treating it as new", address);
                return Ok(AccountInfo {
                    address: address.to_string(),
                    ..Default::default()
                });
            }
            Err(e) => return Err(e),
        };

        let account_any = response
            .into_inner()
            .account
            .ok_or_else(|| Error::UnexpectedResponse("account query returned no account".into()))?;

        let account = ChainAccount::decode_any(&account_any.type_url, &account_any.value)?;
        log::debug!("Decoded account type: {}", account.account_type());

        account.account_info().ok_or_else(|| {
            Error::UnexpectedResponse(format!(
                "account type {} carries no sequence",
                account.account_type()
            ))
        })
    }

    async fn simulate(&self, tx_bytes: Vec<u8>) -> Result<u64> {
        let mut client = ServiceClient::new(self.channel()?);
        let request = tonic::Request::new(SimulateRequest {
            tx_bytes,
            ..Default::default()
        });

        let gas_info = client
            .simulate(request)
            .await?
            .into_inner()
            .gas_info
            .ok_or_else(|| Error::UnexpectedResponse("no gas info in simulation response".into()))?;

        log::debug!("Simulation used {} gas", gas_info.gas_used);
        Ok(gas_info.gas_used)
    }

    async fn broadcast(&self, tx_bytes: Vec<u8>) -> Result<TxOutcome> {
        let local_hash = hex::encode_upper(Sha256::digest(&tx_bytes));
        log::info!("Broadcasting transaction {} ({} bytes)", local_hash, tx_bytes.len());

        let mut client = ServiceClient::new(self.channel()?);
        let request = tonic::Request::new(BroadcastTxRequest {
            tx_bytes,
            mode: BroadcastMode::Sync as i32,
        });

        let tx_response = client
            .broadcast_tx(request)
            .await?
            .into_inner()
            .tx_response
            .ok_or_else(|| Error::UnexpectedResponse("no tx response in broadcast response".into()))?;

        if tx_response.code != 0 {
            return Err(Error::CheckTx {
                code: tx_response.code,
                raw_log: tx_response.raw_log,
            });
        }

        self.wait_for_tx(&tx_response.txhash).await
    }

    async fn query_contract_smart(&self, address: &str, query: Vec<u8>) -> Result<Value> {
        let query = &query;
        let response = self
            .with_retry(|| async move {
                let mut client = WasmQueryClient::new(self.channel()?);
                let request = tonic::Request::new(QuerySmartContractStateRequest {
                    address: address.to_string(),
                    query_data: query.clone(),
                });

                log::debug!(
                    "Querying contract {} with message: {}",
                    address,
                    String::from_utf8_lossy(query)
                );
                Ok::<_, Error>(client.smart_contract_state(request).await?)
            })
            .await?;

        Ok(serde_json::from_slice(&response.into_inner().data)?)
    }

    fn disconnect(&mut self) {
        if self.channel.take().is_some() {
            log::info!("Disconnected from {}", self.config.chain_id);
        }
    }
}

fn is_tx_not_found(status: &tonic::Status) -> bool {
    status.code() == Code::NotFound || status.message().contains("not found")
}

fn is_transient(error: &Error) -> bool {
    match error {
        Error::Transport(_) => true,
        Error::Grpc(status) => matches!(
            status.code(),
            Code::Unavailable | Code::DeadlineExceeded | Code::ResourceExhausted | Code::Aborted
        ),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = GrpcClient::new(NetworkConfig::local());
        assert!(!client.is_connected());
        assert!(matches!(client.channel(), Err(Error::NotConnected)));
    }

    #[tokio::test]
    async fn test_calls_before_connect_fail() {
        let client = GrpcClient::new(NetworkConfig::local());
        let result = client.simulate(vec![1, 2, 3]).await;
        assert!(matches!(result, Err(Error::NotConnected)));
    }

    #[test]
    fn test_transient_classification() {
        assert!(is_transient(&Error::Grpc(tonic::Status::unavailable("node down"))));
        assert!(!is_transient(&Error::Grpc(tonic::Status::not_found("no account"))));
        assert!(!is_transient(&Error::Grpc(tonic::Status::unknown("Generic error: query failed"))));
        assert!(!is_transient(&Error::NotConnected));
    }

    #[test]
    fn test_tx_not_found_detection() {
        assert!(is_tx_not_found(&tonic::Status::not_found("tx")));
        assert!(is_tx_not_found(&tonic::Status::unknown("tx (ABC) not found")));
        assert!(!is_tx_not_found(&tonic::Status::unavailable("down")));
    }

    #[test]
    fn test_disconnect_is_idempotent() {
        let mut client = GrpcClient::new(NetworkConfig::local());
        client.disconnect();
        client.disconnect();
        assert!(!client.is_connected());
    }
}
