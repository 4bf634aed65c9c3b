/// Signing session for one key on one network.
///
/// The session owns the chain client and caches the account number and
/// sequence. Every signing operation takes `&mut self`, so a session submits
/// one transaction at a time and the cached sequence always matches what the
/// session itself has broadcast.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::chain::client::{ChainClient, GrpcClient};
use crate::chain::messages::{Instantiate, Message, MessageBuilder, StoreCode};
use crate::chain::outcome::TxOutcome;
use crate::chain::tx_builder::{adjusted_gas, fee_for_gas, TxBuilder};
use crate::chain::wallet::TerraWallet;
use crate::config::{NetworkConfig, DEFAULT_ARTIFACTS_DIR};
use crate::contract::Contract;
use crate::error::{Error, Result};
use crate::json;

pub struct Account<C: ChainClient = GrpcClient> {
    client: C,
    wallet: TerraWallet,
    network: NetworkConfig,
    artifacts_dir: PathBuf,
    account_number: Option<u64>,
    /// Next sequence to sign with; `None` until fetched from the chain
    sequence: Option<u64>,
}

impl Account<GrpcClient> {
    /// Build the wallet and connect to the network's gRPC endpoint.
    ///
    /// Without a mnemonic, a local network falls back to the LocalTerra
    /// `test1` account; any other network is a configuration error.
    pub async fn connect(network: NetworkConfig, mnemonic: Option<&str>) -> Result<Self> {
        let wallet = match mnemonic {
            Some(mnemonic) => TerraWallet::from_mnemonic_no_passphrase(mnemonic)?,
            None if network.is_local() => {
                log::info!("No mnemonic given, using the LocalTerra test1 account");
                TerraWallet::localterra_test1()?
            }
            None => {
                return Err(Error::Config(format!(
                    "a mnemonic is required for network {}",
                    network.chain_id
                )))
            }
        };
        network.gas_price()?;

        let mut client = GrpcClient::new(network.clone());
        client.connect().await?;

        Ok(Self::with_client(client, network, wallet))
    }
}

impl<C: ChainClient> Account<C> {
    pub fn with_client(client: C, network: NetworkConfig, wallet: TerraWallet) -> Self {
        log::info!("Session for {} on {}", wallet.address, network.chain_id);
        Self {
            client,
            wallet,
            network,
            artifacts_dir: PathBuf::from(DEFAULT_ARTIFACTS_DIR),
            account_number: None,
            sequence: None,
        }
    }

    pub fn with_artifacts_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.artifacts_dir = dir.into();
        self
    }

    pub fn address(&self) -> &str {
        &self.wallet.address
    }

    /// Cached next sequence, if one has been fetched
    pub fn sequence(&self) -> Option<u64> {
        self.sequence
    }

    pub fn network(&self) -> &NetworkConfig {
        &self.network
    }

    pub fn artifacts_dir(&self) -> &Path {
        &self.artifacts_dir
    }

    /// Fetch the account number and sequence from the chain
    pub async fn refresh_sequence(&mut self) -> Result<u64> {
        let info = self.client.account(&self.wallet.address).await?;
        log::debug!(
            "Account {} number {} sequence {}",
            self.wallet.address,
            info.account_number,
            info.sequence
        );
        self.account_number = Some(info.account_number);
        self.sequence = Some(info.sequence);
        Ok(info.sequence)
    }

    /// Sign and broadcast a single message
    pub async fn submit(&mut self, msg: impl Into<Message>) -> Result<TxOutcome> {
        self.sign_and_broadcast(&[msg.into()]).await
    }

    /// Submit several messages as one transaction, in order
    pub async fn chain(&mut self, msgs: Vec<Message>) -> Result<TxOutcome> {
        log::info!("Chaining {} messages into one transaction", msgs.len());
        self.sign_and_broadcast(&msgs).await
    }

    /// Simulate, sign, broadcast and wait for inclusion.
    ///
    /// An included transaction advances the cached sequence even when its
    /// execution failed. Chain and network failures refetch the sequence
    /// before the error is returned.
    pub async fn sign_and_broadcast(&mut self, msgs: &[Message]) -> Result<TxOutcome> {
        if msgs.is_empty() {
            return Err(Error::Config("no messages to submit".into()));
        }

        let sender = self.wallet.address.clone();
        let messages = msgs
            .iter()
            .map(|msg| msg.to_any(&sender))
            .collect::<Result<Vec<_>>>()?;

        match self.broadcast_messages(messages).await {
            Err(e) if e.is_chain_failure() => {
                log::warn!("Transaction failed, resyncing sequence: {}", e);
                self.resync().await;
                Err(e)
            }
            result => result,
        }
    }

    async fn broadcast_messages(&mut self, messages: Vec<cosmos_sdk_proto::Any>) -> Result<TxOutcome> {
        let (account_number, sequence) = self.signing_info().await?;
        let gas_price = self.network.gas_price()?;
        let chain_id = self.network.chain_id.as_str();

        let simulation = TxBuilder::new(chain_id, account_number, sequence, &self.wallet)
            .build(messages.clone())?;
        let gas_used = self.client.simulate(simulation).await?;

        let gas_limit = adjusted_gas(gas_used, self.network.gas_adjustment);
        let fee = fee_for_gas(gas_limit, gas_price, &self.network.fee_denom)?;
        log::debug!(
            "Simulated {} gas, limit {} fee {}{}",
            gas_used,
            gas_limit,
            fee.amount,
            fee.denom
        );

        let tx_bytes = TxBuilder::new(chain_id, account_number, sequence, &self.wallet)
            .with_gas_limit(gas_limit)
            .with_fee(vec![fee])
            .build(messages)?;

        let outcome = self.client.broadcast(tx_bytes).await?;
        self.sequence = Some(sequence + 1);

        if outcome.is_tx_error() {
            log::warn!("Transaction {} failed: {}", outcome.tx_hash, outcome.raw_log);
            return Err(Error::TxExecution {
                tx_hash: outcome.tx_hash,
                code: outcome.code,
                raw_log: outcome.raw_log,
            });
        }

        log::info!(
            "Transaction {} succeeded at height {} ({} gas)",
            outcome.tx_hash,
            outcome.height,
            outcome.gas_used
        );
        Ok(outcome)
    }

    async fn signing_info(&mut self) -> Result<(u64, u64)> {
        if let (Some(account_number), Some(sequence)) = (self.account_number, self.sequence) {
            return Ok((account_number, sequence));
        }
        let sequence = self.refresh_sequence().await?;
        Ok((self.account_number.unwrap_or_default(), sequence))
    }

    async fn resync(&mut self) {
        match self.refresh_sequence().await {
            Ok(sequence) => log::info!("Sequence resynced to {}", sequence),
            Err(e) => {
                log::warn!("Could not refetch sequence, will retry on next transaction: {}", e);
                self.sequence = None;
            }
        }
    }

    /// Instantiate a stored code id and return a handle to the new contract
    pub async fn instantiate(&mut self, msg: Instantiate) -> Result<Contract> {
        let code_id = msg.code_id;
        let outcome = self.submit(msg).await?;
        let address = outcome.contract_address()?;
        log::info!("Instantiated code {} at {}", code_id, address);
        Ok(Contract::new(address))
    }

    /// Upload `<artifacts_dir>/<name>.wasm` and return its code id
    pub async fn store_contract(&mut self, name: &str) -> Result<u64> {
        let msg = StoreCode::from_artifacts(&self.artifacts_dir, name)?;
        log::info!("Storing {} ({} bytes)", name, msg.wasm.len());

        let outcome = self.submit(msg).await?;
        let code_id = outcome.code_id()?;
        log::info!("Stored {} as code {}", name, code_id);
        Ok(code_id)
    }

    /// Upload every `.wasm` file in the artifacts directory, in name order
    pub async fn store_contracts(&mut self) -> Result<BTreeMap<String, u64>> {
        if !self.artifacts_dir.is_dir() {
            return Err(Error::Config(format!(
                "artifacts directory {} does not exist",
                self.artifacts_dir.display()
            )));
        }

        let mut names = Vec::new();
        for entry in std::fs::read_dir(&self.artifacts_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("wasm") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();

        let mut code_ids = BTreeMap::new();
        for name in names {
            let code_id = self.store_contract(&name).await?;
            code_ids.insert(name, code_id);
        }
        Ok(code_ids)
    }

    /// Smart query `{method: args}` against `contract`
    pub async fn query<T: Serialize + ?Sized>(
        &self,
        contract: &Contract,
        method: &str,
        args: &T,
    ) -> Result<Value> {
        let payload = json::call(method, args)?;
        self.query_raw(contract, &payload).await
    }

    /// [`query`](Self::query) with the response decoded into `R`
    pub async fn query_as<R, T>(&self, contract: &Contract, method: &str, args: &T) -> Result<R>
    where
        R: DeserializeOwned,
        T: Serialize + ?Sized,
    {
        let response = self.query(contract, method, args).await?;
        Ok(serde_json::from_value(response)?)
    }

    /// Smart query with a payload that is already in its final shape
    pub async fn query_raw<T: Serialize + ?Sized>(
        &self,
        contract: &Contract,
        payload: &T,
    ) -> Result<Value> {
        let query = serde_json::to_vec(&json::to_json(payload)?)?;
        log::debug!("Query {}: {}", contract, String::from_utf8_lossy(&query));
        self.client.query_contract_smart(contract.address(), query).await
    }
}

impl<C: ChainClient> Drop for Account<C> {
    fn drop(&mut self) {
        self.client.disconnect();
    }
}
