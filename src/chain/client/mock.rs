/// In-memory chain used by unit tests. Checks signer sequences the way a node
/// would, records every transaction it includes, and routes contract calls to
/// a pluggable `MockContracts` implementation. A transaction whose message
/// fails leaves no contract state behind.

use async_trait::async_trait;
use cosmos_sdk_proto::cosmos::bank::v1beta1::MsgSend;
use cosmos_sdk_proto::cosmos::base::v1beta1::Coin as ProtoCoin;
use cosmos_sdk_proto::cosmos::tx::v1beta1::{AuthInfo, TxBody, TxRaw};
use cosmos_sdk_proto::cosmwasm::wasm::v1::{
    MsgExecuteContract, MsgInstantiateContract, MsgStoreCode,
};
use cosmos_sdk_proto::Any;
use prost::Message;
use serde_json::{json, Value};
use sha2::{Digest, Sha256};
use std::sync::{Arc, Mutex, MutexGuard};

use super::ChainClient;
use crate::chain::account_types::AccountInfo;
use crate::chain::messages::{
    MSG_EXECUTE_CONTRACT_TYPE_URL, MSG_INSTANTIATE_CONTRACT_TYPE_URL, MSG_SEND_TYPE_URL,
    MSG_STORE_CODE_TYPE_URL,
};
use crate::chain::outcome::{TxEvent, TxLog, TxOutcome};
use crate::error::{Error, Result};

/// Contract behaviour behind the mock chain
pub(crate) trait MockContracts: Send + SnapshotContracts {
    fn instantiate(
        &mut self,
        sender: &str,
        code_id: u64,
        msg: &Value,
        funds: &[ProtoCoin],
    ) -> std::result::Result<String, String>;

    fn execute(
        &mut self,
        sender: &str,
        contract: &str,
        msg: &Value,
        funds: &[ProtoCoin],
    ) -> std::result::Result<(), String>;

    fn query(&self, contract: &str, msg: &Value) -> std::result::Result<Value, String>;
}

/// Copy of the contract state, restored when a transaction fails
pub(crate) trait SnapshotContracts {
    fn snapshot(&self) -> Box<dyn MockContracts>;
}

impl<T: MockContracts + Clone + 'static> SnapshotContracts for T {
    fn snapshot(&self) -> Box<dyn MockContracts> {
        Box::new(self.clone())
    }
}

/// Accepts everything; queries echo the request back
#[derive(Default, Clone)]
pub(crate) struct EchoContracts {
    instantiated: u64,
}

impl MockContracts for EchoContracts {
    fn instantiate(
        &mut self,
        _sender: &str,
        _code_id: u64,
        _msg: &Value,
        _funds: &[ProtoCoin],
    ) -> std::result::Result<String, String> {
        self.instantiated += 1;
        Ok(format!("terra1contract{}", self.instantiated))
    }

    fn execute(
        &mut self,
        _sender: &str,
        _contract: &str,
        msg: &Value,
        _funds: &[ProtoCoin],
    ) -> std::result::Result<(), String> {
        match msg.get("fail") {
            Some(reason) => Err(format!("execute wasm contract failed: {}", reason)),
            None => Ok(()),
        }
    }

    fn query(&self, contract: &str, msg: &Value) -> std::result::Result<Value, String> {
        Ok(json!({"contract": contract, "query": msg}))
    }
}

/// A transaction the mock chain included
pub(crate) struct RecordedTx {
    pub messages: Vec<Any>,
    pub sequence: u64,
    pub gas_limit: u64,
    pub fee: Vec<ProtoCoin>,
}

pub(crate) struct MockLedger {
    pub account_number: u64,
    /// Next sequence the chain accepts
    pub sequence: u64,
    pub txs: Vec<RecordedTx>,
    pub account_queries: usize,
    pub gas_per_simulation: u64,
    /// Refuse the next broadcast at check-tx with this log
    pub reject_next: Option<String>,
    /// Fail the next broadcast as if the node were unreachable
    pub unavailable_next: bool,
    pub fail_account_queries: bool,
    pub disconnects: usize,
    next_code_id: u64,
    contracts: Box<dyn MockContracts>,
}

#[derive(Clone)]
pub(crate) struct MockChain {
    ledger: Arc<Mutex<MockLedger>>,
}

impl MockChain {
    pub fn new() -> Self {
        Self::with_contracts(EchoContracts::default())
    }

    pub fn with_contracts(contracts: impl MockContracts + 'static) -> Self {
        Self {
            ledger: Arc::new(Mutex::new(MockLedger {
                account_number: 1,
                sequence: 0,
                txs: vec![],
                account_queries: 0,
                gas_per_simulation: 100_000,
                reject_next: None,
                unavailable_next: false,
                fail_account_queries: false,
                disconnects: 0,
                next_code_id: 1,
                contracts: Box::new(contracts),
            })),
        }
    }

    pub fn ledger(&self) -> MutexGuard<'_, MockLedger> {
        self.ledger.lock().unwrap()
    }

    /// Messages of every included transaction, as type urls
    pub fn tx_type_urls(&self) -> Vec<Vec<String>> {
        self.ledger()
            .txs
            .iter()
            .map(|tx| tx.messages.iter().map(|m| m.type_url.clone()).collect())
            .collect()
    }
}

impl MockLedger {
    fn apply(&mut self, msg: &Any) -> std::result::Result<TxEvent, String> {
        let decode_err = |e: prost::DecodeError| e.to_string();
        let json_err = |e: serde_json::Error| e.to_string();

        match msg.type_url.as_str() {
            MSG_STORE_CODE_TYPE_URL => {
                MsgStoreCode::decode(&msg.value[..]).map_err(decode_err)?;
                let code_id = self.next_code_id;
                self.next_code_id += 1;
                Ok(event("store_code", &[("code_id", code_id.to_string())]))
            }
            MSG_INSTANTIATE_CONTRACT_TYPE_URL => {
                let inst = MsgInstantiateContract::decode(&msg.value[..]).map_err(decode_err)?;
                let init: Value = serde_json::from_slice(&inst.msg).map_err(json_err)?;
                let address = self
                    .contracts
                    .instantiate(&inst.sender, inst.code_id, &init, &inst.funds)?;
                Ok(event(
                    "instantiate",
                    &[("_contract_address", address), ("code_id", inst.code_id.to_string())],
                ))
            }
            MSG_EXECUTE_CONTRACT_TYPE_URL => {
                let exec = MsgExecuteContract::decode(&msg.value[..]).map_err(decode_err)?;
                let payload: Value = serde_json::from_slice(&exec.msg).map_err(json_err)?;
                self.contracts
                    .execute(&exec.sender, &exec.contract, &payload, &exec.funds)?;
                Ok(event("execute", &[("_contract_address", exec.contract)]))
            }
            MSG_SEND_TYPE_URL => {
                let send = MsgSend::decode(&msg.value[..]).map_err(decode_err)?;
                Ok(event("transfer", &[("recipient", send.to_address)]))
            }
            other => Err(format!("unknown message type {}", other)),
        }
    }
}

fn event(kind: &str, attributes: &[(&str, String)]) -> TxEvent {
    TxEvent {
        kind: kind.to_string(),
        attributes: attributes
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect(),
    }
}

#[async_trait]
impl ChainClient for MockChain {
    async fn account(&self, address: &str) -> Result<AccountInfo> {
        let mut ledger = self.ledger();
        ledger.account_queries += 1;
        if ledger.fail_account_queries {
            return Err(Error::Grpc(tonic::Status::unavailable("account query failed")));
        }
        Ok(AccountInfo {
            address: address.to_string(),
            sequence: ledger.sequence,
            account_number: ledger.account_number,
        })
    }

    async fn simulate(&self, _tx_bytes: Vec<u8>) -> Result<u64> {
        Ok(self.ledger().gas_per_simulation)
    }

    async fn broadcast(&self, tx_bytes: Vec<u8>) -> Result<TxOutcome> {
        let mut ledger = self.ledger();

        if std::mem::take(&mut ledger.unavailable_next) {
            return Err(Error::Grpc(tonic::Status::unavailable("connection reset")));
        }
        if let Some(raw_log) = ledger.reject_next.take() {
            return Err(Error::CheckTx { code: 13, raw_log });
        }

        let raw = TxRaw::decode(&tx_bytes[..])?;
        let body = TxBody::decode(&raw.body_bytes[..])?;
        let auth_info = AuthInfo::decode(&raw.auth_info_bytes[..])?;

        let sequence = auth_info.signer_infos.first().map(|s| s.sequence).unwrap_or_default();
        if sequence != ledger.sequence {
            return Err(Error::CheckTx {
                code: 32,
                raw_log: format!(
                    "account sequence mismatch, expected {}, got {}: incorrect account sequence",
                    ledger.sequence, sequence
                ),
            });
        }

        let fee = auth_info.fee.unwrap_or_default();
        ledger.txs.push(RecordedTx {
            messages: body.messages.clone(),
            sequence,
            gas_limit: fee.gas_limit,
            fee: fee.amount,
        });
        ledger.sequence += 1;

        let mut outcome = TxOutcome {
            tx_hash: hex::encode_upper(Sha256::digest(&tx_bytes)),
            height: ledger.txs.len() as i64,
            gas_wanted: fee.gas_limit as i64,
            gas_used: ledger.gas_per_simulation as i64,
            ..Default::default()
        };

        let staged_contracts = ledger.contracts.snapshot();
        let staged_code_id = ledger.next_code_id;

        for (index, msg) in body.messages.iter().enumerate() {
            match ledger.apply(msg) {
                Ok(event) => outcome.logs.push(TxLog {
                    msg_index: index as u32,
                    events: vec![event],
                }),
                Err(raw_log) => {
                    ledger.contracts = staged_contracts;
                    ledger.next_code_id = staged_code_id;
                    outcome.code = 5;
                    outcome.raw_log =
                        format!("failed to execute message; message index: {}: {}", index, raw_log);
                    outcome.logs.clear();
                    return Ok(outcome);
                }
            }
        }

        Ok(outcome)
    }

    async fn query_contract_smart(&self, address: &str, query: Vec<u8>) -> Result<Value> {
        let msg: Value = serde_json::from_slice(&query)?;
        self.ledger()
            .contracts
            .query(address, &msg)
            .map_err(|e| Error::Grpc(tonic::Status::unknown(e)))
    }

    fn disconnect(&mut self) {
        self.ledger().disconnects += 1;
    }
}
