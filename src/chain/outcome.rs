use cosmos_sdk_proto::cosmos::base::abci::v1beta1::TxResponse;
use std::collections::BTreeMap;

use crate::error::{Error, Result};

/// An event emitted while executing one message of a transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxEvent {
    pub kind: String,
    pub attributes: Vec<(String, String)>,
}

/// Events emitted by the message at `msg_index`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxLog {
    pub msg_index: u32,
    pub events: Vec<TxEvent>,
}

impl TxLog {
    /// Attribute values grouped by key for every event of type `kind`,
    /// in emission order
    pub fn events_by_type(&self, kind: &str) -> BTreeMap<String, Vec<String>> {
        let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for event in self.events.iter().filter(|e| e.kind == kind) {
            for (key, value) in &event.attributes {
                grouped.entry(key.clone()).or_default().push(value.clone());
            }
        }
        grouped
    }
}

/// Result of a transaction that made it into a block
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TxOutcome {
    pub tx_hash: String,
    pub height: i64,
    /// Zero on success; anything else is an execution failure
    pub code: u32,
    pub raw_log: String,
    pub gas_wanted: i64,
    pub gas_used: i64,
    pub logs: Vec<TxLog>,
    /// Block events for the whole transaction. Since SDK 0.50 nodes leave
    /// `logs` empty and tag each message's events with `msg_index` here.
    pub events: Vec<TxEvent>,
}

impl TxOutcome {
    pub fn is_tx_error(&self) -> bool {
        self.code != 0
    }

    /// Events of the first message, from its log or else from the tagged
    /// transaction events
    fn first_message(&self) -> Option<TxLog> {
        if let Some(log) = self.logs.first() {
            return Some(log.clone());
        }

        let tagged = self.events.iter().any(|e| msg_index(e).is_some());
        let events: Vec<TxEvent> = self
            .events
            .iter()
            .filter(|e| !tagged || msg_index(e) == Some("0"))
            .cloned()
            .collect();
        if events.is_empty() {
            None
        } else {
            Some(TxLog { msg_index: 0, events })
        }
    }

    /// Code id assigned by the first store-code message
    pub fn code_id(&self) -> Result<u64> {
        let log = self.first_message().ok_or(Error::CodeIdParse)?;
        log.events_by_type("store_code")
            .get("code_id")
            .and_then(|ids| ids.first())
            .and_then(|id| id.parse().ok())
            .ok_or(Error::CodeIdParse)
    }

    /// Address of the contract created by the first instantiate message
    pub fn contract_address(&self) -> Result<String> {
        let log = self.first_message().ok_or(Error::AddressParse)?;

        let current = log.events_by_type("instantiate");
        let legacy = log.events_by_type("instantiate_contract");
        current
            .get("_contract_address")
            .or_else(|| legacy.get("contract_address"))
            .and_then(|addrs| addrs.last())
            .cloned()
            .ok_or(Error::AddressParse)
    }
}

fn msg_index(event: &TxEvent) -> Option<&str> {
    event
        .attributes
        .iter()
        .find(|(key, _)| key == "msg_index")
        .map(|(_, value)| value.as_str())
}

fn attribute_text(raw: impl AsRef<[u8]>) -> String {
    String::from_utf8_lossy(raw.as_ref()).into_owned()
}

impl From<TxResponse> for TxOutcome {
    fn from(response: TxResponse) -> Self {
        let logs = response
            .logs
            .into_iter()
            .map(|log| TxLog {
                msg_index: log.msg_index,
                events: log
                    .events
                    .into_iter()
                    .map(|event| TxEvent {
                        kind: event.r#type,
                        attributes: event
                            .attributes
                            .into_iter()
                            .map(|attr| (attr.key, attr.value))
                            .collect(),
                    })
                    .collect(),
            })
            .collect();

        let events = response
            .events
            .into_iter()
            .map(|event| TxEvent {
                kind: event.r#type,
                attributes: event
                    .attributes
                    .into_iter()
                    .map(|attr| (attribute_text(attr.key), attribute_text(attr.value)))
                    .collect(),
            })
            .collect();

        Self {
            tx_hash: response.txhash,
            height: response.height,
            code: response.code,
            raw_log: response.raw_log,
            gas_wanted: response.gas_wanted,
            gas_used: response.gas_used,
            logs,
            events,
        }
    }
}
