use cosmos_sdk_proto::cosmwasm::wasm::v1::MsgInstantiateContract;
use cosmos_sdk_proto::Any;
use cosmwasm_std::Coin;
use prost::Message as _;
use serde::{Serialize, Serializer};
use serde_json::Value;

use super::{to_proto_coins, MessageBuilder, MSG_INSTANTIATE_CONTRACT_TYPE_URL};
use crate::error::Result;
use crate::json;

pub const DEFAULT_LABEL: &str = "terra_deployer";

/// Pending instantiation of a stored code id
#[derive(Debug, Clone, PartialEq)]
pub struct Instantiate {
    pub code_id: u64,
    pub json: Value,
    pub funds: Vec<Coin>,
    pub label: String,
    /// Contract admin; `None` makes the sender the admin
    pub admin: Option<String>,
}

impl Instantiate {
    pub fn new<T: Serialize + ?Sized>(code_id: u64, init_msg: &T) -> Result<Self> {
        Ok(Self {
            code_id,
            json: json::to_json(init_msg)?,
            funds: vec![],
            label: DEFAULT_LABEL.to_string(),
            admin: None,
        })
    }

    pub fn with_funds(mut self, funds: Vec<Coin>) -> Self {
        self.funds = funds;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_admin(mut self, admin: impl Into<String>) -> Self {
        self.admin = Some(admin.into());
        self
    }
}

/// A pending instantiation stands in for its init payload wherever it is embedded
impl Serialize for Instantiate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.json.serialize(serializer)
    }
}

impl MessageBuilder for Instantiate {
    fn to_any(&self, sender: &str) -> Result<Any> {
        let msg = MsgInstantiateContract {
            sender: sender.to_string(),
            admin: self.admin.clone().unwrap_or_else(|| sender.to_string()),
            code_id: self.code_id,
            label: self.label.clone(),
            msg: serde_json::to_vec(&self.json)?,
            funds: to_proto_coins(&self.funds),
        };
        Ok(Any {
            type_url: MSG_INSTANTIATE_CONTRACT_TYPE_URL.to_string(),
            value: msg.encode_to_vec(),
        })
    }
}
