use cosmos_sdk_proto::cosmwasm::wasm::v1::MsgExecuteContract;
use cosmos_sdk_proto::Any;
use cosmwasm_std::Coin;
use prost::Message as _;
use serde::{Serialize, Serializer};
use serde_json::Value;

use super::{to_proto_coins, MessageBuilder, MSG_EXECUTE_CONTRACT_TYPE_URL};
use crate::error::Result;
use crate::json;

/// Pending call of a method on an instantiated contract
#[derive(Debug, Clone, PartialEq)]
pub struct Execute {
    pub contract: String,
    /// Normalized execute payload, e.g. `{"reserve_nft": {}}`
    pub json: Value,
    pub funds: Vec<Coin>,
}

impl Execute {
    /// Build from any serializable payload; contract handles and nested
    /// messages inside it are normalized
    pub fn new<T: Serialize + ?Sized>(contract: impl Into<String>, msg: &T) -> Result<Self> {
        Ok(Self {
            contract: contract.into(),
            json: json::to_json(msg)?,
            funds: vec![],
        })
    }

    pub fn with_funds(mut self, funds: Vec<Coin>) -> Self {
        self.funds = funds;
        self
    }
}

impl MessageBuilder for Execute {
    fn to_any(&self, sender: &str) -> Result<Any> {
        let msg = MsgExecuteContract {
            sender: sender.to_string(),
            contract: self.contract.clone(),
            msg: serde_json::to_vec(&self.json)?,
            funds: to_proto_coins(&self.funds),
        };
        Ok(Any {
            type_url: MSG_EXECUTE_CONTRACT_TYPE_URL.to_string(),
            value: msg.encode_to_vec(),
        })
    }
}

/// A pending execute message stands in for its payload wherever it is embedded
impl Serialize for Execute {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.json.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cosmwasm_std::coins;
    use serde_json::json;

    #[test]
    fn test_execute_encoding() {
        let msg = Execute::new("terra1dist", &json!({"reserve_nft": {}}))
            .unwrap()
            .with_funds(coins(1_000_000, "uluna"));

        let any = msg.to_any("terra1sender").unwrap();
        assert_eq!(any.type_url, MSG_EXECUTE_CONTRACT_TYPE_URL);

        let decoded = MsgExecuteContract::decode(&any.value[..]).unwrap();
        assert_eq!(decoded.sender, "terra1sender");
        assert_eq!(decoded.contract, "terra1dist");
        assert_eq!(decoded.msg, br#"{"reserve_nft":{}}"#.to_vec());
        assert_eq!(decoded.funds[0].denom, "uluna");
        assert_eq!(decoded.funds[0].amount, "1000000");
    }
}
