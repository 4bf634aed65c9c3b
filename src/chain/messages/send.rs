use cosmos_sdk_proto::cosmos::bank::v1beta1::MsgSend;
use cosmos_sdk_proto::Any;
use cosmwasm_std::Coin;
use prost::Message as _;

use super::{to_proto_coins, MessageBuilder, MSG_SEND_TYPE_URL};
use crate::error::Result;

/// Pending bank transfer of native tokens
#[derive(Debug, Clone, PartialEq)]
pub struct SendTokens {
    pub recipient: String,
    pub amount: Vec<Coin>,
}

impl SendTokens {
    pub fn new(recipient: impl Into<String>, amount: Vec<Coin>) -> Self {
        Self {
            recipient: recipient.into(),
            amount,
        }
    }
}

impl MessageBuilder for SendTokens {
    fn to_any(&self, sender: &str) -> Result<Any> {
        let msg = MsgSend {
            from_address: sender.to_string(),
            to_address: self.recipient.clone(),
            amount: to_proto_coins(&self.amount),
        };
        Ok(Any {
            type_url: MSG_SEND_TYPE_URL.to_string(),
            value: msg.encode_to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cosmwasm_std::coins;

    #[test]
    fn test_send_encoding() {
        let any = SendTokens::new("terra1recipient", coins(42, "uluna"))
            .to_any("terra1sender")
            .unwrap();
        let decoded = MsgSend::decode(&any.value[..]).unwrap();
        assert_eq!(decoded.from_address, "terra1sender");
        assert_eq!(decoded.to_address, "terra1recipient");
        assert_eq!(decoded.amount[0].amount, "42");
    }
}
