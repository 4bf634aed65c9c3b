mod execute;
mod instantiate;
mod send;
mod store_code;

pub use execute::Execute;
pub use instantiate::Instantiate;
pub use send::SendTokens;
pub use store_code::StoreCode;

use cosmos_sdk_proto::cosmos::base::v1beta1::Coin as ProtoCoin;
use cosmos_sdk_proto::Any;
use cosmwasm_std::Coin;

use crate::error::Result;

pub const MSG_EXECUTE_CONTRACT_TYPE_URL: &str = "/cosmwasm.wasm.v1.MsgExecuteContract";
pub const MSG_INSTANTIATE_CONTRACT_TYPE_URL: &str = "/cosmwasm.wasm.v1.MsgInstantiateContract";
pub const MSG_STORE_CODE_TYPE_URL: &str = "/cosmwasm.wasm.v1.MsgStoreCode";
pub const MSG_SEND_TYPE_URL: &str = "/cosmos.bank.v1beta1.MsgSend";

/// A chain message that has not been signed or broadcast yet.
/// The sender is filled in by the session that submits it.
pub trait MessageBuilder {
    /// Encode as a protobuf `Any` sent by `sender`
    fn to_any(&self, sender: &str) -> Result<Any>;
}

/// Any message the session knows how to submit
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Execute(Execute),
    Instantiate(Instantiate),
    Send(SendTokens),
    StoreCode(StoreCode),
}

impl MessageBuilder for Message {
    fn to_any(&self, sender: &str) -> Result<Any> {
        match self {
            Message::Execute(msg) => msg.to_any(sender),
            Message::Instantiate(msg) => msg.to_any(sender),
            Message::Send(msg) => msg.to_any(sender),
            Message::StoreCode(msg) => msg.to_any(sender),
        }
    }
}

impl From<Execute> for Message {
    fn from(msg: Execute) -> Self {
        Message::Execute(msg)
    }
}

impl From<Instantiate> for Message {
    fn from(msg: Instantiate) -> Self {
        Message::Instantiate(msg)
    }
}

impl From<SendTokens> for Message {
    fn from(msg: SendTokens) -> Self {
        Message::Send(msg)
    }
}

impl From<StoreCode> for Message {
    fn from(msg: StoreCode) -> Self {
        Message::StoreCode(msg)
    }
}

/// Convert coins to their proto form, sorted by denom as the bank module requires
pub(crate) fn to_proto_coins(coins: &[Coin]) -> Vec<ProtoCoin> {
    let mut proto: Vec<ProtoCoin> = coins
        .iter()
        .map(|c| ProtoCoin {
            denom: c.denom.clone(),
            amount: c.amount.to_string(),
        })
        .collect();
    proto.sort_by(|a, b| a.denom.cmp(&b.denom));
    proto
}
