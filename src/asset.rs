use cosmwasm_std::Uint128;
use serde::{Deserialize, Serialize};

/// Which fungible token an asset refers to
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AssetInfo {
    Token { contract_addr: String },
    NativeToken { denom: String },
}

impl AssetInfo {
    pub fn native(denom: impl Into<String>) -> Self {
        AssetInfo::NativeToken {
            denom: denom.into(),
        }
    }

    pub fn token(contract_addr: impl Into<String>) -> Self {
        AssetInfo::Token {
            contract_addr: contract_addr.into(),
        }
    }

    pub fn is_native(&self) -> bool {
        matches!(self, AssetInfo::NativeToken { .. })
    }
}

/// An amount of a fungible token
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Asset {
    pub info: AssetInfo,
    pub amount: Uint128,
}

/// Asset of a chain-native denomination
pub fn native_asset(denom: impl Into<String>, amount: impl Into<Uint128>) -> Asset {
    Asset {
        info: AssetInfo::native(denom),
        amount: amount.into(),
    }
}

/// Asset issued by a CW20 token contract
pub fn token_asset(contract_addr: impl Into<String>, amount: impl Into<Uint128>) -> Asset {
    Asset {
        info: AssetInfo::token(contract_addr),
        amount: amount.into(),
    }
}
