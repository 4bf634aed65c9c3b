/// Subset of the `cw721_base` interface used by deployments
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::account::Account;
use crate::chain::client::ChainClient;
use crate::chain::messages::{Execute, Instantiate};
use crate::contract::Contract;
use crate::error::Result;

pub const CONTRACT_NAME: &str = "cw721_base";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct InstantiateMsg {
    pub name: String,
    pub symbol: String,
    /// The only address allowed to mint
    pub minter: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct MintMsg {
    pub token_id: String,
    pub owner: String,
    pub name: String,
    pub description: Option<String>,
    pub image: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum ExecuteMsg {
    TransferNft { recipient: String, token_id: String },
    Mint(MintMsg),
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum QueryMsg {
    OwnerOf {
        token_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        include_expired: Option<bool>,
    },
    NftInfo { token_id: String },
    NumTokens {},
    ContractInfo {},
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Approval {
    pub spender: String,
    pub expires: Value,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct OwnerOfResponse {
    pub owner: String,
    #[serde(default)]
    pub approvals: Vec<Approval>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct NftInfoResponse {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct NumTokensResponse {
    pub count: u64,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ContractInfoResponse {
    pub name: String,
    pub symbol: String,
}

/// Typed handle to a deployed cw721 contract
#[derive(Debug, Clone, PartialEq)]
pub struct Cw721 {
    contract: Contract,
}

impl Cw721 {
    pub fn new(contract: Contract) -> Self {
        Self { contract }
    }

    pub async fn instantiate<C: ChainClient>(
        account: &mut Account<C>,
        code_id: u64,
        msg: &InstantiateMsg,
    ) -> Result<Self> {
        let contract = account.instantiate(Instantiate::new(code_id, msg)?).await?;
        Ok(Self::new(contract))
    }

    pub fn contract(&self) -> &Contract {
        &self.contract
    }

    pub fn transfer_nft(&self, recipient: &str, token_id: &str) -> Result<Execute> {
        let msg = ExecuteMsg::TransferNft {
            recipient: recipient.to_string(),
            token_id: token_id.to_string(),
        };
        Execute::new(self.contract.address(), &msg)
    }

    async fn query<C: ChainClient, R: DeserializeOwned>(
        &self,
        account: &Account<C>,
        msg: &QueryMsg,
    ) -> Result<R> {
        let response = account.query_raw(&self.contract, msg).await?;
        Ok(serde_json::from_value(response)?)
    }

    pub async fn owner_of<C: ChainClient>(
        &self,
        account: &Account<C>,
        token_id: &str,
    ) -> Result<OwnerOfResponse> {
        let msg = QueryMsg::OwnerOf {
            token_id: token_id.to_string(),
            include_expired: None,
        };
        self.query(account, &msg).await
    }

    pub async fn nft_info<C: ChainClient>(
        &self,
        account: &Account<C>,
        token_id: &str,
    ) -> Result<NftInfoResponse> {
        let msg = QueryMsg::NftInfo {
            token_id: token_id.to_string(),
        };
        self.query(account, &msg).await
    }

    pub async fn num_tokens<C: ChainClient>(&self, account: &Account<C>) -> Result<u64> {
        let response: NumTokensResponse = self.query(account, &QueryMsg::NumTokens {}).await?;
        Ok(response.count)
    }

    pub async fn contract_info<C: ChainClient>(
        &self,
        account: &Account<C>,
    ) -> Result<ContractInfoResponse> {
        self.query(account, &QueryMsg::ContractInfo {}).await
    }
}
