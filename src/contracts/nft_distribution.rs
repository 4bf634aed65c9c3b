/// Messages and responses of the `galaxy_nft_distribution` contract.
///
/// Buyers reserve an NFT by paying the configured cost; the owner later turns
/// each reservation into a minted token, or the buyer refunds it once
/// `response_seconds` have passed.

use cosmwasm_std::Coin;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::account::Account;
use crate::asset::Asset;
use crate::chain::client::ChainClient;
use crate::chain::messages::{Execute, Instantiate};
use crate::contract::Contract;
use crate::error::Result;

/// Artifact name of the contract binary
pub const CONTRACT_NAME: &str = "galaxy_nft_distribution";

/// The contract caps every page of valid reservations at this many ids
pub const MAX_PAGE_LIMIT: u64 = 32;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct InstantiateMsg {
    /// Address allowed to convert reservations into NFTs
    pub owner: String,
    /// Price of one reservation; must be a native token
    pub cost: Asset,
    pub nft_contract: Option<String>,
    pub limit_per_address: u64,
    /// Most NFTs this distribution may ever mint
    pub nft_limit: u64,
    /// Seconds after which an unfilled reservation can be refunded
    pub response_seconds: u64,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum ExecuteMsg {
    /// Can only be set once
    SetNftContract { contract_addr: String },
    ReserveNft {},
    RefundNft { reservation_id: u64 },
    MintNft {
        reservation_id: u64,
        token_id: String,
        name: String,
        description: Option<String>,
        image: Option<String>,
    },
    WithdrawSales {},
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum QueryMsg {
    ReservationById { id: u64 },
    ReservationsByAddress { address: String },
    ValidReservations { start_at: u64, limit: u64 },
    DistributionStatus {},
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
pub struct DistributionStatus {
    pub withdraw_count: u64,
    pub sale_count: u64,
    pub valid_reservations_count: u64,
    pub total_reservation_count: u64,
    pub nft_limit: u64,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Reservation {
    pub owner: String,
    /// False once the reservation was filled or refunded
    pub valid: bool,
    pub refundable_at: u64,
}

/// Typed handle to a deployed distribution contract
#[derive(Debug, Clone, PartialEq)]
pub struct NftDistribution {
    contract: Contract,
}

impl NftDistribution {
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

    fn execute(&self, msg: &ExecuteMsg) -> Result<Execute> {
        Execute::new(self.contract.address(), msg)
    }

    pub fn set_nft_contract(&self, nft_contract: &Contract) -> Result<Execute> {
        self.execute(&ExecuteMsg::SetNftContract {
            contract_addr: nft_contract.address().to_string(),
        })
    }

    /// Reserve one NFT, paying `cost`
    pub fn reserve_nft(&self, cost: Coin) -> Result<Execute> {
        Ok(self.execute(&ExecuteMsg::ReserveNft {})?.with_funds(vec![cost]))
    }

    pub fn refund_nft(&self, reservation_id: u64) -> Result<Execute> {
        self.execute(&ExecuteMsg::RefundNft { reservation_id })
    }

    pub fn mint_nft(
        &self,
        reservation_id: u64,
        token_id: impl Into<String>,
        name: impl Into<String>,
    ) -> Result<Execute> {
        self.execute(&ExecuteMsg::MintNft {
            reservation_id,
            token_id: token_id.into(),
            name: name.into(),
            description: None,
            image: None,
        })
    }

    pub fn withdraw_sales(&self) -> Result<Execute> {
        self.execute(&ExecuteMsg::WithdrawSales {})
    }

    async fn query<C: ChainClient, R: DeserializeOwned>(
        &self,
        account: &Account<C>,
        msg: &QueryMsg,
    ) -> Result<R> {
        let response = account.query_raw(&self.contract, msg).await?;
        Ok(serde_json::from_value(response)?)
    }

    pub async fn reservation_by_id<C: ChainClient>(
        &self,
        account: &Account<C>,
        id: u64,
    ) -> Result<Reservation> {
        self.query(account, &QueryMsg::ReservationById { id }).await
    }

    pub async fn reservations_by_address<C: ChainClient>(
        &self,
        account: &Account<C>,
        address: &str,
    ) -> Result<Vec<Reservation>> {
        let msg = QueryMsg::ReservationsByAddress {
            address: address.to_string(),
        };
        self.query(account, &msg).await
    }

    /// Ids of unfilled reservations from `start_at`, at most
    /// [`MAX_PAGE_LIMIT`] per page
    pub async fn valid_reservations<C: ChainClient>(
        &self,
        account: &Account<C>,
        start_at: u64,
        limit: u64,
    ) -> Result<Vec<u64>> {
        self.query(account, &QueryMsg::ValidReservations { start_at, limit })
            .await
    }

    pub async fn distribution_status<C: ChainClient>(
        &self,
        account: &Account<C>,
    ) -> Result<DistributionStatus> {
        self.query(account, &QueryMsg::DistributionStatus {}).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::native_asset;
    use cosmwasm_std::coin;
    use serde_json::json;

    #[test]
    fn test_instantiate_msg_shape() {
        let msg = InstantiateMsg {
            owner: "terra1owner".to_string(),
            cost: native_asset("uluna", 1_000_000u128),
            nft_contract: None,
            limit_per_address: 5,
            nft_limit: 10,
            response_seconds: 1,
        };
        assert_eq!(
            serde_json::to_value(&msg).unwrap(),
            json!({
                "owner": "terra1owner",
                "cost": {"info": {"native_token": {"denom": "uluna"}}, "amount": "1000000"},
                "nft_contract": null,
                "limit_per_address": 5,
                "nft_limit": 10,
                "response_seconds": 1
            })
        );
    }

    #[test]
    fn test_execute_payloads() {
        let dist = NftDistribution::new(Contract::new("terra1dist"));

        let reserve = dist.reserve_nft(coin(1_000_000, "uluna")).unwrap();
        assert_eq!(reserve.json, json!({"reserve_nft": {}}));
        assert_eq!(reserve.funds, vec![coin(1_000_000, "uluna")]);

        let mint = dist.mint_nft(2, "2", "NFT number 2").unwrap();
        assert_eq!(
            mint.json,
            json!({"mint_nft": {
                "reservation_id": 2,
                "token_id": "2",
                "name": "NFT number 2",
                "description": null,
                "image": null
            }})
        );

        let set = dist.set_nft_contract(&Contract::new("terra1nft")).unwrap();
        assert_eq!(set.json, json!({"set_nft_contract": {"contract_addr": "terra1nft"}}));
        assert_eq!(dist.withdraw_sales().unwrap().json, json!({"withdraw_sales": {}}));
    }

    #[test]
    fn test_query_payloads() {
        assert_eq!(
            serde_json::to_value(QueryMsg::ValidReservations { start_at: 0, limit: 32 }).unwrap(),
            json!({"valid_reservations": {"start_at": 0, "limit": 32}})
        );
        assert_eq!(
            serde_json::to_value(QueryMsg::DistributionStatus {}).unwrap(),
            json!({"distribution_status": {}})
        );
    }
}
