/// Reservation and minting round trip through `galaxy_nft_distribution`.
///
/// Stores both contract binaries, deploys a distribution selling NFTs of a
/// fresh cw721 collection, reserves three of them in one transaction, fills
/// every reservation and checks that the deployer ends up owning the tokens.

use anyhow::{ensure, Context};
use cosmwasm_std::coin;
use std::collections::BTreeMap;

use crate::account::Account;
use crate::asset::native_asset;
use crate::chain::client::ChainClient;
use crate::chain::messages::Message;
use crate::contracts::cw721::{self, Cw721};
use crate::contracts::nft_distribution::{
    self, DistributionStatus, NftDistribution, MAX_PAGE_LIMIT,
};

pub const COST_DENOM: &str = "uluna";
pub const COST_AMOUNT: u128 = 1_000_000;

const RESERVATIONS: u64 = 3;
const LIMIT_PER_ADDRESS: u64 = 5;
const NFT_LIMIT: u64 = 10;
const RESPONSE_SECONDS: u64 = 1;

const COLLECTION_NAME: &str = "GalacticPunks";
const COLLECTION_SYMBOL: &str = "GLP";

fn stored_code_id(code_ids: &BTreeMap<String, u64>, name: &str) -> anyhow::Result<u64> {
    code_ids
        .get(name)
        .copied()
        .with_context(|| format!("artifact {}.wasm was not stored", name))
}

/// Run the scenario and return the final distribution status
pub async fn run<C: ChainClient>(account: &mut Account<C>) -> anyhow::Result<DistributionStatus> {
    let code_ids = account
        .store_contracts()
        .await
        .context("failed to store contract artifacts")?;
    let distribution_code = stored_code_id(&code_ids, nft_distribution::CONTRACT_NAME)?;
    let nft_code = stored_code_id(&code_ids, cw721::CONTRACT_NAME)?;

    let owner = account.address().to_string();

    let distribution = NftDistribution::instantiate(
        account,
        distribution_code,
        &nft_distribution::InstantiateMsg {
            owner: owner.clone(),
            cost: native_asset(COST_DENOM, COST_AMOUNT),
            nft_contract: None,
            limit_per_address: LIMIT_PER_ADDRESS,
            nft_limit: NFT_LIMIT,
            response_seconds: RESPONSE_SECONDS,
        },
    )
    .await
    .context("failed to instantiate the distribution contract")?;
    log::info!("Distribution contract: {}", distribution.contract());

    let nft = Cw721::instantiate(
        account,
        nft_code,
        &cw721::InstantiateMsg {
            name: COLLECTION_NAME.to_string(),
            symbol: COLLECTION_SYMBOL.to_string(),
            minter: distribution.contract().address().to_string(),
        },
    )
    .await
    .context("failed to instantiate the NFT contract")?;
    log::info!("NFT contract: {}", nft.contract());

    account
        .submit(distribution.set_nft_contract(nft.contract())?)
        .await
        .context("failed to set the NFT contract")?;

    let reservations = (0..RESERVATIONS)
        .map(|_| {
            distribution
                .reserve_nft(coin(COST_AMOUNT, COST_DENOM))
                .map(Message::from)
        })
        .collect::<Result<Vec<_>, _>>()?;
    account
        .chain(reservations)
        .await
        .context("failed to reserve NFTs")?;

    let mine = distribution.reservations_by_address(account, &owner).await?;
    log::info!("Reservations of {}: {:?}", owner, mine);

    let valid = distribution.valid_reservations(account, 0, MAX_PAGE_LIMIT).await?;
    let status = distribution.distribution_status(account).await?;
    log::info!("Distribution status: {:?}", status);
    ensure!(
        status.valid_reservations_count == RESERVATIONS,
        "expected {} valid reservations, found {}",
        RESERVATIONS,
        status.valid_reservations_count
    );

    for id in valid {
        let mint = distribution.mint_nft(id, id.to_string(), format!("NFT number {}", id))?;
        account
            .submit(mint)
            .await
            .with_context(|| format!("failed to mint reservation {}", id))?;
    }

    let remaining = distribution.valid_reservations(account, 0, MAX_PAGE_LIMIT).await?;
    ensure!(
        remaining.is_empty(),
        "reservations still open after minting: {:?}",
        remaining
    );

    let status = distribution.distribution_status(account).await?;
    ensure!(
        status.valid_reservations_count == 0,
        "distribution still reports {} valid reservations",
        status.valid_reservations_count
    );

    for token_id in (0..RESERVATIONS).map(|id| id.to_string()) {
        let response = nft.owner_of(account, &token_id).await?;
        ensure!(
            response.owner == owner,
            "token {} is owned by {}, expected {}",
            token_id,
            response.owner,
            owner
        );
    }

    log::info!("Final distribution status: {:?}", status);
    Ok(status)
}
