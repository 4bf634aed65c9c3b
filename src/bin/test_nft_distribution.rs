/// End-to-end test of the NFT distribution contract against a live network
/// Run with: cargo run --bin test_nft_distribution [config.toml]
///
/// Expects the compiled `galaxy_nft_distribution.wasm` and `cw721_base.wasm`
/// in the configured artifacts directory. The signing key comes from
/// DEPLOYER_MNEMONIC; on LocalTerra it defaults to the test1 account.

use anyhow::{Context, Result};
use std::env;
use std::path::Path;

use terra_deployer::scenario::nft_distribution;
use terra_deployer::{Account, Config};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let config_path = env::args().nth(1).unwrap_or_else(|| "config.toml".to_string());
    let config = if Path::new(&config_path).exists() {
        Config::load(&config_path).with_context(|| format!("failed to load {}", config_path))?
    } else {
        Config::default()
    };

    println!("=== NFT Distribution Test ===\n");
    println!("Network: {} ({})", config.network.chain_id, config.network.grpc_endpoint);
    println!("Artifacts: {}", config.deploy.artifacts_dir.display());

    let mnemonic = env::var("DEPLOYER_MNEMONIC").ok();
    let mut account = Account::connect(config.network, mnemonic.as_deref())
        .await?
        .with_artifacts_dir(config.deploy.artifacts_dir);
    println!("Deployer: {}\n", account.address());

    let status = nft_distribution::run(&mut account).await?;

    println!("\n✅ NFT distribution test passed");
    println!("  Sales: {}", status.sale_count);
    println!("  Total reservations: {}", status.total_reservation_count);
    println!("  Valid reservations: {}", status.valid_reservations_count);
    println!("  NFT limit: {}", status.nft_limit);

    Ok(())
}
