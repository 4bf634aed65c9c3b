use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use cosmwasm_std::Coin;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use terra_deployer::chain::Execute;
use terra_deployer::{Account, Config, Contract, NetworkKind};

#[derive(Parser)]
#[command(name = "terra_deployer")]
#[command(about = "Deploy and exercise CosmWasm contracts on Terra", version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, default_value = "config.toml")]
    config: PathBuf,

    /// Signing mnemonic; LocalTerra falls back to its test1 account
    #[arg(long, global = true, env = "DEPLOYER_MNEMONIC", hide_env_values = true)]
    mnemonic: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum NetworkArg {
    Local,
    Testnet,
}

impl From<NetworkArg> for NetworkKind {
    fn from(arg: NetworkArg) -> Self {
        match arg {
            NetworkArg::Local => NetworkKind::Local,
            NetworkArg::Testnet => NetworkKind::Testnet,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a default configuration file
    Init {
        /// Output path for config file
        #[arg(short, long, default_value = "config.toml")]
        output: PathBuf,

        #[arg(short, long, value_enum, default_value = "local")]
        network: NetworkArg,
    },

    /// Upload contract binaries from the artifacts directory
    Store {
        /// Contract names to store; all `.wasm` files when omitted
        names: Vec<String>,
    },

    /// Execute a contract message
    Execute {
        /// Contract address
        contract: String,

        /// JSON message, e.g. '{"reserve_nft":{}}'
        msg: String,

        /// Funds to send, e.g. 1000000uluna (repeatable)
        #[arg(long = "funds")]
        funds: Vec<Coin>,
    },

    /// Run a smart query against a contract
    Query {
        /// Contract address
        contract: String,

        /// JSON query, e.g. '{"distribution_status":{}}'
        msg: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "terra_deployer=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { output, network } => {
            let config = Config::for_network(network.into());
            config.save(&output)?;
            info!("Configuration file created at: {}", output.display());
        }
        Commands::Store { names } => {
            let mut account = connect(&cli.config, cli.mnemonic.as_deref()).await?;
            if names.is_empty() {
                for (name, code_id) in account.store_contracts().await? {
                    println!("{}: {}", name, code_id);
                }
            } else {
                for name in names {
                    let code_id = account
                        .store_contract(&name)
                        .await
                        .with_context(|| format!("failed to store {}", name))?;
                    println!("{}: {}", name, code_id);
                }
            }
        }
        Commands::Execute {
            contract,
            msg,
            funds,
        } => {
            let payload: Value = serde_json::from_str(&msg).context("message is not valid JSON")?;

            let mut account = connect(&cli.config, cli.mnemonic.as_deref()).await?;
            let outcome = account
                .submit(Execute::new(contract, &payload)?.with_funds(funds))
                .await?;
            println!("{} (height {}, gas used {})", outcome.tx_hash, outcome.height, outcome.gas_used);
        }
        Commands::Query { contract, msg } => {
            let payload: Value = serde_json::from_str(&msg).context("query is not valid JSON")?;

            let account = connect(&cli.config, cli.mnemonic.as_deref()).await?;
            let response = account.query_raw(&Contract::new(contract), &payload).await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}

async fn connect(config_path: &Path, mnemonic: Option<&str>) -> Result<Account> {
    let config = if config_path.exists() {
        Config::load(config_path)
            .with_context(|| format!("failed to load {}", config_path.display()))?
    } else {
        info!("No config at {}, using LocalTerra defaults", config_path.display());
        Config::default()
    };

    let account = Account::connect(config.network, mnemonic)
        .await?
        .with_artifacts_dir(config.deploy.artifacts_dir);
    info!("Using account {}", account.address());
    Ok(account)
}
