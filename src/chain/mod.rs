pub mod account_types;
pub mod client;
pub mod messages;
pub mod outcome;
pub mod tx_builder;
pub mod wallet;

pub use client::{ChainClient, GrpcClient};
pub use messages::{Execute, Instantiate, Message, MessageBuilder, SendTokens, StoreCode};
pub use outcome::TxOutcome;
pub use wallet::{TerraWallet, TransactionSigner};
