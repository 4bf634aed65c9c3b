mod keys;
mod signer;

pub use keys::{TerraWallet, LOCALTERRA_TEST1_MNEMONIC};
pub use signer::TransactionSigner;
