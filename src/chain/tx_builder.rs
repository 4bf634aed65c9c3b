/// Transaction builder using the Cosmos SDK proto types
/// Produces SIGN_MODE_DIRECT signed TxRaw bytes for any list of messages

use cosmos_sdk_proto::cosmos::base::v1beta1::Coin;
use cosmos_sdk_proto::cosmos::crypto::secp256k1::PubKey;
use cosmos_sdk_proto::cosmos::tx::signing::v1beta1::SignMode;
use cosmos_sdk_proto::cosmos::tx::v1beta1::{
    mode_info, AuthInfo, Fee, ModeInfo, SignDoc, SignerInfo, TxBody, TxRaw,
};
use cosmos_sdk_proto::Any;
use cosmwasm_std::Decimal;
use prost::Message;
use std::str::FromStr;

use crate::chain::wallet::{TerraWallet, TransactionSigner};
use crate::error::{Error, Result};

const SECP256K1_PUBKEY_TYPE_URL: &str = "/cosmos.crypto.secp256k1.PubKey";

/// Gas limit used for the simulation pass, before the real limit is known
pub const SIMULATION_GAS_LIMIT: u64 = 0;

pub struct TxBuilder<'a> {
    chain_id: String,
    account_number: u64,
    sequence: u64,
    gas_limit: u64,
    fee: Vec<Coin>,
    memo: String,
    wallet: &'a TerraWallet,
    signer: TransactionSigner,
}

impl<'a> TxBuilder<'a> {
    pub fn new(
        chain_id: impl Into<String>,
        account_number: u64,
        sequence: u64,
        wallet: &'a TerraWallet,
    ) -> Self {
        Self {
            chain_id: chain_id.into(),
            account_number,
            sequence,
            gas_limit: SIMULATION_GAS_LIMIT,
            fee: vec![],
            memo: String::new(),
            wallet,
            signer: TransactionSigner::new(),
        }
    }

    pub fn with_gas_limit(mut self, gas_limit: u64) -> Self {
        self.gas_limit = gas_limit;
        self
    }

    pub fn with_fee(mut self, fee: Vec<Coin>) -> Self {
        self.fee = fee;
        self
    }

    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = memo.into();
        self
    }

    /// Build and sign a transaction carrying `messages` in order
    pub fn build(&self, messages: Vec<Any>) -> Result<Vec<u8>> {
        let tx_body = TxBody {
            messages,
            memo: self.memo.clone(),
            ..Default::default()
        };

        let pub_key = PubKey {
            key: self.wallet.public_key_compressed().to_vec(),
        };
        let pub_key_any = Any {
            type_url: SECP256K1_PUBKEY_TYPE_URL.to_string(),
            value: pub_key.encode_to_vec(),
        };

        let signer_info = SignerInfo {
            public_key: Some(pub_key_any),
            mode_info: Some(ModeInfo {
                sum: Some(mode_info::Sum::Single(mode_info::Single {
                    mode: SignMode::Direct as i32,
                })),
            }),
            sequence: self.sequence,
        };

        let auth_info = AuthInfo {
            signer_infos: vec![signer_info],
            fee: Some(Fee {
                amount: self.fee.clone(),
                gas_limit: self.gas_limit,
                ..Default::default()
            }),
            ..Default::default()
        };

        let body_bytes = tx_body.encode_to_vec();
        let auth_info_bytes = auth_info.encode_to_vec();

        let sign_doc = SignDoc {
            body_bytes: body_bytes.clone(),
            auth_info_bytes: auth_info_bytes.clone(),
            chain_id: self.chain_id.clone(),
            account_number: self.account_number,
        };

        let private_key = self.wallet.private_key()?;
        let signature = self
            .signer
            .sign_direct(&sign_doc.encode_to_vec(), &private_key)?;

        let tx_raw = TxRaw {
            body_bytes,
            auth_info_bytes,
            signatures: vec![signature],
        };

        Ok(tx_raw.encode_to_vec())
    }
}

/// Gas limit for a simulated usage: ceil(gas_used * adjustment)
pub fn adjusted_gas(gas_used: u64, gas_adjustment: f64) -> u64 {
    (gas_used as f64 * gas_adjustment).ceil() as u64
}

/// Fee for a gas limit at a gas price: ceil(gas_limit * price) of `denom`.
/// The product is taken in `Decimal`, so `0.15` means exactly 15/100.
pub fn fee_for_gas(gas_limit: u64, gas_price: f64, denom: &str) -> Result<Coin> {
    let price = Decimal::from_str(&gas_price.to_string())
        .map_err(|e| Error::Config(format!("invalid gas price {}: {}", gas_price, e)))?;
    let fee = Decimal::from_atomics(gas_limit, 0)
        .ok()
        .and_then(|gas| gas.checked_mul(price).ok())
        .ok_or_else(|| {
            Error::Config(format!("fee for {} gas at {} overflows", gas_limit, gas_price))
        })?;

    let atomics = fee.atomics().u128();
    let unit = Decimal::one().atomics().u128();
    let amount = atomics / unit + u128::from(atomics % unit != 0);
    Ok(Coin {
        denom: denom.to_string(),
        amount: amount.to_string(),
    })
}
