use bech32::{self, Hrp};
use bip32::{ChildNumber, XPrv};
use bip39::Mnemonic;
use ripemd::Ripemd160;
use secp256k1::{PublicKey, Secp256k1, SecretKey};
use sha2::{Digest, Sha256};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{Error, Result};

const TERRA_COIN_TYPE: u32 = 330; // m/44'/330'/0'/0/0
const TERRA_PREFIX: &str = "terra";

/// Mnemonic of the `test1` account that ships with LocalTerra.
/// Publicly known; only ever used against a local network.
pub const LOCALTERRA_TEST1_MNEMONIC: &str = "notice oak worry limit wrap speak medal online prefer cluster roof addict wrist behave treat actual wasp year salad speed social layer crew genius";

/// Secure wallet for Terra
/// Implements BIP32 HD derivation and zeroizes key material on drop
#[derive(Debug, Zeroize, ZeroizeOnDrop)]
pub struct TerraWallet {
    #[zeroize(skip)]
    pub address: String,

    private_key_bytes: [u8; 32],
    public_key_bytes: [u8; 33],
}

impl TerraWallet {
    /// Create a wallet from a BIP39 mnemonic phrase with optional passphrase
    pub fn from_mnemonic(mnemonic_str: &str, passphrase: &str) -> Result<Self> {
        let mnemonic = Mnemonic::parse(mnemonic_str.trim())?;
        let mut seed = mnemonic.to_seed(passphrase);

        let mut private_key = derive_private_key_bip32(&seed)?;
        seed.zeroize();

        let secp = Secp256k1::new();
        let secret_key = SecretKey::from_slice(&private_key)?;
        let public_key = PublicKey::from_secret_key(&secp, &secret_key);

        let address = generate_terra_address(&public_key)?;

        let private_key_bytes = private_key;
        private_key.zeroize();

        Ok(Self {
            address,
            private_key_bytes,
            public_key_bytes: public_key.serialize(),
        })
    }

    pub fn from_mnemonic_no_passphrase(mnemonic_str: &str) -> Result<Self> {
        Self::from_mnemonic(mnemonic_str, "")
    }

    /// The LocalTerra `test1` account
    pub fn localterra_test1() -> Result<Self> {
        Self::from_mnemonic_no_passphrase(LOCALTERRA_TEST1_MNEMONIC)
    }

    /// Get the private key as a SecretKey (for signing)
    pub fn private_key(&self) -> Result<SecretKey> {
        Ok(SecretKey::from_slice(&self.private_key_bytes)?)
    }

    pub fn public_key(&self) -> Result<PublicKey> {
        Ok(PublicKey::from_slice(&self.public_key_bytes)?)
    }

    /// Compressed secp256k1 public key (33 bytes), as carried in SignerInfo
    pub fn public_key_compressed(&self) -> [u8; 33] {
        self.public_key_bytes
    }
}

fn derive_private_key_bip32(seed: &[u8]) -> Result<[u8; 32]> {
    let xprv = XPrv::new(seed)?;

    // 44' / 330' / 0' / 0 / 0
    let derived = xprv
        .derive_child(ChildNumber::new(44, true)?)
        .and_then(|k| k.derive_child(ChildNumber::new(TERRA_COIN_TYPE, true)?))
        .and_then(|k| k.derive_child(ChildNumber::new(0, true)?))
        .and_then(|k| k.derive_child(ChildNumber::new(0, false)?))
        .and_then(|k| k.derive_child(ChildNumber::new(0, false)?))?;

    Ok(derived.to_bytes())
}

/// bech32("terra", ripemd160(sha256(compressed_pubkey)))
fn generate_terra_address(public_key: &PublicKey) -> Result<String> {
    let sha = Sha256::digest(public_key.serialize());
    let hash = Ripemd160::digest(sha);

    let hrp = Hrp::parse(TERRA_PREFIX).map_err(|e| Error::Key(e.to_string()))?;
    bech32::encode::<bech32::Bech32>(hrp, &hash[..]).map_err(|e| Error::Key(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_MNEMONIC: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    #[test]
    fn test_wallet_generation_with_bip32() {
        let wallet = TerraWallet::from_mnemonic_no_passphrase(TEST_MNEMONIC).unwrap();

        // terra1 + 32 data chars + 6 checksum chars
        assert!(wallet.address.starts_with("terra1"));
        assert_eq!(wallet.address.len(), 44);

        assert_eq!(wallet.private_key_bytes.len(), 32);
        let prefix = wallet.public_key_bytes[0];
        assert!(prefix == 0x02 || prefix == 0x03);
    }

    #[test]
    fn test_wallet_with_passphrase() {
        let wallet1 = TerraWallet::from_mnemonic(TEST_MNEMONIC, "").unwrap();
        let wallet2 = TerraWallet::from_mnemonic(TEST_MNEMONIC, "test123").unwrap();
        assert_ne!(wallet1.address, wallet2.address);

        let wallet3 = TerraWallet::from_mnemonic(TEST_MNEMONIC, "test123").unwrap();
        assert_eq!(wallet2.address, wallet3.address);
    }

    #[test]
    fn test_public_key_matches_private_key() {
        let wallet = TerraWallet::from_mnemonic_no_passphrase(TEST_MNEMONIC).unwrap();
        let secp = Secp256k1::new();
        let derived = PublicKey::from_secret_key(&secp, &wallet.private_key().unwrap());
        assert_eq!(derived, wallet.public_key().unwrap());
        assert_eq!(derived.serialize(), wallet.public_key_compressed());
    }

    #[test]
    fn test_invalid_mnemonic_is_rejected() {
        let result = TerraWallet::from_mnemonic_no_passphrase("not a real mnemonic");
        assert!(matches!(result, Err(Error::Key(_))));
    }
}
