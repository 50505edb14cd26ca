//! WIF key parsing and address derivation
//!
//! WIF decoding is done directly from base58check rather than through
//! `bitcoin::PrivateKey::from_wif`, because the latter only accepts Bitcoin
//! WIF prefixes and the vault also holds Litecoin and Dogecoin keys.

use crate::error::WalletError;
use crate::network::NetworkId;
use bitcoin::base58;
use bitcoin::hashes::{hash160, Hash};
use bitcoin::secp256k1::{PublicKey, Secp256k1, SecretKey};

const SECRET_LEN: usize = 32;
const COMPRESSED_FLAG: u8 = 0x01;

/// A WIF private key resolved to its network.
pub struct ParsedKey {
    pub network: NetworkId,
    pub secret: SecretKey,
    pub compressed: bool,
    /// The original WIF string, stored as the plaintext vault material
    pub wif: String,
}

/// Decode a WIF string: version byte, 32-byte secret, optional compression
/// flag, all under a base58check envelope.
pub fn parse_wif(wif: &str) -> Result<ParsedKey, WalletError> {
    let data =
        base58::decode_check(wif).map_err(|_| WalletError::InvalidKey("bad checksum".into()))?;

    if data.is_empty() {
        return Err(WalletError::InvalidKey("empty payload".into()));
    }

    let network = NetworkId::from_wif_version_byte(data[0])
        .ok_or_else(|| WalletError::InvalidKey(format!("unknown WIF version {:#04x}", data[0])))?;

    let compressed = match data.len() {
        len if len == 1 + SECRET_LEN => false,
        len if len == 2 + SECRET_LEN && data[1 + SECRET_LEN] == COMPRESSED_FLAG => true,
        _ => return Err(WalletError::InvalidKey("bad length".into())),
    };

    let secret = SecretKey::from_slice(&data[1..=SECRET_LEN])
        .map_err(|e| WalletError::InvalidKey(e.to_string()))?;

    Ok(ParsedKey {
        network,
        secret,
        compressed,
        wif: wif.to_string(),
    })
}

/// Derive the base58check P2PKH address for a parsed key on its network.
pub fn derive_address(key: &ParsedKey) -> String {
    let secp = Secp256k1::new();
    let pubkey = PublicKey::from_secret_key(&secp, &key.secret);
    let pubkey_bytes = if key.compressed {
        pubkey.serialize().to_vec()
    } else {
        pubkey.serialize_uncompressed().to_vec()
    };

    let digest = hash160::Hash::hash(&pubkey_bytes);
    let mut payload = vec![key.network.version_byte()];
    payload.extend_from_slice(digest.as_byte_array());
    base58::encode_check(&payload)
}
