//! Persisted vault document shapes

use crate::network::NetworkId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The vault document: one record per address, keyed by that address.
pub type Vault = BTreeMap<String, KeyPairRecord>;

/// Private key material with its encryption state carried explicitly, so
/// decryption never has to be inferred from password presence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "data", rename_all = "lowercase")]
pub enum KeyMaterial {
    /// WIF-encoded plaintext key
    Plaintext(String),
    /// Password-encrypted ciphertext (hex, nonce-prefixed)
    Encrypted(String),
}

impl KeyMaterial {
    pub fn is_encrypted(&self) -> bool {
        matches!(self, KeyMaterial::Encrypted(_))
    }
}

/// One stored key pair plus the balance and history cached by the last sync.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyPairRecord {
    pub address: String,
    pub network: NetworkId,
    pub private_key: KeyMaterial,
    /// Whole-coin decimal string; tolerated as non-numeric after partial
    /// corruption, in which case balance totals skip it
    pub balance: String,
    /// Absent before the first successful sync
    #[serde(skip_serializing_if = "Option::is_none")]
    pub txs: Option<Vec<TxRecord>>,
}

/// Normalized transaction reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TxRecord {
    /// Transaction hash
    pub tx: String,
    /// Confirmation time as reported by the provider
    pub time_utc: String,
    /// Signed whole-coin amount, negative for outgoing value
    pub amount: String,
}

/// The security document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SecuritySettings {
    /// Double SHA-256 of the wallet password (hex); empty means no password
    /// is set and every vault operation is unlocked
    #[serde(rename = "passwordEncodeWallet", default)]
    pub password_fingerprint: String,
}
