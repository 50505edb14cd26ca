//! Password-gated private key encryption
//!
//! BIP38-style operation: a symmetric key is derived with scrypt from the
//! base64 SHA-256 of the user password, salted by the network's address
//! version byte so ciphertext is bound to one network's key-encoding rules.
//! The actual cipher is AES-256-GCM with a random nonce prefixed to the
//! hex-encoded ciphertext.

use crate::error::WalletError;
use crate::network::NetworkId;
use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use scrypt::Params;
use sha2::{Digest, Sha256};

// Fixed scrypt work-factor triple: N = 8 (log2 = 3), r = 8, p = 8
const SCRYPT_LOG_N: u8 = 3;
const SCRYPT_R: u32 = 8;
const SCRYPT_P: u32 = 8;

const KEY_LEN: usize = 32;
const NONCE_LEN: usize = 12;

fn derive_key(network: NetworkId, password: &str) -> Result<[u8; KEY_LEN], WalletError> {
    // The passphrase fed to the KDF is base64(sha256(password)), matching
    // the wire-compatible key-encoding rules the ciphertexts were minted with
    let passphrase = BASE64.encode(Sha256::digest(password.as_bytes()));
    let salt = Sha256::digest([network.version_byte()]);

    let params = Params::new(SCRYPT_LOG_N, SCRYPT_R, SCRYPT_P, KEY_LEN)
        .map_err(|e| WalletError::Encryption(e.to_string()))?;

    let mut key = [0u8; KEY_LEN];
    scrypt::scrypt(passphrase.as_bytes(), &salt[..16], &params, &mut key)
        .map_err(|e| WalletError::Encryption(e.to_string()))?;
    Ok(key)
}

/// Encrypt a plaintext WIF key under a password, bound to `network`.
pub fn encrypt(plain_key: &str, network: NetworkId, password: &str) -> Result<String, WalletError> {
    if password.is_empty() {
        return Err(WalletError::Encryption(
            "cannot encrypt with an empty password".into(),
        ));
    }

    let key = derive_key(network, password)?;
    let cipher = Aes256Gcm::new_from_slice(&key)
        .map_err(|e| WalletError::Encryption(e.to_string()))?;

    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
    let ciphertext = cipher
        .encrypt(&nonce, plain_key.as_bytes())
        .map_err(|e| WalletError::Encryption(e.to_string()))?;

    let mut out = nonce.to_vec();
    out.extend_from_slice(&ciphertext);
    Ok(hex::encode(out))
}

/// Decrypt key material.
///
/// An empty password returns the material unchanged, modelling "no password
/// protection configured". Callers that know the material is ciphertext must
/// not take this path; the vault tracks encryption state per record and
/// refuses it. A present password that fails to decrypt is
/// `DecryptionFailed`.
pub fn decrypt(material: &str, network: NetworkId, password: &str) -> Result<String, WalletError> {
    if password.is_empty() {
        return Ok(material.to_string());
    }

    let bytes = hex::decode(material).map_err(|_| WalletError::DecryptionFailed)?;
    if bytes.len() <= NONCE_LEN {
        return Err(WalletError::DecryptionFailed);
    }
    let (nonce_bytes, ciphertext) = bytes.split_at(NONCE_LEN);

    let key = derive_key(network, password)?;
    let cipher = Aes256Gcm::new_from_slice(&key)
        .map_err(|e| WalletError::Encryption(e.to_string()))?;

    let plain = cipher
        .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
        .map_err(|_| WalletError::DecryptionFailed)?;

    String::from_utf8(plain).map_err(|_| WalletError::DecryptionFailed)
}
