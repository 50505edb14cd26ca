//! Key vault operations
//!
//! The authoritative record of stored key pairs and their cached balances.
//! All operations follow read-modify-write over the whole vault document;
//! the persistence layer has no partial-update primitive.

use crate::address;
use crate::encryption;
use crate::error::WalletError;
use crate::keys;
use crate::network::NetworkId;
use crate::security;
use crate::storage::models::{KeyMaterial, KeyPairRecord, Vault};
use crate::storage::VaultRepository;

/// Load the full vault snapshot. Absent or malformed persisted state reads
/// back as an empty vault.
pub fn load(repo: &dyn VaultRepository) -> Vault {
    repo.load_vault()
}

/// All records, in address order.
pub fn list(repo: &dyn VaultRepository) -> Vec<KeyPairRecord> {
    repo.load_vault().into_values().collect()
}

/// Sum cached balances over all records of one network. Records whose
/// balance no longer parses as a number are skipped, not fatal.
pub fn get_balance_total(repo: &dyn VaultRepository, network: NetworkId) -> f64 {
    repo.load_vault()
        .values()
        .filter(|record| record.network == network)
        .filter_map(|record| record.balance.parse::<f64>().ok())
        .sum()
}

/// Look up a record's private key, decrypting if necessary.
///
/// A missing address is an empty-string sentinel, not an error. Revealing an
/// encrypted record requires the wallet password; handing ciphertext back as
/// if it were a key is never done.
pub fn get_private_key(
    repo: &dyn VaultRepository,
    address: &str,
    password: &str,
) -> Result<String, WalletError> {
    let vault = repo.load_vault();
    let Some(record) = vault.get(address) else {
        return Ok(String::new());
    };

    match &record.private_key {
        KeyMaterial::Plaintext(wif) => Ok(wif.clone()),
        KeyMaterial::Encrypted(ciphertext) => {
            if password.is_empty() || !security::verify(repo, password) {
                return Err(WalletError::DecryptionFailed);
            }
            encryption::decrypt(ciphertext, record.network, password)
        }
    }
}

/// Import a WIF-encoded private key.
///
/// The address is derived from the key, checksum-validated, and must agree
/// with the WIF's network. When a password is supplied (and matches the
/// wallet password, if one is set) the key is stored encrypted.
pub fn import_key(
    repo: &dyn VaultRepository,
    wif: &str,
    password: &str,
) -> Result<KeyPairRecord, WalletError> {
    let parsed = keys::parse_wif(wif)?;
    let addr = keys::derive_address(&parsed);

    // The derived address must validate and resolve to the WIF's network
    let network = address::network_of(&addr)?;
    if network != parsed.network {
        return Err(WalletError::InvalidKey(format!(
            "address network {} does not match WIF network {}",
            network, parsed.network
        )));
    }

    let mut vault = repo.load_vault();
    if vault.contains_key(&addr) {
        return Err(WalletError::KeyExists(addr));
    }

    let private_key = if password.is_empty() {
        KeyMaterial::Plaintext(parsed.wif.clone())
    } else {
        if !security::verify(repo, password) {
            return Err(WalletError::Encryption(
                "password does not match the wallet password".into(),
            ));
        }
        KeyMaterial::Encrypted(encryption::encrypt(&parsed.wif, network, password)?)
    };

    let record = KeyPairRecord {
        address: addr.clone(),
        network,
        private_key,
        balance: "0.00000000".to_string(),
        txs: None,
    };

    vault.insert(addr.clone(), record.clone());
    repo.save_vault(&vault)?;
    log::info!("Imported {} key {}", network, addr);

    Ok(record)
}

/// Remove a record by address. Absence is a silent no-op.
pub fn remove_key(repo: &dyn VaultRepository, address: &str) -> Result<(), WalletError> {
    let mut vault = repo.load_vault();
    if vault.remove(address).is_none() {
        return Ok(());
    }
    repo.save_vault(&vault)?;
    log::info!("Removed key {}", address);
    Ok(())
}
