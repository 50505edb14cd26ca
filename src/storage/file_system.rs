use crate::error::StorageError;
use crate::storage::models::{SecuritySettings, Vault};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

pub const VAULT_DOCUMENT: &str = "KeyPairs";
pub const SECURITY_DOCUMENT: &str = "Security";

/// Access to the two persisted documents the vault owns.
///
/// Loads never fail: an absent or malformed document reads back as empty
/// state. Saves replace the whole document; there is no partial update.
pub trait VaultRepository: Send + Sync {
    fn load_vault(&self) -> Vault;
    fn save_vault(&self, vault: &Vault) -> Result<(), StorageError>;
    fn load_security(&self) -> SecuritySettings;
    fn save_security(&self, settings: &SecuritySettings) -> Result<(), StorageError>;
}

/// File-backed document store: one pretty-printed JSON file per document.
pub struct FileStore {
    base_path: PathBuf,
}

impl FileStore {
    pub fn new() -> Self {
        Self {
            base_path: PathBuf::from("./vault"),
        }
    }

    pub fn with_base_dir(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_path
    }

    fn doc_path(&self, name: &str) -> PathBuf {
        self.base_path.join(format!("{}.json", name))
    }

    /// Read a named document; absent or unparsable files yield the default.
    pub fn get_document<T: DeserializeOwned + Default>(&self, name: &str) -> T {
        let path = self.doc_path(name);
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(_) => return T::default(),
        };
        match serde_json::from_str(&contents) {
            Ok(value) => value,
            Err(e) => {
                log::warn!(
                    "Malformed document {}, treating as empty: {}",
                    path.display(),
                    e
                );
                T::default()
            }
        }
    }

    /// Overwrite a named document. Written to a temp file first and renamed
    /// into place so readers never observe a partial write.
    pub fn set_document<T: Serialize>(&self, name: &str, value: &T) -> Result<(), StorageError> {
        fs::create_dir_all(&self.base_path)?;
        let json = serde_json::to_string_pretty(value)?;
        let path = self.doc_path(name);
        let tmp_path = self.base_path.join(format!("{}.json.tmp", name));
        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, &path)?;
        Ok(())
    }
}

impl Default for FileStore {
    fn default() -> Self {
        Self::new()
    }
}

impl VaultRepository for FileStore {
    fn load_vault(&self) -> Vault {
        self.get_document(VAULT_DOCUMENT)
    }

    fn save_vault(&self, vault: &Vault) -> Result<(), StorageError> {
        self.set_document(VAULT_DOCUMENT, vault)
    }

    fn load_security(&self) -> SecuritySettings {
        self.get_document(SECURITY_DOCUMENT)
    }

    fn save_security(&self, settings: &SecuritySettings) -> Result<(), StorageError> {
        self.set_document(SECURITY_DOCUMENT, settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::NetworkId;
    use crate::storage::models::{KeyMaterial, KeyPairRecord};
    use tempfile::TempDir;

    fn record(address: &str) -> KeyPairRecord {
        KeyPairRecord {
            address: address.to_string(),
            network: NetworkId::Bitcoin,
            private_key: KeyMaterial::Plaintext("wif".into()),
            balance: "0.00000000".into(),
            txs: None,
        }
    }

    #[test]
    fn test_missing_document_loads_empty() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::with_base_dir(dir.path().to_path_buf());
        assert!(store.load_vault().is_empty());
        assert!(store.load_security().password_fingerprint.is_empty());
    }

    #[test]
    fn test_malformed_document_loads_empty() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("KeyPairs.json"), "{not json").unwrap();
        let store = FileStore::with_base_dir(dir.path().to_path_buf());
        assert!(store.load_vault().is_empty());
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::with_base_dir(dir.path().to_path_buf());

        let mut vault = Vault::new();
        vault.insert("1abc".into(), record("1abc"));
        store.save_vault(&vault).unwrap();

        let loaded = store.load_vault();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded["1abc"].address, "1abc");
    }

    #[test]
    fn test_save_replaces_whole_document() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::with_base_dir(dir.path().to_path_buf());

        let mut vault = Vault::new();
        vault.insert("1abc".into(), record("1abc"));
        vault.insert("1def".into(), record("1def"));
        store.save_vault(&vault).unwrap();

        vault.remove("1abc");
        store.save_vault(&vault).unwrap();

        let loaded = store.load_vault();
        assert_eq!(loaded.len(), 1);
        assert!(!loaded.contains_key("1abc"));
    }
}
