//! Wallet manager - orchestration layer
//!
//! Coordinates vault, security, and sync operations over shared
//! configuration, storage, and the HTTP client.

use crate::config::WalletConfig;
use crate::error::WalletError;
use crate::network::{AdapterProvider, NetworkId, NetworkInfo, NetworkRegistry, UnspentOutput};
use crate::storage::models::KeyPairRecord;
use crate::storage::FileStore;
use crate::sync::{self, SyncReport};
use crate::{security, vault};
use std::sync::Mutex;
use tokio::sync::watch;

pub struct WalletManager {
    pub config: WalletConfig,
    pub store: FileStore,
    provider: Box<dyn AdapterProvider>,
    client: reqwest::Client,
    /// Sender for the cancellation channel of the most recent sync.
    /// Replaced on every sync() call; dropping the previous sender
    /// cancels the sync still listening on it.
    sync_cancel: Mutex<watch::Sender<bool>>,
}

impl WalletManager {
    pub fn new() -> Self {
        let config = WalletConfig::from_env();
        let store = FileStore::with_base_dir(config.data_dir.clone());
        Self::build(config, store)
    }

    /// Create a manager with custom storage (for testing).
    pub fn new_with_store(store: FileStore) -> Self {
        Self::build(WalletConfig::default(), store)
    }

    /// Create a manager with custom storage and adapter provider (for testing).
    pub fn new_with_provider(store: FileStore, provider: Box<dyn AdapterProvider>) -> Self {
        let mut manager = Self::build(WalletConfig::default(), store);
        manager.provider = provider;
        manager
    }

    fn build(config: WalletConfig, store: FileStore) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()
            .expect("failed to construct HTTP client");
        let registry = NetworkRegistry::with_overrides(&config.endpoint_overrides);
        let (sync_cancel, _) = watch::channel(false);

        Self {
            config,
            store,
            provider: Box::new(registry),
            client,
            sync_cancel: Mutex::new(sync_cancel),
        }
    }

    // Security

    pub fn set_password(&self, password: &str) -> Result<(), WalletError> {
        security::set_password(&self.store, password)
    }

    pub fn password_set(&self) -> bool {
        security::password_set(&self.store)
    }

    // Vault

    pub fn import_key(&self, wif: &str, password: &str) -> Result<KeyPairRecord, WalletError> {
        vault::import_key(&self.store, wif, password)
    }

    pub fn list_keys(&self) -> Vec<KeyPairRecord> {
        vault::list(&self.store)
    }

    /// Remove a key. Any in-flight sync is cancelled first so a stale merge
    /// cannot resurrect the record.
    pub fn remove_key(&self, address: &str) -> Result<(), WalletError> {
        self.cancel_sync();
        vault::remove_key(&self.store, address)
    }

    pub fn reveal_private_key(&self, address: &str, password: &str) -> Result<String, WalletError> {
        let key = vault::get_private_key(&self.store, address, password)?;
        if key.is_empty() {
            return Err(WalletError::KeyNotFound(address.to_string()));
        }
        Ok(key)
    }

    pub fn balance_total(&self, network: NetworkId) -> f64 {
        vault::get_balance_total(&self.store, network)
    }

    // Sync

    pub async fn sync(&self) -> Result<SyncReport, WalletError> {
        // Each sync listens on its own channel. Installing the new sender
        // drops the previous one, which cancels whatever sync was still
        // in flight without touching this one.
        let cancel = {
            let (tx, rx) = watch::channel(false);
            let mut guard = self.sync_cancel.lock().unwrap_or_else(|p| p.into_inner());
            *guard = tx;
            rx
        };
        sync::sync_vault(&self.store, self.provider.as_ref(), &self.client, cancel).await
    }

    /// Signal the in-flight sync, if any, to discard its results.
    pub fn cancel_sync(&self) {
        self.sync_cancel
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .send_replace(true);
    }

    // Remote queries

    pub async fn unspent(&self, address: &str) -> Result<Vec<UnspentOutput>, WalletError> {
        let vault = vault::load(&self.store);
        let record = vault
            .get(address)
            .ok_or_else(|| WalletError::KeyNotFound(address.to_string()))?;

        let network = record.network;
        self.provider
            .adapter(network)
            .fetch_unspent(
                &self.client,
                self.provider.info(network),
                &[address.to_string()],
            )
            .await
    }

    pub async fn broadcast(&self, network: NetworkId, hex_tx: &str) -> Result<String, WalletError> {
        self.provider
            .adapter(network)
            .push_transaction(&self.client, self.provider.info(network), hex_tx)
            .await
    }

    pub fn networks(&self) -> Vec<&NetworkInfo> {
        NetworkId::ALL
            .iter()
            .map(|id| self.provider.info(*id))
            .collect()
    }
}

impl Default for WalletManager {
    fn default() -> Self {
        Self::new()
    }
}
