//! Common test utilities for vault and sync integration tests
//!
//! Provides a temp-directory backed test environment plus mock network
//! providers so the aggregator can be exercised without HTTP.

#![allow(dead_code)]

use async_trait::async_trait;
use bitcoin::base58;
use coinvault::error::WalletError;
use coinvault::manager::WalletManager;
use coinvault::network::{
    AdapterProvider, AddressUpdate, NetworkAdapter, NetworkId, NetworkInfo, ProviderKind,
    UnspentOutput,
};
use coinvault::storage::models::{KeyMaterial, KeyPairRecord, TxRecord};
use coinvault::storage::{FileStore, VaultRepository};
use std::collections::HashMap;
use std::time::Duration;
use tempfile::TempDir;

/// Test environment with automatic cleanup
pub struct TestEnvironment {
    pub temp_dir: TempDir,
    pub manager: WalletManager,
}

impl TestEnvironment {
    pub fn new() -> anyhow::Result<Self> {
        let temp_dir = TempDir::new()?;
        let store = FileStore::with_base_dir(temp_dir.path().to_path_buf());
        let manager = WalletManager::new_with_store(store);
        Ok(Self { temp_dir, manager })
    }

    /// Environment whose manager dispatches to mock adapters.
    pub fn with_provider(provider: MockProvider) -> anyhow::Result<Self> {
        let temp_dir = TempDir::new()?;
        let store = FileStore::with_base_dir(temp_dir.path().to_path_buf());
        let manager = WalletManager::new_with_provider(store, Box::new(provider));
        Ok(Self { temp_dir, manager })
    }

    pub fn store(&self) -> &FileStore {
        &self.manager.store
    }
}

/// Build a well-formed WIF for a network from a repeated seed byte.
pub fn make_wif(network: NetworkId, seed: u8) -> String {
    let mut payload = vec![network.wif_version_byte()];
    payload.extend_from_slice(&[seed; 32]);
    payload.push(0x01);
    base58::encode_check(&payload)
}

/// Insert a record directly into the persisted vault.
pub fn seed_record(
    repo: &dyn VaultRepository,
    address: &str,
    network: NetworkId,
    balance: &str,
    txs: Option<Vec<TxRecord>>,
) {
    let mut vault = repo.load_vault();
    vault.insert(
        address.to_string(),
        KeyPairRecord {
            address: address.to_string(),
            network,
            private_key: KeyMaterial::Plaintext("wif".into()),
            balance: balance.to_string(),
            txs,
        },
    );
    repo.save_vault(&vault).unwrap();
}

pub fn tx_record(tx: &str, amount: &str) -> TxRecord {
    TxRecord {
        tx: tx.to_string(),
        time_utc: "2015-03-01T12:00:00Z".to_string(),
        amount: amount.to_string(),
    }
}

/// Scripted adapter: either returns canned updates or fails, after an
/// optional delay.
pub struct MockAdapter {
    pub updates: Option<Vec<AddressUpdate>>,
    pub delay: Option<Duration>,
}

impl MockAdapter {
    pub fn succeeding(updates: Vec<AddressUpdate>) -> Self {
        Self {
            updates: Some(updates),
            delay: None,
        }
    }

    pub fn failing() -> Self {
        Self {
            updates: None,
            delay: None,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[async_trait]
impl NetworkAdapter for MockAdapter {
    async fn fetch_updates(
        &self,
        _client: &reqwest::Client,
        _info: &NetworkInfo,
        _addresses: &[String],
    ) -> Result<Vec<AddressUpdate>, WalletError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.updates {
            Some(updates) => Ok(updates.clone()),
            None => Err(WalletError::Network("mock transport failure".into())),
        }
    }

    async fn fetch_unspent(
        &self,
        _client: &reqwest::Client,
        _info: &NetworkInfo,
        _addresses: &[String],
    ) -> Result<Vec<UnspentOutput>, WalletError> {
        Ok(Vec::new())
    }

    async fn push_transaction(
        &self,
        _client: &reqwest::Client,
        _info: &NetworkInfo,
        _hex_tx: &str,
    ) -> Result<String, WalletError> {
        Err(WalletError::Network("mock transport failure".into()))
    }
}

/// AdapterProvider over scripted mock adapters.
pub struct MockProvider {
    infos: HashMap<NetworkId, NetworkInfo>,
    adapters: HashMap<NetworkId, MockAdapter>,
}

impl MockProvider {
    pub fn new() -> Self {
        let infos = NetworkId::ALL
            .into_iter()
            .map(|id| {
                (
                    id,
                    NetworkInfo {
                        id,
                        name: id.name(),
                        symbol: id.symbol(),
                        provider: ProviderKind::Blockr,
                        address_url: "http://localhost/".to_string(),
                        query_suffix: "",
                        push_url: "http://localhost/push".to_string(),
                    },
                )
            })
            .collect();
        Self {
            infos,
            adapters: HashMap::new(),
        }
    }

    pub fn with_adapter(mut self, id: NetworkId, adapter: MockAdapter) -> Self {
        self.adapters.insert(id, adapter);
        self
    }
}

impl AdapterProvider for MockProvider {
    fn info(&self, id: NetworkId) -> &NetworkInfo {
        &self.infos[&id]
    }

    fn adapter(&self, id: NetworkId) -> &dyn NetworkAdapter {
        self.adapters
            .get(&id)
            .expect("mock adapter registered for dispatched network")
    }
}
