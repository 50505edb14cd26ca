//! Network registry and explorer adapters
//!
//! - `NetworkId` identifies a coin network by its address version byte
//! - `NetworkRegistry` maps each network to its explorer endpoints
//! - `NetworkAdapter` normalizes heterogeneous provider responses into the
//!   shared `AddressUpdate` shape

mod blockcypher;
mod blockr;

pub use blockcypher::BlockCypherAdapter;
pub use blockr::BlockrAdapter;

use crate::error::WalletError;
use crate::storage::models::TxRecord;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Divisor converting explorer base units (satoshi-scale) to whole coins.
pub const COIN_DIVISOR: f64 = 100_000_000.0;

/// Format a base-unit amount as a whole-coin decimal string, fixed at 8
/// decimal places (`-` prefixed when `outgoing`).
pub fn format_coin_amount(base_units: f64, outgoing: bool) -> String {
    let coins = base_units / COIN_DIVISOR;
    // Zero has no sign; never emit "-0.00000000"
    let signed = if outgoing && coins != 0.0 { -coins } else { coins };
    format!("{:.8}", signed)
}

/// Supported coin networks, identified by address version byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum NetworkId {
    Bitcoin,
    Litecoin,
    Dogecoin,
    Testnet,
}

impl NetworkId {
    pub const ALL: [NetworkId; 4] = [
        NetworkId::Bitcoin,
        NetworkId::Litecoin,
        NetworkId::Dogecoin,
        NetworkId::Testnet,
    ];

    /// Address version byte (first byte of a decoded base58check address).
    pub fn version_byte(self) -> u8 {
        match self {
            NetworkId::Bitcoin => 0x00,
            NetworkId::Litecoin => 0x30,
            NetworkId::Dogecoin => 0x1e,
            NetworkId::Testnet => 0x6f,
        }
    }

    pub fn from_version_byte(byte: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|n| n.version_byte() == byte)
    }

    /// WIF version byte, `address version | 0x80` for all supported coins.
    pub fn wif_version_byte(self) -> u8 {
        self.version_byte() | 0x80
    }

    pub fn from_wif_version_byte(byte: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|n| n.wif_version_byte() == byte)
    }

    pub fn name(self) -> &'static str {
        match self {
            NetworkId::Bitcoin => "bitcoin",
            NetworkId::Litecoin => "litecoin",
            NetworkId::Dogecoin => "dogecoin",
            NetworkId::Testnet => "testnet",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            NetworkId::Bitcoin => "BTC",
            NetworkId::Litecoin => "LTC",
            NetworkId::Dogecoin => "DOGE",
            NetworkId::Testnet => "TBTC",
        }
    }
}

impl From<NetworkId> for u8 {
    fn from(id: NetworkId) -> u8 {
        id.version_byte()
    }
}

impl TryFrom<u8> for NetworkId {
    type Error = String;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        NetworkId::from_version_byte(byte)
            .ok_or_else(|| format!("unknown network version byte {:#04x}", byte))
    }
}

impl FromStr for NetworkId {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|n| n.name() == lower || n.symbol().to_lowercase() == lower)
            .ok_or_else(|| WalletError::UnknownNetwork(s.to_string()))
    }
}

impl std::fmt::Display for NetworkId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Which provider API shape an endpoint speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    /// blockr.io style: `{status, data: ...}` envelopes, whole-coin amounts
    Blockr,
    /// BlockCypher style: bare object or array, satoshi amounts in `txrefs`
    BlockCypher,
}

/// Endpoint templates and display metadata for one network.
#[derive(Debug, Clone)]
pub struct NetworkInfo {
    pub id: NetworkId,
    pub name: &'static str,
    pub symbol: &'static str,
    pub provider: ProviderKind,
    /// Base address-query URL; adapters append the operation and addresses
    pub address_url: String,
    /// Query string appended to address queries
    pub query_suffix: &'static str,
    /// Transaction broadcast URL
    pub push_url: String,
}

/// Optional per-network endpoint replacements, sourced from configuration.
#[derive(Debug, Clone, Default)]
pub struct EndpointOverride {
    pub address_url: Option<String>,
    pub push_url: Option<String>,
}

/// Table mapping each supported network to its remote endpoints, with
/// configured overrides applied over the built-in defaults.
pub struct NetworkRegistry {
    infos: Vec<NetworkInfo>,
}

impl NetworkRegistry {
    pub fn new() -> Self {
        Self::with_overrides(&std::collections::HashMap::new())
    }

    pub fn with_overrides(
        overrides: &std::collections::HashMap<NetworkId, EndpointOverride>,
    ) -> Self {
        let mut infos = Self::default_infos();
        for info in &mut infos {
            if let Some(replacement) = overrides.get(&info.id) {
                if let Some(address_url) = &replacement.address_url {
                    log::info!("{} address endpoint overridden: {}", info.id, address_url);
                    info.address_url = address_url.clone();
                }
                if let Some(push_url) = &replacement.push_url {
                    log::info!("{} push endpoint overridden: {}", info.id, push_url);
                    info.push_url = push_url.clone();
                }
            }
        }
        Self { infos }
    }

    fn default_infos() -> Vec<NetworkInfo> {
        vec![
            NetworkInfo {
                id: NetworkId::Bitcoin,
                name: "bitcoin",
                symbol: "BTC",
                provider: ProviderKind::Blockr,
                address_url: "https://btc.blockr.io/api/v1/address/".to_string(),
                query_suffix: "?confirmations=0",
                push_url: "https://btc.blockr.io/api/v1/tx/push".to_string(),
            },
            NetworkInfo {
                id: NetworkId::Litecoin,
                name: "litecoin",
                symbol: "LTC",
                provider: ProviderKind::Blockr,
                address_url: "https://ltc.blockr.io/api/v1/address/".to_string(),
                query_suffix: "?confirmations=0",
                push_url: "https://ltc.blockr.io/api/v1/tx/push".to_string(),
            },
            NetworkInfo {
                id: NetworkId::Dogecoin,
                name: "dogecoin",
                symbol: "DOGE",
                provider: ProviderKind::BlockCypher,
                address_url: "https://api.blockcypher.com/v1/doge/main/addrs/".to_string(),
                query_suffix: "",
                push_url: "https://api.blockcypher.com/v1/doge/main/txs/push".to_string(),
            },
            NetworkInfo {
                id: NetworkId::Testnet,
                name: "testnet",
                symbol: "TBTC",
                provider: ProviderKind::Blockr,
                address_url: "https://tbtc.blockr.io/api/v1/address/".to_string(),
                query_suffix: "?confirmations=0",
                push_url: "https://tbtc.blockr.io/api/v1/tx/push".to_string(),
            },
        ]
    }
}

impl Default for NetworkRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Normalized per-address sync payload shared by all providers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddressUpdate {
    pub address: String,
    /// Whole-coin decimal string, 8 fixed decimals
    pub balance: String,
    pub txs: Vec<TxRecord>,
}

/// Normalized unspent output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnspentOutput {
    pub address: String,
    pub tx: String,
    /// Whole-coin decimal string, 8 fixed decimals
    pub amount: String,
    pub n: i64,
}

/// Provider capability interface: one implementation per response shape.
///
/// Implementations normalize amounts to whole-coin units and never mutate
/// vault state; they only produce `AddressUpdate` slices for the aggregator
/// to merge.
#[async_trait]
pub trait NetworkAdapter: Send + Sync {
    /// Fetch balances and transaction history for a bucket of addresses.
    async fn fetch_updates(
        &self,
        client: &reqwest::Client,
        info: &NetworkInfo,
        addresses: &[String],
    ) -> Result<Vec<AddressUpdate>, WalletError>;

    /// Fetch unspent outputs for a bucket of addresses.
    async fn fetch_unspent(
        &self,
        client: &reqwest::Client,
        info: &NetworkInfo,
        addresses: &[String],
    ) -> Result<Vec<UnspentOutput>, WalletError>;

    /// Broadcast a signed transaction, returning its hash.
    async fn push_transaction(
        &self,
        client: &reqwest::Client,
        info: &NetworkInfo,
        hex_tx: &str,
    ) -> Result<String, WalletError>;
}

/// Source of per-network endpoint metadata and adapters.
///
/// `NetworkRegistry` is the production implementation; tests substitute mock
/// providers to exercise the aggregator without HTTP.
pub trait AdapterProvider: Send + Sync {
    fn info(&self, id: NetworkId) -> &NetworkInfo;
    fn adapter(&self, id: NetworkId) -> &dyn NetworkAdapter;
}

static BLOCKR: BlockrAdapter = BlockrAdapter;
static BLOCKCYPHER: BlockCypherAdapter = BlockCypherAdapter;

impl AdapterProvider for NetworkRegistry {
    fn info(&self, id: NetworkId) -> &NetworkInfo {
        self.infos
            .iter()
            .find(|i| i.id == id)
            .expect("registry covers all networks")
    }

    fn adapter(&self, id: NetworkId) -> &dyn NetworkAdapter {
        match self.info(id).provider {
            ProviderKind::Blockr => &BLOCKR,
            ProviderKind::BlockCypher => &BLOCKCYPHER,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_byte_round_trip() {
        for id in NetworkId::ALL {
            assert_eq!(NetworkId::from_version_byte(id.version_byte()), Some(id));
            assert_eq!(
                NetworkId::from_wif_version_byte(id.wif_version_byte()),
                Some(id)
            );
        }
        assert_eq!(NetworkId::from_version_byte(0x05), None);
    }

    #[test]
    fn test_network_from_str() {
        assert_eq!("bitcoin".parse::<NetworkId>().unwrap(), NetworkId::Bitcoin);
        assert_eq!("DOGE".parse::<NetworkId>().unwrap(), NetworkId::Dogecoin);
        assert!("monero".parse::<NetworkId>().is_err());
    }

    #[test]
    fn test_registry_covers_all_networks() {
        let registry = NetworkRegistry::new();
        for id in NetworkId::ALL {
            let info = registry.info(id);
            assert_eq!(info.id, id);
            assert!(info.address_url.starts_with("https://"));
            assert!(info.push_url.starts_with("https://"));
        }
    }

    #[test]
    fn test_format_coin_amount() {
        assert_eq!(format_coin_amount(100_000_000.0, false), "1.00000000");
        assert_eq!(format_coin_amount(12_345.0, false), "0.00012345");
        assert_eq!(format_coin_amount(50_000_000.0, true), "-0.50000000");
    }

    #[test]
    fn test_format_coin_amount_zero_outgoing_has_no_sign() {
        assert_eq!(format_coin_amount(0.0, true), "0.00000000");
        assert_eq!(format_coin_amount(0.0, false), "0.00000000");
    }

    #[test]
    fn test_registry_applies_endpoint_overrides() {
        let mut overrides = std::collections::HashMap::new();
        overrides.insert(
            NetworkId::Dogecoin,
            EndpointOverride {
                address_url: Some("http://localhost:9090/addrs/".to_string()),
                push_url: None,
            },
        );
        let registry = NetworkRegistry::with_overrides(&overrides);

        let doge = registry.info(NetworkId::Dogecoin);
        assert_eq!(doge.address_url, "http://localhost:9090/addrs/");
        // push endpoint not overridden, keeps the default
        assert!(doge.push_url.starts_with("https://api.blockcypher.com/"));

        // other networks untouched
        let btc = registry.info(NetworkId::Bitcoin);
        assert!(btc.address_url.starts_with("https://btc.blockr.io/"));
    }
}
