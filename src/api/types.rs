use crate::network::NetworkInfo;
use crate::storage::models::{KeyPairRecord, TxRecord};
use crate::sync::SyncReport;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct SetPasswordRequest {
    /// Empty string disables password protection
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SetPasswordResponse {
    pub protected: bool,
}

#[derive(Debug, Deserialize)]
pub struct ImportKeyRequest {
    pub wif: String,
    #[serde(default)]
    pub password: String,
}

/// Vault record as exposed over the API. Key material itself is never
/// listed, only its encryption state.
#[derive(Debug, Serialize)]
pub struct KeyInfo {
    pub address: String,
    pub network: String,
    pub symbol: String,
    pub balance: String,
    pub encrypted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub txs: Option<Vec<TxRecord>>,
}

impl From<KeyPairRecord> for KeyInfo {
    fn from(record: KeyPairRecord) -> Self {
        Self {
            address: record.address,
            network: record.network.name().to_string(),
            symbol: record.network.symbol().to_string(),
            balance: record.balance,
            encrypted: record.private_key.is_encrypted(),
            txs: record.txs,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RevealKeyRequest {
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct RevealKeyResponse {
    pub address: String,
    pub private_key: String,
}

#[derive(Debug, Serialize)]
pub struct RemoveKeyResponse {
    pub address: String,
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    pub network: String,
    pub symbol: String,
    pub total: String,
}

#[derive(Debug, Serialize)]
pub struct SyncResponse {
    pub synced: Vec<String>,
    pub failed: Vec<String>,
    pub updated_addresses: usize,
    pub cancelled: bool,
}

impl From<SyncReport> for SyncResponse {
    fn from(report: SyncReport) -> Self {
        Self {
            synced: report.synced.iter().map(|n| n.name().to_string()).collect(),
            failed: report.failed.iter().map(|n| n.name().to_string()).collect(),
            updated_addresses: report.updated_addresses,
            cancelled: report.cancelled,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct BroadcastRequest {
    pub network: String,
    pub hex: String,
}

#[derive(Debug, Serialize)]
pub struct BroadcastResponse {
    pub txid: String,
}

#[derive(Debug, Serialize)]
pub struct NetworkEntry {
    pub network: String,
    pub symbol: String,
    pub version_byte: u8,
}

impl From<&NetworkInfo> for NetworkEntry {
    fn from(info: &NetworkInfo) -> Self {
        Self {
            network: info.name.to_string(),
            symbol: info.symbol.to_string(),
            version_byte: info.id.version_byte(),
        }
    }
}
