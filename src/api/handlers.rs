use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::error::WalletError;
use crate::manager::WalletManager;
use crate::network::{NetworkId, UnspentOutput};

use super::types::{
    BalanceResponse, BroadcastRequest, BroadcastResponse, ImportKeyRequest, KeyInfo, NetworkEntry,
    RemoveKeyResponse, RevealKeyRequest, RevealKeyResponse, SetPasswordRequest,
    SetPasswordResponse, SyncResponse,
};

pub async fn set_password_handler(
    State(manager): State<Arc<WalletManager>>,
    Json(req): Json<SetPasswordRequest>,
) -> Result<Json<SetPasswordResponse>, WalletError> {
    manager.set_password(&req.password)?;
    Ok(Json(SetPasswordResponse {
        protected: manager.password_set(),
    }))
}

pub async fn import_key_handler(
    State(manager): State<Arc<WalletManager>>,
    Json(req): Json<ImportKeyRequest>,
) -> Result<Json<KeyInfo>, WalletError> {
    let record = manager.import_key(&req.wif, &req.password)?;
    Ok(Json(record.into()))
}

pub async fn list_keys_handler(
    State(manager): State<Arc<WalletManager>>,
) -> Result<Json<Vec<KeyInfo>>, WalletError> {
    let keys = manager.list_keys().into_iter().map(KeyInfo::from).collect();
    Ok(Json(keys))
}

pub async fn remove_key_handler(
    State(manager): State<Arc<WalletManager>>,
    Path(address): Path<String>,
) -> Result<Json<RemoveKeyResponse>, WalletError> {
    manager.remove_key(&address)?;
    Ok(Json(RemoveKeyResponse {
        address,
        status: "removed".to_string(),
    }))
}

pub async fn reveal_key_handler(
    State(manager): State<Arc<WalletManager>>,
    Path(address): Path<String>,
    Json(req): Json<RevealKeyRequest>,
) -> Result<Json<RevealKeyResponse>, WalletError> {
    let private_key = manager.reveal_private_key(&address, &req.password)?;
    Ok(Json(RevealKeyResponse {
        address,
        private_key,
    }))
}

pub async fn unspent_handler(
    State(manager): State<Arc<WalletManager>>,
    Path(address): Path<String>,
) -> Result<Json<Vec<UnspentOutput>>, WalletError> {
    let outputs = manager.unspent(&address).await?;
    Ok(Json(outputs))
}

pub async fn balance_handler(
    State(manager): State<Arc<WalletManager>>,
    Path(network): Path<String>,
) -> Result<Json<BalanceResponse>, WalletError> {
    let network: NetworkId = network.parse()?;
    let total = manager.balance_total(network);
    Ok(Json(BalanceResponse {
        network: network.name().to_string(),
        symbol: network.symbol().to_string(),
        total: format!("{:.8}", total),
    }))
}

pub async fn sync_handler(
    State(manager): State<Arc<WalletManager>>,
) -> Result<Json<SyncResponse>, WalletError> {
    let report = manager.sync().await?;
    Ok(Json(report.into()))
}

pub async fn broadcast_handler(
    State(manager): State<Arc<WalletManager>>,
    Json(req): Json<BroadcastRequest>,
) -> Result<Json<BroadcastResponse>, WalletError> {
    let network: NetworkId = req.network.parse()?;
    let txid = manager.broadcast(network, &req.hex).await?;
    Ok(Json(BroadcastResponse { txid }))
}

pub async fn networks_handler(
    State(manager): State<Arc<WalletManager>>,
) -> Result<Json<Vec<NetworkEntry>>, WalletError> {
    let entries = manager
        .networks()
        .into_iter()
        .map(NetworkEntry::from)
        .collect();
    Ok(Json(entries))
}
