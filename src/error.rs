use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WalletError {
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Unsupported network version byte: {0:#04x}")]
    UnsupportedNetwork(u8),

    #[error("Unknown network: {0}")]
    UnknownNetwork(String),

    #[error("Invalid private key: {0}")]
    InvalidKey(String),

    #[error("Key already exists: {0}")]
    KeyExists(String),

    #[error("Key not found: {0}")]
    KeyNotFound(String),

    #[error("Decryption failed: wrong password or corrupt ciphertext")]
    DecryptionFailed,

    #[error("Encryption error: {0}")]
    Encryption(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl IntoResponse for WalletError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            WalletError::InvalidAddress(_)
            | WalletError::UnsupportedNetwork(_)
            | WalletError::UnknownNetwork(_)
            | WalletError::InvalidKey(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            WalletError::KeyExists(_) => (StatusCode::CONFLICT, self.to_string()),
            WalletError::KeyNotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            WalletError::DecryptionFailed => (StatusCode::UNAUTHORIZED, self.to_string()),
            WalletError::Network(_) => (StatusCode::SERVICE_UNAVAILABLE, self.to_string()),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
