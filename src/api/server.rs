use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use super::handlers;
use crate::manager::WalletManager;

pub async fn start_server(addr: &str) -> anyhow::Result<()> {
    let manager = Arc::new(WalletManager::new());

    // Set ALLOWED_ORIGINS="https://wallet.example.com" for production;
    // unset allows any origin (development mode)
    let cors = match std::env::var("ALLOWED_ORIGINS") {
        Ok(origins) if !origins.is_empty() => {
            log::info!("CORS configured for origins: {}", origins);
            let origin_list: Vec<_> = origins
                .split(',')
                .map(|s| s.trim().parse().expect("Invalid CORS origin"))
                .collect();
            CorsLayer::new()
                .allow_origin(origin_list)
                .allow_methods(Any)
                .allow_headers(Any)
        }
        _ => {
            log::warn!("CORS: Allowing all origins (development mode). Set ALLOWED_ORIGINS env var for production.");
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        }
    };

    let app = Router::new()
        .route("/api/password", post(handlers::set_password_handler))
        .route("/api/keys/import", post(handlers::import_key_handler))
        .route("/api/keys", get(handlers::list_keys_handler))
        .route("/api/keys/:address", delete(handlers::remove_key_handler))
        .route(
            "/api/keys/:address/reveal",
            post(handlers::reveal_key_handler),
        )
        .route(
            "/api/keys/:address/unspent",
            get(handlers::unspent_handler),
        )
        .route("/api/balance/:network", get(handlers::balance_handler))
        .route("/api/sync", post(handlers::sync_handler))
        .route("/api/broadcast", post(handlers::broadcast_handler))
        .route("/api/networks", get(handlers::networks_handler))
        .layer(cors)
        .with_state(manager.clone());

    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(manager))
        .await?;

    Ok(())
}

/// Handle graceful shutdown signals (Ctrl+C, SIGTERM)
async fn shutdown_signal(manager: Arc<WalletManager>) {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            log::info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            log::info!("Received SIGTERM signal");
        },
    }

    // Stale in-flight merges must not land after shutdown begins
    manager.cancel_sync();
    log::info!("Shutdown signal received, exiting gracefully...");
}
