/// Wallet configuration from environment variables
///
/// Controls where vault documents are stored, how long remote explorer
/// calls may run before timing out, and which explorer endpoints each
/// network talks to.
use std::collections::HashMap;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::network::{EndpointOverride, NetworkId};

#[derive(Clone, Debug)]
pub struct WalletConfig {
    /// Directory holding the persisted vault documents
    pub data_dir: PathBuf,
    /// Timeout applied to every remote explorer request
    pub http_timeout: Duration,
    /// Per-network endpoint replacements applied over the built-in defaults
    pub endpoint_overrides: HashMap<NetworkId, EndpointOverride>,
}

impl WalletConfig {
    /// Load configuration from environment variables
    ///
    /// Environment variables:
    /// - `COINVAULT_DATA_DIR`: vault document directory (default `./vault`)
    /// - `HTTP_TIMEOUT_SECS`: remote request timeout in seconds (default 30)
    /// - `COINVAULT_<NETWORK>_URL`: address-query endpoint for one network,
    ///   e.g. `COINVAULT_DOGECOIN_URL`
    /// - `COINVAULT_<NETWORK>_PUSH_URL`: broadcast endpoint for one network
    pub fn from_env() -> Self {
        let data_dir = env::var("COINVAULT_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./vault"));
        log::info!("Vault data directory: {}", data_dir.display());

        let timeout_secs = env::var("HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(30);
        log::info!("Explorer request timeout: {}s", timeout_secs);

        Self {
            data_dir,
            http_timeout: Duration::from_secs(timeout_secs),
            endpoint_overrides: Self::endpoint_overrides_from_env(),
        }
    }

    fn endpoint_overrides_from_env() -> HashMap<NetworkId, EndpointOverride> {
        let mut overrides = HashMap::new();
        for id in NetworkId::ALL {
            let prefix = format!("COINVAULT_{}", id.name().to_uppercase());
            let address_url = env::var(format!("{prefix}_URL")).ok();
            let push_url = env::var(format!("{prefix}_PUSH_URL")).ok();
            if address_url.is_some() || push_url.is_some() {
                overrides.insert(
                    id,
                    EndpointOverride {
                        address_url,
                        push_url,
                    },
                );
            }
        }
        overrides
    }
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./vault"),
            http_timeout: Duration::from_secs(30),
            endpoint_overrides: HashMap::new(),
        }
    }
}
