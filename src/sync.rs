//! Multi-network sync aggregator
//!
//! Partitions vault addresses into per-network buckets, queries every bucket
//! concurrently, and merges the results back into the vault. One network's
//! failure never blocks or fails another's query, and the vault is persisted
//! exactly once, after every dispatched bucket has settled.

use crate::error::WalletError;
use crate::network::{AdapterProvider, AddressUpdate, NetworkId};
use crate::storage::models::Vault;
use crate::storage::VaultRepository;
use futures::future::join_all;
use std::collections::BTreeMap;
use tokio::sync::watch;

/// Per-sync outcome summary. Failed networks keep their previous cached
/// balances and transactions.
#[derive(Debug, Default, Clone)]
pub struct SyncReport {
    pub synced: Vec<NetworkId>,
    pub failed: Vec<NetworkId>,
    /// Records actually rewritten during the merge
    pub updated_addresses: usize,
    /// True when the sync was cancelled before commit; nothing was merged
    /// or persisted
    pub cancelled: bool,
}

enum BucketOutcome {
    Success(NetworkId, Vec<AddressUpdate>),
    Failed(NetworkId, String),
    Cancelled,
}

/// Group vault addresses by network; only non-empty buckets are dispatched.
fn partition(vault: &Vault) -> BTreeMap<NetworkId, Vec<String>> {
    let mut buckets: BTreeMap<NetworkId, Vec<String>> = BTreeMap::new();
    for record in vault.values() {
        buckets
            .entry(record.network)
            .or_default()
            .push(record.address.clone());
    }
    buckets
}

/// Write a slice of updates into the vault by address match. Records removed
/// since dispatch are skipped rather than resurrected.
fn merge_updates(vault: &mut Vault, updates: Vec<AddressUpdate>) -> usize {
    let mut written = 0;
    for update in updates {
        if let Some(record) = vault.get_mut(&update.address) {
            record.balance = update.balance;
            record.txs = Some(update.txs);
            written += 1;
        }
    }
    written
}

/// Run one full sync cycle.
///
/// The cancel channel is observed at the network suspension point; a
/// cancelled sync discards all in-flight results and leaves the persisted
/// vault untouched.
pub async fn sync_vault(
    repo: &dyn VaultRepository,
    provider: &dyn AdapterProvider,
    client: &reqwest::Client,
    cancel: watch::Receiver<bool>,
) -> Result<SyncReport, WalletError> {
    let buckets = partition(&repo.load_vault());
    if buckets.is_empty() {
        log::debug!("Sync skipped: vault is empty");
        return Ok(SyncReport::default());
    }

    log::info!(
        "Dispatching sync for {} network(s): {:?}",
        buckets.len(),
        buckets.keys().collect::<Vec<_>>()
    );

    let queries = buckets.into_iter().map(|(network, addresses)| {
        let mut cancel = cancel.clone();
        async move {
            let fetch = provider
                .adapter(network)
                .fetch_updates(client, provider.info(network), &addresses);
            tokio::select! {
                _ = cancel.wait_for(|flag| *flag) => BucketOutcome::Cancelled,
                result = fetch => match result {
                    Ok(updates) => BucketOutcome::Success(network, updates),
                    Err(e) => BucketOutcome::Failed(network, e.to_string()),
                },
            }
        }
    });

    let outcomes = join_all(queries).await;

    if outcomes
        .iter()
        .any(|o| matches!(o, BucketOutcome::Cancelled))
    {
        log::info!("Sync cancelled; discarding in-flight results");
        return Ok(SyncReport {
            cancelled: true,
            ..SyncReport::default()
        });
    }

    // All buckets settled; take a fresh snapshot so records removed during
    // the sync stay removed, merge everything, persist once.
    let mut vault = repo.load_vault();
    let mut report = SyncReport::default();

    for outcome in outcomes {
        match outcome {
            BucketOutcome::Success(network, updates) => {
                report.updated_addresses += merge_updates(&mut vault, updates);
                report.synced.push(network);
            }
            BucketOutcome::Failed(network, message) => {
                log::warn!("Sync failed for {}: {}", network, message);
                report.failed.push(network);
            }
            BucketOutcome::Cancelled => unreachable!("handled above"),
        }
    }

    repo.save_vault(&vault)?;
    log::info!(
        "Sync done: {} network(s) ok, {} failed, {} address(es) updated",
        report.synced.len(),
        report.failed.len(),
        report.updated_addresses
    );

    Ok(report)
}
