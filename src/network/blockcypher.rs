//! BlockCypher provider adapter (Dogecoin)
//!
//! Responses are a bare object for one address or an array for several;
//! amounts are integer base units under `txrefs`, with a negative
//! `tx_output_n` flagging the outgoing leg of a transaction.

use super::{format_coin_amount, AddressUpdate, NetworkAdapter, NetworkInfo, UnspentOutput};
use crate::error::WalletError;
use crate::storage::models::TxRecord;
use async_trait::async_trait;
use serde_json::Value;

pub struct BlockCypherAdapter;

fn join_addresses(addresses: &[String]) -> String {
    addresses.join(";")
}

/// BlockCypher returns one bare object for a single address and an array
/// otherwise; normalize to a slice of elements.
fn elements(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        other => vec![other],
    }
}

async fn get_json(client: &reqwest::Client, url: &str) -> Result<Value, WalletError> {
    log::debug!("GET {}", url);
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| WalletError::Network(e.to_string()))?;

    if !response.status().is_success() {
        return Err(WalletError::Network(format!(
            "{} returned {}",
            url,
            response.status()
        )));
    }

    response
        .json()
        .await
        .map_err(|e| WalletError::Network(e.to_string()))
}

pub(crate) fn parse_updates(value: Value) -> Vec<AddressUpdate> {
    elements(value)
        .into_iter()
        .filter_map(|element| {
            let address = element["address"].as_str()?.to_string();
            let balance = format_coin_amount(element["balance"].as_f64().unwrap_or(0.0), false);

            let txs = element["txrefs"]
                .as_array()
                .map(|txrefs| {
                    txrefs
                        .iter()
                        .filter_map(|txref| {
                            let outgoing = txref["tx_output_n"].as_i64().unwrap_or(0) < 0;
                            Some(TxRecord {
                                tx: txref["tx_hash"].as_str()?.to_string(),
                                time_utc: txref["confirmed"]
                                    .as_str()
                                    .unwrap_or_default()
                                    .to_string(),
                                amount: format_coin_amount(
                                    txref["value"].as_f64().unwrap_or(0.0),
                                    outgoing,
                                ),
                            })
                        })
                        .collect()
                })
                .unwrap_or_default();

            Some(AddressUpdate {
                address,
                balance,
                txs,
            })
        })
        .collect()
}

pub(crate) fn parse_unspent(value: Value) -> Vec<UnspentOutput> {
    elements(value)
        .into_iter()
        .filter_map(|element| {
            let address = element["address"].as_str()?.to_string();
            let outputs = element["txrefs"]
                .as_array()
                .map(|txrefs| {
                    txrefs
                        .iter()
                        .filter_map(|txref| {
                            Some(UnspentOutput {
                                address: address.clone(),
                                tx: txref["tx_hash"].as_str()?.to_string(),
                                amount: format_coin_amount(
                                    txref["value"].as_f64().unwrap_or(0.0),
                                    false,
                                ),
                                n: txref["tx_output_n"].as_i64().unwrap_or(0),
                            })
                        })
                        .collect::<Vec<_>>()
                })
                .unwrap_or_default();
            Some(outputs)
        })
        .flatten()
        .collect()
}

#[async_trait]
impl NetworkAdapter for BlockCypherAdapter {
    async fn fetch_updates(
        &self,
        client: &reqwest::Client,
        info: &NetworkInfo,
        addresses: &[String],
    ) -> Result<Vec<AddressUpdate>, WalletError> {
        let url = format!(
            "{}{}{}",
            info.address_url,
            join_addresses(addresses),
            info.query_suffix
        );
        Ok(parse_updates(get_json(client, &url).await?))
    }

    async fn fetch_unspent(
        &self,
        client: &reqwest::Client,
        info: &NetworkInfo,
        addresses: &[String],
    ) -> Result<Vec<UnspentOutput>, WalletError> {
        let separator = if info.query_suffix.is_empty() { "?" } else { "&" };
        let url = format!(
            "{}{}{}{}unspentOnly=true",
            info.address_url,
            join_addresses(addresses),
            info.query_suffix,
            separator
        );
        Ok(parse_unspent(get_json(client, &url).await?))
    }

    async fn push_transaction(
        &self,
        client: &reqwest::Client,
        info: &NetworkInfo,
        hex_tx: &str,
    ) -> Result<String, WalletError> {
        log::debug!("POST {}", info.push_url);
        let response = client
            .post(info.push_url.as_str())
            .json(&serde_json::json!({ "hex": hex_tx }))
            .send()
            .await
            .map_err(|e| WalletError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(WalletError::Network(format!(
                "push returned {}",
                response.status()
            )));
        }

        let value: Value = response
            .json()
            .await
            .map_err(|e| WalletError::Network(e.to_string()))?;
        value["tx"]["hash"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| WalletError::Network("push response missing tx hash".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_updates_scales_and_signs() {
        let value = json!({
            "address": "DDoge",
            "balance": 250_000_000u64,
            "txrefs": [
                {"tx_hash": "abc", "confirmed": "2015-03-01T12:00:00Z",
                 "value": 100_000_000u64, "tx_output_n": 0},
                {"tx_hash": "def", "confirmed": "2015-03-02T12:00:00Z",
                 "value": 50_000_000u64, "tx_output_n": -1}
            ]
        });

        let updates = parse_updates(value);
        assert_eq!(updates.len(), 1);
        let update = &updates[0];
        assert_eq!(update.address, "DDoge");
        assert_eq!(update.balance, "2.50000000");
        assert_eq!(update.txs[0].amount, "1.00000000");
        // Negative output index marks the outgoing leg
        assert_eq!(update.txs[1].amount, "-0.50000000");
    }

    #[test]
    fn test_parse_updates_array_and_missing_txrefs() {
        let value = json!([
            {"address": "Da", "balance": 0},
            {"address": "Db", "balance": 100_000_000u64}
        ]);
        let updates = parse_updates(value);
        assert_eq!(updates.len(), 2);
        assert!(updates[0].txs.is_empty());
        assert_eq!(updates[1].balance, "1.00000000");
    }

    #[test]
    fn test_parse_unspent_keeps_output_index() {
        let value = json!({
            "address": "Da",
            "txrefs": [{"tx_hash": "abc", "value": 12_345u64, "tx_output_n": 2}]
        });
        let outputs = parse_unspent(value);
        assert_eq!(outputs.len(), 1);
        assert_eq!(outputs[0].tx, "abc");
        assert_eq!(outputs[0].amount, "0.00012345");
        assert_eq!(outputs[0].n, 2);
    }
}
