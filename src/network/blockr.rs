//! blockr.io-style provider adapter (Bitcoin, Litecoin, Testnet)
//!
//! Responses arrive in a `{status, data}` envelope where `data` is a single
//! object or an array, and amounts are already whole-coin values.

use super::{AddressUpdate, NetworkAdapter, NetworkInfo, UnspentOutput};
use crate::error::WalletError;
use crate::storage::models::TxRecord;
use async_trait::async_trait;
use serde_json::Value;

pub struct BlockrAdapter;

fn join_addresses(addresses: &[String]) -> String {
    addresses.join(",")
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

/// Unwrap the `{status, data}` envelope into the data elements.
fn envelope_elements(value: &Value) -> Result<Vec<Value>, WalletError> {
    if value["status"].as_str() == Some("error") {
        return Err(WalletError::Network(
            value["message"].as_str().unwrap_or("provider error").into(),
        ));
    }
    let data = &value["data"];
    match data {
        Value::Array(items) => Ok(items.clone()),
        Value::Null => Err(WalletError::Network("missing data field".into())),
        other => Ok(vec![other.clone()]),
    }
}

fn coin_string(value: &Value) -> String {
    let coins = match value {
        Value::String(s) => s.parse::<f64>().unwrap_or(0.0),
        other => other.as_f64().unwrap_or(0.0),
    };
    format!("{:.8}", coins)
}

pub(crate) fn parse_balances(value: &Value) -> Result<Vec<(String, String)>, WalletError> {
    let mut balances = Vec::new();
    for element in envelope_elements(value)? {
        let Some(address) = element["address"].as_str() else {
            continue;
        };
        balances.push((address.to_string(), coin_string(&element["balance"])));
    }
    Ok(balances)
}

pub(crate) fn parse_transactions(value: &Value) -> Result<Vec<(String, Vec<TxRecord>)>, WalletError> {
    let mut result = Vec::new();
    for element in envelope_elements(value)? {
        let Some(address) = element["address"].as_str() else {
            continue;
        };
        let txs = element["txs"]
            .as_array()
            .map(|txs| {
                txs.iter()
                    .filter_map(|tx| {
                        Some(TxRecord {
                            tx: tx["tx"].as_str()?.to_string(),
                            time_utc: tx["time_utc"].as_str().unwrap_or_default().to_string(),
                            amount: coin_string(&tx["amount"]),
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();
        result.push((address.to_string(), txs));
    }
    Ok(result)
}

#[async_trait]
impl NetworkAdapter for BlockrAdapter {
    async fn fetch_updates(
        &self,
        client: &reqwest::Client,
        info: &NetworkInfo,
        addresses: &[String],
    ) -> Result<Vec<AddressUpdate>, WalletError> {
        let joined = join_addresses(addresses);
        let balance_url = format!("{}balance/{}{}", info.address_url, joined, info.query_suffix);
        let txs_url = format!("{}txs/{}{}", info.address_url, joined, info.query_suffix);

        let balances = parse_balances(&get_json(client, &balance_url).await?)?;
        let transactions = parse_transactions(&get_json(client, &txs_url).await?)?;

        let mut updates: Vec<AddressUpdate> = balances
            .into_iter()
            .map(|(address, balance)| AddressUpdate {
                address,
                balance,
                txs: Vec::new(),
            })
            .collect();

        for (address, txs) in transactions {
            if let Some(update) = updates.iter_mut().find(|u| u.address == address) {
                update.txs = txs;
            }
        }

        Ok(updates)
    }

    async fn fetch_unspent(
        &self,
        client: &reqwest::Client,
        info: &NetworkInfo,
        addresses: &[String],
    ) -> Result<Vec<UnspentOutput>, WalletError> {
        let joined = join_addresses(addresses);
        let url = format!("{}unspent/{}{}", info.address_url, joined, info.query_suffix);
        let value = get_json(client, &url).await?;

        let mut outputs = Vec::new();
        for element in envelope_elements(&value)? {
            let Some(address) = element["address"].as_str() else {
                continue;
            };
            if let Some(unspent) = element["unspent"].as_array() {
                for utxo in unspent {
                    let Some(tx) = utxo["tx"].as_str() else {
                        continue;
                    };
                    outputs.push(UnspentOutput {
                        address: address.to_string(),
                        tx: tx.to_string(),
                        amount: coin_string(&utxo["amount"]),
                        n: utxo["n"].as_i64().unwrap_or(0),
                    });
                }
            }
        }
        Ok(outputs)
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
        value["data"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| WalletError::Network("push response missing tx hash".into()))
    }
}
