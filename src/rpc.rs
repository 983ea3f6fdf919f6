use alloy_primitives::B256;
use alloy_provider::{Provider, ProviderBuilder, RootProvider};
use alloy_rpc_types::TransactionReceipt;
use anyhow::{anyhow, Context, Result};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

#[derive(Clone)]
pub struct RpcClient {
    pub url: String,
    pub provider: RootProvider,
    pub http: Client,
}

impl RpcClient {
    pub fn new(url: &str) -> Result<Self> {
        let provider = RootProvider::new_http(url.parse()?);
        Ok(Self {
            url: url.to_string(),
            provider,
            http: Client::new(),
        })
    }
}

pub async fn get_transaction_receipt(
    client: &RpcClient,
    tx_hash: B256,
) -> Result<Option<TransactionReceipt>> {
    Ok(client.provider.get_transaction_receipt(tx_hash).await?)
}

/// Poll for a receipt until the transaction is mined or the timeout hits.
pub async fn wait_for_receipt(
    client: &RpcClient,
    tx_hash: B256,
    timeout: Duration,
    poll_interval: Duration,
) -> Result<TransactionReceipt> {
    let start = tokio::time::Instant::now();
    loop {
        if let Some(receipt) = get_transaction_receipt(client, tx_hash).await? {
            return Ok(receipt);
        }
        if start.elapsed() > timeout {
            anyhow::bail!("transaction {tx_hash:#x} was not mined in time");
        }
        tokio::time::sleep(poll_interval).await;
    }
}

pub async fn raw_rpc<T: for<'de> Deserialize<'de>>(
    client: &RpcClient,
    method: &str,
    params: serde_json::Value,
) -> Result<T> {
    let payload = json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": method,
        "params": params,
    });
    let response = client
        .http
        .post(&client.url)
        .json(&payload)
        .send()
        .await
        .context("rpc request failed")?;
    let status = response.status();
    let value: serde_json::Value = response.json().await.context("rpc decode failed")?;
    if !status.is_success() {
        anyhow::bail!("rpc error status {status}: {value}");
    }
    if let Some(error) = value.get("error") {
        anyhow::bail!("rpc error: {error}");
    }
    serde_json::from_value(value.get("result").cloned().unwrap_or_default())
        .context("rpc missing result")
}

/// Provider with a local signer attached, for transaction submission.
pub async fn signing_provider(
    url: &str,
    wallet: alloy_signer_local::PrivateKeySigner,
) -> Result<impl Provider> {
    ProviderBuilder::new()
        .wallet(wallet)
        .connect(url)
        .await
        .map_err(|err| anyhow!("failed to connect signing provider: {err}"))
}
