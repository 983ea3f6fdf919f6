use crate::cli::{ChainsAddArgs, ChainsListArgs, ChainsRemoveArgs};
use crate::config::Config;
use crate::registry::SUPPORTED_CHAINS;
use crate::rpc::RpcClient;
use crate::types::DaoContext;
use alloy_provider::Provider;
use anyhow::{Context, Result};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ChainListItem {
    alias: String,
    chain_id: Option<String>,
    rpc: Option<String>,
    explorer: Option<String>,
}

/// List the supported DAO chains and any configured RPC aliases.
pub async fn run_list(args: ChainsListArgs, config: Config, _context: DaoContext) -> Result<()> {
    let mut items: Vec<ChainListItem> = SUPPORTED_CHAINS
        .iter()
        .map(|info| ChainListItem {
            alias: info.name.to_string(),
            chain_id: Some(info.id.to_string()),
            rpc: None,
            explorer: Some(info.explorer.to_string()),
        })
        .collect();

    for (alias, cfg) in config.chains.clone().unwrap_or_default() {
        let chain_id = cfg.chain_id.map(|id| format!("{id:#x}"));
        match items.iter_mut().find(|item| item.alias == alias) {
            Some(item) => item.rpc = Some(redact_url(&cfg.rpc)),
            None => items.push(ChainListItem {
                alias,
                chain_id,
                rpc: Some(redact_url(&cfg.rpc)),
                explorer: None,
            }),
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    println!("{:<12} {:<10} {}", "alias", "chainId", "rpc");
    for item in items {
        println!(
            "{:<12} {:<10} {}",
            item.alias,
            item.chain_id.unwrap_or_else(|| "unknown".to_string()),
            item.rpc.unwrap_or_else(|| "not configured".to_string())
        );
    }
    Ok(())
}

/// Add a chain alias by probing the chain id from the RPC URL.
pub async fn run_add(args: ChainsAddArgs, mut config: Config, _context: DaoContext) -> Result<()> {
    let rpc = args.rpc.trim();
    let client = RpcClient::new(rpc)?;
    let chain_id = client
        .provider
        .get_chain_id()
        .await
        .context("failed to fetch eth_chainId")?;

    config.set_chain(args.alias.clone(), rpc.to_string(), chain_id);
    config.save()?;

    println!(
        "added chain {alias} (chainId {chain_id})",
        alias = args.alias
    );
    Ok(())
}

/// Remove a chain alias from the configuration file.
pub async fn run_remove(
    args: ChainsRemoveArgs,
    mut config: Config,
    _context: DaoContext,
) -> Result<()> {
    if !config.remove_chain(&args.alias) {
        anyhow::bail!("chain alias not found: {}", args.alias);
    }
    config.save()?;
    println!("removed chain {}", args.alias);
    Ok(())
}

/// Redact credentials from a URL string for display.
fn redact_url(value: &str) -> String {
    match url::Url::parse(value) {
        Ok(mut parsed) => {
            if !parsed.username().is_empty() {
                let _ = parsed.set_username("REDACTED");
            }
            if parsed.password().is_some() {
                let _ = parsed.set_password(Some("REDACTED"));
            }
            parsed.to_string()
        }
        Err(_) => value.to_string(),
    }
}
