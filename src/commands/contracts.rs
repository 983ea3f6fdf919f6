use crate::cli::ContractsArgs;
use crate::config::Config;
use crate::registry::{lookup, ALL_ROLES};
use crate::rpc::RpcClient;
use crate::types::{address_to_hex, DaoContext};
use alloy_provider::Provider;
use anyhow::Result;
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ContractRow {
    role: String,
    address: String,
    code_len: Option<u64>,
    deployed: Option<bool>,
}

/// Print the deployed contract set for the DAO's chain.
///
/// Probes each address for code unless `--offline` is set.
pub async fn run(args: ContractsArgs, config: Config, context: DaoContext) -> Result<()> {
    let client = if args.offline {
        None
    } else {
        let resolved = config.resolve_rpc(args.rpc.rpc.as_deref(), args.rpc.chain.as_deref())?;
        Some(RpcClient::new(&resolved.url)?)
    };

    let mut rows = Vec::new();
    for role in ALL_ROLES {
        let address = lookup(*role, context.chain)?;
        let code_len = match &client {
            Some(client) => Some(client.provider.get_code_at(address).await?.len() as u64),
            None => None,
        };
        rows.push(ContractRow {
            role: role.to_string(),
            address: address_to_hex(address),
            code_len,
            deployed: code_len.map(|len| len > 0),
        });
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    println!("chain: {}", context.chain);
    println!("{:<22} {:<44} {}", "role", "address", "code");
    for row in rows {
        let code = match (row.code_len, row.deployed) {
            (Some(len), Some(true)) => format!("{len} bytes"),
            (Some(_), _) => "NOT DEPLOYED".to_string(),
            (None, _) => "-".to_string(),
        };
        println!("{:<22} {:<44} {}", row.role, row.address, code);
    }
    Ok(())
}
