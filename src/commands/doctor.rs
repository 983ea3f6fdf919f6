use crate::cli::DoctorArgs;
use crate::config::Config;
use crate::registry::{lookup, ALL_ROLES};
use crate::rpc::{raw_rpc, RpcClient};
use crate::signer::load_signer;
use crate::types::DaoContext;
use alloy_provider::Provider;
use anyhow::Result;
use serde::Serialize;
use serde_json::json;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DoctorCheck {
    name: String,
    status: String,
    details: String,
    hint: Option<String>,
}

fn check(name: &str, status: &str, details: String, hint: Option<&str>) -> DoctorCheck {
    DoctorCheck {
        name: name.to_string(),
        status: status.to_string(),
        details,
        hint: hint.map(|hint| hint.to_string()),
    }
}

/// Verify everything a send needs: RPC, matching chain, registry, signer.
pub async fn run(args: DoctorArgs, config: Config, context: DaoContext) -> Result<()> {
    let mut checks = Vec::new();

    match lookup_coverage(&context) {
        Ok(()) => checks.push(check(
            "registry",
            "ok",
            format!("all roles deployed on {}", context.chain),
            None,
        )),
        Err(missing) => checks.push(check(
            "registry",
            "fail",
            format!("missing deployments on {}: {missing}", context.chain),
            Some("Pick a chain the DAO framework is deployed on."),
        )),
    }

    match load_signer(&args.signer, &config) {
        Ok(Some(_)) => checks.push(check("signer", "ok", "signer loaded".to_string(), None)),
        Ok(None) => checks.push(check(
            "signer",
            "warn",
            "no signer configured".to_string(),
            Some("Set --private-key or export the configured env var."),
        )),
        Err(err) => checks.push(check(
            "signer",
            "fail",
            format!("signer invalid: {err}"),
            None,
        )),
    }

    let resolved = config.resolve_rpc(args.rpc.rpc.as_deref(), args.rpc.chain.as_deref());
    let resolved = match resolved {
        Ok(resolved) => resolved,
        Err(err) => {
            checks.push(check(
                "rpc_configured",
                "fail",
                err.to_string(),
                Some("Set --rpc or add a chain alias with `whisper chains add`."),
            ));
            return output_checks(args.json, checks);
        }
    };

    let client = match RpcClient::new(&resolved.url) {
        Ok(client) => {
            checks.push(check("rpc_configured", "ok", resolved.url.clone(), None));
            client
        }
        Err(err) => {
            checks.push(check(
                "rpc_configured",
                "fail",
                format!("bad RPC URL: {err}"),
                None,
            ));
            return output_checks(args.json, checks);
        }
    };

    match client.provider.get_chain_id().await {
        Ok(chain_id) if chain_id == context.chain.0 => checks.push(check(
            "eth_chainId",
            "ok",
            format!("chain {chain_id} matches the DAO chain"),
            None,
        )),
        Ok(chain_id) => checks.push(check(
            "eth_chainId",
            "fail",
            format!("RPC is chain {chain_id}, DAO lives on {}", context.chain),
            Some("Point --rpc at the DAO's chain; submission is gated on it."),
        )),
        Err(err) => checks.push(check(
            "eth_chainId",
            "fail",
            format!("eth_chainId failed: {err}"),
            Some("Check the RPC URL or network connectivity."),
        )),
    }

    match raw_rpc::<String>(&client, "web3_clientVersion", json!([])).await {
        Ok(version) => checks.push(check("client_version", "ok", version, None)),
        Err(err) => checks.push(check(
            "client_version",
            "warn",
            format!("web3_clientVersion failed: {err}"),
            None,
        )),
    }

    output_checks(args.json, checks)
}

fn lookup_coverage(context: &DaoContext) -> Result<(), String> {
    let missing: Vec<String> = ALL_ROLES
        .iter()
        .filter(|role| lookup(**role, context.chain).is_err())
        .map(|role| role.to_string())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(missing.join(", "))
    }
}

fn output_checks(json: bool, checks: Vec<DoctorCheck>) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&checks)?);
        return Ok(());
    }
    for check in checks {
        println!("[{:<4}] {:<16} {}", check.status, check.name, check.details);
        if let Some(hint) = check.hint {
            println!("       hint: {hint}");
        }
    }
    Ok(())
}
