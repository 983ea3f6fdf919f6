use crate::cli::StatusArgs;
use crate::config::Config;
use crate::lifecycle::{explorer_tx_url, extract_proposal_id, share_url};
use crate::rpc::{get_transaction_receipt, wait_for_receipt, RpcClient};
use crate::types::{b256_to_hex, parse_b256, DaoContext};
use alloy_primitives::Log;
use anyhow::Result;
use serde::Serialize;
use std::time::Duration;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusOutput {
    tx_hash: String,
    mined: bool,
    status: Option<bool>,
    proposal_id: Option<u64>,
    share_url: Option<String>,
    explorer_url: Option<String>,
}

/// Re-derive the proposal id and follow-up links from a mined transaction.
pub async fn run(args: StatusArgs, config: Config, context: DaoContext) -> Result<()> {
    let resolved = config.resolve_rpc(args.rpc.rpc.as_deref(), args.rpc.chain.as_deref())?;
    let client = RpcClient::new(&resolved.url)?;
    let tx_hash = parse_b256(&args.tx_hash)?;

    let receipt = if args.wait {
        let timeout = Duration::from_millis(args.timeout_ms.unwrap_or(300_000));
        let poll = Duration::from_millis(args.poll_ms.unwrap_or(2_000));
        Some(wait_for_receipt(&client, tx_hash, timeout, poll).await?)
    } else {
        get_transaction_receipt(&client, tx_hash).await?
    };

    let output = match receipt {
        Some(receipt) => {
            let logs: Vec<Log> = receipt
                .inner
                .logs()
                .iter()
                .map(|log| log.inner.clone())
                .collect();
            let proposal_id = extract_proposal_id(&logs);
            StatusOutput {
                tx_hash: b256_to_hex(tx_hash),
                mined: true,
                status: Some(receipt.status()),
                proposal_id,
                share_url: proposal_id.map(|id| share_url(context.chain, context.dao, id)),
                explorer_url: explorer_tx_url(context.chain, tx_hash),
            }
        }
        None => StatusOutput {
            tx_hash: b256_to_hex(tx_hash),
            mined: false,
            status: None,
            proposal_id: None,
            share_url: None,
            explorer_url: explorer_tx_url(context.chain, tx_hash),
        },
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("tx: {}", output.tx_hash);
    if !output.mined {
        println!("not mined yet");
    }
    if let Some(status) = output.status {
        println!("status: {}", if status { "success" } else { "reverted" });
    }
    if output.mined {
        match output.proposal_id {
            Some(id) => println!("proposal id: {id}"),
            None => println!("proposal id: not found in receipt logs"),
        }
    }
    if let Some(share) = &output.share_url {
        println!("cast it: {share}");
    }
    if let Some(explorer) = &output.explorer_url {
        println!("explorer: {explorer}");
    }
    Ok(())
}
