use crate::cli::SendArgs;
use crate::config::Config;
use crate::lifecycle::{Lifecycle, MIN_DRAFT_LEN};
use crate::prepare::prepare_signal;
use crate::registry::ChainId;
use crate::rpc::{signing_provider, RpcClient};
use crate::signer::load_signer;
use crate::types::{b256_to_hex, format_hex, require_signer_or_dry_run, DaoContext};
use alloy_primitives::Log;
use alloy_provider::Provider;
use alloy_rpc_types::{TransactionInput, TransactionRequest};
use alloy_signer::Signer as _;
use anyhow::{Context as _, Result};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SendOutput {
    tx_hash: String,
    confirmed: bool,
    status: Option<bool>,
    proposal_id: Option<u64>,
    share_url: Option<String>,
    explorer_url: Option<String>,
}

/// Submit the whisper: prepare, sign, send, wait, extract the proposal id.
pub async fn run(args: SendArgs, config: Config, context: DaoContext) -> Result<()> {
    if args.dry_run {
        return run_dry(&args, &context);
    }

    let resolved = config.resolve_rpc(args.rpc.rpc.as_deref(), args.rpc.chain.as_deref())?;
    let client = RpcClient::new(&resolved.url)?;

    let wallet = load_signer(&args.signer, &config)?;
    require_signer_or_dry_run(wallet.is_some(), args.dry_run, "send")?;
    let Some(wallet) = wallet else {
        anyhow::bail!("send requires a signer");
    };

    let mut lifecycle = Lifecycle::new(context.chain, context.dao);
    lifecycle.initialize();

    let active_chain = client
        .provider
        .get_chain_id()
        .await
        .context("failed to fetch eth_chainId")?;
    lifecycle.connect(wallet.address(), ChainId(active_chain));
    lifecycle.set_draft(&args.message);

    lifecycle.begin_submission()?;
    tracing::info!(dao = %context.dao, chain = %context.chain, "submitting whisper");

    let descriptor = match prepare_signal(context.chain, context.dao, context.safe, &args.message) {
        Ok(descriptor) => descriptor,
        Err(err) => return Err(lifecycle.preparation_failed(&err.to_string()).into()),
    };
    lifecycle.preparation_ready(&descriptor)?;

    let provider = signing_provider(&resolved.url, wallet).await?;
    let request = TransactionRequest {
        to: Some(descriptor.to.into()),
        input: TransactionInput::new(descriptor.calldata.clone()),
        value: Some(descriptor.value),
        ..Default::default()
    };

    let pending = match provider.send_transaction(request).await {
        Ok(pending) => pending,
        Err(err) => return Err(lifecycle.submission_rejected(&err.to_string()).into()),
    };
    let tx_hash = *pending.tx_hash();
    lifecycle.submission_accepted(tx_hash)?;
    tracing::info!(tx = %tx_hash, "transaction accepted");

    if args.no_wait {
        let output = SendOutput {
            tx_hash: b256_to_hex(tx_hash),
            confirmed: false,
            status: None,
            proposal_id: None,
            share_url: None,
            explorer_url: lifecycle.explorer_url(),
        };
        return print_output(args.json, output);
    }

    let receipt = pending
        .get_receipt()
        .await
        .context("waiting for the transaction receipt failed")?;
    let logs: Vec<Log> = receipt
        .inner
        .logs()
        .iter()
        .map(|log| log.inner.clone())
        .collect();
    lifecycle.receipt_confirmed(tx_hash, &logs);
    tracing::debug!(phase = %lifecycle.phase(), "receipt applied");

    let output = SendOutput {
        tx_hash: b256_to_hex(tx_hash),
        confirmed: true,
        status: Some(receipt.status()),
        proposal_id: lifecycle.proposal_id(),
        share_url: lifecycle.share_url(),
        explorer_url: lifecycle.explorer_url(),
    };
    print_output(args.json, output)
}

/// Prepare only: print the call descriptor without signing or sending.
fn run_dry(args: &SendArgs, context: &DaoContext) -> Result<()> {
    if args.message.len() < MIN_DRAFT_LEN {
        anyhow::bail!(
            "draft is {} characters, needs more than 5",
            args.message.len()
        );
    }
    let descriptor = prepare_signal(context.chain, context.dao, context.safe, &args.message)?;
    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "dryRun": true,
                "to": format!("{:#x}", descriptor.to),
                "function": descriptor.function,
                "calldata": format_hex(&descriptor.calldata),
            }))?
        );
    } else {
        println!("dry-run, nothing sent");
        println!("to: {:#x}", descriptor.to);
        println!("function: {}", descriptor.function);
        println!("calldata: {}", format_hex(&descriptor.calldata));
    }
    Ok(())
}

fn print_output(json: bool, output: SendOutput) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if output.confirmed {
        println!("I hear you.");
    }
    println!("tx hash: {}", output.tx_hash);
    if let Some(status) = output.status {
        println!("status: {}", if status { "success" } else { "reverted" });
    }
    match output.proposal_id {
        Some(id) => println!("proposal id: {id}"),
        None if output.confirmed => println!("proposal id: not found in receipt logs"),
        None => {}
    }
    if let Some(share) = &output.share_url {
        println!("cast it: {share}");
    }
    if let Some(explorer) = &output.explorer_url {
        println!("explorer: {explorer}");
    }
    Ok(())
}
