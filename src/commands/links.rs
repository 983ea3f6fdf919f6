use crate::cli::LinksArgs;
use crate::config::Config;
use crate::lifecycle::{explorer_tx_url, share_url};
use crate::types::{parse_b256, DaoContext};
use anyhow::Result;
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LinksOutput {
    share_url: Option<String>,
    explorer_url: Option<String>,
}

/// Build share and explorer links offline from the configured DAO context.
pub fn run(args: LinksArgs, _config: Config, context: DaoContext) -> Result<()> {
    if args.propid.is_none() && args.tx.is_none() {
        anyhow::bail!("nothing to link: set --propid and/or --tx");
    }

    let output = LinksOutput {
        share_url: args
            .propid
            .map(|id| share_url(context.chain, context.dao, id)),
        explorer_url: match args.tx.as_deref() {
            Some(tx) => explorer_tx_url(context.chain, parse_b256(tx)?),
            None => None,
        },
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if let Some(share) = &output.share_url {
        println!("cast it: {share}");
    }
    if let Some(explorer) = &output.explorer_url {
        println!("explorer: {explorer}");
    }
    Ok(())
}
