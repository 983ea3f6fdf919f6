use crate::cli::SignerArgs;
use crate::config::Config;
use alloy_signer_local::PrivateKeySigner;
use anyhow::{anyhow, Result};

/// Load a signer from `--private-key`, then the configured env var.
///
/// Returns `None` when neither source is set; whether that is acceptable
/// depends on the command (dry runs go without one).
pub fn load_signer(args: &SignerArgs, config: &Config) -> Result<Option<PrivateKeySigner>> {
    if args.private_key.is_some() && args.private_key_env.is_some() {
        anyhow::bail!("cannot set both --private-key and --private-key-env");
    }

    if let Some(key) = args.private_key.as_deref() {
        return Ok(Some(parse_key(key)?));
    }

    let env = args
        .private_key_env
        .clone()
        .unwrap_or_else(|| config.signer_env());
    if let Ok(key) = std::env::var(&env) {
        return Ok(Some(parse_key(&key)?));
    }
    Ok(None)
}

fn parse_key(key: &str) -> Result<PrivateKeySigner> {
    key.trim()
        .parse()
        .map_err(|err| anyhow!("invalid private key: {err}"))
}
