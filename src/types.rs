use crate::registry::ChainId;
use alloy_primitives::{address, Address, B256};
use anyhow::{anyhow, Result};
use std::str::FromStr;

pub const DEFAULT_DAO: Address = address!("0d7239f8d3cbac7ca960613a2cce56def842fbca");
pub const DEFAULT_SAFE: Address = address!("d4e8ee356fc8ec94abc44f36fb6ad8e66bcc9e5e");
pub const DEFAULT_CHAIN: ChainId = ChainId::SEPOLIA;

/// The DAO a whisper is aimed at: chain, Baal address, treasury safe.
#[derive(Clone, Debug)]
pub struct DaoContext {
    pub chain: ChainId,
    pub dao: Address,
    pub safe: Address,
}

impl DaoContext {
    /// Flags win over config, config wins over the compiled-in defaults.
    pub fn from_config_and_flags(
        config: &crate::config::Config,
        dao: Option<&str>,
        safe: Option<&str>,
    ) -> Result<Self> {
        let chain = match config.dao.as_ref().and_then(|cfg| cfg.chain.as_deref()) {
            Some(value) => value
                .parse::<ChainId>()
                .map_err(|err| anyhow!("bad [dao] chain in config: {err}"))?,
            None => DEFAULT_CHAIN,
        };
        let dao = dao
            .map(|value| value.to_string())
            .or_else(|| config.dao.as_ref()?.dao.clone());
        let safe = safe
            .map(|value| value.to_string())
            .or_else(|| config.dao.as_ref()?.safe.clone());

        Ok(Self {
            chain,
            dao: dao.as_deref().map(parse_address).transpose()?.unwrap_or(DEFAULT_DAO),
            safe: safe.as_deref().map(parse_address).transpose()?.unwrap_or(DEFAULT_SAFE),
        })
    }
}

pub fn parse_address(value: &str) -> Result<Address> {
    Address::from_str(value).map_err(|err| anyhow!("invalid address {value}: {err}"))
}

pub fn parse_b256(value: &str) -> Result<B256> {
    B256::from_str(value).map_err(|err| anyhow!("invalid bytes32 {value}: {err}"))
}

pub fn format_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

pub fn address_to_hex(value: Address) -> String {
    format!("{value:#x}")
}

pub fn b256_to_hex(value: B256) -> String {
    format!("{value:#x}")
}

pub fn require_signer_or_dry_run(has_signer: bool, dry_run: bool, cmd: &str) -> Result<()> {
    if !has_signer && !dry_run {
        anyhow::bail!("{cmd} requires a signer or --dry-run");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn defaults_apply_without_config_or_flags() {
        let context =
            DaoContext::from_config_and_flags(&Config::default(), None, None).unwrap();
        assert_eq!(context.chain, ChainId::SEPOLIA);
        assert_eq!(context.dao, DEFAULT_DAO);
        assert_eq!(context.safe, DEFAULT_SAFE);
    }

    #[test]
    fn dao_flag_overrides_defaults() {
        let context = DaoContext::from_config_and_flags(
            &Config::default(),
            Some("0x4748c895cb256c31e81c132c74e5a4636116d009"),
            None,
        )
        .unwrap();
        assert_eq!(
            context.dao,
            address!("4748c895cb256c31e81c132c74e5a4636116d009")
        );
        assert_eq!(context.safe, DEFAULT_SAFE);
    }

    #[test]
    fn bad_address_flag_is_rejected() {
        assert!(
            DaoContext::from_config_and_flags(&Config::default(), Some("0xnope"), None).is_err()
        );
    }
}
