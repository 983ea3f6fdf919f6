use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Deserialize, Serialize, Clone)]
pub struct Config {
    pub chains: Option<BTreeMap<String, ChainConfig>>,
    pub dao: Option<DaoConfig>,
    pub signer: Option<SignerConfig>,
    #[serde(skip)]
    pub path: PathBuf,
}

#[derive(Debug, Default, Deserialize, Serialize, Clone)]
pub struct ChainConfig {
    pub rpc: String,
    #[serde(rename = "chainId")]
    pub chain_id: Option<u64>,
}

/// Target DAO defaults; any field may be overridden by CLI flags.
#[derive(Debug, Default, Deserialize, Serialize, Clone)]
pub struct DaoConfig {
    pub chain: Option<String>,
    pub dao: Option<String>,
    pub safe: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize, Clone)]
pub struct SignerConfig {
    pub private_key_env: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ResolvedRpc {
    pub url: String,
    pub alias: Option<String>,
    pub chain_id: Option<u64>,
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => default_config_path(),
        };

        if !path.exists() {
            let mut config = Self::default();
            config.path = path;
            return Ok(config);
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let mut config: Config = toml::from_str(&contents)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        config.path = path;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let path = if self.path.as_os_str().is_empty() {
            default_config_path()
        } else {
            self.path.clone()
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(&self)?;
        fs::write(&path, contents)?;
        Ok(())
    }

    pub fn signer_env(&self) -> String {
        self.signer
            .as_ref()
            .and_then(|cfg| cfg.private_key_env.clone())
            .unwrap_or_else(|| "PRIVATE_KEY".to_string())
    }

    pub fn resolve_rpc(&self, rpc: Option<&str>, chain: Option<&str>) -> Result<ResolvedRpc> {
        if rpc.is_some() && chain.is_some() {
            anyhow::bail!("cannot set both --rpc and --chain");
        }

        if let Some(rpc) = rpc {
            return Ok(ResolvedRpc {
                url: rpc.to_string(),
                alias: None,
                chain_id: None,
            });
        }

        if let Some(alias) = chain {
            if let Some(chain_cfg) = self.chains.as_ref().and_then(|chains| chains.get(alias)) {
                return Ok(ResolvedRpc {
                    url: chain_cfg.rpc.clone(),
                    alias: Some(alias.to_string()),
                    chain_id: chain_cfg.chain_id,
                });
            }
            anyhow::bail!("unknown chain alias: {alias}");
        }

        if let Some(chains) = self.chains.as_ref() {
            if let Some(chain_cfg) = chains.get("default") {
                return Ok(ResolvedRpc {
                    url: chain_cfg.rpc.clone(),
                    alias: Some("default".to_string()),
                    chain_id: chain_cfg.chain_id,
                });
            }
            if chains.len() == 1 {
                if let Some((alias, chain_cfg)) = chains.iter().next() {
                    return Ok(ResolvedRpc {
                        url: chain_cfg.rpc.clone(),
                        alias: Some(alias.clone()),
                        chain_id: chain_cfg.chain_id,
                    });
                }
            }
        }
        anyhow::bail!("no rpc configured (set --rpc or --chain, or configure a default)")
    }

    pub fn set_chain(&mut self, alias: String, rpc: String, chain_id: u64) {
        let chains = self.chains.get_or_insert_with(BTreeMap::new);
        chains.insert(
            alias,
            ChainConfig {
                rpc,
                chain_id: Some(chain_id),
            },
        );
    }

    pub fn remove_chain(&mut self, alias: &str) -> bool {
        self.chains
            .as_mut()
            .and_then(|chains| chains.remove(alias))
            .is_some()
    }
}

fn default_config_path() -> PathBuf {
    if let Some(dir) = dirs::config_dir() {
        return dir.join("whisper").join("config.toml");
    }
    PathBuf::from("./config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_rpc_flag_wins() {
        let config = Config::default();
        let resolved = config.resolve_rpc(Some("http://localhost:8545"), None).unwrap();
        assert_eq!(resolved.url, "http://localhost:8545");
        assert_eq!(resolved.alias, None);
    }

    #[test]
    fn chain_alias_resolves_from_config() {
        let mut config = Config::default();
        config.set_chain("sepolia".to_string(), "http://rpc.example".to_string(), 11155111);
        let resolved = config.resolve_rpc(None, Some("sepolia")).unwrap();
        assert_eq!(resolved.url, "http://rpc.example");
        assert_eq!(resolved.chain_id, Some(11155111));
        assert!(config.resolve_rpc(None, Some("unknown")).is_err());
    }

    #[test]
    fn single_configured_chain_is_the_default() {
        let mut config = Config::default();
        config.set_chain("base".to_string(), "http://base.example".to_string(), 8453);
        let resolved = config.resolve_rpc(None, None).unwrap();
        assert_eq!(resolved.alias.as_deref(), Some("base"));
    }

    #[test]
    fn dao_section_round_trips_through_toml() {
        let parsed: Config = toml::from_str(
            r#"
            [dao]
            chain = "0xaa36a7"
            dao = "0x0d7239f8d3cbac7ca960613a2cce56def842fbca"

            [chains.sepolia]
            rpc = "http://rpc.example"
            chainId = 11155111
            "#,
        )
        .unwrap();
        let dao = parsed.dao.as_ref().unwrap();
        assert_eq!(dao.chain.as_deref(), Some("0xaa36a7"));
        assert!(parsed.chains.unwrap().contains_key("sepolia"));
    }
}
