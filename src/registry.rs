//! Static registry of deployed DAO-framework contracts.
//!
//! Maps a logical contract role to its deployed address on each supported
//! chain. The table is fixed at build time; lookups never learn new entries
//! at runtime.

use alloy_primitives::{address, Address};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// EIP-155 chain identifier.
///
/// Displays as `0x`-prefixed hex, matching how frame and explorer URLs
/// reference chains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainId(pub u64);

impl ChainId {
    pub const MAINNET: Self = Self(0x1);
    pub const SEPOLIA: Self = Self(0xaa36a7);
    pub const GNOSIS: Self = Self(0x64);
    pub const POLYGON: Self = Self(0x89);
    pub const OPTIMISM: Self = Self(0xa);
    pub const ARBITRUM: Self = Self(0xa4b1);
    pub const BASE: Self = Self(0x2105);
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

impl FromStr for ChainId {
    type Err = ChainIdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            let id = u64::from_str_radix(hex, 16)
                .map_err(|_| ChainIdParseError(s.to_string()))?;
            return Ok(ChainId(id));
        }
        if let Ok(id) = s.parse::<u64>() {
            return Ok(ChainId(id));
        }
        SUPPORTED_CHAINS
            .iter()
            .find(|info| info.name.eq_ignore_ascii_case(s))
            .map(|info| info.id)
            .ok_or_else(|| ChainIdParseError(s.to_string()))
    }
}

#[derive(Debug, Error)]
#[error("invalid chain id {0} (expected 0x-hex, decimal, or a chain name)")]
pub struct ChainIdParseError(String);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("no {role} deployment known on chain {chain}")]
    UnknownChain { role: ContractRole, chain: ChainId },
}

/// Logical roles of the Moloch v3 deployment set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContractRole {
    V3FactoryAdvToken,
    V3FactoryOriginal,
    LootSingleton,
    SharesSingleton,
    BaalSingleton,
    GnosisMultisend,
    GnosisSignlib,
    TributeMinion,
    Poster,
    VaultSummoner,
    ZodiacFactory,
}

pub const ALL_ROLES: &[ContractRole] = &[
    ContractRole::V3FactoryAdvToken,
    ContractRole::V3FactoryOriginal,
    ContractRole::LootSingleton,
    ContractRole::SharesSingleton,
    ContractRole::BaalSingleton,
    ContractRole::GnosisMultisend,
    ContractRole::GnosisSignlib,
    ContractRole::TributeMinion,
    ContractRole::Poster,
    ContractRole::VaultSummoner,
    ContractRole::ZodiacFactory,
];

impl fmt::Display for ContractRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::V3FactoryAdvToken => "V3_FACTORY_ADV_TOKEN",
            Self::V3FactoryOriginal => "V3_FACTORY_ORIGINAL",
            Self::LootSingleton => "LOOT_SINGLETON",
            Self::SharesSingleton => "SHARES_SINGLETON",
            Self::BaalSingleton => "BAAL_SINGLETON",
            Self::GnosisMultisend => "GNOSIS_MULTISEND",
            Self::GnosisSignlib => "GNOSIS_SIGNLIB",
            Self::TributeMinion => "TRIBUTE_MINION",
            Self::Poster => "POSTER",
            Self::VaultSummoner => "VAULT_SUMMONER",
            Self::ZodiacFactory => "ZODIAC_FACTORY",
        };
        f.write_str(name)
    }
}

/// Supported chain with display name and block-explorer base URL.
#[derive(Debug, Clone, Copy)]
pub struct ChainInfo {
    pub id: ChainId,
    pub name: &'static str,
    pub explorer: &'static str,
}

pub const SUPPORTED_CHAINS: &[ChainInfo] = &[
    ChainInfo {
        id: ChainId::MAINNET,
        name: "mainnet",
        explorer: "https://etherscan.io",
    },
    ChainInfo {
        id: ChainId::SEPOLIA,
        name: "sepolia",
        explorer: "https://sepolia.etherscan.io",
    },
    ChainInfo {
        id: ChainId::GNOSIS,
        name: "gnosis",
        explorer: "https://gnosisscan.io",
    },
    ChainInfo {
        id: ChainId::POLYGON,
        name: "polygon",
        explorer: "https://polygonscan.com",
    },
    ChainInfo {
        id: ChainId::OPTIMISM,
        name: "optimism",
        explorer: "https://optimistic.etherscan.io",
    },
    ChainInfo {
        id: ChainId::ARBITRUM,
        name: "arbitrum",
        explorer: "https://arbiscan.io",
    },
    ChainInfo {
        id: ChainId::BASE,
        name: "base",
        explorer: "https://basescan.org",
    },
];

pub fn chain_info(chain: ChainId) -> Option<&'static ChainInfo> {
    SUPPORTED_CHAINS.iter().find(|info| info.id == chain)
}

/// Resolve the deployed address for a role on a chain.
pub fn lookup(role: ContractRole, chain: ChainId) -> Result<Address, RegistryError> {
    use ContractRole::*;

    let address = match (role, chain) {
        (V3FactoryAdvToken, ChainId::MAINNET)
        | (V3FactoryAdvToken, ChainId::GNOSIS)
        | (V3FactoryAdvToken, ChainId::POLYGON)
        | (V3FactoryAdvToken, ChainId::ARBITRUM) => {
            address!("8a4A9E36106Ee290811B89e06e2faFE913507965")
        }
        (V3FactoryAdvToken, ChainId::SEPOLIA) => {
            address!("D69e5B8F6FA0E5d94B93848700655A78DF24e387")
        }
        (V3FactoryAdvToken, ChainId::OPTIMISM) => {
            address!("84561C97156a128662B62952890469214FDC87bf")
        }
        (V3FactoryAdvToken, ChainId::BASE) => {
            address!("97Aaa5be8B38795245f1c38A883B44cccdfB3E11")
        }

        (V3FactoryOriginal, ChainId::MAINNET)
        | (V3FactoryOriginal, ChainId::GNOSIS)
        | (V3FactoryOriginal, ChainId::POLYGON) => {
            address!("7e988A9db2F8597735fc68D21060Daed948a3e8C")
        }
        (V3FactoryOriginal, ChainId::SEPOLIA) => {
            address!("B2B3909661552942AE1115E9Fc99dF0BC93d71d0")
        }
        (V3FactoryOriginal, ChainId::OPTIMISM) => {
            address!("3E0eAdE343Ddc556a6Cf0f858e4f685ba303ce71")
        }
        (V3FactoryOriginal, ChainId::ARBITRUM) => {
            address!("b08Cc8C343cF6dC20d8cf51Fb2D6C436c6390dAa")
        }
        (V3FactoryOriginal, ChainId::BASE) => {
            address!("22e0382194AC1e9929E023bBC2fD2BA6b778E098")
        }

        (LootSingleton, ChainId::SEPOLIA) => {
            address!("00768B047f73D88b6e9c14bcA97221d6E179d468")
        }
        (LootSingleton, ChainId::BASE) => {
            address!("52acf023d38A31f7e7bC92cCe5E68d36cC9752d6")
        }
        (LootSingleton, _) if chain_info(chain).is_some() => {
            address!("0444AE984b9563C8480244693ED65F25B3C64a4E")
        }

        (SharesSingleton, ChainId::SEPOLIA) => {
            address!("52acf023d38A31f7e7bC92cCe5E68d36cC9752d6")
        }
        (SharesSingleton, ChainId::BASE) => {
            address!("c650B598b095613cCddF0f49570FfA475175A5D5")
        }
        (SharesSingleton, _) if chain_info(chain).is_some() => {
            address!("8124Cbb807A7b64123F3dEc3EF64995d8B10d3Eb")
        }

        (BaalSingleton, ChainId::MAINNET)
        | (BaalSingleton, ChainId::GNOSIS)
        | (BaalSingleton, ChainId::POLYGON) => {
            address!("5DcE1044A7E2E35D6524001796cee47252f18411")
        }
        (BaalSingleton, ChainId::SEPOLIA) => {
            address!("c650B598b095613cCddF0f49570FfA475175A5D5")
        }
        (BaalSingleton, ChainId::OPTIMISM) => {
            address!("69f4D1788e39c87893C980c06EdF4b7f686e2938")
        }
        (BaalSingleton, ChainId::ARBITRUM) => {
            address!("17234C0Ae25AF09fAf57B9D5ea2B93C1f220E800")
        }
        (BaalSingleton, ChainId::BASE) => {
            address!("E0F33E95aF46EAd1Fe181d2A74919bff903cD5d4")
        }

        (GnosisMultisend, ChainId::SEPOLIA)
        | (GnosisMultisend, ChainId::OPTIMISM)
        | (GnosisMultisend, ChainId::BASE) => {
            address!("998739BFdAAdde7C933B942a68053933098f9EDa")
        }
        (GnosisMultisend, _) if chain_info(chain).is_some() => {
            address!("A238CBeb142c10Ef7Ad8442C6D1f9E89e07e7761")
        }

        (GnosisSignlib, ChainId::SEPOLIA)
        | (GnosisSignlib, ChainId::OPTIMISM)
        | (GnosisSignlib, ChainId::BASE) => {
            address!("98FFBBF51bb33A056B08ddf711f289936AafF717")
        }
        (GnosisSignlib, _) if chain_info(chain).is_some() => {
            address!("A65387F16B013cf2Af4605Ad8aA5ec25a2cbA3a2")
        }

        (TributeMinion, ChainId::MAINNET) | (TributeMinion, ChainId::GNOSIS) => {
            address!("5c17BFBaB751C5ddF1Ff267acF8fF919537F39Cf")
        }
        (TributeMinion, ChainId::SEPOLIA) => {
            address!("db4D89F2199b9Cf451B7Ff4bdC94b1c96De4bdD0")
        }
        (TributeMinion, ChainId::POLYGON) => {
            address!("51498dDdd2A8cdeC82932E08A37eBaF346C38EFd")
        }
        (TributeMinion, ChainId::OPTIMISM) | (TributeMinion, ChainId::ARBITRUM) => {
            address!("7707964B4C24A6b8b7B747F7507F56818857A7C2")
        }
        (TributeMinion, ChainId::BASE) => {
            address!("00768B047f73D88b6e9c14bcA97221d6E179d468")
        }

        // Same singleton on every chain, deployed via deterministic factory.
        (Poster, _) if chain_info(chain).is_some() => {
            address!("000000000000cd17345801aa8147b8D3950260FF")
        }

        (VaultSummoner, ChainId::MAINNET)
        | (VaultSummoner, ChainId::GNOSIS)
        | (VaultSummoner, ChainId::POLYGON) => {
            address!("594E630efbe8dbd810c168e3878817a4094bB312")
        }
        (VaultSummoner, ChainId::SEPOLIA) => {
            address!("763f5c2E59f997A6cC48Bf1228aBf61325244702")
        }
        (VaultSummoner, ChainId::OPTIMISM) => {
            address!("b04111e7b4576164145EF97EB81fd43DA0F2D675")
        }
        (VaultSummoner, ChainId::ARBITRUM) => {
            address!("C39E8D4DE75c6aC025a0C07dCd8Aeb0728C5DBF1")
        }
        (VaultSummoner, ChainId::BASE) => {
            address!("2eF2fC8a18A914818169eFa183db480d31a90c5D")
        }

        (ZodiacFactory, ChainId::SEPOLIA) | (ZodiacFactory, ChainId::BASE) => {
            address!("000000000000aDdB49795b0f9bA5BC298cDda236")
        }
        (ZodiacFactory, _) if chain_info(chain).is_some() => {
            address!("00000000000DC7F163742Eb4aBEf650037b1f588")
        }

        _ => return Err(RegistryError::UnknownChain { role, chain }),
    };
    Ok(address)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_role_resolves_on_every_supported_chain() {
        for role in ALL_ROLES {
            for info in SUPPORTED_CHAINS {
                assert!(
                    lookup(*role, info.id).is_ok(),
                    "missing {role} on {}",
                    info.name
                );
            }
        }
    }

    #[test]
    fn unsupported_chain_is_rejected() {
        let bogus = ChainId(424242);
        let err = lookup(ContractRole::Poster, bogus).unwrap_err();
        assert_eq!(
            err,
            RegistryError::UnknownChain {
                role: ContractRole::Poster,
                chain: bogus
            }
        );
    }

    #[test]
    fn sepolia_entries_match_deployment_table() {
        assert_eq!(
            lookup(ContractRole::Poster, ChainId::SEPOLIA).unwrap(),
            address!("000000000000cd17345801aa8147b8D3950260FF")
        );
        assert_eq!(
            lookup(ContractRole::GnosisMultisend, ChainId::SEPOLIA).unwrap(),
            address!("998739BFdAAdde7C933B942a68053933098f9EDa")
        );
        assert_eq!(
            lookup(ContractRole::BaalSingleton, ChainId::SEPOLIA).unwrap(),
            address!("c650B598b095613cCddF0f49570FfA475175A5D5")
        );
    }

    #[test]
    fn chain_id_parses_hex_decimal_and_names() {
        assert_eq!("0xaa36a7".parse::<ChainId>().unwrap(), ChainId::SEPOLIA);
        assert_eq!("11155111".parse::<ChainId>().unwrap(), ChainId::SEPOLIA);
        assert_eq!("base".parse::<ChainId>().unwrap(), ChainId::BASE);
        assert!("nonsense".parse::<ChainId>().is_err());
    }

    #[test]
    fn chain_id_displays_as_hex() {
        assert_eq!(ChainId::SEPOLIA.to_string(), "0xaa36a7");
        assert_eq!(ChainId::MAINNET.to_string(), "0x1");
    }
}
