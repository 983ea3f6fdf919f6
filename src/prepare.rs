//! Builds the executable call descriptor for a signal proposal.

use crate::abi::{encode_multi_send, encode_post, encode_submit_proposal, pack_multisend_tx};
use crate::registry::{lookup, ChainId, ContractRole, RegistryError};
use alloy_primitives::{Address, Bytes, U256};
use serde_json::json;
use thiserror::Error;

pub const PROPOSAL_TITLE: &str = "The Fly Hears...";
const POSTER_TAG: &str = "daohaus.proposal.database";

#[derive(Debug, Error)]
pub enum PrepareError {
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error("failed to encode proposal details: {0}")]
    Details(#[from] serde_json::Error),
}

/// Fully-specified instruction ready for signing and submission.
#[derive(Debug, Clone)]
pub struct CallDescriptor {
    pub to: Address,
    pub function: &'static str,
    pub calldata: Bytes,
    pub value: U256,
}

/// Prepare the `submitProposal` call carrying the whisper.
///
/// The draft text becomes the description of a `Poster.post` content blob,
/// wrapped in a single-transaction MultiSend batch that the DAO executes
/// when the proposal passes.
pub fn prepare_signal(
    chain: ChainId,
    dao: Address,
    safe: Address,
    draft: &str,
) -> Result<CallDescriptor, PrepareError> {
    let poster = lookup(ContractRole::Poster, chain)?;
    // Resolved up front so an unsupported chain fails before any encoding,
    // even though the multisend target itself is the DAO's configured one.
    lookup(ContractRole::GnosisMultisend, chain)?;

    let details = serde_json::to_string(&json!({
        "title": PROPOSAL_TITLE,
        "description": draft,
        "link": "",
        "proposalType": "SIGNAL",
    }))?;

    let content = serde_json::to_string(&json!({
        "daoId": format!("{dao:#x}"),
        "safeId": format!("{safe:#x}"),
        "table": "signal",
        "queryType": "list",
        "title": PROPOSAL_TITLE,
        "description": draft,
        "link": "",
    }))?;

    let post_data = encode_post(content, POSTER_TAG.to_string());
    let packed = pack_multisend_tx(poster, U256::ZERO, &post_data);
    let proposal_data = encode_multi_send(Bytes::from(packed));

    Ok(CallDescriptor {
        to: dao,
        function: "submitProposal",
        calldata: encode_submit_proposal(proposal_data, 0, U256::ZERO, details),
        value: U256::ZERO,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abi::submit_proposal_selector;
    use crate::types::{DEFAULT_DAO, DEFAULT_SAFE};

    #[test]
    fn descriptor_targets_the_dao() {
        let descriptor =
            prepare_signal(ChainId::SEPOLIA, DEFAULT_DAO, DEFAULT_SAFE, "a whispered secret")
                .expect("prepare");
        assert_eq!(descriptor.to, DEFAULT_DAO);
        assert_eq!(descriptor.function, "submitProposal");
        assert_eq!(descriptor.value, U256::ZERO);
        assert_eq!(descriptor.calldata[..4], submit_proposal_selector());
    }

    #[test]
    fn unsupported_chain_fails_preparation() {
        let err =
            prepare_signal(ChainId(424242), DEFAULT_DAO, DEFAULT_SAFE, "a whispered secret")
                .unwrap_err();
        assert!(matches!(err, PrepareError::Registry(_)));
    }

    #[test]
    fn draft_text_lands_in_the_details_json() {
        let descriptor =
            prepare_signal(ChainId::SEPOLIA, DEFAULT_DAO, DEFAULT_SAFE, "meet me at midnight")
                .expect("prepare");
        let calldata = hex::encode(&descriptor.calldata);
        let needle = hex::encode("meet me at midnight".as_bytes());
        assert!(calldata.contains(&needle));
    }
}
