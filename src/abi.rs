//! ABI encoding for the signal-proposal call chain.
//!
//! A whisper lands on chain as `Baal.submitProposal` whose `proposalData`
//! is a Gnosis MultiSend batch containing a single `Poster.post` call.

use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::SolCall;

alloy_sol_types::sol! {
    function submitProposal(
        bytes proposalData,
        uint32 expiration,
        uint256 baalGas,
        string details
    ) external payable returns (uint256);

    function post(string content, string tag) external;

    function multiSend(bytes transactions) external payable;
}

pub fn encode_submit_proposal(
    proposal_data: Bytes,
    expiration: u32,
    baal_gas: U256,
    details: String,
) -> Bytes {
    let call = submitProposalCall {
        proposalData: proposal_data,
        expiration,
        baalGas: baal_gas,
        details,
    };
    Bytes::from(call.abi_encode())
}

pub fn encode_post(content: String, tag: String) -> Bytes {
    let call = postCall { content, tag };
    Bytes::from(call.abi_encode())
}

pub fn encode_multi_send(transactions: Bytes) -> Bytes {
    let call = multiSendCall { transactions };
    Bytes::from(call.abi_encode())
}

/// Pack one transaction in the MultiSend wire layout:
/// operation (1 byte) ++ to (20) ++ value (32) ++ data length (32) ++ data.
pub fn pack_multisend_tx(to: Address, value: U256, data: &Bytes) -> Vec<u8> {
    const CALL_OPERATION: u8 = 0;

    let mut packed = Vec::with_capacity(85 + data.len());
    packed.push(CALL_OPERATION);
    packed.extend_from_slice(to.as_slice());
    packed.extend_from_slice(&value.to_be_bytes::<32>());
    packed.extend_from_slice(&U256::from(data.len()).to_be_bytes::<32>());
    packed.extend_from_slice(data);
    packed
}

pub fn submit_proposal_selector() -> [u8; 4] {
    submitProposalCall::SELECTOR
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    #[test]
    fn multisend_tx_layout() {
        let to = address!("000000000000cd17345801aa8147b8D3950260FF");
        let data = Bytes::from(vec![0xde, 0xad, 0xbe, 0xef]);
        let packed = pack_multisend_tx(to, U256::ZERO, &data);

        assert_eq!(packed.len(), 85 + 4);
        assert_eq!(packed[0], 0, "operation must be CALL");
        assert_eq!(&packed[1..21], to.as_slice());
        assert!(packed[21..53].iter().all(|byte| *byte == 0), "zero value");
        assert_eq!(packed[53..85], U256::from(4u64).to_be_bytes::<32>());
        assert_eq!(&packed[85..], data.as_ref());
    }

    #[test]
    fn submit_proposal_calldata_starts_with_selector() {
        let calldata = encode_submit_proposal(
            Bytes::from(vec![0x01]),
            0,
            U256::ZERO,
            "{}".to_string(),
        );
        assert_eq!(calldata[..4], submit_proposal_selector());
    }
}
