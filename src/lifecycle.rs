//! Signal-proposal submission lifecycle.
//!
//! A pure state machine driving draft → prepare → submit → confirm, kept
//! free of RPC and terminal concerns so every transition is unit-testable.
//! The command layer feeds it the outcomes of the external collaborators
//! (preparer, signer, receipt wait) and renders its derived facts.

use crate::prepare::CallDescriptor;
use crate::registry::{chain_info, ChainId};
use alloy_primitives::{Address, Log, B256, U256};
use std::fmt;
use thiserror::Error;

pub const MIN_DRAFT_LEN: usize = 6;

const COMPOSE_BASE: &str = "https://warpcast.com/~/compose";
const FRAME_BASE: &str = "https://frames.farcastle.net/molochv3";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Uninitialized,
    Drafting,
    AwaitingPreparation,
    AwaitingWalletConfirmation,
    AwaitingChainConfirmation,
    Confirmed,
    Failed,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Uninitialized => "uninitialized",
            Self::Drafting => "drafting",
            Self::AwaitingPreparation => "awaiting preparation",
            Self::AwaitingWalletConfirmation => "awaiting wallet confirmation",
            Self::AwaitingChainConfirmation => "awaiting chain confirmation",
            Self::Confirmed => "confirmed",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// A reason submission is currently not permitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Blocker {
    NotInitialized,
    NotConnected,
    WrongChain { active: ChainId, required: ChainId },
    DraftTooShort { len: usize },
    AttemptInFlight,
    AlreadySubmitted,
    AlreadyConfirmed,
}

impl fmt::Display for Blocker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotInitialized => write!(f, "lifecycle not initialized"),
            Self::NotConnected => write!(f, "no account connected"),
            Self::WrongChain { active, required } => {
                write!(f, "connected to chain {active}, DAO lives on {required}")
            }
            Self::DraftTooShort { len } => {
                write!(f, "draft is {len} characters, needs more than 5")
            }
            Self::AttemptInFlight => write!(f, "a submission is already in flight"),
            Self::AlreadySubmitted => write!(f, "a transaction was already sent"),
            Self::AlreadyConfirmed => write!(f, "the whisper is already confirmed"),
        }
    }
}

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("submission blocked: {}", format_blockers(.0))]
    PreconditionNotMet(Vec<Blocker>),
    #[error("proposal preparation failed: {0}")]
    PreparationFailed(String),
    #[error("transaction rejected: {0}")]
    SubmissionRejected(String),
    #[error("operation not valid while {0}")]
    InvalidTransition(Phase),
}

fn format_blockers(blockers: &[Blocker]) -> String {
    blockers
        .iter()
        .map(|blocker| blocker.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// One submission attempt of a whisper against a fixed DAO and chain.
///
/// All mutable state (draft, handle, result id) is owned by a single
/// instance; a new attempt issues a new handle, so receipts from an older
/// attempt can never be acted upon.
#[derive(Debug)]
pub struct Lifecycle {
    required_chain: ChainId,
    dao: Address,
    phase: Phase,
    account: Option<Address>,
    active_chain: Option<ChainId>,
    draft: String,
    handle: Option<B256>,
    proposal_id: Option<u64>,
    last_error: Option<String>,
}

impl Lifecycle {
    pub fn new(required_chain: ChainId, dao: Address) -> Self {
        Self {
            required_chain,
            dao,
            phase: Phase::Uninitialized,
            account: None,
            active_chain: None,
            draft: String::new(),
            handle: None,
            proposal_id: None,
            last_error: None,
        }
    }

    /// One-shot readiness gate; replaces polling an ambient "SDK loaded"
    /// flag. Calling it again once ready is a no-op.
    pub fn initialize(&mut self) {
        if self.phase == Phase::Uninitialized {
            self.phase = Phase::Drafting;
        }
    }

    /// Record the wallet session. Connecting while already connected keeps
    /// the existing address.
    pub fn connect(&mut self, account: Address, chain: ChainId) {
        if self.account.is_none() {
            self.account = Some(account);
        }
        self.active_chain = Some(chain);
    }

    pub fn disconnect(&mut self) {
        self.account = None;
        self.active_chain = None;
    }

    pub fn set_draft(&mut self, text: &str) {
        self.draft = text.to_string();
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn account(&self) -> Option<Address> {
        self.account
    }

    pub fn handle(&self) -> Option<B256> {
        self.handle
    }

    /// Derived numeric proposal index, once extracted. `Some(0)` is a real
    /// id and is distinct from "not derived".
    pub fn proposal_id(&self) -> Option<u64> {
        self.proposal_id
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Everything currently standing between the draft and a submission.
    pub fn blockers(&self) -> Vec<Blocker> {
        let mut blockers = Vec::new();
        if self.phase == Phase::Uninitialized {
            blockers.push(Blocker::NotInitialized);
        }
        match self.account {
            None => blockers.push(Blocker::NotConnected),
            Some(_) => match self.active_chain {
                Some(active) if active != self.required_chain => {
                    blockers.push(Blocker::WrongChain {
                        active,
                        required: self.required_chain,
                    });
                }
                _ => {}
            },
        }
        if self.draft.len() < MIN_DRAFT_LEN {
            blockers.push(Blocker::DraftTooShort {
                len: self.draft.len(),
            });
        }
        match self.phase {
            Phase::AwaitingPreparation | Phase::AwaitingWalletConfirmation => {
                blockers.push(Blocker::AttemptInFlight);
            }
            Phase::AwaitingChainConfirmation => blockers.push(Blocker::AlreadySubmitted),
            Phase::Confirmed => blockers.push(Blocker::AlreadyConfirmed),
            _ => {}
        }
        if self.handle.is_some() && self.phase != Phase::AwaitingChainConfirmation {
            blockers.push(Blocker::AlreadySubmitted);
        }
        blockers
    }

    pub fn can_submit(&self) -> bool {
        self.blockers().is_empty()
    }

    /// Sharing needs a derived proposal id; an id of zero qualifies.
    pub fn share_available(&self) -> bool {
        self.proposal_id.is_some()
    }

    /// The explorer link only needs a transaction handle, confirmed or not.
    pub fn explorer_available(&self) -> bool {
        self.handle.is_some()
    }

    /// Start a submission attempt. Re-validates every guard, also on retry
    /// after a failure.
    pub fn begin_submission(&mut self) -> Result<(), LifecycleError> {
        let blockers = self.blockers();
        if !blockers.is_empty() {
            return Err(LifecycleError::PreconditionNotMet(blockers));
        }
        self.last_error = None;
        self.phase = Phase::AwaitingPreparation;
        Ok(())
    }

    /// The preparer produced a descriptor; hand-off to signing follows.
    pub fn preparation_ready(&mut self, descriptor: &CallDescriptor) -> Result<(), LifecycleError> {
        if self.phase != Phase::AwaitingPreparation {
            return Err(LifecycleError::InvalidTransition(self.phase));
        }
        tracing::debug!(
            to = %descriptor.to,
            function = descriptor.function,
            calldata_len = descriptor.calldata.len(),
            "proposal prepared"
        );
        self.phase = Phase::AwaitingWalletConfirmation;
        Ok(())
    }

    /// The preparer came back empty-handed. Surfaced as an error instead of
    /// silently dropping the attempt.
    pub fn preparation_failed(&mut self, reason: &str) -> LifecycleError {
        self.phase = Phase::Failed;
        self.last_error = Some(reason.to_string());
        LifecycleError::PreparationFailed(reason.to_string())
    }

    /// The signing collaborator accepted the transaction.
    pub fn submission_accepted(&mut self, handle: B256) -> Result<(), LifecycleError> {
        if self.phase != Phase::AwaitingWalletConfirmation {
            return Err(LifecycleError::InvalidTransition(self.phase));
        }
        self.handle = Some(handle);
        self.phase = Phase::AwaitingChainConfirmation;
        Ok(())
    }

    /// The wallet or network declined. The message is kept verbatim; the
    /// user retries by resubmitting, which re-evaluates the guards.
    pub fn submission_rejected(&mut self, message: &str) -> LifecycleError {
        self.phase = Phase::Failed;
        self.last_error = Some(message.to_string());
        LifecycleError::SubmissionRejected(message.to_string())
    }

    /// A mined receipt arrived. Receipts tagged with anything but the
    /// current handle are ignored; returns whether the receipt applied.
    pub fn receipt_confirmed(&mut self, handle: B256, logs: &[Log]) -> bool {
        if self.phase != Phase::AwaitingChainConfirmation || self.handle != Some(handle) {
            return false;
        }
        self.phase = Phase::Confirmed;
        self.proposal_id = extract_proposal_id(logs);
        if self.proposal_id.is_none() {
            tracing::warn!(tx = %handle, "no proposal id in receipt logs");
        }
        true
    }

    pub fn share_url(&self) -> Option<String> {
        self.proposal_id
            .map(|id| share_url(self.required_chain, self.dao, id))
    }

    pub fn explorer_url(&self) -> Option<String> {
        let handle = self.handle?;
        explorer_tx_url(self.required_chain, handle)
    }
}

/// Read the proposal index from the second topic of the first log entry.
///
/// This is a shape assumption about the Baal `SubmitProposal` emission; a
/// receipt without it simply yields no id.
pub fn extract_proposal_id(logs: &[Log]) -> Option<u64> {
    let topic = logs.first()?.data.topics().get(1)?;
    let value = U256::from_be_bytes(topic.0);
    u64::try_from(value).ok()
}

/// Warpcast compose URL embedding the Farcastle proposal frame.
pub fn share_url(chain: ChainId, dao: Address, proposal_id: u64) -> String {
    let frame = format!("{FRAME_BASE}/{chain}/{dao:#x}/proposals/{proposal_id}");
    let embed: String = url::form_urlencoded::byte_serialize(frame.as_bytes()).collect();
    format!("{COMPOSE_BASE}?text=&embeds[]={embed}")
}

/// Block-explorer transaction URL for the chain, if one is known.
pub fn explorer_tx_url(chain: ChainId, tx_hash: B256) -> Option<String> {
    let info = chain_info(chain)?;
    Some(format!("{}/tx/{tx_hash:#x}", info.explorer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prepare::prepare_signal;
    use crate::types::{DEFAULT_DAO, DEFAULT_SAFE};
    use alloy_primitives::{address, b256, Bytes, LogData};

    const ACCOUNT: Address = address!("d4e8ee356fc8ec94abc44f36fb6ad8e66bcc9e5e");
    const HANDLE: B256 =
        b256!("00000000000000000000000000000000000000000000000000000000000000aa");

    fn ready_lifecycle() -> Lifecycle {
        let mut lifecycle = Lifecycle::new(ChainId::SEPOLIA, DEFAULT_DAO);
        lifecycle.initialize();
        lifecycle.connect(ACCOUNT, ChainId::SEPOLIA);
        lifecycle.set_draft("a secret worth keeping");
        lifecycle
    }

    fn submitted_lifecycle() -> Lifecycle {
        let mut lifecycle = ready_lifecycle();
        lifecycle.begin_submission().expect("guards pass");
        let descriptor =
            prepare_signal(ChainId::SEPOLIA, DEFAULT_DAO, DEFAULT_SAFE, "a secret worth keeping").unwrap();
        lifecycle.preparation_ready(&descriptor).unwrap();
        lifecycle.submission_accepted(HANDLE).unwrap();
        lifecycle
    }

    fn log_with_topics(topics: Vec<B256>) -> Log {
        Log {
            address: DEFAULT_DAO,
            data: LogData::new_unchecked(topics, Bytes::new()),
        }
    }

    fn proposal_log(id: u64) -> Log {
        log_with_topics(vec![B256::ZERO, B256::from(U256::from(id))])
    }

    #[test]
    fn short_draft_blocks_submission_regardless_of_session() {
        let mut lifecycle = ready_lifecycle();
        for draft in ["", "12345", "hush!"] {
            lifecycle.set_draft(draft);
            assert!(!lifecycle.can_submit(), "draft {draft:?} must be blocked");
            assert!(lifecycle
                .blockers()
                .iter()
                .any(|b| matches!(b, Blocker::DraftTooShort { .. })));
        }
        lifecycle.set_draft("123456");
        assert!(lifecycle.can_submit());
    }

    #[test]
    fn wrong_chain_blocks_submission() {
        let mut lifecycle = Lifecycle::new(ChainId::SEPOLIA, DEFAULT_DAO);
        lifecycle.initialize();
        lifecycle.connect(ACCOUNT, ChainId::BASE);
        lifecycle.set_draft("a secret worth keeping");
        let blockers = lifecycle.blockers();
        assert_eq!(
            blockers,
            vec![Blocker::WrongChain {
                active: ChainId::BASE,
                required: ChainId::SEPOLIA,
            }]
        );
        assert!(matches!(
            lifecycle.begin_submission(),
            Err(LifecycleError::PreconditionNotMet(_))
        ));
    }

    #[test]
    fn uninitialized_or_disconnected_blocks_submission() {
        let mut lifecycle = Lifecycle::new(ChainId::SEPOLIA, DEFAULT_DAO);
        lifecycle.set_draft("a secret worth keeping");
        assert!(lifecycle.blockers().contains(&Blocker::NotInitialized));
        lifecycle.initialize();
        assert!(lifecycle.blockers().contains(&Blocker::NotConnected));
    }

    #[test]
    fn connect_is_idempotent_on_the_address() {
        let mut lifecycle = ready_lifecycle();
        let other = address!("0000000000000000000000000000000000000001");
        lifecycle.connect(other, ChainId::SEPOLIA);
        assert_eq!(lifecycle.account(), Some(ACCOUNT));
    }

    #[test]
    fn stale_receipt_is_ignored() {
        let mut lifecycle = submitted_lifecycle();
        let stale =
            b256!("00000000000000000000000000000000000000000000000000000000000000bb");
        assert!(!lifecycle.receipt_confirmed(stale, &[proposal_log(7)]));
        assert_eq!(lifecycle.phase(), Phase::AwaitingChainConfirmation);
        assert_eq!(lifecycle.proposal_id(), None);

        assert!(lifecycle.receipt_confirmed(HANDLE, &[proposal_log(7)]));
        assert_eq!(lifecycle.proposal_id(), Some(7));
    }

    #[test]
    fn proposal_id_comes_from_second_topic_of_first_log() {
        assert_eq!(extract_proposal_id(&[proposal_log(42)]), Some(42));
    }

    #[test]
    fn receipt_without_logs_confirms_without_an_id() {
        let mut lifecycle = submitted_lifecycle();
        assert!(lifecycle.receipt_confirmed(HANDLE, &[]));
        assert_eq!(lifecycle.phase(), Phase::Confirmed);
        assert_eq!(lifecycle.proposal_id(), None);
        assert!(!lifecycle.share_available());
        assert!(lifecycle.explorer_available());
    }

    #[test]
    fn missing_second_topic_yields_no_id() {
        assert_eq!(extract_proposal_id(&[log_with_topics(vec![B256::ZERO])]), None);
    }

    #[test]
    fn proposal_id_zero_is_a_real_id() {
        let mut lifecycle = submitted_lifecycle();
        assert!(lifecycle.receipt_confirmed(HANDLE, &[proposal_log(0)]));
        assert_eq!(lifecycle.proposal_id(), Some(0));
        assert!(lifecycle.share_available());
        assert!(lifecycle.share_url().is_some());
    }

    #[test]
    fn explorer_link_available_before_confirmation() {
        let lifecycle = submitted_lifecycle();
        assert!(lifecycle.explorer_available());
        assert!(!lifecycle.share_available());
        assert_eq!(
            lifecycle.explorer_url().as_deref(),
            Some("https://sepolia.etherscan.io/tx/0x00000000000000000000000000000000000000000000000000000000000000aa")
        );
    }

    #[test]
    fn handle_blocks_a_second_submission() {
        let mut lifecycle = submitted_lifecycle();
        assert!(!lifecycle.can_submit());
        lifecycle.receipt_confirmed(HANDLE, &[proposal_log(1)]);
        assert!(lifecycle.blockers().contains(&Blocker::AlreadyConfirmed));
    }

    #[test]
    fn rejection_surfaces_the_message_and_allows_retry() {
        let mut lifecycle = ready_lifecycle();
        lifecycle.begin_submission().unwrap();
        let descriptor =
            prepare_signal(ChainId::SEPOLIA, DEFAULT_DAO, DEFAULT_SAFE, "a secret worth keeping").unwrap();
        lifecycle.preparation_ready(&descriptor).unwrap();
        let err = lifecycle.submission_rejected("user denied signature");
        assert!(matches!(err, LifecycleError::SubmissionRejected(_)));
        assert_eq!(lifecycle.phase(), Phase::Failed);
        assert_eq!(lifecycle.last_error(), Some("user denied signature"));

        // Guards re-evaluate from scratch on retry.
        assert!(lifecycle.begin_submission().is_ok());
        assert_eq!(lifecycle.last_error(), None);
    }

    #[test]
    fn preparation_failure_is_surfaced() {
        let mut lifecycle = ready_lifecycle();
        lifecycle.begin_submission().unwrap();
        let err = lifecycle.preparation_failed("no poster deployment");
        assert!(matches!(err, LifecycleError::PreparationFailed(_)));
        assert_eq!(lifecycle.phase(), Phase::Failed);
        assert_eq!(lifecycle.last_error(), Some("no poster deployment"));
    }

    #[test]
    fn share_url_is_pure_and_embeds_chain_dao_and_id() {
        let first = share_url(ChainId::SEPOLIA, DEFAULT_DAO, 42);
        let second = share_url(ChainId::SEPOLIA, DEFAULT_DAO, 42);
        assert_eq!(first, second);
        assert!(first.starts_with("https://warpcast.com/~/compose?text=&embeds[]="));
        assert!(first.contains("0xaa36a7"));
        assert!(first.contains("proposals%2F42"));
    }

    #[test]
    fn explorer_url_is_pure() {
        let tx = HANDLE;
        assert_eq!(
            explorer_tx_url(ChainId::BASE, tx),
            explorer_tx_url(ChainId::BASE, tx)
        );
        assert_eq!(explorer_tx_url(ChainId(424242), tx), None);
    }
}
