//! Error taxonomy shared across crates.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stable classification of every failure a public operation can report.
///
/// Each crate keeps its own error enum; all of them map onto these codes so
/// callers can branch on the failure class without matching nested wrappers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    // Caller lacks the required role or membership.
    Unauthorized,
    // State conflicts.
    AlreadyRegistered,
    AlreadyVoted,
    AlreadyVoting,
    AlreadyProxy,
    ProposalPending,
    // Malformed input.
    InvalidDeposit,
    InvalidStake,
    InvalidPayload,
    EmptyTargets,
    DuplicateTargets,
    // Premature or late action.
    LockTimeNotElapsed,
    NotUnregistered,
    NothingToUnvote,
    NoOpenProposal,
    ProposalExpired,
    // Referential.
    UnknownProducer,
    UnknownProxy,
    ModuleRetired,
    // Host collaborators.
    InsufficientFunds,
    Overflow,
    Storage,
}

#[derive(Debug, Error)]
pub enum TypesError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("unknown proposal kind code: {0}")]
    UnknownProposalKind(u8),

    #[error("unknown tie-break code: {0}")]
    UnknownTieBreak(u128),
}
