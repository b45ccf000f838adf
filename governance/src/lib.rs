//! Producer governance.
//!
//! At most one proposal is open at a time. Only members of the active
//! producer set may propose or vote, one vote each, and a proposal passes once
//! `floor(2N/3) + 1` of them support it, where `N` is the size of the active
//! set when the proposal was created. Execution is synchronous with the vote
//! that reaches the threshold.
//!
//! Three kinds of proposal:
//! - `updateConfig`: write config entries
//! - `upgradeContract`: swap the module bound under a name, moving the old
//!   module's balance to the new one and retiring the old code
//! - `voteOutMaliciousProducer`: expel a producer and share out its deposit

pub mod engine;
pub mod error;
pub mod producers;
pub mod proposal;

pub use engine::{GovernanceEngine, VoteOutcome};
pub use error::GovernanceError;
pub use producers::ProducerSet;
pub use proposal::{quorum_threshold, Proposal, ProposalAction};
