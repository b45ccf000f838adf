//! Runtime for the DPoS governance core.
//!
//! [`Chain`] wires the four components over one [`dpos_store::StateStore`] and
//! one [`dpos_types::Clock`]. Every public operation runs in its own
//! [`dpos_store::Txn`]; its writes, balance moves and events are committed
//! together on success and discarded together on failure.
//!
//! Module-backed operations resolve their module through the config store on
//! every call, so an executed upgrade takes effect on the very next call.

pub mod chain;
pub mod config;
pub mod error;

pub use chain::{governance_address, Chain};
pub use config::ChainConfig;
pub use error::ChainError;

pub use dpos_delegation::{ProxyRecord, VoteTarget, VoterRecord};
pub use dpos_governance::{Proposal, ProposalAction, VoteOutcome};
pub use dpos_registry::{Candidate, CandidateInfo, CandidateStatus, ProducersInfo};
