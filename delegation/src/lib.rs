//! Delegation engine.
//!
//! Users back producers with staked native value, either directly or through a
//! proxy that aggregates their stake and casts it collectively. The stake
//! backs every chosen producer in full rather than being split across them.
//!
//! Every weight added to a producer is recorded against the exact target set
//! that received it, so the matching unvote subtracts the same amounts from
//! the same producers and weights never drift.

pub mod engine;
pub mod error;
pub mod proxy;
pub mod target;
pub mod voter;

pub use engine::DelegationEngine;
pub use error::DelegationError;
pub use proxy::ProxyRecord;
pub use target::WeightTarget;
pub use voter::{VoteTarget, VoterRecord};
