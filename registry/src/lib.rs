//! Producer registry.
//!
//! Owns the candidacy lifecycle of block producers:
//! - registration against a fixed deposit, escrowed at the registry's address
//! - voluntary unregistration and time-locked withdrawal
//! - the Active Producer Index (unordered, O(1) swap-remove)
//! - weight accounting on behalf of the delegation engine
//! - forced removal of malicious producers, with their deposit shared out
//!   across the remaining producers as reward credit
//!
//! The registry is a module: its logic is stateless and every record lives in
//! the shared keyed state, so an upgraded registry bound under the same name
//! picks up exactly where the old one stopped.

pub mod candidate;
pub mod error;
pub mod index;
pub mod registry;

pub use candidate::{Candidate, CandidateInfo, CandidateStatus, ProducersInfo};
pub use error::RegistryError;
pub use registry::ProducerRegistry;
