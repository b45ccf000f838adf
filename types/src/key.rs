//! Content-addressed configuration keys.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::hash::blake2b_256;

/// Human-readable names of the well-known keys.
pub mod names {
    /// Exact native deposit a producer must attach to `register`.
    pub const DEPOSIT_FOR_JOIN: &str = "system.depositForJoin";
    /// Seconds between unregistration and permitted deposit withdrawal.
    pub const LOCK_TIME_FOR_DEPOSIT: &str = "system.lockTimeForDeposit";
    /// Upper bound of the active producer set.
    pub const MAX_PRODUCER_SIZE: &str = "system.maxProducerSize";
    /// Seconds after which an open proposal may be superseded.
    pub const PROPOSAL_PERIOD: &str = "system.proposalPeriod";
    /// Minimum stake attached to a vote.
    pub const STAKE_FOR_VOTE: &str = "system.stakeForVote";
    /// Tie-break policy for equal-weight producers (see `TieBreak`).
    pub const PRODUCER_TIE_BREAK: &str = "system.producerTieBreak";

    pub const PRODUCER_REGISTRY_MODULE: &str = "module.producerRegistry";
    pub const DELEGATION_MODULE: &str = "module.delegation";
}

/// A 32-byte key: the Blake2b hash of a human-readable name.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ConfigKey([u8; 32]);

impl ConfigKey {
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Hash a name into its key.
    pub fn named(name: &str) -> Self {
        Self(blake2b_256(name.as_bytes()))
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ConfigKey({})", hex::encode(&self.0[..4]))
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}
