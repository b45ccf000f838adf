use serde::{Deserialize, Serialize};

use dpos_types::{Address, Amount};

/// Where a voter's stake is pointed. Never both.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoteTarget {
    /// Non-empty, duplicate-free producer list; each receives the full stake.
    Producers(Vec<Address>),
    Proxy(Address),
}

/// An open vote. Exists from the vote until the matching unvote.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoterRecord {
    pub voter: Address,
    pub staked: Amount,
    pub target: VoteTarget,
}
