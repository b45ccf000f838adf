//! Candidate records.

use serde::{Deserialize, Serialize};

use dpos_types::{Address, Amount, Timestamp, Weight};

/// Display fields a producer publishes about itself.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateInfo {
    pub name: String,
    pub web_url: String,
    pub p2p_url: String,
}

impl CandidateInfo {
    pub fn new(
        name: impl Into<String>,
        web_url: impl Into<String>,
        p2p_url: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            web_url: web_url.into(),
            p2p_url: p2p_url.into(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CandidateStatus {
    /// Registered and present in the Active Producer Index.
    Active,
    /// Out of the index; deposit escrowed until the lock time elapses.
    Unregistered { at: Timestamp },
    /// Deposit and reward paid out. The identity may register again.
    Withdrawn,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub producer: Address,
    pub info: CandidateInfo,
    /// Escrowed join deposit. Zero once withdrawn or seized.
    pub deposit: Amount,
    /// Weight delegated to this producer. Survives withdrawal so that open
    /// votes can still be reversed exactly.
    pub weight: Weight,
    pub registered_at: Timestamp,
    pub status: CandidateStatus,
    pub malicious: bool,
    /// Reward credited from ousters, paid out with the deposit.
    pub reward: Amount,
}

impl Candidate {
    pub fn is_active(&self) -> bool {
        self.status == CandidateStatus::Active
    }

    pub fn unregistered_at(&self) -> Option<Timestamp> {
        match self.status {
            CandidateStatus::Unregistered { at } => Some(at),
            _ => None,
        }
    }
}

/// Snapshot of the Active Producer Index with weights.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProducersInfo {
    pub producers: Vec<(Address, Weight)>,
    pub max_producer_size: u64,
}
