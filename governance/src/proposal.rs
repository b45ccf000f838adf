//! Proposals and the quorum rule.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use dpos_types::{Address, ConfigKey, ConfigValue, ProposalKind, Timestamp};

use crate::error::GovernanceError;

/// Supporting votes needed among `n` eligible producers: `floor(2n/3) + 1`.
pub fn quorum_threshold(n: u32) -> u32 {
    (2 * u64::from(n) / 3 + 1) as u32
}

/// What a proposal does once it passes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProposalAction {
    /// Rebind module names (and optionally set plain entries alongside).
    UpgradeContract(Vec<(ConfigKey, ConfigValue)>),
    UpdateConfig(Vec<(ConfigKey, ConfigValue)>),
    VoteOutMaliciousProducer(Address),
}

impl ProposalAction {
    pub fn kind(&self) -> ProposalKind {
        match self {
            Self::UpgradeContract(_) => ProposalKind::UpgradeContract,
            Self::UpdateConfig(_) => ProposalKind::UpdateConfig,
            Self::VoteOutMaliciousProducer(_) => ProposalKind::VoteOutMaliciousProducer,
        }
    }

    /// Build an action from the flat `(kind, keys, values, target)` form.
    pub fn from_parts(
        kind: ProposalKind,
        keys: Vec<ConfigKey>,
        values: Vec<ConfigValue>,
        target: Option<Address>,
    ) -> Result<Self, GovernanceError> {
        let pairs = || -> Result<Vec<(ConfigKey, ConfigValue)>, GovernanceError> {
            if keys.len() != values.len() {
                return Err(GovernanceError::InvalidPayload(format!(
                    "{} keys but {} values",
                    keys.len(),
                    values.len()
                )));
            }
            if keys.is_empty() {
                return Err(GovernanceError::InvalidPayload("no entries".into()));
            }
            Ok(keys.iter().copied().zip(values.iter().copied()).collect())
        };
        match kind {
            ProposalKind::UpgradeContract => Ok(Self::UpgradeContract(pairs()?)),
            ProposalKind::UpdateConfig => Ok(Self::UpdateConfig(pairs()?)),
            ProposalKind::VoteOutMaliciousProducer => target
                .map(Self::VoteOutMaliciousProducer)
                .ok_or_else(|| GovernanceError::InvalidPayload("missing target".into())),
        }
    }
}

/// The open proposal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    pub proposer: Address,
    pub created_at: Timestamp,
    pub action: ProposalAction,
    pub votes_for: u32,
    /// Everyone who voted either way, the proposer included.
    pub voted: BTreeSet<Address>,
    /// Active-set size at creation. Fixes the threshold for the proposal's
    /// whole life.
    pub snapshot_size: u32,
}

impl Proposal {
    pub fn new(proposer: Address, created_at: Timestamp, action: ProposalAction, snapshot_size: u32) -> Self {
        Self {
            proposer,
            created_at,
            action,
            votes_for: 1,
            voted: BTreeSet::from([proposer]),
            snapshot_size,
        }
    }

    pub fn kind(&self) -> ProposalKind {
        self.action.kind()
    }

    pub fn threshold(&self) -> u32 {
        quorum_threshold(self.snapshot_size)
    }

    pub fn has_passed(&self) -> bool {
        self.votes_for >= self.threshold()
    }

    /// Stale once strictly more than `period_secs` have passed since creation.
    pub fn is_stale(&self, period_secs: u64, now: Timestamp) -> bool {
        now > self.created_at.saturating_add(period_secs)
    }
}
