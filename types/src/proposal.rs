//! Proposal kinds understood by the governance engine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What a passed proposal does. The numeric codes are the wire values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProposalKind {
    /// Rebind module names to new module addresses, migrating balances.
    UpgradeContract,
    /// Overwrite config entries.
    UpdateConfig,
    /// Expel a producer and seize its deposit.
    VoteOutMaliciousProducer,
}

impl ProposalKind {
    pub fn code(&self) -> u8 {
        match self {
            Self::UpgradeContract => 1,
            Self::UpdateConfig => 2,
            Self::VoteOutMaliciousProducer => 3,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::UpgradeContract),
            2 => Some(Self::UpdateConfig),
            3 => Some(Self::VoteOutMaliciousProducer),
            _ => None,
        }
    }
}

impl fmt::Display for ProposalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::UpgradeContract => "upgradeContract",
            Self::UpdateConfig => "updateConfig",
            Self::VoteOutMaliciousProducer => "voteOutMaliciousProducer",
        };
        f.write_str(name)
    }
}
