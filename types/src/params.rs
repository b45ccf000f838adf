//! Genesis values for the well-known config keys.
//!
//! Every field ends up as an ordinary config entry, so all of them remain
//! governable through `updateConfig` proposals after genesis.

use serde::{Deserialize, Serialize};

use crate::amount::UNIT;
use crate::error::TypesError;
use crate::key::{names, ConfigKey};
use crate::value::ConfigValue;

const HOUR: u64 = 60 * 60;

/// Ordering applied to producers of equal weight when ranking the active set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Earlier registration wins, then the lower address.
    #[default]
    EarliestRegistration,
    /// Lower address wins.
    LowestAddress,
}

impl TieBreak {
    pub fn code(&self) -> u128 {
        match self {
            Self::EarliestRegistration => 0,
            Self::LowestAddress => 1,
        }
    }

    pub fn from_code(code: u128) -> Result<Self, TypesError> {
        match code {
            0 => Ok(Self::EarliestRegistration),
            1 => Ok(Self::LowestAddress),
            other => Err(TypesError::UnknownTieBreak(other)),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisParams {
    /// Raw units a producer must deposit to register. Default: 1 coin.
    #[serde(default = "default_deposit_for_join")]
    pub deposit_for_join: u128,

    /// Seconds an unregistered producer waits before withdrawing. Default: 72h.
    #[serde(default = "default_lock_time")]
    pub lock_time_for_deposit_secs: u64,

    /// Size bound of the active producer set. Default: 4.
    #[serde(default = "default_max_producer_size")]
    pub max_producer_size: u64,

    /// Seconds before an open proposal can be superseded. Default: 72h.
    #[serde(default = "default_lock_time")]
    pub proposal_period_secs: u64,

    /// Minimum raw units staked per vote. Default: 1 coin.
    #[serde(default = "default_stake_for_vote")]
    pub stake_for_vote: u128,

    #[serde(default)]
    pub producer_tie_break: TieBreak,
}

fn default_deposit_for_join() -> u128 {
    UNIT
}

fn default_lock_time() -> u64 {
    72 * HOUR
}

fn default_max_producer_size() -> u64 {
    4
}

fn default_stake_for_vote() -> u128 {
    UNIT
}

impl GenesisParams {
    /// The config entries written at genesis.
    pub fn entries(&self) -> Vec<(ConfigKey, ConfigValue)> {
        vec![
            (
                ConfigKey::named(names::DEPOSIT_FOR_JOIN),
                ConfigValue::Uint(self.deposit_for_join),
            ),
            (
                ConfigKey::named(names::LOCK_TIME_FOR_DEPOSIT),
                ConfigValue::from(self.lock_time_for_deposit_secs),
            ),
            (
                ConfigKey::named(names::MAX_PRODUCER_SIZE),
                ConfigValue::from(self.max_producer_size),
            ),
            (
                ConfigKey::named(names::PROPOSAL_PERIOD),
                ConfigValue::from(self.proposal_period_secs),
            ),
            (
                ConfigKey::named(names::STAKE_FOR_VOTE),
                ConfigValue::Uint(self.stake_for_vote),
            ),
            (
                ConfigKey::named(names::PRODUCER_TIE_BREAK),
                ConfigValue::Uint(self.producer_tie_break.code()),
            ),
        ]
    }
}

impl Default for GenesisParams {
    fn default() -> Self {
        Self {
            deposit_for_join: default_deposit_for_join(),
            lock_time_for_deposit_secs: default_lock_time(),
            max_producer_size: default_max_producer_size(),
            proposal_period_secs: default_lock_time(),
            stake_for_vote: default_stake_for_vote(),
            producer_tie_break: TieBreak::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_network_launch_values() {
        let params = GenesisParams::default();
        assert_eq!(params.deposit_for_join, UNIT);
        assert_eq!(params.lock_time_for_deposit_secs, 72 * 3600);
        assert_eq!(params.max_producer_size, 4);
    }

    #[test]
    fn entries_cover_every_param() {
        let entries = GenesisParams::default().entries();
        assert_eq!(entries.len(), 6);
        assert!(entries.contains(&(
            ConfigKey::named(names::MAX_PRODUCER_SIZE),
            ConfigValue::Uint(4)
        )));
    }

    #[test]
    fn tie_break_codes() {
        assert_eq!(TieBreak::from_code(1).unwrap(), TieBreak::LowestAddress);
        assert!(TieBreak::from_code(9).is_err());
    }
}
