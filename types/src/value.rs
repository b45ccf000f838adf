//! Config entry values.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::address::Address;

/// Value held under a config key: an unsigned integer or an address.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConfigValue {
    Uint(u128),
    Address(Address),
}

impl ConfigValue {
    pub fn as_uint(&self) -> Option<u128> {
        match self {
            Self::Uint(v) => Some(*v),
            Self::Address(_) => None,
        }
    }

    pub fn as_address(&self) -> Option<Address> {
        match self {
            Self::Address(a) => Some(*a),
            Self::Uint(_) => None,
        }
    }

    /// Integer view, treating an address entry as unset.
    pub fn uint_or_zero(&self) -> u128 {
        self.as_uint().unwrap_or(0)
    }
}

/// Unset keys read as zero.
impl Default for ConfigValue {
    fn default() -> Self {
        Self::Uint(0)
    }
}

impl From<u128> for ConfigValue {
    fn from(v: u128) -> Self {
        Self::Uint(v)
    }
}

impl From<u64> for ConfigValue {
    fn from(v: u64) -> Self {
        Self::Uint(u128::from(v))
    }
}

impl From<Address> for ConfigValue {
    fn from(a: Address) -> Self {
        Self::Address(a)
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uint(v) => write!(f, "{v}"),
            Self::Address(a) => write!(f, "{a}"),
        }
    }
}
