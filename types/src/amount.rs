//! Native value amounts.
//!
//! Amounts are fixed-point integers (u128) to avoid floating-point errors.
//! The smallest unit is 1 raw; [`UNIT`] raw make one whole coin.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One whole coin expressed in raw units (10^18).
pub const UNIT: u128 = 1_000_000_000_000_000_000;

/// Vote weight. One staked raw unit backs one unit of weight.
pub type Weight = u128;

/// An amount of the native coin, held as raw units.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Amount(u128);

impl Amount {
    pub const ZERO: Self = Self(0);

    pub fn new(raw: u128) -> Self {
        Self(raw)
    }

    /// Whole coins, e.g. `Amount::units(1)` is one coin.
    pub fn units(coins: u128) -> Self {
        Self(coins.saturating_mul(UNIT))
    }

    pub fn raw(&self) -> u128 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    pub fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }

    /// Split into `parts` equal shares: `(share, remainder)`.
    ///
    /// Returns `None` when `parts` is zero.
    pub fn split(self, parts: u128) -> Option<(Self, Self)> {
        if parts == 0 {
            return None;
        }
        Some((Self(self.0 / parts), Self(self.0 % parts)))
    }
}

impl From<u128> for Amount {
    fn from(raw: u128) -> Self {
        Self(raw)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} raw", self.0)
    }
}
