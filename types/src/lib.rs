//! Fundamental types for the DPoS governance core.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! identities, native amounts, timestamps, config keys and values, the event
//! records emitted for auditing, and the cross-crate error taxonomy.

pub mod address;
pub mod amount;
pub mod error;
pub mod event;
pub mod hash;
pub mod key;
pub mod params;
pub mod proposal;
pub mod time;
pub mod value;

pub use address::Address;
pub use amount::{Amount, Weight, UNIT};
pub use error::{ErrorCode, TypesError};
pub use event::Event;
pub use hash::blake2b_256;
pub use key::{names, ConfigKey};
pub use params::{GenesisParams, TieBreak};
pub use proposal::ProposalKind;
pub use time::{Clock, SystemClock, Timestamp};
pub use value::ConfigValue;
