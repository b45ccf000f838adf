//! Append-only audit records emitted by state-changing operations.
//!
//! Events are buffered with the operation's writes and only published when
//! the operation commits. Nothing inside the core consumes them.

use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::amount::{Amount, Weight};
use crate::key::ConfigKey;
use crate::proposal::ProposalKind;
use crate::time::Timestamp;
use crate::value::ConfigValue;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    ConfigUpdated {
        key: ConfigKey,
        value: ConfigValue,
    },
    ModuleDeployed {
        module: Address,
    },
    ModuleBound {
        name: ConfigKey,
        previous: Option<Address>,
        current: Address,
    },
    ModuleRetired {
        module: Address,
        beneficiary: Address,
        released: Amount,
    },
    ProducerRegistered {
        producer: Address,
        name: String,
        web_url: String,
        p2p_url: String,
        deposit: Amount,
    },
    ProducerInfoUpdated {
        producer: Address,
        name: String,
        web_url: String,
        p2p_url: String,
    },
    /// `seized` is zero for a self-initiated unregistration.
    ProducerUnregistered {
        producer: Address,
        at: Timestamp,
        seized: Amount,
        credited_each: Amount,
        credited_count: u32,
    },
    DepositWithdrawn {
        producer: Address,
        deposit: Amount,
        reward: Amount,
    },
    ProxyRegistered {
        proxy: Address,
    },
    ProxyUnregistered {
        proxy: Address,
    },
    /// `proxy` is `None` for a direct vote, `producers` is empty for a proxy vote.
    UserVoted {
        voter: Address,
        proxy: Option<Address>,
        producers: Vec<Address>,
        staked: Amount,
    },
    UserUnvoted {
        voter: Address,
        refunded: Amount,
    },
    ProxyVoted {
        proxy: Address,
        producers: Vec<Address>,
        weight: Weight,
    },
    ProxyUnvoted {
        proxy: Address,
    },
    ProposalCreated {
        proposer: Address,
        kind: ProposalKind,
        snapshot_size: u32,
    },
    ProposalSuperseded {
        proposer: Address,
        kind: ProposalKind,
    },
    VoteCast {
        voter: Address,
        support: bool,
        votes_for: u32,
    },
    ProposalExecuted {
        kind: ProposalKind,
        votes_for: u32,
    },
    ProducerOusted {
        producer: Address,
        seized: Amount,
    },
}
