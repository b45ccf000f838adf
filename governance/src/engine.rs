//! Proposal lifecycle: `Closed -> Open -> {Executed, Superseded}`.

use dpos_config::{ConfigStore, ModuleKind};
use dpos_store::Txn;
use dpos_types::{names, Address, ConfigKey, ConfigValue, Event, ProposalKind, TieBreak};

use crate::error::GovernanceError;
use crate::producers::ProducerSet;
use crate::proposal::{Proposal, ProposalAction};

const PROPOSAL_KEY: &[u8] = b"governance.proposal";

/// Well-known entries that only make sense as integers.
const UINT_KEYS: [&str; 6] = [
    names::DEPOSIT_FOR_JOIN,
    names::LOCK_TIME_FOR_DEPOSIT,
    names::MAX_PRODUCER_SIZE,
    names::PROPOSAL_PERIOD,
    names::STAKE_FOR_VOTE,
    names::PRODUCER_TIE_BREAK,
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VoteOutcome {
    /// Counted; the proposal stays open.
    Recorded { votes_for: u32, threshold: u32 },
    /// The threshold was reached and the proposal executed.
    Executed(ProposalKind),
}

/// The governance engine. Its identity is the config store's privileged
/// writer; nothing else can reach the privileged paths it drives.
#[derive(Clone, Copy, Debug)]
pub struct GovernanceEngine {
    config: ConfigStore,
}

impl GovernanceEngine {
    pub fn new(config: ConfigStore) -> Self {
        Self { config }
    }

    pub fn address(&self) -> Address {
        self.config.governance()
    }

    pub fn current_proposal(&self, txn: &Txn<'_>) -> Result<Option<Proposal>, GovernanceError> {
        Ok(txn.get::<Proposal>(PROPOSAL_KEY)?)
    }

    fn ensure_member<P: ProducerSet>(
        &self,
        txn: &Txn<'_>,
        producers: &P,
        caller: &Address,
    ) -> Result<Vec<Address>, GovernanceError> {
        let active = producers.active_set(txn)?;
        if !active.contains(caller) {
            tracing::warn!(%caller, "governance call from outside the active set");
            return Err(GovernanceError::NotActiveProducer(*caller));
        }
        Ok(active)
    }

    /// Open a proposal. The proposer's support is counted immediately, so a
    /// single-member active set passes it on the spot.
    pub fn propose<P: ProducerSet>(
        &self,
        txn: &mut Txn<'_>,
        producers: &P,
        caller: &Address,
        action: ProposalAction,
    ) -> Result<VoteOutcome, GovernanceError> {
        let active = self.ensure_member(txn, producers, caller)?;
        if let Some(open) = self.current_proposal(txn)? {
            let period = self.config.get_u64(txn, names::PROPOSAL_PERIOD)?;
            if !open.is_stale(period, txn.now()) {
                return Err(GovernanceError::ProposalPending);
            }
            tracing::info!(proposer = %open.proposer, kind = %open.kind(), "stale proposal superseded");
            txn.emit(Event::ProposalSuperseded {
                proposer: open.proposer,
                kind: open.kind(),
            });
        }
        self.validate(txn, producers, &action)?;

        let snapshot_size = u32::try_from(active.len()).unwrap_or(u32::MAX);
        let proposal = Proposal::new(*caller, txn.now(), action, snapshot_size);
        tracing::info!(
            proposer = %caller,
            kind = %proposal.kind(),
            snapshot_size,
            threshold = proposal.threshold(),
            "proposal created"
        );
        txn.emit(Event::ProposalCreated {
            proposer: *caller,
            kind: proposal.kind(),
            snapshot_size,
        });
        self.settle(txn, producers, proposal)
    }

    /// Cast the caller's single vote on the open proposal. Only support
    /// counts toward the threshold; a negative vote just uses up the vote.
    pub fn vote<P: ProducerSet>(
        &self,
        txn: &mut Txn<'_>,
        producers: &P,
        caller: &Address,
        support: bool,
    ) -> Result<VoteOutcome, GovernanceError> {
        let mut proposal = self
            .current_proposal(txn)?
            .ok_or(GovernanceError::NoOpenProposal)?;
        let period = self.config.get_u64(txn, names::PROPOSAL_PERIOD)?;
        if proposal.is_stale(period, txn.now()) {
            return Err(GovernanceError::ProposalExpired);
        }
        self.ensure_member(txn, producers, caller)?;
        if !proposal.voted.insert(*caller) {
            return Err(GovernanceError::AlreadyVoted(*caller));
        }
        if support {
            proposal.votes_for += 1;
        }
        tracing::info!(voter = %caller, support, votes_for = proposal.votes_for, "vote cast");
        txn.emit(Event::VoteCast {
            voter: *caller,
            support,
            votes_for: proposal.votes_for,
        });
        self.settle(txn, producers, proposal)
    }

    /// Execute `proposal` if it has reached its threshold, otherwise store it.
    fn settle<P: ProducerSet>(
        &self,
        txn: &mut Txn<'_>,
        producers: &P,
        proposal: Proposal,
    ) -> Result<VoteOutcome, GovernanceError> {
        if !proposal.has_passed() {
            txn.put(PROPOSAL_KEY, &proposal)?;
            return Ok(VoteOutcome::Recorded {
                votes_for: proposal.votes_for,
                threshold: proposal.threshold(),
            });
        }
        let kind = proposal.kind();
        self.execute(txn, producers, &proposal.action)?;
        txn.delete(PROPOSAL_KEY);
        tracing::info!(%kind, votes_for = proposal.votes_for, "proposal executed");
        txn.emit(Event::ProposalExecuted {
            kind,
            votes_for: proposal.votes_for,
        });
        Ok(VoteOutcome::Executed(kind))
    }

    fn execute<P: ProducerSet>(
        &self,
        txn: &mut Txn<'_>,
        producers: &P,
        action: &ProposalAction,
    ) -> Result<(), GovernanceError> {
        let governance = self.address();
        match action {
            ProposalAction::UpdateConfig(entries) => {
                for (key, value) in entries {
                    self.config.set(txn, &governance, *key, *value)?;
                }
            }
            ProposalAction::UpgradeContract(entries) => {
                for (key, value) in entries {
                    match (binding_kind(key), value.as_address()) {
                        (Some(kind), Some(new_module)) => {
                            if self.config.module_kind(txn, &new_module)? != Some(kind) {
                                return Err(invalid(key, "address no longer carries code of that kind"));
                            }
                            if let Some(old) = self.config.resolve_module(txn, key)? {
                                if old != new_module {
                                    self.config.retire(txn, &governance, &old, &new_module)?;
                                }
                            }
                            self.config.bind_module(txn, &governance, *key, new_module)?;
                        }
                        _ => self.config.set(txn, &governance, *key, *value)?,
                    }
                }
            }
            ProposalAction::VoteOutMaliciousProducer(target) => {
                let seized = producers.expel(txn, &governance, target)?;
                txn.emit(Event::ProducerOusted {
                    producer: *target,
                    seized,
                });
            }
        }
        Ok(())
    }

    /// Reject payloads that could never execute cleanly.
    fn validate<P: ProducerSet>(
        &self,
        txn: &Txn<'_>,
        producers: &P,
        action: &ProposalAction,
    ) -> Result<(), GovernanceError> {
        match action {
            ProposalAction::UpdateConfig(entries) => {
                for (key, value) in entries {
                    if binding_kind(key).is_some() {
                        return Err(invalid(key, "module bindings change only through upgrades"));
                    }
                    validate_entry(key, value)?;
                }
            }
            ProposalAction::UpgradeContract(entries) => {
                let mut rebound = Vec::new();
                for (key, value) in entries {
                    match binding_kind(key) {
                        Some(kind) => {
                            if rebound.contains(&kind) {
                                return Err(invalid(key, "module rebound twice in one upgrade"));
                            }
                            rebound.push(kind);
                            let module = value
                                .as_address()
                                .ok_or_else(|| invalid(key, "expected a module address"))?;
                            if self.config.module_kind(txn, &module)? != Some(kind) {
                                return Err(invalid(key, "address carries no code of that kind"));
                            }
                        }
                        None => validate_entry(key, value)?,
                    }
                }
            }
            ProposalAction::VoteOutMaliciousProducer(target) => {
                if !producers.is_listed(txn, target)? {
                    return Err(GovernanceError::UnknownProducer(*target));
                }
            }
        }
        Ok(())
    }
}

fn binding_kind(key: &ConfigKey) -> Option<ModuleKind> {
    [ModuleKind::ProducerRegistry, ModuleKind::Delegation]
        .into_iter()
        .find(|kind| kind.binding_key() == *key)
}

fn invalid(key: &ConfigKey, reason: &str) -> GovernanceError {
    GovernanceError::InvalidPayload(format!("{key}: {reason}"))
}

fn validate_entry(key: &ConfigKey, value: &ConfigValue) -> Result<(), GovernanceError> {
    let is_uint_key = UINT_KEYS.iter().any(|name| ConfigKey::named(name) == *key);
    if is_uint_key && value.as_uint().is_none() {
        return Err(invalid(key, "expected an integer"));
    }
    if *key == ConfigKey::named(names::PRODUCER_TIE_BREAK) {
        TieBreak::from_code(value.uint_or_zero()).map_err(|e| invalid(key, &e.to_string()))?;
    }
    // An empty active set could never pass another proposal.
    if *key == ConfigKey::named(names::MAX_PRODUCER_SIZE) && value.uint_or_zero() == 0 {
        return Err(invalid(key, "at least one producer must govern"));
    }
    Ok(())
}
