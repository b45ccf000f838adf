//! The delegation engine module.

use std::collections::BTreeSet;

use dpos_config::{ConfigStore, ModuleKind};
use dpos_store::{record_key, Txn};
use dpos_types::{names, Address, Amount, Event, Weight};

use crate::error::DelegationError;
use crate::proxy::ProxyRecord;
use crate::target::WeightTarget;
use crate::voter::{VoteTarget, VoterRecord};

const VOTER_NS: &str = "delegation.voter";
const PROXY_NS: &str = "delegation.proxy";

fn voter_key(voter: &Address) -> Vec<u8> {
    record_key(VOTER_NS, voter.as_bytes())
}

fn proxy_key(proxy: &Address) -> Vec<u8> {
    record_key(PROXY_NS, proxy.as_bytes())
}

/// Handle on the delegation module deployed at `address`. Voter stakes are
/// escrowed as native balance of `address`.
#[derive(Clone, Copy, Debug)]
pub struct DelegationEngine {
    address: Address,
    config: ConfigStore,
}

impl DelegationEngine {
    pub fn at(address: Address, config: ConfigStore) -> Self {
        Self { address, config }
    }

    /// The engine currently bound under `module.delegation`.
    pub fn bound(txn: &Txn<'_>, config: ConfigStore) -> Result<Self, DelegationError> {
        let address = config.bound_module(txn, ModuleKind::Delegation)?;
        Ok(Self::at(address, config))
    }

    pub fn address(&self) -> Address {
        self.address
    }

    fn ensure_live(&self, txn: &Txn<'_>) -> Result<(), DelegationError> {
        Ok(self
            .config
            .ensure_live(txn, &self.address, ModuleKind::Delegation)?)
    }

    pub fn voter(&self, txn: &Txn<'_>, voter: &Address) -> Result<Option<VoterRecord>, DelegationError> {
        self.ensure_live(txn)?;
        Ok(txn.get::<VoterRecord>(&voter_key(voter))?)
    }

    pub fn proxy(&self, txn: &Txn<'_>, proxy: &Address) -> Result<Option<ProxyRecord>, DelegationError> {
        self.ensure_live(txn)?;
        Ok(txn.get::<ProxyRecord>(&proxy_key(proxy))?)
    }

    fn accepting_proxy(&self, txn: &Txn<'_>, proxy: &Address) -> Result<ProxyRecord, DelegationError> {
        match txn.get::<ProxyRecord>(&proxy_key(proxy))? {
            Some(record) if record.accepting => Ok(record),
            _ => Err(DelegationError::UnknownProxy(*proxy)),
        }
    }

    fn save_proxy(&self, txn: &mut Txn<'_>, record: &ProxyRecord) -> Result<(), DelegationError> {
        if !record.accepting && record.weight == 0 {
            txn.delete(&proxy_key(&record.proxy));
            return Ok(());
        }
        Ok(txn.put(&proxy_key(&record.proxy), record)?)
    }

    fn check_no_open_vote(&self, txn: &Txn<'_>, voter: &Address) -> Result<(), DelegationError> {
        if txn.contains(&voter_key(voter))? {
            return Err(DelegationError::AlreadyVoting(*voter));
        }
        Ok(())
    }

    fn check_stake(&self, txn: &Txn<'_>, stake: Amount) -> Result<(), DelegationError> {
        let minimum = Amount::new(self.config.get_uint(txn, names::STAKE_FOR_VOTE)?);
        if stake.is_zero() || stake < minimum {
            return Err(DelegationError::InvalidStake {
                minimum,
                attached: stake,
            });
        }
        Ok(())
    }

    fn check_targets<R: WeightTarget>(
        &self,
        txn: &Txn<'_>,
        registry: &R,
        producers: &[Address],
    ) -> Result<(), DelegationError> {
        if producers.is_empty() {
            return Err(DelegationError::EmptyTargets);
        }
        let mut seen = BTreeSet::new();
        for producer in producers {
            if !seen.insert(*producer) {
                return Err(DelegationError::DuplicateTargets(*producer));
            }
            if !registry.is_active_candidate(txn, producer)? {
                return Err(DelegationError::UnknownProducer(*producer));
            }
        }
        Ok(())
    }

    fn propagate<R: WeightTarget>(
        &self,
        txn: &mut Txn<'_>,
        registry: &R,
        producers: &[Address],
        delta: Weight,
        increase: bool,
    ) -> Result<(), DelegationError> {
        if delta == 0 {
            return Ok(());
        }
        for producer in producers {
            registry.adjust_weight(txn, &self.address, producer, delta, increase)?;
        }
        Ok(())
    }

    /// Stake on a list of producers. Each producer gains the full stake.
    pub fn vote_direct<R: WeightTarget>(
        &self,
        txn: &mut Txn<'_>,
        registry: &R,
        caller: &Address,
        producers: Vec<Address>,
        stake: Amount,
    ) -> Result<(), DelegationError> {
        self.ensure_live(txn)?;
        self.check_no_open_vote(txn, caller)?;
        self.check_targets(txn, registry, &producers)?;
        self.check_stake(txn, stake)?;

        txn.transfer(caller, &self.address, stake)?;
        self.propagate(txn, registry, &producers, stake.raw(), true)?;
        txn.put(
            &voter_key(caller),
            &VoterRecord {
                voter: *caller,
                staked: stake,
                target: VoteTarget::Producers(producers.clone()),
            },
        )?;

        tracing::info!(voter = %caller, staked = stake.raw(), targets = producers.len(), "direct vote");
        txn.emit(Event::UserVoted {
            voter: *caller,
            proxy: None,
            producers,
            staked: stake,
        });
        Ok(())
    }

    /// Stake through a proxy. The stake joins the proxy's aggregate and
    /// follows whatever the proxy currently votes for.
    pub fn vote_via_proxy<R: WeightTarget>(
        &self,
        txn: &mut Txn<'_>,
        registry: &R,
        caller: &Address,
        proxy: &Address,
        stake: Amount,
    ) -> Result<(), DelegationError> {
        self.ensure_live(txn)?;
        self.check_no_open_vote(txn, caller)?;
        let mut record = self.accepting_proxy(txn, proxy)?;
        self.check_stake(txn, stake)?;

        txn.transfer(caller, &self.address, stake)?;
        record.weight = record
            .weight
            .checked_add(stake.raw())
            .ok_or(DelegationError::WeightOverflow(*proxy))?;
        self.propagate(txn, registry, &record.producers, stake.raw(), true)?;
        self.save_proxy(txn, &record)?;
        txn.put(
            &voter_key(caller),
            &VoterRecord {
                voter: *caller,
                staked: stake,
                target: VoteTarget::Proxy(*proxy),
            },
        )?;

        tracing::info!(voter = %caller, %proxy, staked = stake.raw(), "vote via proxy");
        txn.emit(Event::UserVoted {
            voter: *caller,
            proxy: Some(*proxy),
            producers: Vec::new(),
            staked: stake,
        });
        Ok(())
    }

    /// A proxy points its aggregate at `producers`, replacing any earlier list.
    pub fn proxy_vote<R: WeightTarget>(
        &self,
        txn: &mut Txn<'_>,
        registry: &R,
        caller: &Address,
        producers: Vec<Address>,
    ) -> Result<(), DelegationError> {
        self.ensure_live(txn)?;
        let mut record = self.accepting_proxy(txn, caller)?;
        self.check_targets(txn, registry, &producers)?;

        self.propagate(txn, registry, &record.producers, record.weight, false)?;
        self.propagate(txn, registry, &producers, record.weight, true)?;
        record.producers = producers.clone();
        self.save_proxy(txn, &record)?;

        tracing::info!(proxy = %caller, weight = record.weight, targets = producers.len(), "proxy vote");
        txn.emit(Event::ProxyVoted {
            proxy: *caller,
            producers,
            weight: record.weight,
        });
        Ok(())
    }

    /// A proxy withdraws its aggregate from its producers but stays a proxy.
    pub fn proxy_unvote<R: WeightTarget>(
        &self,
        txn: &mut Txn<'_>,
        registry: &R,
        caller: &Address,
    ) -> Result<(), DelegationError> {
        self.ensure_live(txn)?;
        let mut record = self.accepting_proxy(txn, caller)?;
        if !record.is_propagating() {
            return Err(DelegationError::NothingToUnvote(*caller));
        }
        self.propagate(txn, registry, &record.producers, record.weight, false)?;
        record.producers.clear();
        self.save_proxy(txn, &record)?;

        tracing::info!(proxy = %caller, "proxy unvote");
        txn.emit(Event::ProxyUnvoted { proxy: *caller });
        Ok(())
    }

    /// Reverse the caller's open vote, whichever mode it is in, and refund the
    /// stake. Returns the refunded amount.
    pub fn unvote<R: WeightTarget>(
        &self,
        txn: &mut Txn<'_>,
        registry: &R,
        caller: &Address,
    ) -> Result<Amount, DelegationError> {
        self.ensure_live(txn)?;
        let record = txn
            .get::<VoterRecord>(&voter_key(caller))?
            .ok_or(DelegationError::NothingToUnvote(*caller))?;
        self.reverse(txn, registry, record)
    }

    /// Like [`DelegationEngine::unvote`] but only for a direct vote.
    pub fn unvote_direct<R: WeightTarget>(
        &self,
        txn: &mut Txn<'_>,
        registry: &R,
        caller: &Address,
    ) -> Result<Amount, DelegationError> {
        self.ensure_live(txn)?;
        match txn.get::<VoterRecord>(&voter_key(caller))? {
            Some(record) if matches!(record.target, VoteTarget::Producers(_)) => {
                self.reverse(txn, registry, record)
            }
            _ => Err(DelegationError::NothingToUnvote(*caller)),
        }
    }

    /// Like [`DelegationEngine::unvote`] but only for a vote via proxy.
    pub fn unvote_proxy<R: WeightTarget>(
        &self,
        txn: &mut Txn<'_>,
        registry: &R,
        caller: &Address,
    ) -> Result<Amount, DelegationError> {
        self.ensure_live(txn)?;
        match txn.get::<VoterRecord>(&voter_key(caller))? {
            Some(record) if matches!(record.target, VoteTarget::Proxy(_)) => {
                self.reverse(txn, registry, record)
            }
            _ => Err(DelegationError::NothingToUnvote(*caller)),
        }
    }

    fn reverse<R: WeightTarget>(
        &self,
        txn: &mut Txn<'_>,
        registry: &R,
        record: VoterRecord,
    ) -> Result<Amount, DelegationError> {
        let staked = record.staked;
        match &record.target {
            VoteTarget::Producers(producers) => {
                self.propagate(txn, registry, producers, staked.raw(), false)?;
            }
            VoteTarget::Proxy(proxy) => {
                let mut proxy_record = txn
                    .get::<ProxyRecord>(&proxy_key(proxy))?
                    .ok_or(DelegationError::UnknownProxy(*proxy))?;
                proxy_record.weight = proxy_record
                    .weight
                    .checked_sub(staked.raw())
                    .ok_or(DelegationError::WeightUnderflow(*proxy))?;
                self.propagate(txn, registry, &proxy_record.producers, staked.raw(), false)?;
                self.save_proxy(txn, &proxy_record)?;
            }
        }
        txn.transfer(&self.address, &record.voter, staked)?;
        txn.delete(&voter_key(&record.voter));

        tracing::info!(voter = %record.voter, refunded = staked.raw(), "unvote");
        txn.emit(Event::UserUnvoted {
            voter: record.voter,
            refunded: staked,
        });
        Ok(staked)
    }

    /// Opt in as a proxy. A proxy that unregistered but still has delegators
    /// may opt back in.
    pub fn register_proxy(&self, txn: &mut Txn<'_>, caller: &Address) -> Result<(), DelegationError> {
        self.ensure_live(txn)?;
        let record = match txn.get::<ProxyRecord>(&proxy_key(caller))? {
            Some(r) if r.accepting => return Err(DelegationError::AlreadyProxy(*caller)),
            Some(mut r) => {
                r.accepting = true;
                r
            }
            None => ProxyRecord::new(*caller),
        };
        self.save_proxy(txn, &record)?;
        tracing::info!(proxy = %caller, "proxy registered");
        txn.emit(Event::ProxyRegistered { proxy: *caller });
        Ok(())
    }

    /// Stop acting as a proxy. Propagated weight is withdrawn; existing
    /// delegators keep their records and can still unvote.
    pub fn unregister_proxy<R: WeightTarget>(
        &self,
        txn: &mut Txn<'_>,
        registry: &R,
        caller: &Address,
    ) -> Result<(), DelegationError> {
        self.ensure_live(txn)?;
        let mut record = self.accepting_proxy(txn, caller)?;
        self.propagate(txn, registry, &record.producers, record.weight, false)?;
        record.producers.clear();
        record.accepting = false;
        self.save_proxy(txn, &record)?;
        tracing::info!(proxy = %caller, remaining = record.weight, "proxy unregistered");
        txn.emit(Event::ProxyUnregistered { proxy: *caller });
        Ok(())
    }
}
