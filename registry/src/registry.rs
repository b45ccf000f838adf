//! The producer registry module.

use dpos_config::{ConfigStore, ModuleKind};
use dpos_store::{record_key, StoreError, Txn};
use dpos_types::{names, Address, Amount, Event, TieBreak, Weight};

use crate::candidate::{Candidate, CandidateInfo, CandidateStatus, ProducersInfo};
use crate::error::RegistryError;
use crate::index::ActiveIndex;

const CANDIDATE_NS: &str = "registry.candidate";
const REWARD_POOL_KEY: &[u8] = b"registry.rewardPool";

fn candidate_key(producer: &Address) -> Vec<u8> {
    record_key(CANDIDATE_NS, producer.as_bytes())
}

/// Handle on the registry module deployed at `address`.
///
/// Deposits, reward credit and the undistributed reward pool are all held as
/// native balance of `address`.
#[derive(Clone, Copy, Debug)]
pub struct ProducerRegistry {
    address: Address,
    config: ConfigStore,
}

impl ProducerRegistry {
    pub fn at(address: Address, config: ConfigStore) -> Self {
        Self { address, config }
    }

    /// The registry currently bound under `module.producerRegistry`.
    pub fn bound(txn: &Txn<'_>, config: ConfigStore) -> Result<Self, RegistryError> {
        let address = config.bound_module(txn, ModuleKind::ProducerRegistry)?;
        Ok(Self::at(address, config))
    }

    pub fn address(&self) -> Address {
        self.address
    }

    fn ensure_live(&self, txn: &Txn<'_>) -> Result<(), RegistryError> {
        Ok(self
            .config
            .ensure_live(txn, &self.address, ModuleKind::ProducerRegistry)?)
    }

    fn load(&self, txn: &Txn<'_>, producer: &Address) -> Result<Candidate, RegistryError> {
        txn.get::<Candidate>(&candidate_key(producer))?
            .ok_or(RegistryError::UnknownProducer(*producer))
    }

    fn save(&self, txn: &mut Txn<'_>, candidate: &Candidate) -> Result<(), RegistryError> {
        Ok(txn.put(&candidate_key(&candidate.producer), candidate)?)
    }

    fn load_active(&self, txn: &Txn<'_>, producer: &Address) -> Result<Candidate, RegistryError> {
        match txn.get::<Candidate>(&candidate_key(producer))? {
            Some(c) if c.is_active() => Ok(c),
            _ => Err(RegistryError::NotActiveCandidate(*producer)),
        }
    }

    /// Register `caller` as a producer candidate, escrowing `attached`.
    pub fn register(
        &self,
        txn: &mut Txn<'_>,
        caller: &Address,
        info: CandidateInfo,
        attached: Amount,
    ) -> Result<(), RegistryError> {
        self.ensure_live(txn)?;
        let previous = txn.get::<Candidate>(&candidate_key(caller))?;
        if let Some(prev) = &previous {
            if prev.malicious {
                return Err(RegistryError::Malicious(*caller));
            }
            if prev.status != CandidateStatus::Withdrawn {
                return Err(RegistryError::AlreadyRegistered(*caller));
            }
        }

        let expected = Amount::new(self.config.get_uint(txn, names::DEPOSIT_FOR_JOIN)?);
        if attached != expected {
            return Err(RegistryError::InvalidDeposit { expected, attached });
        }
        txn.transfer(caller, &self.address, attached)?;

        let candidate = Candidate {
            producer: *caller,
            info: info.clone(),
            deposit: attached,
            weight: previous.map(|p| p.weight).unwrap_or(0),
            registered_at: txn.now(),
            status: CandidateStatus::Active,
            malicious: false,
            reward: Amount::ZERO,
        };
        self.save(txn, &candidate)?;
        ActiveIndex::insert(txn, caller)?;

        tracing::info!(producer = %caller, name = %info.name, deposit = attached.raw(), "producer registered");
        txn.emit(Event::ProducerRegistered {
            producer: *caller,
            name: info.name,
            web_url: info.web_url,
            p2p_url: info.p2p_url,
            deposit: attached,
        });
        Ok(())
    }

    pub fn update_info(
        &self,
        txn: &mut Txn<'_>,
        caller: &Address,
        info: CandidateInfo,
    ) -> Result<(), RegistryError> {
        self.ensure_live(txn)?;
        let mut candidate = self.load_active(txn, caller)?;
        candidate.info = info.clone();
        self.save(txn, &candidate)?;
        txn.emit(Event::ProducerInfoUpdated {
            producer: *caller,
            name: info.name,
            web_url: info.web_url,
            p2p_url: info.p2p_url,
        });
        Ok(())
    }

    /// Leave the active set voluntarily. The deposit stays escrowed until
    /// `system.lockTimeForDeposit` has elapsed.
    pub fn unregister(&self, txn: &mut Txn<'_>, caller: &Address) -> Result<(), RegistryError> {
        self.ensure_live(txn)?;
        if let Some(c) = txn.get::<Candidate>(&candidate_key(caller))? {
            if c.malicious {
                return Err(RegistryError::Malicious(*caller));
            }
        }
        let mut candidate = self.load_active(txn, caller)?;
        let at = txn.now();
        candidate.status = CandidateStatus::Unregistered { at };
        self.save(txn, &candidate)?;
        ActiveIndex::remove(txn, caller)?;

        tracing::info!(producer = %caller, %at, "producer unregistered");
        txn.emit(Event::ProducerUnregistered {
            producer: *caller,
            at,
            seized: Amount::ZERO,
            credited_each: Amount::ZERO,
            credited_count: 0,
        });
        Ok(())
    }

    /// Pay out the escrowed deposit plus accrued reward once the lock time has
    /// elapsed. Returns the total paid.
    pub fn withdraw_deposit(
        &self,
        txn: &mut Txn<'_>,
        caller: &Address,
    ) -> Result<Amount, RegistryError> {
        self.ensure_live(txn)?;
        let mut candidate = self.load(txn, caller)?;
        let Some(at) = candidate.unregistered_at() else {
            return Err(RegistryError::NotUnregistered(*caller));
        };
        let lock = self.config.get_u64(txn, names::LOCK_TIME_FOR_DEPOSIT)?;
        if !at.has_expired(lock, txn.now()) {
            return Err(RegistryError::LockTimeNotElapsed {
                unlocks_at: at.saturating_add(lock),
            });
        }

        let deposit = candidate.deposit;
        let reward = candidate.reward;
        let total = deposit
            .checked_add(reward)
            .ok_or(StoreError::Overflow(*caller))?;
        txn.transfer(&self.address, caller, total)?;

        candidate.deposit = Amount::ZERO;
        candidate.reward = Amount::ZERO;
        candidate.status = CandidateStatus::Withdrawn;
        self.save(txn, &candidate)?;

        tracing::info!(producer = %caller, deposit = deposit.raw(), reward = reward.raw(), "deposit withdrawn");
        txn.emit(Event::DepositWithdrawn {
            producer: *caller,
            deposit,
            reward,
        });
        Ok(total)
    }

    /// Add or subtract delegated weight. Only the bound delegation module and
    /// governance may call this.
    pub fn adjust_weight(
        &self,
        txn: &mut Txn<'_>,
        caller: &Address,
        producer: &Address,
        delta: Weight,
        increase: bool,
    ) -> Result<Weight, RegistryError> {
        self.ensure_live(txn)?;
        let delegation = self
            .config
            .resolve_module(txn, &ModuleKind::Delegation.binding_key())?;
        if *caller != self.config.governance() && Some(*caller) != delegation {
            tracing::warn!(%caller, "rejected weight adjustment");
            return Err(RegistryError::Unauthorized(*caller));
        }

        let mut candidate = self.load(txn, producer)?;
        candidate.weight = if increase {
            candidate
                .weight
                .checked_add(delta)
                .ok_or(RegistryError::WeightOverflow(*producer))?
        } else {
            candidate
                .weight
                .checked_sub(delta)
                .ok_or(RegistryError::WeightUnderflow(*producer))?
        };
        self.save(txn, &candidate)?;
        tracing::debug!(%producer, delta, increase, weight = candidate.weight, "weight adjusted");
        Ok(candidate.weight)
    }

    /// Forced removal of a producer judged malicious. Governance only.
    ///
    /// The producer is flagged, dropped from the index and its deposit is
    /// seized into the reward pool. The pool is then split evenly across the
    /// producers still in the index; the indivisible remainder stays in the
    /// pool for the next ouster. Returns the seized deposit.
    pub fn expel(
        &self,
        txn: &mut Txn<'_>,
        caller: &Address,
        producer: &Address,
    ) -> Result<Amount, RegistryError> {
        self.ensure_live(txn)?;
        if *caller != self.config.governance() {
            tracing::warn!(%caller, "rejected expel");
            return Err(RegistryError::Unauthorized(*caller));
        }
        let mut candidate = self.load(txn, producer)?;
        let at = match candidate.status {
            CandidateStatus::Unregistered { at } => at,
            _ => txn.now(),
        };
        if candidate.is_active() {
            ActiveIndex::remove(txn, producer)?;
            candidate.status = CandidateStatus::Unregistered { at };
        }
        let seized = candidate.deposit;
        candidate.deposit = Amount::ZERO;
        candidate.malicious = true;
        self.save(txn, &candidate)?;

        let pool = self
            .reward_pool(txn)?
            .checked_add(seized)
            .ok_or(StoreError::Overflow(self.address))?;
        let remaining = ActiveIndex::members(txn)?;
        let (credited_each, carry) = match pool.split(remaining.len() as u128) {
            Some(split) => split,
            None => (Amount::ZERO, pool),
        };
        if !credited_each.is_zero() {
            for member in &remaining {
                let mut c = self.load(txn, member)?;
                c.reward = c
                    .reward
                    .checked_add(credited_each)
                    .ok_or(StoreError::Overflow(*member))?;
                self.save(txn, &c)?;
            }
        }
        txn.put(REWARD_POOL_KEY, &carry)?;

        tracing::info!(
            %producer,
            seized = seized.raw(),
            credited_each = credited_each.raw(),
            remaining = remaining.len(),
            carried = carry.raw(),
            "malicious producer expelled"
        );
        txn.emit(Event::ProducerUnregistered {
            producer: *producer,
            at,
            seized,
            credited_each,
            credited_count: remaining.len() as u32,
        });
        Ok(seized)
    }

    pub fn candidate(
        &self,
        txn: &Txn<'_>,
        producer: &Address,
    ) -> Result<Option<Candidate>, RegistryError> {
        self.ensure_live(txn)?;
        Ok(txn.get::<Candidate>(&candidate_key(producer))?)
    }

    pub fn is_active(&self, txn: &Txn<'_>, producer: &Address) -> Result<bool, RegistryError> {
        self.ensure_live(txn)?;
        Ok(ActiveIndex::contains(txn, producer)?)
    }

    pub fn list_active(&self, txn: &Txn<'_>) -> Result<Vec<Address>, RegistryError> {
        self.ensure_live(txn)?;
        Ok(ActiveIndex::members(txn)?)
    }

    pub fn active_count(&self, txn: &Txn<'_>) -> Result<u64, RegistryError> {
        self.ensure_live(txn)?;
        Ok(ActiveIndex::len(txn)?)
    }

    pub fn weight(&self, txn: &Txn<'_>, producer: &Address) -> Result<Weight, RegistryError> {
        self.ensure_live(txn)?;
        Ok(self.load(txn, producer)?.weight)
    }

    /// Undistributed remainder carried over from earlier ousters.
    pub fn reward_pool(&self, txn: &Txn<'_>) -> Result<Amount, RegistryError> {
        Ok(txn.get::<Amount>(REWARD_POOL_KEY)?.unwrap_or_default())
    }

    pub fn producers_info(&self, txn: &Txn<'_>) -> Result<ProducersInfo, RegistryError> {
        self.ensure_live(txn)?;
        let mut producers = Vec::new();
        for producer in ActiveIndex::members(txn)? {
            producers.push((producer, self.load(txn, &producer)?.weight));
        }
        Ok(ProducersInfo {
            producers,
            max_producer_size: self.config.get_u64(txn, names::MAX_PRODUCER_SIZE)?,
        })
    }

    /// The active set: index members ranked by weight, at most
    /// `system.maxProducerSize` of them.
    pub fn top_producers(&self, txn: &Txn<'_>) -> Result<Vec<Address>, RegistryError> {
        self.ensure_live(txn)?;
        let tie_break = self.tie_break(txn)?;
        let mut ranked = Vec::new();
        for producer in ActiveIndex::members(txn)? {
            ranked.push(self.load(txn, &producer)?);
        }
        ranked.sort_by(|a, b| {
            b.weight.cmp(&a.weight).then_with(|| match tie_break {
                TieBreak::EarliestRegistration => a
                    .registered_at
                    .cmp(&b.registered_at)
                    .then_with(|| a.producer.cmp(&b.producer)),
                TieBreak::LowestAddress => a.producer.cmp(&b.producer),
            })
        });
        let max = self.config.get_u64(txn, names::MAX_PRODUCER_SIZE)?;
        Ok(ranked
            .into_iter()
            .take(usize::try_from(max).unwrap_or(usize::MAX))
            .map(|c| c.producer)
            .collect())
    }

    fn tie_break(&self, txn: &Txn<'_>) -> Result<TieBreak, RegistryError> {
        let code = self.config.get_uint(txn, names::PRODUCER_TIE_BREAK)?;
        Ok(TieBreak::from_code(code).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "falling back to default tie-break");
            TieBreak::default()
        }))
    }
}
