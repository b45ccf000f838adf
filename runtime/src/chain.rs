//! The chain facade.

use dpos_config::{ConfigStore, ModuleKind};
use dpos_delegation::{DelegationEngine, ProxyRecord, VoterRecord};
use dpos_governance::{GovernanceEngine, Proposal, ProposalAction, VoteOutcome};
use dpos_registry::{Candidate, CandidateInfo, ProducerRegistry, ProducersInfo};
use dpos_store::{StateStore, Txn};
use dpos_types::{
    names, Address, Amount, Clock, ConfigKey, ConfigValue, Event, GenesisParams, ProposalKind,
    Timestamp, Weight,
};

use crate::ChainError;

const GENESIS_KEY: &[u8] = b"system.genesis";

/// Identity of the governance engine, the config store's only privileged
/// writer. No key pair exists for it.
pub fn governance_address() -> Address {
    Address::derive(b"system.governance")
}

/// The governance core running over a host store and clock.
pub struct Chain<S: StateStore, C: Clock> {
    store: S,
    clock: C,
    config: ConfigStore,
    events: Vec<Event>,
}

impl<S: StateStore, C: Clock> Chain<S, C> {
    /// Initialise an empty store: write every genesis parameter, then deploy
    /// and bind the registry and delegation modules.
    pub fn genesis(store: S, clock: C, params: &GenesisParams) -> Result<Self, ChainError> {
        if store.get(GENESIS_KEY)?.is_some() {
            return Err(ChainError::AlreadyInitialised);
        }
        let mut chain = Self::new(store, clock);
        let governance = chain.config.governance();
        chain.execute(|txn, config| {
            for (key, value) in params.entries() {
                config.set(txn, &governance, key, value)?;
            }
            for kind in [ModuleKind::ProducerRegistry, ModuleKind::Delegation] {
                let module = config.deploy_module(txn, kind)?;
                config.bind_module(txn, &governance, kind.binding_key(), module)?;
            }
            let at = txn.now();
            txn.put(GENESIS_KEY, &at)?;
            Ok::<_, ChainError>(())
        })?;
        tracing::info!(
            deposit_for_join = params.deposit_for_join,
            max_producer_size = params.max_producer_size,
            "genesis complete"
        );
        Ok(chain)
    }

    /// Resume over a store that already went through [`Chain::genesis`].
    pub fn open(store: S, clock: C) -> Result<Self, ChainError> {
        if store.get(GENESIS_KEY)?.is_none() {
            return Err(ChainError::NotInitialised);
        }
        Ok(Self::new(store, clock))
    }

    fn new(store: S, clock: C) -> Self {
        Self {
            store,
            clock,
            config: ConfigStore::new(governance_address()),
            events: Vec::new(),
        }
    }

    /// Run `op` as one atomic operation at the current ledger time.
    ///
    /// Effects are committed only if `op` returns `Ok`.
    pub fn execute<T, E>(
        &mut self,
        op: impl FnOnce(&mut Txn<'_>, ConfigStore) -> Result<T, E>,
    ) -> Result<T, ChainError>
    where
        E: Into<ChainError>,
    {
        let now = self.clock.now();
        let mut txn = Txn::new(&self.store, now);
        let out = match op(&mut txn, self.config) {
            Ok(out) => out,
            Err(e) => {
                let err: ChainError = e.into();
                tracing::debug!(error = %err, code = ?err.code(), "operation rejected");
                return Err(err);
            }
        };
        let (batch, events) = txn.finish();
        self.store.commit(batch)?;
        self.events.extend(events);
        Ok(out)
    }

    /// Run a read-only view against committed state.
    pub fn query<T, E>(
        &self,
        op: impl FnOnce(&Txn<'_>, ConfigStore) -> Result<T, E>,
    ) -> Result<T, ChainError>
    where
        E: Into<ChainError>,
    {
        let txn = Txn::new(&self.store, self.clock.now());
        op(&txn, self.config).map_err(Into::into)
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Hand the store back, e.g. to reopen it later with [`Chain::open`].
    pub fn into_store(self) -> S {
        self.store
    }

    /// Events of every committed operation, oldest first.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn governance_address(&self) -> Address {
        self.config.governance()
    }

    pub fn balance(&self, account: &Address) -> Result<Amount, ChainError> {
        Ok(self.store.balance(account)?)
    }

    // ── Config store ───────────────────────────────────────────────────

    pub fn config_value(&self, key: &ConfigKey) -> Result<ConfigValue, ChainError> {
        self.query(|txn, config| config.get(txn, key))
    }

    pub fn config_uint(&self, name: &str) -> Result<u128, ChainError> {
        self.query(|txn, config| config.get_uint(txn, name))
    }

    pub fn resolve_module(&self, name: &ConfigKey) -> Result<Option<Address>, ChainError> {
        self.query(|txn, config| config.resolve_module(txn, name))
    }

    pub fn bound_module(&self, kind: ModuleKind) -> Result<Address, ChainError> {
        self.query(|txn, config| config.bound_module(txn, kind))
    }

    pub fn module_kind(&self, module: &Address) -> Result<Option<ModuleKind>, ChainError> {
        self.query(|txn, config| config.module_kind(txn, module))
    }

    /// Deploy fresh module code, typically as the target of an upgrade.
    pub fn deploy_module(&mut self, kind: ModuleKind) -> Result<Address, ChainError> {
        self.execute(|txn, config| config.deploy_module(txn, kind))
    }

    // ── Producer registry ──────────────────────────────────────────────

    pub fn register(
        &mut self,
        caller: &Address,
        info: CandidateInfo,
        deposit: Amount,
    ) -> Result<(), ChainError> {
        self.execute(|txn, config| {
            ProducerRegistry::bound(txn, config)?.register(txn, caller, info, deposit)
        })
    }

    pub fn update_info(&mut self, caller: &Address, info: CandidateInfo) -> Result<(), ChainError> {
        self.execute(|txn, config| ProducerRegistry::bound(txn, config)?.update_info(txn, caller, info))
    }

    pub fn unregister(&mut self, caller: &Address) -> Result<(), ChainError> {
        self.execute(|txn, config| ProducerRegistry::bound(txn, config)?.unregister(txn, caller))
    }

    /// Returns deposit plus reward paid out.
    pub fn withdraw_deposit(&mut self, caller: &Address) -> Result<Amount, ChainError> {
        self.execute(|txn, config| {
            ProducerRegistry::bound(txn, config)?.withdraw_deposit(txn, caller)
        })
    }

    pub fn candidate(&self, producer: &Address) -> Result<Option<Candidate>, ChainError> {
        self.query(|txn, config| ProducerRegistry::bound(txn, config)?.candidate(txn, producer))
    }

    pub fn list_active(&self) -> Result<Vec<Address>, ChainError> {
        self.query(|txn, config| ProducerRegistry::bound(txn, config)?.list_active(txn))
    }

    pub fn active_count(&self) -> Result<u64, ChainError> {
        self.query(|txn, config| ProducerRegistry::bound(txn, config)?.active_count(txn))
    }

    pub fn top_producers(&self) -> Result<Vec<Address>, ChainError> {
        self.query(|txn, config| ProducerRegistry::bound(txn, config)?.top_producers(txn))
    }

    pub fn producers_info(&self) -> Result<ProducersInfo, ChainError> {
        self.query(|txn, config| ProducerRegistry::bound(txn, config)?.producers_info(txn))
    }

    pub fn get_weight(&self, producer: &Address) -> Result<Weight, ChainError> {
        self.query(|txn, config| ProducerRegistry::bound(txn, config)?.weight(txn, producer))
    }

    pub fn reward_pool(&self) -> Result<Amount, ChainError> {
        self.query(|txn, config| ProducerRegistry::bound(txn, config)?.reward_pool(txn))
    }

    // ── Delegation engine ──────────────────────────────────────────────

    pub fn vote_direct(
        &mut self,
        caller: &Address,
        producers: Vec<Address>,
        stake: Amount,
    ) -> Result<(), ChainError> {
        self.execute(|txn, config| {
            let registry = ProducerRegistry::bound(txn, config)?;
            DelegationEngine::bound(txn, config)?.vote_direct(txn, &registry, caller, producers, stake)
        })
    }

    pub fn vote_via_proxy(
        &mut self,
        caller: &Address,
        proxy: &Address,
        stake: Amount,
    ) -> Result<(), ChainError> {
        self.execute(|txn, config| {
            let registry = ProducerRegistry::bound(txn, config)?;
            DelegationEngine::bound(txn, config)?.vote_via_proxy(txn, &registry, caller, proxy, stake)
        })
    }

    pub fn proxy_vote(&mut self, caller: &Address, producers: Vec<Address>) -> Result<(), ChainError> {
        self.execute(|txn, config| {
            let registry = ProducerRegistry::bound(txn, config)?;
            DelegationEngine::bound(txn, config)?.proxy_vote(txn, &registry, caller, producers)
        })
    }

    pub fn proxy_unvote(&mut self, caller: &Address) -> Result<(), ChainError> {
        self.execute(|txn, config| {
            let registry = ProducerRegistry::bound(txn, config)?;
            DelegationEngine::bound(txn, config)?.proxy_unvote(txn, &registry, caller)
        })
    }

    /// Reverse the caller's open vote. Returns the refunded stake.
    pub fn unvote(&mut self, caller: &Address) -> Result<Amount, ChainError> {
        self.execute(|txn, config| {
            let registry = ProducerRegistry::bound(txn, config)?;
            DelegationEngine::bound(txn, config)?.unvote(txn, &registry, caller)
        })
    }

    pub fn unvote_direct(&mut self, caller: &Address) -> Result<Amount, ChainError> {
        self.execute(|txn, config| {
            let registry = ProducerRegistry::bound(txn, config)?;
            DelegationEngine::bound(txn, config)?.unvote_direct(txn, &registry, caller)
        })
    }

    pub fn unvote_proxy(&mut self, caller: &Address) -> Result<Amount, ChainError> {
        self.execute(|txn, config| {
            let registry = ProducerRegistry::bound(txn, config)?;
            DelegationEngine::bound(txn, config)?.unvote_proxy(txn, &registry, caller)
        })
    }

    pub fn register_proxy(&mut self, caller: &Address) -> Result<(), ChainError> {
        self.execute(|txn, config| DelegationEngine::bound(txn, config)?.register_proxy(txn, caller))
    }

    pub fn unregister_proxy(&mut self, caller: &Address) -> Result<(), ChainError> {
        self.execute(|txn, config| {
            let registry = ProducerRegistry::bound(txn, config)?;
            DelegationEngine::bound(txn, config)?.unregister_proxy(txn, &registry, caller)
        })
    }

    pub fn voter(&self, voter: &Address) -> Result<Option<VoterRecord>, ChainError> {
        self.query(|txn, config| DelegationEngine::bound(txn, config)?.voter(txn, voter))
    }

    pub fn proxy(&self, proxy: &Address) -> Result<Option<ProxyRecord>, ChainError> {
        self.query(|txn, config| DelegationEngine::bound(txn, config)?.proxy(txn, proxy))
    }

    // ── Governance engine ──────────────────────────────────────────────

    pub fn propose(&mut self, caller: &Address, action: ProposalAction) -> Result<VoteOutcome, ChainError> {
        self.execute(|txn, config| {
            let registry = ProducerRegistry::bound(txn, config)?;
            Ok::<_, ChainError>(GovernanceEngine::new(config).propose(txn, &registry, caller, action)?)
        })
    }

    /// [`Chain::propose`] from the flat `(kind, keys, values, target)` form.
    pub fn propose_parts(
        &mut self,
        caller: &Address,
        kind: ProposalKind,
        keys: Vec<ConfigKey>,
        values: Vec<ConfigValue>,
        target: Option<Address>,
    ) -> Result<VoteOutcome, ChainError> {
        let action = ProposalAction::from_parts(kind, keys, values, target)?;
        self.propose(caller, action)
    }

    pub fn vote(&mut self, caller: &Address, support: bool) -> Result<VoteOutcome, ChainError> {
        self.execute(|txn, config| {
            let registry = ProducerRegistry::bound(txn, config)?;
            Ok::<_, ChainError>(GovernanceEngine::new(config).vote(txn, &registry, caller, support)?)
        })
    }

    pub fn current_proposal(&self) -> Result<Option<Proposal>, ChainError> {
        self.query(|txn, config| GovernanceEngine::new(config).current_proposal(txn))
    }

    /// Seconds an open proposal stays votable.
    pub fn proposal_period(&self) -> Result<u128, ChainError> {
        self.config_uint(names::PROPOSAL_PERIOD)
    }
}
