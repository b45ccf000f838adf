//! End-to-end scenarios through the `Chain` facade: registry, delegation and
//! governance wired over one in-memory store, with time driven by a
//! `NullClock`.

use dpos_config::ModuleKind;
use dpos_nullables::{NullClock, NullStore};
use dpos_registry::ProducerRegistry;
use dpos_runtime::{
    governance_address, CandidateInfo, Chain, ChainError, ProposalAction, VoteOutcome, VoteTarget,
};
use dpos_store::StateStore;
use dpos_types::{
    names, Address, Amount, ConfigKey, ConfigValue, ErrorCode, Event, GenesisParams, ProposalKind,
    UNIT,
};

type TestChain = Chain<NullStore, NullClock>;

const HOUR: u64 = 3600;
const LOCK: u64 = 72 * HOUR;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn producer(n: u8) -> Address {
    Address::derive(format!("producer-{n}").as_bytes())
}

fn user(n: u8) -> Address {
    Address::derive(format!("user-{n}").as_bytes())
}

fn info(n: u8) -> CandidateInfo {
    CandidateInfo::new(
        format!("producer {n}"),
        format!("https://p{n}.example.org"),
        format!("/ip4/10.0.0.{n}/tcp/30303"),
    )
}

fn new_chain() -> TestChain {
    dpos_utils::try_init_for_tests();
    let mut store = NullStore::new();
    for n in 0..8 {
        store.fund(&producer(n), Amount::units(10));
        store.fund(&user(n), Amount::units(100));
    }
    Chain::genesis(store, NullClock::new(1_000), &GenesisParams::default()).unwrap()
}

fn chain_with_producers(count: u8) -> TestChain {
    let mut chain = new_chain();
    for n in 0..count {
        chain.register(&producer(n), info(n), Amount::units(1)).unwrap();
    }
    chain
}

fn update(name: &str, value: u128) -> ProposalAction {
    ProposalAction::UpdateConfig(vec![(ConfigKey::named(name), ConfigValue::Uint(value))])
}

/// Propose as producer 0, then collect support from producers 1.. until the
/// proposal executes.
fn pass(chain: &mut TestChain, action: ProposalAction) {
    let mut outcome = chain.propose(&producer(0), action).unwrap();
    let mut n = 1;
    while let VoteOutcome::Recorded { .. } = outcome {
        outcome = chain.vote(&producer(n), true).unwrap();
        n += 1;
    }
}

fn registry_balance(chain: &TestChain) -> Amount {
    let registry = chain.bound_module(ModuleKind::ProducerRegistry).unwrap();
    chain.balance(&registry).unwrap()
}

// ---------------------------------------------------------------------------
// 1. Genesis
// ---------------------------------------------------------------------------

#[test]
fn genesis_writes_defaults_and_binds_modules() {
    let chain = new_chain();
    assert_eq!(chain.config_uint(names::DEPOSIT_FOR_JOIN).unwrap(), UNIT);
    assert_eq!(chain.config_uint(names::LOCK_TIME_FOR_DEPOSIT).unwrap(), u128::from(LOCK));
    assert_eq!(chain.config_uint(names::MAX_PRODUCER_SIZE).unwrap(), 4);
    let registry = chain.bound_module(ModuleKind::ProducerRegistry).unwrap();
    let delegation = chain.bound_module(ModuleKind::Delegation).unwrap();
    assert_ne!(registry, delegation);
    assert_eq!(
        chain.module_kind(&registry).unwrap(),
        Some(ModuleKind::ProducerRegistry)
    );
    assert!(chain.current_proposal().unwrap().is_none());
}

#[test]
fn genesis_runs_once_and_state_survives_reopen() {
    let chain = chain_with_producers(2);
    let store = chain.into_store();
    let err = Chain::genesis(store, NullClock::new(0), &GenesisParams::default())
        .err()
        .unwrap();
    assert!(matches!(err, ChainError::AlreadyInitialised));

    let err = Chain::open(NullStore::new(), NullClock::new(0)).err().unwrap();
    assert!(matches!(err, ChainError::NotInitialised));

    let chain = chain_with_producers(2);
    let reopened = Chain::open(chain.into_store(), NullClock::new(5_000)).unwrap();
    assert_eq!(reopened.active_count().unwrap(), 2);
}

// ---------------------------------------------------------------------------
// 2. Producer registry
// ---------------------------------------------------------------------------

#[test]
fn registration_requires_exact_deposit_once() {
    let mut chain = new_chain();
    let a = producer(1);
    let b = producer(2);

    chain.register(&a, info(1), Amount::units(1)).unwrap();
    assert!(chain.events().iter().any(|e| matches!(
        e,
        Event::ProducerRegistered { producer, deposit, .. } if *producer == a && *deposit == Amount::units(1)
    )));

    let err = chain.register(&a, info(1), Amount::units(1)).unwrap_err();
    assert_eq!(err.code(), ErrorCode::AlreadyRegistered);

    let err = chain.register(&b, info(2), Amount::new(UNIT / 2)).unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidDeposit);

    assert_eq!(chain.list_active().unwrap(), vec![a]);
    assert_eq!(registry_balance(&chain), Amount::units(1));
}

#[test]
fn failed_operation_leaves_no_trace() {
    let mut chain = new_chain();
    let before_events = chain.events().len();
    let before_commits = chain.store().commit_count();
    let err = chain
        .register(&producer(1), info(1), Amount::units(2))
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidDeposit);
    assert_eq!(chain.events().len(), before_events);
    assert_eq!(chain.store().commit_count(), before_commits);
    assert_eq!(chain.balance(&producer(1)).unwrap(), Amount::units(10));
}

#[test]
fn withdrawal_waits_for_lock_time() {
    let mut chain = chain_with_producers(1);
    let a = producer(0);
    chain.unregister(&a).unwrap();
    assert_eq!(chain.active_count().unwrap(), 0);

    chain.clock().advance(LOCK - 2 * 60);
    let err = chain.withdraw_deposit(&a).unwrap_err();
    assert_eq!(err.code(), ErrorCode::LockTimeNotElapsed);

    chain.clock().advance(4 * 60);
    let paid = chain.withdraw_deposit(&a).unwrap();
    assert_eq!(paid, Amount::units(1));
    assert_eq!(chain.balance(&a).unwrap(), Amount::units(10));
    assert_eq!(registry_balance(&chain), Amount::ZERO);

    let err = chain.withdraw_deposit(&a).unwrap_err();
    assert_eq!(err.code(), ErrorCode::NotUnregistered);

    // Fully withdrawn: may come back.
    chain.register(&a, info(0), Amount::units(1)).unwrap();
    assert_eq!(chain.list_active().unwrap(), vec![a]);
}

#[test]
fn unregistered_but_unreleased_cannot_reregister() {
    let mut chain = chain_with_producers(1);
    chain.unregister(&producer(0)).unwrap();
    let err = chain
        .register(&producer(0), info(0), Amount::units(1))
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::AlreadyRegistered);
}

#[test]
fn update_info_changes_display_fields_only() {
    let mut chain = chain_with_producers(1);
    chain
        .update_info(&producer(0), CandidateInfo::new("renamed", "w", "p"))
        .unwrap();
    let candidate = chain.candidate(&producer(0)).unwrap().unwrap();
    assert_eq!(candidate.info.name, "renamed");
    assert_eq!(candidate.deposit, Amount::units(1));

    let err = chain
        .update_info(&producer(5), CandidateInfo::default())
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::UnknownProducer);
}

#[test]
fn producers_info_reports_weights_and_bound() {
    let mut chain = chain_with_producers(3);
    chain
        .vote_direct(&user(0), vec![producer(1)], Amount::units(2))
        .unwrap();
    let info = chain.producers_info().unwrap();
    assert_eq!(info.max_producer_size, 4);
    assert_eq!(info.producers.len(), 3);
    assert!(info
        .producers
        .contains(&(producer(1), Amount::units(2).raw())));
    assert_eq!(chain.top_producers().unwrap()[0], producer(1));
}

// ---------------------------------------------------------------------------
// 3. Delegation
// ---------------------------------------------------------------------------

#[test]
fn vote_unvote_round_trip_restores_weights() {
    let mut chain = chain_with_producers(4);
    chain
        .vote_direct(&user(1), vec![producer(0)], Amount::units(3))
        .unwrap();
    let before: Vec<_> = (0..4).map(|n| chain.get_weight(&producer(n)).unwrap()).collect();

    let stake = Amount::units(7);
    chain
        .vote_direct(&user(0), vec![producer(0), producer(2)], stake)
        .unwrap();
    assert_eq!(chain.get_weight(&producer(0)).unwrap(), before[0] + stake.raw());
    assert_eq!(chain.get_weight(&producer(2)).unwrap(), before[2] + stake.raw());
    let record = chain.voter(&user(0)).unwrap().unwrap();
    assert_eq!(record.target, VoteTarget::Producers(vec![producer(0), producer(2)]));

    let refunded = chain.unvote_direct(&user(0)).unwrap();
    assert_eq!(refunded, stake);
    let after: Vec<_> = (0..4).map(|n| chain.get_weight(&producer(n)).unwrap()).collect();
    assert_eq!(before, after);
    assert!(chain.voter(&user(0)).unwrap().is_none());
    assert_eq!(chain.balance(&user(0)).unwrap(), Amount::units(100));
}

#[test]
fn votes_survive_producer_withdrawal_and_reverse_cleanly() {
    let mut chain = chain_with_producers(2);
    chain
        .vote_direct(&user(0), vec![producer(1)], Amount::units(4))
        .unwrap();
    chain.unregister(&producer(1)).unwrap();
    chain.clock().advance(LOCK);
    chain.withdraw_deposit(&producer(1)).unwrap();

    chain.unvote(&user(0)).unwrap();
    assert_eq!(chain.get_weight(&producer(1)).unwrap(), 0);
}

#[test]
fn proxy_lifecycle() {
    let mut chain = chain_with_producers(4);
    let proxy = user(7);
    let err = chain
        .vote_via_proxy(&user(0), &proxy, Amount::units(1))
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::UnknownProxy);

    chain.register_proxy(&proxy).unwrap();
    chain
        .vote_via_proxy(&user(0), &proxy, Amount::units(2))
        .unwrap();
    chain
        .vote_via_proxy(&user(1), &proxy, Amount::units(3))
        .unwrap();
    assert_eq!(chain.proxy(&proxy).unwrap().unwrap().weight, Amount::units(5).raw());

    chain.proxy_vote(&proxy, vec![producer(3)]).unwrap();
    assert_eq!(chain.get_weight(&producer(3)).unwrap(), Amount::units(5).raw());
    assert_eq!(chain.top_producers().unwrap()[0], producer(3));

    chain.unvote(&user(1)).unwrap();
    assert_eq!(chain.get_weight(&producer(3)).unwrap(), Amount::units(2).raw());

    chain.proxy_unvote(&proxy).unwrap();
    assert_eq!(chain.get_weight(&producer(3)).unwrap(), 0);

    chain.unregister_proxy(&proxy).unwrap();
    let err = chain.proxy_vote(&proxy, vec![producer(0)]).unwrap_err();
    assert_eq!(err.code(), ErrorCode::UnknownProxy);
    chain.unvote_proxy(&user(0)).unwrap();
    assert!(chain.proxy(&proxy).unwrap().is_none());
    assert_eq!(chain.balance(&user(0)).unwrap(), Amount::units(100));
}

// ---------------------------------------------------------------------------
// 4. Governance
// ---------------------------------------------------------------------------

#[test]
fn update_config_executes_at_three_of_four() {
    let mut chain = chain_with_producers(4);
    let outcome = chain
        .propose_parts(
            &producer(0),
            ProposalKind::UpdateConfig,
            vec![
                ConfigKey::named(names::DEPOSIT_FOR_JOIN),
                ConfigKey::named(names::MAX_PRODUCER_SIZE),
            ],
            vec![ConfigValue::Uint(2 * UNIT), ConfigValue::Uint(21)],
            None,
        )
        .unwrap();
    assert_eq!(outcome, VoteOutcome::Recorded { votes_for: 1, threshold: 3 });

    chain.vote(&producer(1), true).unwrap();
    assert_eq!(chain.config_uint(names::DEPOSIT_FOR_JOIN).unwrap(), UNIT);

    let outcome = chain.vote(&producer(2), true).unwrap();
    assert_eq!(outcome, VoteOutcome::Executed(ProposalKind::UpdateConfig));
    assert_eq!(chain.config_uint(names::DEPOSIT_FOR_JOIN).unwrap(), 2 * UNIT);
    assert_eq!(chain.config_uint(names::MAX_PRODUCER_SIZE).unwrap(), 21);

    let err = chain.vote(&producer(3), true).unwrap_err();
    assert_eq!(err.code(), ErrorCode::NoOpenProposal);

    // New deposit applies to the next registration.
    let err = chain
        .register(&producer(5), info(5), Amount::units(1))
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidDeposit);
    chain
        .register(&producer(5), info(5), Amount::units(2))
        .unwrap();
}

#[test]
fn only_the_active_set_governs() {
    let mut chain = chain_with_producers(5);
    // Producers 0..4 outweigh producer 4, which drops out of the top four.
    for n in 0..4 {
        chain
            .vote_direct(&user(n), vec![producer(n)], Amount::units(1))
            .unwrap();
    }
    assert!(!chain.top_producers().unwrap().contains(&producer(4)));

    let err = chain
        .propose(&producer(4), update(names::PROPOSAL_PERIOD, 10))
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::Unauthorized);
    let err = chain
        .propose(&user(0), update(names::PROPOSAL_PERIOD, 10))
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::Unauthorized);

    chain
        .propose(&producer(0), update(names::PROPOSAL_PERIOD, 10))
        .unwrap();
    assert_eq!(chain.current_proposal().unwrap().unwrap().snapshot_size, 4);
    let err = chain.vote(&producer(4), true).unwrap_err();
    assert_eq!(err.code(), ErrorCode::Unauthorized);
}

#[test]
fn stale_proposal_is_superseded() {
    let mut chain = chain_with_producers(4);
    chain
        .propose(&producer(0), update(names::PROPOSAL_PERIOD, 10))
        .unwrap();
    let err = chain
        .propose(&producer(1), update(names::PROPOSAL_PERIOD, 20))
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::ProposalPending);

    chain.clock().advance(LOCK + 1);
    let err = chain.vote(&producer(1), true).unwrap_err();
    assert_eq!(err.code(), ErrorCode::ProposalExpired);

    chain
        .propose(&producer(1), update(names::PROPOSAL_PERIOD, 20))
        .unwrap();
    assert!(chain.events().iter().any(|e| matches!(
        e,
        Event::ProposalSuperseded { proposer, .. } if *proposer == producer(0)
    )));
    assert_eq!(chain.current_proposal().unwrap().unwrap().proposer, producer(1));
}

#[test]
fn ouster_seizes_deposit_and_credits_remaining_producers() {
    let mut chain = chain_with_producers(4);
    let target = producer(3);
    pass(&mut chain, ProposalAction::VoteOutMaliciousProducer(target));

    let ousted = chain.candidate(&target).unwrap().unwrap();
    assert!(ousted.malicious);
    assert_eq!(ousted.deposit, Amount::ZERO);
    assert_eq!(chain.active_count().unwrap(), 3);
    assert_eq!(chain.reward_pool().unwrap(), Amount::new(UNIT % 3));
    assert!(chain.events().iter().any(|e| matches!(
        e,
        Event::ProducerOusted { producer, seized } if *producer == target && *seized == Amount::units(1)
    )));

    let err = chain.unregister(&target).unwrap_err();
    assert_eq!(err.code(), ErrorCode::Unauthorized);
    let err = chain.register(&target, info(3), Amount::units(1)).unwrap_err();
    assert_eq!(err.code(), ErrorCode::Unauthorized);

    chain.unregister(&producer(1)).unwrap();
    chain.clock().advance(LOCK);
    let paid = chain.withdraw_deposit(&producer(1)).unwrap();
    assert_eq!(paid, Amount::new(UNIT + UNIT / 3));

    // Escrow still covers every outstanding claim.
    let outstanding: u128 = (0..4)
        .filter_map(|n| chain.candidate(&producer(n)).unwrap())
        .map(|c| c.deposit.raw() + c.reward.raw())
        .sum();
    assert_eq!(
        registry_balance(&chain).raw(),
        outstanding + chain.reward_pool().unwrap().raw()
    );
}

#[test]
fn registry_upgrade_moves_balance_and_retires_old_module() {
    let mut chain = chain_with_producers(4);
    let old = chain.bound_module(ModuleKind::ProducerRegistry).unwrap();
    let held = chain.balance(&old).unwrap();
    assert_eq!(held, Amount::units(4));

    let new = chain.deploy_module(ModuleKind::ProducerRegistry).unwrap();
    pass(
        &mut chain,
        ProposalAction::UpgradeContract(vec![(
            ModuleKind::ProducerRegistry.binding_key(),
            ConfigValue::Address(new),
        )]),
    );

    assert_eq!(chain.bound_module(ModuleKind::ProducerRegistry).unwrap(), new);
    assert_eq!(chain.balance(&new).unwrap(), held);
    assert_eq!(chain.balance(&old).unwrap(), Amount::ZERO);
    assert_eq!(chain.module_kind(&old).unwrap(), None);

    let err = chain
        .execute(|txn, config| ProducerRegistry::at(old, config).list_active(txn))
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::ModuleRetired);

    // The new module sees the same producers and pays out of its balance.
    assert_eq!(chain.active_count().unwrap(), 4);
    chain.unregister(&producer(0)).unwrap();
    chain.clock().advance(LOCK);
    chain.withdraw_deposit(&producer(0)).unwrap();
    assert_eq!(chain.balance(&new).unwrap(), Amount::units(3));
}

#[test]
fn delegation_upgrade_keeps_open_votes_refundable() {
    let mut chain = chain_with_producers(4);
    chain
        .vote_direct(&user(0), vec![producer(1)], Amount::units(5))
        .unwrap();
    let new = chain.deploy_module(ModuleKind::Delegation).unwrap();
    pass(
        &mut chain,
        ProposalAction::UpgradeContract(vec![(
            ModuleKind::Delegation.binding_key(),
            ConfigValue::Address(new),
        )]),
    );
    assert_eq!(chain.balance(&new).unwrap(), Amount::units(5));

    chain.unvote(&user(0)).unwrap();
    assert_eq!(chain.get_weight(&producer(1)).unwrap(), 0);
    assert_eq!(chain.balance(&user(0)).unwrap(), Amount::units(100));
    assert_eq!(chain.balance(&new).unwrap(), Amount::ZERO);
}

#[test]
fn upgrade_to_wrong_kind_is_rejected() {
    let mut chain = chain_with_producers(4);
    let delegation_code = chain.deploy_module(ModuleKind::Delegation).unwrap();
    let err = chain
        .propose(
            &producer(0),
            ProposalAction::UpgradeContract(vec![(
                ModuleKind::ProducerRegistry.binding_key(),
                ConfigValue::Address(delegation_code),
            )]),
        )
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidPayload);
}

#[test]
fn governance_identity_is_fixed() {
    let chain = new_chain();
    assert_eq!(chain.governance_address(), governance_address());
    assert!(chain.store().balance(&governance_address()).unwrap().is_zero());
}
