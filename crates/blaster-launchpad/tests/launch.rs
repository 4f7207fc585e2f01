use blaster_amm::{
    AddLiquidity, AddLiquidityNative, AmmError, AmmFactory, AmmRouter, ConstantProductRouter, LiquidityReceipt,
    SwapExactIn,
};
use blaster_core::error::BlasterError;
use blaster_core::event::Event;
use blaster_core::params::LaunchParams;
use blaster_core::types::{Address, Balance, LockKey};
use blaster_launchpad::{Deployment, LaunchpadConfig, Launchpad};
use blaster_state::Ledger;

const START: u64 = 1_700_000_000;
const ONE_NATIVE: u128 = 1_000_000_000_000_000_000;
/// floor(sqrt(8_000_000 × 10^18)) − 1000
const POOL_SHARES: u128 = 2_828_427_123_746;

struct Env {
    ledger: Ledger,
    pad: Launchpad<ConstantProductRouter>,
    owner: Address,
    bob: Address,
    tom: Address,
}

fn setup() -> Env {
    let mut ledger = Ledger::default();
    ledger.set_time(START).unwrap();
    Deployment::bootstrap(&mut ledger).unwrap();
    let pad = Deployment::launchpad(&ledger, LaunchpadConfig::default());

    let owner = Address::from_label("owner");
    ledger.fund_native(&owner, 10 * ONE_NATIVE).unwrap();
    Env { ledger, pad, owner, bob: Address::from_label("bob"), tom: Address::from_label("tom") }
}

fn params(tom: Address) -> LaunchParams {
    LaunchParams {
        name: "TestCoin".into(),
        symbol: "TEST".into(),
        coin_id: 99,
        supply: 10_000_000,
        buy_tax_bps: 0,
        sell_tax_bps: 0,
        burn_bps: 0,
        fee_receiver: tom,
        lp_amount: 8_000_000,
        lp_amount_native: ONE_NATIVE,
        lock_period: 1000,
        vesting_period: 1000,
        max_tokens_per_wallet: 0,
        limit_per_transaction: 0,
        antisnipe_period: 0,
        external_distribution: 0,
        distribution_receiver: None,
    }
}

fn claimed_events(ledger: &Ledger) -> Vec<(Balance, u64)> {
    ledger
        .events()
        .iter()
        .filter_map(|e| match e.event {
            Event::TokenClaimed { amount, time_passed, .. } => Some((amount, time_passed)),
            _ => None,
        })
        .collect()
}

#[test]
fn launch_seeds_pool_and_vests_pool_shares() {
    let mut env = setup();
    let p = params(env.tom);
    let receipt = env.pad.create_coin(&mut env.ledger, &env.owner, &p, ONE_NATIVE).unwrap();

    assert_eq!(receipt.liquidity, POOL_SHARES);
    assert_eq!(receipt.lp_lock_key, LockKey(1));
    assert_eq!(receipt.allocation_lock_key, LockKey(2));
    assert_eq!(receipt.founder_allocation, 2_000_000);
    assert_eq!(env.ledger.native_balance(&env.owner), 9 * ONE_NATIVE);

    // Pool reserves hold exactly what was seeded.
    let router = env.pad.router();
    let (r0, r1, _) = router.factory().get_reserves(&env.ledger, &receipt.pair).unwrap();
    let mut reserves = [r0, r1];
    reserves.sort();
    assert_eq!(reserves, [8_000_000, ONE_NATIVE]);

    // Construction mode is off again and both counterparties are pool-like.
    let coin = env.ledger.coin(&receipt.coin).unwrap();
    assert!(!coin.policy.construction_mode);
    assert!(coin.policy.supported_pairs.contains(&receipt.pair));
    assert!(coin.policy.supported_pairs.contains(&router.address()));

    let info = env.pad.get_lock_info(&env.ledger, receipt.lp_lock_key);
    assert_eq!(info.asset, receipt.pair);
    assert_eq!(info.beneficiary, env.owner);
    assert_eq!((info.total, info.remaining, info.duration, info.created_at), (POOL_SHARES, POOL_SHARES, 1000, START));

    env.ledger.set_time(START + 500).unwrap();
    env.pad.claim_token(&mut env.ledger, receipt.lp_lock_key).unwrap();
    assert_eq!(env.ledger.balance_of(&receipt.pair, &env.owner), POOL_SHARES / 2);

    env.ledger.set_time(START + 750).unwrap();
    env.pad.claim_token(&mut env.ledger, receipt.lp_lock_key).unwrap();
    assert_eq!(env.ledger.balance_of(&receipt.pair, &env.owner), POOL_SHARES * 3 / 4);

    env.ledger.set_time(START + 1200).unwrap();
    env.pad.claim_token(&mut env.ledger, receipt.lp_lock_key).unwrap();
    assert_eq!(env.ledger.balance_of(&receipt.pair, &env.owner), POOL_SHARES);

    assert_eq!(
        claimed_events(&env.ledger),
        vec![(POOL_SHARES / 2, 500), (POOL_SHARES * 3 / 4 - POOL_SHARES / 2, 750), (POOL_SHARES - POOL_SHARES * 3 / 4, 1200)]
    );
    assert!(env.pad.get_lock_info(&env.ledger, receipt.lp_lock_key).is_empty());
    assert!(matches!(
        env.pad.claim_token(&mut env.ledger, receipt.lp_lock_key),
        Err(BlasterError::UnknownLock(k)) if k == receipt.lp_lock_key
    ));
}

#[test]
fn founder_allocation_vests_linearly() {
    let mut env = setup();
    let receipt = env.pad.create_coin(&mut env.ledger, &env.owner, &params(env.tom), ONE_NATIVE).unwrap();

    let info = env.pad.get_lock_info(&env.ledger, receipt.allocation_lock_key);
    assert_eq!(info.asset, receipt.coin);
    assert_eq!(info.total, 2_000_000);
    assert_eq!(env.ledger.balance_of(&receipt.coin, &env.pad.vault()), 2_000_000);
    // The launchpad keeps nothing once the launch settles.
    assert_eq!(env.ledger.balance_of(&receipt.coin, &env.pad.address()), 0);
    assert_eq!(env.ledger.balance_of(&receipt.pair, &env.pad.address()), 0);

    // Nothing has vested in the creating second.
    assert_eq!(env.pad.claim_token(&mut env.ledger, receipt.allocation_lock_key).unwrap(), 0);

    env.ledger.set_time(START + 250).unwrap();
    assert_eq!(env.pad.claim_token(&mut env.ledger, receipt.allocation_lock_key).unwrap(), 500_000);
    env.ledger.set_time(START + 5000).unwrap();
    assert_eq!(env.pad.claim_token(&mut env.ledger, receipt.allocation_lock_key).unwrap(), 1_500_000);
    assert_eq!(env.ledger.balance_of(&receipt.coin, &env.owner), 2_000_000);
    assert_eq!(env.ledger.balance_of(&receipt.coin, &env.pad.vault()), 0);
}

#[test]
fn claims_pay_the_beneficiary_whoever_calls() {
    let mut env = setup();
    let receipt = env.pad.create_coin(&mut env.ledger, &env.owner, &params(env.tom), ONE_NATIVE).unwrap();
    env.ledger.set_time(START + 1000).unwrap();
    // Claims carry no caller; the payout always lands with the beneficiary.
    env.pad.claim_token(&mut env.ledger, receipt.lp_lock_key).unwrap();
    assert_eq!(env.ledger.balance_of(&receipt.pair, &env.owner), POOL_SHARES);
    assert_eq!(env.ledger.balance_of(&receipt.pair, &env.bob), 0);
}

#[test]
fn lock_and_creation_events_are_emitted_in_order() {
    let mut env = setup();
    let receipt = env.pad.create_coin(&mut env.ledger, &env.owner, &params(env.tom), ONE_NATIVE).unwrap();

    let tail: Vec<&Event> = env
        .ledger
        .events()
        .iter()
        .map(|e| &e.event)
        .filter(|e| matches!(e, Event::TokensLocked { .. } | Event::CoinCreated { .. }))
        .collect();
    assert_eq!(tail.len(), 3);
    assert!(matches!(tail[0], Event::TokensLocked { lock_type: 1, amount, .. } if *amount == POOL_SHARES));
    assert!(matches!(tail[1], Event::TokensLocked { lock_type: 0, amount: 2_000_000, .. }));
    match tail[2] {
        Event::CoinCreated { coin, coin_id, deployer, lp_lock_size_native, lp_lock_size_tokens, lock_period, vesting_period } => {
            assert_eq!(*coin, receipt.coin);
            assert_eq!(*coin_id, 99);
            assert_eq!(*deployer, env.owner);
            assert_eq!(*lp_lock_size_native, ONE_NATIVE);
            assert_eq!(*lp_lock_size_tokens, 8_000_000);
            assert_eq!((*lock_period, *vesting_period), (1000, 1000));
        }
        other => panic!("unexpected event {other:?}"),
    }

    let record = env.ledger.launch(99).unwrap();
    assert_eq!(record.coin, receipt.coin);
    assert_eq!(record.pair, receipt.pair);
    assert_eq!(record.created_at, START);
}

#[test]
fn zero_vesting_period_is_rejected_without_side_effects() {
    let mut env = setup();
    let mut p = params(env.tom);
    p.vesting_period = 0;
    let events_before = env.ledger.events().len();

    let err = env.pad.create_coin(&mut env.ledger, &env.owner, &p, ONE_NATIVE).unwrap_err();
    assert!(matches!(err, BlasterError::ZeroVestingPeriod));
    assert_eq!(env.ledger.native_balance(&env.owner), 10 * ONE_NATIVE);
    assert_eq!(env.ledger.events().len(), events_before);
    // Only the wrapped native asset exists.
    assert_eq!(env.ledger.coins().count(), 1);
}

#[test]
fn attached_value_must_match_declared_liquidity() {
    let mut env = setup();
    let err = env.pad.create_coin(&mut env.ledger, &env.owner, &params(env.tom), ONE_NATIVE - 1).unwrap_err();
    assert!(matches!(err, BlasterError::LiquidityValueMismatch { .. }));
}

#[test]
fn underfunded_caller_reverts_cleanly() {
    let mut env = setup();
    let poor = Address::from_label("poor");
    env.ledger.fund_native(&poor, ONE_NATIVE / 2).unwrap();
    let err = env.pad.create_coin(&mut env.ledger, &poor, &params(env.tom), ONE_NATIVE).unwrap_err();
    assert!(matches!(err, BlasterError::InsufficientBalance { .. }));
    assert_eq!(env.ledger.native_balance(&poor), ONE_NATIVE / 2);
    assert!(env.ledger.launch(99).is_none());
}

#[test]
fn launch_ids_are_unique() {
    let mut env = setup();
    env.pad.create_coin(&mut env.ledger, &env.owner, &params(env.tom), ONE_NATIVE).unwrap();
    let err = env.pad.create_coin(&mut env.ledger, &env.owner, &params(env.tom), ONE_NATIVE).unwrap_err();
    assert!(matches!(err, BlasterError::DuplicateLaunchId(99)));

    let mut second = params(env.tom);
    second.coin_id = 100;
    let receipt = env.pad.create_coin(&mut env.ledger, &env.owner, &second, ONE_NATIVE).unwrap();
    assert_eq!(receipt.lp_lock_key, LockKey(3));
    assert_eq!(env.ledger.launches().count(), 2);
}

#[test]
fn external_distribution_reduces_founder_allocation() {
    let mut env = setup();
    let mut p = params(env.tom);
    p.external_distribution = 500_000;
    p.distribution_receiver = Some(env.bob);
    let receipt = env.pad.create_coin(&mut env.ledger, &env.owner, &p, ONE_NATIVE).unwrap();

    assert_eq!(receipt.founder_allocation, 1_500_000);
    // Sent in construction mode: no burn, no tax.
    assert_eq!(env.ledger.balance_of(&receipt.coin, &env.bob), 500_000);
    assert_eq!(env.pad.get_lock_info(&env.ledger, receipt.allocation_lock_key).total, 1_500_000);
}

#[test]
fn launched_coin_trades_with_taxes_on() {
    let mut env = setup();
    let mut p = params(env.tom);
    p.buy_tax_bps = 1000;
    let receipt = env.pad.create_coin(&mut env.ledger, &env.owner, &p, ONE_NATIVE).unwrap();

    // The seeding deposit itself paid no tax.
    assert_eq!(env.ledger.balance_of(&receipt.coin, &env.tom), 0);

    let router = *env.pad.router();
    let wnative = router.wrapped_native();
    env.ledger.fund_native(&env.bob, ONE_NATIVE).unwrap();
    router.wrap_native(&mut env.ledger, &env.bob, ONE_NATIVE / 100).unwrap();
    env.ledger.approve(&wnative, &env.bob, &router.address(), ONE_NATIVE / 100).unwrap();
    let received = router
        .swap_exact_tokens_for_tokens_supporting_fee_on_transfer_tokens(
            &mut env.ledger,
            &env.bob,
            &SwapExactIn {
                amount_in: ONE_NATIVE / 100,
                amount_out_min: 0,
                path: vec![wnative, receipt.coin],
                to: env.bob,
                deadline: START + 60,
            },
        )
        .unwrap();
    let taxed = env.ledger.balance_of(&receipt.coin, &env.tom);
    assert!(taxed > 0);
    assert_eq!(received, env.ledger.balance_of(&receipt.coin, &env.bob));
}

/// Seeds the pool through the real router, then reports failure.
struct FailingRouter(ConstantProductRouter);

impl AmmRouter for FailingRouter {
    fn address(&self) -> Address {
        self.0.address()
    }

    fn wrapped_native(&self) -> Address {
        self.0.wrapped_native()
    }

    fn get_pair(&self, ledger: &Ledger, token_a: &Address, token_b: &Address) -> Option<Address> {
        self.0.get_pair(ledger, token_a, token_b)
    }

    fn add_liquidity(&self, ledger: &mut Ledger, caller: &Address, args: &AddLiquidity) -> Result<LiquidityReceipt, AmmError> {
        self.0.add_liquidity(ledger, caller, args)
    }

    fn add_liquidity_native(
        &self,
        ledger: &mut Ledger,
        caller: &Address,
        args: &AddLiquidityNative,
        value: Balance,
    ) -> Result<LiquidityReceipt, AmmError> {
        self.0.add_liquidity_native(ledger, caller, args, value)?;
        Err(AmmError::InsufficientLiquidityMinted)
    }

    fn get_amounts_out(&self, ledger: &Ledger, amount_in: Balance, path: &[Address]) -> Result<Vec<Balance>, AmmError> {
        self.0.get_amounts_out(ledger, amount_in, path)
    }

    fn swap_exact_tokens_for_tokens(&self, ledger: &mut Ledger, caller: &Address, args: &SwapExactIn) -> Result<Vec<Balance>, AmmError> {
        self.0.swap_exact_tokens_for_tokens(ledger, caller, args)
    }

    fn swap_exact_tokens_for_tokens_supporting_fee_on_transfer_tokens(
        &self,
        ledger: &mut Ledger,
        caller: &Address,
        args: &SwapExactIn,
    ) -> Result<Balance, AmmError> {
        self.0.swap_exact_tokens_for_tokens_supporting_fee_on_transfer_tokens(ledger, caller, args)
    }
}

#[test]
fn amm_failure_rolls_back_the_whole_launch() {
    let mut env = setup();
    let pad = Launchpad::new(&env.ledger, FailingRouter(ConstantProductRouter::new()), LaunchpadConfig::default());
    let before = env.ledger.world().clone();
    let seq = env.ledger.next_event_seq();

    let err = pad.create_coin(&mut env.ledger, &env.owner, &params(env.tom), ONE_NATIVE).unwrap_err();
    assert!(matches!(err, BlasterError::ExternalDependencyFailure(_)));
    assert_eq!(env.ledger.world(), &before);
    assert_eq!(env.ledger.next_event_seq(), seq);
    assert_eq!(env.ledger.native_balance(&env.owner), 10 * ONE_NATIVE);
    assert_eq!(env.ledger.pairs().len(), 0);
    assert!(!env.ledger.in_transaction());
}

#[test]
fn zero_second_deadline_is_open_at_launch() {
    let mut env = setup();
    let pad = Launchpad::new(
        &env.ledger,
        ConstantProductRouter::new(),
        LaunchpadConfig { liquidity_deadline_secs: 0 },
    );
    pad.create_coin(&mut env.ledger, &env.owner, &params(env.tom), ONE_NATIVE).unwrap();
}

#[test]
fn launched_custody_cannot_be_drained() {
    let mut env = setup();
    let receipt = env.pad.create_coin(&mut env.ledger, &env.owner, &params(env.tom), ONE_NATIVE).unwrap();
    let vault = env.pad.vault();
    let thief = Address::from_label("thief");

    for (asset, amount) in [(receipt.coin, 2_000_000), (receipt.pair, POOL_SHARES)] {
        let err = env.ledger.transfer(&asset, &vault, &thief, amount).unwrap_err();
        assert!(matches!(err, BlasterError::VaultCustody(v) if v == vault));
        let err = env.ledger.approve(&asset, &vault, &thief, amount).unwrap_err();
        assert!(matches!(err, BlasterError::VaultCustody(_)));
    }
    assert_eq!(env.ledger.balance_of(&receipt.coin, &thief), 0);
    assert_eq!(env.ledger.balance_of(&receipt.pair, &thief), 0);

    env.ledger.set_time(START + 1000).unwrap();
    assert_eq!(env.pad.claim_token(&mut env.ledger, receipt.allocation_lock_key).unwrap(), 2_000_000);
    assert_eq!(env.pad.claim_token(&mut env.ledger, receipt.lp_lock_key).unwrap(), POOL_SHARES);
}

fn buy(env: &mut Env, coin: Address, native_in: Balance) -> Result<Balance, AmmError> {
    let router = *env.pad.router();
    let wnative = router.wrapped_native();
    router.wrap_native(&mut env.ledger, &env.bob, native_in)?;
    env.ledger.approve(&wnative, &env.bob, &router.address(), native_in)?;
    let deadline = env.ledger.now() + 60;
    router.swap_exact_tokens_for_tokens_supporting_fee_on_transfer_tokens(
        &mut env.ledger,
        &env.bob,
        &SwapExactIn { amount_in: native_in, amount_out_min: 0, path: vec![wnative, coin], to: env.bob, deadline },
    )
}

#[test]
fn antisnipe_caps_buys_but_never_claims() {
    let mut env = setup();
    let mut p = params(env.tom);
    p.antisnipe_period = 600;
    p.limit_per_transaction = 50_000;
    p.max_tokens_per_wallet = 100_000;
    let receipt = env.pad.create_coin(&mut env.ledger, &env.owner, &p, ONE_NATIVE).unwrap();
    env.ledger.fund_native(&env.bob, ONE_NATIVE).unwrap();

    // Inside the window: the vault pays out far more than either cap.
    env.ledger.set_time(START + 250).unwrap();
    assert_eq!(env.pad.claim_token(&mut env.ledger, receipt.allocation_lock_key).unwrap(), 500_000);
    assert_eq!(env.ledger.balance_of(&receipt.coin, &env.owner), 500_000);

    // A small buy fits; a large one breaks the per-transaction cap and
    // reverts as a whole.
    assert_eq!(buy(&mut env, receipt.coin, ONE_NATIVE / 1000).unwrap(), 7_968);
    let native_before = env.ledger.native_balance(&env.bob);
    let err = buy(&mut env, receipt.coin, ONE_NATIVE / 100).unwrap_err();
    assert!(matches!(err, AmmError::Ledger(BlasterError::AntisnipeLimitExceeded(_))), "{err}");
    assert_eq!(env.ledger.balance_of(&receipt.coin, &env.bob), 7_968);
    // Wrapping ran before the swap and stays; the swap itself left nothing.
    assert_eq!(env.ledger.native_balance(&env.bob), native_before - ONE_NATIVE / 100);

    // After the window the same buy goes through.
    env.ledger.set_time(START + 601).unwrap();
    let received = buy(&mut env, receipt.coin, ONE_NATIVE / 100).unwrap();
    assert!(received > 50_000);
    assert_eq!(env.pad.claim_token(&mut env.ledger, receipt.allocation_lock_key).unwrap(), 702_000);
}
