use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use blaster_amm::{AddLiquidityNative, AmmRouter};
use blaster_core::constants::LAUNCHPAD_ADDRESS_DOMAIN;
use blaster_core::error::BlasterError;
use blaster_core::event::Event;
use blaster_core::params::LaunchParams;
use blaster_core::types::{Address, Balance, LockKey, LockType};
use blaster_state::{LaunchRecord, Ledger};
use blaster_vault::LockInfo;

use crate::config::LaunchpadConfig;

/// What a successful launch produced.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LaunchReceipt {
    pub coin: Address,
    pub pair: Address,
    /// Pool shares received and locked.
    pub liquidity: Balance,
    pub lp_lock_key: LockKey,
    pub allocation_lock_key: LockKey,
    pub founder_allocation: Balance,
}

/// Address the launchpad operates from.
pub fn launchpad_address() -> Address {
    Address::derive(LAUNCHPAD_ADDRESS_DOMAIN, &[b"launchpad"])
}

/// The launch orchestrator. It owns every coin it deploys and holds the
/// supply only while a launch is in flight; pool shares and the founder
/// allocation end up in vault custody.
pub struct Launchpad<R: AmmRouter> {
    address: Address,
    vault: Address,
    router: R,
    config: LaunchpadConfig,
}

impl<R: AmmRouter> Launchpad<R> {
    pub fn new(ledger: &Ledger, router: R, config: LaunchpadConfig) -> Self {
        Self { address: launchpad_address(), vault: ledger.vault_address(), router, config }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Custody address holding every launch lock.
    pub fn vault(&self) -> Address {
        self.vault
    }

    pub fn router(&self) -> &R {
        &self.router
    }

    pub fn config(&self) -> &LaunchpadConfig {
        &self.config
    }

    /// Deploy a coin, seed its pool with `lp_amount` and the attached
    /// `native_value`, and lock both the pool shares and the founder
    /// allocation for `caller`.
    ///
    /// All-or-nothing: on any failure, including inside the AMM, the ledger
    /// is exactly as before the call and the caller keeps its native funds.
    pub fn create_coin(
        &self,
        ledger: &mut Ledger,
        caller: &Address,
        params: &LaunchParams,
        native_value: Balance,
    ) -> Result<LaunchReceipt, BlasterError> {
        params.validate(native_value)?;
        if caller.is_zero() {
            return Err(BlasterError::ZeroAddress("deployer"));
        }
        if ledger.launch(params.coin_id).is_some() {
            return Err(BlasterError::DuplicateLaunchId(params.coin_id));
        }
        let founder_allocation = params.founder_allocation()?;

        let result = ledger.atomic(|l| self.launch_steps(l, caller, params, native_value, founder_allocation));
        if let Err(e) = &result {
            warn!(coin_id = params.coin_id, deployer = %caller, error = %e, "launch reverted");
        }
        result
    }

    fn launch_steps(
        &self,
        l: &mut Ledger,
        caller: &Address,
        params: &LaunchParams,
        native_value: Balance,
        founder_allocation: Balance,
    ) -> Result<LaunchReceipt, BlasterError> {
        let me = self.address;
        let router = self.router.address();

        // ── Take custody of the liquidity value and deploy ────────────────────
        l.transfer_native(caller, &me, native_value)?;
        let coin = l.deploy_coin(&me, &params.coin_config(me), me)?;

        // ── Seed the pool in construction mode ───────────────────────────────
        l.disable_burn_and_taxes(&coin, &me)?;
        if params.external_distribution > 0 {
            let receiver = params
                .distribution_receiver
                .ok_or(BlasterError::ZeroAddress("distribution receiver"))?;
            l.transfer(&coin, &me, &receiver, params.external_distribution)?;
        }
        l.approve(&coin, &me, &router, params.lp_amount)?;
        let deadline = l.now().saturating_add(self.config.liquidity_deadline_secs);
        let seeded = self
            .router
            .add_liquidity_native(
                l,
                &me,
                &AddLiquidityNative {
                    token: coin,
                    amount_token_desired: params.lp_amount,
                    amount_token_min: params.lp_amount,
                    amount_native_min: native_value,
                    to: me,
                    deadline,
                },
                native_value,
            )
            .map_err(|e| BlasterError::ExternalDependencyFailure(e.to_string()))?;

        // ── Lock pool shares and founder allocation, still untaxed ───────────
        let settled = l.balance_of(&seeded.pair, &me);
        if seeded.liquidity == 0 || settled < seeded.liquidity {
            return Err(BlasterError::ExternalDependencyFailure(format!(
                "pool shares not settled: reported {}, held {}",
                seeded.liquidity, settled
            )));
        }
        let lp_lock_key =
            l.lock_tokens(&me, &seeded.pair, caller, seeded.liquidity, params.lock_period, LockType::Liquidity)?;
        let allocation_lock_key =
            l.lock_tokens(&me, &coin, caller, founder_allocation, params.vesting_period, LockType::Allocation)?;

        l.enable_burn_and_taxes(&coin, &me)?;
        l.add_supported_pair(&coin, &me, seeded.pair, true)?;
        l.add_supported_pair(&coin, &me, router, true)?;

        l.emit(Event::CoinCreated {
            coin,
            coin_id: params.coin_id,
            deployer: *caller,
            lp_lock_size_native: seeded.amount_b,
            lp_lock_size_tokens: seeded.amount_a,
            lock_period: params.lock_period,
            vesting_period: params.vesting_period,
        });
        l.record_launch(LaunchRecord {
            coin_id: params.coin_id,
            coin,
            pair: seeded.pair,
            deployer: *caller,
            liquidity: seeded.liquidity,
            lp_lock_key,
            allocation_lock_key,
            created_at: l.now(),
        })?;

        info!(
            coin_id = params.coin_id,
            %coin,
            pair = %seeded.pair,
            deployer = %caller,
            liquidity = seeded.liquidity,
            founder_allocation,
            %lp_lock_key,
            %allocation_lock_key,
            "coin launched"
        );
        Ok(LaunchReceipt {
            coin,
            pair: seeded.pair,
            liquidity: seeded.liquidity,
            lp_lock_key,
            allocation_lock_key,
            founder_allocation,
        })
    }

    /// Claim whatever has vested on `key`. Anyone may call; the payout
    /// always goes to the lock's beneficiary.
    pub fn claim_token(&self, ledger: &mut Ledger, key: LockKey) -> Result<Balance, BlasterError> {
        ledger.claim(key)
    }

    /// (asset, beneficiary, total, remaining, duration, created_at); all zero
    /// for unknown or fully claimed keys.
    pub fn get_lock_info(&self, ledger: &Ledger, key: LockKey) -> LockInfo {
        ledger.lock_info(&key)
    }
}
