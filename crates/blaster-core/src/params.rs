use serde::{Deserialize, Serialize};

use crate::constants::{MAX_BASIS_POINTS, MAX_LOCK_DURATION_SECS};
use crate::error::BlasterError;
use crate::types::{Address, Balance, BasisPoints};

// ── CoinConfig ───────────────────────────────────────────────────────────────

/// Construction parameters of a taxed asset. Fixed for the asset's lifetime.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CoinConfig {
    pub name: String,
    pub symbol: String,
    /// Minted in full to the initial holder at construction.
    pub supply: Balance,
    pub buy_tax_bps: BasisPoints,
    pub sell_tax_bps: BasisPoints,
    pub burn_bps: BasisPoints,
    /// Per-wallet cap during the anti-snipe window. 0 = unset.
    pub limit_per_wallet: Balance,
    /// Per-transaction cap during the anti-snipe window. 0 = unset.
    pub limit_per_tx: Balance,
    /// Seconds after construction during which the caps apply.
    pub antisnipe_period: u64,
    pub fee_receiver: Address,
    /// Holder of the administrative capability (pair registration and
    /// construction-mode toggles).
    pub owner: Address,
}

impl CoinConfig {
    pub fn validate(&self) -> Result<(), BlasterError> {
        if self.supply == 0 {
            return Err(BlasterError::ZeroAmount);
        }
        if self.owner.is_zero() {
            return Err(BlasterError::ZeroAddress("owner"));
        }
        if (self.buy_tax_bps > 0 || self.sell_tax_bps > 0) && self.fee_receiver.is_zero() {
            return Err(BlasterError::ZeroAddress("fee receiver"));
        }
        check_side("buy", self.buy_tax_bps, self.burn_bps)?;
        check_side("sell", self.sell_tax_bps, self.burn_bps)?;
        Ok(())
    }
}

fn check_side(side: &'static str, tax: BasisPoints, burn: BasisPoints) -> Result<(), BlasterError> {
    let total = tax as u32 + burn as u32;
    if total > MAX_BASIS_POINTS as u32 {
        return Err(BlasterError::InvalidRates { side, total });
    }
    Ok(())
}

// ── LaunchParams ─────────────────────────────────────────────────────────────

/// Input to `Launchpad::create_coin`. Validated once, never persisted beyond
/// the events it produces.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct LaunchParams {
    pub name: String,
    pub symbol: String,
    /// Caller-chosen launch identifier; unique across launches.
    pub coin_id: u64,
    pub supply: Balance,
    #[serde(default)]
    pub buy_tax_bps: BasisPoints,
    #[serde(default)]
    pub sell_tax_bps: BasisPoints,
    #[serde(default)]
    pub burn_bps: BasisPoints,
    pub fee_receiver: Address,
    /// Asset units seeded into the pool.
    pub lp_amount: Balance,
    /// Native currency seeded into the pool; must match the attached value.
    pub lp_amount_native: Balance,
    /// Linear unlock duration of the pool-share lock (seconds).
    pub lock_period: u64,
    /// Linear unlock duration of the founder allocation lock (seconds).
    pub vesting_period: u64,
    #[serde(default)]
    pub max_tokens_per_wallet: Balance,
    #[serde(default)]
    pub limit_per_transaction: Balance,
    #[serde(default)]
    pub antisnipe_period: u64,
    /// Units set aside for an announced external distribution (e.g. an
    /// airdrop). Subtracted from the founder allocation.
    #[serde(default)]
    pub external_distribution: Balance,
    /// Receives `external_distribution`. Required when it is non-zero.
    #[serde(default)]
    pub distribution_receiver: Option<Address>,
}

impl LaunchParams {
    /// Reject malformed launches before any state change.
    pub fn validate(&self, attached_native: Balance) -> Result<(), BlasterError> {
        if self.vesting_period == 0 {
            return Err(BlasterError::ZeroVestingPeriod);
        }
        if self.lock_period > MAX_LOCK_DURATION_SECS || self.vesting_period > MAX_LOCK_DURATION_SECS {
            return Err(BlasterError::LockPeriodTooLong { max_secs: MAX_LOCK_DURATION_SECS });
        }
        if self.name.trim().is_empty() || self.symbol.trim().is_empty() {
            return Err(BlasterError::InvalidLaunchParameters(
                "name and symbol must not be empty".into(),
            ));
        }
        if self.lp_amount == 0 || self.lp_amount_native == 0 {
            return Err(BlasterError::ZeroAmount);
        }
        if attached_native != self.lp_amount_native {
            return Err(BlasterError::LiquidityValueMismatch {
                declared: self.lp_amount_native,
                attached: attached_native,
            });
        }
        if self.external_distribution > 0 {
            match self.distribution_receiver {
                Some(r) if !r.is_zero() => {}
                _ => return Err(BlasterError::ZeroAddress("distribution receiver")),
            }
        }
        if self.founder_allocation()? == 0 {
            return Err(BlasterError::InvalidLaunchParameters(
                "no founder allocation left to vest".into(),
            ));
        }
        Ok(())
    }

    /// supply − lp_amount − external_distribution.
    pub fn founder_allocation(&self) -> Result<Balance, BlasterError> {
        self.supply
            .checked_sub(self.lp_amount)
            .and_then(|rest| rest.checked_sub(self.external_distribution))
            .ok_or_else(|| {
                BlasterError::InvalidLaunchParameters(format!(
                    "lp amount {} plus distribution {} exceeds supply {}",
                    self.lp_amount, self.external_distribution, self.supply
                ))
            })
    }

    /// Asset configuration for a coin owned (and initially held) by `owner`.
    pub fn coin_config(&self, owner: Address) -> CoinConfig {
        CoinConfig {
            name: self.name.clone(),
            symbol: self.symbol.clone(),
            supply: self.supply,
            buy_tax_bps: self.buy_tax_bps,
            sell_tax_bps: self.sell_tax_bps,
            burn_bps: self.burn_bps,
            limit_per_wallet: self.max_tokens_per_wallet,
            limit_per_tx: self.limit_per_transaction,
            antisnipe_period: self.antisnipe_period,
            fee_receiver: self.fee_receiver,
            owner,
        }
    }
}
