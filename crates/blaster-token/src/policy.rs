use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use blaster_core::error::{AntisnipeViolation, BlasterError};
use blaster_core::math::bps_of;
use blaster_core::params::CoinConfig;
use blaster_core::types::{Address, Balance, BasisPoints, Timestamp, TransferKind};

/// Burn and tax taken from one transfer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct FeeBreakdown {
    pub burn: Balance,
    pub tax: Balance,
    /// Amount credited to the recipient: amount − burn − tax.
    pub net: Balance,
}

/// Per-asset transfer policy. Rates and caps are fixed at construction; only
/// the pool set and the construction-mode flag change afterwards, and only
/// through the owner.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TaxPolicy {
    pub buy_tax_bps: BasisPoints,
    pub sell_tax_bps: BasisPoints,
    pub burn_bps: BasisPoints,
    pub fee_receiver: Address,
    /// Caps apply while `now < antisnipe_end`.
    pub antisnipe_end: Timestamp,
    pub limit_per_wallet: Balance,
    pub limit_per_tx: Balance,
    /// Pool-like counterparties (AMM pairs, routers).
    pub supported_pairs: BTreeSet<Address>,
    /// Addresses never subject to anti-snipe caps.
    pub exempt: BTreeSet<Address>,
    /// While set, transfers skip burn, tax and caps.
    pub construction_mode: bool,
}

impl TaxPolicy {
    /// Policy of an untaxed asset (pool shares, wrapped native).
    pub fn none() -> Self {
        Self {
            buy_tax_bps: 0,
            sell_tax_bps: 0,
            burn_bps: 0,
            fee_receiver: Address::ZERO,
            antisnipe_end: 0,
            limit_per_wallet: 0,
            limit_per_tx: 0,
            supported_pairs: BTreeSet::new(),
            exempt: BTreeSet::new(),
            construction_mode: false,
        }
    }

    pub fn from_config(config: &CoinConfig, now: Timestamp) -> Self {
        let mut exempt = BTreeSet::new();
        exempt.insert(config.owner);
        Self {
            buy_tax_bps: config.buy_tax_bps,
            sell_tax_bps: config.sell_tax_bps,
            burn_bps: config.burn_bps,
            fee_receiver: config.fee_receiver,
            antisnipe_end: now.saturating_add(config.antisnipe_period),
            limit_per_wallet: config.limit_per_wallet,
            limit_per_tx: config.limit_per_tx,
            supported_pairs: BTreeSet::new(),
            exempt,
            construction_mode: false,
        }
    }

    pub fn is_pool(&self, addr: &Address) -> bool {
        self.supported_pairs.contains(addr)
    }

    pub fn classify(&self, from: &Address, to: &Address) -> TransferKind {
        if self.construction_mode {
            return TransferKind::Exempt;
        }
        match (self.is_pool(from), self.is_pool(to)) {
            (true, false) => TransferKind::Buy,
            (false, true) => TransferKind::Sell,
            _ => TransferKind::Plain,
        }
    }

    /// Burn on every non-exempt transfer; tax only on buys and sells.
    pub fn fees(&self, amount: Balance, kind: TransferKind) -> Result<FeeBreakdown, BlasterError> {
        let (burn, tax) = match kind {
            TransferKind::Exempt => (0, 0),
            TransferKind::Plain => (bps_of(amount, self.burn_bps)?, 0),
            TransferKind::Buy => (bps_of(amount, self.burn_bps)?, bps_of(amount, self.buy_tax_bps)?),
            TransferKind::Sell => (bps_of(amount, self.burn_bps)?, bps_of(amount, self.sell_tax_bps)?),
        };
        let net = amount
            .checked_sub(burn)
            .and_then(|n| n.checked_sub(tax))
            .ok_or(BlasterError::ArithmeticOverflow("fee deduction"))?;
        Ok(FeeBreakdown { burn, tax, net })
    }

    pub fn antisnipe_active(&self, now: Timestamp) -> bool {
        now < self.antisnipe_end
    }

    /// Enforce the early-window caps on buys and plain transfers.
    ///
    /// `resulting_balance` is the recipient's balance after the transfer.
    pub fn check_antisnipe(
        &self,
        kind: TransferKind,
        from: &Address,
        to: &Address,
        amount: Balance,
        resulting_balance: Balance,
        now: Timestamp,
    ) -> Result<(), BlasterError> {
        if !self.antisnipe_active(now) {
            return Ok(());
        }
        if !matches!(kind, TransferKind::Buy | TransferKind::Plain) {
            return Ok(());
        }
        if self.exempt.contains(from) || self.exempt.contains(to) {
            return Ok(());
        }
        if self.limit_per_tx > 0 && amount > self.limit_per_tx {
            return Err(BlasterError::AntisnipeLimitExceeded(AntisnipeViolation::PerTransaction {
                limit: self.limit_per_tx,
                amount,
            }));
        }
        if self.limit_per_wallet > 0 && resulting_balance > self.limit_per_wallet {
            return Err(BlasterError::AntisnipeLimitExceeded(AntisnipeViolation::PerWallet {
                limit: self.limit_per_wallet,
                resulting_balance,
            }));
        }
        Ok(())
    }
}
