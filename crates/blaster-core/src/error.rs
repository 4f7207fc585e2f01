use std::fmt;

use thiserror::Error;

use crate::types::{Address, LockKey};

/// Which anti-snipe cap a transfer ran into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AntisnipeViolation {
    /// The transfer amount exceeds the per-transaction cap.
    PerTransaction { limit: u128, amount: u128 },
    /// The recipient's resulting balance would exceed the per-wallet cap.
    PerWallet { limit: u128, resulting_balance: u128 },
}

impl fmt::Display for AntisnipeViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AntisnipeViolation::PerTransaction { limit, amount } => {
                write!(f, "transfer of {amount} exceeds per-transaction cap {limit}")
            }
            AntisnipeViolation::PerWallet { limit, resulting_balance } => {
                write!(f, "wallet balance {resulting_balance} would exceed per-wallet cap {limit}")
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum BlasterError {
    // ── Validation ───────────────────────────────────────────────────────────
    #[error("vesting period is 0")]
    ZeroVestingPeriod,

    #[error("lock period too long: maximum {max_secs} seconds")]
    LockPeriodTooLong { max_secs: u64 },

    #[error("amount must be greater than zero")]
    ZeroAmount,

    #[error("zero address not allowed: {0}")]
    ZeroAddress(&'static str),

    #[error("invalid lock parameters: {0}")]
    InvalidLockParameters(String),

    #[error("invalid {side} rates: tax + burn = {total} basis points exceeds 10000")]
    InvalidRates { side: &'static str, total: u32 },

    #[error("invalid launch parameters: {0}")]
    InvalidLaunchParameters(String),

    #[error("attached native value {attached} does not match declared liquidity {declared}")]
    LiquidityValueMismatch { declared: u128, attached: u128 },

    #[error("launch id {0} already used")]
    DuplicateLaunchId(u64),

    #[error("invalid address {0}")]
    InvalidAddress(String),

    // ── Funds ────────────────────────────────────────────────────────────────
    #[error("insufficient balance: need {need}, have {have}")]
    InsufficientBalance { need: u128, have: u128 },

    #[error("insufficient allowance: need {need}, have {have}")]
    InsufficientAllowance { need: u128, have: u128 },

    // ── Anti-snipe ───────────────────────────────────────────────────────────
    #[error("anti-snipe limit exceeded: {0}")]
    AntisnipeLimitExceeded(AntisnipeViolation),

    // ── Lookups ──────────────────────────────────────────────────────────────
    #[error("unknown lock: {0}")]
    UnknownLock(LockKey),

    #[error("unknown asset: {0}")]
    UnknownAsset(Address),

    #[error("asset already deployed at {0}")]
    AssetAlreadyExists(Address),

    // ── Access control ───────────────────────────────────────────────────────
    #[error("caller {0} is not the owner")]
    NotOwner(Address),

    #[error("caller {0} is not the minter")]
    NotMinter(Address),

    #[error("vault custody {0} only pays out through claims")]
    VaultCustody(Address),

    // ── External collaborators ───────────────────────────────────────────────
    #[error("external dependency failure: {0}")]
    ExternalDependencyFailure(String),

    // ── Arithmetic ───────────────────────────────────────────────────────────
    #[error("arithmetic overflow in {0}")]
    ArithmeticOverflow(&'static str),

    // ── Ledger ───────────────────────────────────────────────────────────────
    #[error("no active ledger transaction")]
    NoActiveTransaction,

    #[error("ledger clock cannot move backwards: now {now}, requested {requested}")]
    ClockRegression { now: u64, requested: u64 },

    // ── Serialization / storage ──────────────────────────────────────────────
    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("{0}")]
    Other(String),
}

impl BlasterError {
    /// True for the failures a caller can fix by resubmitting with different
    /// inputs, as opposed to ledger or storage faults.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            BlasterError::ZeroVestingPeriod
                | BlasterError::LockPeriodTooLong { .. }
                | BlasterError::ZeroAmount
                | BlasterError::ZeroAddress(_)
                | BlasterError::InvalidLockParameters(_)
                | BlasterError::InvalidRates { .. }
                | BlasterError::InvalidLaunchParameters(_)
                | BlasterError::LiquidityValueMismatch { .. }
                | BlasterError::DuplicateLaunchId(_)
                | BlasterError::InvalidAddress(_)
        )
    }
}
