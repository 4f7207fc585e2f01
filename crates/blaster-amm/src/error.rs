use thiserror::Error;

use blaster_core::error::BlasterError;
use blaster_core::types::Address;

#[derive(Debug, Error)]
pub enum AmmError {
    // ── Router ───────────────────────────────────────────────────────────────
    #[error("transaction expired: deadline {deadline}, now {now}")]
    Expired { deadline: u64, now: u64 },

    #[error("insufficient {0} amount")]
    InsufficientAmount(&'static str),

    #[error("invalid swap path")]
    InvalidPath,

    // ── Factory ──────────────────────────────────────────────────────────────
    #[error("identical addresses")]
    IdenticalAddresses,

    #[error("zero address")]
    ZeroAddress,

    #[error("pair already exists: {0}")]
    PairExists(Address),

    #[error("unknown pair {0}")]
    UnknownPair(Address),

    #[error("no pair for {0} / {1}")]
    PairNotFound(Address, Address),

    // ── Pair ─────────────────────────────────────────────────────────────────
    #[error("insufficient liquidity minted")]
    InsufficientLiquidityMinted,

    #[error("insufficient input amount")]
    InsufficientInputAmount,

    #[error("insufficient output amount")]
    InsufficientOutputAmount,

    #[error("insufficient liquidity")]
    InsufficientLiquidity,

    #[error("invalid recipient {0}")]
    InvalidTo(Address),

    #[error("constant-product invariant violated")]
    K,

    #[error("reserve overflow")]
    Overflow,

    // ── Ledger ───────────────────────────────────────────────────────────────
    /// A token transfer, mint or native movement the AMM performed failed.
    #[error("ledger: {0}")]
    Ledger(#[from] BlasterError),
}
