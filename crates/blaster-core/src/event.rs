use serde::{Deserialize, Serialize};

use crate::types::{Address, Balance, LockKey, Timestamp, TransferKind};

/// Audit events appended to the ledger's event log. Indexers consume these in
/// sequence order; an event never appears for a reverted operation.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub enum Event {
    // ── Launchpad ────────────────────────────────────────────────────────────
    CoinCreated {
        coin: Address,
        coin_id: u64,
        deployer: Address,
        /// Native currency deposited into the pool.
        lp_lock_size_native: Balance,
        /// Launched-asset units deposited into the pool.
        lp_lock_size_tokens: Balance,
        lock_period: u64,
        vesting_period: u64,
    },

    // ── Vault ────────────────────────────────────────────────────────────────
    TokensLocked {
        token: Address,
        lock_key: LockKey,
        beneficiary: Address,
        amount: Balance,
        /// 1 = liquidity, 0 = allocation.
        lock_type: u8,
    },
    TokenClaimed {
        token: Address,
        claimer: Address,
        amount: Balance,
        /// Seconds elapsed since the lock was created.
        time_passed: u64,
    },

    // ── Asset ────────────────────────────────────────────────────────────────
    /// Balance movement. A burn is a transfer to the zero address; a mint is
    /// a transfer from it.
    Transfer {
        token: Address,
        from: Address,
        to: Address,
        amount: Balance,
    },
    Approval {
        token: Address,
        owner: Address,
        spender: Address,
        amount: Balance,
    },
    TaxCollected {
        token: Address,
        payer: Address,
        receiver: Address,
        amount: Balance,
        kind: TransferKind,
    },
    SupportedPairUpdated {
        token: Address,
        pair: Address,
        supported: bool,
    },
    ConstructionModeChanged {
        token: Address,
        enabled: bool,
    },

    // ── AMM ──────────────────────────────────────────────────────────────────
    PairCreated {
        token0: Address,
        token1: Address,
        pair: Address,
        index: u64,
    },
    Sync {
        pair: Address,
        reserve0: Balance,
        reserve1: Balance,
    },
}

impl Event {
    /// Short name for log lines and RPC filters.
    pub fn name(&self) -> &'static str {
        match self {
            Event::CoinCreated { .. } => "CoinCreated",
            Event::TokensLocked { .. } => "TokensLocked",
            Event::TokenClaimed { .. } => "TokenClaimed",
            Event::Transfer { .. } => "Transfer",
            Event::Approval { .. } => "Approval",
            Event::TaxCollected { .. } => "TaxCollected",
            Event::SupportedPairUpdated { .. } => "SupportedPairUpdated",
            Event::ConstructionModeChanged { .. } => "ConstructionModeChanged",
            Event::PairCreated { .. } => "PairCreated",
            Event::Sync { .. } => "Sync",
        }
    }
}

/// One entry in the append-only event log.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct LogEntry {
    /// Position in the log, starting at 0, gap-free.
    pub seq: u64,
    /// Ledger time at which the emitting operation executed.
    pub timestamp: Timestamp,
    pub event: Event,
}
