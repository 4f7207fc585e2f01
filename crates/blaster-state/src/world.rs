use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use blaster_core::constants::LAUNCHPAD_ADDRESS_DOMAIN;
use blaster_core::types::{Address, Balance, LockKey, Timestamp};
use blaster_token::Coin;
use blaster_vault::LockBook;

// ── AMM pool storage ─────────────────────────────────────────────────────────

/// Reserve accounting of one constant-product pair. The pair's pool-share
/// token is the coin registered at `address`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PairRecord {
    pub address: Address,
    /// The lower of the two token addresses.
    pub token0: Address,
    pub token1: Address,
    pub reserve0: Balance,
    pub reserve1: Balance,
    pub block_timestamp_last: Timestamp,
}

/// Factory-side index of pairs.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct PairRegistry {
    all_pairs: Vec<Address>,
    /// token0 → token1 → pair.
    by_tokens: BTreeMap<Address, BTreeMap<Address, Address>>,
    pairs: BTreeMap<Address, PairRecord>,
}

impl PairRegistry {
    pub fn sort_tokens(a: Address, b: Address) -> (Address, Address) {
        if a < b {
            (a, b)
        } else {
            (b, a)
        }
    }

    /// Pair of two tokens, in either order.
    pub fn find(&self, a: &Address, b: &Address) -> Option<Address> {
        let (t0, t1) = Self::sort_tokens(*a, *b);
        self.by_tokens.get(&t0).and_then(|m| m.get(&t1)).copied()
    }

    /// Index a freshly created pair. Returns its position in `all_pairs`.
    pub fn insert(&mut self, record: PairRecord) -> u64 {
        self.by_tokens
            .entry(record.token0)
            .or_default()
            .insert(record.token1, record.address);
        self.all_pairs.push(record.address);
        self.pairs.insert(record.address, record);
        (self.all_pairs.len() - 1) as u64
    }

    pub fn get(&self, pair: &Address) -> Option<&PairRecord> {
        self.pairs.get(pair)
    }

    pub fn get_mut(&mut self, pair: &Address) -> Option<&mut PairRecord> {
        self.pairs.get_mut(pair)
    }

    pub fn at(&self, index: u64) -> Option<Address> {
        self.all_pairs.get(index as usize).copied()
    }

    pub fn len(&self) -> u64 {
        self.all_pairs.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.all_pairs.is_empty()
    }
}

// ── Launch registry ──────────────────────────────────────────────────────────

/// What one successful launch produced.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct LaunchRecord {
    pub coin_id: u64,
    pub coin: Address,
    pub pair: Address,
    pub deployer: Address,
    pub liquidity: Balance,
    pub lp_lock_key: LockKey,
    pub allocation_lock_key: LockKey,
    pub created_at: Timestamp,
}

// ── WorldState ───────────────────────────────────────────────────────────────

/// Everything the ledger knows apart from the audit log. Cloned wholesale
/// into the journal when an operation begins.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WorldState {
    pub now: Timestamp,
    pub native: BTreeMap<Address, Balance>,
    pub coins: BTreeMap<Address, Coin>,
    pub pairs: PairRegistry,
    /// Custody address of the vault; holds every locked balance.
    pub vault: Address,
    pub locks: LockBook,
    pub launches: BTreeMap<u64, LaunchRecord>,
    /// Per-deployer counter feeding coin address derivation.
    pub deploy_nonces: BTreeMap<Address, u64>,
}

impl WorldState {
    pub fn new(vault: Address, now: Timestamp) -> Self {
        Self {
            now,
            native: BTreeMap::new(),
            coins: BTreeMap::new(),
            pairs: PairRegistry::default(),
            vault,
            locks: LockBook::new(),
            launches: BTreeMap::new(),
            deploy_nonces: BTreeMap::new(),
        }
    }

    /// Default vault custody address.
    pub fn default_vault() -> Address {
        Address::derive(LAUNCHPAD_ADDRESS_DOMAIN, &[b"vault"])
    }
}

impl Default for WorldState {
    fn default() -> Self {
        Self::new(Self::default_vault(), 0)
    }
}
