use serde::{Deserialize, Serialize};

use blaster_core::event::LogEntry;
use blaster_core::types::LockType;
use blaster_state::LaunchRecord;
use blaster_token::Coin;
use blaster_vault::{LockRecord, VestingSnapshot};

/// Lock record plus its vesting position, returned by `blaster_getLockInfo`
/// and `blaster_getLocksForBeneficiary`. Amounts are u128 as strings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RpcLock {
    pub lock_key: u64,
    pub asset: String,
    pub beneficiary: String,
    pub total: String,
    pub remaining: String,
    pub claimed: String,
    pub vested: String,
    /// What a claim would pay out right now.
    pub claimable: String,
    pub duration: u64,
    pub created_at: u64,
    pub fully_vested_at: u64,
    /// "liquidity" or "allocation".
    pub lock_type: String,
    pub description: String,
}

impl RpcLock {
    pub fn from_record(record: &LockRecord, snap: &VestingSnapshot, description: String) -> Self {
        Self {
            lock_key: record.key.0,
            asset: record.asset.to_hex(),
            beneficiary: record.beneficiary.to_hex(),
            total: record.total.to_string(),
            remaining: record.remaining.to_string(),
            claimed: snap.claimed.to_string(),
            vested: snap.vested.to_string(),
            claimable: snap.claimable.to_string(),
            duration: record.duration,
            created_at: record.created_at,
            fully_vested_at: snap.fully_vested_at,
            lock_type: match record.lock_type {
                LockType::Liquidity => "liquidity".into(),
                LockType::Allocation => "allocation".into(),
            },
            description,
        }
    }
}

/// Asset metadata and transfer policy returned by `blaster_getCoin`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RpcCoin {
    pub address: String,
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub total_supply: String,
    pub owner: String,
    /// Set for mintable assets (pool shares, wrapped native).
    pub minter: Option<String>,
    pub buy_tax_bps: u16,
    pub sell_tax_bps: u16,
    pub burn_bps: u16,
    pub fee_receiver: String,
    pub antisnipe_end: u64,
    pub limit_per_wallet: String,
    pub limit_per_tx: String,
    pub construction_mode: bool,
    pub supported_pairs: Vec<String>,
}

impl From<&Coin> for RpcCoin {
    fn from(c: &Coin) -> Self {
        Self {
            address: c.address.to_hex(),
            name: c.name.clone(),
            symbol: c.symbol.clone(),
            decimals: c.decimals,
            total_supply: c.total_supply.to_string(),
            owner: c.owner.to_hex(),
            minter: c.minter.map(|m| m.to_hex()),
            buy_tax_bps: c.policy.buy_tax_bps,
            sell_tax_bps: c.policy.sell_tax_bps,
            burn_bps: c.policy.burn_bps,
            fee_receiver: c.policy.fee_receiver.to_hex(),
            antisnipe_end: c.policy.antisnipe_end,
            limit_per_wallet: c.policy.limit_per_wallet.to_string(),
            limit_per_tx: c.policy.limit_per_tx.to_string(),
            construction_mode: c.policy.construction_mode,
            supported_pairs: c.policy.supported_pairs.iter().map(|p| p.to_hex()).collect(),
        }
    }
}

/// A completed launch, returned by `blaster_getLaunch`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RpcLaunch {
    pub coin_id: u64,
    pub coin: String,
    pub pair: String,
    pub deployer: String,
    pub liquidity: String,
    pub lp_lock_key: u64,
    pub allocation_lock_key: u64,
    pub created_at: u64,
}

impl From<&LaunchRecord> for RpcLaunch {
    fn from(r: &LaunchRecord) -> Self {
        Self {
            coin_id: r.coin_id,
            coin: r.coin.to_hex(),
            pair: r.pair.to_hex(),
            deployer: r.deployer.to_hex(),
            liquidity: r.liquidity.to_string(),
            lp_lock_key: r.lp_lock_key.0,
            allocation_lock_key: r.allocation_lock_key.0,
            created_at: r.created_at,
        }
    }
}

/// One audit log entry. `data` is the JSON encoding of the event body, kept
/// as text so 128-bit amounts survive untruncated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RpcEvent {
    pub seq: u64,
    pub timestamp: u64,
    pub name: String,
    pub data: String,
}

impl RpcEvent {
    pub fn from_entry(entry: &LogEntry) -> Result<Self, serde_json::Error> {
        Ok(Self {
            seq: entry.seq,
            timestamp: entry.timestamp,
            name: entry.event.name().to_string(),
            data: serde_json::to_string(&entry.event)?,
        })
    }
}

/// Ledger summary returned by `blaster_getStatus`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RpcStatus {
    pub now: u64,
    pub coins: u64,
    pub pairs: u64,
    pub open_locks: u64,
    pub launches: u64,
    pub next_event_seq: u64,
}
