use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use blaster_core::constants::FIRST_LOCK_KEY;
use blaster_core::error::BlasterError;
use blaster_core::types::{Address, Balance, LockKey, LockType, Timestamp};

use crate::record::{LockInfo, LockRecord};
use crate::schedule::claimable_amount;

/// What a claim settled. The caller moves `amount` of `asset` from custody to
/// `beneficiary`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimSettlement {
    pub key: LockKey,
    pub asset: Address,
    pub beneficiary: Address,
    /// Zero when nothing new has vested.
    pub amount: Balance,
    pub time_passed: u64,
    pub remaining: Balance,
    /// True when this claim emptied the record and it was removed.
    pub closed: bool,
}

/// Keyed store of lock records.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct LockBook {
    next_key: u64,
    locks: BTreeMap<LockKey, LockRecord>,
}

impl Default for LockBook {
    fn default() -> Self {
        Self {
            next_key: FIRST_LOCK_KEY,
            locks: BTreeMap::new(),
        }
    }
}

impl LockBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new lock and hand out a fresh key.
    pub fn register(
        &mut self,
        asset: Address,
        beneficiary: Address,
        amount: Balance,
        duration: u64,
        lock_type: LockType,
        now: Timestamp,
    ) -> Result<LockKey, BlasterError> {
        if beneficiary.is_zero() {
            return Err(BlasterError::InvalidLockParameters("zero-address beneficiary".into()));
        }
        if amount == 0 {
            return Err(BlasterError::InvalidLockParameters("zero amount".into()));
        }
        if asset.is_zero() {
            return Err(BlasterError::InvalidLockParameters("zero-address asset".into()));
        }
        let key = LockKey(self.next_key);
        self.next_key = self
            .next_key
            .checked_add(1)
            .ok_or(BlasterError::ArithmeticOverflow("lock key"))?;
        self.locks.insert(
            key,
            LockRecord {
                key,
                asset,
                beneficiary,
                total: amount,
                remaining: amount,
                duration,
                created_at: now,
                lock_type,
            },
        );
        debug!(%key, %asset, %beneficiary, amount, duration, "lock registered");
        Ok(key)
    }

    /// Pay out whatever has vested since the last claim.
    pub fn settle_claim(&mut self, key: LockKey, now: Timestamp) -> Result<ClaimSettlement, BlasterError> {
        let record = self.locks.get_mut(&key).ok_or(BlasterError::UnknownLock(key))?;
        let amount = claimable_amount(record, now)?;
        record.remaining -= amount;

        let settlement = ClaimSettlement {
            key,
            asset: record.asset,
            beneficiary: record.beneficiary,
            amount,
            time_passed: now.saturating_sub(record.created_at),
            remaining: record.remaining,
            closed: record.remaining == 0,
        };
        if settlement.closed {
            self.locks.remove(&key);
            debug!(%key, "lock fully claimed; record removed");
        }
        Ok(settlement)
    }

    pub fn get(&self, key: &LockKey) -> Option<&LockRecord> {
        self.locks.get(key)
    }

    /// Zero-valued info for unknown or fully claimed keys.
    pub fn lock_info(&self, key: &LockKey) -> LockInfo {
        self.locks.get(key).map(LockRecord::info).unwrap_or_default()
    }

    /// Sum of unclaimed amounts of `asset` across all live records.
    pub fn committed(&self, asset: &Address) -> Balance {
        self.locks
            .values()
            .filter(|r| r.asset == *asset)
            .map(|r| r.remaining)
            .sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LockRecord> {
        self.locks.values()
    }

    pub fn for_beneficiary(&self, beneficiary: &Address) -> impl Iterator<Item = &LockRecord> + '_ {
        let beneficiary = *beneficiary;
        self.locks.values().filter(move |r| r.beneficiary == beneficiary)
    }

    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }

    /// Key the next `register` will return.
    pub fn next_key(&self) -> LockKey {
        LockKey(self.next_key)
    }
}
