use serde::{Deserialize, Serialize};

use blaster_core::types::{Address, Balance, LockKey, LockType, Timestamp};

/// One custody record. `remaining` only ever decreases; the record is removed
/// from the book when it reaches zero.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct LockRecord {
    pub key: LockKey,
    pub asset: Address,
    pub beneficiary: Address,
    pub total: Balance,
    pub remaining: Balance,
    /// Linear unlock duration in seconds. 0 = fully vested at creation.
    pub duration: u64,
    pub created_at: Timestamp,
    pub lock_type: LockType,
}

impl LockRecord {
    /// Amount paid out so far.
    pub fn claimed(&self) -> Balance {
        self.total - self.remaining
    }

    pub fn info(&self) -> LockInfo {
        LockInfo {
            asset: self.asset,
            beneficiary: self.beneficiary,
            total: self.total,
            remaining: self.remaining,
            duration: self.duration,
            created_at: self.created_at,
        }
    }
}

/// Public view of a lock: (asset, beneficiary, total, remaining, duration,
/// creation timestamp). All zero for unknown or fully claimed keys.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct LockInfo {
    pub asset: Address,
    pub beneficiary: Address,
    pub total: Balance,
    pub remaining: Balance,
    pub duration: u64,
    pub created_at: Timestamp,
}

impl LockInfo {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::empty()
    }
}
