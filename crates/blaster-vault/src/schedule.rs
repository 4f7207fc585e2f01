//! Linear unlock schedule.
//!
//! Formula:  vested(t) = floor(total × min(t − created_at, duration) / duration)
//!
//! claimable(t) = vested(t) − claimed so far. Because elapsed time is capped
//! at `duration`, vested(t) = total for every t ≥ created_at + duration, so
//! the last claim absorbs all rounding remainder and the claims of a lock
//! always sum to exactly `total`.

use blaster_core::error::BlasterError;
use blaster_core::math::mul_div_floor;
use blaster_core::types::{Balance, Timestamp};

use crate::record::LockRecord;

/// Vested-to-date amount of a lock of `total` over `duration` seconds after
/// `elapsed` seconds.
pub fn vested_amount(total: Balance, duration: u64, elapsed: u64) -> Result<Balance, BlasterError> {
    if duration == 0 {
        return Ok(total);
    }
    let capped = elapsed.min(duration);
    mul_div_floor(total, capped as u128, duration as u128, "vesting")
}

/// Amount a claim at `now` would pay out.
pub fn claimable_amount(record: &LockRecord, now: Timestamp) -> Result<Balance, BlasterError> {
    let elapsed = now.saturating_sub(record.created_at);
    let vested = vested_amount(record.total, record.duration, elapsed)?;
    Ok(vested.saturating_sub(record.claimed()))
}

/// Point-in-time view of a lock's schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VestingSnapshot {
    pub vested: Balance,
    pub claimed: Balance,
    pub claimable: Balance,
    /// Seconds since creation.
    pub elapsed: u64,
    /// Timestamp at which the whole lock is vested.
    pub fully_vested_at: Timestamp,
}

pub fn vesting_snapshot(record: &LockRecord, now: Timestamp) -> Result<VestingSnapshot, BlasterError> {
    let elapsed = now.saturating_sub(record.created_at);
    let vested = vested_amount(record.total, record.duration, elapsed)?;
    let claimed = record.claimed();
    Ok(VestingSnapshot {
        vested,
        claimed,
        claimable: vested.saturating_sub(claimed),
        elapsed,
        fully_vested_at: record.created_at.saturating_add(record.duration),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nothing_vests_at_creation() {
        assert_eq!(vested_amount(1_000, 1_000, 0).unwrap(), 0);
    }

    #[test]
    fn vesting_is_linear_and_floored() {
        let p = 2_828_427_123_747u128; // odd total
        assert_eq!(vested_amount(p, 1000, 500).unwrap(), p / 2);
        assert_eq!(vested_amount(p, 1000, 750).unwrap(), p * 3 / 4);
        assert_eq!(vested_amount(p, 1000, 1).unwrap(), p / 1000);
    }

    #[test]
    fn elapsed_is_capped_at_duration() {
        assert_eq!(vested_amount(999, 1000, 1000).unwrap(), 999);
        assert_eq!(vested_amount(999, 1000, 10_000_000).unwrap(), 999);
    }

    #[test]
    fn zero_duration_vests_immediately() {
        assert_eq!(vested_amount(42, 0, 0).unwrap(), 42);
    }

    #[test]
    fn huge_totals_do_not_overflow() {
        let total = u128::MAX - 7;
        assert_eq!(vested_amount(total, 4, 4).unwrap(), total);
        assert_eq!(vested_amount(total, 4, 2).unwrap(), total / 2);
    }
}
