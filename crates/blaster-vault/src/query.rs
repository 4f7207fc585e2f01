use blaster_core::error::BlasterError;
use blaster_core::types::{Address, LockKey, LockType, Timestamp};

use crate::book::LockBook;
use crate::record::LockRecord;
use crate::schedule::{vesting_snapshot, VestingSnapshot};

/// Query helpers for lock records.
pub struct LockQuery<'a> {
    book: &'a LockBook,
}

impl<'a> LockQuery<'a> {
    pub fn new(book: &'a LockBook) -> Self {
        Self { book }
    }

    /// Fetch a single record by its key.
    pub fn get(&self, key: &LockKey) -> Option<&'a LockRecord> {
        self.book.get(key)
    }

    pub fn snapshot(&self, key: &LockKey, now: Timestamp) -> Result<VestingSnapshot, BlasterError> {
        let record = self.book.get(key).ok_or(BlasterError::UnknownLock(*key))?;
        vesting_snapshot(record, now)
    }

    /// Live records of `beneficiary`, newest first.
    pub fn for_beneficiary(&self, beneficiary: &Address) -> Vec<&'a LockRecord> {
        let mut records: Vec<&LockRecord> = self.book.for_beneficiary(beneficiary).collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.key.cmp(&a.key)));
        records
    }

    /// Human-readable summary of a lock's state.
    pub fn describe(&self, key: &LockKey, now: Timestamp) -> Result<String, BlasterError> {
        let record = self.book.get(key).ok_or(BlasterError::UnknownLock(*key))?;
        let snap = vesting_snapshot(record, now)?;

        let kind = match record.lock_type {
            LockType::Liquidity => "liquidity",
            LockType::Allocation => "allocation",
        };
        let status = if now >= snap.fully_vested_at {
            "fully vested, ready to claim".to_string()
        } else {
            let secs = snap.fully_vested_at - now;
            format!("{} claimable now, fully vested in {}s", snap.claimable, secs)
        };

        Ok(format!(
            "Lock {} | {} | {} of {} remaining | asset: {} | beneficiary: {} | {}",
            key, kind, record.remaining, record.total, record.asset, record.beneficiary, status
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_reports_progress() {
        let mut book = LockBook::new();
        let bob = Address::from_label("bob");
        let key = book
            .register(Address::from_label("asset"), bob, 1_000, 100, LockType::Liquidity, 0)
            .unwrap();
        let q = LockQuery::new(&book);
        let text = q.describe(&key, 25).unwrap();
        assert!(text.starts_with("Lock LK:1 | liquidity | 1000 of 1000 remaining"));
        assert!(text.contains("250 claimable now, fully vested in 75s"));
        assert!(q.describe(&key, 100).unwrap().ends_with("fully vested, ready to claim"));
        assert!(matches!(q.describe(&LockKey(9), 0), Err(BlasterError::UnknownLock(_))));
    }

    #[test]
    fn beneficiary_listing_is_newest_first() {
        let mut book = LockBook::new();
        let bob = Address::from_label("bob");
        let asset = Address::from_label("asset");
        let old = book.register(asset, bob, 1, 10, LockType::Allocation, 5).unwrap();
        let new = book.register(asset, bob, 1, 10, LockType::Allocation, 9).unwrap();
        book.register(asset, Address::from_label("carol"), 1, 10, LockType::Allocation, 9).unwrap();
        let keys: Vec<LockKey> = LockQuery::new(&book).for_beneficiary(&bob).iter().map(|r| r.key).collect();
        assert_eq!(keys, vec![new, old]);
    }

    #[test]
    fn listing_outlives_the_queried_address() {
        let mut book = LockBook::new();
        let asset = Address::from_label("asset");
        book.register(asset, Address::from_label("bob"), 7, 10, LockType::Allocation, 0).unwrap();
        let records = {
            let bob = Address::from_label("bob");
            LockQuery::new(&book).for_beneficiary(&bob)
        };
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].total, 7);
    }
}
