//! blaster-vault
//!
//! Bookkeeping for the lock & vesting vault: the keyed store of lock records,
//! the linear unlock schedule, and query helpers. Custody itself (moving the
//! locked asset in and out) lives in blaster-state's `Ledger`, which owns the
//! balances this book describes.

pub mod book;
pub mod query;
pub mod record;
pub mod schedule;

pub use book::{ClaimSettlement, LockBook};
pub use query::LockQuery;
pub use record::{LockInfo, LockRecord};
pub use schedule::{claimable_amount, vested_amount, vesting_snapshot, VestingSnapshot};
