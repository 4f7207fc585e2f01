//! blaster-state
//!
//! The single global sequential ledger every operation runs against. A
//! `Ledger` owns the committed `WorldState`, the audit log and a journal of
//! restore points; `atomic` runs an operation so that any error restores the
//! state it started from and drops the events it emitted.

pub mod db;
pub mod events;
pub mod ledger;
pub mod world;

pub use db::StateDb;
pub use events::EventLog;
pub use ledger::Ledger;
pub use world::{LaunchRecord, PairRecord, PairRegistry, WorldState};
