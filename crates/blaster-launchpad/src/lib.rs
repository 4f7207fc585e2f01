//! blaster-launchpad
//!
//! The launch orchestrator. One `create_coin` call deploys a taxed coin,
//! seeds its AMM pool in construction mode, and locks the pool shares and
//! the founder allocation in the vault for the caller. The whole sequence is
//! a single ledger transaction.

pub mod config;
pub mod deployment;
pub mod orchestrator;

pub use config::LaunchpadConfig;
pub use deployment::Deployment;
pub use orchestrator::{LaunchReceipt, Launchpad};
