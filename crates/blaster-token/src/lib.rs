//! blaster-token
//!
//! The launched fungible asset. Every balance-changing transfer passes through
//! the tax/burn/anti-snipe policy: transfers are classified as buy, sell or
//! plain against the set of pool-like counterparties, burn is taken on every
//! non-exempt transfer, tax on buys and sells, and early-window caps guard
//! against automated snipers.

pub mod access;
pub mod coin;
pub mod policy;

pub use access::{require_minter, require_owner};
pub use coin::{Coin, TransferOutcome};
pub use policy::{FeeBreakdown, TaxPolicy};
