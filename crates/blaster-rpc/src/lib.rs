//! blaster-rpc
//!
//! Read-only JSON-RPC 2.0 server over a node's saved ledger.
//!
//! Namespace: "blaster"
//! Methods:
//!   blaster_getStatus              — ledger clock and registry sizes
//!   blaster_getLockInfo            — one lock with its vesting position
//!   blaster_getLocksForBeneficiary — live locks of an address, newest first
//!   blaster_getBalance             — asset or native balance
//!   blaster_getCoin                — asset metadata and transfer policy
//!   blaster_getLaunch              — launch by coin id
//!   blaster_getEvents              — audit log page

pub mod api;
pub mod server;
pub mod types;

pub use api::{BlasterApiClient, BlasterApiServer};
pub use server::{RpcServer, RpcServerState};
pub use types::{RpcCoin, RpcEvent, RpcLaunch, RpcLock, RpcStatus};
