use jsonrpsee::core::RpcResult;
use jsonrpsee::proc_macros::rpc;

use crate::types::{RpcCoin, RpcEvent, RpcLaunch, RpcLock, RpcStatus};

/// Blaster JSON-RPC 2.0 API definition. Read-only: state changes go through
/// the node CLI.
///
/// All method names are prefixed with "blaster_" via `namespace = "blaster"`.
/// Addresses are `0x`-prefixed hex strings.
#[rpc(server, client, namespace = "blaster")]
pub trait BlasterApi {
    /// Ledger clock and registry sizes.
    #[method(name = "getStatus")]
    async fn get_status(&self) -> RpcResult<RpcStatus>;

    /// A live lock by key, or null for unknown and fully claimed keys.
    #[method(name = "getLockInfo")]
    async fn get_lock_info(&self, lock_key: u64) -> RpcResult<Option<RpcLock>>;

    /// Live locks of a beneficiary, newest first.
    #[method(name = "getLocksForBeneficiary")]
    async fn get_locks_for_beneficiary(&self, beneficiary: String) -> RpcResult<Vec<RpcLock>>;

    /// Balance of `holder` in `asset`, or in the native currency when `asset`
    /// is omitted. u128 as a decimal string.
    #[method(name = "getBalance")]
    async fn get_balance(&self, holder: String, asset: Option<String>) -> RpcResult<String>;

    #[method(name = "getCoin")]
    async fn get_coin(&self, address: String) -> RpcResult<Option<RpcCoin>>;

    /// Launch by its caller-chosen identifier.
    #[method(name = "getLaunch")]
    async fn get_launch(&self, coin_id: u64) -> RpcResult<Option<RpcLaunch>>;

    /// Audit log entries starting at sequence number `from`. `limit`
    /// defaults to 100 and is capped at 1000.
    #[method(name = "getEvents")]
    async fn get_events(&self, from: u64, limit: Option<u32>) -> RpcResult<Vec<RpcEvent>>;
}
