use std::net::SocketAddr;
use std::sync::Arc;

use jsonrpsee::core::{async_trait, RpcResult};
use jsonrpsee::server::{Server, ServerHandle};
use jsonrpsee::types::ErrorObject;
use tower_http::cors::CorsLayer;
use tracing::{debug, info};

use blaster_core::types::{Address, LockKey};
use blaster_state::{Ledger, StateDb};
use blaster_vault::LockRecord;

use crate::api::BlasterApiServer;
use crate::types::{RpcCoin, RpcEvent, RpcLaunch, RpcLock, RpcStatus};

const DEFAULT_EVENT_LIMIT: u32 = 100;
const MAX_EVENT_LIMIT: u32 = 1000;

fn rpc_err(code: i32, msg: impl Into<String>) -> ErrorObject<'static> {
    ErrorObject::owned(code, msg.into(), None::<()>)
}

fn parse_address(label: &str, s: &str) -> RpcResult<Address> {
    s.parse::<Address>()
        .map_err(|e| rpc_err(-32602, format!("invalid {label}: {e}")))
}

/// Shared state passed to the RPC server.
pub struct RpcServerState {
    pub db: Arc<StateDb>,
}

/// The RPC server implementation. Every call reads the last saved ledger.
pub struct RpcServer {
    state: Arc<RpcServerState>,
}

impl RpcServer {
    pub fn new(state: Arc<RpcServerState>) -> Self {
        Self { state }
    }

    /// Start the JSON-RPC server on `addr`. Returns the bound address and a
    /// handle to stop it.
    pub async fn start(self, addr: SocketAddr) -> anyhow::Result<(SocketAddr, ServerHandle)> {
        let cors = tower::ServiceBuilder::new().layer(CorsLayer::permissive());
        let server = Server::builder().set_http_middleware(cors).build(addr).await?;
        let bound = server.local_addr()?;
        let module = self.into_rpc();
        let handle = server.start(module);
        info!(addr = %bound, "RPC server started");
        Ok((bound, handle))
    }

    fn ledger(&self) -> RpcResult<Ledger> {
        let ledger = self
            .state
            .db
            .load()
            .map_err(|e| rpc_err(-32603, e.to_string()))?;
        Ok(ledger.unwrap_or_default())
    }

    fn lock_view(ledger: &Ledger, record: &LockRecord) -> RpcResult<RpcLock> {
        let query = ledger.lock_query();
        let now = ledger.now();
        let snap = query
            .snapshot(&record.key, now)
            .map_err(|e| rpc_err(-32603, e.to_string()))?;
        let description = query
            .describe(&record.key, now)
            .map_err(|e| rpc_err(-32603, e.to_string()))?;
        Ok(RpcLock::from_record(record, &snap, description))
    }
}

#[async_trait]
impl BlasterApiServer for RpcServer {
    async fn get_status(&self) -> RpcResult<RpcStatus> {
        let ledger = self.ledger()?;
        let world = ledger.world();
        Ok(RpcStatus {
            now: ledger.now(),
            coins: world.coins.len() as u64,
            pairs: world.pairs.len(),
            open_locks: world.locks.len() as u64,
            launches: world.launches.len() as u64,
            next_event_seq: ledger.next_event_seq(),
        })
    }

    async fn get_lock_info(&self, lock_key: u64) -> RpcResult<Option<RpcLock>> {
        let ledger = self.ledger()?;
        match ledger.lock_query().get(&LockKey(lock_key)) {
            Some(record) => Ok(Some(Self::lock_view(&ledger, record)?)),
            None => Ok(None),
        }
    }

    async fn get_locks_for_beneficiary(&self, beneficiary: String) -> RpcResult<Vec<RpcLock>> {
        let who = parse_address("beneficiary", &beneficiary)?;
        let ledger = self.ledger()?;
        ledger
            .locks_for(&who)
            .into_iter()
            .map(|record| Self::lock_view(&ledger, record))
            .collect()
    }

    async fn get_balance(&self, holder: String, asset: Option<String>) -> RpcResult<String> {
        let holder = parse_address("holder", &holder)?;
        let ledger = self.ledger()?;
        let balance = match asset {
            Some(a) => {
                let asset = parse_address("asset", &a)?;
                ledger.coin(&asset).map_err(|e| rpc_err(-32602, e.to_string()))?;
                ledger.balance_of(&asset, &holder)
            }
            None => ledger.native_balance(&holder),
        };
        Ok(balance.to_string())
    }

    async fn get_coin(&self, address: String) -> RpcResult<Option<RpcCoin>> {
        let address = parse_address("asset", &address)?;
        let ledger = self.ledger()?;
        Ok(ledger.coin(&address).ok().map(RpcCoin::from))
    }

    async fn get_launch(&self, coin_id: u64) -> RpcResult<Option<RpcLaunch>> {
        let ledger = self.ledger()?;
        Ok(ledger.launch(coin_id).map(RpcLaunch::from))
    }

    async fn get_events(&self, from: u64, limit: Option<u32>) -> RpcResult<Vec<RpcEvent>> {
        let limit = limit.unwrap_or(DEFAULT_EVENT_LIMIT).min(MAX_EVENT_LIMIT);
        let entries = self
            .state
            .db
            .events_from(from, limit as usize)
            .map_err(|e| rpc_err(-32603, e.to_string()))?;
        debug!(from, returned = entries.len(), "events served");
        entries
            .iter()
            .map(|e| RpcEvent::from_entry(e).map_err(|err| rpc_err(-32603, err.to_string())))
            .collect()
    }
}
