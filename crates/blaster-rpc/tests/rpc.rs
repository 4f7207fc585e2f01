//! Serves a saved ledger over HTTP and queries it through the generated
//! client.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use jsonrpsee::http_client::{HttpClient, HttpClientBuilder};

use blaster_core::params::LaunchParams;
use blaster_core::types::Address;
use blaster_launchpad::{Deployment, LaunchReceipt, LaunchpadConfig};
use blaster_rpc::{BlasterApiClient, RpcServer, RpcServerState};
use blaster_state::{Ledger, StateDb};

const START: u64 = 1_700_000_000;
const ONE_NATIVE: u128 = 1_000_000_000_000_000_000;

struct Served {
    client: HttpClient,
    receipt: LaunchReceipt,
    owner: Address,
    _dir: TempDir,
}

struct TempDir(PathBuf);

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.0);
    }
}

fn launch_params(tom: Address) -> LaunchParams {
    LaunchParams {
        name: "TestCoin".into(),
        symbol: "TEST".into(),
        coin_id: 7,
        supply: 10_000_000,
        buy_tax_bps: 500,
        sell_tax_bps: 500,
        burn_bps: 100,
        fee_receiver: tom,
        lp_amount: 8_000_000,
        lp_amount_native: ONE_NATIVE,
        lock_period: 1000,
        vesting_period: 1000,
        max_tokens_per_wallet: 0,
        limit_per_transaction: 0,
        antisnipe_period: 0,
        external_distribution: 0,
        distribution_receiver: None,
    }
}

async fn serve(name: &str) -> Served {
    let dir = std::env::temp_dir().join(format!("blaster_rpc_test_{name}"));
    let _ = std::fs::remove_dir_all(&dir);
    let db = StateDb::open(&dir).unwrap();

    let owner = Address::from_label("owner");
    let mut ledger = Ledger::default();
    ledger.set_time(START).unwrap();
    Deployment::bootstrap(&mut ledger).unwrap();
    ledger.fund_native(&owner, 2 * ONE_NATIVE).unwrap();
    let pad = Deployment::launchpad(&ledger, LaunchpadConfig::default());
    let receipt = pad
        .create_coin(&mut ledger, &owner, &launch_params(Address::from_label("tom")), ONE_NATIVE)
        .unwrap();
    ledger.set_time(START + 250).unwrap();
    db.save(&ledger).unwrap();

    let state = Arc::new(RpcServerState { db: Arc::new(db) });
    let addr: SocketAddr = "127.0.0.1:0".parse().unwrap();
    let (bound, handle) = RpcServer::new(state).start(addr).await.unwrap();
    // The server lives as long as the test runtime.
    std::mem::forget(handle);

    let client = HttpClientBuilder::default().build(format!("http://{bound}")).unwrap();
    Served { client, receipt, owner, _dir: TempDir(dir) }
}

#[tokio::test]
async fn lock_info_reports_vesting_position() {
    let s = serve("lock_info").await;

    let lock = s.client.get_lock_info(s.receipt.allocation_lock_key.0).await.unwrap().unwrap();
    assert_eq!(lock.lock_type, "allocation");
    assert_eq!(lock.beneficiary, s.owner.to_hex());
    assert_eq!(lock.total, "2000000");
    assert_eq!(lock.claimable, "500000");
    assert_eq!(lock.fully_vested_at, START + 1000);
    assert!(lock.description.contains("claimable now"));

    assert!(s.client.get_lock_info(999).await.unwrap().is_none());
}

#[tokio::test]
async fn locks_for_beneficiary_newest_first() {
    let s = serve("beneficiary").await;
    let locks = s.client.get_locks_for_beneficiary(s.owner.to_hex()).await.unwrap();
    let keys: Vec<u64> = locks.iter().map(|l| l.lock_key).collect();
    assert_eq!(keys, vec![s.receipt.allocation_lock_key.0, s.receipt.lp_lock_key.0]);

    assert!(s.client.get_locks_for_beneficiary("not-an-address".into()).await.is_err());
}

#[tokio::test]
async fn balances_coins_and_launches() {
    let s = serve("balances").await;

    let native = s.client.get_balance(s.owner.to_hex(), None).await.unwrap();
    assert_eq!(native, ONE_NATIVE.to_string());

    let coin = s.client.get_coin(s.receipt.coin.to_hex()).await.unwrap().unwrap();
    assert_eq!(coin.symbol, "TEST");
    assert_eq!((coin.buy_tax_bps, coin.sell_tax_bps, coin.burn_bps), (500, 500, 100));
    assert!(!coin.construction_mode);
    assert!(coin.supported_pairs.contains(&s.receipt.pair.to_hex()));

    let launch = s.client.get_launch(7).await.unwrap().unwrap();
    assert_eq!(launch.coin, s.receipt.coin.to_hex());
    assert!(s.client.get_launch(8).await.unwrap().is_none());

    let status = s.client.get_status().await.unwrap();
    assert_eq!(status.now, START + 250);
    assert_eq!(status.launches, 1);
    assert_eq!(status.open_locks, 2);
}

#[tokio::test]
async fn events_page_through_the_log() {
    let s = serve("events").await;
    let all = s.client.get_events(0, Some(1000)).await.unwrap();
    assert_eq!(all.last().map(|e| e.name.as_str()), Some("CoinCreated"));
    assert!(all.windows(2).all(|w| w[1].seq == w[0].seq + 1));

    let page = s.client.get_events(2, Some(3)).await.unwrap();
    assert_eq!(page.len(), 3);
    assert_eq!(page[0].seq, 2);
}
