//! blaster-node: drives a single sequential ledger from the command line.
//!
//! Every invocation:
//!   1. Opens (or initialises) the state database
//!   2. Deploys the AMM and records the deployment if the DB is fresh
//!   3. Moves the ledger clock forward to wall-clock time
//!   4. Runs one command as a single ledger operation
//!   5. Saves the committed state
//!
//! `serve` instead starts the read-only JSON-RPC server over the saved state.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use blaster_core::params::LaunchParams;
use blaster_core::types::{Address, Balance, LockKey};
use blaster_launchpad::{Deployment, LaunchpadConfig};
use blaster_rpc::{RpcServer, RpcServerState};
use blaster_state::{Ledger, StateDb};

const DEPLOYMENT_META_KEY: &str = "deployment";

#[derive(Parser, Debug)]
#[command(
    name = "blaster-node",
    version,
    about = "Blaster launchpad node: taxed coin launches with locked liquidity"
)]
struct Args {
    /// Directory for the persistent state database.
    #[arg(long, default_value = "~/.blaster/data")]
    data_dir: PathBuf,

    /// JSON-RPC listen address (used by `serve`).
    #[arg(long, default_value = "127.0.0.1:8645")]
    rpc_addr: SocketAddr,

    /// Seconds granted to the pool-seeding call of a launch.
    #[arg(long, default_value_t = blaster_core::constants::DEFAULT_LIQUIDITY_DEADLINE_SECS)]
    liquidity_deadline_secs: u64,

    #[command(subcommand)]
    command: Command,
}

/// Addresses are `0x`-prefixed hex; any other string is a dev label that
/// maps to a stable derived address.
fn parse_address(s: &str) -> Result<Address, String> {
    if s.starts_with("0x") {
        s.parse::<Address>().map_err(|e| e.to_string())
    } else {
        Ok(Address::from_label(s))
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Credit native currency to an address (dev faucet).
    Fund {
        #[arg(long, value_parser = parse_address)]
        to: Address,
        #[arg(long)]
        amount: Balance,
    },
    /// Launch a coin from a JSON `LaunchParams` file.
    Launch {
        #[arg(long)]
        params: PathBuf,
        #[arg(long, value_parser = parse_address)]
        from: Address,
        /// Native value attached; defaults to the declared `lp_amount_native`.
        #[arg(long)]
        value: Option<Balance>,
    },
    /// Pay out whatever has vested on a lock.
    Claim {
        #[arg(long)]
        key: u64,
    },
    /// Show a lock, or every lock of a beneficiary.
    LockInfo {
        #[arg(long, conflicts_with = "beneficiary", required_unless_present = "beneficiary")]
        key: Option<u64>,
        #[arg(long, value_parser = parse_address)]
        beneficiary: Option<Address>,
    },
    /// Transfer an asset, or native currency when `--asset` is omitted.
    Transfer {
        #[arg(long, value_parser = parse_address)]
        from: Address,
        #[arg(long, value_parser = parse_address)]
        to: Address,
        #[arg(long)]
        amount: Balance,
        #[arg(long, value_parser = parse_address)]
        asset: Option<Address>,
    },
    /// Print a balance.
    Balance {
        #[arg(long, value_parser = parse_address)]
        holder: Address,
        #[arg(long, value_parser = parse_address)]
        asset: Option<Address>,
    },
    /// Print audit log entries.
    Events {
        #[arg(long, default_value_t = 0)]
        from: u64,
        #[arg(long, default_value_t = 50)]
        limit: usize,
    },
    /// Serve the saved state over JSON-RPC.
    Serve,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,blaster=debug")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    // ── State database ────────────────────────────────────────────────────────
    let data_dir = expand_tilde(&args.data_dir);
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("creating data dir {}", data_dir.display()))?;

    let db = Arc::new(StateDb::open(&data_dir).context("opening state database")?);

    // ── Bootstrap if fresh ────────────────────────────────────────────────────
    let mut ledger = match db.load().context("loading ledger")? {
        Some(ledger) => ledger,
        None => {
            info!("fresh database, deploying AMM");
            let mut ledger = Ledger::default();
            ledger.set_time(wall_clock()).context("setting ledger clock")?;
            let deployment = Deployment::bootstrap(&mut ledger).context("bootstrapping deployment")?;
            db.put_meta(DEPLOYMENT_META_KEY, &serde_json::to_vec(&deployment)?)
                .context("recording deployment")?;
            db.save(&ledger).context("saving bootstrapped state")?;
            ledger
        }
    };

    match args.command {
        Command::Serve => return serve(db, args.rpc_addr).await,
        Command::Events { from, limit } => return print_events(&db, from, limit),
        _ => {}
    }

    // ── Clock ─────────────────────────────────────────────────────────────────
    let now = wall_clock();
    if now > ledger.now() {
        ledger.set_time(now)?;
    } else if now < ledger.now() {
        warn!(ledger = ledger.now(), wall = now, "wall clock behind ledger; keeping ledger time");
    }

    let config = LaunchpadConfig { liquidity_deadline_secs: args.liquidity_deadline_secs };
    run(&mut ledger, args.command, config)?;

    db.save(&ledger).context("saving state")?;
    db.flush().context("flushing state")?;
    Ok(())
}

fn run(ledger: &mut Ledger, command: Command, config: LaunchpadConfig) -> anyhow::Result<()> {
    match command {
        Command::Fund { to, amount } => {
            ledger.fund_native(&to, amount)?;
            info!(%to, amount, "funded");
            println!("{}", ledger.native_balance(&to));
        }
        Command::Launch { params, from, value } => {
            let json = std::fs::read_to_string(&params)
                .with_context(|| format!("reading launch params from {}", params.display()))?;
            let params: LaunchParams = serde_json::from_str(&json).context("parsing launch params JSON")?;
            let value = value.unwrap_or(params.lp_amount_native);
            let pad = Deployment::launchpad(ledger, config);
            let receipt = pad.create_coin(ledger, &from, &params, value).context("launch failed")?;
            println!("{}", serde_json::to_string_pretty(&receipt)?);
        }
        Command::Claim { key } => {
            let paid = ledger.claim(LockKey(key)).context("claim failed")?;
            println!("{paid}");
        }
        Command::LockInfo { key: Some(key), .. } => {
            let key = LockKey(key);
            match ledger.lock_query().describe(&key, ledger.now()) {
                Ok(line) => println!("{line}"),
                Err(_) => println!("{}", serde_json::to_string_pretty(&ledger.lock_info(&key))?),
            }
        }
        Command::LockInfo { key: None, beneficiary } => {
            let beneficiary = beneficiary.context("either --key or --beneficiary is required")?;
            let query = ledger.lock_query();
            for record in ledger.locks_for(&beneficiary) {
                println!("{}", query.describe(&record.key, ledger.now())?);
            }
        }
        Command::Transfer { from, to, amount, asset: Some(asset) } => {
            let outcome = ledger.transfer(&asset, &from, &to, amount)?;
            println!("{}", outcome.amount);
        }
        Command::Transfer { from, to, amount, asset: None } => {
            ledger.transfer_native(&from, &to, amount)?;
            println!("{amount}");
        }
        Command::Balance { holder, asset } => {
            let balance = match asset {
                Some(asset) => {
                    ledger.coin(&asset)?;
                    ledger.balance_of(&asset, &holder)
                }
                None => ledger.native_balance(&holder),
            };
            println!("{balance}");
        }
        Command::Events { .. } | Command::Serve => anyhow::bail!("read-only command does not run against the ledger"),
    }
    Ok(())
}

/// The audit log lives in the database; the ledger only holds what this
/// invocation appended.
fn print_events(db: &StateDb, from: u64, limit: usize) -> anyhow::Result<()> {
    for entry in db.events_from(from, limit).context("reading events")? {
        println!(
            "{} {} {} {}",
            entry.seq,
            entry.timestamp,
            entry.event.name(),
            serde_json::to_string(&entry.event)?
        );
    }
    Ok(())
}

async fn serve(db: Arc<StateDb>, addr: SocketAddr) -> anyhow::Result<()> {
    let rpc_state = Arc::new(RpcServerState { db });
    let (bound, handle) = RpcServer::new(rpc_state)
        .start(addr)
        .await
        .context("starting RPC server")?;
    info!(addr = %bound, "node ready");

    tokio::select! {
        _ = handle.clone().stopped() => warn!("RPC server stopped"),
        _ = tokio::signal::ctrl_c() => {
            info!("shutting down");
            let _ = handle.stop();
        }
    }
    Ok(())
}

/// Current UTC unix time in seconds; zero if the system clock is before 1970.
fn wall_clock() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp()).unwrap_or(0)
}

/// Expand a leading `~` to the user's home directory (`HOME` or `USERPROFILE`).
fn expand_tilde(path: &Path) -> PathBuf {
    if let Ok(stripped) = path.strip_prefix("~") {
        if let Ok(home) = std::env::var("HOME").or_else(|_| std::env::var("USERPROFILE")) {
            return PathBuf::from(home).join(stripped);
        }
    }
    path.to_path_buf()
}
