use tracing::{debug, info, warn};

use blaster_core::constants::{COIN_ADDRESS_DOMAIN, MAX_LOCK_DURATION_SECS};
use blaster_core::error::BlasterError;
use blaster_core::event::{Event, LogEntry};
use blaster_core::params::CoinConfig;
use blaster_core::types::{Address, Balance, LockKey, LockType, Timestamp};
use blaster_token::{Coin, TransferOutcome};
use blaster_vault::{LockInfo, LockQuery, LockRecord};

use crate::events::EventLog;
use crate::world::{LaunchRecord, PairRegistry, WorldState};

// ── Ledger ────────────────────────────────────────────────────────────────────

/// Restore point of one open operation.
#[derive(Debug)]
struct Checkpoint {
    world: WorldState,
    next_event_seq: u64,
}

/// The global sequential ledger.
///
/// Every public mutation either completes or leaves no trace: compound
/// operations run inside `atomic`, which snapshots the world before the first
/// change and restores it on error. Snapshots nest, so an atomic operation
/// may call others. The audit log is not part of the snapshot; a rollback
/// truncates it to where the operation began.
///
/// Balances held by the vault custody address leave it only through
/// `claim`. Every public entry point that would let the vault act as sender,
/// owner or spender refuses with `VaultCustody`.
#[derive(Debug, Default)]
pub struct Ledger {
    world: WorldState,
    events: EventLog,
    journal: Vec<Checkpoint>,
}

impl Ledger {
    pub fn new(vault: Address, now: Timestamp) -> Self {
        Self::from_world(WorldState::new(vault, now))
    }

    pub fn from_world(world: WorldState) -> Self {
        Self::resume(world, 0)
    }

    /// Ledger over a saved world whose log already holds `next_event_seq`
    /// entries elsewhere.
    pub fn resume(world: WorldState, next_event_seq: u64) -> Self {
        Self { world, events: EventLog::resume(next_event_seq), journal: Vec::new() }
    }

    pub fn world(&self) -> &WorldState {
        &self.world
    }

    // ── Transactions ─────────────────────────────────────────────────────────

    pub fn begin(&mut self) {
        self.journal.push(Checkpoint { world: self.world.clone(), next_event_seq: self.events.next_seq() });
    }

    pub fn commit(&mut self) -> Result<(), BlasterError> {
        self.journal.pop().map(|_| ()).ok_or(BlasterError::NoActiveTransaction)
    }

    pub fn rollback(&mut self) -> Result<(), BlasterError> {
        let checkpoint = self.journal.pop().ok_or(BlasterError::NoActiveTransaction)?;
        self.world = checkpoint.world;
        self.events.truncate(checkpoint.next_event_seq);
        Ok(())
    }

    pub fn in_transaction(&self) -> bool {
        !self.journal.is_empty()
    }

    /// Run `f` all-or-nothing.
    pub fn atomic<T, E, F>(&mut self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut Ledger) -> Result<T, E>,
        E: From<BlasterError>,
    {
        self.begin();
        match f(self) {
            Ok(value) => {
                self.commit()?;
                Ok(value)
            }
            Err(e) => {
                self.rollback()?;
                Err(e)
            }
        }
    }

    // ── Clock ────────────────────────────────────────────────────────────────

    pub fn now(&self) -> Timestamp {
        self.world.now
    }

    /// Move the clock to `t`. Time never runs backwards.
    pub fn set_time(&mut self, t: Timestamp) -> Result<(), BlasterError> {
        if t < self.world.now {
            return Err(BlasterError::ClockRegression { now: self.world.now, requested: t });
        }
        self.world.now = t;
        Ok(())
    }

    pub fn advance_time(&mut self, secs: u64) -> Result<Timestamp, BlasterError> {
        self.world.now = self
            .world
            .now
            .checked_add(secs)
            .ok_or(BlasterError::ArithmeticOverflow("clock"))?;
        Ok(self.world.now)
    }

    // ── Events ───────────────────────────────────────────────────────────────

    pub fn emit(&mut self, event: Event) -> u64 {
        debug!(event = event.name(), "event");
        let now = self.world.now;
        self.events.append(event, now)
    }

    fn emit_all(&mut self, events: Vec<Event>) {
        for event in events {
            self.emit(event);
        }
    }

    /// Entries appended since this ledger was created or resumed. Older
    /// history lives in `StateDb`.
    pub fn events(&self) -> &[LogEntry] {
        self.events.entries()
    }

    pub fn events_since(&self, seq: u64) -> &[LogEntry] {
        self.events.since(seq)
    }

    pub fn next_event_seq(&self) -> u64 {
        self.events.next_seq()
    }

    // ── Vault custody guard ──────────────────────────────────────────────────

    fn guard_custody(&self, who: &Address) -> Result<(), BlasterError> {
        if *who == self.world.vault {
            warn!(vault = %who, "refused to act as the vault");
            return Err(BlasterError::VaultCustody(*who));
        }
        Ok(())
    }

    // ── Native currency ──────────────────────────────────────────────────────

    pub fn native_balance(&self, holder: &Address) -> Balance {
        self.world.native.get(holder).copied().unwrap_or(0)
    }

    /// Credit native currency from outside the ledger (faucet / genesis).
    pub fn fund_native(&mut self, to: &Address, amount: Balance) -> Result<(), BlasterError> {
        if to.is_zero() {
            return Err(BlasterError::ZeroAddress("recipient"));
        }
        let entry = self.world.native.entry(*to).or_insert(0);
        *entry = entry
            .checked_add(amount)
            .ok_or(BlasterError::ArithmeticOverflow("native balance"))?;
        Ok(())
    }

    pub fn transfer_native(&mut self, from: &Address, to: &Address, amount: Balance) -> Result<(), BlasterError> {
        self.guard_custody(from)?;
        if to.is_zero() {
            return Err(BlasterError::ZeroAddress("recipient"));
        }
        let have = self.native_balance(from);
        if have < amount {
            return Err(BlasterError::InsufficientBalance { need: amount, have });
        }
        if amount == 0 || from == to {
            return Ok(());
        }
        self.world.native.insert(*from, have - amount);
        self.fund_native(to, amount)
    }

    // ── Assets ───────────────────────────────────────────────────────────────

    /// Deploy a taxed coin. Its address derives from the deployer and a
    /// per-deployer nonce.
    pub fn deploy_coin(
        &mut self,
        deployer: &Address,
        config: &CoinConfig,
        initial_holder: Address,
    ) -> Result<Address, BlasterError> {
        let nonce = self.world.deploy_nonces.get(deployer).copied().unwrap_or(0);
        let address = Address::derive(COIN_ADDRESS_DOMAIN, &[deployer.as_bytes(), &nonce.to_be_bytes()]);
        if self.world.coins.contains_key(&address) {
            return Err(BlasterError::AssetAlreadyExists(address));
        }
        self.guard_custody(&config.owner)?;
        let (mut coin, events) = Coin::deploy(address, config, initial_holder, self.world.now)?;
        // Claims pay out of custody at any time, so the vault is never capped.
        coin.policy.exempt.insert(self.world.vault);
        self.world.deploy_nonces.insert(*deployer, nonce + 1);
        self.world.coins.insert(address, coin);
        self.emit_all(events);
        info!(
            coin = %address,
            symbol = %config.symbol,
            supply = config.supply,
            buy_bps = config.buy_tax_bps,
            sell_bps = config.sell_tax_bps,
            burn_bps = config.burn_bps,
            "coin deployed"
        );
        Ok(address)
    }

    /// Register an untaxed mintable asset at a fixed address.
    pub fn deploy_mintable(
        &mut self,
        address: Address,
        name: &str,
        symbol: &str,
        minter: Address,
    ) -> Result<(), BlasterError> {
        if address.is_zero() {
            return Err(BlasterError::ZeroAddress("asset"));
        }
        if self.world.coins.contains_key(&address) {
            return Err(BlasterError::AssetAlreadyExists(address));
        }
        self.world
            .coins
            .insert(address, Coin::mintable(address, name, symbol, minter));
        debug!(asset = %address, symbol, "mintable asset registered");
        Ok(())
    }

    pub fn coin(&self, asset: &Address) -> Result<&Coin, BlasterError> {
        self.world.coins.get(asset).ok_or(BlasterError::UnknownAsset(*asset))
    }

    fn coin_mut(&mut self, asset: &Address) -> Result<&mut Coin, BlasterError> {
        self.world.coins.get_mut(asset).ok_or(BlasterError::UnknownAsset(*asset))
    }

    pub fn coins(&self) -> impl Iterator<Item = &Coin> {
        self.world.coins.values()
    }

    pub fn has_coin(&self, asset: &Address) -> bool {
        self.world.coins.contains_key(asset)
    }

    /// Zero for unknown assets.
    pub fn balance_of(&self, asset: &Address, holder: &Address) -> Balance {
        self.world.coins.get(asset).map(|c| c.balance_of(holder)).unwrap_or(0)
    }

    pub fn allowance(&self, asset: &Address, owner: &Address, spender: &Address) -> Balance {
        self.world
            .coins
            .get(asset)
            .map(|c| c.allowance(owner, spender))
            .unwrap_or(0)
    }

    pub fn total_supply(&self, asset: &Address) -> Result<Balance, BlasterError> {
        Ok(self.coin(asset)?.total_supply)
    }

    pub fn transfer(
        &mut self,
        asset: &Address,
        from: &Address,
        to: &Address,
        amount: Balance,
    ) -> Result<TransferOutcome, BlasterError> {
        self.guard_custody(from)?;
        self.move_asset(asset, from, to, amount)
    }

    fn move_asset(
        &mut self,
        asset: &Address,
        from: &Address,
        to: &Address,
        amount: Balance,
    ) -> Result<TransferOutcome, BlasterError> {
        let now = self.world.now;
        let outcome = self.coin_mut(asset)?.transfer(from, to, amount, now)?;
        self.emit_all(outcome.events.clone());
        Ok(outcome)
    }

    pub fn transfer_from(
        &mut self,
        asset: &Address,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: Balance,
    ) -> Result<TransferOutcome, BlasterError> {
        self.guard_custody(spender)?;
        self.guard_custody(from)?;
        let now = self.world.now;
        let outcome = self.coin_mut(asset)?.transfer_from(spender, from, to, amount, now)?;
        self.emit_all(outcome.events.clone());
        Ok(outcome)
    }

    pub fn approve(
        &mut self,
        asset: &Address,
        owner: &Address,
        spender: &Address,
        amount: Balance,
    ) -> Result<(), BlasterError> {
        self.guard_custody(owner)?;
        let event = self.coin_mut(asset)?.approve(owner, spender, amount)?;
        self.emit(event);
        Ok(())
    }

    pub fn mint(
        &mut self,
        asset: &Address,
        caller: &Address,
        to: &Address,
        amount: Balance,
    ) -> Result<(), BlasterError> {
        let event = self.coin_mut(asset)?.mint(caller, to, amount)?;
        self.emit(event);
        Ok(())
    }

    pub fn burn(
        &mut self,
        asset: &Address,
        caller: &Address,
        from: &Address,
        amount: Balance,
    ) -> Result<(), BlasterError> {
        self.guard_custody(caller)?;
        self.guard_custody(from)?;
        let event = self.coin_mut(asset)?.burn(caller, from, amount)?;
        self.emit(event);
        Ok(())
    }

    pub fn add_supported_pair(
        &mut self,
        asset: &Address,
        caller: &Address,
        pair: Address,
        supported: bool,
    ) -> Result<(), BlasterError> {
        self.guard_custody(caller)?;
        let event = self.coin_mut(asset)?.add_supported_pair(caller, pair, supported)?;
        self.emit(event);
        Ok(())
    }

    pub fn disable_burn_and_taxes(&mut self, asset: &Address, caller: &Address) -> Result<(), BlasterError> {
        self.guard_custody(caller)?;
        let event = self.coin_mut(asset)?.disable_burn_and_taxes(caller)?;
        self.emit(event);
        Ok(())
    }

    pub fn enable_burn_and_taxes(&mut self, asset: &Address, caller: &Address) -> Result<(), BlasterError> {
        self.guard_custody(caller)?;
        let event = self.coin_mut(asset)?.enable_burn_and_taxes(caller)?;
        self.emit(event);
        Ok(())
    }

    // ── AMM storage ──────────────────────────────────────────────────────────

    pub fn pairs(&self) -> &PairRegistry {
        &self.world.pairs
    }

    pub fn pairs_mut(&mut self) -> &mut PairRegistry {
        &mut self.world.pairs
    }

    // ── Vault ────────────────────────────────────────────────────────────────

    pub fn vault_address(&self) -> Address {
        self.world.vault
    }

    /// Custodied balance of `asset` not yet promised to any lock.
    pub fn uncommitted_custody(&self, asset: &Address) -> Balance {
        let held = self.balance_of(asset, &self.world.vault);
        held.saturating_sub(self.world.locks.committed(asset))
    }

    fn check_lock_params(beneficiary: &Address, amount: Balance, duration: u64) -> Result<(), BlasterError> {
        if beneficiary.is_zero() {
            return Err(BlasterError::InvalidLockParameters("zero-address beneficiary".into()));
        }
        if amount == 0 {
            return Err(BlasterError::InvalidLockParameters("zero amount".into()));
        }
        if duration > MAX_LOCK_DURATION_SECS {
            return Err(BlasterError::LockPeriodTooLong { max_secs: MAX_LOCK_DURATION_SECS });
        }
        Ok(())
    }

    /// Register a lock over balance that has just arrived in custody.
    fn create_lock(
        &mut self,
        asset: &Address,
        beneficiary: &Address,
        amount: Balance,
        duration: u64,
        lock_type: LockType,
    ) -> Result<LockKey, BlasterError> {
        Self::check_lock_params(beneficiary, amount, duration)?;
        self.coin(asset)?;
        let free = self.uncommitted_custody(asset);
        if free < amount {
            return Err(BlasterError::InsufficientBalance { need: amount, have: free });
        }
        let now = self.world.now;
        let key = self
            .world
            .locks
            .register(*asset, *beneficiary, amount, duration, lock_type, now)?;
        self.emit(Event::TokensLocked {
            token: *asset,
            lock_key: key,
            beneficiary: *beneficiary,
            amount,
            lock_type: lock_type.code(),
        });
        info!(%key, token = %asset, %beneficiary, amount, duration, ?lock_type, "tokens locked");
        Ok(key)
    }

    /// Deposit `amount` from `depositor` into custody and lock what actually
    /// arrived. The only way to open a lock.
    pub fn lock_tokens(
        &mut self,
        depositor: &Address,
        asset: &Address,
        beneficiary: &Address,
        amount: Balance,
        duration: u64,
        lock_type: LockType,
    ) -> Result<LockKey, BlasterError> {
        Self::check_lock_params(beneficiary, amount, duration)?;
        self.atomic(|l| {
            let vault = l.world.vault;
            let before = l.balance_of(asset, &vault);
            l.transfer(asset, depositor, &vault, amount)?;
            let received = l.balance_of(asset, &vault).saturating_sub(before);
            l.create_lock(asset, beneficiary, received, duration, lock_type)
        })
    }

    /// Pay out whatever has vested on `key` to its beneficiary. Returns the
    /// amount debited from the record; zero is a successful no-op.
    pub fn claim(&mut self, key: LockKey) -> Result<Balance, BlasterError> {
        self.atomic(|l| {
            let now = l.world.now;
            let settlement = l.world.locks.settle_claim(key, now)?;
            if settlement.amount == 0 {
                debug!(%key, "nothing vested yet");
                return Ok(0);
            }
            let vault = l.world.vault;
            l.move_asset(&settlement.asset, &vault, &settlement.beneficiary, settlement.amount)?;
            l.emit(Event::TokenClaimed {
                token: settlement.asset,
                claimer: settlement.beneficiary,
                amount: settlement.amount,
                time_passed: settlement.time_passed,
            });
            info!(
                %key,
                token = %settlement.asset,
                beneficiary = %settlement.beneficiary,
                amount = settlement.amount,
                remaining = settlement.remaining,
                closed = settlement.closed,
                "tokens claimed"
            );
            Ok(settlement.amount)
        })
    }

    pub fn lock_info(&self, key: &LockKey) -> LockInfo {
        self.world.locks.lock_info(key)
    }

    pub fn lock_query(&self) -> LockQuery<'_> {
        LockQuery::new(&self.world.locks)
    }

    pub fn locks_for(&self, beneficiary: &Address) -> Vec<&LockRecord> {
        self.lock_query().for_beneficiary(beneficiary)
    }

    // ── Launch registry ──────────────────────────────────────────────────────

    pub fn launch(&self, coin_id: u64) -> Option<&LaunchRecord> {
        self.world.launches.get(&coin_id)
    }

    pub fn launches(&self) -> impl Iterator<Item = &LaunchRecord> {
        self.world.launches.values()
    }

    pub fn record_launch(&mut self, record: LaunchRecord) -> Result<(), BlasterError> {
        if self.world.launches.contains_key(&record.coin_id) {
            warn!(coin_id = record.coin_id, "launch id reused");
            return Err(BlasterError::DuplicateLaunchId(record.coin_id));
        }
        self.world.launches.insert(record.coin_id, record);
        Ok(())
    }
}
