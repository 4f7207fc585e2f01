use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use blaster_core::constants::{COIN_DECIMALS, INFINITE_ALLOWANCE};
use blaster_core::error::BlasterError;
use blaster_core::event::Event;
use blaster_core::params::CoinConfig;
use blaster_core::types::{Address, Balance, Timestamp, TransferKind};

use crate::access::{require_minter, require_owner};
use crate::policy::{FeeBreakdown, TaxPolicy};

/// Result of a successful transfer.
#[derive(Clone, Debug, PartialEq)]
pub struct TransferOutcome {
    pub kind: TransferKind,
    /// Nominal amount debited from the sender.
    pub amount: Balance,
    pub fees: FeeBreakdown,
    pub events: Vec<Event>,
}

/// A fungible asset: balances, allowances and the transfer policy.
///
/// Invariant: the sum of all balances equals `total_supply`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Coin {
    pub address: Address,
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub owner: Address,
    /// Set only on mintable assets.
    pub minter: Option<Address>,
    pub total_supply: Balance,
    balances: BTreeMap<Address, Balance>,
    allowances: BTreeMap<Address, BTreeMap<Address, Balance>>,
    pub policy: TaxPolicy,
}

impl Coin {
    /// Construct a taxed coin and mint the whole supply to `initial_holder`.
    pub fn deploy(
        address: Address,
        config: &CoinConfig,
        initial_holder: Address,
        now: Timestamp,
    ) -> Result<(Self, Vec<Event>), BlasterError> {
        config.validate()?;
        if initial_holder.is_zero() {
            return Err(BlasterError::ZeroAddress("initial holder"));
        }
        let mut balances = BTreeMap::new();
        balances.insert(initial_holder, config.supply);
        let coin = Self {
            address,
            name: config.name.clone(),
            symbol: config.symbol.clone(),
            decimals: COIN_DECIMALS,
            owner: config.owner,
            minter: None,
            total_supply: config.supply,
            balances,
            allowances: BTreeMap::new(),
            policy: TaxPolicy::from_config(config, now),
        };
        let events = vec![Event::Transfer {
            token: address,
            from: Address::ZERO,
            to: initial_holder,
            amount: config.supply,
        }];
        Ok((coin, events))
    }

    /// An untaxed, mintable asset with zero initial supply.
    pub fn mintable(address: Address, name: &str, symbol: &str, minter: Address) -> Self {
        Self {
            address,
            name: name.to_string(),
            symbol: symbol.to_string(),
            decimals: COIN_DECIMALS,
            owner: minter,
            minter: Some(minter),
            total_supply: 0,
            balances: BTreeMap::new(),
            allowances: BTreeMap::new(),
            policy: TaxPolicy::none(),
        }
    }

    // ── Reads ────────────────────────────────────────────────────────────────

    pub fn balance_of(&self, holder: &Address) -> Balance {
        self.balances.get(holder).copied().unwrap_or(0)
    }

    pub fn allowance(&self, owner: &Address, spender: &Address) -> Balance {
        self.allowances
            .get(owner)
            .and_then(|m| m.get(spender))
            .copied()
            .unwrap_or(0)
    }

    pub fn holders(&self) -> impl Iterator<Item = (&Address, &Balance)> {
        self.balances.iter()
    }

    /// Sum of balances equals total supply.
    pub fn supply_is_conserved(&self) -> bool {
        self.balances
            .values()
            .try_fold(0u128, |acc, b| acc.checked_add(*b))
            == Some(self.total_supply)
    }

    // ── Transfers ────────────────────────────────────────────────────────────

    /// Move `amount` from `from` to `to` under the asset's policy.
    ///
    /// All checks run before any balance changes, so a failed transfer leaves
    /// the coin untouched.
    pub fn transfer(
        &mut self,
        from: &Address,
        to: &Address,
        amount: Balance,
        now: Timestamp,
    ) -> Result<TransferOutcome, BlasterError> {
        if from.is_zero() {
            return Err(BlasterError::ZeroAddress("sender"));
        }
        if to.is_zero() {
            return Err(BlasterError::ZeroAddress("recipient"));
        }
        let have = self.balance_of(from);
        if have < amount {
            return Err(BlasterError::InsufficientBalance { need: amount, have });
        }

        let kind = self.policy.classify(from, to);
        let fees = self.policy.fees(amount, kind)?;

        let mut resulting = if from == to { have - amount } else { self.balance_of(to) };
        resulting = resulting
            .checked_add(fees.net)
            .ok_or(BlasterError::ArithmeticOverflow("recipient balance"))?;
        if *to == self.policy.fee_receiver {
            resulting = resulting
                .checked_add(fees.tax)
                .ok_or(BlasterError::ArithmeticOverflow("recipient balance"))?;
        }
        self.policy.check_antisnipe(kind, from, to, amount, resulting, now)?;

        // ── Apply ─────────────────────────────────────────────────────────────
        let mut events = Vec::with_capacity(3);
        self.debit(from, amount)?;
        if fees.burn > 0 {
            self.total_supply -= fees.burn;
            events.push(Event::Transfer {
                token: self.address,
                from: *from,
                to: Address::ZERO,
                amount: fees.burn,
            });
        }
        if fees.tax > 0 {
            let receiver = self.policy.fee_receiver;
            self.credit(&receiver, fees.tax)?;
            events.push(Event::Transfer {
                token: self.address,
                from: *from,
                to: receiver,
                amount: fees.tax,
            });
            events.push(Event::TaxCollected {
                token: self.address,
                payer: *from,
                receiver,
                amount: fees.tax,
                kind,
            });
        }
        self.credit(to, fees.net)?;
        events.push(Event::Transfer {
            token: self.address,
            from: *from,
            to: *to,
            amount: fees.net,
        });

        debug!(
            token = %self.address,
            ?kind,
            amount,
            burned = fees.burn,
            taxed = fees.tax,
            "transfer"
        );
        Ok(TransferOutcome { kind, amount, fees, events })
    }

    pub fn approve(
        &mut self,
        owner: &Address,
        spender: &Address,
        amount: Balance,
    ) -> Result<Event, BlasterError> {
        if owner.is_zero() {
            return Err(BlasterError::ZeroAddress("approver"));
        }
        if spender.is_zero() {
            return Err(BlasterError::ZeroAddress("spender"));
        }
        self.allowances.entry(*owner).or_default().insert(*spender, amount);
        Ok(Event::Approval {
            token: self.address,
            owner: *owner,
            spender: *spender,
            amount,
        })
    }

    /// Spend an allowance. `INFINITE_ALLOWANCE` is never decremented.
    pub fn transfer_from(
        &mut self,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: Balance,
        now: Timestamp,
    ) -> Result<TransferOutcome, BlasterError> {
        let allowed = self.allowance(from, spender);
        if allowed < amount {
            return Err(BlasterError::InsufficientAllowance { need: amount, have: allowed });
        }
        let outcome = self.transfer(from, to, amount, now)?;
        if allowed != INFINITE_ALLOWANCE {
            self.allowances
                .entry(*from)
                .or_default()
                .insert(*spender, allowed - amount);
        }
        Ok(outcome)
    }

    // ── Supply (mintable assets only) ────────────────────────────────────────

    /// Mint to `to`. Minting to the zero address locks the units forever.
    pub fn mint(&mut self, caller: &Address, to: &Address, amount: Balance) -> Result<Event, BlasterError> {
        require_minter(self.minter.as_ref(), caller)?;
        self.total_supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(BlasterError::ArithmeticOverflow("total supply"))?;
        self.credit(to, amount)?;
        Ok(Event::Transfer {
            token: self.address,
            from: Address::ZERO,
            to: *to,
            amount,
        })
    }

    pub fn burn(&mut self, caller: &Address, from: &Address, amount: Balance) -> Result<Event, BlasterError> {
        require_minter(self.minter.as_ref(), caller)?;
        let have = self.balance_of(from);
        if have < amount {
            return Err(BlasterError::InsufficientBalance { need: amount, have });
        }
        self.debit(from, amount)?;
        self.total_supply -= amount;
        Ok(Event::Transfer {
            token: self.address,
            from: *from,
            to: Address::ZERO,
            amount,
        })
    }

    // ── Owner administration ─────────────────────────────────────────────────

    /// Register or remove a pool-like counterparty.
    pub fn add_supported_pair(
        &mut self,
        caller: &Address,
        pair: Address,
        supported: bool,
    ) -> Result<Event, BlasterError> {
        require_owner(&self.owner, caller)?;
        if pair.is_zero() {
            return Err(BlasterError::ZeroAddress("pair"));
        }
        if supported {
            self.policy.supported_pairs.insert(pair);
        } else {
            self.policy.supported_pairs.remove(&pair);
        }
        Ok(Event::SupportedPairUpdated {
            token: self.address,
            pair,
            supported,
        })
    }

    /// Enter construction mode: transfers skip burn, tax and caps.
    pub fn disable_burn_and_taxes(&mut self, caller: &Address) -> Result<Event, BlasterError> {
        self.set_construction_mode(caller, true)
    }

    /// Leave construction mode.
    pub fn enable_burn_and_taxes(&mut self, caller: &Address) -> Result<Event, BlasterError> {
        self.set_construction_mode(caller, false)
    }

    fn set_construction_mode(&mut self, caller: &Address, enabled: bool) -> Result<Event, BlasterError> {
        require_owner(&self.owner, caller)?;
        self.policy.construction_mode = enabled;
        Ok(Event::ConstructionModeChanged {
            token: self.address,
            enabled,
        })
    }

    // ── Internal ─────────────────────────────────────────────────────────────

    fn debit(&mut self, holder: &Address, amount: Balance) -> Result<(), BlasterError> {
        let have = self.balance_of(holder);
        let left = have
            .checked_sub(amount)
            .ok_or(BlasterError::InsufficientBalance { need: amount, have })?;
        if left == 0 {
            self.balances.remove(holder);
        } else {
            self.balances.insert(*holder, left);
        }
        Ok(())
    }

    fn credit(&mut self, holder: &Address, amount: Balance) -> Result<(), BlasterError> {
        if amount == 0 {
            return Ok(());
        }
        let entry = self.balances.entry(*holder).or_insert(0);
        *entry = entry
            .checked_add(amount)
            .ok_or(BlasterError::ArithmeticOverflow("balance"))?;
        Ok(())
    }
}
