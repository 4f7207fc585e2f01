use tracing::{debug, info};

use blaster_core::constants::{ROUTER_ADDRESS_DOMAIN, WRAPPED_NATIVE_DOMAIN};
use blaster_core::types::{Address, Balance, Timestamp};
use blaster_state::{Ledger, PairRegistry};

use crate::error::AmmError;
use crate::factory::ConstantProductFactory;
use crate::library;
use crate::pair;
use crate::traits::{AddLiquidity, AddLiquidityNative, AmmFactory, AmmRouter, LiquidityReceipt, SwapExactIn};

/// Reference router over constant-product pairs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConstantProductRouter {
    address: Address,
    factory: ConstantProductFactory,
    wrapped_native: Address,
}

impl ConstantProductRouter {
    /// Router handle with its fixed addresses. Use `deploy` on a fresh
    /// ledger; a ledger restored from storage already carries the wrapped
    /// native asset.
    pub fn new() -> Self {
        Self {
            address: Address::derive(ROUTER_ADDRESS_DOMAIN, &[b"router"]),
            factory: ConstantProductFactory::new(),
            wrapped_native: Address::derive(WRAPPED_NATIVE_DOMAIN, &[]),
        }
    }

    /// Register the wrapped native asset (minted only by the router).
    pub fn deploy(ledger: &mut Ledger) -> Result<Self, AmmError> {
        let router = Self::new();
        ledger.deploy_mintable(router.wrapped_native, "Wrapped Native", "WNATIVE", router.address)?;
        info!(router = %router.address, wrapped_native = %router.wrapped_native, "router deployed");
        Ok(router)
    }

    pub fn factory(&self) -> &ConstantProductFactory {
        &self.factory
    }

    pub fn quote(&self, amount_a: Balance, reserve_a: Balance, reserve_b: Balance) -> Result<Balance, AmmError> {
        library::quote(amount_a, reserve_a, reserve_b)
    }

    pub fn get_amount_out(&self, amount_in: Balance, reserve_in: Balance, reserve_out: Balance) -> Result<Balance, AmmError> {
        library::get_amount_out(amount_in, reserve_in, reserve_out)
    }

    pub fn get_amount_in(&self, amount_out: Balance, reserve_in: Balance, reserve_out: Balance) -> Result<Balance, AmmError> {
        library::get_amount_in(amount_out, reserve_in, reserve_out)
    }

    /// Deposit native currency and receive the same amount of the wrapped
    /// asset.
    pub fn wrap_native(&self, ledger: &mut Ledger, caller: &Address, amount: Balance) -> Result<(), AmmError> {
        ledger.atomic(|l| {
            l.transfer_native(caller, &self.wrapped_native, amount)?;
            l.mint(&self.wrapped_native, &self.address, caller, amount)?;
            Ok(())
        })
    }

    // ── Internal ─────────────────────────────────────────────────────────────

    fn ensure(ledger: &Ledger, deadline: Timestamp) -> Result<(), AmmError> {
        if ledger.now() > deadline {
            return Err(AmmError::Expired { deadline, now: ledger.now() });
        }
        Ok(())
    }

    /// Reserves of the pair of `a` and `b`, ordered as (a, b).
    fn reserves_for(&self, ledger: &Ledger, a: &Address, b: &Address) -> Result<(Balance, Balance), AmmError> {
        let pair = self
            .factory
            .get_pair(ledger, a, b)
            .ok_or(AmmError::PairNotFound(*a, *b))?;
        let (r0, r1, _) = pair::get_reserves(ledger, &pair)?;
        let (t0, _) = PairRegistry::sort_tokens(*a, *b);
        Ok(if *a == t0 { (r0, r1) } else { (r1, r0) })
    }

    /// Amounts to deposit given the current price. Creates the pair when it
    /// does not exist yet.
    fn liquidity_amounts(
        &self,
        ledger: &mut Ledger,
        token_a: Address,
        token_b: Address,
        a_desired: Balance,
        b_desired: Balance,
        a_min: Balance,
        b_min: Balance,
    ) -> Result<(Balance, Balance), AmmError> {
        if self.factory.get_pair(ledger, &token_a, &token_b).is_none() {
            self.factory.create_pair(ledger, token_a, token_b)?;
        }
        let (reserve_a, reserve_b) = self.reserves_for(ledger, &token_a, &token_b)?;
        if reserve_a == 0 && reserve_b == 0 {
            return Ok((a_desired, b_desired));
        }
        let b_optimal = library::quote(a_desired, reserve_a, reserve_b)?;
        if b_optimal <= b_desired {
            if b_optimal < b_min {
                return Err(AmmError::InsufficientAmount("B"));
            }
            return Ok((a_desired, b_optimal));
        }
        let a_optimal = library::quote(b_desired, reserve_b, reserve_a)?;
        if a_optimal > a_desired || a_optimal < a_min {
            return Err(AmmError::InsufficientAmount("A"));
        }
        Ok((a_optimal, b_desired))
    }

    fn pair_of(&self, ledger: &Ledger, a: &Address, b: &Address) -> Result<Address, AmmError> {
        self.factory.get_pair(ledger, a, b).ok_or(AmmError::PairNotFound(*a, *b))
    }

    /// Pay out `amounts` hop by hop; the input already sits in the first pair.
    fn swap_hops(&self, ledger: &mut Ledger, amounts: &[Balance], path: &[Address], to: &Address) -> Result<(), AmmError> {
        for i in 0..path.len() - 1 {
            let (input, output) = (path[i], path[i + 1]);
            let (token0, _) = PairRegistry::sort_tokens(input, output);
            let amount_out = amounts[i + 1];
            let (out0, out1) = if input == token0 { (0, amount_out) } else { (amount_out, 0) };
            let recipient = if i < path.len() - 2 {
                self.pair_of(ledger, &output, &path[i + 2])?
            } else {
                *to
            };
            let pair = self.pair_of(ledger, &input, &output)?;
            pair::swap(ledger, &pair, out0, out1, &recipient)?;
        }
        Ok(())
    }

    /// Like `swap_hops`, but each hop's input is whatever the pair holds
    /// beyond its reserve.
    fn swap_hops_supporting_fee(&self, ledger: &mut Ledger, path: &[Address], to: &Address) -> Result<(), AmmError> {
        for i in 0..path.len() - 1 {
            let (input, output) = (path[i], path[i + 1]);
            let (token0, _) = PairRegistry::sort_tokens(input, output);
            let pair = self.pair_of(ledger, &input, &output)?;
            let (reserve_in, reserve_out) = self.reserves_for(ledger, &input, &output)?;
            let amount_in = ledger.balance_of(&input, &pair).saturating_sub(reserve_in);
            let amount_out = library::get_amount_out(amount_in, reserve_in, reserve_out)?;
            let (out0, out1) = if input == token0 { (0, amount_out) } else { (amount_out, 0) };
            let recipient = if i < path.len() - 2 {
                self.pair_of(ledger, &output, &path[i + 2])?
            } else {
                *to
            };
            pair::swap(ledger, &pair, out0, out1, &recipient)?;
        }
        Ok(())
    }
}

impl Default for ConstantProductRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl AmmRouter for ConstantProductRouter {
    fn address(&self) -> Address {
        self.address
    }

    fn wrapped_native(&self) -> Address {
        self.wrapped_native
    }

    fn get_pair(&self, ledger: &Ledger, token_a: &Address, token_b: &Address) -> Option<Address> {
        self.factory.get_pair(ledger, token_a, token_b)
    }

    fn add_liquidity(
        &self,
        ledger: &mut Ledger,
        caller: &Address,
        args: &AddLiquidity,
    ) -> Result<LiquidityReceipt, AmmError> {
        Self::ensure(ledger, args.deadline)?;
        ledger.atomic(|l| {
            let (amount_a, amount_b) = self.liquidity_amounts(
                l,
                args.token_a,
                args.token_b,
                args.amount_a_desired,
                args.amount_b_desired,
                args.amount_a_min,
                args.amount_b_min,
            )?;
            let pair = self.pair_of(l, &args.token_a, &args.token_b)?;
            l.transfer_from(&args.token_a, &self.address, caller, &pair, amount_a)?;
            l.transfer_from(&args.token_b, &self.address, caller, &pair, amount_b)?;
            let liquidity = pair::mint(l, &pair, &args.to)?;
            debug!(%pair, amount_a, amount_b, liquidity, "liquidity added");
            Ok(LiquidityReceipt { pair, amount_a, amount_b, liquidity })
        })
    }

    fn add_liquidity_native(
        &self,
        ledger: &mut Ledger,
        caller: &Address,
        args: &AddLiquidityNative,
        value: Balance,
    ) -> Result<LiquidityReceipt, AmmError> {
        Self::ensure(ledger, args.deadline)?;
        ledger.atomic(|l| {
            let (amount_token, amount_native) = self.liquidity_amounts(
                l,
                args.token,
                self.wrapped_native,
                args.amount_token_desired,
                value,
                args.amount_token_min,
                args.amount_native_min,
            )?;
            let pair = self.pair_of(l, &args.token, &self.wrapped_native)?;
            l.transfer_from(&args.token, &self.address, caller, &pair, amount_token)?;
            l.transfer_native(caller, &self.wrapped_native, amount_native)?;
            l.mint(&self.wrapped_native, &self.address, &pair, amount_native)?;
            let liquidity = pair::mint(l, &pair, &args.to)?;
            debug!(%pair, amount_token, amount_native, liquidity, "native liquidity added");
            Ok(LiquidityReceipt { pair, amount_a: amount_token, amount_b: amount_native, liquidity })
        })
    }

    fn get_amounts_out(&self, ledger: &Ledger, amount_in: Balance, path: &[Address]) -> Result<Vec<Balance>, AmmError> {
        if path.len() < 2 {
            return Err(AmmError::InvalidPath);
        }
        let mut amounts = Vec::with_capacity(path.len());
        amounts.push(amount_in);
        for hop in path.windows(2) {
            let (reserve_in, reserve_out) = self.reserves_for(ledger, &hop[0], &hop[1])?;
            let prev = amounts[amounts.len() - 1];
            amounts.push(library::get_amount_out(prev, reserve_in, reserve_out)?);
        }
        Ok(amounts)
    }

    fn swap_exact_tokens_for_tokens(
        &self,
        ledger: &mut Ledger,
        caller: &Address,
        args: &SwapExactIn,
    ) -> Result<Vec<Balance>, AmmError> {
        Self::ensure(ledger, args.deadline)?;
        let amounts = self.get_amounts_out(ledger, args.amount_in, &args.path)?;
        if amounts[amounts.len() - 1] < args.amount_out_min {
            return Err(AmmError::InsufficientOutputAmount);
        }
        ledger.atomic(|l| {
            let first = self.pair_of(l, &args.path[0], &args.path[1])?;
            l.transfer_from(&args.path[0], &self.address, caller, &first, amounts[0])?;
            self.swap_hops(l, &amounts, &args.path, &args.to)?;
            Ok(amounts)
        })
    }

    fn swap_exact_tokens_for_tokens_supporting_fee_on_transfer_tokens(
        &self,
        ledger: &mut Ledger,
        caller: &Address,
        args: &SwapExactIn,
    ) -> Result<Balance, AmmError> {
        Self::ensure(ledger, args.deadline)?;
        if args.path.len() < 2 {
            return Err(AmmError::InvalidPath);
        }
        let last = args.path[args.path.len() - 1];
        ledger.atomic(|l| {
            let before = l.balance_of(&last, &args.to);
            let first = self.pair_of(l, &args.path[0], &args.path[1])?;
            l.transfer_from(&args.path[0], &self.address, caller, &first, args.amount_in)?;
            self.swap_hops_supporting_fee(l, &args.path, &args.to)?;
            let received = l.balance_of(&last, &args.to).saturating_sub(before);
            if received < args.amount_out_min {
                return Err(AmmError::InsufficientOutputAmount);
            }
            Ok(received)
        })
    }
}
