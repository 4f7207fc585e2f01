use blaster_core::types::{Address, Balance, Timestamp};
use blaster_state::Ledger;

use crate::error::AmmError;

/// Arguments of a two-token liquidity deposit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AddLiquidity {
    pub token_a: Address,
    pub token_b: Address,
    pub amount_a_desired: Balance,
    pub amount_b_desired: Balance,
    pub amount_a_min: Balance,
    pub amount_b_min: Balance,
    /// Receives the pool shares.
    pub to: Address,
    pub deadline: Timestamp,
}

/// Arguments of a token + native-currency liquidity deposit. The native side
/// is the value attached to the call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AddLiquidityNative {
    pub token: Address,
    pub amount_token_desired: Balance,
    pub amount_token_min: Balance,
    pub amount_native_min: Balance,
    pub to: Address,
    pub deadline: Timestamp,
}

/// Exact-input swap along `path`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SwapExactIn {
    pub amount_in: Balance,
    pub amount_out_min: Balance,
    pub path: Vec<Address>,
    pub to: Address,
    pub deadline: Timestamp,
}

/// What a liquidity deposit settled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LiquidityReceipt {
    pub pair: Address,
    /// Amount of the first named token (or the token, for native deposits)
    /// actually taken.
    pub amount_a: Balance,
    pub amount_b: Balance,
    /// Pool shares credited to `to`.
    pub liquidity: Balance,
}

/// Pair factory.
pub trait AmmFactory {
    fn address(&self) -> Address;

    fn all_pairs_length(&self, ledger: &Ledger) -> u64;

    fn all_pairs(&self, ledger: &Ledger, index: u64) -> Option<Address>;

    fn get_pair(&self, ledger: &Ledger, token_a: &Address, token_b: &Address) -> Option<Address>;

    fn create_pair(&self, ledger: &mut Ledger, token_a: Address, token_b: Address) -> Result<Address, AmmError>;

    fn get_reserves(&self, ledger: &Ledger, pair: &Address) -> Result<(Balance, Balance, Timestamp), AmmError>;

    fn token0(&self, ledger: &Ledger, pair: &Address) -> Result<Address, AmmError>;
}

/// Liquidity and swap entry points. Every mutating call is all-or-nothing.
pub trait AmmRouter {
    fn address(&self) -> Address;

    fn wrapped_native(&self) -> Address;

    fn get_pair(&self, ledger: &Ledger, token_a: &Address, token_b: &Address) -> Option<Address>;

    fn add_liquidity(
        &self,
        ledger: &mut Ledger,
        caller: &Address,
        args: &AddLiquidity,
    ) -> Result<LiquidityReceipt, AmmError>;

    /// `value` is the native currency the caller attaches; only the amount
    /// the pool accepts leaves the caller.
    fn add_liquidity_native(
        &self,
        ledger: &mut Ledger,
        caller: &Address,
        args: &AddLiquidityNative,
        value: Balance,
    ) -> Result<LiquidityReceipt, AmmError>;

    fn get_amounts_out(&self, ledger: &Ledger, amount_in: Balance, path: &[Address]) -> Result<Vec<Balance>, AmmError>;

    fn swap_exact_tokens_for_tokens(
        &self,
        ledger: &mut Ledger,
        caller: &Address,
        args: &SwapExactIn,
    ) -> Result<Vec<Balance>, AmmError>;

    /// Variant that prices each hop from what the pair actually received,
    /// for tokens that take a fee on transfer. Returns the amount `to`
    /// actually received.
    fn swap_exact_tokens_for_tokens_supporting_fee_on_transfer_tokens(
        &self,
        ledger: &mut Ledger,
        caller: &Address,
        args: &SwapExactIn,
    ) -> Result<Balance, AmmError>;
}
