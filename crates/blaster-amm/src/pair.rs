//! Pair-level operations. A pair holds its two tokens as ordinary balances on
//! the ledger and tracks reserves separately; anything sent to the pair beyond
//! its reserves is the input of the next `mint` or `swap`.

use tracing::debug;

use blaster_core::constants::{AMM_FEE_DENOMINATOR, AMM_FEE_NUMERATOR, MINIMUM_LIQUIDITY};
use blaster_core::event::Event;
use blaster_core::types::{Address, Balance, Timestamp};
use blaster_state::{Ledger, PairRecord};

use crate::error::AmmError;
use crate::library::{narrow, sqrt_wide, wide, MAX_RESERVE};

fn record(ledger: &Ledger, pair: &Address) -> Result<PairRecord, AmmError> {
    ledger
        .pairs()
        .get(pair)
        .cloned()
        .ok_or(AmmError::UnknownPair(*pair))
}

/// (reserve0, reserve1, last update timestamp).
pub fn get_reserves(ledger: &Ledger, pair: &Address) -> Result<(Balance, Balance, Timestamp), AmmError> {
    let r = record(ledger, pair)?;
    Ok((r.reserve0, r.reserve1, r.block_timestamp_last))
}

pub fn token0(ledger: &Ledger, pair: &Address) -> Result<Address, AmmError> {
    Ok(record(ledger, pair)?.token0)
}

fn update(ledger: &mut Ledger, pair: &Address, balance0: Balance, balance1: Balance) -> Result<(), AmmError> {
    if balance0 > MAX_RESERVE || balance1 > MAX_RESERVE {
        return Err(AmmError::Overflow);
    }
    let now = ledger.now();
    let r = ledger
        .pairs_mut()
        .get_mut(pair)
        .ok_or(AmmError::UnknownPair(*pair))?;
    r.reserve0 = balance0;
    r.reserve1 = balance1;
    r.block_timestamp_last = now;
    ledger.emit(Event::Sync { pair: *pair, reserve0: balance0, reserve1: balance1 });
    Ok(())
}

/// Mint pool shares to `to` for whatever was deposited since the last sync.
pub fn mint(ledger: &mut Ledger, pair: &Address, to: &Address) -> Result<Balance, AmmError> {
    let r = record(ledger, pair)?;
    let balance0 = ledger.balance_of(&r.token0, pair);
    let balance1 = ledger.balance_of(&r.token1, pair);
    let amount0 = balance0.saturating_sub(r.reserve0);
    let amount1 = balance1.saturating_sub(r.reserve1);

    let total_supply = ledger.total_supply(pair)?;
    let liquidity = if total_supply == 0 {
        let root = narrow(sqrt_wide(wide(amount0) * wide(amount1)))?;
        let liquidity = root
            .checked_sub(MINIMUM_LIQUIDITY)
            .ok_or(AmmError::InsufficientLiquidityMinted)?;
        // first shares are parked at the zero address forever
        ledger.mint(pair, pair, &Address::ZERO, MINIMUM_LIQUIDITY)?;
        liquidity
    } else {
        let by0 = narrow(wide(amount0) * wide(total_supply) / wide(r.reserve0))?;
        let by1 = narrow(wide(amount1) * wide(total_supply) / wide(r.reserve1))?;
        by0.min(by1)
    };
    if liquidity == 0 {
        return Err(AmmError::InsufficientLiquidityMinted);
    }
    ledger.mint(pair, pair, to, liquidity)?;
    update(ledger, pair, balance0, balance1)?;
    debug!(%pair, %to, amount0, amount1, liquidity, "liquidity minted");
    Ok(liquidity)
}

/// Send out the requested amounts, then require the fee-adjusted product of
/// the new balances to be no smaller than the old reserves' product.
pub fn swap(
    ledger: &mut Ledger,
    pair: &Address,
    amount0_out: Balance,
    amount1_out: Balance,
    to: &Address,
) -> Result<(), AmmError> {
    if amount0_out == 0 && amount1_out == 0 {
        return Err(AmmError::InsufficientOutputAmount);
    }
    let r = record(ledger, pair)?;
    if amount0_out >= r.reserve0 || amount1_out >= r.reserve1 {
        return Err(AmmError::InsufficientLiquidity);
    }
    if *to == r.token0 || *to == r.token1 {
        return Err(AmmError::InvalidTo(*to));
    }

    if amount0_out > 0 {
        ledger.transfer(&r.token0, pair, to, amount0_out)?;
    }
    if amount1_out > 0 {
        ledger.transfer(&r.token1, pair, to, amount1_out)?;
    }
    let balance0 = ledger.balance_of(&r.token0, pair);
    let balance1 = ledger.balance_of(&r.token1, pair);

    let amount0_in = balance0.saturating_sub(r.reserve0 - amount0_out);
    let amount1_in = balance1.saturating_sub(r.reserve1 - amount1_out);
    if amount0_in == 0 && amount1_in == 0 {
        return Err(AmmError::InsufficientInputAmount);
    }
    if balance0 > MAX_RESERVE || balance1 > MAX_RESERVE {
        return Err(AmmError::Overflow);
    }

    let fee = wide(AMM_FEE_DENOMINATOR - AMM_FEE_NUMERATOR);
    let scale = wide(AMM_FEE_DENOMINATOR);
    let adjusted0 = wide(balance0) * scale - wide(amount0_in) * fee;
    let adjusted1 = wide(balance1) * scale - wide(amount1_in) * fee;
    if adjusted0 * adjusted1 < wide(r.reserve0) * wide(r.reserve1) * scale * scale {
        return Err(AmmError::K);
    }

    update(ledger, pair, balance0, balance1)?;
    debug!(%pair, amount0_in, amount1_in, amount0_out, amount1_out, %to, "swap");
    Ok(())
}

/// Force reserves to match balances.
pub fn sync(ledger: &mut Ledger, pair: &Address) -> Result<(), AmmError> {
    let r = record(ledger, pair)?;
    let balance0 = ledger.balance_of(&r.token0, pair);
    let balance1 = ledger.balance_of(&r.token1, pair);
    update(ledger, pair, balance0, balance1)
}
