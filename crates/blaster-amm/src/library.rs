//! Pure constant-product math. Intermediate products are taken in 256 bits
//! so no input that fits the reserve cap can overflow.

use ethnum::U256;

use blaster_core::constants::{AMM_FEE_DENOMINATOR, AMM_FEE_NUMERATOR};
use blaster_core::types::Balance;

use crate::error::AmmError;

/// Reserves are capped at 2^112 − 1 so fee-adjusted balance products fit in
/// 256 bits.
pub const MAX_RESERVE: Balance = (1u128 << 112) - 1;

pub(crate) fn wide(x: u128) -> U256 {
    U256::new(x)
}

pub(crate) fn narrow(x: U256) -> Result<u128, AmmError> {
    if x > wide(u128::MAX) {
        return Err(AmmError::Overflow);
    }
    Ok(x.as_u128())
}

/// Floor square root of a 256-bit value.
pub(crate) fn sqrt_wide(n: U256) -> U256 {
    let two = wide(2);
    if n < two {
        return n;
    }
    let mut x = n;
    let mut y = n / two + U256::ONE;
    while y < x {
        x = y;
        y = (x + n / x) / two;
    }
    x
}

/// Amount of B equivalent to `amount_a` at the current price.
pub fn quote(amount_a: Balance, reserve_a: Balance, reserve_b: Balance) -> Result<Balance, AmmError> {
    if amount_a == 0 {
        return Err(AmmError::InsufficientAmount("input"));
    }
    if reserve_a == 0 || reserve_b == 0 {
        return Err(AmmError::InsufficientLiquidity);
    }
    narrow(wide(amount_a) * wide(reserve_b) / wide(reserve_a))
}

/// Maximum output for an exact input, after the 0.3% fee.
pub fn get_amount_out(amount_in: Balance, reserve_in: Balance, reserve_out: Balance) -> Result<Balance, AmmError> {
    if amount_in == 0 {
        return Err(AmmError::InsufficientInputAmount);
    }
    if reserve_in == 0 || reserve_out == 0 {
        return Err(AmmError::InsufficientLiquidity);
    }
    let amount_in_with_fee = wide(amount_in) * wide(AMM_FEE_NUMERATOR);
    let numerator = amount_in_with_fee * wide(reserve_out);
    let denominator = wide(reserve_in) * wide(AMM_FEE_DENOMINATOR) + amount_in_with_fee;
    narrow(numerator / denominator)
}

/// Minimum input for an exact output, after the 0.3% fee.
pub fn get_amount_in(amount_out: Balance, reserve_in: Balance, reserve_out: Balance) -> Result<Balance, AmmError> {
    if amount_out == 0 {
        return Err(AmmError::InsufficientOutputAmount);
    }
    if reserve_in == 0 || reserve_out <= amount_out {
        return Err(AmmError::InsufficientLiquidity);
    }
    let numerator = wide(reserve_in) * wide(amount_out) * wide(AMM_FEE_DENOMINATOR);
    let denominator = wide(reserve_out - amount_out) * wide(AMM_FEE_NUMERATOR);
    narrow(numerator / denominator + U256::ONE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amount_out_matches_reference_values() {
        assert_eq!(get_amount_out(3_000, 10_000, 10_000).unwrap(), 2_302);
        assert_eq!(get_amount_out(2_700, 10_000, 10_000).unwrap(), 2_120);
        assert_eq!(get_amount_out(2_400, 10_000, 10_000).unwrap(), 1_930);
    }

    #[test]
    fn amount_in_inverts_amount_out() {
        let out = get_amount_out(3_000, 10_000, 10_000).unwrap();
        let needed = get_amount_in(out, 10_000, 10_000).unwrap();
        assert!(needed <= 3_000);
        assert!(get_amount_out(needed, 10_000, 10_000).unwrap() >= out);
    }

    #[test]
    fn quote_is_proportional() {
        assert_eq!(quote(100, 1_000, 4_000).unwrap(), 400);
        assert!(matches!(quote(0, 1, 1), Err(AmmError::InsufficientAmount(_))));
        assert!(matches!(quote(1, 0, 1), Err(AmmError::InsufficientLiquidity)));
    }

    #[test]
    fn empty_pool_has_no_output() {
        assert!(matches!(get_amount_out(1, 0, 10), Err(AmmError::InsufficientLiquidity)));
        assert!(matches!(get_amount_out(0, 10, 10), Err(AmmError::InsufficientInputAmount)));
    }

    #[test]
    fn wide_sqrt() {
        assert_eq!(sqrt_wide(wide(0)), wide(0));
        assert_eq!(sqrt_wide(wide(1)), wide(1));
        assert_eq!(sqrt_wide(wide(99)), wide(9));
        let n = wide(8_000_000) * wide(1_000_000_000_000_000_000);
        assert_eq!(sqrt_wide(n), wide(2_828_427_124_746));
        let big = wide(MAX_RESERVE) * wide(MAX_RESERVE);
        assert_eq!(sqrt_wide(big), wide(MAX_RESERVE));
    }
}
