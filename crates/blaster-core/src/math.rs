//! Integer fixed-point helpers. Every rate and vesting computation in the
//! protocol goes through `mul_div_floor`, so rounding is identical everywhere.

use crate::constants::BASIS_POINTS_DENOMINATOR;
use crate::error::BlasterError;
use crate::types::{Balance, BasisPoints};

/// floor(a × b / c), exact, without a 256-bit intermediate.
///
/// Falls back to `a = q·c + r ⇒ a·b/c = q·b + r·b/c` when `a·b` overflows,
/// which covers every call site where `b ≤ c`.
pub fn mul_div_floor(
    a: u128,
    b: u128,
    c: u128,
    context: &'static str,
) -> Result<u128, BlasterError> {
    if c == 0 {
        return Err(BlasterError::ArithmeticOverflow(context));
    }
    if let Some(product) = a.checked_mul(b) {
        return Ok(product / c);
    }
    let q = a / c;
    let r = a % c;
    let whole = q
        .checked_mul(b)
        .ok_or(BlasterError::ArithmeticOverflow(context))?;
    let part = r
        .checked_mul(b)
        .ok_or(BlasterError::ArithmeticOverflow(context))?
        / c;
    whole
        .checked_add(part)
        .ok_or(BlasterError::ArithmeticOverflow(context))
}

/// floor(amount × bps / 10000).
pub fn bps_of(amount: Balance, bps: BasisPoints) -> Result<Balance, BlasterError> {
    mul_div_floor(amount, bps as u128, BASIS_POINTS_DENOMINATOR, "basis points")
}
