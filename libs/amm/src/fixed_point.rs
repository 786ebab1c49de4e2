//! Wide-integer multiply-divide helpers
//!
//! Reserve math multiplies two u64 quantities before dividing, which overflows
//! 64 bits long before the final result does. Every helper here widens to u128
//! and checks the narrowing at the end. No floating point.

use kswap_types::{Result, SwapError};

/// `floor(a * b / c)` with a 128-bit intermediate
pub fn mul_div(a: u64, b: u64, c: u64) -> Result<u64> {
    if c == 0 {
        return Err(SwapError::DivisionByZero);
    }
    let quotient = u128::from(a) * u128::from(b) / u128::from(c);
    u64::try_from(quotient).map_err(|_| SwapError::ArithmeticOverflow)
}

/// `ceil(a * b / c)` with a 128-bit intermediate
pub fn mul_div_ceil(a: u64, b: u64, c: u64) -> Result<u64> {
    if c == 0 {
        return Err(SwapError::DivisionByZero);
    }
    let product = u128::from(a) * u128::from(b);
    let divisor = u128::from(c);
    let quotient = product / divisor + u128::from(product % divisor != 0);
    u64::try_from(quotient).map_err(|_| SwapError::ArithmeticOverflow)
}

/// Exact `floor(a * b / c)` for u128 operands.
///
/// Uses `a = q*c + r` so that `floor(a*b/c) = q*b + floor(r*b/c)` when the
/// direct product does not fit. Fails only if the exact result (or the
/// remainder product) cannot be represented.
pub fn mul_div_u128(a: u128, b: u128, c: u128) -> Result<u128> {
    if c == 0 {
        return Err(SwapError::DivisionByZero);
    }
    if let Some(product) = a.checked_mul(b) {
        return Ok(product / c);
    }

    decompose(a, b, c)
        .or_else(|| decompose(b, a, c))
        .ok_or(SwapError::ArithmeticOverflow)
}

fn decompose(a: u128, b: u128, c: u128) -> Option<u128> {
    let (q, r) = (a / c, a % c);
    let high = q.checked_mul(b)?;
    let low = r.checked_mul(b)? / c;
    high.checked_add(low)
}

/// Integer square root (floor) via Newton's method
pub fn isqrt(value: u128) -> u128 {
    if value < 2 {
        return value;
    }

    // Initial guess 2^ceil(bits/2) is always >= sqrt(value)
    let bits = 128 - value.leading_zeros();
    let mut x = 1u128 << bits.div_ceil(2);
    loop {
        let next = (x + value / x) / 2;
        if next >= x {
            return x;
        }
        x = next;
    }
}
