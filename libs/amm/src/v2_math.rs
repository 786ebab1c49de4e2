//! Constant-product (x*y=k) swap math with exact integer rounding
//!
//! Output amounts round down and exact-output input amounts round up, so
//! integer truncation only ever costs the trader. Fees are expressed in
//! basis points out of 10_000 and must be strictly below 10_000.

use crate::fixed_point::{mul_div, mul_div_u128};
use kswap_types::{Result, SwapError, BPS_DENOMINATOR};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// V2 AMM math functions
pub struct V2Math;

impl V2Math {
    /// Reject fee rates that would consume the whole input
    pub fn validate_fee(fee_bps: u32) -> Result<()> {
        if fee_bps >= BPS_DENOMINATOR {
            return Err(SwapError::InvalidFee { fee_bps });
        }
        Ok(())
    }

    /// `floor(amount_in * (10000 - fee_bps) / 10000)`
    pub fn amount_in_with_fee(amount_in: u64, fee_bps: u32) -> Result<u64> {
        Self::validate_fee(fee_bps)?;
        mul_div(
            amount_in,
            u64::from(BPS_DENOMINATOR - fee_bps),
            u64::from(BPS_DENOMINATOR),
        )
    }

    /// Portion of `amount_in` kept as fee
    pub fn fee_amount(amount_in: u64, fee_bps: u32) -> Result<u64> {
        Ok(amount_in - Self::amount_in_with_fee(amount_in, fee_bps)?)
    }

    /// Exact-input quote: output for `amount_in` sold into the pool
    ///
    /// # Arguments
    /// * `amount_in` - Input amount, must be positive
    /// * `reserve_in` - Input-side reserve, must be positive
    /// * `reserve_out` - Output-side reserve, must be positive
    /// * `fee_bps` - Fee in basis points (30 = 0.3%)
    ///
    /// # Returns
    /// Output amount, always strictly below `reserve_out`
    pub fn get_amount_out(
        amount_in: u64,
        reserve_in: u64,
        reserve_out: u64,
        fee_bps: u32,
    ) -> Result<u64> {
        Self::validate_fee(fee_bps)?;
        if amount_in == 0 {
            return Err(SwapError::ZeroAmount);
        }
        if reserve_in == 0 || reserve_out == 0 {
            return Err(SwapError::InsufficientLiquidity {
                requested: amount_in,
                available: 0,
            });
        }

        let amount_in_with_fee = Self::amount_in_with_fee(amount_in, fee_bps)?;

        // out = in_with_fee * reserve_out / (reserve_in + in_with_fee)
        let numerator = u128::from(amount_in_with_fee);
        let denominator = u128::from(reserve_in) + u128::from(amount_in_with_fee);
        let amount_out = mul_div_u128(numerator, u128::from(reserve_out), denominator)?;

        u64::try_from(amount_out).map_err(|_| SwapError::ArithmeticOverflow)
    }

    /// Exact-output quote: input required to receive `amount_out`
    ///
    /// `floor(reserve_in * amount_out * 10000 / ((reserve_out - amount_out) * (10000 - fee))) + 1`
    ///
    /// The trailing `+ 1` is mandatory: it keeps the pool from being
    /// shortchanged by the floor division.
    pub fn get_amount_in(
        amount_out: u64,
        reserve_in: u64,
        reserve_out: u64,
        fee_bps: u32,
    ) -> Result<u64> {
        Self::validate_fee(fee_bps)?;
        if amount_out == 0 {
            return Err(SwapError::ZeroAmount);
        }
        if reserve_in == 0 || reserve_out == 0 {
            return Err(SwapError::InsufficientLiquidity {
                requested: amount_out,
                available: reserve_out.min(reserve_in),
            });
        }
        if amount_out >= reserve_out {
            return Err(SwapError::InsufficientOutput {
                requested: amount_out,
                reserve_out,
            });
        }

        let numerator = u128::from(reserve_in) * u128::from(amount_out);
        let denominator =
            u128::from(reserve_out - amount_out) * u128::from(BPS_DENOMINATOR - fee_bps);
        let quotient = mul_div_u128(numerator, u128::from(BPS_DENOMINATOR), denominator)?;

        quotient
            .checked_add(1)
            .and_then(|amount_in| u64::try_from(amount_in).ok())
            .ok_or(SwapError::ArithmeticOverflow)
    }

    /// Marginal price `reserve_out / reserve_in` (display only)
    pub fn get_price(reserve_in: u64, reserve_out: u64) -> Result<Decimal> {
        if reserve_in == 0 || reserve_out == 0 {
            return Err(SwapError::InsufficientLiquidity {
                requested: 0,
                available: 0,
            });
        }
        Ok(Decimal::from(reserve_out) / Decimal::from(reserve_in))
    }

    /// Price impact of selling `amount_in`, in basis points (floor)
    pub fn price_impact_bps(
        amount_in: u64,
        reserve_in: u64,
        reserve_out: u64,
        fee_bps: u32,
    ) -> Result<u32> {
        let amount_out = Self::get_amount_out(amount_in, reserve_in, reserve_out, fee_bps)?;
        Self::impact_between(
            (u128::from(reserve_in), u128::from(reserve_out)),
            (
                u128::from(reserve_in) + u128::from(amount_in),
                u128::from(reserve_out - amount_out),
            ),
        )
    }

    /// Relative drop of `reserve_out/reserve_in` between two reserve states
    pub fn impact_between(before: (u128, u128), after: (u128, u128)) -> Result<u32> {
        if before.0 == 0 || after.0 == 0 {
            return Err(SwapError::DivisionByZero);
        }

        let price_before = Self::ratio(before.1, before.0)?;
        let price_after = Self::ratio(after.1, after.0)?;
        if price_before.is_zero() || price_after >= price_before {
            return Ok(0);
        }

        let impact = (price_before - price_after) / price_before * dec!(10000);
        impact
            .floor()
            .to_u32()
            .ok_or(SwapError::ArithmeticOverflow)
    }

    fn ratio(numerator: u128, denominator: u128) -> Result<Decimal> {
        let numerator = Decimal::from_u128(numerator).ok_or(SwapError::ArithmeticOverflow)?;
        let denominator = Decimal::from_u128(denominator).ok_or(SwapError::ArithmeticOverflow)?;
        numerator
            .checked_div(denominator)
            .ok_or(SwapError::DivisionByZero)
    }
}
