//! Pool trait definitions for a unified pricing interface

use crate::V2Math;
use kswap_types::{Result, SwapQuote};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Read-only copy of a pool's reserves, oriented for one trade direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReserveSnapshot {
    pub reserve_in: u64,
    pub reserve_out: u64,
    pub fee_bps: u32, // Fee in basis points (30 = 0.3%)
}

impl ReserveSnapshot {
    pub fn new(reserve_in: u64, reserve_out: u64, fee_bps: u32) -> Self {
        Self {
            reserve_in,
            reserve_out,
            fee_bps,
        }
    }

    /// Both reserves nonzero
    pub fn is_tradeable(&self) -> bool {
        self.reserve_in > 0 && self.reserve_out > 0
    }

    /// Product of reserves (the K invariant)
    pub fn k(&self) -> u128 {
        u128::from(self.reserve_in) * u128::from(self.reserve_out)
    }
}

/// Unified pool pricing interface
pub trait AmmPool {
    /// Calculate output amount for given input
    fn get_amount_out(&self, amount_in: u64) -> Result<u64>;

    /// Calculate required input for desired output
    fn get_amount_in(&self, amount_out: u64) -> Result<u64>;

    /// Get current reserves as `(reserve_in, reserve_out)`
    fn get_liquidity(&self) -> (u64, u64);

    /// Get fee tier
    fn get_fee_bps(&self) -> u32;

    /// Marginal price of the input asset in output units
    fn get_price(&self) -> Result<Decimal> {
        let (reserve_in, reserve_out) = self.get_liquidity();
        V2Math::get_price(reserve_in, reserve_out)
    }

    /// Full quote for selling exactly `amount_in`
    fn quote_exact_input(&self, amount_in: u64) -> Result<SwapQuote> {
        let (reserve_in, reserve_out) = self.get_liquidity();
        let amount_out = self.get_amount_out(amount_in)?;
        Ok(SwapQuote {
            amount_in,
            amount_out,
            fee_amount: V2Math::fee_amount(amount_in, self.get_fee_bps())?,
            price_impact_bps: post_trade_impact(reserve_in, reserve_out, amount_in, amount_out)?,
        })
    }

    /// Full quote for buying exactly `amount_out`
    fn quote_exact_output(&self, amount_out: u64) -> Result<SwapQuote> {
        let (reserve_in, reserve_out) = self.get_liquidity();
        let amount_in = self.get_amount_in(amount_out)?;
        Ok(SwapQuote {
            amount_in,
            amount_out,
            fee_amount: V2Math::fee_amount(amount_in, self.get_fee_bps())?,
            price_impact_bps: post_trade_impact(reserve_in, reserve_out, amount_in, amount_out)?,
        })
    }
}

fn post_trade_impact(reserve_in: u64, reserve_out: u64, amount_in: u64, amount_out: u64) -> Result<u32> {
    V2Math::impact_between(
        (u128::from(reserve_in), u128::from(reserve_out)),
        (
            u128::from(reserve_in) + u128::from(amount_in),
            u128::from(reserve_out.saturating_sub(amount_out)),
        ),
    )
}

impl AmmPool for ReserveSnapshot {
    fn get_amount_out(&self, amount_in: u64) -> Result<u64> {
        V2Math::get_amount_out(amount_in, self.reserve_in, self.reserve_out, self.fee_bps)
    }

    fn get_amount_in(&self, amount_out: u64) -> Result<u64> {
        V2Math::get_amount_in(amount_out, self.reserve_in, self.reserve_out, self.fee_bps)
    }

    fn get_liquidity(&self) -> (u64, u64) {
        (self.reserve_in, self.reserve_out)
    }

    fn get_fee_bps(&self) -> u32 {
        self.fee_bps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kswap_types::SwapError;

    #[test]
    fn test_snapshot_quotes() {
        let pool = ReserveSnapshot::new(1000, 2000, 30);

        let quote = pool.quote_exact_input(100).unwrap();
        assert_eq!(quote.amount_out, 180);
        assert_eq!(quote.fee_amount, 1);
        assert_eq!(quote.price_impact_bps, 1727);

        let quote = pool.quote_exact_output(180).unwrap();
        assert_eq!(quote.amount_in, 100);
        assert_eq!(quote.amount_out, 180);
    }

    #[test]
    fn test_quotes_are_pure() {
        let pool = ReserveSnapshot::new(5_000, 7_000, 25);
        assert_eq!(pool.quote_exact_input(321), pool.quote_exact_input(321));
        assert_eq!(pool.get_amount_in(77), pool.get_amount_in(77));
        assert_eq!(pool, ReserveSnapshot::new(5_000, 7_000, 25));
    }

    #[test]
    fn test_untradeable_snapshot() {
        let pool = ReserveSnapshot::new(0, 2000, 30);
        assert!(!pool.is_tradeable());
        assert!(matches!(
            pool.quote_exact_input(1),
            Err(SwapError::InsufficientLiquidity { .. })
        ));
    }

    #[test]
    fn test_k() {
        assert_eq!(ReserveSnapshot::new(1000, 2000, 30).k(), 2_000_000);
        assert_eq!(
            ReserveSnapshot::new(u64::MAX, u64::MAX, 0).k(),
            u128::from(u64::MAX) * u128::from(u64::MAX)
        );
    }
}
