//! Single pool state
//!
//! A [`Pool`] is only ever mutated by its ledger while the pool's lock is
//! held. Outside the ledger a pool is read-only: trades are settled on a copy
//! with [`Pool::settle_swap`] and handed back through
//! [`PoolGuards::commit`](crate::PoolGuards::commit), which accepts the copy
//! only if it descends from the current state and keeps K.

use kswap_amm::{isqrt, mul_div, ReserveSnapshot};
use kswap_types::{Direction, PairId, Result, SwapError};
use serde::Serialize;

/// Complete state of a single pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pool {
    pair: PairId,

    // Tradeable reserves, canonical order
    reserve0: u64,
    reserve1: u64,

    lp_token_supply: u64,

    // Set aside for the protocol, never tradeable
    protocol_fee0: u64,
    protocol_fee1: u64,

    fee_bps: u32,
    halted: bool,

    /// Bumped by every committed mutation
    sequence: u64,
}

impl Pool {
    /// Create an empty pool
    pub(crate) fn new(pair: PairId, fee_bps: u32) -> Self {
        Self {
            pair,
            reserve0: 0,
            reserve1: 0,
            lp_token_supply: 0,
            protocol_fee0: 0,
            protocol_fee1: 0,
            fee_bps,
            halted: false,
            sequence: 0,
        }
    }

    pub fn pair(&self) -> &PairId {
        &self.pair
    }

    /// Canonical `(reserve0, reserve1)`
    pub fn reserves(&self) -> (u64, u64) {
        (self.reserve0, self.reserve1)
    }

    pub fn lp_token_supply(&self) -> u64 {
        self.lp_token_supply
    }

    /// Accrued protocol fees in canonical order
    pub fn protocol_fees(&self) -> (u64, u64) {
        (self.protocol_fee0, self.protocol_fee1)
    }

    pub fn fee_bps(&self) -> u32 {
        self.fee_bps
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Both reserves nonzero
    pub fn is_tradeable(&self) -> bool {
        self.reserve0 > 0 && self.reserve1 > 0
    }

    /// Product of reserves
    pub fn k(&self) -> u128 {
        u128::from(self.reserve0) * u128::from(self.reserve1)
    }

    /// Reserves oriented for a trade direction
    pub fn snapshot(&self, direction: Direction) -> ReserveSnapshot {
        let (reserve_in, reserve_out) = direction.orient(self.reserves());
        ReserveSnapshot::new(reserve_in, reserve_out, self.fee_bps)
    }

    pub fn ensure_active(&self) -> Result<()> {
        if self.halted {
            return Err(SwapError::PoolHalted {
                pair: self.pair.clone(),
            });
        }
        Ok(())
    }

    /// Copy of this pool after a trade of `amount_in` for `amount_out`.
    ///
    /// `protocol_fee` is carved out of `amount_in` and set aside; the input
    /// reserve is credited with the rest. `self` is left untouched.
    pub fn settle_swap(
        &self,
        direction: Direction,
        amount_in: u64,
        amount_out: u64,
        protocol_fee: u64,
    ) -> Result<Pool> {
        let credited = amount_in
            .checked_sub(protocol_fee)
            .ok_or(SwapError::ArithmeticOverflow)?;

        let mut next = self.clone();
        next.accrue_protocol_fee(direction, protocol_fee)?;
        next.apply_swap(credited, amount_out, direction)?;
        next.sequence = self.sequence + 1;
        Ok(next)
    }

    pub(crate) fn bump_sequence(&mut self) {
        self.sequence += 1;
    }

    pub(crate) fn set_halted(&mut self, halted: bool) {
        self.halted = halted;
    }

    pub(crate) fn set_fee_bps(&mut self, fee_bps: u32) {
        self.fee_bps = fee_bps;
    }

    fn reserves_mut(&mut self, direction: Direction) -> (&mut u64, &mut u64) {
        match direction {
            Direction::ZeroForOne => (&mut self.reserve0, &mut self.reserve1),
            Direction::OneForZero => (&mut self.reserve1, &mut self.reserve0),
        }
    }

    /// Credit `delta_in` to the input reserve and debit `delta_out` from the
    /// output reserve. A swap can never fully drain a reserve.
    pub(crate) fn apply_swap(&mut self, delta_in: u64, delta_out: u64, direction: Direction) -> Result<()> {
        self.ensure_active()?;
        let (reserve_in, reserve_out) = self.reserves_mut(direction);
        if delta_out >= *reserve_out {
            return Err(SwapError::InsufficientLiquidity {
                requested: delta_out,
                available: *reserve_out,
            });
        }
        let credited = reserve_in
            .checked_add(delta_in)
            .ok_or(SwapError::ArithmeticOverflow)?;

        *reserve_in = credited;
        *reserve_out -= delta_out;
        Ok(())
    }

    /// Set aside protocol fee on the input side of a trade
    pub(crate) fn accrue_protocol_fee(&mut self, direction: Direction, amount: u64) -> Result<()> {
        let accrued = match direction {
            Direction::ZeroForOne => &mut self.protocol_fee0,
            Direction::OneForZero => &mut self.protocol_fee1,
        };
        *accrued = accrued
            .checked_add(amount)
            .ok_or(SwapError::ArithmeticOverflow)?;
        Ok(())
    }

    /// Add liquidity in canonical order, returning LP shares minted.
    ///
    /// The first deposit mints `isqrt(amount0 * amount1)`; later deposits
    /// mint proportionally to the smaller side. Both amounts are always
    /// credited in full.
    pub(crate) fn deposit(&mut self, amount0: u64, amount1: u64) -> Result<u64> {
        self.ensure_active()?;
        if amount0 == 0 || amount1 == 0 {
            return Err(SwapError::ZeroAmount);
        }

        let minted = if self.lp_token_supply == 0 {
            let root = isqrt(u128::from(amount0) * u128::from(amount1));
            u64::try_from(root).map_err(|_| SwapError::ArithmeticOverflow)?
        } else {
            let share0 = mul_div(amount0, self.lp_token_supply, self.reserve0)?;
            let share1 = mul_div(amount1, self.lp_token_supply, self.reserve1)?;
            share0.min(share1)
        };
        if minted == 0 {
            return Err(SwapError::InsufficientLiquidity {
                requested: amount0.min(amount1),
                available: 0,
            });
        }

        let reserve0 = self.reserve0.checked_add(amount0);
        let reserve1 = self.reserve1.checked_add(amount1);
        let supply = self.lp_token_supply.checked_add(minted);
        match (reserve0, reserve1, supply) {
            (Some(reserve0), Some(reserve1), Some(supply)) => {
                self.reserve0 = reserve0;
                self.reserve1 = reserve1;
                self.lp_token_supply = supply;
                Ok(minted)
            }
            _ => Err(SwapError::ArithmeticOverflow),
        }
    }

    /// Drain accrued protocol fees
    pub(crate) fn take_protocol_fees(&mut self) -> (u64, u64) {
        let fees = (self.protocol_fee0, self.protocol_fee1);
        self.protocol_fee0 = 0;
        self.protocol_fee1 = 0;
        fees
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kswap_types::AssetId;

    fn pool_with(reserve0: u64, reserve1: u64) -> Pool {
        let pair = PairId::new(AssetId::new("A"), AssetId::new("B")).unwrap();
        let mut pool = Pool::new(pair, 30);
        pool.deposit(reserve0, reserve1).unwrap();
        pool
    }

    #[test]
    fn test_first_deposit_mints_geometric_mean() {
        let pool = pool_with(1000, 2000);
        assert_eq!(pool.reserves(), (1000, 2000));
        assert_eq!(pool.lp_token_supply, 1414);
    }

    #[test]
    fn test_proportional_deposit() {
        let mut pool = pool_with(1000, 4000);
        assert_eq!(pool.lp_token_supply, 2000);

        // Half the reserves on side 0, a quarter on side 1
        let minted = pool.deposit(500, 1000).unwrap();
        assert_eq!(minted, 500);
        assert_eq!(pool.reserves(), (1500, 5000));
        assert_eq!(pool.lp_token_supply, 2500);
    }

    #[test]
    fn test_deposit_rejects_zero() {
        let mut pool = pool_with(10, 10);
        assert_eq!(pool.deposit(0, 5), Err(SwapError::ZeroAmount));
        assert_eq!(pool.deposit(5, 0), Err(SwapError::ZeroAmount));
    }

    #[test]
    fn test_deposit_share_rounding() {
        let mut pool = pool_with(1_000_000, 1_000_000);
        assert_eq!(pool.deposit(1, 1), Ok(1));

        let mut skewed = pool_with(1_000_000, 1);
        assert!(matches!(
            skewed.deposit(1, 1),
            Err(SwapError::InsufficientLiquidity { .. })
        ));
    }

    #[test]
    fn test_apply_swap_directions() {
        let mut pool = pool_with(1000, 2000);
        pool.apply_swap(100, 180, Direction::ZeroForOne).unwrap();
        assert_eq!(pool.reserves(), (1100, 1820));

        pool.apply_swap(50, 20, Direction::OneForZero).unwrap();
        assert_eq!(pool.reserves(), (1080, 1870));
    }

    #[test]
    fn test_apply_swap_cannot_drain() {
        let mut pool = pool_with(1000, 2000);
        let before = pool.clone();
        assert_eq!(
            pool.apply_swap(1, 2000, Direction::ZeroForOne),
            Err(SwapError::InsufficientLiquidity {
                requested: 2000,
                available: 2000
            })
        );
        assert_eq!(pool, before);
    }

    #[test]
    fn test_apply_swap_overflow() {
        let mut pool = pool_with(u64::MAX - 1, 10);
        assert_eq!(
            pool.apply_swap(2, 1, Direction::ZeroForOne),
            Err(SwapError::ArithmeticOverflow)
        );
        assert_eq!(pool.reserves(), (u64::MAX - 1, 10));
    }

    #[test]
    fn test_halted_pool_rejects_mutation() {
        let mut pool = pool_with(1000, 2000);
        pool.halted = true;
        assert!(matches!(
            pool.apply_swap(1, 1, Direction::ZeroForOne),
            Err(SwapError::PoolHalted { .. })
        ));
        assert!(matches!(pool.deposit(1, 1), Err(SwapError::PoolHalted { .. })));
    }

    #[test]
    fn test_protocol_fees() {
        let mut pool = pool_with(1000, 2000);
        pool.accrue_protocol_fee(Direction::ZeroForOne, 3).unwrap();
        pool.accrue_protocol_fee(Direction::OneForZero, 7).unwrap();
        assert_eq!(pool.take_protocol_fees(), (3, 7));
        assert_eq!(pool.take_protocol_fees(), (0, 0));
    }

    #[test]
    fn test_settle_swap_returns_copy() {
        let pool = pool_with(1_000_000, 1_000_000);
        let next = pool.settle_swap(Direction::OneForZero, 10_000, 9_870, 15).unwrap();

        assert_eq!(pool.reserves(), (1_000_000, 1_000_000));
        assert_eq!(next.reserves(), (1_000_000 - 9_870, 1_000_000 + 10_000 - 15));
        assert_eq!(next.protocol_fees(), (0, 15));
        assert_eq!(next.sequence(), pool.sequence() + 1);

        assert_eq!(
            pool.settle_swap(Direction::OneForZero, 10, 1, 11),
            Err(SwapError::ArithmeticOverflow)
        );
    }

    #[test]
    fn test_settle_swap_on_halted_pool() {
        let mut pool = pool_with(1000, 2000);
        pool.set_halted(true);
        assert!(matches!(
            pool.settle_swap(Direction::ZeroForOne, 100, 180, 0),
            Err(SwapError::PoolHalted { .. })
        ));
    }

    #[test]
    fn test_snapshot_orientation() {
        let pool = pool_with(1000, 2000);
        assert_eq!(pool.snapshot(Direction::ZeroForOne), ReserveSnapshot::new(1000, 2000, 30));
        assert_eq!(pool.snapshot(Direction::OneForZero), ReserveSnapshot::new(2000, 1000, 30));
        assert_eq!(pool.k(), 2_000_000);
    }
}
