//! Pricing Engine Property Tests
//!
//! Mathematical properties that must hold for every reserve state and fee
//! rate, independent of specific market conditions.

use kswap_amm::{AmmPool, ReserveSnapshot, V2Math};
use kswap_types::SwapError;
use proptest::prelude::*;

prop_compose! {
    fn valid_fee()(fee_bps in 0u32..10_000u32) -> u32 {
        fee_bps
    }
}

prop_compose! {
    fn moderate_reserves()
        (reserve_in in 1u64..(1u64 << 40), reserve_out in 2u64..(1u64 << 40)) -> (u64, u64) {
        (reserve_in, reserve_out)
    }
}

proptest! {
    /// Property: an exact-input trade can never drain the output reserve
    #[test]
    fn amount_out_strictly_below_reserve(
        reserve_in in 1u64..=u64::MAX,
        reserve_out in 1u64..=u64::MAX,
        amount_in in 1u64..=u64::MAX,
        fee_bps in valid_fee(),
    ) {
        let amount_out = V2Math::get_amount_out(amount_in, reserve_in, reserve_out, fee_bps).unwrap();
        prop_assert!(amount_out < reserve_out);
    }

    /// Property: the input charged for an exact output covers the fair price
    /// after fees, so the pool is never shortchanged by truncation
    #[test]
    fn exact_output_never_shortchanges_pool(
        (reserve_in, reserve_out) in moderate_reserves(),
        fraction in 1u64..10_000u64,
        fee_bps in valid_fee(),
    ) {
        let amount_out = (reserve_out - 1) * fraction / 10_000 + 1;
        prop_assume!(amount_out < reserve_out);

        let amount_in = match V2Math::get_amount_in(amount_out, reserve_in, reserve_out, fee_bps) {
            Ok(amount_in) => amount_in,
            Err(SwapError::ArithmeticOverflow) => return Ok(()),
            Err(e) => return Err(TestCaseError::fail(e.to_string())),
        };

        let paid = u128::from(amount_in)
            * u128::from(10_000 - fee_bps)
            * u128::from(reserve_out - amount_out);
        let fair = u128::from(reserve_in) * u128::from(amount_out) * 10_000;
        prop_assert!(paid > fair);
    }

    /// Property: buying back what `x` bought never costs more than `x + 1`
    #[test]
    fn round_trip_bounded(
        (reserve_in, reserve_out) in moderate_reserves(),
        amount_in in 1u64..(1u64 << 50),
        fee_bps in valid_fee(),
    ) {
        let amount_out = V2Math::get_amount_out(amount_in, reserve_in, reserve_out, fee_bps).unwrap();
        prop_assume!(amount_out > 0);

        let required = V2Math::get_amount_in(amount_out, reserve_in, reserve_out, fee_bps).unwrap();
        prop_assert!(required <= amount_in + 1);
    }

    /// Property: crediting the full input and debiting the quoted output never lowers K
    #[test]
    fn quoted_trade_preserves_k(
        reserve_in in 1u64..(1u64 << 60),
        reserve_out in 1u64..(1u64 << 60),
        amount_in in 1u64..(1u64 << 60),
        fee_bps in valid_fee(),
    ) {
        let amount_out = V2Math::get_amount_out(amount_in, reserve_in, reserve_out, fee_bps).unwrap();
        let k_before = u128::from(reserve_in) * u128::from(reserve_out);
        let k_after = (u128::from(reserve_in) + u128::from(amount_in))
            * u128::from(reserve_out - amount_out);
        prop_assert!(k_after >= k_before);
        if fee_bps > 0 {
            prop_assert!(k_after > k_before);
        }
    }

    /// Property: more input never yields less output
    #[test]
    fn amount_out_monotonic(
        (reserve_in, reserve_out) in moderate_reserves(),
        amount_in in 1u64..(1u64 << 50),
        fee_bps in valid_fee(),
    ) {
        let smaller = V2Math::get_amount_out(amount_in, reserve_in, reserve_out, fee_bps).unwrap();
        let larger = V2Math::get_amount_out(amount_in + 1, reserve_in, reserve_out, fee_bps).unwrap();
        prop_assert!(larger >= smaller);
    }

    /// Property: queries are pure
    #[test]
    fn quotes_are_idempotent(
        (reserve_in, reserve_out) in moderate_reserves(),
        amount in 1u64..(1u64 << 30),
        fee_bps in valid_fee(),
    ) {
        let pool = ReserveSnapshot::new(reserve_in, reserve_out, fee_bps);
        prop_assert_eq!(pool.quote_exact_input(amount), pool.quote_exact_input(amount));
        prop_assert_eq!(pool.get_amount_in(amount), pool.get_amount_in(amount));
        prop_assert_eq!(pool, ReserveSnapshot::new(reserve_in, reserve_out, fee_bps));
    }

    /// Property: zero input and over-reserve output always fail
    #[test]
    fn boundary_amounts_rejected(
        (reserve_in, reserve_out) in moderate_reserves(),
        excess in 0u64..1_000u64,
        fee_bps in valid_fee(),
    ) {
        prop_assert_eq!(
            V2Math::get_amount_out(0, reserve_in, reserve_out, fee_bps),
            Err(SwapError::ZeroAmount)
        );
        let is_insufficient_output = matches!(
            V2Math::get_amount_in(reserve_out + excess, reserve_in, reserve_out, fee_bps),
            Err(SwapError::InsufficientOutput { .. })
        );
        prop_assert!(is_insufficient_output);
    }
}

#[test]
fn literal_round_trip_counterexample() {
    // Floor rounding on the output means x can buy strictly less than x is worth
    let amount_out = V2Math::get_amount_out(20, 1000, 100, 0).unwrap();
    assert_eq!(amount_out, 1);
    assert_eq!(V2Math::get_amount_in(amount_out, 1000, 100, 0).unwrap(), 11);
}
