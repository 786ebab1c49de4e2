//! # kswap AMM Library - Exact Constant-Product Mathematics
//!
//! ## Purpose
//!
//! Pure pricing functions for constant-product (x*y=k) pools: exact-input and
//! exact-output quotes, fee accounting, marginal price and price impact. All
//! reserve math is integer-only with a 128-bit intermediate; nothing here
//! mutates state.
//!
//! ## Integration Points
//!
//! - **Input Sources**: `ReserveSnapshot` copies taken by the pool ledger
//! - **Output Destinations**: swap executor, router, read-only quote APIs
//! - **Rounding**: outputs floor, exact-output inputs floor + 1
//!
//! ## Example
//!
//! ```rust
//! use kswap_amm::{AmmPool, ReserveSnapshot, V2Math};
//!
//! assert_eq!(V2Math::get_amount_out(100, 1000, 2000, 30).unwrap(), 180);
//!
//! let pool = ReserveSnapshot::new(1000, 2000, 30);
//! let quote = pool.quote_exact_output(180).unwrap();
//! assert!(quote.amount_in >= 100);
//! ```

pub mod fixed_point;
pub mod pool_traits;
pub mod v2_math;

pub use fixed_point::{isqrt, mul_div, mul_div_ceil, mul_div_u128};
pub use pool_traits::{AmmPool, ReserveSnapshot};
pub use v2_math::V2Math;

/// Common types for AMM calculations
pub use rust_decimal::Decimal;
pub use rust_decimal_macros::dec;
