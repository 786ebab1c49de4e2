//! # kswap Types - Shared Identifiers, Records and Errors
//!
//! ## Purpose
//!
//! Common vocabulary for every kswap crate: asset and pair identities, swap
//! direction, the ephemeral [`SwapQuote`], the append-only [`SwapRecord`] event
//! and the single [`SwapError`] taxonomy returned by all fallible operations.
//!
//! ## Integration Points
//!
//! - **Pricing**: `kswap-amm` returns [`SwapQuote`] and [`SwapError`]
//! - **State**: `kswap-ledger` keys pools by canonical [`PairId`]
//! - **Execution**: `kswap-engine` emits [`SwapRecord`] to off-chain consumers
//!
//! ## Canonical pairs
//!
//! ```rust
//! use kswap_types::{AssetId, Direction, PairId};
//!
//! let usdc = AssetId::new("USDC");
//! let weth = AssetId::new("WETH");
//!
//! let pair = PairId::new(weth.clone(), usdc.clone()).unwrap();
//! assert_eq!(pair, PairId::new(usdc.clone(), weth.clone()).unwrap());
//! assert_eq!(pair.asset0(), &usdc);
//! assert_eq!(pair.direction_for(&weth).unwrap(), Direction::OneForZero);
//! ```

pub mod errors;
pub mod events;
pub mod ids;
pub mod quote;

pub use errors::{Result, SwapError};
pub use events::SwapRecord;
pub use ids::{AssetId, Direction, PairId, TraderId};
pub use quote::SwapQuote;

/// Basis point denominator (10_000 bps = 100%)
pub const BPS_DENOMINATOR: u32 = 10_000;
