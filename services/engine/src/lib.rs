//! # kswap Engine - Swap Execution and Routing
//!
//! ## Purpose
//!
//! Executes trades against the pool ledger: single-pool exact-input and
//! exact-output swaps with deadline and slippage protection, atomic
//! multi-hop routes, and side-effect-free quotes. Every settled hop produces
//! a [`SwapRecord`](kswap_types::SwapRecord) for off-chain consumers.
//!
//! ## Architecture Role
//!
//! ```text
//! caller → [Router] → [Swap Executor] → [Pricing (kswap-amm)] → [Pool Ledger]
//!                                                                    ↓
//!                                              SwapRecord → SwapEventSink
//! ```
//!
//! ## Example
//!
//! ```rust
//! use kswap_engine::{SwapEngine, SwapRequest};
//! use kswap_ledger::{LedgerConfig, PoolLedger};
//! use kswap_types::{AssetId, PairId};
//! use std::sync::Arc;
//!
//! let (ledger, _admin) = PoolLedger::new(LedgerConfig::default()).unwrap();
//! let pair = PairId::new(AssetId::new("A"), AssetId::new("B")).unwrap();
//! ledger.initialize(pair.clone()).unwrap();
//! ledger.add_liquidity(&pair, &AssetId::new("A"), 1000, 2000).unwrap();
//!
//! let engine = SwapEngine::new(Arc::new(ledger));
//! let receipt = engine
//!     .swap_exact_input(&SwapRequest::exact_input("alice", "A", "B", 100, 170))
//!     .unwrap();
//! assert_eq!(receipt.amount_out, 180);
//! ```

mod bootstrap;
pub mod clock;
pub mod events;
pub mod executor;
pub mod route;
pub mod router;
mod settlement;

pub use clock::{Clock, ManualClock, SystemClock};
pub use events::{InMemorySwapLog, JsonLinesSwapLog, NullSink, SinkError, SwapEventSink};
pub use executor::{SwapEngine, SwapReceipt, SwapRequest};
pub use route::{Hop, Route};
pub use router::{RouteQuote, RouteReceipt};
