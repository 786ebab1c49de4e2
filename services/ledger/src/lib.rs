//! # kswap Ledger - Authoritative Pool State
//!
//! ## Purpose
//!
//! Owns the reserves of every constant-product pool. Each pool sits behind its
//! own lock inside a concurrent map, so trades on unrelated pairs never
//! contend, while readers and writers of one pool are serialized.
//!
//! ## Guarantees
//!
//! - At most one pool per unordered asset pair
//! - Pool state is read-only outside this crate. Reserves change through
//!   [`PoolLedger::apply_swap`], [`PoolLedger::add_liquidity`] or a
//!   [`Pool::settle_swap`] copy committed with [`PoolGuards::commit`]
//! - A commit is refused unless the copy is one settlement ahead of the held
//!   pool; a commit that would lower K halts the pool instead
//! - Multi-pool locking through [`PoolLedger::lock_many`] is deadlock free
//! - Fee changes, fee withdrawal and resuming a halted pool need the
//!   [`AdminCap`] returned by [`PoolLedger::new`]. Anyone may halt a pool
//!
//! ```rust
//! use kswap_ledger::{LedgerConfig, PoolLedger};
//! use kswap_types::{AssetId, PairId};
//!
//! let (ledger, _admin) = PoolLedger::new(LedgerConfig::default()).unwrap();
//! let pair = PairId::new(AssetId::new("A"), AssetId::new("B")).unwrap();
//! ledger.initialize(pair.clone()).unwrap();
//! ledger.add_liquidity(&pair, &AssetId::new("A"), 1000, 2000).unwrap();
//! assert_eq!(ledger.get_reserves(&pair).unwrap(), (1000, 2000));
//! ```

mod auth;
mod ledger;
mod pool;

pub use auth::AdminCap;
pub use ledger::{LedgerConfig, LedgerStats, PoolGuards, PoolLedger};
pub use pool::Pool;
