//! Pool Ledger
//!
//! Registry of every pool keyed by canonical [`PairId`]. Readers take a
//! shared lock on one pool; every mutation takes that pool's exclusive lock.
//! Multi-pool commits lock in canonical pair order through
//! [`PoolLedger::lock_many`], so two routers can never deadlock.

use crate::auth::{next_ledger_id, AdminCap};
use crate::pool::Pool;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use kswap_amm::{mul_div, ReserveSnapshot, V2Math};
use kswap_types::{AssetId, Direction, PairId, Result, SwapError, BPS_DENOMINATOR};
use parking_lot::{ArcRwLockWriteGuard, RawRwLock, RwLock};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Fee settings applied by the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerConfig {
    /// Fee for pools created through [`PoolLedger::initialize`]
    pub default_fee_bps: u32,
    /// Share of every swap fee set aside for the protocol
    pub protocol_fee_share_bps: u32,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            default_fee_bps: 30,
            protocol_fee_share_bps: 0,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerStats {
    pub total_pools: usize,
    pub tradeable_pools: usize,
    pub halted_pools: usize,
}

/// Exclusive access to several pools, acquired in canonical order.
///
/// Held pools can be read freely. The only write is [`PoolGuards::commit`],
/// which swaps in a copy produced by [`Pool::settle_swap`] from the held
/// state.
pub struct PoolGuards {
    guards: Vec<(PairId, ArcRwLockWriteGuard<RawRwLock, Pool>)>,
}

impl PoolGuards {
    fn position(&self, pair: &PairId) -> Result<usize> {
        self.guards
            .binary_search_by(|(held, _)| held.cmp(pair))
            .map_err(|_| SwapError::PoolNotFound { pair: pair.clone() })
    }

    /// A held pool; `PoolNotFound` if `pair` was not locked
    pub fn get(&self, pair: &PairId) -> Result<&Pool> {
        let i = self.position(pair)?;
        Ok(&*self.guards[i].1)
    }

    /// Check that `next` may replace the held pool for its pair.
    ///
    /// `next` must be exactly one settlement ahead of the held state. A drop
    /// in K halts the held pool and fails with `InvariantViolation`.
    pub fn check(&mut self, next: &Pool) -> Result<()> {
        let i = self.position(next.pair())?;
        let held = &mut *self.guards[i].1;
        held.ensure_active()?;
        if next.sequence() != held.sequence() + 1 {
            return Err(SwapError::StalePool {
                pair: held.pair().clone(),
            });
        }

        let k_before = held.k();
        let k_after = next.k();
        if k_after < k_before {
            held.set_halted(true);
            error!(
                pair = %held.pair(),
                k_before,
                k_after,
                "Constant product decreased, pool halted"
            );
            return Err(SwapError::InvariantViolation {
                pair: held.pair().clone(),
                k_before,
                k_after,
            });
        }
        Ok(())
    }

    /// Replace the held pool with a settled copy after [`PoolGuards::check`]
    pub fn commit(&mut self, next: Pool) -> Result<()> {
        self.check(&next)?;
        let i = self.position(next.pair())?;
        debug!(pair = %next.pair(), sequence = next.sequence(), "Pool committed");
        *self.guards[i].1 = next;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.guards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guards.is_empty()
    }
}

/// Manages state for all pools
#[derive(Debug)]
pub struct PoolLedger {
    /// All pools indexed by canonical pair
    pools: DashMap<PairId, Arc<RwLock<Pool>>>,
    config: LedgerConfig,
    ledger_id: u64,
}

impl PoolLedger {
    /// Create an empty ledger and the single admin capability for it
    pub fn new(config: LedgerConfig) -> Result<(Self, AdminCap)> {
        V2Math::validate_fee(config.default_fee_bps)?;
        if config.protocol_fee_share_bps >= BPS_DENOMINATOR {
            return Err(SwapError::InvalidFee {
                fee_bps: config.protocol_fee_share_bps,
            });
        }

        let ledger_id = next_ledger_id();
        let ledger = Self {
            pools: DashMap::new(),
            config,
            ledger_id,
        };
        Ok((ledger, AdminCap::new(ledger_id)))
    }

    pub fn config(&self) -> LedgerConfig {
        self.config
    }

    fn authorize(&self, cap: &AdminCap) -> Result<()> {
        if cap.ledger_id() != self.ledger_id {
            warn!(ledger_id = self.ledger_id, "Rejected foreign admin capability");
            return Err(SwapError::Unauthorized);
        }
        Ok(())
    }

    fn handle(&self, pair: &PairId) -> Result<Arc<RwLock<Pool>>> {
        self.pools
            .get(pair)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| SwapError::PoolNotFound { pair: pair.clone() })
    }

    /// Register an empty pool with the default fee
    pub fn initialize(&self, pair: PairId) -> Result<()> {
        self.initialize_with_fee(pair, self.config.default_fee_bps)
    }

    /// Register an empty pool with an explicit fee
    pub fn initialize_with_fee(&self, pair: PairId, fee_bps: u32) -> Result<()> {
        V2Math::validate_fee(fee_bps)?;
        match self.pools.entry(pair) {
            Entry::Occupied(entry) => Err(SwapError::PoolAlreadyExists {
                pair: entry.key().clone(),
            }),
            Entry::Vacant(entry) => {
                let pair = entry.key().clone();
                entry.insert(Arc::new(RwLock::new(Pool::new(pair.clone(), fee_bps))));
                info!(%pair, fee_bps, "Pool initialized");
                Ok(())
            }
        }
    }

    /// Canonical `(reserve0, reserve1)`
    pub fn get_reserves(&self, pair: &PairId) -> Result<(u64, u64)> {
        Ok(self.handle(pair)?.read().reserves())
    }

    /// Copy of the full pool state
    pub fn pool(&self, pair: &PairId) -> Result<Pool> {
        Ok(self.handle(pair)?.read().clone())
    }

    /// Reserves oriented for selling `asset_in`; `PoolHalted` while halted
    pub fn snapshot(&self, pair: &PairId, asset_in: &AssetId) -> Result<ReserveSnapshot> {
        let direction = pair.direction_for(asset_in)?;
        let handle = self.handle(pair)?;
        let pool = handle.read();
        pool.ensure_active()?;
        Ok(pool.snapshot(direction))
    }

    /// Atomically credit the input reserve and debit the output reserve
    pub fn apply_swap(
        &self,
        pair: &PairId,
        delta_in: u64,
        delta_out: u64,
        direction: Direction,
    ) -> Result<()> {
        self.update(pair, |pool| pool.apply_swap(delta_in, delta_out, direction))?;
        debug!(%pair, delta_in, delta_out, ?direction, "Swap applied");
        Ok(())
    }

    /// Run `f` with exclusive access to one pool, counting it as one mutation
    /// when it succeeds
    pub(crate) fn update<R>(&self, pair: &PairId, f: impl FnOnce(&mut Pool) -> Result<R>) -> Result<R> {
        let handle = self.handle(pair)?;
        let mut pool = handle.write();
        let value = f(&mut pool)?;
        pool.bump_sequence();
        Ok(value)
    }

    /// Exclusive access to one pool
    pub fn lock(&self, pair: &PairId) -> Result<PoolGuards> {
        self.lock_many(std::slice::from_ref(pair))
    }

    /// Exclusive access to several distinct pools, locked in canonical order
    pub fn lock_many(&self, pairs: &[PairId]) -> Result<PoolGuards> {
        let mut sorted: Vec<&PairId> = pairs.iter().collect();
        sorted.sort();
        if let Some(window) = sorted.windows(2).find(|w| w[0] == w[1]) {
            return Err(SwapError::invalid_path(format!("pair {} repeated", window[0])));
        }

        // Resolve every handle before taking any lock
        let handles = sorted
            .into_iter()
            .map(|pair| Ok((pair.clone(), self.handle(pair)?)))
            .collect::<Result<Vec<_>>>()?;

        let guards = handles
            .into_iter()
            .map(|(pair, handle)| (pair, handle.write_arc()))
            .collect();
        Ok(PoolGuards { guards })
    }

    /// Protocol share of a swap fee
    pub fn protocol_fee_for(&self, fee_amount: u64) -> Result<u64> {
        mul_div(
            fee_amount,
            u64::from(self.config.protocol_fee_share_bps),
            u64::from(BPS_DENOMINATOR),
        )
    }

    /// Deposit both sides of a pair, returning LP shares minted
    pub fn add_liquidity(
        &self,
        pair: &PairId,
        asset_a: &AssetId,
        amount_a: u64,
        amount_b: u64,
    ) -> Result<u64> {
        let direction = pair.direction_for(asset_a)?;
        let (amount0, amount1) = direction.orient((amount_a, amount_b));

        self.update(pair, |pool| {
            let minted = pool.deposit(amount0, amount1)?;
            info!(
                %pair,
                amount0,
                amount1,
                minted,
                reserve0 = pool.reserves().0,
                reserve1 = pool.reserves().1,
                "Liquidity added"
            );
            Ok(minted)
        })
    }

    /// Circuit-break a pool; every trade and quote fails until resumed.
    ///
    /// Halting needs no capability. Clearing a halt does: only
    /// [`PoolLedger::resume`] reopens the pool.
    pub fn halt(&self, pair: &PairId) -> Result<()> {
        self.update(pair, |pool| {
            pool.set_halted(true);
            error!(%pair, "Pool halted");
            Ok(())
        })
    }

    /// Reopen a halted pool
    pub fn resume(&self, cap: &AdminCap, pair: &PairId) -> Result<()> {
        self.authorize(cap)?;
        self.update(pair, |pool| {
            pool.set_halted(false);
            warn!(%pair, "Pool resumed by admin");
            Ok(())
        })
    }

    /// Change a pool's swap fee
    pub fn set_fee(&self, cap: &AdminCap, pair: &PairId, fee_bps: u32) -> Result<()> {
        self.authorize(cap)?;
        V2Math::validate_fee(fee_bps)?;
        self.update(pair, |pool| {
            info!(%pair, old_fee_bps = pool.fee_bps(), fee_bps, "Pool fee changed");
            pool.set_fee_bps(fee_bps);
            Ok(())
        })
    }

    /// Drain accrued protocol fees in canonical order
    pub fn withdraw_protocol_fees(&self, cap: &AdminCap, pair: &PairId) -> Result<(u64, u64)> {
        self.authorize(cap)?;
        self.update(pair, |pool| {
            let (fee0, fee1) = pool.take_protocol_fees();
            info!(%pair, fee0, fee1, "Protocol fees withdrawn");
            Ok((fee0, fee1))
        })
    }

    pub fn contains(&self, pair: &PairId) -> bool {
        self.pools.contains_key(pair)
    }

    /// Registered pairs in canonical order
    pub fn pairs(&self) -> Vec<PairId> {
        let mut pairs: Vec<PairId> = self.pools.iter().map(|entry| entry.key().clone()).collect();
        pairs.sort();
        pairs
    }

    pub fn len(&self) -> usize {
        self.pools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }

    pub fn stats(&self) -> LedgerStats {
        let mut stats = LedgerStats {
            total_pools: self.pools.len(),
            ..Default::default()
        };
        for entry in self.pools.iter() {
            let pool = entry.value().read();
            if pool.is_halted() {
                stats.halted_pools += 1;
            } else if pool.is_tradeable() {
                stats.tradeable_pools += 1;
            }
        }
        stats
    }
}
