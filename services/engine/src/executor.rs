//! # Swap Executor - Single-Pool Trade Execution
//!
//! ## Purpose
//!
//! Runs one trade against one pool as a fixed sequence of stages:
//!
//! ```text
//! Deadline → Validated → Priced → SlippageChecked → Settled → Verified → Emitted
//! ```
//!
//! The pool's exclusive lock is held from validation through verification, so
//! the price a trade is quoted at is exactly the state it settles against. Any
//! failure before commit leaves the pool unchanged; a product-of-reserves
//! violation additionally halts the pool. Emission happens after the lock is
//! released and cannot fail the trade.
//!
//! Read-only queries (`get_amount_out`, `get_price`, ...) take a shared lock
//! and never mutate anything. A halted pool answers every query with
//! `PoolHalted`.

use crate::clock::{Clock, SystemClock};
use crate::events::{NullSink, SwapEventSink};
use crate::settlement::{self, SwapKind};
use kswap_amm::{AmmPool, Decimal, ReserveSnapshot, V2Math};
use kswap_config::defaults::DEFAULT_MAX_HOPS;
use kswap_ledger::PoolLedger;
use kswap_types::{AssetId, PairId, Result, SwapError, SwapQuote, SwapRecord, TraderId};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A single-pool trade request.
///
/// `amount` is the fixed side of the trade and `limit` the caller's bound on
/// the other side: minimum output for exact-input, maximum input for
/// exact-output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapRequest {
    pub trader: TraderId,
    pub asset_in: AssetId,
    pub asset_out: AssetId,
    pub amount: u64,
    pub limit: u64,
    pub deadline_ns: Option<u64>,
}

impl SwapRequest {
    /// Sell exactly `amount_in`, receiving at least `min_amount_out`
    pub fn exact_input(
        trader: impl Into<TraderId>,
        asset_in: impl Into<AssetId>,
        asset_out: impl Into<AssetId>,
        amount_in: u64,
        min_amount_out: u64,
    ) -> Self {
        Self {
            trader: trader.into(),
            asset_in: asset_in.into(),
            asset_out: asset_out.into(),
            amount: amount_in,
            limit: min_amount_out,
            deadline_ns: None,
        }
    }

    /// Buy exactly `amount_out`, paying at most `max_amount_in`
    pub fn exact_output(
        trader: impl Into<TraderId>,
        asset_in: impl Into<AssetId>,
        asset_out: impl Into<AssetId>,
        amount_out: u64,
        max_amount_in: u64,
    ) -> Self {
        Self {
            trader: trader.into(),
            asset_in: asset_in.into(),
            asset_out: asset_out.into(),
            amount: amount_out,
            limit: max_amount_in,
            deadline_ns: None,
        }
    }

    pub fn with_deadline(mut self, deadline_ns: u64) -> Self {
        self.deadline_ns = Some(deadline_ns);
        self
    }
}

/// Outcome of one settled hop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapReceipt {
    pub amount_in: u64,
    pub amount_out: u64,
    pub fee_amount: u64,
    /// Part of `fee_amount` set aside for the protocol
    pub protocol_fee: u64,
    pub reserve_in_after: u64,
    pub reserve_out_after: u64,
}

/// Swap executor and router over one pool ledger
#[derive(Debug)]
pub struct SwapEngine {
    pub(crate) ledger: Arc<PoolLedger>,
    sink: Arc<dyn SwapEventSink>,
    clock: Arc<dyn Clock>,
    pub(crate) max_hops: usize,
}

impl SwapEngine {
    /// Engine with the system clock, no event sink and default route length
    pub fn new(ledger: Arc<PoolLedger>) -> Self {
        Self {
            ledger,
            sink: Arc::new(NullSink),
            clock: Arc::new(SystemClock),
            max_hops: DEFAULT_MAX_HOPS,
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn SwapEventSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_max_hops(mut self, max_hops: usize) -> Self {
        self.max_hops = max_hops;
        self
    }

    pub fn ledger(&self) -> &Arc<PoolLedger> {
        &self.ledger
    }

    pub fn max_hops(&self) -> usize {
        self.max_hops
    }

    /// Current time, failing if the deadline has already passed
    pub(crate) fn check_deadline(&self, deadline_ns: Option<u64>) -> Result<u64> {
        let now_ns = self.clock.now_ns();
        match deadline_ns {
            Some(deadline_ns) if now_ns > deadline_ns => {
                debug!(deadline_ns, now_ns, "Request expired");
                Err(SwapError::Expired {
                    deadline_ns,
                    now_ns,
                })
            }
            _ => Ok(now_ns),
        }
    }

    /// Deliver records; a failing sink never fails the trade
    pub(crate) fn emit(&self, records: &[SwapRecord]) {
        for record in records {
            if let Err(e) = self.sink.record(record) {
                warn!(
                    trader = %record.trader,
                    asset_in = %record.asset_in,
                    asset_out = %record.asset_out,
                    error = %e,
                    "Failed to emit swap record"
                );
            }
        }
    }

    /// Sell exactly `request.amount` of `asset_in`
    pub fn swap_exact_input(&self, request: &SwapRequest) -> Result<SwapReceipt> {
        self.execute(request, SwapKind::ExactInput)
    }

    /// Buy exactly `request.amount` of `asset_out`
    pub fn swap_exact_output(&self, request: &SwapRequest) -> Result<SwapReceipt> {
        self.execute(request, SwapKind::ExactOutput)
    }

    fn execute(&self, request: &SwapRequest, kind: SwapKind) -> Result<SwapReceipt> {
        let now_ns = self.check_deadline(request.deadline_ns)?;
        if request.amount == 0 {
            return Err(SwapError::ZeroAmount);
        }
        let pair = PairId::new(request.asset_in.clone(), request.asset_out.clone())?;
        let direction = pair.direction_for(&request.asset_in)?;

        let mut guards = self.ledger.lock(&pair)?;
        let pool = guards.get(&pair)?;
        let quote = settlement::quote(pool, direction, request.amount, kind)?;
        check_limit(&quote, request.limit, kind)?;

        let settlement = settlement::settle(&self.ledger, pool, direction, quote)?;
        guards.commit(settlement.next.clone())?;
        drop(guards);

        let receipt = settlement.receipt();
        info!(
            %pair,
            trader = %request.trader,
            ?kind,
            amount_in = receipt.amount_in,
            amount_out = receipt.amount_out,
            fee_amount = receipt.fee_amount,
            "Swap executed"
        );
        self.emit(&[settlement.record(&request.trader, now_ns)]);
        Ok(receipt)
    }

    /// Reserves oriented for selling `asset_in`
    fn snapshot(&self, asset_in: &AssetId, asset_out: &AssetId) -> Result<ReserveSnapshot> {
        let pair = PairId::new(asset_in.clone(), asset_out.clone())?;
        self.ledger.snapshot(&pair, asset_in)
    }

    /// Output for selling `amount_in`, without trading
    pub fn get_amount_out(&self, asset_in: &AssetId, asset_out: &AssetId, amount_in: u64) -> Result<u64> {
        self.snapshot(asset_in, asset_out)?.get_amount_out(amount_in)
    }

    /// Input required to buy `amount_out`, without trading
    pub fn get_amount_in(&self, asset_in: &AssetId, asset_out: &AssetId, amount_out: u64) -> Result<u64> {
        self.snapshot(asset_in, asset_out)?.get_amount_in(amount_out)
    }

    /// `(reserve_in, reserve_out)` for selling `asset_in`
    pub fn get_reserves(&self, asset_in: &AssetId, asset_out: &AssetId) -> Result<(u64, u64)> {
        Ok(self.snapshot(asset_in, asset_out)?.get_liquidity())
    }

    /// Marginal price of `asset_in` in units of `asset_out`
    pub fn get_price(&self, asset_in: &AssetId, asset_out: &AssetId) -> Result<Decimal> {
        self.snapshot(asset_in, asset_out)?.get_price()
    }

    /// Price impact of selling `amount_in`, in basis points
    pub fn get_price_impact(&self, asset_in: &AssetId, asset_out: &AssetId, amount_in: u64) -> Result<u32> {
        let snapshot = self.snapshot(asset_in, asset_out)?;
        V2Math::price_impact_bps(amount_in, snapshot.reserve_in, snapshot.reserve_out, snapshot.fee_bps)
    }

    /// Full exact-input quote
    pub fn quote_exact_input(&self, asset_in: &AssetId, asset_out: &AssetId, amount_in: u64) -> Result<SwapQuote> {
        self.snapshot(asset_in, asset_out)?.quote_exact_input(amount_in)
    }

    /// Full exact-output quote
    pub fn quote_exact_output(&self, asset_in: &AssetId, asset_out: &AssetId, amount_out: u64) -> Result<SwapQuote> {
        self.snapshot(asset_in, asset_out)?.quote_exact_output(amount_out)
    }
}

fn check_limit(quote: &SwapQuote, limit: u64, kind: SwapKind) -> Result<()> {
    match kind {
        SwapKind::ExactInput if quote.amount_out < limit => Err(SwapError::SlippageExceeded {
            amount_out: quote.amount_out,
            min_amount_out: limit,
        }),
        SwapKind::ExactOutput if quote.amount_in > limit => Err(SwapError::ExcessiveInput {
            amount_in: quote.amount_in,
            max_amount_in: limit,
        }),
        _ => Ok(()),
    }
}
