//! # Router - Atomic Multi-Hop Swaps
//!
//! Every pool on a route is locked up front in canonical pair order. Hops are
//! quoted one after another against that consistent state, settled on copies
//! and verified; only when every hop passes are the copies committed. A
//! failure at any hop leaves every pool on the route untouched.

use crate::executor::{SwapEngine, SwapReceipt};
use crate::route::Route;
use crate::settlement::{self, Settlement, SwapKind};
use kswap_amm::AmmPool;
use kswap_ledger::PoolGuards;
use kswap_types::{Result, SwapError, SwapQuote, TraderId};
use serde::Serialize;
use tracing::{debug, info};

/// Outcome of a settled multi-hop swap
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteReceipt {
    pub amount_in: u64,
    pub amount_out: u64,
    pub hops: Vec<SwapReceipt>,
}

/// Read-only multi-hop quote
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteQuote {
    pub amount_in: u64,
    pub amount_out: u64,
    pub hops: Vec<SwapQuote>,
}

impl SwapEngine {
    fn check_route(&self, route: &Route) -> Result<()> {
        if route.len() > self.max_hops {
            return Err(SwapError::invalid_path(format!(
                "route has {} hops, limit is {}",
                route.len(),
                self.max_hops
            )));
        }
        Ok(())
    }

    /// Sell exactly `amount_in` of the route's start asset
    pub fn multi_hop_swap(
        &self,
        trader: &TraderId,
        route: &Route,
        amount_in: u64,
        min_amount_out: u64,
        deadline_ns: Option<u64>,
    ) -> Result<RouteReceipt> {
        let now_ns = self.check_deadline(deadline_ns)?;
        if amount_in == 0 {
            return Err(SwapError::ZeroAmount);
        }
        self.check_route(route)?;

        let guards = self.ledger.lock_many(&route.pairs())?;
        let mut settlements = Vec::with_capacity(route.len());
        let mut amount = amount_in;
        for hop in route.hops() {
            let pool = guards.get(&hop.pair)?;
            let quote = settlement::quote(pool, hop.direction, amount, SwapKind::ExactInput)?;
            settlements.push(settlement::settle(&self.ledger, pool, hop.direction, quote)?);
            amount = quote.amount_out;
        }

        if amount < min_amount_out {
            return Err(SwapError::SlippageExceeded {
                amount_out: amount,
                min_amount_out,
            });
        }

        let receipt = self.commit(guards, settlements, trader, now_ns)?;
        info!(
            trader = %trader,
            start = %route.start(),
            end = %route.end(),
            hops = route.len(),
            amount_in = receipt.amount_in,
            amount_out = receipt.amount_out,
            "Multi-hop swap executed"
        );
        Ok(receipt)
    }

    /// Buy exactly `amount_out` of the route's end asset
    pub fn multi_hop_swap_exact_output(
        &self,
        trader: &TraderId,
        route: &Route,
        amount_out: u64,
        max_amount_in: u64,
        deadline_ns: Option<u64>,
    ) -> Result<RouteReceipt> {
        let now_ns = self.check_deadline(deadline_ns)?;
        if amount_out == 0 {
            return Err(SwapError::ZeroAmount);
        }
        self.check_route(route)?;

        let guards = self.ledger.lock_many(&route.pairs())?;

        // Price backwards: each hop must deliver what the next one consumes
        let mut quotes = Vec::with_capacity(route.len());
        let mut amount = amount_out;
        for hop in route.hops().iter().rev() {
            let pool = guards.get(&hop.pair)?;
            let quote = settlement::quote(pool, hop.direction, amount, SwapKind::ExactOutput)?;
            amount = quote.amount_in;
            quotes.push(quote);
        }
        quotes.reverse();

        if amount > max_amount_in {
            return Err(SwapError::ExcessiveInput {
                amount_in: amount,
                max_amount_in,
            });
        }

        let settlements = route
            .hops()
            .iter()
            .zip(quotes)
            .map(|(hop, quote)| {
                let pool = guards.get(&hop.pair)?;
                settlement::settle(&self.ledger, pool, hop.direction, quote)
            })
            .collect::<Result<Vec<_>>>()?;

        let receipt = self.commit(guards, settlements, trader, now_ns)?;
        info!(
            trader = %trader,
            start = %route.start(),
            end = %route.end(),
            hops = route.len(),
            amount_in = receipt.amount_in,
            amount_out = receipt.amount_out,
            "Multi-hop exact-output swap executed"
        );
        Ok(receipt)
    }

    /// Verify every hop, commit all of them, release the pools and emit one
    /// record per hop
    fn commit(
        &self,
        mut guards: PoolGuards,
        settlements: Vec<Settlement>,
        trader: &TraderId,
        now_ns: u64,
    ) -> Result<RouteReceipt> {
        for settlement in &settlements {
            guards.check(&settlement.next)?;
        }
        for settlement in &settlements {
            guards.commit(settlement.next.clone())?;
            debug!(pair = %settlement.next.pair(), "Hop committed");
        }
        drop(guards);

        let records: Vec<_> = settlements
            .iter()
            .map(|settlement| settlement.record(trader, now_ns))
            .collect();
        self.emit(&records);

        let hops: Vec<SwapReceipt> = settlements.iter().map(Settlement::receipt).collect();
        Ok(RouteReceipt {
            amount_in: hops.first().map_or(0, |hop| hop.amount_in),
            amount_out: hops.last().map_or(0, |hop| hop.amount_out),
            hops,
        })
    }

    /// Read-only exact-input quote along a route
    pub fn quote_route(&self, route: &Route, amount_in: u64) -> Result<RouteQuote> {
        self.check_route(route)?;
        let mut hops = Vec::with_capacity(route.len());
        let mut amount = amount_in;
        for hop in route.hops() {
            let quote = self
                .ledger
                .snapshot(&hop.pair, &hop.asset_in)?
                .quote_exact_input(amount)?;
            amount = quote.amount_out;
            hops.push(quote);
        }
        Ok(RouteQuote {
            amount_in,
            amount_out: amount,
            hops,
        })
    }
}
