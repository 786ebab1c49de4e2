//! Per-pool quote and settle steps shared by the executor and router
//!
//! Settlement always happens on a copy of the pool. The caller hands the copy
//! to [`PoolGuards::commit`](kswap_ledger::PoolGuards::commit), which refuses
//! it if the product of reserves dropped.

use crate::executor::SwapReceipt;
use kswap_amm::AmmPool;
use kswap_ledger::{Pool, PoolLedger};
use kswap_types::{Direction, Result, SwapError, SwapQuote, SwapRecord, TraderId};
use tracing::debug;

/// Which side of the trade the caller fixed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SwapKind {
    ExactInput,
    ExactOutput,
}

/// Price a trade against the current pool state
pub(crate) fn quote(pool: &Pool, direction: Direction, amount: u64, kind: SwapKind) -> Result<SwapQuote> {
    pool.ensure_active()?;
    if amount == 0 {
        return Err(SwapError::ZeroAmount);
    }

    let snapshot = pool.snapshot(direction);
    if !snapshot.is_tradeable() {
        return Err(SwapError::InsufficientLiquidity {
            requested: amount,
            available: snapshot.reserve_in.min(snapshot.reserve_out),
        });
    }

    let quote = match kind {
        SwapKind::ExactInput => snapshot.quote_exact_input(amount)?,
        SwapKind::ExactOutput => snapshot.quote_exact_output(amount)?,
    };
    if quote.amount_out == 0 {
        return Err(SwapError::InsufficientOutput {
            requested: 0,
            reserve_out: snapshot.reserve_out,
        });
    }

    debug!(
        pair = %pool.pair(),
        ?direction,
        amount_in = quote.amount_in,
        amount_out = quote.amount_out,
        fee_amount = quote.fee_amount,
        "Priced"
    );
    Ok(quote)
}

/// A priced trade applied to a copy of its pool
#[derive(Debug, Clone)]
pub(crate) struct Settlement {
    pub direction: Direction,
    pub quote: SwapQuote,
    pub protocol_fee: u64,
    pub next: Pool,
}

impl Settlement {
    pub fn receipt(&self) -> SwapReceipt {
        let (reserve_in_after, reserve_out_after) = self.next.snapshot(self.direction).get_liquidity();
        SwapReceipt {
            amount_in: self.quote.amount_in,
            amount_out: self.quote.amount_out,
            fee_amount: self.quote.fee_amount,
            protocol_fee: self.protocol_fee,
            reserve_in_after,
            reserve_out_after,
        }
    }

    pub fn record(&self, trader: &TraderId, timestamp_ns: u64) -> SwapRecord {
        let (asset_in, asset_out) = self.next.pair().assets(self.direction);
        let receipt = self.receipt();
        SwapRecord {
            trader: trader.clone(),
            asset_in: asset_in.clone(),
            asset_out: asset_out.clone(),
            amount_in: receipt.amount_in,
            amount_out: receipt.amount_out,
            fee_amount: receipt.fee_amount,
            reserve_in_after: receipt.reserve_in_after,
            reserve_out_after: receipt.reserve_out_after,
            timestamp_ns,
        }
    }
}

/// Apply a quote to a copy of `pool`, setting aside the protocol fee.
///
/// The input reserve is credited with `amount_in - protocol_fee`.
pub(crate) fn settle(
    ledger: &PoolLedger,
    pool: &Pool,
    direction: Direction,
    quote: SwapQuote,
) -> Result<Settlement> {
    let protocol_fee = ledger.protocol_fee_for(quote.fee_amount)?;
    let next = pool.settle_swap(direction, quote.amount_in, quote.amount_out, protocol_fee)?;

    debug!(pair = %pool.pair(), protocol_fee, "Settled");
    Ok(Settlement {
        direction,
        quote,
        protocol_fee,
        next,
    })
}
