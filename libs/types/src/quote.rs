//! Ephemeral pricing result

use serde::{Deserialize, Serialize};

/// Result of a pricing query; carries no identity beyond the call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapQuote {
    pub amount_in: u64,
    pub amount_out: u64,
    /// Portion of `amount_in` charged as fee
    pub fee_amount: u64,
    /// Marginal price drop caused by the trade (advisory)
    pub price_impact_bps: u32,
}
