//! Error taxonomy for pricing, ledger and execution failures
//!
//! Every variant is fatal to the current call and is never retried internally.
//! Callers resubmit with fresh bounds on [`SwapError::SlippageExceeded`] and
//! [`SwapError::Expired`]; everything else signals misuse or a state
//! inconsistency that should reach an operator.

use crate::ids::PairId;
use thiserror::Error;

/// Result alias used across all kswap library crates
pub type Result<T> = std::result::Result<T, SwapError>;

/// Unified error type for swap operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SwapError {
    /// Input or output amount was zero
    #[error("Amount must be greater than zero")]
    ZeroAmount,

    /// No pool registered for the pair
    #[error("Pool not found: {pair}")]
    PoolNotFound { pair: PairId },

    /// A pool is already registered for the pair
    #[error("Pool already exists: {pair}")]
    PoolAlreadyExists { pair: PairId },

    /// Reserves cannot cover the request (also raised for empty reserves)
    #[error("Insufficient liquidity: requested {requested}, available {available}")]
    InsufficientLiquidity { requested: u64, available: u64 },

    /// Requested output is not strictly below the output reserve
    #[error("Insufficient output: requested {requested}, reserve {reserve_out}")]
    InsufficientOutput { requested: u64, reserve_out: u64 },

    /// Exact-input trade would return less than the caller's minimum
    #[error("Slippage exceeded: output {amount_out} below minimum {min_amount_out}")]
    SlippageExceeded { amount_out: u64, min_amount_out: u64 },

    /// Exact-output trade would cost more than the caller's maximum
    #[error("Excessive input: required {amount_in} above maximum {max_amount_in}")]
    ExcessiveInput { amount_in: u64, max_amount_in: u64 },

    /// Product of reserves decreased across a trade
    #[error("Invariant violation on {pair}: k dropped from {k_before} to {k_after}")]
    InvariantViolation {
        pair: PairId,
        k_before: u128,
        k_after: u128,
    },

    /// Route or pair is malformed
    #[error("Invalid path: {reason}")]
    InvalidPath { reason: String },

    /// Caller deadline already passed at entry
    #[error("Expired: deadline {deadline_ns}ns, now {now_ns}ns")]
    Expired { deadline_ns: u64, now_ns: u64 },

    /// Result does not fit the output width
    #[error("Arithmetic overflow")]
    ArithmeticOverflow,

    /// Divisor was zero
    #[error("Division by zero")]
    DivisionByZero,

    /// Fee rate outside [0, 10000) basis points
    #[error("Invalid fee: {fee_bps} bps (must be below 10000)")]
    InvalidFee { fee_bps: u32 },

    /// Pool is circuit-broken after an invariant violation
    #[error("Pool halted: {pair}")]
    PoolHalted { pair: PairId },

    /// Settled pool was not derived from the pool's current state
    #[error("Stale pool state: {pair}")]
    StalePool { pair: PairId },

    /// Admin capability does not belong to this ledger
    #[error("Unauthorized: admin capability does not match this ledger")]
    Unauthorized,
}

impl SwapError {
    /// Create an invalid path error
    pub fn invalid_path(reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            reason: reason.into(),
        }
    }

    /// Whether resubmitting with fresh bounds can succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::SlippageExceeded { .. } | Self::Expired { .. })
    }

    /// Whether the error indicates a bug that must halt automated trading
    pub fn is_critical(&self) -> bool {
        matches!(self, Self::InvariantViolation { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::AssetId;

    #[test]
    fn test_retry_classification() {
        assert!(SwapError::SlippageExceeded {
            amount_out: 1,
            min_amount_out: 2
        }
        .is_retryable());
        assert!(SwapError::Expired {
            deadline_ns: 1,
            now_ns: 2
        }
        .is_retryable());
        assert!(!SwapError::ZeroAmount.is_retryable());
        assert!(!SwapError::ArithmeticOverflow.is_retryable());
    }

    #[test]
    fn test_invariant_violation_is_critical() {
        let pair = PairId::new(AssetId::new("A"), AssetId::new("B")).unwrap();
        let err = SwapError::InvariantViolation {
            pair,
            k_before: 10,
            k_after: 9,
        };
        assert!(err.is_critical());
        assert!(!err.is_retryable());
        assert_eq!(
            err.to_string(),
            "Invariant violation on A/B: k dropped from 10 to 9"
        );
    }
}
