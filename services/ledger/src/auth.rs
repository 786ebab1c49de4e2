//! Admin capability for privileged ledger operations

use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_LEDGER_ID: AtomicU64 = AtomicU64::new(1);

pub(crate) fn next_ledger_id() -> u64 {
    NEXT_LEDGER_ID.fetch_add(1, Ordering::Relaxed)
}

/// Proof of authority over one ledger.
///
/// Minted exactly once, by [`PoolLedger::new`](crate::PoolLedger::new), and
/// deliberately not `Clone`. Fee withdrawal, fee changes and resuming a halted
/// pool require it.
#[derive(Debug)]
pub struct AdminCap {
    ledger_id: u64,
}

impl AdminCap {
    pub(crate) fn new(ledger_id: u64) -> Self {
        Self { ledger_id }
    }

    pub(crate) fn ledger_id(&self) -> u64 {
        self.ledger_id
    }
}
