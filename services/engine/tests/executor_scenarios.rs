//! Single-pool executor behavior against a live ledger

use kswap_engine::{InMemorySwapLog, ManualClock, SwapEngine, SwapRequest};
use kswap_ledger::{AdminCap, LedgerConfig, PoolLedger};
use kswap_types::{AssetId, PairId, SwapError};
use std::sync::Arc;
use std::thread;

struct Harness {
    engine: SwapEngine,
    log: Arc<InMemorySwapLog>,
    admin: AdminCap,
    pair: PairId,
}

fn harness(reserve_a: u64, reserve_b: u64, protocol_fee_share_bps: u32) -> Harness {
    let (ledger, admin) = PoolLedger::new(LedgerConfig {
        default_fee_bps: 30,
        protocol_fee_share_bps,
    })
    .unwrap();
    let pair = PairId::new(AssetId::new("A"), AssetId::new("B")).unwrap();
    ledger.initialize(pair.clone()).unwrap();
    ledger
        .add_liquidity(&pair, &AssetId::new("A"), reserve_a, reserve_b)
        .unwrap();

    let log = Arc::new(InMemorySwapLog::new());
    let engine = SwapEngine::new(Arc::new(ledger))
        .with_sink(log.clone())
        .with_clock(Arc::new(ManualClock::new(42)));
    Harness {
        engine,
        log,
        admin,
        pair,
    }
}

#[test]
fn scenario_exact_input_quote_and_settlement() {
    let h = harness(1000, 2000, 0);
    let receipt = h
        .engine
        .swap_exact_input(&SwapRequest::exact_input("alice", "A", "B", 100, 180))
        .unwrap();

    assert_eq!(receipt.amount_in, 100);
    assert_eq!(receipt.amount_out, 180);
    assert_eq!(receipt.fee_amount, 1);
    assert_eq!((receipt.reserve_in_after, receipt.reserve_out_after), (1100, 1820));
    assert_eq!(h.engine.ledger().get_reserves(&h.pair).unwrap(), (1100, 1820));

    let records = h.log.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].asset_in, AssetId::new("A"));
    assert_eq!(records[0].amount_out, 180);
    assert_eq!(records[0].reserve_out_after, 1820);
    assert_eq!(records[0].timestamp_ns, 42);
}

#[test]
fn scenario_exact_output_never_undercharges() {
    let h = harness(1000, 2000, 0);
    let receipt = h
        .engine
        .swap_exact_output(&SwapRequest::exact_output("alice", "A", "B", 180, 1_000))
        .unwrap();

    assert!(receipt.amount_in >= 100);
    assert_eq!(receipt.amount_out, 180);
    let (reserve0, reserve1) = h.engine.ledger().get_reserves(&h.pair).unwrap();
    assert_eq!(reserve1, 1820);
    assert!(u128::from(reserve0) * u128::from(reserve1) >= 2_000_000);
}

#[test]
fn scenario_slippage_one_above_quote() {
    let h = harness(1000, 2000, 0);
    let a = AssetId::new("A");
    let b = AssetId::new("B");
    let quoted = h.engine.get_amount_out(&a, &b, 100).unwrap();

    let err = h
        .engine
        .swap_exact_input(&SwapRequest::exact_input("alice", "A", "B", 100, quoted + 1))
        .unwrap_err();
    assert_eq!(
        err,
        SwapError::SlippageExceeded {
            amount_out: quoted,
            min_amount_out: quoted + 1
        }
    );
    assert!(err.is_retryable());
    assert_eq!(h.engine.ledger().get_reserves(&h.pair).unwrap(), (1000, 2000));
    assert!(h.log.is_empty());
}

#[test]
fn excessive_input_rejected() {
    let h = harness(1000, 2000, 0);
    let needed = h
        .engine
        .get_amount_in(&AssetId::new("A"), &AssetId::new("B"), 180)
        .unwrap();

    assert_eq!(
        h.engine
            .swap_exact_output(&SwapRequest::exact_output("alice", "A", "B", 180, needed - 1)),
        Err(SwapError::ExcessiveInput {
            amount_in: needed,
            max_amount_in: needed - 1
        })
    );
    assert_eq!(h.engine.ledger().get_reserves(&h.pair).unwrap(), (1000, 2000));
}

#[test]
fn validation_failures_leave_state_untouched() {
    let h = harness(1000, 2000, 0);

    assert_eq!(
        h.engine
            .swap_exact_input(&SwapRequest::exact_input("alice", "A", "B", 0, 0)),
        Err(SwapError::ZeroAmount)
    );
    assert!(matches!(
        h.engine
            .swap_exact_input(&SwapRequest::exact_input("alice", "A", "Z", 10, 0)),
        Err(SwapError::PoolNotFound { .. })
    ));
    assert!(matches!(
        h.engine
            .swap_exact_output(&SwapRequest::exact_output("alice", "A", "B", 2000, u64::MAX)),
        Err(SwapError::InsufficientOutput {
            requested: 2000,
            reserve_out: 2000
        })
    ));
    assert_eq!(h.engine.ledger().get_reserves(&h.pair).unwrap(), (1000, 2000));
    assert!(h.log.is_empty());
}

#[test]
fn empty_pool_has_no_liquidity() {
    let (ledger, _admin) = PoolLedger::new(LedgerConfig::default()).unwrap();
    ledger
        .initialize(PairId::new(AssetId::new("A"), AssetId::new("B")).unwrap())
        .unwrap();
    let engine = SwapEngine::new(Arc::new(ledger));

    assert!(matches!(
        engine.swap_exact_input(&SwapRequest::exact_input("alice", "A", "B", 10, 0)),
        Err(SwapError::InsufficientLiquidity { .. })
    ));
}

#[test]
fn halted_pool_rejects_until_resumed() {
    let h = harness(1000, 2000, 0);
    let ledger = h.engine.ledger();
    ledger.halt(&h.pair).unwrap();

    let request = SwapRequest::exact_input("alice", "A", "B", 100, 0);
    assert!(matches!(
        h.engine.swap_exact_input(&request),
        Err(SwapError::PoolHalted { .. })
    ));

    // A ledger's capability does not unlock another ledger
    let (_other, foreign) = PoolLedger::new(LedgerConfig::default()).unwrap();
    assert_eq!(ledger.resume(&foreign, &h.pair), Err(SwapError::Unauthorized));

    ledger.resume(&h.admin, &h.pair).unwrap();
    assert_eq!(h.engine.swap_exact_input(&request).unwrap().amount_out, 180);
}

#[test]
fn protocol_fee_accrues_outside_reserves() {
    let h = harness(1_000_000, 1_000_000, 5_000);
    let receipt = h
        .engine
        .swap_exact_input(&SwapRequest::exact_input("alice", "B", "A", 10_000, 0))
        .unwrap();
    assert_eq!(receipt.fee_amount, 30);
    assert_eq!(receipt.protocol_fee, 15);

    let pool = h.engine.ledger().pool(&h.pair).unwrap();
    assert_eq!(pool.reserves().1, 1_000_000 + 10_000 - 15);
    assert_eq!(pool.protocol_fees(), (0, 15));
    assert!(pool.k() > 1_000_000_000_000);

    let ledger = h.engine.ledger();
    assert_eq!(ledger.withdraw_protocol_fees(&h.admin, &h.pair).unwrap(), (0, 15));
}

#[test]
fn queries_do_not_mutate() {
    let h = harness(5_000, 7_000, 0);
    let a = AssetId::new("A");
    let b = AssetId::new("B");
    let before = h.engine.ledger().pool(&h.pair).unwrap();

    for _ in 0..3 {
        assert_eq!(
            h.engine.get_amount_out(&a, &b, 321).unwrap(),
            h.engine.get_amount_out(&a, &b, 321).unwrap()
        );
        h.engine.get_amount_in(&b, &a, 77).unwrap();
        h.engine.get_price(&a, &b).unwrap();
        h.engine.get_price_impact(&b, &a, 500).unwrap();
    }
    assert_eq!(h.engine.ledger().pool(&h.pair).unwrap(), before);
    assert!(h.log.is_empty());
}

#[test]
fn concurrent_traders_keep_product_growing() {
    let h = harness(10_000_000, 10_000_000, 1_000);
    let engine = Arc::new(h.engine);
    let k_start = engine.ledger().pool(&h.pair).unwrap().k();

    let handles: Vec<_> = (0..8)
        .map(|worker| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                let (asset_in, asset_out) = if worker % 2 == 0 { ("A", "B") } else { ("B", "A") };
                for _ in 0..100 {
                    let request = SwapRequest::exact_input(
                        format!("trader-{worker}").as_str(),
                        asset_in,
                        asset_out,
                        5_000,
                        1,
                    );
                    engine.swap_exact_input(&request).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(h.log.len(), 800);
    assert!(engine.ledger().pool(&h.pair).unwrap().k() > k_start);
}
