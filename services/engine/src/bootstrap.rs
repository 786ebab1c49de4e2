//! Engine construction from configuration

use crate::events::{JsonLinesSwapLog, NullSink, SwapEventSink};
use crate::executor::SwapEngine;
use anyhow::{Context, Result};
use kswap_config::EngineConfig;
use kswap_ledger::{AdminCap, LedgerConfig, PoolLedger};
use kswap_types::{AssetId, PairId};
use std::sync::Arc;
use tracing::info;

impl SwapEngine {
    /// Build a ledger, seed its pools and attach the configured event sink.
    ///
    /// Without an event log path records are discarded through a [`NullSink`].
    /// Embedders that want them in memory attach their own sink with
    /// [`SwapEngine::with_sink`].
    pub fn from_config(config: &EngineConfig) -> Result<(Self, AdminCap)> {
        config.validate()?;

        let (ledger, admin) = PoolLedger::new(LedgerConfig {
            default_fee_bps: config.engine.default_fee_bps,
            protocol_fee_share_bps: config.engine.protocol_fee_share_bps,
        })
        .context("Failed to create pool ledger")?;

        for seed in &config.pools {
            let asset_a = AssetId::new(seed.asset_a.as_str());
            let asset_b = AssetId::new(seed.asset_b.as_str());
            let pair = PairId::new(asset_a.clone(), asset_b)
                .with_context(|| format!("Invalid pool seed {}/{}", seed.asset_a, seed.asset_b))?;

            ledger
                .initialize_with_fee(pair.clone(), config.fee_for(seed))
                .with_context(|| format!("Failed to initialize pool {pair}"))?;
            if seed.reserve_a > 0 {
                ledger
                    .add_liquidity(&pair, &asset_a, seed.reserve_a, seed.reserve_b)
                    .with_context(|| format!("Failed to fund pool {pair}"))?;
            }
        }

        let sink: Arc<dyn SwapEventSink> = match &config.event_log.path {
            Some(path) => Arc::new(
                JsonLinesSwapLog::create(path)
                    .with_context(|| format!("Failed to open event log {}", path.display()))?,
            ),
            None => Arc::new(NullSink),
        };

        info!(
            pools = ledger.len(),
            max_hops = config.engine.max_hops,
            "Swap engine ready"
        );
        let engine = SwapEngine::new(Arc::new(ledger))
            .with_sink(sink)
            .with_max_hops(config.engine.max_hops);
        Ok((engine, admin))
    }
}
