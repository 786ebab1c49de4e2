//! Engine Configuration Module
//!
//! Loads engine settings and pool seeds from a TOML file with `KSWAP_`
//! prefixed environment overrides.

use crate::defaults::*;
use anyhow::{bail, Context, Result};
use config_crate::{Config, Environment, File, Map};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Main engine configuration structure
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// Pricing and routing settings
    pub engine: EngineSettings,

    /// Swap event log output
    pub event_log: EventLogSettings,

    /// Pools created at startup
    pub pools: Vec<PoolSeed>,
}

/// Pricing and routing settings
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct EngineSettings {
    pub default_fee_bps: u32,
    pub protocol_fee_share_bps: u32,
    pub max_hops: usize,
    pub log_level: String,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            default_fee_bps: DEFAULT_FEE_BPS,
            protocol_fee_share_bps: DEFAULT_PROTOCOL_FEE_SHARE_BPS,
            max_hops: DEFAULT_MAX_HOPS,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

/// Swap event log output
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct EventLogSettings {
    /// JSON-lines file; records are kept in memory when unset
    pub path: Option<PathBuf>,
}

/// Pool created and funded at startup
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PoolSeed {
    pub asset_a: String,
    pub asset_b: String,
    #[serde(default)]
    pub reserve_a: u64,
    #[serde(default)]
    pub reserve_b: u64,
    pub fee_bps: Option<u32>,
}

impl EngineConfig {
    /// Load configuration from a file with environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, None)
    }

    /// Load with an explicit environment map instead of the process environment
    pub fn load_with_env(path: Option<&Path>, env: Option<Map<String, String>>) -> Result<Self> {
        let path = path.unwrap_or(Path::new(DEFAULT_CONFIG_PATH));
        info!("Loading engine config: {:?}", path);

        let config = Config::builder()
            .add_source(File::from(path).required(true))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true)
                    .source(env),
            )
            .build()
            .context("Failed to build configuration")?;

        let config: Self = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;
        config.validate()?;

        debug!(
            pools = config.pools.len(),
            default_fee_bps = config.engine.default_fee_bps,
            "Engine config loaded"
        );
        Ok(config)
    }

    /// Reject settings the engine cannot honor
    pub fn validate(&self) -> Result<()> {
        let engine = &self.engine;
        if engine.default_fee_bps >= BPS_DENOMINATOR {
            bail!("default_fee_bps must be below {BPS_DENOMINATOR}, got {}", engine.default_fee_bps);
        }
        if engine.protocol_fee_share_bps >= BPS_DENOMINATOR {
            bail!(
                "protocol_fee_share_bps must be below {BPS_DENOMINATOR}, got {}",
                engine.protocol_fee_share_bps
            );
        }
        if engine.max_hops == 0 {
            bail!("max_hops must be at least 1");
        }

        let mut seen = HashSet::new();
        for seed in &self.pools {
            if seed.asset_a == seed.asset_b {
                bail!("pool seed pairs {} with itself", seed.asset_a);
            }
            if let Some(fee_bps) = seed.fee_bps {
                if fee_bps >= BPS_DENOMINATOR {
                    bail!("pool {}/{} fee_bps {fee_bps} out of range", seed.asset_a, seed.asset_b);
                }
            }
            if (seed.reserve_a == 0) != (seed.reserve_b == 0) {
                bail!(
                    "pool {}/{} must seed both reserves or neither",
                    seed.asset_a,
                    seed.asset_b
                );
            }
            let key = if seed.asset_a < seed.asset_b {
                (seed.asset_a.as_str(), seed.asset_b.as_str())
            } else {
                (seed.asset_b.as_str(), seed.asset_a.as_str())
            };
            if !seen.insert(key) {
                bail!("duplicate pool seed {}/{}", key.0, key.1);
            }
        }
        Ok(())
    }

    /// Fee for a seeded pool, falling back to the engine default
    pub fn fee_for(&self, seed: &PoolSeed) -> u32 {
        seed.fee_bps.unwrap_or(self.engine.default_fee_bps)
    }
}
