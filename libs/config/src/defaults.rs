//! Engine defaults
//!
//! Default values used when a configuration file or environment override
//! leaves a setting unspecified.

/// Swap fee applied to pools seeded without an explicit fee (0.30%)
pub const DEFAULT_FEE_BPS: u32 = 30;

/// Share of each swap fee set aside for the protocol (none by default)
pub const DEFAULT_PROTOCOL_FEE_SHARE_BPS: u32 = 0;

/// Longest route the router accepts
pub const DEFAULT_MAX_HOPS: usize = 4;

/// Log level when `RUST_LOG` is unset
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Default configuration file path
pub const DEFAULT_CONFIG_PATH: &str = "config/kswap.toml";

/// Environment variable prefix (`KSWAP_ENGINE__DEFAULT_FEE_BPS=25`)
pub const ENV_PREFIX: &str = "KSWAP";

/// Separator between nested keys in environment overrides
pub const ENV_SEPARATOR: &str = "__";

/// Basis point denominator
pub const BPS_DENOMINATOR: u32 = 10_000;
