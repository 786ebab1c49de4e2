//! # kswap Configuration
//!
//! Centralized configuration and defaults for the kswap engine and its
//! operator CLI.
//!
//! ## Features
//!
//! - **Engine Settings**: default fee, protocol fee share, route length limit
//! - **Event Log**: optional JSON-lines output path
//! - **Pool Seeds**: pools created and funded at startup
//!
//! ## Usage
//!
//! ```rust,no_run
//! use kswap_config::EngineConfig;
//! use std::path::Path;
//!
//! let config = EngineConfig::load(Some(Path::new("config/kswap.toml"))).unwrap();
//! println!("default fee: {} bps", config.engine.default_fee_bps);
//! ```

pub mod defaults;
pub mod engine_config;

pub use engine_config::{EngineConfig, EngineSettings, EventLogSettings, PoolSeed};
