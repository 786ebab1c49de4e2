//! kswap operator CLI
//!
//! Seeds pools from the configuration file, then quotes or executes one trade
//! and prints the result as JSON.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use kswap_config::defaults::DEFAULT_CONFIG_PATH;
use kswap_config::EngineConfig;
use kswap_engine::{Route, SwapEngine, SwapRequest};
use kswap_types::{AssetId, TraderId};
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "kswap")]
#[command(about = "Constant-product swap engine operator tool")]
#[command(version)]
struct Cli {
    /// Configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Quote a single-pool trade without executing it
    Quote {
        asset_in: String,
        asset_out: String,
        /// Exact amount to sell
        #[arg(long, conflicts_with = "amount_out")]
        amount_in: Option<u64>,
        /// Exact amount to buy
        #[arg(long)]
        amount_out: Option<u64>,
    },
    /// Execute a single-pool exact-input trade
    Swap {
        asset_in: String,
        asset_out: String,
        /// Amount to sell
        amount_in: u64,
        /// Smallest acceptable output
        #[arg(long, default_value_t = 0)]
        min_amount_out: u64,
        #[arg(long, default_value = "operator")]
        trader: String,
    },
    /// Quote or execute a multi-hop trade
    Route {
        /// Assets to trade through, e.g. WETH,USDC,DAI
        #[arg(long, value_delimiter = ',', required = true)]
        path: Vec<String>,
        /// Amount of the first asset to sell
        #[arg(long)]
        amount_in: u64,
        /// Smallest acceptable final output
        #[arg(long, default_value_t = 0)]
        min_amount_out: u64,
        /// Settle the route instead of only quoting it
        #[arg(long)]
        execute: bool,
        #[arg(long, default_value = "operator")]
        trader: String,
    },
    /// Show every seeded pool
    Pools,
}

fn init_tracing(default_level: &str) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{json}");
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = EngineConfig::load(Some(&cli.config))
        .with_context(|| format!("Failed to load config {}", cli.config.display()))?;
    init_tracing(&config.engine.log_level);
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let (engine, _admin) = SwapEngine::from_config(&config)?;

    match cli.command {
        Commands::Quote {
            asset_in,
            asset_out,
            amount_in,
            amount_out,
        } => {
            let asset_in = AssetId::new(asset_in);
            let asset_out = AssetId::new(asset_out);
            let quote = match (amount_in, amount_out) {
                (Some(amount_in), None) => engine.quote_exact_input(&asset_in, &asset_out, amount_in)?,
                (None, Some(amount_out)) => engine.quote_exact_output(&asset_in, &asset_out, amount_out)?,
                _ => bail!("pass exactly one of --amount-in or --amount-out"),
            };
            print_json(&quote)
        }
        Commands::Swap {
            asset_in,
            asset_out,
            amount_in,
            min_amount_out,
            trader,
        } => {
            let request = SwapRequest::exact_input(trader, asset_in, asset_out, amount_in, min_amount_out);
            let receipt = engine.swap_exact_input(&request)?;
            print_json(&receipt)
        }
        Commands::Route {
            path,
            amount_in,
            min_amount_out,
            execute,
            trader,
        } => {
            let assets: Vec<AssetId> = path.into_iter().map(AssetId::new).collect();
            let route = Route::through(&assets)?;
            if execute {
                let receipt = engine.multi_hop_swap(
                    &TraderId::new(trader),
                    &route,
                    amount_in,
                    min_amount_out,
                    None,
                )?;
                print_json(&receipt)
            } else {
                print_json(&engine.quote_route(&route, amount_in)?)
            }
        }
        Commands::Pools => {
            let ledger = engine.ledger();
            let pools = ledger
                .pairs()
                .iter()
                .map(|pair| ledger.pool(pair))
                .collect::<kswap_types::Result<Vec<_>>>()?;
            print_json(&pools)
        }
    }
}
