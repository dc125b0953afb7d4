//! Cafe Template - runs the starter script against the local sidecar.

use anyhow::{Context, Result};
use cafe_sdk::{CafeClient, CallContext};
use cafe_template::{run, RunOptions, ScriptConfig};
use clap::Parser;
use std::time::Duration;
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "cafe-template")]
#[command(about = "Starter script for the Cafe Scraper platform")]
struct Args {
    /// Sidecar address (defaults to $CAFE_SDK_ADDR or 127.0.0.1:20086)
    #[arg(long)]
    address: Option<String>,

    /// URL fetched by the script
    #[arg(long, default_value = ScriptConfig::TARGET_URL)]
    target_url: String,

    /// Milliseconds to wait for the sidecar before connecting
    #[arg(long, default_value_t = ScriptConfig::STARTUP_DELAY.as_millis() as u64)]
    startup_delay_ms: u64,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Set up logging
    let filter = if args.debug {
        EnvFilter::new(Level::DEBUG.as_str())
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(Level::INFO.as_str()))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();

    let startup_delay = Duration::from_millis(args.startup_delay_ms);
    if !startup_delay.is_zero() {
        tokio::time::sleep(startup_delay).await;
    }

    let mut builder = CafeClient::builder().with_env();
    if let Some(address) = args.address {
        builder = builder.address(address);
    }
    info!("Connecting to sidecar at {}", builder.config().address);
    let client = builder.connect().await.context("Sidecar is not reachable")?;

    let options = RunOptions {
        target_url: args.target_url,
        ..RunOptions::from_env()
    };

    let summary = run(&client, &CallContext::background(), &options)
        .await
        .context("Script run failed")?;
    info!(
        "Done: HTTP {} from {}, {} rows pushed",
        summary.status, summary.ip, summary.rows_pushed
    );

    Ok(())
}
