//! Okta Provisioning Inventory - command line entry point.
//!
//! Writes a timestamped CSV describing provisioning for every Okta application.

#![deny(clippy::all)]

use anyhow::{Context, Result};
use chrono::Local;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use okta_provisioning_inventory::config::Config;
use okta_provisioning_inventory::error::AppError;
use okta_provisioning_inventory::inventory::{InventoryBuilder, ThrottlePolicy};
use okta_provisioning_inventory::okta::OktaClient;
use okta_provisioning_inventory::report::{self, ReportSummary};

fn main() {
    // Load .env file (if present) before anything else
    if let Err(e) = dotenvy::dotenv() {
        // .env file is optional - only log if it's not a "file not found" error
        if !e.not_found() {
            eprintln!("Warning: Failed to load .env file: {}", e);
        }
    }

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            init_logging("info");
            let err = AppError::from(e);
            error!("Failed to load configuration: {}", err);
            eprintln!("Configuration error: {}", err);
            eprintln!("{}", err.user_message());
            std::process::exit(1);
        }
    };

    init_logging(&config.logging.level);
    info!(
        "Starting Okta provisioning inventory v{}",
        env!("CARGO_PKG_VERSION")
    );
    if let Some(path) = &config.settings_path {
        debug!("Loaded settings from {:?}", path);
    }

    if let Err(e) = run(&config) {
        error!("Inventory failed: {:#}", e);
        match e.downcast_ref::<AppError>() {
            Some(app_error) => eprintln!("{}", app_error.user_message()),
            None => eprintln!("Inventory failed: {:#}", e),
        }
        std::process::exit(1);
    }
}

/// Initialize tracing/logging.
fn init_logging(default_level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_thread_ids(false)
        .init();
}

/// Build the inventory and export it.
fn run(config: &Config) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create Tokio runtime")?;

    let client = OktaClient::from_config(config).map_err(AppError::from)?;
    info!("Connecting to {}", config.base_url());

    let builder = InventoryBuilder::new(
        &client,
        ThrottlePolicy::from(config),
        config.api.page_size,
    );
    let rows = runtime
        .block_on(builder.run())
        .map_err(AppError::from)?;

    let path = report::export(
        &rows,
        &config.output.directory,
        &config.output.file_prefix,
        Local::now(),
    )
    .map_err(AppError::from)?;

    let summary = ReportSummary::from_rows(&rows);
    info!("Report written to {}", path.display());
    info!(
        "Applications: {} total, {} active, {} with provisioning enabled",
        summary.total, summary.active, summary.provisioning_enabled
    );

    Ok(())
}
