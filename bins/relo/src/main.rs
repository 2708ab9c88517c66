//! Operations CLI for the payment request engine.
//!
//! Usage:
//!   relo sit-balance <payment-request-id>    - Print SIT balances as JSON
//!   relo recalc-candidates <shipment-id>     - List requests a shipment recalculation replaces
//!
//! Configuration is read from `config/` and `RELO__*` environment variables.

use anyhow::Context;
use clap::{Parser, Subcommand};
use relo_db::{ShipmentPaymentSitBalanceService, ShipmentRecalculator, connect};
use relo_shared::{AppConfig, AppError};
use relo_shared::config::LoggingConfig;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

#[derive(Debug, Parser)]
#[command(name = "relo", version, about = "Payment request recalculation and SIT balances")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the SIT balances of the shipments billed on a payment request
    SitBalance {
        /// Payment request to report on
        payment_request_id: Uuid,
    },
    /// List the pending payment requests a shipment recalculation would replace
    RecalcCandidates {
        /// Shipment whose weight changed
        shipment_id: Uuid,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = AppConfig::load().context("Failed to load configuration")?;
    init_logging(&config.logging);

    let db = connect(&config.database)
        .await
        .context("Failed to connect to database")?;
    info!("Connected to database");

    let output = match cli.command {
        Command::SitBalance { payment_request_id } => {
            let balances = ShipmentPaymentSitBalanceService::new(db)
                .list_shipment_payment_sit_balance(payment_request_id)
                .await
                .map_err(AppError::from)?;
            serde_json::to_string_pretty(&balances)?
        }
        Command::RecalcCandidates { shipment_id } => {
            let candidates = ShipmentRecalculator::find_candidates(&db, shipment_id)
                .await
                .map_err(AppError::from)?;
            info!(%shipment_id, candidates = candidates.len(), "dry run, nothing recalculated");
            serde_json::to_string_pretty(&candidates)?
        }
    };

    println!("{output}");
    Ok(())
}

/// Logs go to stderr so stdout stays valid JSON.
fn init_logging(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.filter));
    let registry = tracing_subscriber::registry().with(filter);

    if config.json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry.with(fmt::layer().with_writer(std::io::stderr)).init();
    }
}
