//! Command-line client for the dealership reservation API.
//!
//! Reads configuration from `dealer-reservation.toml` and `DEALER_*`
//! environment variables (a `.env` file is honored). The access token for
//! authenticated commands comes from `DEALER_ACCESS_TOKEN`.

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use dealer_reservation::application::services::{CatalogService, HistoryService};
use dealer_reservation::application::workflow::Workflow;
use dealer_reservation::config::ClientConfig;
use dealer_reservation::domain::value_objects::{AccessoryId, VehicleId};
use dealer_reservation::infrastructure::remote::{
    AccessToken, HttpRemoteService, RemoteService, SessionCredentials,
};
use dealer_reservation::telemetry::{self, LogFormat};
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// Environment variable holding the access token.
const TOKEN_ENV: &str = "DEALER_ACCESS_TOKEN";

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Vehicle price simulation, quotation and reservation client.
#[derive(Debug, Parser)]
#[command(name = "dealer-reservation", version, about, long_about = None)]
struct Cli {
    /// Configuration file name, without extension.
    #[arg(short, long, default_value = "dealer-reservation")]
    config: String,

    /// Output format.
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Log line format.
    #[arg(long, global = true, default_value = "compact", value_enum)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List vehicles
    Vehicles {
        /// Include vehicles that are not available
        #[arg(long)]
        all: bool,
    },

    /// List accessories
    Accessories,

    /// Price a vehicle with accessories
    Simulate {
        /// Vehicle id
        vehicle: VehicleId,
        /// Accessory ids
        accessories: Vec<AccessoryId>,
        /// Issue a binding quote for the estimate (needs a token)
        #[arg(long)]
        quote: bool,
    },

    /// List my quotes (needs a token)
    Quotes,

    /// List my reservations (needs a token)
    Reservations,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    telemetry::init(cli.log_format)?;

    let config = ClientConfig::load_from(&cli.config).context("loading configuration")?;
    let session = Arc::new(match std::env::var(TOKEN_ENV) {
        Ok(token) if !token.trim().is_empty() => {
            SessionCredentials::with_token(AccessToken::new(token.trim()))
        }
        _ => SessionCredentials::new(),
    });
    debug!(base_url = %config.base_url, "client configured");

    let remote: Arc<dyn RemoteService> = Arc::new(HttpRemoteService::from_config(
        &config,
        session.clone(),
    )?);

    match cli.command {
        Commands::Vehicles { all } => {
            let filter = if all {
                None
            } else {
                CatalogService::DEFAULT_FILTER
            };
            let vehicles = CatalogService::new(remote).list_vehicles(filter).await?;
            emit(cli.output, &vehicles, |v| {
                format!("{}  {}  {}", v.id(), v, v.status())
            })?;
        }
        Commands::Accessories => {
            let accessories = CatalogService::new(remote).list_accessories().await?;
            emit(cli.output, &accessories, |a| format!("{}  {}", a.id(), a))?;
        }
        Commands::Simulate {
            vehicle,
            accessories,
            quote,
        } => {
            let workflow = Workflow::new(remote, session)
                .with_deposit_rate_hint(config.deposit_rate_hint);
            workflow.load_catalog(None).await?;
            workflow.select_vehicle(vehicle)?;
            for id in accessories {
                workflow.toggle_accessory(id)?;
            }

            let estimate = workflow.simulate().await?;
            emit(cli.output, estimate.lines(), ToString::to_string)?;
            if cli.output == OutputFormat::Text {
                println!("total  {}", estimate.total());
            }

            if quote {
                let issued = workflow.issue_quote().await?;
                let preview = workflow.snapshot().deposit_preview;
                match cli.output {
                    OutputFormat::Json => print_json(&issued)?,
                    OutputFormat::Text => {
                        println!("{issued}");
                        if let Some(deposit) = preview {
                            println!(
                                "deposit  {deposit} ({} of the final amount)",
                                workflow.deposit_rate_hint()
                            );
                        }
                    }
                }
            }
        }
        Commands::Quotes => {
            let quotes = HistoryService::new(remote).my_quotes().await?;
            emit(cli.output, &quotes, ToString::to_string)?;
        }
        Commands::Reservations => {
            let reservations = HistoryService::new(remote).my_reservations().await?;
            emit(cli.output, &reservations, ToString::to_string)?;
        }
    }
    Ok(())
}

fn emit<T: Serialize>(
    format: OutputFormat,
    items: &[T],
    line: impl Fn(&T) -> String,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => print_json(&items),
        OutputFormat::Text => {
            for item in items {
                println!("{}", line(item));
            }
            Ok(())
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
