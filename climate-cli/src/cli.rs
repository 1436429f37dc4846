use std::{fs, path::PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use climate_core::{
    Aggregator, Composer, Config, Diet, FootprintInput, SourceId, config::MIN_TIMEOUT_SECS,
};
use inquire::{CustomType, Text, validator::Validation};
use tracing::info;

use crate::output;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "climate", version, about = "Climate awareness dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactively set the default city and network limits.
    Configure,

    /// Fetch every data source for a city and show the dashboard.
    Show {
        /// City or region; defaults to the configured city.
        city: Option<String>,

        /// Print the composed dashboard (maps, charts, cards) as JSON.
        #[arg(long)]
        json: bool,

        /// Write the composed dashboard JSON to this file.
        #[arg(long, value_name = "PATH")]
        output: Option<PathBuf>,
    },

    /// List data sources and the endpoints they query.
    Sources,

    /// Estimate a yearly personal carbon footprint.
    Footprint {
        /// Return flights per year.
        #[arg(long, default_value_t = 2)]
        flights: u32,

        /// Kilometres driven per year.
        #[arg(long, default_value_t = 10_000.0)]
        car_km: f64,

        /// "daily-meat", "vegetarian" or "vegan".
        #[arg(long, default_value = "daily-meat")]
        diet: String,

        /// Yearly electricity bill.
        #[arg(long, default_value_t = 1_500.0)]
        bill: f64,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city, json, output: out_path } => show(city, json, out_path).await,
            Command::Sources => {
                let config = Config::load()?;
                for id in SourceId::all() {
                    println!("{:<12} {}", id.as_str(), config.endpoints.url(*id));
                }
                Ok(())
            }
            Command::Footprint {
                flights,
                car_km,
                diet,
                bill,
            } => {
                let input = FootprintInput {
                    flights,
                    car_km,
                    diet: Diet::try_from(diet.as_str())?,
                    electricity_bill: bill,
                };
                output::print_footprint(&input);
                Ok(())
            }
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let city = Text::new("Default city:")
        .with_default(&config.city_or_default(None))
        .prompt()?;
    config.default_city = Some(city.trim().to_string()).filter(|c| !c.is_empty());

    config.http.timeout_secs = CustomType::<u64>::new("Per-request timeout (seconds):")
        .with_default(config.http.timeout_secs.max(MIN_TIMEOUT_SECS))
        .with_error_message("Please enter a whole number of seconds")
        .with_validator(|secs: &u64| {
            Ok(if *secs < MIN_TIMEOUT_SECS {
                Validation::Invalid("Timeout must be at least 1 second".into())
            } else {
                Validation::Valid
            })
        })
        .prompt()?;

    let deadline = CustomType::<u64>::new("Whole-refresh deadline in seconds (0 = none):")
        .with_default(config.refresh_deadline_secs.unwrap_or(0))
        .with_error_message("Please enter a whole number of seconds")
        .prompt()?;
    config.refresh_deadline_secs = (deadline > 0).then_some(deadline);

    let path = config.save()?;
    println!("Saved configuration to {}", path.display());
    Ok(())
}

async fn show(city: Option<String>, json: bool, out_path: Option<PathBuf>) -> anyhow::Result<()> {
    let config = Config::load()?;
    let city = config.city_or_default(city.as_deref());

    let aggregator = Aggregator::from_config(&config)?;
    let bundle = aggregator.refresh(&city).await;

    if !json && out_path.is_none() {
        output::print_summary(&bundle);
        return Ok(());
    }

    let dashboard =
        Composer::new(config.fallback_center).compose(&bundle, &FootprintInput::default());
    let rendered =
        serde_json::to_string_pretty(&dashboard).context("Failed to serialize dashboard")?;

    if let Some(path) = out_path {
        fs::write(&path, &rendered)
            .with_context(|| format!("Failed to write dashboard: {}", path.display()))?;
        info!(path = %path.display(), "dashboard written");
    }

    if json {
        println!("{rendered}");
    } else {
        output::print_summary(&bundle);
    }

    Ok(())
}
