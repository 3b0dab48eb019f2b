//! Dubai Weather Predictor CLI
//!
//! Collects one weather observation, sends it to the prediction service
//! and prints the predicted average temperature.

mod client;
mod commands;
mod form;
mod output;

use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use commands::{health, predict};

/// Dubai Weather Predictor CLI
#[derive(Parser)]
#[command(name = "wxp")]
#[command(author, version, about = "CLI for the Dubai Weather Predictor", long_about = None)]
pub struct Cli {
    /// Prediction service URL (can also be set via WEATHER_API_URL env var)
    #[arg(long, env = "WEATHER_API_URL", default_value = "http://localhost:8000")]
    pub api_url: String,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,

    /// Output format
    #[arg(long, short, default_value = "table")]
    pub format: output::OutputFormat,

    /// Enable verbose output
    #[arg(long, short)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Predict the average temperature from command-line values
    Predict {
        /// Observation date as YYYY-MM-DD (defaults to today)
        #[arg(long)]
        date: Option<String>,

        /// Minimum temperature in °C
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        tmin: f64,

        /// Maximum temperature in °C
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        tmax: f64,

        /// Precipitation in mm
        #[arg(long, default_value_t = 0.0)]
        prcp: f64,

        /// Wind speed in km/h
        #[arg(long, default_value_t = 0.0)]
        wspd: f64,
    },

    /// Fill in the observation interactively, then predict
    Form,

    /// Show service health
    Health,
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let client = client::ApiClient::new(&cli.api_url, Duration::from_secs(cli.timeout_secs))?;

    let code = match cli.command {
        Commands::Predict {
            date,
            tmin,
            tmax,
            prcp,
            wspd,
        } => {
            let request = predict::build_request(date.as_deref(), tmin, tmax, prcp, wspd)?;
            predict::predict(&client, &request, cli.format, cli.verbose).await
        }
        Commands::Form => {
            let request = tokio::task::spawn_blocking(form::prompt_observation)
                .await
                .context("Form prompt task failed")??;
            predict::predict(&client, &request, cli.format, cli.verbose).await
        }
        Commands::Health => health::health(&client, cli.format).await,
    };

    Ok(code)
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            output::print_error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}
