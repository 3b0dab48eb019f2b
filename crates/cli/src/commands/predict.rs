//! Prediction command

use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::{Datelike, Local, NaiveDate};
use colored::Colorize;

use crate::client::{ApiClient, ClientError, PredictRequest};
use crate::output::{
    format_connection_failure, format_prediction, print_error, print_info, print_inputs,
    print_json, print_success, OutputFormat, PREDICTION_FAILED,
};

/// Build a request from command-line values, defaulting the date to today
pub fn build_request(
    date: Option<&str>,
    tmin: f64,
    tmax: f64,
    prcp: f64,
    wspd: f64,
) -> Result<PredictRequest> {
    let date = match date {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))?,
        None => Local::now().date_naive(),
    };

    Ok(PredictRequest {
        day: date.day(),
        month: date.month(),
        year: date.year(),
        tmin,
        tmax,
        prcp,
        wspd,
    })
}

/// Submit one observation and render the outcome
pub async fn predict(
    client: &ApiClient,
    request: &PredictRequest,
    format: OutputFormat,
    verbose: bool,
) -> ExitCode {
    if verbose {
        if let OutputFormat::Table = format {
            print_inputs(request);
        }
    }

    match client.predict(request).await {
        Ok(response) => {
            match format {
                OutputFormat::Json => print_json(&response),
                OutputFormat::Table => print_success(&format_prediction(response.prediction)),
            }
            ExitCode::SUCCESS
        }
        Err(ClientError::Connection(e)) => {
            print_error(&format_connection_failure(&e));
            ExitCode::FAILURE
        }
        Err(ClientError::Api { status, detail }) => {
            print_error(PREDICTION_FAILED);
            if verbose {
                print_info(&format!("{} {}", status.as_u16().to_string().dimmed(), detail));
            }
            ExitCode::FAILURE
        }
        Err(e) => {
            print_error(PREDICTION_FAILED);
            if verbose {
                print_info(&e.to_string());
            }
            ExitCode::FAILURE
        }
    }
}
