//! Output formatting utilities

use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use crate::client::PredictRequest;

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

/// Generic message shown for any non-200 predict response
pub const PREDICTION_FAILED: &str = "Error in prediction.";

/// Row of the submitted-inputs table
#[derive(Tabled)]
struct InputRow {
    #[tabled(rename = "Field")]
    field: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

/// Print the observation about to be submitted
pub fn print_inputs(request: &PredictRequest) {
    let rows = vec![
        InputRow {
            field: "Date",
            value: format!("{:04}-{:02}-{:02}", request.year, request.month, request.day),
        },
        InputRow {
            field: "Minimum Temperature (°C)",
            value: format!("{:.2}", request.tmin),
        },
        InputRow {
            field: "Maximum Temperature (°C)",
            value: format!("{:.2}", request.tmax),
        },
        InputRow {
            field: "Precipitation (mm)",
            value: format!("{:.2}", request.prcp),
        },
        InputRow {
            field: "Wind Speed (km/h)",
            value: format!("{:.2}", request.wspd),
        },
    ];
    println!("{}", Table::new(rows).with(Style::rounded()));
}

/// Print any serializable value as pretty JSON
pub fn print_json<T: Serialize>(value: &T) {
    if let Ok(json) = serde_json::to_string_pretty(value) {
        println!("{}", json);
    }
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// Sentence shown for a successful prediction
pub fn format_prediction(prediction: f64) -> String {
    format!("Predicted Average Temperature: {:.2} °C", prediction)
}

/// Sentence shown when the service cannot be reached
pub fn format_connection_failure(error: &dyn std::fmt::Display) -> String {
    format!("Failed to connect to server: {}", error)
}

/// Color service status based on value
pub fn color_status(status: &str) -> String {
    match status {
        "OK" => status.green().to_string(),
        "NOT_READY" => status.yellow().to_string(),
        _ => status.red().to_string(),
    }
}
