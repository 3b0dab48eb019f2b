//! Interactive form collecting one observation

use anyhow::{Context, Result};
use chrono::{Datelike, Local};
use inquire::{CustomType, DateSelect};

use crate::client::PredictRequest;

fn measurement(prompt: &str) -> Result<f64> {
    CustomType::<f64>::new(prompt)
        .with_default(0.0)
        .with_error_message("Please type a valid number")
        .prompt()
        .with_context(|| format!("No value entered for {}", prompt))
}

/// Prompt for the date and the four measurements.
///
/// Blocks on terminal input; run it off the async runtime.
pub fn prompt_observation() -> Result<PredictRequest> {
    println!("Enter the following details to predict the weather in Dubai:");

    let date = DateSelect::new("Select Date")
        .with_default(Local::now().date_naive())
        .prompt()
        .context("No date selected")?;

    Ok(PredictRequest {
        day: date.day(),
        month: date.month(),
        year: date.year(),
        tmin: measurement("Minimum Temperature (°C)")?,
        tmax: measurement("Maximum Temperature (°C)")?,
        prcp: measurement("Precipitation (mm)")?,
        wspd: measurement("Wind Speed (km/h)")?,
    })
}
