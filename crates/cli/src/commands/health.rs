//! Health command

use std::process::ExitCode;

use crate::client::ApiClient;
use crate::output::{color_status, format_connection_failure, print_error, print_json, OutputFormat};

/// Query `/health` and print the service status
pub async fn health(client: &ApiClient, format: OutputFormat) -> ExitCode {
    match client.health().await {
        Ok(health) => {
            match format {
                OutputFormat::Json => print_json(&health),
                OutputFormat::Table => {
                    println!("Status:   {}", color_status(&health.status));
                    println!("Message:  {}", health.message);
                }
            }
            if health.status == "OK" {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(crate::client::ClientError::Connection(e)) => {
            print_error(&format_connection_failure(&e));
            ExitCode::FAILURE
        }
        Err(e) => {
            print_error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}
