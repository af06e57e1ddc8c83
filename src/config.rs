use crate::error::{env_error, ServiceResult};
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::env;

/// Default port for the HTTP server
pub const DEFAULT_PORT: u16 = 3000;

/// Default address the HTTP server binds to
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1";

/// Main configuration structure for the service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Google Calendar ID the service proxies
    pub google_calendar_id: String,
    /// Path to the service account credentials JSON file
    pub google_service_account_key: String,
    /// Address the HTTP server binds to
    pub bind_address: String,
    /// Port the HTTP server listens on
    pub port: u16,
}

impl Config {
    /// Load configuration from environment
    pub fn load() -> ServiceResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        // Required environment variables
        let google_calendar_id =
            env::var("GOOGLE_CALENDAR_ID").map_err(|_| env_error("GOOGLE_CALENDAR_ID"))?;
        let google_service_account_key = env::var("GOOGLE_SERVICE_ACCOUNT_KEY")
            .map_err(|_| env_error("GOOGLE_SERVICE_ACCOUNT_KEY"))?;

        let bind_address =
            env::var("BIND_ADDRESS").unwrap_or_else(|_| String::from(DEFAULT_BIND_ADDRESS));

        // Parse numeric values
        let port = match env::var("PORT") {
            Ok(value) => value
                .parse::<u16>()
                .map_err(|_| env_error("Invalid PORT format"))?,
            Err(_) => DEFAULT_PORT,
        };

        Ok(Config {
            google_calendar_id,
            google_service_account_key,
            bind_address,
            port,
        })
    }
}
