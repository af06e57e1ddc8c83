use crate::components::google_calendar::token::ServiceAccountKey;
use crate::components::google_calendar::GoogleCalendarClient;
use crate::config::Config;
use crate::error::Error;
use crate::routes::{router, AppState};
use crate::shutdown;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Initialize logging with environment-based configuration
pub fn init_logging() -> miette::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| Error::Other(format!("Failed to set up logging: {}", e)))?;

    Ok(())
}

/// Load and initialize the application config
pub fn load_config() -> miette::Result<Config> {
    match Config::load() {
        Ok(config) => Ok(config),
        Err(e) => {
            error!("Failed to load configuration: {:?}", e);
            Err(e.into())
        }
    }
}

/// Initialize the calendar client and start the HTTP server
pub async fn start_server(config: Config) -> miette::Result<()> {
    let key = ServiceAccountKey::from_file(&config.google_service_account_key)?;
    info!("Loaded service account credentials for {}", key.client_email);

    let client = GoogleCalendarClient::new(config.google_calendar_id.clone(), key);
    let state = AppState {
        calendar: Arc::new(client),
    };

    let app = router(state);

    let addr: SocketAddr = format!("{}:{}", config.bind_address, config.port)
        .parse()
        .map_err(|e| Error::Config(format!("Invalid bind address: {}", e)))?;
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.map_err(Error::from)?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown::wait_for_signal())
        .await
        .map_err(Error::from)?;

    info!("Server shut down");
    Ok(())
}
