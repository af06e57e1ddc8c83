use tracing::info;

#[tokio::main]
async fn main() -> miette::Result<()> {
    // Initialize logging
    kalenteri::startup::init_logging()?;

    info!("Starting kalenteri");

    // Load configuration
    let config = kalenteri::startup::load_config()?;

    // Start the server
    kalenteri::startup::start_server(config).await
}
