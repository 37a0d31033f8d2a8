//! Bulk Sender - Main entry point
//!
//! Starts the HTTP front door for the bulk messaging pipeline: CSV upload
//! in, personalized sends out through the messaging automation gateway.

use anyhow::Result;
use bulk_sender::client::GatewayClient;
use bulk_sender::server::{run_server, AppState};
use bulk_sender::{Config, MessageSender};
use std::fs;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    // Initialize logging: stderr plus an append-only log file with one
    // line per send attempt
    let file_appender = tracing_appender::rolling::never(".", "bulk_sender.log");
    let (file_writer, _log_guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone()));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(file_writer),
        )
        .init();

    info!("Configuration loaded successfully");
    info!(
        "Starting bulk sender with gateway URL: {}",
        config.gateway_base_url
    );

    // Upload and report directories must exist before the first request
    for dir in [&config.upload_dir, &config.report_dir] {
        if let Err(e) = fs::create_dir_all(dir) {
            error!("Failed to create directory {}: {}", dir.display(), e);
            return Err(e.into());
        }
    }

    // Initialize the gateway client; handlers share its metrics collector
    let client = GatewayClient::new(&config);
    let metrics = client.metrics().clone();
    let sender = Arc::new(client) as Arc<dyn MessageSender>;

    let state = AppState::new(config, sender, metrics);

    run_server(state).await?;

    info!("Bulk sender shutdown complete");
    Ok(())
}
