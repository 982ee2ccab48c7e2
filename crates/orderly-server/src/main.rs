//! # Orderly Server
//!
//! Entry point for the Orderly REST API.

use orderly_config::{ConfigLoader, ObservabilityConfig};
use orderly_server::app::AppBuilder;
use orderly_server::startup::print_banner;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Configuration decides the log format, so it loads first.
    let config = match ConfigLoader::from_default_location() {
        Ok(loader) => loader.into_config(),
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config.observability);
    print_banner();

    info!("Starting Orderly Server...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    info!("Environment: {}", config.app.environment);

    if let Err(e) = AppBuilder::new().with_config(config).run().await {
        error!("Application error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(config: &ObservabilityConfig) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "{},orderly=debug,tower_http=debug",
            config.log_level
        ))
    });

    let registry = tracing_subscriber::registry().with(filter);
    if config.is_json() {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .init();
    }
}
