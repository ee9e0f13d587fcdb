//! Rental service server
//!
//! Reads configuration from TOML (`~/.config/rental-service/config.toml`,
//! or the path in `RENTAL_CONFIG`) and runs until SIGINT or SIGTERM.

use std::path::PathBuf;

use tracing::{error, info};

use rental_management::server::{init_tracing, ServerHandle, ServerOptions};
use rental_management::{default_config_path, AppConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::var("RENTAL_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| default_config_path());

    let config = match AppConfig::load(&config_path) {
        Ok(cfg) => {
            init_tracing(&cfg);
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            let cfg = AppConfig::default();
            init_tracing(&cfg);
            error!("Failed to load config from {}: {}. Using defaults.", config_path.display(), e);
            cfg
        }
    };

    let handle = ServerHandle::start(ServerOptions {
        config,
        ..Default::default()
    })
    .await?;
    handle.install_signal_handler();

    info!("🚀 Press Ctrl+C to shutdown gracefully.");

    handle.shutdown_signal().wait().await;
    handle.wait().await;

    Ok(())
}
