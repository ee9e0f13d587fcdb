//! Rental service CLI
//!
//! Headless REST API server for property rental management, suitable for
//! deployment as a systemd service, container or standalone process.
//!
//! ```sh
//! # Run with default config (~/.config/rental-service/config.toml)
//! rental-service
//!
//! # Custom config path and port
//! rental-service --config /etc/rental-service/config.toml --api-port 9090
//!
//! # Validate config without starting
//! rental-service --check
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use rental_management::config::AppConfig;
use rental_management::server::{init_tracing, ServerHandle, ServerOptions};

/// Property rental management REST API server.
#[derive(Parser, Debug)]
#[command(
    name = "rental-service",
    version,
    about = "Property rental management service",
    long_about = "REST API server for property listings, unit reservations, \
                  security deposits and rent payments.\n\n\
                  Default config: ~/.config/rental-service/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "RENTAL_CONFIG")]
    config: Option<PathBuf>,

    /// Override the REST API listen port.
    #[arg(long)]
    api_port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration file and exit without starting the server.
    #[arg(long)]
    check: bool,

    /// Skip database migrations on startup.
    #[arg(long)]
    no_migrate: bool,

    /// Skip creating the default admin user.
    #[arg(long)]
    no_admin: bool,

    /// Skip seeding the default amenity catalogue.
    #[arg(long)]
    no_seed: bool,
}

/// Print the effective settings for `--check`. False when the file failed
/// to load and defaults were substituted.
fn report_check(config_path: &Path, config: &AppConfig, load_failed: bool) -> bool {
    if load_failed {
        eprintln!("❌ Configuration is invalid: {}", config_path.display());
        return false;
    }
    println!("✅ Configuration is valid");
    println!("   Config file   : {}", config_path.display());
    println!("   API address   : {}", config.api_address());
    println!("   Database      : {}", config.database.connection_url());
    println!("   Log level     : {} ({})", config.logging.level, config.logging.format);
    println!("   JWT lifetime  : {}h", config.security.jwt_expiration_hours);
    println!("   Hold period   : {}h", config.reservations.hold_hours);
    println!(
        "   Expiry sweep  : every {}s",
        config.reservations.expiry_check_interval_secs
    );
    true
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .unwrap_or_else(rental_management::default_config_path);

    let (mut config, load_error) = match AppConfig::load(&config_path) {
        Ok(cfg) => (cfg, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    // The level override must land before the subscriber is built.
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }
    init_tracing(&config);

    let load_failed = load_error.is_some();
    match load_error {
        None => info!("Configuration loaded from {}", config_path.display()),
        Some(e) => {
            error!("Failed to load config from {}: {}", config_path.display(), e);
            error!("Using default configuration.");
        }
    }

    if let Some(port) = cli.api_port {
        info!("CLI override: api_port = {}", port);
        config.server.api_port = port;
    }

    if cli.check {
        return Ok(if report_check(&config_path, &config, load_failed) {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        });
    }

    let handle = ServerHandle::start(ServerOptions {
        config,
        auto_migrate: !cli.no_migrate,
        create_default_admin: !cli.no_admin,
        seed_amenities: !cli.no_seed,
    })
    .await?;

    handle.install_signal_handler();

    info!("🚀 Press Ctrl+C to shutdown gracefully.");

    handle.shutdown_signal().wait().await;
    handle.wait().await;

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_fails_when_config_did_not_load() {
        let path = Path::new("/etc/rental-service/config.toml");
        assert!(!report_check(path, &AppConfig::default(), true));
        assert!(report_check(path, &AppConfig::default(), false));
    }

    #[test]
    fn check_flag_parses() {
        let cli = Cli::try_parse_from(["rental-service", "--check", "--api-port", "9090"]).unwrap();
        assert!(cli.check);
        assert_eq!(cli.api_port, Some(9090));
    }
}
