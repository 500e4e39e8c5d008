//! Venue booking service
//!
//! ```sh
//! # default config (~/.config/venue-booking/config.toml)
//! venue-booking-service
//!
//! # custom config, port override, throwaway in-memory storage
//! venue-booking-service --config ./booking.toml --port 9000 --memory
//!
//! # validate config and exit
//! venue-booking-service --check
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use venue_booking::config::{default_config_path, AppConfig, StorageBackend};
use venue_booking::server::{init_tracing, ServerHandle, ServerOptions};

/// REST service for date-based venue reservations.
#[derive(Parser, Debug)]
#[command(name = "venue-booking-service", version)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "BOOKING_CONFIG")]
    config: Option<PathBuf>,

    /// Override the listen port.
    #[arg(long)]
    port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Keep all data in memory instead of the database.
    #[arg(long)]
    memory: bool,

    /// Validate the configuration and exit.
    #[arg(long)]
    check: bool,

    /// Skip database migrations on startup.
    #[arg(long)]
    no_migrate: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();
    let config_path = cli.config.unwrap_or_else(default_config_path);

    let (mut config, load_error) = match AppConfig::load_for_startup(&config_path, cli.check) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Configuration is invalid: {}: {}", config_path.display(), e);
            return Err(e.into());
        }
    };
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    init_tracing(&config);

    if let Some(e) = &load_error {
        error!(
            "Failed to load config from {}: {}. Using defaults.",
            config_path.display(),
            e
        );
    } else {
        info!("Configuration loaded from {}", config_path.display());
    }

    if let Some(port) = cli.port {
        info!("CLI override: port = {}", port);
        config.server.port = port;
    }
    if cli.memory {
        config.booking.storage = StorageBackend::Memory;
    }

    if cli.check {
        println!("Configuration is valid");
        println!("  Config file : {}", config_path.display());
        println!("  Listen      : {}", config.server.address());
        println!("  Storage     : {:?}", config.booking.storage);
        println!("  Database    : {}", config.database.connection_url());
        println!("  Log level   : {}", config.logging.level);
        return Ok(());
    }

    let handle = ServerHandle::start(ServerOptions {
        config,
        auto_migrate: !cli.no_migrate,
    })
    .await?;
    handle.install_signal_handler();
    info!("Press Ctrl+C to shut down");

    handle.wait().await;
    Ok(())
}
