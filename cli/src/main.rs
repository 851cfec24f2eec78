//! Hotel booking service: CLI server
//!
//! Headless REST API suitable for deployment as a systemd service, Docker
//! container, or standalone process.
//!
//! ```sh
//! # Run with default config (~/.config/hotel-booking/config.toml)
//! hotel-booking
//!
//! # Custom config path
//! hotel-booking --config /etc/hotel-booking/config.toml
//!
//! # Override the API port
//! hotel-booking --api-port 8080
//!
//! # Validate config without starting
//! hotel-booking --check
//!
//! # Run one reconciliation pass and exit (for cron)
//! hotel-booking --reconcile-once
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use hotel_booking::config::{AppConfig, CONFIG_ENV};
use hotel_booking::server::{build_services, init_tracing, ServerHandle, ServerOptions};
use hotel_booking::{init_database, run_migrations, DatabaseConfig};

/// Hotel booking service: bookings, availability and automatic stay transitions.
#[derive(Parser, Debug)]
#[command(
    name = "hotel-booking",
    version,
    about = "Hotel reservation REST API",
    long_about = "Hotel booking service: REST API for room bookings, availability \
                  and date-driven check-in/check-out.\n\n\
                  Default config: ~/.config/hotel-booking/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = CONFIG_ENV)]
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

    /// Run a single reconciliation pass for today and exit.
    #[arg(long)]
    reconcile_once: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // ── Load configuration ─────────────────────────────────────
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(hotel_booking::default_config_path);

    let (mut config, load_error) = match AppConfig::load(&config_path) {
        Ok(cfg) => (cfg, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    // ── Apply CLI overrides ────────────────────────────────────
    if let Some(port) = cli.api_port {
        config.server.api_port = port;
    }
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }

    // ── Config validation mode ─────────────────────────────────
    if cli.check {
        if let Some(e) = load_error {
            eprintln!("❌ Failed to load {}: {}", config_path.display(), e);
            std::process::exit(1);
        }
        if let Err(e) = config.validate() {
            eprintln!("❌ Invalid configuration: {}", e);
            std::process::exit(1);
        }
        println!("✅ Configuration is valid");
        println!("   Config file    : {}", config_path.display());
        println!("   API address    : {}", config.api_address());
        println!("   Database       : {}", config.database.url);
        println!("   Log level      : {}", config.logging.level);
        println!(
            "   Reconciliation : {} (every {}s)",
            if config.reconciliation.enabled { "enabled" } else { "disabled" },
            config.reconciliation.interval_secs
        );
        return Ok(());
    }

    init_tracing(&config);
    match load_error {
        None => info!("Configuration loaded from {}", config_path.display()),
        Some(e) => {
            error!("Failed to load config from {}: {}", config_path.display(), e);
            error!("Using default configuration.");
        }
    }

    if cli.reconcile_once {
        return reconcile(config, !cli.no_migrate).await;
    }

    // ── Start server ───────────────────────────────────────────
    let handle = ServerHandle::start(ServerOptions {
        config,
        auto_migrate: !cli.no_migrate,
    })
    .await?;

    // Install OS signal handlers (SIGTERM, SIGINT)
    handle.install_signal_handler();

    info!("🚀 Press Ctrl+C to shutdown gracefully.");

    handle.shutdown_signal().wait().await;
    handle.wait().await;

    Ok(())
}

/// One reconciliation pass against the configured database.
async fn reconcile(config: AppConfig, migrate: bool) -> Result<(), Box<dyn std::error::Error>> {
    let db = init_database(&DatabaseConfig::from(&config.database)).await?;
    if migrate {
        run_migrations(&db).await?;
    }

    let services = build_services(&db, &config);
    let report = services.reconciliation.run_now().await?;
    info!(
        checked_out = report.checked_out,
        checked_in = report.checked_in,
        "Reconciliation pass complete"
    );

    db.close().await?;
    Ok(())
}
