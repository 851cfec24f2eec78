//! Reusable hotel booking server runtime.
//!
//! Provides [`ServerHandle`] that encapsulates the full server lifecycle:
//! database init, migrations, REST API, reconciliation job, metrics and
//! graceful shutdown.

use std::sync::{Arc, OnceLock};

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use sea_orm::DatabaseConnection;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::application::{BookingEngine, ReconciliationJob, RoomLocks};
use crate::config::AppConfig;
use crate::domain::{RepositoryProvider, TransactionManager};
use crate::infrastructure::{
    init_database, run_migrations, DatabaseConfig, SeaOrmRepositoryProvider,
    SeaOrmTransactionManager,
};
use crate::interfaces::http::{create_api_router, ApiState};
use crate::shared::shutdown::{ShutdownCoordinator, ShutdownSignal};
use crate::shared::{Clock, SystemClock};

// ── Options ────────────────────────────────────────────────────────

/// Options for starting the booking service.
pub struct ServerOptions {
    /// Application configuration.
    pub config: AppConfig,
    /// Run database migrations on startup (default: true).
    pub auto_migrate: bool,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            config: AppConfig::default(),
            auto_migrate: true,
        }
    }
}

// ── Services ───────────────────────────────────────────────────────

/// The booking engine and reconciliation job wired to one database.
///
/// Both share the same [`RoomLocks`], so a reconciliation pass and a
/// concurrent confirm never interleave on a room.
#[derive(Clone)]
pub struct Services {
    pub engine: Arc<BookingEngine>,
    pub reconciliation: Arc<ReconciliationJob>,
}

/// Build the application services on top of an open connection.
pub fn build_services(db: &DatabaseConnection, config: &AppConfig) -> Services {
    build_services_with_clock(db, config, Arc::new(SystemClock))
}

/// Same as [`build_services`] with an explicit calendar source.
pub fn build_services_with_clock(
    db: &DatabaseConnection,
    config: &AppConfig,
    clock: Arc<dyn Clock>,
) -> Services {
    let repos: Arc<dyn RepositoryProvider> = Arc::new(SeaOrmRepositoryProvider::new(db.clone()));
    let transactions: Arc<dyn TransactionManager> =
        Arc::new(SeaOrmTransactionManager::new(db.clone()));
    let locks = Arc::new(RoomLocks::new());

    let engine = BookingEngine::new(
        repos.clone(),
        transactions.clone(),
        locks.clone(),
        clock.clone(),
    )
    .with_template(config.booking.template())
    .with_default_page_size(config.booking.default_page_size);

    let reconciliation = ReconciliationJob::new(repos, transactions, locks, clock);

    Services {
        engine: Arc::new(engine),
        reconciliation: Arc::new(reconciliation),
    }
}

/// Process-wide Prometheus handle.
///
/// The global recorder can only be installed once per process, so a restart
/// within the same process reuses it. If another recorder is already
/// installed, metrics still render from a detached handle.
pub fn prometheus_handle() -> PrometheusHandle {
    static PROM_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

    PROM_HANDLE
        .get_or_init(|| match PrometheusBuilder::new().install_recorder() {
            Ok(handle) => {
                info!("📊 Prometheus metrics recorder installed");
                handle
            }
            Err(e) => {
                warn!("Prometheus recorder not installed: {}", e);
                PrometheusBuilder::new().build_recorder().handle()
            }
        })
        .clone()
}

// ── ServerHandle ───────────────────────────────────────────────────

/// Handle to a running booking service.
///
/// # Examples
///
/// ```rust,no_run
/// use hotel_booking::server::{ServerHandle, ServerOptions};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let handle = ServerHandle::start(ServerOptions::default()).await?;
///     // ... wait for shutdown signal ...
///     handle.shutdown().await;
///     Ok(())
/// }
/// ```
pub struct ServerHandle {
    /// Booking engine serving the REST API.
    pub engine: Arc<BookingEngine>,
    /// Date-driven check-in/check-out job.
    pub reconciliation: Arc<ReconciliationJob>,
    /// The configuration the server was started with.
    pub config: AppConfig,
    /// API port the server is listening on.
    pub api_port: u16,

    db: DatabaseConnection,
    shutdown: ShutdownCoordinator,
    api_task: JoinHandle<()>,
    reconciliation_task: Option<JoinHandle<()>>,
}

impl ServerHandle {
    /// Start the booking service with the given options.
    ///
    /// This will:
    /// 1. Install Prometheus metrics recorder
    /// 2. Connect to database and run migrations
    /// 3. Start the reconciliation job (if enabled)
    /// 4. Start REST API server (with Swagger UI)
    pub async fn start(opts: ServerOptions) -> Result<Self, Box<dyn std::error::Error>> {
        let app_cfg = opts.config;
        app_cfg.validate()?;

        info!("Starting hotel booking service...");

        let prometheus = prometheus_handle();

        // ── Database ───────────────────────────────────────────
        let db_config = DatabaseConfig::from(&app_cfg.database);
        info!("Database: {}", db_config.url);
        let db = init_database(&db_config).await?;

        if opts.auto_migrate {
            info!("Running database migrations...");
            run_migrations(&db).await?;
            info!("Migrations completed");
        }

        // ── Services ───────────────────────────────────────────
        let services = build_services(&db, &app_cfg);

        // ── Shutdown coordinator ───────────────────────────────
        let shutdown = ShutdownCoordinator::new(app_cfg.server.shutdown_timeout);
        let shutdown_signal = shutdown.signal();

        // ── Background tasks ───────────────────────────────────
        let reconciliation_task = if app_cfg.reconciliation.enabled {
            Some(
                services
                    .reconciliation
                    .clone()
                    .start(app_cfg.reconciliation.interval_secs, shutdown_signal.clone()),
            )
        } else {
            info!("Reconciliation job disabled");
            None
        };

        // ── REST API server ────────────────────────────────────
        let api_router = create_api_router(
            ApiState {
                engine: services.engine.clone(),
                reconciliation: services.reconciliation.clone(),
            },
            db.clone(),
            prometheus,
        );

        let api_port = app_cfg.server.api_port;
        let api_addr = app_cfg.api_address();
        let listener = tokio::net::TcpListener::bind(&api_addr).await?;
        info!("REST API server listening on http://{}", api_addr);
        info!("Swagger UI available at http://{}/docs/", api_addr);

        let api_shutdown = shutdown_signal.clone();
        let api_server = axum::serve(
            listener,
            api_router.into_make_service_with_connect_info::<std::net::SocketAddr>(),
        )
        .with_graceful_shutdown(async move {
            api_shutdown.wait().await;
            info!("🛑 REST API server received shutdown signal");
        });

        let api_task = tokio::spawn(async move {
            if let Err(e) = api_server.await {
                error!("REST API server error: {}", e);
            }
        });

        info!("🚀 Server started.");

        Ok(Self {
            engine: services.engine,
            reconciliation: services.reconciliation,
            config: app_cfg,
            api_port,
            db,
            shutdown,
            api_task,
            reconciliation_task,
        })
    }

    /// Get a cloneable shutdown signal.
    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.signal()
    }

    /// Install OS signal listeners (SIGTERM, SIGINT) that trigger shutdown.
    pub fn install_signal_handler(&self) {
        self.shutdown.start_signal_listener();
    }

    /// Trigger graceful shutdown (non-blocking).
    pub fn trigger_shutdown(&self) {
        self.shutdown.signal().trigger();
    }

    /// Wait for the server to fully stop after shutdown has been triggered.
    pub async fn wait(self) {
        info!("⏳ Waiting for server tasks to complete...");

        let Self {
            db,
            shutdown,
            api_task,
            reconciliation_task,
            ..
        } = self;

        let finished = shutdown
            .run_cleanup(|| async move {
                match api_task.await {
                    Ok(()) => info!("REST API server stopped"),
                    Err(e) => error!("REST API server task panicked: {}", e),
                }
                if let Some(task) = reconciliation_task {
                    match task.await {
                        Ok(()) => info!("Reconciliation job stopped"),
                        Err(e) => error!("Reconciliation task panicked: {}", e),
                    }
                }
            })
            .await;

        if !finished {
            warn!("Server tasks did not stop within the shutdown timeout");
        }

        if let Err(e) = db.close().await {
            warn!("Error closing database connection: {}", e);
        } else {
            info!("✅ Database connection closed");
        }

        info!("👋 Hotel booking service shutdown complete");
    }

    /// Trigger shutdown and wait for completion.
    pub async fn shutdown(self) {
        info!("🛑 Shutting down hotel booking service...");
        self.trigger_shutdown();
        self.wait().await;
    }

    /// Check if the server is still running.
    pub fn is_running(&self) -> bool {
        !self.api_task.is_finished()
    }
}

// ── Helpers ────────────────────────────────────────────────────────

/// Initialize tracing (logging) from the application config.
///
/// Call this once at process startup (before [`ServerHandle::start`]).
pub fn init_tracing(config: &AppConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    match config.logging.format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }
}
