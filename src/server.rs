//! Server runtime
//!
//! [`ServerHandle`] owns the process lifecycle: metrics recorder, storage
//! selection (SeaORM or in-memory), services, the REST API and graceful
//! shutdown.

use std::net::SocketAddr;
use std::sync::{Arc, OnceLock};

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use sea_orm::DatabaseConnection;
use tracing::{error, info, warn};

use crate::application::events::spawn_event_logger;
use crate::application::{create_event_bus, SharedEventBus};
use crate::config::{AppConfig, StorageBackend};
use crate::domain::RepositoryProvider;
use crate::infrastructure::{init_database, run_migrations, InMemoryStore, SeaOrmRepositoryProvider};
use crate::interfaces::http::modules::metrics::describe_booking_metrics;
use crate::interfaces::http::{create_api_router, AppState};
use crate::shared::shutdown::{ShutdownCoordinator, ShutdownSignal};
use crate::shared::{BookingLocks, SystemClock};

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Options for starting the service.
pub struct ServerOptions {
    pub config: AppConfig,
    /// Apply pending migrations on startup (database storage only)
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

/// The global recorder can be installed once per process; later starts
/// reuse its handle.
fn prometheus_handle() -> Result<PrometheusHandle, BoxError> {
    static HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();
    if let Some(handle) = HANDLE.get() {
        return Ok(handle.clone());
    }
    let handle = PrometheusBuilder::new().install_recorder()?;
    describe_booking_metrics();
    info!("Prometheus metrics recorder installed");
    Ok(HANDLE.get_or_init(|| handle).clone())
}

async fn open_storage(
    config: &AppConfig,
    auto_migrate: bool,
) -> Result<(Arc<dyn RepositoryProvider>, Option<DatabaseConnection>), BoxError> {
    match config.booking.storage {
        StorageBackend::Memory => {
            warn!("Using in-memory storage; data is lost on restart");
            Ok((Arc::new(InMemoryStore::new()), None))
        }
        StorageBackend::Database => {
            let db = init_database(&config.database.to_database_config()).await?;
            if auto_migrate {
                info!("Running database migrations...");
                run_migrations(&db).await?;
            }
            Ok((Arc::new(SeaOrmRepositoryProvider::new(db.clone())), Some(db)))
        }
    }
}

/// Handle to a running service.
pub struct ServerHandle {
    pub event_bus: SharedEventBus,
    pub repos: Arc<dyn RepositoryProvider>,
    pub config: AppConfig,
    /// Address the API actually bound (port 0 resolves here)
    pub local_addr: SocketAddr,

    db: Option<DatabaseConnection>,
    shutdown: ShutdownCoordinator,
    api_task: tokio::task::JoinHandle<()>,
}

impl ServerHandle {
    pub async fn start(opts: ServerOptions) -> Result<Self, BoxError> {
        let config = opts.config;
        info!("Starting venue booking service...");

        let prometheus = prometheus_handle()?;
        let (repos, db) = open_storage(&config, opts.auto_migrate).await?;

        let shutdown = ShutdownCoordinator::new(config.server.shutdown_timeout);
        let shutdown_signal = shutdown.signal();

        let event_bus = create_event_bus();
        spawn_event_logger(&event_bus, shutdown_signal.clone());

        let locks = Arc::new(BookingLocks::new(config.booking.lock_timeout()));
        info!(
            lock_timeout_ms = config.booking.lock_timeout_ms,
            cancellation_policy = ?config.booking.cancellation_policy,
            "Booking services configured"
        );
        let state = AppState::new(
            repos.clone(),
            Arc::new(SystemClock),
            locks,
            event_bus.clone(),
            config.booking.cancellation_policy,
        );
        let router = create_api_router(state, db.clone(), prometheus);

        let listener = tokio::net::TcpListener::bind(config.server.address()).await?;
        let local_addr = listener.local_addr()?;
        info!("REST API listening on http://{}", local_addr);
        info!("Swagger UI available at http://{}/docs/", local_addr);

        let api_shutdown = shutdown_signal.clone();
        let api_task = tokio::spawn(async move {
            let served = axum::serve(listener, router)
                .with_graceful_shutdown(async move {
                    api_shutdown.wait().await;
                    info!("REST API received shutdown signal");
                })
                .await;
            if let Err(e) = served {
                error!(error = %e, "REST API server error");
            }
        });

        Ok(Self {
            event_bus,
            repos,
            config,
            local_addr,
            db,
            shutdown,
            api_task,
        })
    }

    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.signal()
    }

    /// Trigger shutdown on SIGTERM / SIGINT.
    pub fn install_signal_handler(&self) {
        self.shutdown.start_signal_listener();
    }

    pub fn trigger_shutdown(&self) {
        self.shutdown.signal().trigger();
    }

    /// Wait for the shutdown signal, drain the API within the configured
    /// timeout, then close the database.
    pub async fn wait(self) {
        let Self {
            shutdown,
            api_task,
            db,
            ..
        } = self;

        let drained = shutdown
            .shutdown_with_cleanup(|| async move {
                if let Err(e) = api_task.await {
                    error!(error = %e, "REST API task panicked");
                }
            })
            .await;
        if !drained {
            warn!("REST API did not drain before the shutdown timeout");
        }

        if let Some(db) = db {
            match db.close().await {
                Ok(()) => info!("Database connection closed"),
                Err(e) => warn!(error = %e, "Error closing database connection"),
            }
        }
        info!("Venue booking service stopped");
    }

    pub async fn shutdown(self) {
        self.trigger_shutdown();
        self.wait().await;
    }

    pub fn is_running(&self) -> bool {
        !self.api_task.is_finished()
    }
}

/// Install the global tracing subscriber. `RUST_LOG` wins over
/// `logging.level`; `logging.format = "json"` switches to JSON lines.
pub fn init_tracing(config: &AppConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    let registry = tracing_subscriber::registry().with(env_filter);
    let installed = if config.logging.format.eq_ignore_ascii_case("json") {
        registry.with(tracing_subscriber::fmt::layer().json()).try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()
    };
    if let Err(e) = installed {
        eprintln!("tracing subscriber already installed: {e}");
    }
}
