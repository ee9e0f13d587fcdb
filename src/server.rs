//! Reusable rental service runtime.
//!
//! [`ServerHandle`] owns the full lifecycle: metrics, database and
//! migrations, bootstrap data, services, the reservation expiry task, the
//! REST API and graceful shutdown. Both binaries start the service through it.

use std::sync::Arc;

use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::application::payments::SimulatedGateway;
use crate::application::{
    PaymentService, PropertyService, ReservationExpiryTask, ReservationService, UserService,
};
use crate::config::AppConfig;
use crate::domain::RepositoryProvider;
use crate::infrastructure::crypto::jwt::JwtConfig;
use crate::infrastructure::database::migrator::Migrator;
use crate::infrastructure::{init_database, DatabaseConfig, SeaOrmRepositoryProvider};
use crate::interfaces::http::modules::health::HealthState;
use crate::interfaces::http::modules::metrics::install_recorder;
use crate::interfaces::http::{create_api_router, ApiServices};
use crate::shared::shutdown::{ShutdownCoordinator, ShutdownSignal};
use crate::shared::{AppError, InfraError};

// ── Options ────────────────────────────────────────────────────────

pub struct ServerOptions {
    pub config: AppConfig,
    /// Run database migrations on startup (default: true).
    pub auto_migrate: bool,
    /// Create the bootstrap admin when no users exist (default: true).
    pub create_default_admin: bool,
    /// Insert the standard amenity catalogue (default: true).
    pub seed_amenities: bool,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            config: AppConfig::default(),
            auto_migrate: true,
            create_default_admin: true,
            seed_amenities: true,
        }
    }
}

// ── ServerHandle ───────────────────────────────────────────────────

/// Handle to a running rental service.
///
/// ```rust,no_run
/// use rental_management::server::{ServerHandle, ServerOptions};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let handle = ServerHandle::start(ServerOptions::default()).await?;
///     handle.install_signal_handler();
///     handle.shutdown_signal().wait().await;
///     handle.wait().await;
///     Ok(())
/// }
/// ```
pub struct ServerHandle {
    pub repos: Arc<dyn RepositoryProvider>,
    pub services: ApiServices,
    pub config: AppConfig,
    pub api_port: u16,

    db: DatabaseConnection,
    shutdown: ShutdownCoordinator,
    api_task: JoinHandle<()>,
    expiry_task: JoinHandle<()>,
}

impl ServerHandle {
    pub async fn start(opts: ServerOptions) -> Result<Self, AppError> {
        let app_cfg = opts.config;

        info!("Starting rental service...");

        let prometheus_handle =
            install_recorder().map_err(|e| InfraError::Metrics(e.to_string()))?;
        info!("📊 Prometheus metrics recorder ready");

        // ── Database ───────────────────────────────────────────
        let db_config = DatabaseConfig {
            url: app_cfg.database.connection_url(),
        };
        let db = init_database(&db_config).await?;

        if opts.auto_migrate {
            info!("Running database migrations...");
            Migrator::up(&db, None).await?;
            info!("Migrations completed");
        }

        let jwt_config = JwtConfig::new(
            app_cfg.security.jwt_secret.clone(),
            app_cfg.security.jwt_expiration_hours,
        );
        info!(
            expiration_hours = jwt_config.expiration_hours,
            "JWT configured"
        );

        let repos: Arc<dyn RepositoryProvider> =
            Arc::new(SeaOrmRepositoryProvider::new(db.clone()));
        let users = Arc::new(UserService::new(repos.clone(), jwt_config.clone()));
        let properties = Arc::new(PropertyService::new(repos.clone()));

        // ── Bootstrap data ─────────────────────────────────────
        if opts.create_default_admin {
            let admin = &app_cfg.admin;
            match users
                .create_default_admin(&admin.username, &admin.email, &admin.password)
                .await
            {
                Ok(Some(user)) => info!(user_id = %user.id, email = %user.email, "Default admin ready"),
                Ok(None) => info!("Users already present, skipping default admin"),
                Err(e) => error!(error = %e, "Failed to create default admin"),
            }
        }

        if opts.seed_amenities {
            match properties.seed_amenities().await {
                Ok(0) => info!("Amenity catalogue already seeded"),
                Ok(n) => info!(inserted = n, "Seeded default amenities"),
                Err(e) => warn!(error = %e, "Failed to seed amenities"),
            }
        }

        // ── Services ───────────────────────────────────────────
        let reservations = Arc::new(ReservationService::new(
            repos.clone(),
            app_cfg.reservations.hold_hours,
        ));
        let payments = Arc::new(PaymentService::new(
            repos.clone(),
            reservations.clone(),
            Arc::new(SimulatedGateway),
        ));
        let services = ApiServices {
            users,
            properties,
            reservations: reservations.clone(),
            payments,
        };

        // ── Background tasks ───────────────────────────────────
        let shutdown = ShutdownCoordinator::new(app_cfg.server.shutdown_timeout);
        let shutdown_signal = shutdown.signal();

        let expiry_task = ReservationExpiryTask::new(
            reservations,
            app_cfg.reservations.expiry_check_interval_secs,
        )
        .start(shutdown_signal.clone());

        // ── REST API server ────────────────────────────────────
        let api_router = create_api_router(
            services.clone(),
            jwt_config,
            HealthState::new(Some(db.clone())),
            prometheus_handle,
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

        info!("🚀 Rental service started");

        Ok(Self {
            repos,
            services,
            config: app_cfg,
            api_port,
            db,
            shutdown,
            api_task,
            expiry_task,
        })
    }

    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.signal()
    }

    /// Install OS signal listeners (SIGTERM, SIGINT) that trigger shutdown.
    pub fn install_signal_handler(&self) {
        self.shutdown.start_signal_listener();
    }

    /// Fire the shutdown signal without waiting. Pair with [`wait`](Self::wait).
    pub fn trigger_shutdown(&self) {
        self.shutdown.signal().trigger();
    }

    /// Wait for the server to stop after shutdown has been triggered.
    ///
    /// The API gets `shutdown_timeout` seconds to drain in-flight requests.
    pub async fn wait(self) {
        info!("⏳ Waiting for server tasks to complete...");

        match tokio::time::timeout(self.shutdown.timeout(), self.api_task).await {
            Ok(Ok(())) => info!("REST API server stopped"),
            Ok(Err(e)) => error!("REST API server task panicked: {}", e),
            Err(_) => warn!(
                timeout_secs = self.shutdown.timeout().as_secs(),
                "REST API server did not drain in time"
            ),
        }

        if let Err(e) = self.expiry_task.await {
            error!("Reservation expiry task panicked: {}", e);
        }

        if let Err(e) = self.db.close().await {
            warn!("Error closing database connection: {}", e);
        } else {
            info!("✅ Database connection closed");
        }

        info!("👋 Rental service shutdown complete");
    }

    /// Trigger shutdown and wait for completion.
    pub async fn shutdown(self) {
        info!("🛑 Shutting down rental service...");
        self.trigger_shutdown();
        self.wait().await;
    }

    pub fn is_running(&self) -> bool {
        !self.api_task.is_finished()
    }
}

/// Initialize tracing from the application config.
///
/// `RUST_LOG` overrides `logging.level`. Call once, before [`ServerHandle::start`].
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

#[cfg(test)]
mod tests {
    use super::*;

    fn test_options() -> ServerOptions {
        let mut config = AppConfig::default();
        config.server.api_host = "127.0.0.1".into();
        config.server.api_port = 0;
        config.server.shutdown_timeout = 5;
        config.database.url = Some("sqlite::memory:".into());
        ServerOptions {
            config,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn start_bootstraps_admin_and_amenities_then_shuts_down() {
        let handle = ServerHandle::start(test_options()).await.unwrap();
        assert!(handle.is_running());

        assert_eq!(handle.repos.users().count_users().await.unwrap(), 1);
        assert!(!handle.repos.amenities().list_all().await.unwrap().is_empty());

        handle.shutdown().await;
    }

    #[tokio::test]
    async fn bootstrap_steps_can_be_skipped() {
        let opts = ServerOptions {
            create_default_admin: false,
            seed_amenities: false,
            ..test_options()
        };
        let handle = ServerHandle::start(opts).await.unwrap();

        assert_eq!(handle.repos.users().count_users().await.unwrap(), 0);
        assert!(handle.repos.amenities().list_all().await.unwrap().is_empty());

        handle.shutdown().await;
    }
}
