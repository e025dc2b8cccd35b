//! Car Rental Service
//!
//! REST API for the fleet catalog and the reservation engine.
//! Reads configuration from a TOML file (~/.config/car-rental/config.toml).

use sea_orm_migration::MigratorTrait;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use car_rental::config::LoggingConfig;
use car_rental::infrastructure::database::migrator::Migrator;
use car_rental::support::shutdown::ShutdownCoordinator;
use car_rental::{create_api_router, default_config_path, init_database, AppConfig, AppState};

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if logging.is_json() {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ── Load configuration ─────────────────────────────────────
    let config_path = std::env::var("RENTAL_CONFIG")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| default_config_path());
    let app_cfg = match AppConfig::load(&config_path) {
        Ok(cfg) => {
            init_tracing(&cfg.logging);
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            let cfg = AppConfig::default();
            init_tracing(&cfg.logging);
            error!("Failed to load config: {}. Using defaults.", e);
            cfg
        }
    };

    info!("Starting Car Rental Service...");
    info!(
        "Bookings may start on the previous return day: {}",
        app_cfg.booking.allow_back_to_back
    );

    // ── Database ───────────────────────────────────────────────
    let db = match init_database(&app_cfg.database_config()).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            return Err(e.into());
        }
    };

    info!("Running database migrations...");
    if let Err(e) = Migrator::up(&db, None).await {
        error!("Failed to run migrations: {}", e);
        return Err(e.into());
    }
    info!("Migrations completed");

    // ── Services ───────────────────────────────────────────────
    let state = AppState::from_config(db.clone(), &app_cfg);

    match state
        .identity
        .ensure_default_admin(&app_cfg.admin.email, &app_cfg.admin.password, &app_cfg.admin.name)
        .await
    {
        Ok(true) => info!("Default administrator {} created", app_cfg.admin.email),
        Ok(false) => {}
        Err(e) => error!("Failed to create default administrator: {}", e),
    }

    // ── HTTP server ────────────────────────────────────────────
    let shutdown = ShutdownCoordinator::new(app_cfg.server.shutdown_timeout);
    let shutdown_signal = shutdown.signal();
    shutdown.start_signal_listener();

    let api_router = create_api_router(state);

    let api_addr = app_cfg.server.address();
    let listener = tokio::net::TcpListener::bind(&api_addr).await?;
    info!("REST API server listening on http://{}", api_addr);
    info!("Swagger UI available at http://{}/docs/", api_addr);

    let api_shutdown = shutdown_signal.clone();
    let served = axum::serve(listener, api_router)
        .with_graceful_shutdown(async move {
            api_shutdown.wait().await;
            info!("REST API server received shutdown signal");
        })
        .await;

    if let Err(e) = served {
        error!("REST API server error: {}", e);
    }

    // ── Cleanup ────────────────────────────────────────────────
    shutdown
        .cleanup_with_timeout(|| async move {
            if let Err(e) = db.close().await {
                warn!("Error closing database connection: {}", e);
            } else {
                info!("Database connection closed");
            }
        })
        .await;

    info!("Car Rental Service shutdown complete");
    Ok(())
}
