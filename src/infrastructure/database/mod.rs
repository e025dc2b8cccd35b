pub mod entities;
pub mod migrator;
pub mod repositories;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::info;

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Database URL (e.g., "sqlite://./car_rental.db?mode=rwc")
    pub url: String,
    /// Log every SQL statement at debug level
    pub sqlx_logging: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://./car_rental.db?mode=rwc".to_string(),
            sqlx_logging: false,
        }
    }
}

impl DatabaseConfig {
    /// Create config for SQLite
    pub fn sqlite(path: &str) -> Self {
        Self {
            url: format!("sqlite://{}?mode=rwc", path),
            ..Self::default()
        }
    }
}

/// Initialize database connection
pub async fn init_database(config: &DatabaseConfig) -> Result<DatabaseConnection, sea_orm::DbErr> {
    info!("Connecting to database: {}", config.url);
    let mut options = ConnectOptions::new(config.url.clone());
    options.sqlx_logging(config.sqlx_logging);
    let db = Database::connect(options).await?;
    info!("Database connected successfully");
    Ok(db)
}

/// Fixtures shared by the service and HTTP tests.
#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use sea_orm::DatabaseConnection;
    use sea_orm_migration::MigratorTrait;

    use super::migrator::Migrator;
    use super::repositories::SeaOrmRepositoryProvider;
    use crate::domain::{Car, PrincipalKind, RepositoryProvider, User};

    /// Lowest cost bcrypt accepts; keeps hashing fast in tests.
    pub const TEST_BCRYPT_COST: u32 = 4;

    /// Fresh migrated in-memory SQLite database.
    pub async fn memory_db() -> DatabaseConnection {
        let mut options = sea_orm::ConnectOptions::new("sqlite::memory:");
        options.max_connections(1).sqlx_logging(false);
        let db = sea_orm::Database::connect(options).await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        db
    }

    pub async fn memory_repos() -> Arc<dyn RepositoryProvider> {
        Arc::new(SeaOrmRepositoryProvider::new(memory_db().await))
    }

    /// Repositories on their own single-connection pool over the SQLite
    /// file at `path`, so several providers behave like separate processes.
    pub async fn file_repos(path: &std::path::Path) -> Arc<dyn RepositoryProvider> {
        let url = format!("sqlite://{}?mode=rwc", path.display());
        let mut options = sea_orm::ConnectOptions::new(url);
        options.max_connections(1).sqlx_logging(false);
        let db = sea_orm::Database::connect(options).await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        Arc::new(SeaOrmRepositoryProvider::new(db))
    }

    pub async fn seed_user(repos: &dyn RepositoryProvider, email: &str, kind: PrincipalKind) -> User {
        let user = User::new(email, "not-a-real-hash", "Test User", None, kind);
        repos.users().create(&user).await.unwrap();
        user
    }

    pub async fn seed_car(repos: &dyn RepositoryProvider, price_per_day_cents: i64) -> Car {
        let now = chrono::Utc::now();
        let car = Car {
            id: uuid::Uuid::new_v4().to_string(),
            make: "Toyota".into(),
            model: "Corolla".into(),
            year: 2022,
            car_type: Some("Sedan".into()),
            price_per_day_cents,
            description: None,
            images: vec!["https://img.example/corolla.jpg".into()],
            created_at: now,
            updated_at: now,
        };
        repos.cars().save(&car).await.unwrap();
        car
    }
}
