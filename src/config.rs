//! Application configuration
//!
//! Read from a TOML file (`~/.config/car-rental/config.toml` unless
//! `RENTAL_CONFIG` points elsewhere). Every section and field is optional;
//! missing values fall back to the defaults below. `DATABASE_URL`,
//! `JWT_SECRET` and `PORT` override the file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::BoundaryPolicy;
use crate::infrastructure::crypto::jwt::JwtConfig;
use crate::infrastructure::DatabaseConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseSection,
    pub security: SecurityConfig,
    pub admin: AdminConfig,
    pub booking: BookingConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Seconds allowed for cleanup after a shutdown signal
    pub shutdown_timeout: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            shutdown_timeout: 30,
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    pub url: String,
    /// Log every SQL statement
    pub sqlx_logging: bool,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            url: "sqlite://./car_rental.db?mode=rwc".to_string(),
            sqlx_logging: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub admin_token_hours: i64,
    pub customer_token_hours: i64,
    pub bcrypt_cost: u32,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "super-secret-key-change-in-production".to_string(),
            admin_token_hours: 8,
            customer_token_hours: 24,
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

/// Administrator seeded on first start
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    pub email: String,
    pub password: String,
    pub name: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            email: "admin@gmail.com".to_string(),
            password: "admin##23".to_string(),
            name: "Administrator".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BookingConfig {
    /// Let a booking start on the day the previous one ends
    pub allow_back_to_back: bool,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            allow_back_to_back: true,
        }
    }
}

impl BookingConfig {
    pub fn boundary_policy(&self) -> BoundaryPolicy {
        BoundaryPolicy::from_allow_back_to_back(self.allow_back_to_back)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `info` or `car_rental=debug,sea_orm=warn`
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl LoggingConfig {
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

impl AppConfig {
    /// Load from `path`, then apply environment overrides. A missing file
    /// yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                path: path.display().to_string(),
                source,
            })?;
            Self::from_toml(&content)?
        } else {
            Self::default()
        };
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    fn apply_env_overrides(
        &mut self,
        var: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(url) = var("DATABASE_URL") {
            self.database.url = url;
        }
        if let Some(secret) = var("JWT_SECRET") {
            self.security.jwt_secret = secret;
        }
        if let Some(port) = var("PORT") {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue { key: "PORT", value: port })?;
        }
        Ok(())
    }

    pub fn database_config(&self) -> DatabaseConfig {
        DatabaseConfig {
            url: self.database.url.clone(),
            sqlx_logging: self.database.sqlx_logging,
        }
    }

    pub fn jwt_config(&self) -> JwtConfig {
        JwtConfig {
            secret: self.security.jwt_secret.clone(),
            admin_expiration_hours: self.security.admin_token_hours,
            customer_expiration_hours: self.security.customer_token_hours,
            issuer: "car-rental".to_string(),
        }
    }
}

/// `<config dir>/car-rental/config.toml`, or `./config.toml` when the
/// platform has no config directory.
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .map(|dir| dir.join("car-rental").join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("config.toml"))
}
