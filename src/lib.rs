//! # Car Rental Service
//!
//! Fleet catalog and reservation engine for a car rental business.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: cars, reservations and users; the overlap rule and the
//!   status lifecycle; repository traits
//! - **application**: identity, fleet and reservation services
//! - **infrastructure**: SeaORM persistence, JWT and bcrypt
//! - **interfaces**: REST API with Swagger documentation
//! - **support**: error types and graceful shutdown

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod support;

pub use config::{default_config_path, AppConfig};
pub use infrastructure::{init_database, DatabaseConfig};
pub use interfaces::http::{create_api_router, AppState};
