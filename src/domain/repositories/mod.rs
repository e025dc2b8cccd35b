//! Repository traits for the domain layer
//!
//! Contains:
//! - `RepositoryProvider`: unified access to all per-aggregate repositories
//! - `DomainResult`: standard result type for domain operations

use super::car::CarRepository;
use super::reservation::ReservationRepository;
use super::user::UserRepository;
use crate::support::errors::DomainError;

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Provides access to all domain repositories.
///
/// ```ignore
/// async fn handle(repos: &dyn RepositoryProvider) {
///     let car = repos.cars().find_by_id("c0ffee").await?;
///     let mine = repos.reservations().find_by_customer("cust-1").await?;
/// }
/// ```
pub trait RepositoryProvider: Send + Sync {
    fn cars(&self) -> &dyn CarRepository;
    fn reservations(&self) -> &dyn ReservationRepository;
    fn users(&self) -> &dyn UserRepository;
}
