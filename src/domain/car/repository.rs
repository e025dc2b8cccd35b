//! Car repository interface

use async_trait::async_trait;

use super::model::{Car, CarFilter};
use crate::domain::DomainResult;

#[async_trait]
pub trait CarRepository: Send + Sync {
    async fn save(&self, car: &Car) -> DomainResult<()>;

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Car>>;

    /// Newest first, narrowed by `filter`
    async fn find_all(&self, filter: &CarFilter) -> DomainResult<Vec<Car>>;

    async fn update(&self, car: &Car) -> DomainResult<()>;

    async fn delete(&self, id: &str) -> DomainResult<()>;
}
