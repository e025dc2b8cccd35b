//! Reservation repository interface

use async_trait::async_trait;

use super::availability::BoundaryPolicy;
use super::model::Reservation;
use crate::domain::DomainResult;

#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Atomically checks `reservation` against the blocking reservations of
    /// its car and inserts it. Fails with `Conflict` when the range is taken.
    async fn insert_if_available(
        &self,
        reservation: &Reservation,
        policy: BoundaryPolicy,
    ) -> DomainResult<()>;

    /// Persists the status of an existing reservation. With a `conflict_policy`,
    /// the overlap check against other blocking reservations of the same car
    /// runs in the same transaction as the write.
    async fn update_status(
        &self,
        reservation: &Reservation,
        conflict_policy: Option<BoundaryPolicy>,
    ) -> DomainResult<()>;

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Reservation>>;

    /// Newest created first
    async fn find_by_customer(&self, customer_id: &str) -> DomainResult<Vec<Reservation>>;

    /// Newest created first
    async fn find_all(&self) -> DomainResult<Vec<Reservation>>;

    async fn count_for_car(&self, car_id: &str) -> DomainResult<u64>;
}
