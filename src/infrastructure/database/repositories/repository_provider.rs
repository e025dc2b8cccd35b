//! SeaORM implementation of RepositoryProvider

use sea_orm::DatabaseConnection;

use crate::domain::{CarRepository, RepositoryProvider, ReservationRepository, UserRepository};

use super::car_repository::SeaOrmCarRepository;
use super::reservation_repository::SeaOrmReservationRepository;
use super::user_repository::SeaOrmUserRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository accessors.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(db.clone());
/// let car = repos.cars().find_by_id("c0ffee").await?;
/// ```
pub struct SeaOrmRepositoryProvider {
    cars: SeaOrmCarRepository,
    reservations: SeaOrmReservationRepository,
    users: SeaOrmUserRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            cars: SeaOrmCarRepository::new(db.clone()),
            reservations: SeaOrmReservationRepository::new(db.clone()),
            users: SeaOrmUserRepository::new(db),
        }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn cars(&self) -> &dyn CarRepository {
        &self.cars
    }

    fn reservations(&self) -> &dyn ReservationRepository {
        &self.reservations
    }

    fn users(&self) -> &dyn UserRepository {
        &self.users
    }
}
