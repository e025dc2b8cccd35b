pub mod car;
pub mod repositories;
pub mod reservation;
pub mod user;

// Re-export commonly used types
pub use car::{to_cents, Car, CarFilter, CarRepository, CarSummary};
pub use repositories::{DomainResult, RepositoryProvider};
pub use reservation::{
    BoundaryPolicy, DateRange, Reservation, ReservationDetails, ReservationRepository,
    ReservationStatus,
};
pub use user::{CustomerSummary, Principal, PrincipalKind, User, UserRepository};

// Re-export DomainError from support for convenience
pub use crate::support::errors::DomainError;
