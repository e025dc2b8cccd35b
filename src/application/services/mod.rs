//! Application services

mod fleet;
mod identity;
mod reservation;

pub use fleet::{CarChanges, FleetService, NewCar};
pub use identity::{AuthSession, IdentityService, NewCustomer};
pub use reservation::{NewReservation, ReservationService};
