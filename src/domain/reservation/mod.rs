//! Reservation aggregate
//!
//! Contains the Reservation entity, the availability rules, and the
//! repository interface.

pub mod availability;
pub mod model;
pub mod repository;

pub use availability::{find_conflict, parse_date, BoundaryPolicy, DateRange};
pub use model::{Reservation, ReservationDetails, ReservationStatus};
pub use repository::ReservationRepository;
