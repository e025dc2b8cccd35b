//! Reservation module: customer bookings and their administration

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
