//! Database entities module

pub mod car;
pub mod reservation;
pub mod user;

pub use car::Entity as Car;
pub use reservation::Entity as Reservation;
pub use user::Entity as User;
