//! Car aggregate (fleet catalog)

pub mod model;
pub mod repository;

pub use model::{to_cents, Car, CarFilter, CarSummary, MAX_PRICE_PER_DAY_CENTS};
pub use repository::CarRepository;
