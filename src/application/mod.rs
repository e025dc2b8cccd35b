pub mod services;

pub use services::{
    AuthSession, CarChanges, FleetService, IdentityService, NewCar, NewCustomer, NewReservation,
    ReservationService,
};
