//! User aggregate
//!
//! Administrators and customers, as resolved by the identity provider.

pub mod model;
pub mod repository;

pub use model::{CustomerSummary, Principal, PrincipalKind, User};
pub use repository::UserRepository;
