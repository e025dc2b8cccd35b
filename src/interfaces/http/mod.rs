//! HTTP REST API
//!
//! - `common`: response envelope, error mapping, validated JSON extractor
//! - `middleware`: bearer authentication and principal-kind guards
//! - `modules`: DTOs and handlers per resource
//! - `router`: route table with Swagger documentation

pub mod common;
pub mod middleware;
pub mod modules;
pub mod router;

pub use router::{create_api_router, AppState};
