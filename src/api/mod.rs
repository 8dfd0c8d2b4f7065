//! API Module
//!
//! HTTP handlers, middleware and routing for the BMI service.
//!
//! # Endpoints
//! - `POST /bmi` - Compute a BMI value and its category

pub mod handlers;
pub mod middleware;
pub mod routes;

pub use handlers::*;
pub use routes::{cors_layer, create_router};
