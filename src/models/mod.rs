//! Request and Response models for the BMI API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::BmiRequest;
pub use responses::{BmiResponse, ErrorResponse, RateLimitResponse};
