//! Response DTOs for the BMI API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::bmi::{categorize, Category};
use crate::rate_limit::LIMIT_REACHED_MESSAGE;

/// Response body for a successful POST /bmi
#[derive(Debug, Clone, Serialize)]
pub struct BmiResponse {
    /// Computed or cached BMI value
    #[serde(rename = "BMI")]
    pub bmi: f64,
    /// Category label for the value
    pub message: Category,
}

impl BmiResponse {
    /// Creates a response for `bmi`, deriving its category.
    pub fn new(bmi: f64) -> Self {
        Self {
            bmi,
            message: categorize(bmi),
        }
    }
}

/// Error response body for client errors
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Response body sent when a client exceeds its rate limit
#[derive(Debug, Clone, Serialize)]
pub struct RateLimitResponse {
    pub message: &'static str,
}

impl Default for RateLimitResponse {
    fn default() -> Self {
        Self {
            message: LIMIT_REACHED_MESSAGE,
        }
    }
}
