//! Error types for the BMI service
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == API Error Enum ==
/// Client-facing errors raised while handling a BMI request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Body could not be parsed into a BMI request
    #[error("Invalid input data")]
    InvalidInput,

    /// Height was zero
    #[error("Invalid height")]
    InvalidHeight,

    /// Weight was zero
    #[error("Invalid weight")]
    InvalidWeight,
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::InvalidInput | ApiError::InvalidHeight | ApiError::InvalidWeight => {
                StatusCode::BAD_REQUEST
            }
        };

        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

// == Cache Error Enum ==
/// Errors raised by a cache backend.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Could not reach or authenticate against the cache server
    #[error("Cache connection failed: {0}")]
    Connection(String),

    /// A cache command failed after the connection was established
    #[error("Cache command failed: {0}")]
    Command(#[from] redis::RedisError),

    /// Backend reported an unexpected condition
    #[error("Cache unavailable: {0}")]
    Unavailable(String),
}

// == Config Error Enum ==
/// Errors raised while loading configuration from the environment.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is not set
    #[error("Missing environment variable: {0}")]
    Missing(&'static str),

    /// A variable is set but cannot be parsed
    #[error("Invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },

    /// The env file exists but could not be read or parsed
    #[error("Invalid env file {0}")]
    EnvFile(String),
}

// == Result Type Aliases ==
/// Convenience Result type for request handling.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Convenience Result type for cache backends.
pub type CacheResult<T> = std::result::Result<T, CacheError>;
