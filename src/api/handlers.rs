//! API Handlers
//!
//! HTTP request handler for the BMI endpoint and the state it runs against.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use tracing::{debug, error, warn};

use crate::bmi;
use crate::cache::{bmi_key, CacheBackend};
use crate::config::Config;
use crate::error::{ApiError, ConfigError, Result};
use crate::models::{BmiRequest, BmiResponse};
use crate::rate_limit::IpRateLimiter;

/// Application state shared across all handlers.
///
/// Built once at startup and handed to the router; no global state.
#[derive(Clone)]
pub struct AppState {
    /// Cache backend for computed values
    pub cache: Arc<dyn CacheBackend>,
    /// Per-client rate limiter
    pub limiter: Arc<IpRateLimiter>,
    /// TTL applied to newly cached values
    pub cache_ttl: Duration,
}

impl AppState {
    /// Creates a new AppState from its parts.
    pub fn new(cache: Arc<dyn CacheBackend>, limiter: IpRateLimiter, cache_ttl: Duration) -> Self {
        Self {
            cache,
            limiter: Arc::new(limiter),
            cache_ttl,
        }
    }

    /// Creates a new AppState from configuration and an already connected cache.
    pub fn from_config(
        config: &Config,
        cache: Arc<dyn CacheBackend>,
    ) -> std::result::Result<Self, ConfigError> {
        let limiter = IpRateLimiter::new(config.rate_limit, config.rate_window())?;
        Ok(Self::new(cache, limiter, config.cache_ttl()))
    }
}

/// Handler for POST /bmi
///
/// Validates the body, serves a cached value when one exists, and otherwise
/// computes the BMI and caches it. Cache failures never fail the request.
pub async fn bmi_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<BmiRequest>, JsonRejection>,
) -> Result<Json<BmiResponse>> {
    let Json(req) = payload.map_err(|rejection| {
        warn!("Invalid request: {}", rejection.body_text());
        ApiError::InvalidInput
    })?;

    if let Err(err) = req.validate() {
        warn!(height = req.height, weight = req.weight, "{}", err);
        return Err(err);
    }

    let key = bmi_key(req.height, req.weight);

    if let Some(cached) = lookup(state.cache.as_ref(), &key).await {
        debug!(%key, "Cache hit");
        return Ok(Json(BmiResponse::new(cached)));
    }

    let value = bmi::compute(req.weight, req.height);
    store(state.cache.as_ref(), &key, value, state.cache_ttl).await;

    Ok(Json(BmiResponse::new(value)))
}

/// Reads a cached BMI value. Errors and undecodable values count as misses.
async fn lookup(cache: &dyn CacheBackend, key: &str) -> Option<f64> {
    match cache.get(key).await {
        Ok(Some(raw)) => match serde_json::from_str::<f64>(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(%key, "Discarding undecodable cached value: {}", err);
                None
            }
        },
        Ok(None) => None,
        Err(err) => {
            error!(%key, "Cache read failed: {}", err);
            None
        }
    }
}

/// Writes a computed BMI value. Failures are logged only.
async fn store(cache: &dyn CacheBackend, key: &str, value: f64, ttl: Duration) {
    if !value.is_finite() {
        warn!(%key, "Not caching non-finite BMI value");
        return;
    }

    let encoded = match serde_json::to_string(&value) {
        Ok(encoded) => encoded,
        Err(err) => {
            error!(%key, "Failed to encode BMI value: {}", err);
            return;
        }
    };

    if let Err(err) = cache.set(key, &encoded, ttl).await {
        error!(%key, "Cache write failed: {}", err);
    }
}
