//! API Routes
//!
//! Configures the Axum router for the BMI endpoint.

use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::post,
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

use super::handlers::{bmi_handler, AppState};
use super::middleware::{log_http_method, rate_limit};

/// Methods accepted by the CORS layer
const CORS_METHODS: [Method; 6] = [
    Method::GET,
    Method::POST,
    Method::HEAD,
    Method::PUT,
    Method::DELETE,
    Method::PATCH,
];

/// Builds the CORS layer for the given origins. A `*` entry allows any origin.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.iter().any(|origin| origin == "*") {
        AllowOrigin::from(Any)
    } else {
        let parsed: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!("Ignoring invalid CORS origin: {:?}", origin);
                    None
                }
            })
            .collect();
        AllowOrigin::list(parsed)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(CORS_METHODS.to_vec())
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

/// Creates the main router.
///
/// # Endpoints
/// - `POST /bmi` - Compute (or fetch cached) BMI
///
/// # Middleware (outermost first)
/// - Tracing
/// - CORS
/// - Method logging
/// - Per-IP rate limiting
pub fn create_router(state: AppState, cors_origins: &[String]) -> Router {
    Router::new()
        .route("/bmi", post(bmi_handler))
        .layer(middleware::from_fn_with_state(state.clone(), rate_limit))
        .layer(middleware::from_fn(log_http_method))
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCache;
    use crate::rate_limit::IpRateLimiter;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use std::sync::Arc;
    use std::time::Duration;
    use tower::util::ServiceExt;

    fn create_test_app(origins: &[&str]) -> Router {
        let limiter = IpRateLimiter::new(100, Duration::from_secs(60)).unwrap();
        let state = AppState::new(
            Arc::new(MemoryCache::default()),
            limiter,
            Duration::from_secs(500),
        );
        let origins: Vec<String> = origins.iter().map(|o| o.to_string()).collect();
        create_router(state, &origins)
    }

    #[tokio::test]
    async fn test_bmi_endpoint() {
        let app = create_test_app(&["*"]);

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/bmi")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"weight":70,"height":175}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_get_not_routed() {
        let app = create_test_app(&["*"]);

        let response = app
            .oneshot(Request::builder().uri("/bmi").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_cors_preflight_allowed_origin() {
        let app = create_test_app(&["https://app.example.com"]);

        let response = app
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/bmi")
                    .header("origin", "https://app.example.com")
                    .header("access-control-request-method", "POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers().get("access-control-allow-origin").unwrap(),
            "https://app.example.com"
        );
        let methods = response
            .headers()
            .get("access-control-allow-methods")
            .unwrap()
            .to_str()
            .unwrap();
        assert!(methods.contains("PATCH"));
    }

    #[tokio::test]
    async fn test_cors_preflight_other_origin() {
        let app = create_test_app(&["https://app.example.com"]);

        let response = app
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/bmi")
                    .header("origin", "https://evil.example.com")
                    .header("access-control-request-method", "POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert!(response.headers().get("access-control-allow-origin").is_none());
    }
}
