//! API Middleware
//!
//! Request method logging and per-client rate limiting.

use std::net::{IpAddr, SocketAddr};

use axum::{
    extract::{ConnectInfo, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{info, warn};

use super::handlers::AppState;
use crate::models::RateLimitResponse;
use crate::rate_limit::UNKNOWN_CLIENT;

/// Logs the HTTP method of every request.
pub async fn log_http_method(request: Request, next: Next) -> Response {
    info!(method = %request.method(), "HTTP method used");
    next.run(request).await
}

/// Rejects requests from clients that have used up their budget with 429.
pub async fn rate_limit(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let client = client_ip(&request);

    if !state.limiter.check(client) {
        warn!(%client, "Rate limit reached");
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(RateLimitResponse::default()),
        )
            .into_response();
    }

    next.run(request).await
}

/// Peer IP of the connection, or [`UNKNOWN_CLIENT`] when the server was not
/// started with connect info.
fn client_ip(request: &Request) -> IpAddr {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
        .unwrap_or(UNKNOWN_CLIENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http};

    #[test]
    fn test_client_ip_from_connect_info() {
        let addr: SocketAddr = "192.168.1.20:51000".parse().unwrap();
        let request = http::Request::builder()
            .extension(ConnectInfo(addr))
            .body(Body::empty())
            .unwrap();

        assert_eq!(client_ip(&request), addr.ip());
    }

    #[test]
    fn test_client_ip_unknown() {
        let request = http::Request::builder().body(Body::empty()).unwrap();
        assert_eq!(client_ip(&request), UNKNOWN_CLIENT);
    }
}
