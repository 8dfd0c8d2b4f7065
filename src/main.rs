//! BMI Service - A small HTTP service computing Body Mass Index
//!
//! Computes BMI from weight and height, caches results with a TTL and
//! rate-limits callers per IP.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bmi_service::cache::{CacheBackend, MemoryCache, RedisCache};
use bmi_service::config::{CacheBackendKind, Config, ENV_FILE};
use bmi_service::{create_router, spawn_cleanup_task, AppState};

/// Main entry point for the BMI service.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load `config.env` if present, then configuration from environment variables
/// 3. Connect the cache backend
/// 4. Start background cleanup task
/// 5. Create Axum router with middleware
/// 6. Start HTTP server on configured port
/// 7. Handle graceful shutdown on SIGINT/SIGTERM
///
/// Configuration errors and an unreachable Redis server abort startup.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bmi_service=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting BMI service");

    Config::load_env_file(ENV_FILE).context("Failed to load env file")?;
    let config = Config::from_env().context("Failed to load configuration")?;
    info!(
        "Configuration loaded: port={}, rate_limit={}/{}s, cache={:?}, cache_ttl={}s",
        config.server_port, config.rate_limit, config.rate_window, config.cache_backend, config.cache_ttl
    );

    let cache: Arc<dyn CacheBackend> = match config.cache_backend {
        CacheBackendKind::Redis => Arc::new(
            RedisCache::connect(&config.redis)
                .await
                .context("Can not connect to Redis")?,
        ),
        CacheBackendKind::Memory => {
            warn!("Using in-process cache; cached values are lost on restart");
            Arc::new(MemoryCache::default())
        }
    };

    let state = AppState::from_config(&config, cache).context("Invalid rate limit settings")?;

    let cleanup_handle = spawn_cleanup_task(state.clone(), config.cleanup_interval);
    info!("Background cleanup task started");

    let app = create_router(state, &config.cors_allow_origins);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    // Connect info supplies the peer address used as the rate limit key
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal(cleanup_handle))
    .await
    .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown signal, aborts the cleanup task and allows graceful shutdown.
async fn shutdown_signal(cleanup_handle: tokio::task::JoinHandle<()>) {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    cleanup_handle.abort();
    warn!("Cleanup task aborted");
}
