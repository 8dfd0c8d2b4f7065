//! Configuration Module
//!
//! Handles loading and validating server configuration from environment variables.

use std::env;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use redis::{ConnectionAddr, ConnectionInfo, RedisConnectionInfo};
use tracing::{info, warn};

use crate::error::ConfigError;

/// Env file read at startup when present
pub const ENV_FILE: &str = "config.env";

/// Cache TTL applied when `CACHE_TTL` is not set, in seconds
pub const DEFAULT_CACHE_TTL: u64 = 500;

/// Maintenance task interval applied when `CLEANUP_INTERVAL` is not set, in seconds
pub const DEFAULT_CLEANUP_INTERVAL: u64 = 60;

/// Which cache backend the server talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheBackendKind {
    /// External Redis server
    Redis,
    /// In-process store, lost on restart
    Memory,
}

impl FromStr for CacheBackendKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "redis" => Ok(Self::Redis),
            "memory" => Ok(Self::Memory),
            _ => Err(ConfigError::Invalid {
                name: "CACHE_BACKEND",
                value: s.to_string(),
            }),
        }
    }
}

/// Connection settings for the Redis backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedisConfig {
    pub host: String,
    pub port: u16,
    pub password: String,
}

impl RedisConfig {
    /// Builds connection info for the client. The password is passed as-is,
    /// so reserved URL characters need no escaping.
    pub fn connection_info(&self) -> ConnectionInfo {
        ConnectionInfo {
            addr: ConnectionAddr::Tcp(self.host.clone(), self.port),
            redis: RedisConnectionInfo {
                password: (!self.password.is_empty()).then(|| self.password.clone()),
                ..Default::default()
            },
        }
    }
}

/// Server configuration parameters.
#[derive(Debug, Clone)]
pub struct Config {
    /// Allowed CORS origins; a single `*` means any origin
    pub cors_allow_origins: Vec<String>,
    /// HTTP server port
    pub server_port: u16,
    /// Maximum requests per client within one rate window
    pub rate_limit: u32,
    /// Rate window length in seconds
    pub rate_window: u64,
    /// Redis connection settings
    pub redis: RedisConfig,
    /// Selected cache backend
    pub cache_backend: CacheBackendKind,
    /// TTL of cached BMI values in seconds
    pub cache_ttl: u64,
    /// Background cleanup task interval in seconds
    pub cleanup_interval: u64,
}

impl Config {
    /// Loads configuration from the process environment.
    ///
    /// # Environment Variables
    /// - `CORS_ALLOW_ORIGIN` - Comma-separated allowed origins, or `*` (required)
    /// - `FIBER_PORT` - HTTP server port; `SERVER_PORT` is read when unset (required)
    /// - `RATE_LIMIT` - Requests allowed per window, non-zero (required)
    /// - `TIME_LIMIT` - Rate window in seconds, non-zero (required)
    /// - `REDIS_HOST` - Redis host (required)
    /// - `REDIS_PORT` - Redis port (required)
    /// - `REDIS_PASSWORD` - Redis password, may be empty (required)
    /// - `CACHE_BACKEND` - `redis` or `memory` (default: redis)
    /// - `CACHE_TTL` - Cached value TTL in seconds (default: 500)
    /// - `CLEANUP_INTERVAL` - Cleanup frequency in seconds (default: 60)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Loads variables from an env file into the process environment.
    ///
    /// Variables already set in the environment win. A missing file is logged
    /// and reported as `Ok(false)`; an unreadable or malformed one is an error.
    pub fn load_env_file(path: impl AsRef<Path>) -> Result<bool, ConfigError> {
        let path = path.as_ref();
        match dotenvy::from_path(path) {
            Ok(()) => {
                info!("Loaded environment from {}", path.display());
                Ok(true)
            }
            Err(err) if err.not_found() => {
                warn!("No env file at {}, using process environment", path.display());
                Ok(false)
            }
            Err(err) => Err(ConfigError::EnvFile(format!("{}: {}", path.display(), err))),
        }
    }

    /// Loads configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| lookup(name).ok_or(ConfigError::Missing(name));

        let cors_allow_origins = parse_origins(&required("CORS_ALLOW_ORIGIN")?);
        if cors_allow_origins.is_empty() {
            return Err(ConfigError::Invalid {
                name: "CORS_ALLOW_ORIGIN",
                value: String::new(),
            });
        }

        let rate_limit: u32 = parse("RATE_LIMIT", required("RATE_LIMIT")?)?;
        let rate_window: u64 = parse("TIME_LIMIT", required("TIME_LIMIT")?)?;
        non_zero("RATE_LIMIT", u64::from(rate_limit))?;
        non_zero("TIME_LIMIT", rate_window)?;

        let cache_backend = match lookup("CACHE_BACKEND") {
            Some(value) => value.parse()?,
            None => CacheBackendKind::Redis,
        };

        let (port_var, port) = match lookup("FIBER_PORT") {
            Some(value) => ("FIBER_PORT", value),
            None => (
                "SERVER_PORT",
                lookup("SERVER_PORT").ok_or(ConfigError::Missing("FIBER_PORT"))?,
            ),
        };
        let cache_ttl = optional(&lookup, "CACHE_TTL", DEFAULT_CACHE_TTL)?;
        let cleanup_interval = optional(&lookup, "CLEANUP_INTERVAL", DEFAULT_CLEANUP_INTERVAL)?;
        non_zero("CACHE_TTL", cache_ttl)?;
        non_zero("CLEANUP_INTERVAL", cleanup_interval)?;

        Ok(Self {
            cors_allow_origins,
            server_port: parse(port_var, port)?,
            rate_limit,
            rate_window,
            redis: RedisConfig {
                host: required("REDIS_HOST")?,
                port: parse("REDIS_PORT", required("REDIS_PORT")?)?,
                password: required("REDIS_PASSWORD")?,
            },
            cache_backend,
            cache_ttl,
            cleanup_interval,
        })
    }

    /// Cache TTL as a `Duration`.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl)
    }

    /// Rate window as a `Duration`.
    pub fn rate_window(&self) -> Duration {
        Duration::from_secs(self.rate_window)
    }
}

fn parse<T: FromStr>(name: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { name, value })
}

fn optional<F>(lookup: &F, name: &'static str, default: u64) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(value) => parse(name, value),
        None => Ok(default),
    }
}

fn non_zero(name: &'static str, value: u64) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::Invalid {
            name,
            value: value.to_string(),
        });
    }
    Ok(())
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn base_vars() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("CORS_ALLOW_ORIGIN", "http://localhost:3000, https://example.com"),
            ("SERVER_PORT", "8080"),
            ("RATE_LIMIT", "10"),
            ("TIME_LIMIT", "60"),
            ("REDIS_HOST", "127.0.0.1"),
            ("REDIS_PORT", "6379"),
            ("REDIS_PASSWORD", ""),
        ])
    }

    fn load(vars: &HashMap<&'static str, &'static str>) -> Result<Config, ConfigError> {
        Config::from_lookup(|name| vars.get(name).map(|v| v.to_string()))
    }

    #[test]
    fn test_config_from_lookup() {
        let config = load(&base_vars()).unwrap();
        assert_eq!(
            config.cors_allow_origins,
            vec!["http://localhost:3000", "https://example.com"]
        );
        assert_eq!(config.server_port, 8080);
        assert_eq!(config.rate_limit, 10);
        assert_eq!(config.rate_window(), Duration::from_secs(60));
        assert_eq!(config.redis.port, 6379);
        assert_eq!(config.cache_backend, CacheBackendKind::Redis);
        assert_eq!(config.cache_ttl(), Duration::from_secs(500));
        assert_eq!(config.cleanup_interval, DEFAULT_CLEANUP_INTERVAL);
    }

    #[test]
    fn test_missing_required_variable() {
        let mut vars = base_vars();
        vars.remove("REDIS_HOST");
        assert_eq!(load(&vars).unwrap_err(), ConfigError::Missing("REDIS_HOST"));
    }

    #[test]
    fn test_malformed_numeric_variable() {
        let mut vars = base_vars();
        vars.insert("RATE_LIMIT", "ten");
        assert!(matches!(
            load(&vars),
            Err(ConfigError::Invalid { name: "RATE_LIMIT", .. })
        ));

        let mut vars = base_vars();
        vars.insert("SERVER_PORT", "70000");
        assert!(matches!(
            load(&vars),
            Err(ConfigError::Invalid { name: "SERVER_PORT", .. })
        ));
    }

    #[test]
    fn test_zero_rate_window_rejected() {
        let mut vars = base_vars();
        vars.insert("TIME_LIMIT", "0");
        assert!(matches!(
            load(&vars),
            Err(ConfigError::Invalid { name: "TIME_LIMIT", .. })
        ));
    }

    #[test]
    fn test_optional_overrides() {
        let mut vars = base_vars();
        vars.insert("CACHE_BACKEND", "Memory");
        vars.insert("CACHE_TTL", "30");
        vars.insert("CLEANUP_INTERVAL", "5");

        let config = load(&vars).unwrap();
        assert_eq!(config.cache_backend, CacheBackendKind::Memory);
        assert_eq!(config.cache_ttl, 30);
        assert_eq!(config.cleanup_interval, 5);
    }

    #[test]
    fn test_unknown_backend_rejected() {
        let mut vars = base_vars();
        vars.insert("CACHE_BACKEND", "memcached");
        assert!(matches!(
            load(&vars),
            Err(ConfigError::Invalid { name: "CACHE_BACKEND", .. })
        ));
    }

    #[test]
    fn test_empty_origin_list_rejected() {
        let mut vars = base_vars();
        vars.insert("CORS_ALLOW_ORIGIN", " , ");
        assert!(load(&vars).is_err());
    }

    #[test]
    fn test_fiber_port_preferred() {
        let mut vars = base_vars();
        vars.insert("FIBER_PORT", "9090");
        assert_eq!(load(&vars).unwrap().server_port, 9090);
    }

    #[test]
    fn test_server_port_fallback() {
        let mut vars = base_vars();
        vars.remove("SERVER_PORT");
        vars.insert("FIBER_PORT", "7070");
        assert_eq!(load(&vars).unwrap().server_port, 7070);

        let config = load(&base_vars()).unwrap();
        assert_eq!(config.server_port, 8080);
    }

    #[test]
    fn test_missing_port_names_fiber_port() {
        let mut vars = base_vars();
        vars.remove("SERVER_PORT");
        assert_eq!(load(&vars).unwrap_err(), ConfigError::Missing("FIBER_PORT"));
    }

    #[test]
    fn test_malformed_fiber_port() {
        let mut vars = base_vars();
        vars.insert("FIBER_PORT", "http");
        assert!(matches!(
            load(&vars),
            Err(ConfigError::Invalid { name: "FIBER_PORT", .. })
        ));
    }

    #[test]
    fn test_cache_backend_from_str() {
        assert_eq!(" redis ".parse::<CacheBackendKind>(), Ok(CacheBackendKind::Redis));
        assert_eq!(
            "memcached".parse::<CacheBackendKind>(),
            Err(ConfigError::Invalid {
                name: "CACHE_BACKEND",
                value: "memcached".to_string(),
            })
        );
    }

    #[test]
    fn test_redis_connection_info_without_password() {
        let settings = RedisConfig {
            host: "cache".to_string(),
            port: 6380,
            password: String::new(),
        };

        let info = settings.connection_info();
        assert_eq!(info.addr, ConnectionAddr::Tcp("cache".to_string(), 6380));
        assert_eq!(info.redis.password, None);
    }

    #[test]
    fn test_redis_connection_info_reserved_characters() {
        let settings = RedisConfig {
            host: "cache".to_string(),
            port: 6379,
            password: "p@ss/w#rd:?".to_string(),
        };

        let info = settings.connection_info();
        assert_eq!(info.addr, ConnectionAddr::Tcp("cache".to_string(), 6379));
        assert_eq!(info.redis.password.as_deref(), Some("p@ss/w#rd:?"));
        assert!(redis::Client::open(info).is_ok());
    }

    #[test]
    fn test_load_env_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = Config::load_env_file(dir.path().join(ENV_FILE)).unwrap();
        assert!(!loaded);
    }

    #[test]
    fn test_load_env_file_sets_variables() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(ENV_FILE);
        std::fs::write(&path, "BMI_SERVICE_ENV_FILE_TEST=from-file\n").unwrap();

        assert!(Config::load_env_file(&path).unwrap());
        assert_eq!(env::var("BMI_SERVICE_ENV_FILE_TEST").unwrap(), "from-file");
    }
}
