//! Rate Limit Module
//!
//! Per-client-IP request limiting built on governor's keyed GCRA limiter.
//!
//! A client may send `max_requests` back to back; after that, capacity
//! replenishes at `max_requests` per `window`.

use std::net::{IpAddr, Ipv4Addr};
use std::num::NonZeroU32;
use std::time::Duration;

use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};

use crate::error::ConfigError;

/// Bucket shared by requests whose peer address is unknown
pub const UNKNOWN_CLIENT: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);

/// Body message returned with 429 responses
pub const LIMIT_REACHED_MESSAGE: &str = "Too many requests please try again later";

// == IP Rate Limiter ==
/// Keyed rate limiter tracking one budget per client IP.
pub struct IpRateLimiter {
    limiter: DefaultKeyedRateLimiter<IpAddr>,
    max_requests: NonZeroU32,
    window: Duration,
}

impl IpRateLimiter {
    // == Constructor ==
    /// Creates a limiter allowing `max_requests` per `window` for each client.
    pub fn new(max_requests: u32, window: Duration) -> Result<Self, ConfigError> {
        let max = NonZeroU32::new(max_requests).ok_or(ConfigError::Invalid {
            name: "RATE_LIMIT",
            value: max_requests.to_string(),
        })?;

        let period = window / max.get();
        let quota = Quota::with_period(period)
            .ok_or(ConfigError::Invalid {
                name: "TIME_LIMIT",
                value: window.as_secs().to_string(),
            })?
            .allow_burst(max);

        Ok(Self {
            limiter: RateLimiter::keyed(quota),
            max_requests: max,
            window,
        })
    }

    // == Check ==
    /// Records a request from `client` and reports whether it is allowed.
    pub fn check(&self, client: IpAddr) -> bool {
        self.limiter.check_key(&client).is_ok()
    }

    // == Maintenance ==
    /// Forgets clients whose budget has fully replenished. Returns how many
    /// client entries remain tracked.
    pub fn prune(&self) -> usize {
        self.limiter.retain_recent();
        self.limiter.shrink_to_fit();
        self.limiter.len()
    }

    /// Configured requests per window.
    pub fn max_requests(&self) -> u32 {
        self.max_requests.get()
    }

    /// Configured window length.
    pub fn window(&self) -> Duration {
        self.window
    }
}

impl std::fmt::Debug for IpRateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IpRateLimiter")
            .field("max_requests", &self.max_requests)
            .field("window", &self.window)
            .finish()
    }
}
