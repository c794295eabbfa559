//! Rate limiting for the Poloniex API.
//!
//! Poloniex throttles REST calls per endpoint category, and the order and
//! account quotas grow with the account's VIP tier. This module keeps one
//! token bucket per category and makes callers wait for a token instead of
//! letting the exchange reject them.
//!
//! ## Rate Limit Categories
//!
//! - **orders**: order placement, cancellation and queries (tier-based)
//! - **account**: balances and fee info (tier-based)
//! - **market**: public market data, flat for every tier; also the fallback
//!   for any route that is not recognised
//!
//! ## Example
//!
//! ```rust,ignore
//! use poloniex_api_client::rate_limit::{RateLimitConfig, RateLimitedClient};
//! use poloniex_api_client::rest::PoloniexRestClient;
//! use poloniex_api_client::types::VipLevel;
//!
//! // Wrap a client with automatic rate limiting
//! let client = RateLimitedClient::new(
//!     PoloniexRestClient::new(),
//!     RateLimitConfig::default().with_vip_level(VipLevel::new(3)),
//! )?;
//!
//! // All requests are automatically rate limited
//! let markets = client.get_markets().await?;
//! ```
//!
//! ## Using the limiter directly
//!
//! ```rust
//! use poloniex_api_client::rate_limit::RateLimiter;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), poloniex_api_client::PoloniexError> {
//! let limiter = RateLimiter::default();
//! limiter.set_vip_level(5);
//!
//! let value = limiter
//!     .execute("/orders", || async { Ok::<_, poloniex_api_client::PoloniexError>(42) })
//!     .await?;
//! assert_eq!(value, 42);
//! assert_eq!(limiter.status().vip_level, "VIP5");
//! # Ok(())
//! # }
//! ```

mod bucket;
mod client;
mod limiter;
mod table;

pub use bucket::TokenBucket;
pub use client::RateLimitedClient;
pub use limiter::{BucketStatus, RateLimitStatus, RateLimiter};
pub use table::RateLimitTable;

use std::time::Duration;

use crate::error::PoloniexError;
use crate::types::VipLevel;

/// Rate limiter configuration.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Account VIP tier (sizes order and account buckets).
    pub vip_level: VipLevel,
    /// Whether to enable rate limiting.
    pub enabled: bool,
    /// Capacity per category and tier.
    pub table: RateLimitTable,
    /// Time for an empty bucket to refill completely.
    pub refill_window: Duration,
    /// How many times the caller at the head of a queue may sleep for refill
    /// before giving up.
    pub max_wait_retries: u32,
}

impl RateLimitConfig {
    /// Set the VIP tier.
    pub fn with_vip_level(mut self, vip_level: VipLevel) -> Self {
        self.vip_level = vip_level;
        self
    }

    /// Use a custom capacity table.
    pub fn with_table(mut self, table: RateLimitTable) -> Self {
        self.table = table;
        self
    }

    /// Set the refill window.
    pub fn with_refill_window(mut self, refill_window: Duration) -> Self {
        self.refill_window = refill_window;
        self
    }

    /// Set the wait retry bound.
    pub fn with_max_wait_retries(mut self, retries: u32) -> Self {
        self.max_wait_retries = retries;
        self
    }

    /// Enable or disable limiting.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Check the configuration before building a limiter from it.
    pub fn validate(&self) -> Result<(), PoloniexError> {
        if self.refill_window.is_zero() {
            return Err(PoloniexError::InvalidConfig(
                "refill window must be non-zero".to_string(),
            ));
        }
        self.table.validate()
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            vip_level: VipLevel::MIN,
            enabled: true,
            table: RateLimitTable::default(),
            refill_window: limits::REFILL_WINDOW,
            max_wait_retries: limits::MAX_WAIT_RETRIES,
        }
    }
}

/// Poloniex spot rate limit constants.
pub mod limits {
    use std::time::Duration;

    /// Time for an empty bucket to refill completely.
    pub const REFILL_WINDOW: Duration = Duration::from_secs(1);

    /// Default bound on sleeps per acquire.
    pub const MAX_WAIT_RETRIES: u32 = 64;

    /// Order endpoint limits.
    pub mod orders {
        /// Requests per second, indexed by VIP level.
        pub const PER_TIER: [u32; 10] = [50, 75, 75, 100, 100, 150, 150, 200, 200, 200];
    }

    /// Account endpoint limits.
    pub mod account {
        /// Requests per second, indexed by VIP level.
        pub const PER_TIER: [u32; 10] = [50, 75, 75, 100, 100, 150, 150, 200, 200, 200];
    }

    /// Market data limits.
    pub mod market {
        /// Requests per second for every tier.
        pub const FLAT: u32 = 200;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = RateLimitConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.enabled);
        assert_eq!(config.vip_level, VipLevel::MIN);
        assert_eq!(config.refill_window, Duration::from_secs(1));
    }

    #[test]
    fn test_zero_window_rejected() {
        let config = RateLimitConfig::default().with_refill_window(Duration::ZERO);
        assert!(matches!(
            config.validate(),
            Err(PoloniexError::InvalidConfig(_))
        ));
    }
}
