//! # Poloniex Client
//!
//! An async Rust client library for the Poloniex REST API with tier-aware
//! rate limiting.
//!
//! ## Features
//!
//! - Token-bucket rate limiting per endpoint category, scaled by VIP tier
//! - Signed access to private account and order endpoints
//! - Strong typing for request/response types
//! - Financial precision with `rust_decimal`
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use poloniex_api_client::rate_limit::{RateLimitConfig, RateLimitedClient};
//! use poloniex_api_client::rest::{PoloniexClient, PoloniexRestClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = RateLimitedClient::new(PoloniexRestClient::new(), RateLimitConfig::default())?;
//!     let ticker = client.get_ticker24h("BTC_USDT").await?;
//!     println!("BTC_USDT close: {}", ticker.close);
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod error;
pub mod rate_limit;
pub mod rest;
pub mod types;

// Re-export commonly used types at crate root
pub use error::PoloniexError;
pub use rate_limit::{RateLimitConfig, RateLimiter};
pub use types::common::{EndpointCategory, OrderType, Side, VipLevel};

/// Result type alias using PoloniexError
pub type Result<T> = std::result::Result<T, PoloniexError>;
