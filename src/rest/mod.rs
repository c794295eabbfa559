//! Poloniex REST API client.
//!
//! [`PoloniexRestClient`] talks to the v3 spot REST API. The [`PoloniexClient`]
//! trait abstracts its operations so it can be decorated, e.g. with
//! [`RateLimitedClient`](crate::rate_limit::RateLimitedClient).

mod client;
pub mod endpoints;
mod private;
mod public;
mod traits;
mod types;

pub use client::{PoloniexRestClient, PoloniexRestClientBuilder};
pub use traits::PoloniexClient;
pub use types::*;
