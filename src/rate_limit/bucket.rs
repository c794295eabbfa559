//! Token bucket used for each endpoint category.
//!
//! A bucket holds up to `max_tokens` call credits and refills continuously at
//! `max_tokens` per refill window, so a drained bucket is full again after one
//! window.
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use poloniex_api_client::rate_limit::TokenBucket;
//!
//! let mut bucket = TokenBucket::new(2, Duration::from_secs(1));
//!
//! assert!(bucket.try_consume().is_ok());
//! assert!(bucket.try_consume().is_ok());
//! // Empty: the error carries how long until the next token.
//! assert!(bucket.try_consume().is_err());
//! ```

use std::time::{Duration, Instant};

/// A continuously refilled token bucket.
#[derive(Debug, Clone)]
pub struct TokenBucket {
    /// Available call credits, always within `0..=max_tokens`
    tokens: f64,
    /// Capacity ceiling
    max_tokens: u32,
    /// Tokens restored per second
    refill_rate: f64,
    /// Last time elapsed-time credit was applied
    last_refill: Instant,
}

impl TokenBucket {
    /// Create a full bucket that refills `max_tokens` per `refill_window`.
    pub fn new(max_tokens: u32, refill_window: Duration) -> Self {
        Self {
            tokens: max_tokens as f64,
            max_tokens,
            refill_rate: refill_rate(max_tokens, refill_window),
            last_refill: Instant::now(),
        }
    }

    /// Currently available tokens (may be fractional).
    pub fn tokens(&self) -> f64 {
        self.tokens
    }

    /// Capacity of this bucket.
    pub fn max_tokens(&self) -> u32 {
        self.max_tokens
    }

    /// Tokens restored per second.
    pub fn refill_rate(&self) -> f64 {
        self.refill_rate
    }

    /// When the bucket was last refilled.
    pub fn last_refill(&self) -> Instant {
        self.last_refill
    }

    /// Fill level in percent.
    pub fn percentage(&self) -> f64 {
        if self.max_tokens == 0 {
            return 0.0;
        }
        self.tokens / self.max_tokens as f64 * 100.0
    }

    /// Credit tokens for the time elapsed since the last refill.
    ///
    /// Never exceeds capacity. Calling this twice in a row credits
    /// (almost) nothing the second time.
    pub fn refill(&mut self) {
        self.refill_at(Instant::now());
    }

    pub(crate) fn refill_at(&mut self, now: Instant) {
        let elapsed = now.saturating_duration_since(self.last_refill).as_secs_f64();
        self.tokens = (self.tokens + elapsed * self.refill_rate).min(self.max_tokens as f64);
        // Only move forward; a stale `now` must not rewind the clock.
        if now > self.last_refill {
            self.last_refill = now;
        }
    }

    /// Refill, then take one token.
    ///
    /// Returns `Ok(())` if a token was taken, or `Err(wait_time)` with the
    /// time until one token will be available.
    pub fn try_consume(&mut self) -> Result<(), Duration> {
        self.refill();

        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            Ok(())
        } else {
            Err(self.wait_for_one())
        }
    }

    /// Time until one token is available, or `None` if one is available now.
    ///
    /// Does not apply pending refill credit; call [`refill`](Self::refill) first
    /// for an up to date answer.
    pub fn time_until_available(&self) -> Option<Duration> {
        if self.tokens >= 1.0 {
            None
        } else {
            Some(self.wait_for_one())
        }
    }

    /// Change capacity, e.g. after a VIP tier change.
    ///
    /// Pending refill credit is applied at the old rate first. Tokens above
    /// the new capacity are dropped; a larger capacity grants nothing extra.
    pub fn resize(&mut self, max_tokens: u32, refill_window: Duration) {
        self.refill();
        self.max_tokens = max_tokens;
        self.refill_rate = refill_rate(max_tokens, refill_window);
        self.tokens = self.tokens.min(max_tokens as f64);
    }

    /// Empty the bucket.
    pub fn drain(&mut self) {
        self.refill();
        self.tokens = 0.0;
    }

    fn wait_for_one(&self) -> Duration {
        let secs = ((1.0 - self.tokens) / self.refill_rate).max(0.0);
        Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
    }
}

fn refill_rate(max_tokens: u32, refill_window: Duration) -> f64 {
    let window = refill_window.as_secs_f64();
    if window > 0.0 {
        max_tokens as f64 / window
    } else {
        0.0
    }
}
