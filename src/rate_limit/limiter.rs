//! Tier-aware limiter gating calls per endpoint category.

use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::Serialize;
use tokio::sync::Mutex as AsyncMutex;

use crate::error::PoloniexError;
use crate::rate_limit::{RateLimitConfig, RateLimitTable, TokenBucket};
use crate::types::{EndpointCategory, VipLevel};

/// Token-bucket rate limiter keyed by endpoint category.
///
/// Buckets are created lazily, full, the first time a category is used.
/// Clones share state, so one limiter can be handed to every client that
/// talks to the same account.
///
/// Callers of one category take their turn in arrival order: only the
/// caller at the head of the queue checks the bucket and sleeps for refill,
/// so waiters never race each other for the same token. The head gives up
/// after `max_wait_retries` sleeps without a token, which only happens when
/// tokens are taken away under it (a drain or a smaller tier).
#[derive(Debug, Clone)]
pub struct RateLimiter {
    state: Arc<Mutex<LimiterState>>,
    turns: Arc<Turns>,
    max_wait_retries: u32,
}

/// One FIFO queue per category.
#[derive(Debug, Default)]
struct Turns {
    orders: AsyncMutex<()>,
    account: AsyncMutex<()>,
    market: AsyncMutex<()>,
}

impl Turns {
    fn get(&self, category: EndpointCategory) -> &AsyncMutex<()> {
        match category {
            EndpointCategory::Orders => &self.orders,
            EndpointCategory::Account => &self.account,
            EndpointCategory::Market => &self.market,
        }
    }
}

#[derive(Debug)]
struct LimiterState {
    vip_level: VipLevel,
    enabled: bool,
    table: RateLimitTable,
    refill_window: Duration,
    buckets: HashMap<EndpointCategory, TokenBucket>,
}

impl LimiterState {
    fn bucket_mut(&mut self, category: EndpointCategory) -> &mut TokenBucket {
        let max_tokens = self.table.limit(category, self.vip_level);
        let refill_window = self.refill_window;
        self.buckets
            .entry(category)
            .or_insert_with(|| TokenBucket::new(max_tokens, refill_window))
    }
}

impl RateLimiter {
    /// Create a limiter from a validated configuration.
    pub fn new(config: RateLimitConfig) -> Result<Self, PoloniexError> {
        config.validate()?;
        Ok(Self::from_config(config))
    }

    fn from_config(config: RateLimitConfig) -> Self {
        Self {
            state: Arc::new(Mutex::new(LimiterState {
                vip_level: config.vip_level,
                enabled: config.enabled,
                table: config.table,
                refill_window: config.refill_window,
                buckets: HashMap::new(),
            })),
            turns: Arc::new(Turns::default()),
            max_wait_retries: config.max_wait_retries,
        }
    }

    /// Set the account VIP tier.
    ///
    /// Out of range values (negative, above 9) select `VIP0`. Buckets that
    /// already exist are resized to the new tier right away; tokens above the
    /// new capacity are dropped.
    pub fn set_vip_level(&self, level: i64) -> VipLevel {
        let vip_level = VipLevel::new(level);
        let mut state = self.state.lock();
        if state.vip_level != vip_level {
            tracing::info!(from = %state.vip_level, to = %vip_level, "VIP level changed");
        }
        state.vip_level = vip_level;

        let refill_window = state.refill_window;
        let LimiterState { table, buckets, .. } = &mut *state;
        for (category, bucket) in buckets.iter_mut() {
            bucket.resize(table.limit(*category, vip_level), refill_window);
        }
        vip_level
    }

    /// Current VIP tier.
    pub fn vip_level(&self) -> VipLevel {
        self.state.lock().vip_level
    }

    /// Enable or disable limiting for every clone of this limiter.
    pub fn set_enabled(&self, enabled: bool) {
        self.state.lock().enabled = enabled;
    }

    /// Whether limiting is enabled.
    pub fn is_enabled(&self) -> bool {
        self.state.lock().enabled
    }

    /// Configured capacity of a category at the current tier.
    ///
    /// Accepts a category or its name; unknown names use the market limit.
    pub fn rate_limit(&self, category: impl Into<EndpointCategory>) -> u32 {
        let state = self.state.lock();
        state.table.limit(category.into(), state.vip_level)
    }

    /// Classify a request path into its category.
    pub fn endpoint_type(&self, path: &str) -> EndpointCategory {
        EndpointCategory::classify(path)
    }

    /// Snapshot of a category's bucket, creating it (full) on first access.
    pub fn bucket(&self, category: impl Into<EndpointCategory>) -> TokenBucket {
        self.state.lock().bucket_mut(category.into()).clone()
    }

    /// Apply elapsed-time credit to a category's bucket.
    pub fn refill(&self, category: impl Into<EndpointCategory>) {
        self.state.lock().bucket_mut(category.into()).refill();
    }

    /// Empty a category's bucket so the next callers wait a full token.
    ///
    /// Used when the exchange reports that the quota was exceeded anyway.
    pub fn drain(&self, category: impl Into<EndpointCategory>) {
        let category = category.into();
        self.state.lock().bucket_mut(category).drain();
        tracing::debug!(%category, "rate limit bucket drained");
    }

    /// Wait for a token in the category of `path` and take it.
    ///
    /// Returns the category charged. Waiting in the queue is unbounded; fails
    /// with [`PoloniexError::RateLimitExceeded`] only when the caller at the
    /// head sleeps `max_wait_retries` times without getting a token.
    pub async fn acquire(&self, path: &str) -> Result<EndpointCategory, PoloniexError> {
        let category = self.endpoint_type(path);
        if !self.is_enabled() {
            return Ok(category);
        }

        let _turn = self.turns.get(category).lock().await;
        let mut retries = 0;

        loop {
            let wait_time = {
                let mut state = self.state.lock();
                if !state.enabled {
                    return Ok(category);
                }
                match state.bucket_mut(category).try_consume() {
                    Ok(()) => return Ok(category),
                    Err(wait_time) => wait_time,
                }
            };

            if retries >= self.max_wait_retries {
                tracing::warn!(
                    %category,
                    path,
                    retries,
                    "gave up waiting for rate limit token"
                );
                return Err(PoloniexError::RateLimitExceeded {
                    retry_after_ms: Some(wait_time.as_millis() as u64),
                });
            }
            retries += 1;

            tracing::debug!(%category, path, wait_ms = wait_time.as_millis() as u64, "waiting for rate limit token");
            tokio::time::sleep(wait_time).await;
        }
    }

    /// Run `f` once a token for `path`'s category is available.
    ///
    /// The result of `f` is returned unchanged, success or error. The token is
    /// spent either way.
    pub async fn execute<F, Fut, T, E>(&self, path: &str, f: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: From<PoloniexError>,
    {
        self.acquire(path).await?;
        f().await
    }

    /// Snapshot of the tier and of every bucket created so far.
    pub fn status(&self) -> RateLimitStatus {
        let state = self.state.lock();
        let buckets = state
            .buckets
            .iter()
            .map(|(category, bucket)| {
                let mut bucket = bucket.clone();
                bucket.refill();
                (category.as_str().to_string(), BucketStatus::from(&bucket))
            })
            .collect();

        RateLimitStatus {
            vip_level: state.vip_level.to_string(),
            buckets,
        }
    }

    /// Drop every bucket. The VIP tier is kept.
    pub fn reset(&self) {
        self.state.lock().buckets.clear();
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::from_config(RateLimitConfig::default())
    }
}

/// Serializable limiter snapshot for monitoring endpoints.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateLimitStatus {
    /// Tier label such as `VIP5`
    #[serde(rename = "vipLevel")]
    pub vip_level: String,
    /// Created buckets by category name
    pub buckets: BTreeMap<String, BucketStatus>,
}

/// Headroom of one bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketStatus {
    /// Whole tokens available
    pub available: u32,
    /// Capacity
    pub max: u32,
    /// Fill level in percent
    pub percentage: f64,
}

impl From<&TokenBucket> for BucketStatus {
    fn from(bucket: &TokenBucket) -> Self {
        Self {
            available: bucket.tokens().floor() as u32,
            max: bucket.max_tokens(),
            percentage: bucket.percentage(),
        }
    }
}
