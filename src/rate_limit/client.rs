//! Rate-limited REST client wrapper.
//!
//! Wraps any [`PoloniexClient`] so that every call first takes a token from
//! the [`RateLimiter`] bucket of its endpoint category.
//!
//! # Example
//!
//! ```rust,ignore
//! use poloniex_api_client::rate_limit::{RateLimitConfig, RateLimitedClient};
//! use poloniex_api_client::rest::PoloniexRestClient;
//!
//! let client = RateLimitedClient::new(PoloniexRestClient::new(), RateLimitConfig::default())?;
//!
//! // Account sync learned the tier from the exchange.
//! client.limiter().set_vip_level(3);
//!
//! let book = client.get_order_book(&OrderBookRequest::new("BTC_USDT")).await?;
//! ```

use std::future::Future;

use crate::error::PoloniexError;
use crate::rate_limit::{RateLimitConfig, RateLimiter};
use crate::rest::endpoints::{private, public};
use crate::rest::{
    AccountBalance, CancelOrderResponse, Candle, CandlesRequest, FeeInfo, Market,
    OpenOrdersRequest, Order, OrderBook, OrderBookRequest, OrderHistoryRequest, PlaceOrderRequest,
    PlaceOrderResponse, PoloniexClient, Ticker24h,
};
use crate::types::EndpointCategory;

/// A rate-limited wrapper around any [`PoloniexClient`] implementation.
///
/// The limiter is injected rather than global: share one [`RateLimiter`]
/// between every client that spends the same account's quota.
#[derive(Debug, Clone)]
pub struct RateLimitedClient<C> {
    inner: C,
    limiter: RateLimiter,
}

impl<C> RateLimitedClient<C> {
    /// Wrap `inner` with a new limiter built from `config`.
    pub fn new(inner: C, config: RateLimitConfig) -> Result<Self, PoloniexError> {
        Ok(Self::with_limiter(inner, RateLimiter::new(config)?))
    }

    /// Wrap `inner` with an existing, possibly shared, limiter.
    pub fn with_limiter(inner: C, limiter: RateLimiter) -> Self {
        Self { inner, limiter }
    }

    /// Get a reference to the inner client.
    pub fn inner(&self) -> &C {
        &self.inner
    }

    /// The limiter gating this client.
    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    /// Run `call` under the limiter for `path`.
    ///
    /// If the exchange still answers with a rate limit error, the category's
    /// bucket is drained so the following calls back off.
    async fn gated<T, F, Fut>(&self, path: &str, call: F) -> Result<T, PoloniexError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, PoloniexError>>,
    {
        self.limiter
            .execute(path, || async {
                let result = call().await;
                if let Err(err) = &result {
                    if err.is_rate_limit() {
                        let category = EndpointCategory::classify(path);
                        tracing::warn!(%category, path, "exchange rejected call despite local limiting");
                        self.limiter.drain(category);
                    }
                }
                result
            })
            .await
    }
}

impl<C: PoloniexClient> PoloniexClient for RateLimitedClient<C> {
    // ========== Public Endpoints ==========

    async fn get_markets(&self) -> Result<Vec<Market>, PoloniexError> {
        self.gated(public::MARKETS, || self.inner.get_markets()).await
    }

    async fn get_market(&self, symbol: &str) -> Result<Market, PoloniexError> {
        self.gated(&public::market(symbol), || self.inner.get_market(symbol))
            .await
    }

    async fn get_ticker24h(&self, symbol: &str) -> Result<Ticker24h, PoloniexError> {
        self.gated(&public::ticker24h(symbol), || self.inner.get_ticker24h(symbol))
            .await
    }

    async fn get_order_book(&self, request: &OrderBookRequest) -> Result<OrderBook, PoloniexError> {
        self.gated(&public::order_book(&request.symbol), || {
            self.inner.get_order_book(request)
        })
        .await
    }

    async fn get_candles(&self, request: &CandlesRequest) -> Result<Vec<Candle>, PoloniexError> {
        self.gated(&public::candles(&request.symbol), || {
            self.inner.get_candles(request)
        })
        .await
    }

    // ========== Private Endpoints - Account ==========

    async fn get_account_balances(&self) -> Result<Vec<AccountBalance>, PoloniexError> {
        self.gated(private::BALANCES, || self.inner.get_account_balances())
            .await
    }

    async fn get_account_balance(&self, account_id: &str) -> Result<AccountBalance, PoloniexError> {
        self.gated(&private::account_balances(account_id), || {
            self.inner.get_account_balance(account_id)
        })
        .await
    }

    async fn get_fee_info(&self) -> Result<FeeInfo, PoloniexError> {
        self.gated(private::FEE_INFO, || self.inner.get_fee_info()).await
    }

    // ========== Private Endpoints - Orders ==========

    async fn place_order(
        &self,
        request: &PlaceOrderRequest,
    ) -> Result<PlaceOrderResponse, PoloniexError> {
        self.gated(private::ORDERS, || self.inner.place_order(request))
            .await
    }

    async fn cancel_order(&self, order_id: &str) -> Result<CancelOrderResponse, PoloniexError> {
        self.gated(&private::order(order_id), || self.inner.cancel_order(order_id))
            .await
    }

    async fn get_open_orders(
        &self,
        request: Option<&OpenOrdersRequest>,
    ) -> Result<Vec<Order>, PoloniexError> {
        self.gated(private::ORDERS, || self.inner.get_open_orders(request))
            .await
    }

    async fn get_order_history(
        &self,
        request: Option<&OrderHistoryRequest>,
    ) -> Result<Vec<Order>, PoloniexError> {
        self.gated(private::ORDER_HISTORY, || {
            self.inner.get_order_history(request)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rate_limit::RateLimitTable;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::{Duration, Instant};

    /// Client that answers every call from canned data and counts calls.
    #[derive(Default)]
    struct MockClient {
        calls: AtomicUsize,
        reject_with_rate_limit: bool,
    }

    impl MockClient {
        fn record(&self) -> Result<(), PoloniexError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.reject_with_rate_limit {
                Err(PoloniexError::RateLimitExceeded {
                    retry_after_ms: None,
                })
            } else {
                Ok(())
            }
        }
    }

    impl PoloniexClient for MockClient {
        async fn get_markets(&self) -> Result<Vec<Market>, PoloniexError> {
            self.record().map(|_| Vec::new())
        }

        async fn get_market(&self, symbol: &str) -> Result<Market, PoloniexError> {
            self.record()?;
            Err(PoloniexError::InvalidResponse(format!("no market {symbol}")))
        }

        async fn get_ticker24h(&self, _symbol: &str) -> Result<Ticker24h, PoloniexError> {
            self.record()?;
            Err(PoloniexError::InvalidResponse("no ticker".to_string()))
        }

        async fn get_order_book(&self, _request: &OrderBookRequest) -> Result<OrderBook, PoloniexError> {
            self.record()?;
            Ok(OrderBook {
                time: 0,
                scale: None,
                asks: Vec::new(),
                bids: Vec::new(),
                ts: 0,
            })
        }

        async fn get_candles(&self, _request: &CandlesRequest) -> Result<Vec<Candle>, PoloniexError> {
            self.record().map(|_| Vec::new())
        }

        async fn get_account_balances(&self) -> Result<Vec<AccountBalance>, PoloniexError> {
            self.record().map(|_| Vec::new())
        }

        async fn get_account_balance(
            &self,
            account_id: &str,
        ) -> Result<AccountBalance, PoloniexError> {
            self.record()?;
            Ok(AccountBalance {
                account_id: account_id.to_string(),
                account_type: "SPOT".to_string(),
                balances: Vec::new(),
            })
        }

        async fn get_fee_info(&self) -> Result<FeeInfo, PoloniexError> {
            self.record()?;
            Err(PoloniexError::MissingCredentials)
        }

        async fn place_order(
            &self,
            _request: &PlaceOrderRequest,
        ) -> Result<PlaceOrderResponse, PoloniexError> {
            self.record()?;
            Ok(PlaceOrderResponse {
                id: "1".to_string(),
                client_order_id: String::new(),
            })
        }

        async fn cancel_order(&self, order_id: &str) -> Result<CancelOrderResponse, PoloniexError> {
            self.record()?;
            Ok(CancelOrderResponse {
                order_id: order_id.to_string(),
                client_order_id: String::new(),
                state: "PENDING_CANCEL".to_string(),
                code: 200,
                message: String::new(),
            })
        }

        async fn get_open_orders(
            &self,
            _request: Option<&OpenOrdersRequest>,
        ) -> Result<Vec<Order>, PoloniexError> {
            self.record().map(|_| Vec::new())
        }

        async fn get_order_history(
            &self,
            _request: Option<&OrderHistoryRequest>,
        ) -> Result<Vec<Order>, PoloniexError> {
            self.record().map(|_| Vec::new())
        }
    }

    fn tiny_table(capacity: u32) -> RateLimitTable {
        RateLimitTable {
            orders: vec![capacity],
            account: vec![capacity],
            market: capacity,
        }
    }

    #[tokio::test]
    async fn test_calls_charge_their_category() {
        let client = RateLimitedClient::new(MockClient::default(), RateLimitConfig::default()).unwrap();

        client.get_markets().await.unwrap();
        client.get_account_balances().await.unwrap();
        client
            .place_order(&PlaceOrderRequest::market_buy("BTC_USDT", 10.into()))
            .await
            .unwrap();
        client.cancel_order("42").await.unwrap();

        let status = client.limiter().status();
        assert_eq!(status.buckets["market"].available, 199);
        assert_eq!(status.buckets["account"].available, 49);
        assert_eq!(status.buckets["orders"].available, 48);
        assert_eq!(client.inner().calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_every_endpoint_charges_the_category_of_its_path() {
        let client = RateLimitedClient::new(MockClient::default(), RateLimitConfig::default()).unwrap();

        client.get_market("BTC_USDT").await.unwrap_err();
        client
            .get_candles(&CandlesRequest::new("BTC_USDT", Default::default()))
            .await
            .unwrap();
        client.get_account_balance("295").await.unwrap();
        client.get_order_history(None).await.unwrap();

        let status = client.limiter().status();
        assert_eq!(status.buckets["market"].available, 198);
        assert_eq!(status.buckets["account"].available, 49);
        assert_eq!(status.buckets["orders"].available, 49);
        assert_eq!(client.inner().calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_inner_errors_pass_through() {
        let client = RateLimitedClient::new(MockClient::default(), RateLimitConfig::default()).unwrap();

        let err = client.get_ticker24h("BTC_USDT").await.unwrap_err();
        assert!(matches!(err, PoloniexError::InvalidResponse(_)));
        let err = client.get_fee_info().await.unwrap_err();
        assert!(matches!(err, PoloniexError::MissingCredentials));

        // Failed calls still spend their token.
        assert_eq!(client.limiter().status().buckets["market"].available, 199);
        assert_eq!(client.limiter().status().buckets["account"].available, 49);
    }

    #[tokio::test]
    async fn test_exchange_rate_limit_drains_bucket() {
        let inner = MockClient {
            reject_with_rate_limit: true,
            ..Default::default()
        };
        let client = RateLimitedClient::new(inner, RateLimitConfig::default()).unwrap();

        assert!(client.get_open_orders(None).await.unwrap_err().is_rate_limit());
        assert_eq!(client.limiter().status().buckets["orders"].available, 0);
        // Other categories are untouched.
        assert!(!client.limiter().status().buckets.contains_key("market"));
    }

    #[tokio::test]
    async fn test_burst_beyond_capacity_waits() {
        let config = RateLimitConfig::default().with_table(tiny_table(5));
        let client = RateLimitedClient::new(MockClient::default(), config).unwrap();

        let start = Instant::now();
        for _ in 0..7 {
            client
                .get_order_book(&OrderBookRequest::new("BTC_USDT"))
                .await
                .unwrap();
        }
        // 5 burst, then 2 more at 5/s.
        assert!(start.elapsed() >= Duration::from_millis(300));
    }

    #[tokio::test]
    async fn test_shared_limiter_across_clients() {
        let limiter = RateLimiter::default();
        let a = RateLimitedClient::with_limiter(MockClient::default(), limiter.clone());
        let b = RateLimitedClient::with_limiter(MockClient::default(), limiter.clone());

        a.get_account_balances().await.unwrap();
        b.get_account_balances().await.unwrap();

        assert_eq!(limiter.status().buckets["account"].available, 48);
    }
}
