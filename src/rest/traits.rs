//! Trait definition for the Poloniex REST API client.
//!
//! [`PoloniexClient`] abstracts the REST operations so that callers can be
//! written against either the plain client or a decorated one, such as the
//! rate-limited wrapper, and tested with mocks.
//!
//! ```rust,ignore
//! use poloniex_api_client::rest::PoloniexClient;
//!
//! async fn print_close<C: PoloniexClient>(client: &C) -> poloniex_api_client::Result<()> {
//!     let ticker = client.get_ticker24h("BTC_USDT").await?;
//!     println!("close: {}", ticker.close);
//!     Ok(())
//! }
//! ```

use std::future::Future;

use crate::error::PoloniexError;
use crate::rest::PoloniexRestClient;
use crate::rest::types::{
    AccountBalance, CancelOrderResponse, Candle, CandlesRequest, FeeInfo, Market,
    OpenOrdersRequest, Order, OrderBook, OrderBookRequest, OrderHistoryRequest, PlaceOrderRequest,
    PlaceOrderResponse, Ticker24h,
};

/// Poloniex REST API operations.
pub trait PoloniexClient: Send + Sync {
    // ========== Public Endpoints ==========

    /// Get all trading pairs.
    fn get_markets(&self) -> impl Future<Output = Result<Vec<Market>, PoloniexError>> + Send;

    /// Get one trading pair.
    fn get_market(&self, symbol: &str) -> impl Future<Output = Result<Market, PoloniexError>> + Send;

    /// Get the 24 hour ticker for a symbol.
    fn get_ticker24h(
        &self,
        symbol: &str,
    ) -> impl Future<Output = Result<Ticker24h, PoloniexError>> + Send;

    /// Get the order book for a symbol.
    fn get_order_book(
        &self,
        request: &OrderBookRequest,
    ) -> impl Future<Output = Result<OrderBook, PoloniexError>> + Send;

    /// Get OHLC candles.
    fn get_candles(
        &self,
        request: &CandlesRequest,
    ) -> impl Future<Output = Result<Vec<Candle>, PoloniexError>> + Send;

    // ========== Private Endpoints - Account ==========

    /// Get balances of every account.
    fn get_account_balances(
        &self,
    ) -> impl Future<Output = Result<Vec<AccountBalance>, PoloniexError>> + Send;

    /// Get balances of one account.
    fn get_account_balance(
        &self,
        account_id: &str,
    ) -> impl Future<Output = Result<AccountBalance, PoloniexError>> + Send;

    /// Get fee rates and 30 day volume.
    fn get_fee_info(&self) -> impl Future<Output = Result<FeeInfo, PoloniexError>> + Send;

    // ========== Private Endpoints - Orders ==========

    /// Place a new order.
    fn place_order(
        &self,
        request: &PlaceOrderRequest,
    ) -> impl Future<Output = Result<PlaceOrderResponse, PoloniexError>> + Send;

    /// Cancel an order by exchange id.
    fn cancel_order(
        &self,
        order_id: &str,
    ) -> impl Future<Output = Result<CancelOrderResponse, PoloniexError>> + Send;

    /// List open orders.
    fn get_open_orders(
        &self,
        request: Option<&OpenOrdersRequest>,
    ) -> impl Future<Output = Result<Vec<Order>, PoloniexError>> + Send;

    /// List filled and cancelled orders.
    fn get_order_history(
        &self,
        request: Option<&OrderHistoryRequest>,
    ) -> impl Future<Output = Result<Vec<Order>, PoloniexError>> + Send;
}

impl PoloniexClient for PoloniexRestClient {
    async fn get_markets(&self) -> Result<Vec<Market>, PoloniexError> {
        PoloniexRestClient::get_markets(self).await
    }

    async fn get_market(&self, symbol: &str) -> Result<Market, PoloniexError> {
        PoloniexRestClient::get_market(self, symbol).await
    }

    async fn get_ticker24h(&self, symbol: &str) -> Result<Ticker24h, PoloniexError> {
        PoloniexRestClient::get_ticker24h(self, symbol).await
    }

    async fn get_order_book(&self, request: &OrderBookRequest) -> Result<OrderBook, PoloniexError> {
        PoloniexRestClient::get_order_book(self, request).await
    }

    async fn get_candles(&self, request: &CandlesRequest) -> Result<Vec<Candle>, PoloniexError> {
        PoloniexRestClient::get_candles(self, request).await
    }

    async fn get_account_balances(&self) -> Result<Vec<AccountBalance>, PoloniexError> {
        PoloniexRestClient::get_account_balances(self).await
    }

    async fn get_account_balance(&self, account_id: &str) -> Result<AccountBalance, PoloniexError> {
        PoloniexRestClient::get_account_balance(self, account_id).await
    }

    async fn get_fee_info(&self) -> Result<FeeInfo, PoloniexError> {
        PoloniexRestClient::get_fee_info(self).await
    }

    async fn place_order(
        &self,
        request: &PlaceOrderRequest,
    ) -> Result<PlaceOrderResponse, PoloniexError> {
        PoloniexRestClient::place_order(self, request).await
    }

    async fn cancel_order(&self, order_id: &str) -> Result<CancelOrderResponse, PoloniexError> {
        PoloniexRestClient::cancel_order(self, order_id).await
    }

    async fn get_open_orders(
        &self,
        request: Option<&OpenOrdersRequest>,
    ) -> Result<Vec<Order>, PoloniexError> {
        PoloniexRestClient::get_open_orders(self, request).await
    }

    async fn get_order_history(
        &self,
        request: Option<&OrderHistoryRequest>,
    ) -> Result<Vec<Order>, PoloniexError> {
        PoloniexRestClient::get_order_history(self, request).await
    }
}
