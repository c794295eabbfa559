//! Public market data endpoints (no authentication required).

use crate::error::PoloniexError;
use crate::rest::PoloniexRestClient;
use crate::rest::endpoints::public;
use crate::rest::types::{Candle, CandlesRequest, Market, OrderBook, OrderBookRequest, Ticker24h};

impl PoloniexRestClient {
    /// Get all trading pairs with their trade limits.
    pub async fn get_markets(&self) -> Result<Vec<Market>, PoloniexError> {
        self.public_get(public::MARKETS).await
    }

    /// Get one trading pair.
    ///
    /// Poloniex answers with a one-element list; an empty list is an error.
    pub async fn get_market(&self, symbol: &str) -> Result<Market, PoloniexError> {
        let markets: Vec<Market> = self.public_get(&public::market(symbol)).await?;
        markets
            .into_iter()
            .next()
            .ok_or_else(|| PoloniexError::InvalidResponse(format!("No market returned for {symbol}")))
    }

    /// Get the 24 hour ticker for a symbol.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use poloniex_api_client::rest::PoloniexRestClient;
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = PoloniexRestClient::new();
    ///     let ticker = client.get_ticker24h("BTC_USDT").await?;
    ///     println!("{} close {} (change {})", ticker.symbol, ticker.close, ticker.daily_change);
    ///     Ok(())
    /// }
    /// ```
    pub async fn get_ticker24h(&self, symbol: &str) -> Result<Ticker24h, PoloniexError> {
        self.public_get(&public::ticker24h(symbol)).await
    }

    /// Get the order book for a symbol.
    pub async fn get_order_book(&self, request: &OrderBookRequest) -> Result<OrderBook, PoloniexError> {
        self.public_get_with_params(&public::order_book(&request.symbol), request)
            .await
    }

    /// Get OHLC candles, oldest first.
    pub async fn get_candles(&self, request: &CandlesRequest) -> Result<Vec<Candle>, PoloniexError> {
        self.public_get_with_params(&public::candles(&request.symbol), request)
            .await
    }
}
