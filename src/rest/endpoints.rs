//! Poloniex REST API endpoint paths.

/// Base URL for the Poloniex REST API.
pub const POLONIEX_BASE_URL: &str = "https://api.poloniex.com";

/// Public endpoints (no authentication required).
pub mod public {
    /// All trading pairs.
    pub const MARKETS: &str = "/markets";

    /// One trading pair.
    pub fn market(symbol: &str) -> String {
        format!("/markets/{symbol}")
    }

    /// 24h ticker for one symbol.
    pub fn ticker24h(symbol: &str) -> String {
        format!("/markets/{symbol}/ticker24h")
    }

    /// Order book for one symbol.
    pub fn order_book(symbol: &str) -> String {
        format!("/markets/{symbol}/orderBook")
    }

    /// OHLC candles for one symbol.
    pub fn candles(symbol: &str) -> String {
        format!("/markets/{symbol}/candles")
    }
}

/// Private endpoints (authentication required).
pub mod private {
    /// Balances of every account.
    pub const BALANCES: &str = "/accounts/balances";
    /// Fee tier information.
    pub const FEE_INFO: &str = "/feeinfo";
    /// Place an order (POST) or list open orders (GET).
    pub const ORDERS: &str = "/orders";
    /// Filled and cancelled orders.
    pub const ORDER_HISTORY: &str = "/orders/history";

    /// Balances of one account.
    pub fn account_balances(account_id: &str) -> String {
        format!("/accounts/{account_id}/balances")
    }

    /// A single order by id.
    pub fn order(order_id: &str) -> String {
        format!("/orders/{order_id}")
    }
}
