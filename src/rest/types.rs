//! Request and response types for the Poloniex REST endpoints.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{OrderState, OrderType, Side, TimeInForce};

// ========== Market data ==========

/// A tradable pair.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Market {
    /// Symbol, e.g. `BTC_USDT`
    pub symbol: String,
    /// Base currency
    pub base_currency_name: String,
    /// Quote currency
    pub quote_currency_name: String,
    /// Display name, e.g. `BTC/USDT`
    pub display_name: String,
    /// Trading state, e.g. `NORMAL`
    pub state: String,
    /// When the pair became visible (ms)
    #[serde(default)]
    pub visible_start_time: Option<i64>,
    /// When trading opened (ms)
    #[serde(default)]
    pub tradable_start_time: Option<i64>,
    /// Precision and size limits
    #[serde(default)]
    pub symbol_trade_limit: Option<SymbolTradeLimit>,
}

/// Precision and minimum sizes for a pair.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolTradeLimit {
    /// Decimal places for price
    pub price_scale: u32,
    /// Decimal places for quantity
    pub quantity_scale: u32,
    /// Decimal places for amount
    pub amount_scale: u32,
    /// Minimum order quantity
    pub min_quantity: Decimal,
    /// Minimum order amount
    pub min_amount: Decimal,
}

/// 24 hour rolling ticker.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticker24h {
    /// Symbol
    pub symbol: String,
    /// Opening price
    pub open: Decimal,
    /// Lowest price
    pub low: Decimal,
    /// Highest price
    pub high: Decimal,
    /// Last price
    pub close: Decimal,
    /// Base volume
    pub quantity: Decimal,
    /// Quote volume
    pub amount: Decimal,
    /// Number of trades
    pub trade_count: u64,
    /// Window start (ms)
    pub start_time: i64,
    /// Window end (ms)
    pub close_time: i64,
    /// Relative change over the window
    pub daily_change: Decimal,
    /// Best bid
    #[serde(default)]
    pub bid: Option<Decimal>,
    /// Best ask
    #[serde(default)]
    pub ask: Option<Decimal>,
    /// Mark price
    #[serde(default)]
    pub mark_price: Option<Decimal>,
    /// Server time (ms)
    pub ts: i64,
}

/// Order book request parameters.
#[derive(Debug, Clone, Default, Serialize)]
pub struct OrderBookRequest {
    /// Symbol (goes in the path)
    #[serde(skip)]
    pub symbol: String,
    /// Price aggregation scale
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<String>,
    /// Number of levels per side (5, 10, 20, 50, 100, 150)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl OrderBookRequest {
    /// Request the book for a symbol with default depth.
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            ..Default::default()
        }
    }

    /// Set the number of levels per side.
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Order book snapshot.
///
/// Poloniex sends each side as a flat `[price, qty, price, qty, ...]` list.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderBook {
    /// Snapshot time (ms)
    pub time: i64,
    /// Aggregation scale
    #[serde(default)]
    pub scale: Option<String>,
    /// Flattened asks, best first
    pub asks: Vec<Decimal>,
    /// Flattened bids, best first
    pub bids: Vec<Decimal>,
    /// Server time (ms)
    pub ts: i64,
}

impl OrderBook {
    /// Asks as `(price, quantity)` pairs.
    pub fn ask_levels(&self) -> Vec<(Decimal, Decimal)> {
        pairs(&self.asks)
    }

    /// Bids as `(price, quantity)` pairs.
    pub fn bid_levels(&self) -> Vec<(Decimal, Decimal)> {
        pairs(&self.bids)
    }

    /// Best ask minus best bid, if both sides are present.
    pub fn spread(&self) -> Option<Decimal> {
        Some(*self.asks.first()? - *self.bids.first()?)
    }
}

fn pairs(flat: &[Decimal]) -> Vec<(Decimal, Decimal)> {
    flat.chunks_exact(2).map(|c| (c[0], c[1])).collect()
}

/// Candle width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CandleInterval {
    #[serde(rename = "MINUTE_1")]
    Minute1,
    #[serde(rename = "MINUTE_5")]
    Minute5,
    #[serde(rename = "MINUTE_10")]
    Minute10,
    #[serde(rename = "MINUTE_15")]
    Minute15,
    #[serde(rename = "MINUTE_30")]
    Minute30,
    #[default]
    #[serde(rename = "HOUR_1")]
    Hour1,
    #[serde(rename = "HOUR_2")]
    Hour2,
    #[serde(rename = "HOUR_4")]
    Hour4,
    #[serde(rename = "HOUR_6")]
    Hour6,
    #[serde(rename = "HOUR_12")]
    Hour12,
    #[serde(rename = "DAY_1")]
    Day1,
    #[serde(rename = "DAY_3")]
    Day3,
    #[serde(rename = "WEEK_1")]
    Week1,
    #[serde(rename = "MONTH_1")]
    Month1,
}

/// Candles request parameters.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandlesRequest {
    /// Symbol (goes in the path)
    #[serde(skip)]
    pub symbol: String,
    /// Candle width
    pub interval: CandleInterval,
    /// Number of candles (max 500)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Window start (ms)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<i64>,
    /// Window end (ms)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<i64>,
}

impl CandlesRequest {
    /// Request candles of the given width.
    pub fn new(symbol: impl Into<String>, interval: CandleInterval) -> Self {
        Self {
            symbol: symbol.into(),
            interval,
            ..Default::default()
        }
    }

    /// Set the number of candles.
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// One OHLC candle.
///
/// Poloniex sends candles as positional arrays; fields are in wire order.
#[derive(Debug, Clone, Deserialize)]
pub struct Candle {
    /// Lowest price
    pub low: Decimal,
    /// Highest price
    pub high: Decimal,
    /// Opening price
    pub open: Decimal,
    /// Closing price
    pub close: Decimal,
    /// Quote volume
    pub amount: Decimal,
    /// Base volume
    pub quantity: Decimal,
    /// Quote volume bought by takers
    pub buy_taker_amount: Decimal,
    /// Base volume bought by takers
    pub buy_taker_quantity: Decimal,
    /// Number of trades
    pub trade_count: u64,
    /// Server time (ms)
    pub ts: i64,
    /// Volume weighted average price
    pub weighted_average: Decimal,
    /// Candle width
    pub interval: CandleInterval,
    /// Candle start (ms)
    pub start_time: i64,
    /// Candle end (ms)
    pub close_time: i64,
}

// ========== Account ==========

/// Balances of one account.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountBalance {
    /// Account id
    pub account_id: String,
    /// Account type, e.g. `SPOT`
    pub account_type: String,
    /// Per-currency balances
    pub balances: Vec<CurrencyBalance>,
}

/// Balance of one currency.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyBalance {
    /// Currency id
    pub currency_id: String,
    /// Currency code
    pub currency: String,
    /// Free balance
    pub available: Decimal,
    /// Balance reserved by open orders
    pub hold: Decimal,
}

/// Fee tier information.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeInfo {
    /// Whether the fee discount applies
    pub trx_discount: bool,
    /// Maker fee rate
    pub maker_rate: Decimal,
    /// Taker fee rate
    pub taker_rate: Decimal,
    /// 30 day trading volume in USD
    #[serde(rename = "volume30D")]
    pub volume_30d: Decimal,
}

// ========== Orders ==========

/// New order parameters.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    /// Symbol
    pub symbol: String,
    /// Side
    pub side: Side,
    /// Order type
    #[serde(rename = "type")]
    pub order_type: OrderType,
    /// Time in force
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_in_force: Option<TimeInForce>,
    /// Limit price
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    /// Base quantity
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<Decimal>,
    /// Quote amount (market buys)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
    /// Client order id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_order_id: Option<String>,
}

impl PlaceOrderRequest {
    /// Market buy spending `amount` of the quote currency.
    pub fn market_buy(symbol: impl Into<String>, amount: Decimal) -> Self {
        Self {
            symbol: symbol.into(),
            side: Side::Buy,
            order_type: OrderType::Market,
            time_in_force: None,
            price: None,
            quantity: None,
            amount: Some(amount),
            client_order_id: None,
        }
    }

    /// Market sell of `quantity` base currency.
    pub fn market_sell(symbol: impl Into<String>, quantity: Decimal) -> Self {
        Self {
            side: Side::Sell,
            amount: None,
            quantity: Some(quantity),
            ..Self::market_buy(symbol, Decimal::ZERO)
        }
    }

    /// Good-till-cancelled limit order.
    pub fn limit(symbol: impl Into<String>, side: Side, price: Decimal, quantity: Decimal) -> Self {
        Self {
            symbol: symbol.into(),
            side,
            order_type: OrderType::Limit,
            time_in_force: Some(TimeInForce::Gtc),
            price: Some(price),
            quantity: Some(quantity),
            amount: None,
            client_order_id: None,
        }
    }

    /// Attach a client order id.
    pub fn client_order_id(mut self, id: impl Into<String>) -> Self {
        self.client_order_id = Some(id.into());
        self
    }
}

/// Response to a placed order.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderResponse {
    /// Exchange order id
    pub id: String,
    /// Client order id (empty if none was given)
    #[serde(default)]
    pub client_order_id: String,
}

/// Response to a cancellation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelOrderResponse {
    /// Exchange order id
    pub order_id: String,
    /// Client order id
    #[serde(default)]
    pub client_order_id: String,
    /// State after the request
    pub state: String,
    /// Result code (200 on success)
    pub code: i64,
    /// Result message
    #[serde(default)]
    pub message: String,
}

/// Filters for listing open orders.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenOrdersRequest {
    /// Only this symbol
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    /// Only this side
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side: Option<Side>,
    /// Page start (order id)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    /// Maximum number of orders
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl OpenOrdersRequest {
    /// Open orders for one symbol.
    pub fn for_symbol(symbol: impl Into<String>) -> Self {
        Self {
            symbol: Some(symbol.into()),
            ..Default::default()
        }
    }
}

/// Filters for the order history.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderHistoryRequest {
    /// Only this symbol
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    /// Only this side
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side: Option<Side>,
    /// Maximum number of orders (max 1000)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Window start (ms)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<i64>,
    /// Window end (ms)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<i64>,
}

impl OrderHistoryRequest {
    /// History of one symbol, newest `limit` orders.
    pub fn for_symbol(symbol: impl Into<String>, limit: u32) -> Self {
        Self {
            symbol: Some(symbol.into()),
            limit: Some(limit),
            ..Default::default()
        }
    }
}

/// An order as reported by Poloniex.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Exchange order id
    pub id: String,
    /// Client order id
    #[serde(default)]
    pub client_order_id: String,
    /// Symbol
    pub symbol: String,
    /// Lifecycle state
    pub state: OrderState,
    /// Account type
    pub account_type: String,
    /// Side
    pub side: Side,
    /// Order type
    #[serde(rename = "type")]
    pub order_type: OrderType,
    /// Time in force
    pub time_in_force: TimeInForce,
    /// Base quantity
    pub quantity: Decimal,
    /// Limit price
    pub price: Decimal,
    /// Average fill price
    pub avg_price: Decimal,
    /// Quote amount
    pub amount: Decimal,
    /// Filled base quantity
    pub filled_quantity: Decimal,
    /// Filled quote amount
    pub filled_amount: Decimal,
    /// Creation time (ms)
    pub create_time: i64,
    /// Last update time (ms)
    pub update_time: i64,
}
