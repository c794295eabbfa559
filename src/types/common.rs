//! Common domain types for the Poloniex API.

use serde::{Deserialize, Serialize};

/// Buy or sell side of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    /// Buy order
    Buy,
    /// Sell order
    Sell,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

/// Order type for spot trading.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    /// Market order - execute immediately at best available price
    #[default]
    Market,
    /// Limit order - execute at specified price or better
    Limit,
    /// Limit order that is rejected if it would take liquidity
    LimitMaker,
}

impl std::fmt::Display for OrderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            OrderType::Market => "MARKET",
            OrderType::Limit => "LIMIT",
            OrderType::LimitMaker => "LIMIT_MAKER",
        };
        write!(f, "{}", s)
    }
}

/// How long an order stays active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TimeInForce {
    /// Good till cancelled
    #[default]
    Gtc,
    /// Immediate or cancel
    Ioc,
    /// Fill or kill
    Fok,
}

/// Order lifecycle state as reported by Poloniex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderState {
    /// Accepted, nothing filled yet
    New,
    /// Some quantity filled
    PartiallyFilled,
    /// Completely filled
    Filled,
    /// Cancel in progress
    PendingCancel,
    /// Cancelled after a partial fill
    PartiallyCanceled,
    /// Cancelled
    Canceled,
    /// Rejected by the matching engine
    Failed,
}

impl OrderState {
    /// Check if the order can still trade.
    pub fn is_open(&self) -> bool {
        matches!(self, OrderState::New | OrderState::PartiallyFilled)
    }
}

/// Poloniex account VIP tier.
///
/// Valid tiers are `VIP0` through `VIP9`. Constructing a tier from an out of
/// range value yields `VIP0` instead of failing, since the tier only ever
/// widens rate limits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "u8")]
pub struct VipLevel(u8);

impl VipLevel {
    /// Lowest tier.
    pub const MIN: VipLevel = VipLevel(0);
    /// Highest tier.
    pub const MAX: VipLevel = VipLevel(9);

    /// Create a tier, normalizing out of range values to `VIP0`.
    pub fn new(level: i64) -> Self {
        match u8::try_from(level) {
            Ok(level) if level <= Self::MAX.0 => VipLevel(level),
            _ => Self::MIN,
        }
    }

    /// Numeric tier (0-9).
    pub fn level(&self) -> u8 {
        self.0
    }

    /// Iterate over every tier from lowest to highest.
    pub fn all() -> impl Iterator<Item = VipLevel> {
        (Self::MIN.0..=Self::MAX.0).map(VipLevel)
    }
}

impl From<i64> for VipLevel {
    fn from(level: i64) -> Self {
        VipLevel::new(level)
    }
}

impl From<VipLevel> for u8 {
    fn from(level: VipLevel) -> u8 {
        level.0
    }
}

impl std::fmt::Display for VipLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "VIP{}", self.0)
    }
}

/// Group of API routes sharing one throttling policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndpointCategory {
    /// Order placement, cancellation and queries, plus position changes
    Orders,
    /// Balances and other account data
    Account,
    /// Public market data (also the fallback for unknown routes)
    Market,
}

impl EndpointCategory {
    /// All known categories.
    pub const ALL: [EndpointCategory; 3] = [
        EndpointCategory::Orders,
        EndpointCategory::Account,
        EndpointCategory::Market,
    ];

    /// Path fragments that mark an order endpoint.
    const ORDER_KEYWORDS: &'static [&'static str] = &["orders", "trade/order", "position/leverage"];

    /// Path fragments that mark an account endpoint.
    const ACCOUNT_KEYWORDS: &'static [&'static str] = &["account", "balance", "feeinfo", "wallets"];

    /// Classify a request path.
    ///
    /// Matching is case-insensitive substring containment. Order keywords are
    /// checked before account keywords; anything unmatched is `Market`.
    ///
    /// ```rust
    /// use poloniex_api_client::types::EndpointCategory;
    ///
    /// assert_eq!(EndpointCategory::classify("/orders"), EndpointCategory::Orders);
    /// assert_eq!(EndpointCategory::classify("/accounts/balances"), EndpointCategory::Account);
    /// assert_eq!(EndpointCategory::classify("/unknown/endpoint"), EndpointCategory::Market);
    /// ```
    pub fn classify(path: &str) -> Self {
        let path = path.to_ascii_lowercase();
        if Self::ORDER_KEYWORDS.iter().any(|k| path.contains(k)) {
            EndpointCategory::Orders
        } else if Self::ACCOUNT_KEYWORDS.iter().any(|k| path.contains(k)) {
            EndpointCategory::Account
        } else {
            EndpointCategory::Market
        }
    }

    /// Category name as used in status output.
    pub fn as_str(&self) -> &'static str {
        match self {
            EndpointCategory::Orders => "orders",
            EndpointCategory::Account => "account",
            EndpointCategory::Market => "market",
        }
    }
}

impl From<&str> for EndpointCategory {
    /// Parse a category name. Unknown names fall back to `Market`.
    fn from(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "orders" => EndpointCategory::Orders,
            "account" => EndpointCategory::Account,
            _ => EndpointCategory::Market,
        }
    }
}

impl std::fmt::Display for EndpointCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vip_level_normalizes_out_of_range() {
        assert_eq!(VipLevel::new(5).to_string(), "VIP5");
        assert_eq!(VipLevel::new(9).to_string(), "VIP9");
        assert_eq!(VipLevel::new(10), VipLevel::MIN);
        assert_eq!(VipLevel::new(15), VipLevel::MIN);
        assert_eq!(VipLevel::new(-1), VipLevel::MIN);
        assert_eq!(VipLevel::new(i64::MAX), VipLevel::MIN);
        assert_eq!(VipLevel::default().to_string(), "VIP0");
    }

    #[test]
    fn test_vip_level_serde() {
        let level: VipLevel = serde_json::from_str("3").unwrap();
        assert_eq!(level.level(), 3);
        let level: VipLevel = serde_json::from_str("-4").unwrap();
        assert_eq!(level, VipLevel::MIN);
        assert_eq!(serde_json::to_string(&VipLevel::new(7)).unwrap(), "7");
    }

    #[test]
    fn test_vip_level_all() {
        let levels: Vec<u8> = VipLevel::all().map(|l| l.level()).collect();
        assert_eq!(levels, (0..=9).collect::<Vec<u8>>());
    }

    #[test]
    fn test_classify_paths() {
        assert_eq!(EndpointCategory::classify("/orders"), EndpointCategory::Orders);
        assert_eq!(EndpointCategory::classify("/orders/123"), EndpointCategory::Orders);
        assert_eq!(EndpointCategory::classify("/smartorders"), EndpointCategory::Orders);
        assert_eq!(EndpointCategory::classify("/v3/trade/order"), EndpointCategory::Orders);
        assert_eq!(
            EndpointCategory::classify("/v3/position/leverage"),
            EndpointCategory::Orders
        );
        assert_eq!(
            EndpointCategory::classify("/accounts/balances"),
            EndpointCategory::Account
        );
        assert_eq!(EndpointCategory::classify("/feeinfo"), EndpointCategory::Account);
        assert_eq!(
            EndpointCategory::classify("/markets/BTC_USDT/ticker24h"),
            EndpointCategory::Market
        );
        assert_eq!(
            EndpointCategory::classify("/markets/BTC_USDT/orderBook"),
            EndpointCategory::Market
        );
        assert_eq!(EndpointCategory::classify("/unknown/endpoint"), EndpointCategory::Market);
        assert_eq!(EndpointCategory::classify(""), EndpointCategory::Market);
    }

    #[test]
    fn test_classify_is_case_insensitive() {
        assert_eq!(EndpointCategory::classify("/ORDERS"), EndpointCategory::Orders);
        assert_eq!(
            EndpointCategory::classify("/Accounts/Balances"),
            EndpointCategory::Account
        );
    }

    #[test]
    fn test_category_from_name() {
        assert_eq!(EndpointCategory::from("orders"), EndpointCategory::Orders);
        assert_eq!(EndpointCategory::from("account"), EndpointCategory::Account);
        assert_eq!(EndpointCategory::from("market"), EndpointCategory::Market);
        assert_eq!(EndpointCategory::from("futures"), EndpointCategory::Market);
    }

    #[test]
    fn test_order_state_is_open() {
        assert!(OrderState::New.is_open());
        assert!(OrderState::PartiallyFilled.is_open());
        assert!(!OrderState::Filled.is_open());
        assert!(!OrderState::Canceled.is_open());
    }
}
