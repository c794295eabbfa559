//! Category x VIP tier capacity table.
//!
//! The table is plain data so an exchange-published rate table can be loaded
//! from JSON without touching the gating logic:
//!
//! ```rust
//! use poloniex_api_client::rate_limit::RateLimitTable;
//! use poloniex_api_client::types::{EndpointCategory, VipLevel};
//!
//! let table: RateLimitTable = serde_json::from_str(
//!     r#"{"orders": [10, 20], "account": [5, 5], "market": 100}"#,
//! ).unwrap();
//! table.validate().unwrap();
//!
//! assert_eq!(table.limit(EndpointCategory::Orders, VipLevel::new(1)), 20);
//! // Tiers past the end of a row use the last entry.
//! assert_eq!(table.limit(EndpointCategory::Orders, VipLevel::new(7)), 20);
//! assert_eq!(table.limit(EndpointCategory::Market, VipLevel::new(7)), 100);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::PoloniexError;
use crate::rate_limit::limits;
use crate::types::{EndpointCategory, VipLevel};

/// Bucket capacities per endpoint category and VIP tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitTable {
    /// Order endpoint capacity, indexed by VIP level
    pub orders: Vec<u32>,
    /// Account endpoint capacity, indexed by VIP level
    pub account: Vec<u32>,
    /// Market data capacity, identical for every tier
    pub market: u32,
}

impl RateLimitTable {
    /// Capacity for a category at a tier.
    ///
    /// A tier beyond the end of a row uses the row's last entry. An empty row
    /// falls back to the market capacity.
    pub fn limit(&self, category: EndpointCategory, vip_level: VipLevel) -> u32 {
        let row = match category {
            EndpointCategory::Orders => &self.orders,
            EndpointCategory::Account => &self.account,
            EndpointCategory::Market => return self.market,
        };
        row.get(vip_level.level() as usize)
            .or_else(|| row.last())
            .copied()
            .unwrap_or(self.market)
    }

    /// Check that every capacity is positive and tiered rows never shrink.
    pub fn validate(&self) -> Result<(), PoloniexError> {
        if self.market == 0 {
            return Err(PoloniexError::InvalidConfig(
                "market capacity must be positive".to_string(),
            ));
        }

        for (name, row) in [("orders", &self.orders), ("account", &self.account)] {
            if row.len() > VipLevel::MAX.level() as usize + 1 {
                return Err(PoloniexError::InvalidConfig(format!(
                    "{name} row has {} entries, at most {} tiers exist",
                    row.len(),
                    VipLevel::MAX.level() as usize + 1
                )));
            }
            if row.contains(&0) {
                return Err(PoloniexError::InvalidConfig(format!(
                    "{name} capacities must be positive"
                )));
            }
            if row.windows(2).any(|pair| pair[1] < pair[0]) {
                return Err(PoloniexError::InvalidConfig(format!(
                    "{name} capacities must not decrease with VIP level"
                )));
            }
        }

        Ok(())
    }
}

impl Default for RateLimitTable {
    /// Poloniex spot limits in requests per second.
    fn default() -> Self {
        Self {
            orders: limits::orders::PER_TIER.to_vec(),
            account: limits::account::PER_TIER.to_vec(),
            market: limits::market::FLAT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_values() {
        let table = RateLimitTable::default();
        assert!(table.validate().is_ok());

        let vip0 = VipLevel::new(0);
        assert_eq!(table.limit(EndpointCategory::Orders, vip0), 50);
        assert_eq!(table.limit(EndpointCategory::Account, vip0), 50);
        assert_eq!(table.limit(EndpointCategory::Market, vip0), 200);
        assert_eq!(table.limit(EndpointCategory::Orders, VipLevel::new(5)), 150);
    }

    #[test]
    fn test_default_table_is_monotonic() {
        let table = RateLimitTable::default();
        let tiers: Vec<VipLevel> = VipLevel::all().collect();

        for pair in tiers.windows(2) {
            for category in [EndpointCategory::Orders, EndpointCategory::Account] {
                assert!(table.limit(category, pair[1]) >= table.limit(category, pair[0]));
            }
            assert_eq!(
                table.limit(EndpointCategory::Market, pair[0]),
                table.limit(EndpointCategory::Market, pair[1])
            );
        }
    }

    #[test]
    fn test_missing_entries_fall_back() {
        let table = RateLimitTable {
            orders: vec![10, 20],
            account: vec![],
            market: 99,
        };
        assert_eq!(table.limit(EndpointCategory::Orders, VipLevel::new(9)), 20);
        assert_eq!(table.limit(EndpointCategory::Account, VipLevel::new(3)), 99);
    }

    #[test]
    fn test_validate_rejects_bad_tables() {
        let shrinking = RateLimitTable {
            orders: vec![50, 40],
            ..RateLimitTable::default()
        };
        assert!(matches!(
            shrinking.validate(),
            Err(PoloniexError::InvalidConfig(_))
        ));

        let zero = RateLimitTable {
            account: vec![0, 10],
            ..RateLimitTable::default()
        };
        assert!(zero.validate().is_err());

        let no_market = RateLimitTable {
            market: 0,
            ..RateLimitTable::default()
        };
        assert!(no_market.validate().is_err());

        let too_long = RateLimitTable {
            orders: vec![1; 11],
            ..RateLimitTable::default()
        };
        assert!(too_long.validate().is_err());
    }

    #[test]
    fn test_table_json_round_trip() {
        let json = serde_json::to_value(RateLimitTable::default()).unwrap();
        assert_eq!(json["market"], 200);
        assert_eq!(json["orders"][5], 150);
    }
}
