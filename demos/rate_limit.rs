//! Example: Tier-aware rate limiting.
//!
//! Run with: cargo run --example rate_limit

use std::time::{Duration, Instant};

use poloniex_api_client::rate_limit::{RateLimitConfig, RateLimitTable, RateLimitedClient};
use poloniex_api_client::rest::PoloniexRestClient;
use poloniex_api_client::{EndpointCategory, PoloniexError, RateLimiter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Default table, VIP0.
    let limiter = RateLimiter::default();
    for path in ["/orders", "/accounts/balances", "/markets/BTC_USDT/ticker24h", "/unknown/endpoint"] {
        let category = limiter.endpoint_type(path);
        println!("{path:<30} -> {category} ({} req/s)", limiter.rate_limit(category));
    }

    // Tier changes resize buckets that already exist.
    limiter.bucket(EndpointCategory::Orders);
    limiter.set_vip_level(5);
    println!("VIP5 orders capacity: {}", limiter.bucket("orders").max_tokens());
    limiter.set_vip_level(42);
    println!("Out of range tier falls back to {}", limiter.vip_level());

    // A small table makes the waiting visible.
    let table = RateLimitTable {
        orders: vec![5],
        account: vec![5],
        market: 5,
    };
    let small = RateLimiter::new(RateLimitConfig::default().with_table(table))?;
    let start = Instant::now();
    for i in 0..8 {
        small
            .execute("/markets/BTC_USDT/orderBook", || async {
                println!("  call {i} at {:?}", start.elapsed());
                Ok::<_, PoloniexError>(())
            })
            .await?;
    }

    // Wrap a REST client; the limiter can be shared with other clients.
    let client = RateLimitedClient::with_limiter(PoloniexRestClient::new(), limiter.clone());
    client.limiter().drain(EndpointCategory::Account);
    tokio::time::sleep(Duration::from_millis(100)).await;

    println!("{}", serde_json::to_string_pretty(&limiter.status())?);
    println!("{}", serde_json::to_string_pretty(&small.status())?);
    Ok(())
}
