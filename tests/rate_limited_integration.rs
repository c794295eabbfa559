//! End-to-end checks of the rate limiter in front of a mocked exchange.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::json;
use tokio_test::assert_ok;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use poloniex_api_client::auth::{Credentials, FixedTimestamp, StaticCredentials};
use poloniex_api_client::rate_limit::{RateLimitConfig, RateLimitTable, RateLimitedClient};
use poloniex_api_client::rest::{PoloniexClient, PoloniexRestClient};
use poloniex_api_client::{EndpointCategory, PoloniexError, RateLimiter, VipLevel};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn rest_client(server: &MockServer) -> PoloniexRestClient {
    PoloniexRestClient::builder()
        .base_url(server.uri())
        .credentials(Arc::new(StaticCredentials::new("test_key", "test_secret")))
        .timestamp_provider(Arc::new(FixedTimestamp(1_700_000_000_000)))
        .max_retries(0)
        .build()
}

async fn mount_markets(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/markets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_requests_within_capacity_are_not_delayed() {
    init_tracing();
    let server = MockServer::start().await;
    mount_markets(&server).await;

    let client = assert_ok!(RateLimitedClient::new(
        rest_client(&server),
        RateLimitConfig::default()
    ));

    let start = Instant::now();
    for _ in 0..10 {
        assert_ok!(client.get_markets().await);
    }
    assert!(start.elapsed() < Duration::from_secs(1));

    let status = client.limiter().status();
    assert_eq!(status.vip_level, "VIP0");
    assert_eq!(status.buckets["market"].max, 200);
    assert!(status.buckets["market"].available >= 190);
}

#[tokio::test]
async fn test_requests_beyond_capacity_wait_for_refill() {
    init_tracing();
    let server = MockServer::start().await;
    mount_markets(&server).await;

    let table = RateLimitTable {
        orders: vec![4],
        account: vec![4],
        market: 4,
    };
    let client = assert_ok!(RateLimitedClient::new(
        rest_client(&server),
        RateLimitConfig::default().with_table(table)
    ));

    let start = Instant::now();
    for _ in 0..6 {
        assert_ok!(client.get_markets().await);
    }
    // Two calls past the burst at 4 tokens per second.
    assert!(start.elapsed() >= Duration::from_millis(400));
    assert_eq!(server.received_requests().await.map(|r| r.len()), Some(6));
}

#[tokio::test]
async fn test_exchange_429_drains_local_bucket() {
    init_tracing();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/orders"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "1"))
        .mount(&server)
        .await;

    let client = assert_ok!(RateLimitedClient::new(
        rest_client(&server),
        RateLimitConfig::default()
    ));

    let err = client.get_open_orders(None).await.unwrap_err();
    assert!(matches!(
        err,
        PoloniexError::RateLimitExceeded {
            retry_after_ms: Some(1000)
        }
    ));

    let status = client.limiter().status();
    assert_eq!(status.buckets["orders"].available, 0);
    assert_eq!(status.buckets["orders"].max, 50);
}

#[tokio::test]
async fn test_exchange_429_costs_one_request_per_token() {
    init_tracing();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/orders"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    // Default retry settings on the REST client.
    let rest = PoloniexRestClient::builder()
        .base_url(server.uri())
        .credentials(Arc::new(Credentials::new("test_key", "test_secret")))
        .build();
    let client = assert_ok!(RateLimitedClient::new(rest, RateLimitConfig::default()));

    assert!(client.get_open_orders(None).await.unwrap_err().is_rate_limit());

    assert_eq!(server.received_requests().await.map(|r| r.len()), Some(1));
    assert_eq!(client.limiter().status().buckets["orders"].available, 0);
}

#[tokio::test]
async fn test_vip_level_scales_order_capacity() {
    init_tracing();
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/orders/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "orderId": "7",
            "clientOrderId": "",
            "state": "PENDING_CANCEL",
            "code": 200,
            "message": ""
        })))
        .mount(&server)
        .await;

    let limiter = assert_ok!(RateLimiter::new(RateLimitConfig::default().with_vip_level(VipLevel::new(5))));
    let client = RateLimitedClient::with_limiter(rest_client(&server), limiter.clone());

    assert_ok!(client.cancel_order("7").await);

    let status = limiter.status();
    assert_eq!(status.buckets["orders"].max, 150);
    assert_eq!(status.buckets["orders"].available, 149);
}

#[tokio::test]
async fn test_retry_bound_surfaces_rate_limit_error() {
    init_tracing();
    let server = MockServer::start().await;
    mount_markets(&server).await;

    let config = RateLimitConfig::default()
        .with_refill_window(Duration::from_secs(60))
        .with_max_wait_retries(0);
    let client = assert_ok!(RateLimitedClient::new(rest_client(&server), config));

    client.limiter().drain(EndpointCategory::Market);

    let err = client.get_markets().await.unwrap_err();
    assert!(err.is_rate_limit());
    // Nothing reached the exchange.
    assert_eq!(server.received_requests().await.map(|r| r.len()), Some(0));
}
