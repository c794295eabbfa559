//! Poloniex REST API client implementation.

use std::sync::Arc;

use reqwest::Method;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue, RETRY_AFTER, USER_AGENT};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{
    DefaultRetryableStrategy, RetryTransientMiddleware, Retryable, RetryableStrategy,
    policies::ExponentialBackoff,
};
use reqwest_tracing::TracingMiddleware;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::auth::{CredentialsProvider, SystemTimestamp, TimestampProvider, sign_request};
use crate::error::{ApiError, PoloniexError};
use crate::rest::endpoints::POLONIEX_BASE_URL;

/// The Poloniex REST API client.
///
/// Handles request signing and transient-failure retries. It does not rate
/// limit on its own; wrap it in a
/// [`RateLimitedClient`](crate::rate_limit::RateLimitedClient) for that.
///
/// # Example
///
/// ```rust,no_run
/// use poloniex_api_client::rest::PoloniexRestClient;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = PoloniexRestClient::new();
///     let markets = client.get_markets().await?;
///     println!("{} markets", markets.len());
///     Ok(())
/// }
/// ```
///
/// For private endpoints, provide credentials:
///
/// ```rust,no_run
/// use poloniex_api_client::auth::Credentials;
/// use poloniex_api_client::rest::PoloniexRestClient;
/// use std::sync::Arc;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = PoloniexRestClient::builder()
///         .credentials(Arc::new(Credentials::from_env()?))
///         .build();
///
///     let accounts = client.get_account_balances().await?;
///     println!("{accounts:?}");
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct PoloniexRestClient {
    http_client: ClientWithMiddleware,
    base_url: String,
    credentials: Option<Arc<dyn CredentialsProvider>>,
    timestamp_provider: Arc<dyn TimestampProvider>,
}

impl PoloniexRestClient {
    /// Create a client for public endpoints with default settings.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Create a new client builder.
    pub fn builder() -> PoloniexRestClientBuilder {
        PoloniexRestClientBuilder::new()
    }

    /// Whether credentials are configured.
    pub fn has_credentials(&self) -> bool {
        self.credentials.is_some()
    }

    /// Make a public GET request.
    pub(crate) async fn public_get<T>(&self, endpoint: &str) -> Result<T, PoloniexError>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, endpoint);
        let response = self.http_client.get(&url).send().await?;
        self.parse_response(response).await
    }

    /// Make a public GET request with query parameters.
    pub(crate) async fn public_get_with_params<T, Q>(
        &self,
        endpoint: &str,
        params: &Q,
    ) -> Result<T, PoloniexError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let query = query_pairs(params)?;
        let url = self.url_with_query(endpoint, &query)?;
        let response = self.http_client.get(&url).send().await?;
        self.parse_response(response).await
    }

    /// Make a signed GET request.
    pub(crate) async fn private_get<T, Q>(
        &self,
        endpoint: &str,
        params: Option<&Q>,
    ) -> Result<T, PoloniexError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let query = match params {
            Some(params) => query_pairs(params)?,
            None => Vec::new(),
        };
        self.signed_request(Method::GET, endpoint, &query, None).await
    }

    /// Make a signed POST request with a JSON body.
    pub(crate) async fn private_post<T, B>(&self, endpoint: &str, body: &B) -> Result<T, PoloniexError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = serde_json::to_string(body)?;
        self.signed_request(Method::POST, endpoint, &[], Some(body)).await
    }

    /// Make a signed DELETE request without a body.
    pub(crate) async fn private_delete<T>(&self, endpoint: &str) -> Result<T, PoloniexError>
    where
        T: DeserializeOwned,
    {
        self.signed_request(Method::DELETE, endpoint, &[], None).await
    }

    async fn signed_request<T>(
        &self,
        method: Method,
        endpoint: &str,
        query: &[(String, String)],
        body: Option<String>,
    ) -> Result<T, PoloniexError>
    where
        T: DeserializeOwned,
    {
        let credentials = self
            .credentials
            .as_ref()
            .ok_or(PoloniexError::MissingCredentials)?;

        let signed = sign_request(
            credentials.credentials(),
            method.as_str(),
            endpoint,
            query,
            body.as_deref(),
            self.timestamp_provider.timestamp_millis(),
        )?;

        let url = self.url_with_query(endpoint, query)?;
        let mut request = self.http_client.request(method, &url);
        for (name, value) in signed.to_pairs() {
            request = request.header(name, value);
        }
        if let Some(body) = body {
            request = request.header(CONTENT_TYPE, "application/json").body(body);
        }

        let response = request.send().await?;
        self.parse_response(response).await
    }

    fn url_with_query(
        &self,
        endpoint: &str,
        query: &[(String, String)],
    ) -> Result<String, PoloniexError> {
        if query.is_empty() {
            return Ok(format!("{}{}", self.base_url, endpoint));
        }
        let query_string = serde_urlencoded::to_string(query)
            .map_err(|e| PoloniexError::InvalidResponse(e.to_string()))?;
        Ok(format!("{}{}?{}", self.base_url, endpoint, query_string))
    }

    /// Parse a response from the Poloniex API.
    async fn parse_response<T>(&self, response: reqwest::Response) -> Result<T, PoloniexError>
    where
        T: DeserializeOwned,
    {
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after_ms = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.trim().parse::<u64>().ok())
                .map(|secs| secs.saturating_mul(1000));
            tracing::warn!(?retry_after_ms, "Poloniex rate limit hit");
            return Err(PoloniexError::RateLimitExceeded { retry_after_ms });
        }

        let body = response.text().await?;

        if !status.is_success() {
            return Err(match serde_json::from_str::<ApiError>(&body) {
                Ok(api_error) if api_error.is_rate_limit() => PoloniexError::RateLimitExceeded {
                    retry_after_ms: None,
                },
                Ok(api_error) => PoloniexError::Api(api_error),
                Err(_) => PoloniexError::InvalidResponse(format!("HTTP {}: {}", status, body)),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            PoloniexError::InvalidResponse(format!("Failed to parse response: {}. Body: {}", e, body))
        })
    }
}

/// Retry policy for the middleware stack.
///
/// Same as the default, except that `429 Too Many Requests` is never re-sent:
/// the response goes back to the caller so a rate limiter in front of this
/// client can back off. Each re-send would be a request nobody paid a token
/// for.
struct RateLimitAwareStrategy;

impl RetryableStrategy for RateLimitAwareStrategy {
    fn handle(
        &self,
        res: &Result<reqwest::Response, reqwest_middleware::Error>,
    ) -> Option<Retryable> {
        match res {
            Ok(response) if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS => {
                Some(Retryable::Fatal)
            }
            _ => DefaultRetryableStrategy.handle(res),
        }
    }
}

/// Flatten a serializable request into query pairs.
fn query_pairs<Q>(params: &Q) -> Result<Vec<(String, String)>, PoloniexError>
where
    Q: Serialize + ?Sized,
{
    let encoded = serde_urlencoded::to_string(params)
        .map_err(|e| PoloniexError::InvalidResponse(e.to_string()))?;
    serde_urlencoded::from_str(&encoded).map_err(|e| PoloniexError::InvalidResponse(e.to_string()))
}

impl Default for PoloniexRestClient {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PoloniexRestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PoloniexRestClient")
            .field("base_url", &self.base_url)
            .field("has_credentials", &self.credentials.is_some())
            .finish()
    }
}

/// Builder for [`PoloniexRestClient`].
pub struct PoloniexRestClientBuilder {
    base_url: String,
    credentials: Option<Arc<dyn CredentialsProvider>>,
    timestamp_provider: Option<Arc<dyn TimestampProvider>>,
    user_agent: Option<String>,
    max_retries: u32,
}

impl PoloniexRestClientBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            base_url: POLONIEX_BASE_URL.to_string(),
            credentials: None,
            timestamp_provider: None,
            user_agent: None,
            max_retries: 3,
        }
    }

    /// Set the base URL (useful for testing with a mock server).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the credentials provider for signed requests.
    pub fn credentials(mut self, credentials: Arc<dyn CredentialsProvider>) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Set a custom `signTimestamp` source.
    pub fn timestamp_provider(mut self, provider: Arc<dyn TimestampProvider>) -> Self {
        self.timestamp_provider = Some(provider);
        self
    }

    /// Set a custom user agent.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Set the maximum number of retries for transient failures.
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Build the client.
    pub fn build(self) -> PoloniexRestClient {
        let mut headers = HeaderMap::new();
        let user_agent = self
            .user_agent
            .unwrap_or_else(|| format!("poloniex-api-client/{}", env!("CARGO_PKG_VERSION")));
        let header_value = HeaderValue::from_str(&user_agent)
            .unwrap_or_else(|_| HeaderValue::from_static("poloniex-api-client"));
        headers.insert(USER_AGENT, header_value);

        let reqwest_client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(self.max_retries);

        let client = ClientBuilder::new(reqwest_client)
            .with(TracingMiddleware::default())
            .with(RetryTransientMiddleware::new_with_policy_and_strategy(
                retry_policy,
                RateLimitAwareStrategy,
            ))
            .build();

        PoloniexRestClient {
            http_client: client,
            base_url: self.base_url,
            credentials: self.credentials,
            timestamp_provider: self
                .timestamp_provider
                .unwrap_or_else(|| Arc::new(SystemTimestamp::new())),
        }
    }
}

impl Default for PoloniexRestClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
