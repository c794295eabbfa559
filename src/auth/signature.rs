//! HMAC-SHA256 request signing for Poloniex private endpoints.
//!
//! The signed payload is three lines:
//! ```text
//! METHOD
//! /path
//! params
//! ```
//! where `params` is the query string with `signTimestamp` added, sorted by
//! key and url-encoded, or `requestBody=<json>&signTimestamp=<ts>` when the
//! request has a JSON body. The base64 HMAC-SHA256 of the payload, keyed with
//! the raw API secret, goes in the `signature` header.

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::auth::Credentials;
use crate::error::PoloniexError;

type HmacSha256 = Hmac<Sha256>;

/// Signature scheme identifiers sent with every signed request.
const SIGNATURE_METHOD: &str = "hmacSHA256";
const SIGNATURE_VERSION: &str = "2";

/// Authentication headers for one signed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedHeaders {
    /// API key
    pub key: String,
    /// Base64 HMAC-SHA256 signature
    pub signature: String,
    /// `signTimestamp` used in the payload
    pub timestamp: u64,
}

impl SignedHeaders {
    /// Header name/value pairs to attach to the request.
    pub fn to_pairs(&self) -> [(&'static str, String); 5] {
        [
            ("key", self.key.clone()),
            ("signatureMethod", SIGNATURE_METHOD.to_string()),
            ("signatureVersion", SIGNATURE_VERSION.to_string()),
            ("signTimestamp", self.timestamp.to_string()),
            ("signature", self.signature.clone()),
        ]
    }
}

/// Build the string that gets signed.
///
/// ```rust
/// use poloniex_api_client::auth::signature_payload;
///
/// let query = [("symbol".to_string(), "ETH_USDT".to_string()), ("limit".to_string(), "5".to_string())];
/// let payload = signature_payload("GET", "/orders", &query, None, 1659259836247).unwrap();
/// assert_eq!(payload, "GET\n/orders\nlimit=5&signTimestamp=1659259836247&symbol=ETH_USDT");
/// ```
pub fn signature_payload(
    method: &str,
    path: &str,
    query: &[(String, String)],
    body: Option<&str>,
    timestamp: u64,
) -> Result<String, PoloniexError> {
    let params = match body {
        Some(body) => format!("requestBody={body}&signTimestamp={timestamp}"),
        None => {
            let timestamp = timestamp.to_string();
            let mut pairs: Vec<(&str, &str)> = query
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str()))
                .chain(std::iter::once(("signTimestamp", timestamp.as_str())))
                .collect();
            pairs.sort_by(|a, b| a.0.cmp(b.0));
            serde_urlencoded::to_string(&pairs)
                .map_err(|e| PoloniexError::Auth(format!("Failed to encode query: {e}")))?
        }
    };

    Ok(format!("{}\n{}\n{}", method.to_ascii_uppercase(), path, params))
}

/// Sign a request for Poloniex's private API.
///
/// # Arguments
///
/// * `credentials` - API key and secret
/// * `method` - HTTP method (`GET`, `POST`, `DELETE`)
/// * `path` - Endpoint path without host or query (e.g. `/orders`)
/// * `query` - Query parameters, in any order
/// * `body` - Serialized JSON body, if any
/// * `timestamp` - `signTimestamp` in milliseconds
pub fn sign_request(
    credentials: &Credentials,
    method: &str,
    path: &str,
    query: &[(String, String)],
    body: Option<&str>,
    timestamp: u64,
) -> Result<SignedHeaders, PoloniexError> {
    if credentials.expose_secret().is_empty() {
        return Err(PoloniexError::Auth("API secret is empty".to_string()));
    }

    let payload = signature_payload(method, path, query, body, timestamp)?;

    let mut mac = HmacSha256::new_from_slice(credentials.expose_secret().as_bytes())
        .map_err(|e| PoloniexError::Auth(format!("Invalid HMAC key: {e}")))?;
    mac.update(payload.as_bytes());
    let signature = BASE64.encode(mac.finalize().into_bytes());

    Ok(SignedHeaders {
        key: credentials.api_key().to_string(),
        signature,
        timestamp,
    })
}
