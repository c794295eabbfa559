//! Authentication for Poloniex private endpoints.
//!
//! - Credential handling with the secret kept out of logs
//! - `signTimestamp` generation
//! - HMAC-SHA256 request signing (signature version 2)

mod credentials;
mod signature;
mod timestamp;

pub use credentials::{
    API_KEY_VAR, API_SECRET_VAR, Credentials, CredentialsProvider, EnvCredentials, StaticCredentials,
};
pub use signature::{SignedHeaders, sign_request, signature_payload};
pub use timestamp::{FixedTimestamp, SystemTimestamp, TimestampProvider};
