//! API key and secret handling.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::error::PoloniexError;

/// Environment variable holding the API key.
pub const API_KEY_VAR: &str = "POLONIEX_API_KEY";
/// Environment variable holding the API secret.
pub const API_SECRET_VAR: &str = "POLONIEX_API_SECRET";

/// Poloniex API key pair.
///
/// The secret is used as-is as the HMAC key; unlike some exchanges it is not
/// base64 encoded. It can be deserialized from `{"apiKey": .., "apiSecret": ..}`.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    api_key: String,
    api_secret: SecretString,
}

impl Credentials {
    /// Create credentials from an API key and secret.
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: SecretString::from(api_secret.into()),
        }
    }

    /// Read `POLONIEX_API_KEY` and `POLONIEX_API_SECRET`.
    pub fn from_env() -> Result<Self, PoloniexError> {
        Self::from_env_vars(API_KEY_VAR, API_SECRET_VAR)
    }

    /// Read credentials from custom environment variable names.
    ///
    /// Unset or empty variables yield [`PoloniexError::MissingCredentials`].
    pub fn from_env_vars(key_var: &str, secret_var: &str) -> Result<Self, PoloniexError> {
        let read = |var: &str| {
            std::env::var(var)
                .ok()
                .filter(|value| !value.trim().is_empty())
                .ok_or(PoloniexError::MissingCredentials)
        };
        Ok(Self::new(read(key_var)?, read(secret_var)?))
    }

    /// The public API key, sent in the `key` header.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// The secret used for signing. Never log this.
    pub fn expose_secret(&self) -> &str {
        self.api_secret.expose_secret()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"[REDACTED]")
            .finish()
    }
}

/// Source of credentials for signed requests.
///
/// Implement this to pull keys from a secrets manager or to rotate them
/// without rebuilding the client.
pub trait CredentialsProvider: Send + Sync {
    /// Credentials to sign the next request with.
    fn credentials(&self) -> &Credentials;
}

impl CredentialsProvider for Credentials {
    fn credentials(&self) -> &Credentials {
        self
    }
}

/// Provider holding a fixed key pair, e.g. loaded from a config file.
#[derive(Debug, Clone)]
pub struct StaticCredentials {
    credentials: Credentials,
}

impl StaticCredentials {
    /// Hold the given key and secret.
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Credentials::new(api_key, api_secret).into()
    }
}

impl From<Credentials> for StaticCredentials {
    fn from(credentials: Credentials) -> Self {
        Self { credentials }
    }
}

impl CredentialsProvider for StaticCredentials {
    fn credentials(&self) -> &Credentials {
        &self.credentials
    }
}

/// Provider backed by environment variables.
///
/// Remembers which variables it read so a rotated key can be picked up with
/// [`reload`](Self::reload).
#[derive(Debug, Clone)]
pub struct EnvCredentials {
    key_var: String,
    secret_var: String,
    credentials: Credentials,
}

impl EnvCredentials {
    /// Read `POLONIEX_API_KEY` and `POLONIEX_API_SECRET`.
    pub fn from_env() -> Result<Self, PoloniexError> {
        Self::from_env_vars(API_KEY_VAR, API_SECRET_VAR)
    }

    /// Read custom environment variables.
    pub fn from_env_vars(key_var: &str, secret_var: &str) -> Result<Self, PoloniexError> {
        Ok(Self {
            key_var: key_var.to_string(),
            secret_var: secret_var.to_string(),
            credentials: Credentials::from_env_vars(key_var, secret_var)?,
        })
    }

    /// Read the variables again. On error the previous key pair is kept.
    pub fn reload(&mut self) -> Result<(), PoloniexError> {
        self.credentials = Credentials::from_env_vars(&self.key_var, &self.secret_var)?;
        Ok(())
    }
}

impl CredentialsProvider for EnvCredentials {
    fn credentials(&self) -> &Credentials {
        &self.credentials
    }
}
