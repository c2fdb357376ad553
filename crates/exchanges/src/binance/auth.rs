//! Request authentication for the futures API
//!
//! Signed endpoints take an HMAC-SHA256 signature over the url-encoded
//! query string (including `timestamp` and `recvWindow`) plus the
//! `X-MBX-APIKEY` header.

use crate::errors::{ClientError, Result};
use fapi_core::millis;

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// API key pair
#[derive(Debug, Clone)]
pub struct Credentials {
    pub api_key: String,
    pub secret_key: String,
}

impl Credentials {
    pub fn new(api_key: String, secret_key: String) -> Self {
        Self {
            api_key,
            secret_key,
        }
    }

    /// Load from `BINANCE_API_KEY` / `BINANCE_SECRET_KEY`
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("BINANCE_API_KEY")
            .map_err(|_| ClientError::MissingCredentials("BINANCE_API_KEY".to_string()))?;
        let secret_key = std::env::var("BINANCE_SECRET_KEY")
            .map_err(|_| ClientError::MissingCredentials("BINANCE_SECRET_KEY".to_string()))?;
        Ok(Self::new(api_key, secret_key))
    }

    pub fn is_valid(&self) -> bool {
        !self.api_key.is_empty() && !self.secret_key.is_empty()
    }
}

/// Signs futures API requests
pub struct RequestSigner {
    credentials: Credentials,
}

impl RequestSigner {
    pub fn new(credentials: Credentials) -> Result<Self> {
        if !credentials.is_valid() {
            return Err(ClientError::InvalidCredentials);
        }
        Ok(Self { credentials })
    }

    pub fn api_key(&self) -> &str {
        &self.credentials.api_key
    }

    /// HMAC-SHA256 over `payload`, hex encoded
    pub fn sign(&self, payload: &str) -> Result<String> {
        let mut mac = HmacSha256::new_from_slice(self.credentials.secret_key.as_bytes())
            .map_err(|e| ClientError::Signing(format!("HMAC setup failed: {e}")))?;
        mac.update(payload.as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    /// Append `timestamp`, `recvWindow` and `signature` to the given
    /// parameters, returning the final query string to send
    pub fn signed_query(
        &self,
        params: &[(&'static str, String)],
        recv_window: u64,
    ) -> Result<String> {
        let mut all: Vec<(&'static str, String)> = params.to_vec();
        all.push(("timestamp", millis().to_string()));
        all.push(("recvWindow", recv_window.to_string()));

        let query = build_query_string(&all);
        let signature = self.sign(&query)?;
        Ok(format!("{query}&signature={signature}"))
    }
}

/// Url-encoded `k=v` pairs joined with `&`, sorted by key so the signed
/// string is deterministic
pub fn build_query_string(params: &[(&'static str, String)]) -> String {
    let mut pairs: Vec<_> = params.iter().collect();
    pairs.sort_by_key(|(k, _)| *k);

    pairs
        .into_iter()
        .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}
