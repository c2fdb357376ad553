//! Error types for the futures client
//!
//! Two layers: [`OrderError`] covers everything the order builder can reject
//! locally, before any network I/O; [`ClientError`] covers transport,
//! signing, and exchange-side failures. A validation failure always names
//! the offending field so callers can present it without re-deriving the
//! compatibility rules.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::types::OrderType;

/// Result type for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Local order validation errors, raised before any network call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OrderError {
    #[error("invalid symbol: {0:?}")]
    InvalidSymbol(String),

    #[error("invalid {field}: {value:?} (expected one of: {allowed})")]
    InvalidEnum {
        field: &'static str,
        value: String,
        allowed: &'static str,
    },

    #[error("{order_type} order is missing required field {field}")]
    MissingField {
        order_type: OrderType,
        field: &'static str,
    },

    #[error("{order_type} order does not accept field {field}")]
    UnexpectedField {
        order_type: OrderType,
        field: &'static str,
    },

    #[error("conflicting fields: {0} and {1} are mutually exclusive")]
    ConflictingFields(&'static str, &'static str),

    #[error("{field} {value} is not a multiple of {step}")]
    Precision {
        field: &'static str,
        value: Decimal,
        step: Decimal,
    },

    #[error("{field} {value} is below the minimum {min}")]
    BelowMinimum {
        field: &'static str,
        value: Decimal,
        min: Decimal,
    },
}

/// Transport and exchange-side errors
#[derive(Error, Debug, Clone)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP error {0}: {1}")]
    Http(u16, String),

    /// Structured rejection from the exchange, e.g. code -1121 "Invalid symbol"
    #[error("Exchange error {code}: {msg}")]
    Api { code: i64, msg: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Signing error: {0}")]
    Signing(String),

    #[error(transparent)]
    Order(#[from] OrderError),
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidUrl(err.to_string())
    }
}
