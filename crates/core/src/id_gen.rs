//! Client order ID generation
//!
//! Binance accepts an optional `newClientOrderId` of up to 36 characters.
//! IDs generated here are unique per process run and carry a timestamp so
//! they sort roughly by creation time in order history.

use nanoid::nanoid;
use std::time::{SystemTime, UNIX_EPOCH};

/// Generate a short unique ID
pub fn generate_id() -> String {
    nanoid!(12)
}

/// Generate an ID with a prefix and millisecond timestamp
pub fn generate_id_with_prefix(prefix: &str) -> String {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    let short_id = nanoid!(8);
    format!("{prefix}-{timestamp}-{short_id}")
}

/// Generate a client order ID within Binance's 36-character limit
pub fn client_order_id() -> String {
    generate_id_with_prefix("FAP")
        .replace('-', "")
        .chars()
        .take(36)
        .collect()
}
