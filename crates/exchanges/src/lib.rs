//! # Binance USDⓈ-M Futures client
//!
//! A thin REST client for the `/fapi` endpoints. The interesting part is
//! the order construction layer: [`order::OrderIntent`] validates an
//! order request against the per-type field compatibility rules locally,
//! so a malformed order never reaches the wire.
//!
//! ## Architecture
//!
//! - **monoio-based HTTP client** - Single-threaded async, rustls TLS
//! - **Local order validation** - Field compatibility checked before I/O
//! - **Decimal arithmetic** - Exact prices and quantities throughout
//! - **Precision timing** - Per-request latency tracking

pub mod binance;
pub mod errors;
pub mod http;
pub mod order;
pub mod types;

// Re-export main types
pub use binance::{FuturesConfig, FuturesRestClient, OrderRef};
pub use errors::{ClientError, OrderError, Result};
pub use http::HttpsClient;
pub use order::{OrderFields, OrderIntent};
pub use types::*;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::binance::{FuturesConfig, FuturesRestClient, OrderRef};
    pub use crate::errors::{ClientError, OrderError, Result};
    pub use crate::http::HttpsClient;
    pub use crate::order::{OrderFields, OrderIntent};
    pub use crate::types::*;
    pub use fapi_core::prelude::*;
}
