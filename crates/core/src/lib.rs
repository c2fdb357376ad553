//! # fapi-core
//!
//! Shared runtime pieces for the fapi Binance USDⓈ-M Futures client:
//!
//! - **Unified logging** - tracing with env-filter configuration
//! - **Precision timing** - millisecond/nanosecond timestamps and latency timers
//! - **ID generation** - nanoid-based client order IDs

pub mod id_gen;
pub mod logging;
pub mod timing;

// Re-export commonly used items
pub use id_gen::{client_order_id, generate_id};
pub use logging::init_logging;
pub use timing::{millis, nanos, PerfTimer};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::id_gen::{client_order_id, generate_id};
    pub use crate::logging::init_logging;
    pub use crate::timing::{millis, nanos, PerfTimer};

    // Common external types
    pub use chrono::{DateTime, Utc};
    pub use serde::{Deserialize, Serialize};
}
