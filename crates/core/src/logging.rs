//! Unified logging setup
//!
//! One tracing subscriber for every binary in the workspace. Level selection
//! comes from `RUST_LOG`, falling back to `info`.

use std::sync::Once;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

static INIT: Once = Once::new();

/// Initialize the global tracing subscriber. Safe to call more than once.
pub fn init_logging() {
    INIT.call_once(|| {
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_target(false)
            .finish();

        tracing::subscriber::set_global_default(subscriber)
            .expect("Failed to set tracing subscriber");
    });
}

/// Log a completed trade in a uniform format
#[macro_export]
macro_rules! log_trade {
    ($side:expr, $symbol:expr, $quantity:expr, $price:expr) => {
        tracing::info!("💰 TRADE: {} {} {} @ {}", $side, $symbol, $quantity, $price);
    };
}

/// Log an order lifecycle event in a uniform format
#[macro_export]
macro_rules! log_order {
    ($action:expr, $order_id:expr, $symbol:expr) => {
        tracing::info!("📋 ORDER {}: {} ({})", $action, $order_id, $symbol);
    };
}
