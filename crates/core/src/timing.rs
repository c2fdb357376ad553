//! Timestamps and latency measurement
//!
//! Binance signed requests carry a millisecond `timestamp`; latency to the
//! exchange is worth logging on every round trip.

use std::time::{SystemTime, UNIX_EPOCH};

/// Nanoseconds since the Unix epoch
#[inline]
pub fn nanos() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos() as u64
}

/// Milliseconds since the Unix epoch, as used in signed request timestamps
#[inline]
pub fn millis() -> u64 {
    nanos() / 1_000_000
}

/// Scoped latency timer that logs on drop
pub struct PerfTimer {
    start: u64,
    name: String,
}

impl PerfTimer {
    pub fn start(name: impl Into<String>) -> Self {
        Self {
            start: nanos(),
            name: name.into(),
        }
    }

    pub fn elapsed_nanos(&self) -> u64 {
        nanos().saturating_sub(self.start)
    }

    pub fn elapsed_micros(&self) -> u64 {
        self.elapsed_nanos() / 1_000
    }

    pub fn log_elapsed(&self) {
        let micros = self.elapsed_micros();
        if micros < 1000 {
            tracing::debug!("⏱️  {} took {}μs", self.name, micros);
        } else {
            tracing::debug!("⏱️  {} took {:.3}ms", self.name, micros as f64 / 1000.0);
        }
    }
}

impl Drop for PerfTimer {
    fn drop(&mut self) {
        self.log_elapsed();
    }
}
