//! Observability subsystem: structured logging and metrics exposition.
//!
//! Logging is initialized once at startup from the configured level, with
//! `RUST_LOG` taking precedence when set. Metrics are recorded from the
//! data path and exposed on a separate Prometheus listener when enabled.

pub mod logging;
pub mod metrics;
