//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout, pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured fields (identifier, seq, latency_ms) on every monitor event
//! - Transitions log at info/warn, individual probe failures at debug
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;
