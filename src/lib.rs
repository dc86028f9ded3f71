//! Network reachability monitor library.
//!
//! Probes a configured set of targets (ICMP echo or TCP connect), keeps a
//! debounced up/down status per target and an optional "all targets up"
//! aggregate, and exposes both to a host process.

pub mod api;
pub mod config;
pub mod health;
pub mod lifecycle;
pub mod net;
pub mod observability;

pub use config::schema::PingyConfig;
pub use health::{AggregateMonitor, MonitorRegistry, StatusBoard, StatusEvent, TargetMonitor};
pub use lifecycle::Shutdown;
