//! Reachability monitoring subsystem.
//!
//! # Data Flow
//! ```text
//! Target monitors (target.rs):
//!     Periodic timer
//!     → Resolve + probe (net/)
//!     → Debounce via state.rs
//!     → On transition: StatusEvent + notify aggregate
//!
//! Aggregate (aggregate.rs):
//!     Member transition
//!     → Scan member snapshots
//!     → Publish on change
//!
//! Registry (registry.rs):
//!     Configuration applied
//!     → Diff by identifier
//!     → Start/stop monitors, sync aggregate
//!     → Refresh StatusBoard
//! ```
//!
//! # Design Decisions
//! - Each monitor owns its status; nothing else writes it
//! - The aggregate only reads published snapshots
//! - No lock is shared across targets

pub mod aggregate;
pub mod registry;
pub mod state;
pub mod target;

pub use aggregate::AggregateMonitor;
pub use registry::{AggregateAction, MonitorRegistry, ReconcileReport, StatusBoard, StatusSnapshot};
pub use state::{AggregateStatus, Reachability, StatusEvent, TargetStatus, Thresholds};
pub use target::{MonitorSettings, ProbeOutcome, StatusObserver, Target, TargetMonitor};
