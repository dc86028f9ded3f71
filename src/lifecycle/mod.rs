//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Config loaded → Metrics → Resolver/Prober → Registry → API → Supervisor
//!
//! Supervision (supervisor.rs):
//!     Config update → Registry reconcile → StatusBoard refreshed
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Broadcast → Stop monitors, stop API → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//!     SIGHUP → Trigger config reload
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then monitors, then the API
//! - Shutdown stops timers; in-flight probes are left to finish and discarded

pub mod shutdown;
pub mod signals;
pub mod startup;
pub mod supervisor;

pub use shutdown::Shutdown;
pub use supervisor::Supervisor;
