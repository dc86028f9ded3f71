//! Network collaborators of the monitors.
//!
//! # Data Flow
//! ```text
//! Target identifier
//!     → resolver.rs (literal IP, or DNS lookup via hickory)
//!     → IpAddr
//!     → probe.rs contract, implemented by:
//!         - icmp.rs (echo request over the shared PingSession)
//!         - tcp.rs (connect handshake to a fixed port)
//!     → latency in ms, or ProbeError
//! ```
//!
//! # Design Decisions
//! - Resolver and Prober are traits so monitors can be driven by scripted fakes
//! - Every attempt has a deadline; attempts are bounded by ProbePolicy
//! - Errors are values; monitors degrade to Unreachable instead of failing

pub mod icmp;
pub mod probe;
pub mod resolver;
pub mod tcp;

pub use probe::{build_prober, check_latency, ProbeError, ProbePolicy, Prober};
pub use resolver::{DnsResolver, ResolutionError, Resolver};
