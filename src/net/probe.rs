//! Prober contract shared by the ICMP and TCP implementations.

use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::{ProbeConfig, ProbeMethod};
use crate::net::icmp::IcmpProber;
use crate::net::tcp::TcpProber;

/// Timeout and retry policy for a single probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbePolicy {
    /// Per-attempt timeout.
    pub timeout: Duration,
    /// Attempts before giving up.
    pub attempts: u32,
}

impl Default for ProbePolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(1000),
            attempts: 3,
        }
    }
}

impl From<&ProbeConfig> for ProbePolicy {
    fn from(config: &ProbeConfig) -> Self {
        Self {
            timeout: Duration::from_millis(config.timeout_ms),
            attempts: config.attempts.max(1),
        }
    }
}

/// Errors raised by a probe.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProbeError {
    /// Every attempt timed out.
    #[error("no reply after {attempts} attempt(s)")]
    Timeout { attempts: u32 },

    /// The network reported the host or port unreachable.
    #[error("unreachable: {0}")]
    Unreachable(String),

    /// A reply arrived but could not be used.
    #[error("malformed reply: {0}")]
    Malformed(String),

    /// The prober reported a latency that is negative or NaN.
    #[error("invalid latency {0} ms")]
    InvalidLatency(f64),

    /// The shared probe session could not be opened or failed mid-probe.
    #[error("probe session unavailable: {0}")]
    Session(String),
}

/// Performs one reachability check against a resolved address.
///
/// Returns the round-trip latency in milliseconds.
#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, addr: IpAddr, policy: &ProbePolicy) -> Result<f64, ProbeError>;
}

/// Reject latencies no real round trip can produce.
pub fn check_latency(latency_ms: f64) -> Result<f64, ProbeError> {
    if latency_ms.is_nan() || latency_ms < 0.0 {
        Err(ProbeError::InvalidLatency(latency_ms))
    } else {
        Ok(latency_ms)
    }
}

/// Build the prober selected by configuration.
pub fn build_prober(config: &ProbeConfig) -> Arc<dyn Prober> {
    match config.method {
        ProbeMethod::Icmp => Arc::new(IcmpProber::new(config.packet_size)),
        ProbeMethod::Tcp => Arc::new(TcpProber::new(config.tcp_port)),
    }
}
