//! TCP connect probing.

use std::net::{IpAddr, SocketAddr};
use std::time::Instant;

use async_trait::async_trait;
use tokio::net::TcpStream;
use tokio::time;

use crate::net::probe::{ProbeError, ProbePolicy, Prober};

/// Prober measuring TCP handshake time to a fixed port.
#[derive(Debug, Clone)]
pub struct TcpProber {
    port: u16,
}

impl TcpProber {
    pub fn new(port: u16) -> Self {
        Self { port }
    }
}

#[async_trait]
impl Prober for TcpProber {
    async fn probe(&self, addr: IpAddr, policy: &ProbePolicy) -> Result<f64, ProbeError> {
        let socket = SocketAddr::new(addr, self.port);
        let mut last_error = None;

        for attempt in 0..policy.attempts {
            let start = Instant::now();
            match time::timeout(policy.timeout, TcpStream::connect(socket)).await {
                Ok(Ok(_stream)) => return Ok(start.elapsed().as_secs_f64() * 1000.0),
                Ok(Err(e)) => {
                    tracing::trace!(addr = %socket, attempt, error = %e, "TCP connect failed");
                    last_error = Some(ProbeError::Unreachable(e.to_string()));
                }
                Err(_) => {
                    tracing::trace!(addr = %socket, attempt, "TCP connect timed out");
                }
            }
        }

        Err(last_error.unwrap_or(ProbeError::Timeout {
            attempts: policy.attempts,
        }))
    }
}
