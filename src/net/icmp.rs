//! ICMP echo probing.
//!
//! All ICMP probes share one raw-socket client per address family. The
//! client is opened on first use and dropped when the socket fails, so the
//! next probe starts from a fresh session.

use std::io;
use std::net::IpAddr;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use surge_ping::{Client, Config, PingIdentifier, PingSequence, Pinger, SurgeError, ICMP};

use crate::config::validation::MIN_PACKET_SIZE;
use crate::net::probe::{ProbeError, ProbePolicy, Prober};

/// Opens the raw-socket client for one address family.
pub trait ClientOpener: Send + Sync {
    type Client: Clone + Send + Sync;

    fn open(&self, addr: IpAddr) -> io::Result<Self::Client>;
}

/// Opens surge-ping clients.
#[derive(Debug, Default, Clone, Copy)]
pub struct SurgeOpener;

impl ClientOpener for SurgeOpener {
    type Client = Client;

    fn open(&self, addr: IpAddr) -> io::Result<Client> {
        let config = match addr {
            IpAddr::V4(_) => Config::default(),
            IpAddr::V6(_) => Config::builder().kind(ICMP::V6).build(),
        };
        Client::new(&config)
    }
}

/// Lazily opened, self-healing ICMP client pair.
pub struct PingSession<O: ClientOpener = SurgeOpener> {
    opener: O,
    v4: Mutex<Option<O::Client>>,
    v6: Mutex<Option<O::Client>>,
}

impl PingSession {
    pub fn new() -> Self {
        Self::with_opener(SurgeOpener)
    }
}

impl Default for PingSession {
    fn default() -> Self {
        Self::new()
    }
}

impl<O: ClientOpener> PingSession<O> {
    pub fn with_opener(opener: O) -> Self {
        Self {
            opener,
            v4: Mutex::new(None),
            v6: Mutex::new(None),
        }
    }

    fn slot(&self, addr: IpAddr) -> &Mutex<Option<O::Client>> {
        match addr {
            IpAddr::V4(_) => &self.v4,
            IpAddr::V6(_) => &self.v6,
        }
    }

    /// Return the open client for `addr`'s family, opening it if needed.
    pub fn client(&self, addr: IpAddr) -> Result<O::Client, ProbeError> {
        let mut slot = self.slot(addr).lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(client) = slot.as_ref() {
            return Ok(client.clone());
        }

        let client = self.opener.open(addr).map_err(|e| {
            tracing::warn!(error = %e, "Failed to open ICMP session");
            ProbeError::Session(e.to_string())
        })?;

        tracing::debug!(v6 = addr.is_ipv6(), "ICMP session opened");
        *slot = Some(client.clone());
        Ok(client)
    }

    /// Drop the client for `addr`'s family; the next probe reopens it.
    pub fn invalidate(&self, addr: IpAddr) {
        let mut slot = self.slot(addr).lock().unwrap_or_else(PoisonError::into_inner);
        if slot.take().is_some() {
            tracing::debug!(v6 = addr.is_ipv6(), "ICMP session closed");
        }
    }

    pub fn is_open(&self, addr: IpAddr) -> bool {
        self.slot(addr)
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

/// One echo request/reply exchange.
#[async_trait]
pub trait Echo: Send {
    async fn echo(&mut self, seq: u16) -> Result<Duration, SurgeError>;
}

struct PingerEcho<'a> {
    pinger: Pinger,
    payload: &'a [u8],
}

#[async_trait]
impl<'a> Echo for PingerEcho<'a> {
    async fn echo(&mut self, seq: u16) -> Result<Duration, SurgeError> {
        self.pinger
            .ping(PingSequence(seq), self.payload)
            .await
            .map(|(_, rtt)| rtt)
    }
}

/// Send up to `attempts` echoes; the first reply wins.
///
/// A socket I/O error closes `session` for `addr`'s family and ends the probe.
pub async fn echo_attempts<O: ClientOpener>(
    echo: &mut impl Echo,
    session: &PingSession<O>,
    addr: IpAddr,
    attempts: u32,
) -> Result<f64, ProbeError> {
    let mut last_error = None;
    for attempt in 0..attempts {
        match echo.echo(attempt as u16).await {
            Ok(rtt) => return Ok(rtt.as_secs_f64() * 1000.0),
            Err(SurgeError::Timeout { .. }) => {
                tracing::trace!(addr = %addr, attempt, "ICMP echo timed out");
            }
            Err(SurgeError::IOError(e)) => {
                session.invalidate(addr);
                return Err(ProbeError::Session(e.to_string()));
            }
            Err(e) => {
                tracing::trace!(addr = %addr, attempt, error = %e, "ICMP echo failed");
                last_error = Some(ProbeError::Unreachable(e.to_string()));
            }
        }
    }

    Err(last_error.unwrap_or(ProbeError::Timeout { attempts }))
}

/// Prober sending ICMP echo requests.
pub struct IcmpProber {
    session: PingSession,
    payload: Vec<u8>,
}

impl IcmpProber {
    /// `packet_size` includes the 8-byte echo header.
    pub fn new(packet_size: usize) -> Self {
        Self {
            session: PingSession::new(),
            payload: vec![0u8; packet_size.saturating_sub(MIN_PACKET_SIZE)],
        }
    }

    pub fn session(&self) -> &PingSession {
        &self.session
    }
}

#[async_trait]
impl Prober for IcmpProber {
    async fn probe(&self, addr: IpAddr, policy: &ProbePolicy) -> Result<f64, ProbeError> {
        let client = self.session.client(addr)?;
        let mut pinger = client.pinger(addr, PingIdentifier(rand::random())).await;
        pinger.timeout(policy.timeout);

        let mut echo = PingerEcho {
            pinger,
            payload: &self.payload,
        };
        echo_attempts(&mut echo, &self.session, addr, policy.attempts).await
    }
}
