//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::net::TcpListener;
use tokio::sync::broadcast;

use pingy::health::{MonitorRegistry, MonitorSettings, StatusEvent, Target, TargetMonitor};
use pingy::net::{ProbeError, ProbePolicy, Prober, ResolutionError, Resolver};

/// How a scripted host answers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Host {
    /// Resolves and replies with this latency.
    Reply(f64),
    /// Resolves, but every attempt times out.
    Silent,
    /// Does not resolve.
    Unknown,
}

/// Programmable resolver and prober. Hosts not scripted do not resolve.
#[derive(Default)]
pub struct ScriptedNet {
    hosts: Mutex<HashMap<String, (IpAddr, Host)>>,
    resolves: AtomicUsize,
    probes: AtomicUsize,
}

impl ScriptedNet {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Script (or re-script) `identifier`.
    pub fn set(&self, identifier: &str, host: Host) {
        let mut hosts = self.hosts.lock().unwrap();
        let next = hosts.len() as u8 + 1;
        let entry = hosts
            .entry(identifier.to_string())
            .or_insert((IpAddr::V4(Ipv4Addr::new(10, 0, 0, next)), host));
        entry.1 = host;
    }

    pub fn resolves(&self) -> usize {
        self.resolves.load(Ordering::SeqCst)
    }

    pub fn probes(&self) -> usize {
        self.probes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Resolver for ScriptedNet {
    async fn resolve(&self, target: &str) -> Result<IpAddr, ResolutionError> {
        self.resolves.fetch_add(1, Ordering::SeqCst);
        match self.hosts.lock().unwrap().get(target) {
            Some((addr, host)) if *host != Host::Unknown => Ok(*addr),
            _ => Err(ResolutionError::Lookup {
                target: target.to_string(),
                message: "NXDOMAIN".to_string(),
            }),
        }
    }
}

#[async_trait]
impl Prober for ScriptedNet {
    async fn probe(&self, addr: IpAddr, policy: &ProbePolicy) -> Result<f64, ProbeError> {
        self.probes.fetch_add(1, Ordering::SeqCst);
        let host = self
            .hosts
            .lock()
            .unwrap()
            .values()
            .find(|(a, _)| *a == addr)
            .map(|(_, host)| *host);
        match host {
            Some(Host::Reply(ms)) => Ok(ms),
            _ => Err(ProbeError::Timeout {
                attempts: policy.attempts,
            }),
        }
    }
}

/// A monitor driven by `net`, not started.
pub fn monitor(
    net: &Arc<ScriptedNet>,
    identifier: &str,
    events: &broadcast::Sender<StatusEvent>,
) -> Arc<TargetMonitor> {
    TargetMonitor::new(
        Target::new(identifier, 30),
        net.clone(),
        net.clone(),
        MonitorSettings::default(),
        events.clone(),
    )
}

/// A registry driven by `net`.
pub fn registry(net: &Arc<ScriptedNet>) -> MonitorRegistry {
    let (events, _) = broadcast::channel(64);
    MonitorRegistry::new(net.clone(), net.clone(), MonitorSettings::default(), events)
}

/// Let spawned probes finish. Under a paused clock this only advances
/// time once every task is idle.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(10)).await;
}

/// Drain every event currently queued.
pub fn drain(rx: &mut broadcast::Receiver<StatusEvent>) -> Vec<StatusEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

/// Aggregate reachability values from a batch of events.
pub fn aggregate_flips(events: &[StatusEvent]) -> Vec<bool> {
    events
        .iter()
        .filter_map(|e| match e {
            StatusEvent::Aggregate(a) => Some(a.reachable),
            _ => None,
        })
        .collect()
}

/// Start a listener that accepts and immediately drops connections.
pub async fn start_tcp_listener() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((socket, _)) = listener.accept().await {
            drop(socket);
        }
    });

    addr
}
