//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define monitor metrics (probes, latency, reachability)
//! - Expose Prometheus-compatible metrics endpoint
//! - Track per-target and aggregate metrics
//!
//! # Metrics
//! - `pingy_probes_total` (counter): probes by target, outcome
//! - `pingy_probe_latency_ms` (histogram): round-trip distribution per target
//! - `pingy_target_reachable` (gauge): 1=reachable, 0=unreachable
//! - `pingy_aggregate_reachable` (gauge): 1=all reachable, 0 otherwise
//! - `pingy_monitors_active` (gauge): running target monitors
//!
//! # Design Decisions
//! - Without an installed recorder every call is a no-op, so tests need no setup
//! - Histogram buckets tuned for LAN/WAN round trips

use std::net::SocketAddr;

use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder};

const LATENCY_BUCKETS_MS: &[f64] = &[
    0.5, 1.0, 2.5, 5.0, 10.0, 25.0, 50.0, 100.0, 250.0, 500.0, 1000.0,
];

/// Install the Prometheus recorder and its HTTP listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .set_buckets_for_metric(
            Matcher::Full("pingy_probe_latency_ms".to_string()),
            LATENCY_BUCKETS_MS,
        )?
        .install()?;

    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record one completed probe.
pub fn record_probe(identifier: &str, outcome: &'static str, latency_ms: Option<f64>) {
    ::metrics::counter!(
        "pingy_probes_total",
        "target" => identifier.to_string(),
        "outcome" => outcome
    )
    .increment(1);

    if let Some(ms) = latency_ms {
        ::metrics::histogram!("pingy_probe_latency_ms", "target" => identifier.to_string())
            .record(ms);
    }
}

pub fn set_target_reachable(identifier: &str, reachable: bool) {
    ::metrics::gauge!("pingy_target_reachable", "target" => identifier.to_string())
        .set(if reachable { 1.0 } else { 0.0 });
}

pub fn set_aggregate_reachable(name: &str, reachable: bool) {
    ::metrics::gauge!("pingy_aggregate_reachable", "name" => name.to_string())
        .set(if reachable { 1.0 } else { 0.0 });
}

pub fn set_active_monitors(count: usize) {
    ::metrics::gauge!("pingy_monitors_active").set(count as f64);
}
