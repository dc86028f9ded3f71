//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the monitor.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the reachability monitor.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct PingyConfig {
    /// Targets to monitor, in display order.
    pub targets: Vec<TargetConfig>,

    /// Aggregate "all targets up" status.
    pub aggregate: AggregateConfig,

    /// Probe mechanism and policy.
    pub probe: ProbeConfig,

    /// Name resolution settings.
    pub dns: DnsConfig,

    /// Status API settings.
    pub api: ApiConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// A single monitored target.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct TargetConfig {
    /// Hostname or IP address. Also the target's stable identity.
    pub target: String,

    /// Poll interval in seconds. Values <= 0 mean "use the default",
    /// positive values below the floor are raised to it.
    #[serde(default)]
    pub interval: i64,
}

impl TargetConfig {
    pub fn new(target: impl Into<String>, interval: i64) -> Self {
        Self {
            target: target.into(),
            interval,
        }
    }
}

/// Aggregate status configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct AggregateConfig {
    /// Publish an aggregate status over all targets.
    pub enabled: bool,

    /// Display name of the aggregate.
    pub name: String,
}

impl Default for AggregateConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            name: "All Targets".to_string(),
        }
    }
}

/// Probe mechanism.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProbeMethod {
    /// ICMP echo request.
    Icmp,
    /// TCP connect to `tcp_port`.
    Tcp,
}

/// Probe configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ProbeConfig {
    pub method: ProbeMethod,

    /// Per-attempt timeout in milliseconds.
    pub timeout_ms: u64,

    /// Attempts per probe before the target is declared unreachable.
    pub attempts: u32,

    /// Port used by the TCP probe.
    pub tcp_port: u16,

    /// ICMP packet size in bytes, header included.
    pub packet_size: usize,

    /// Consecutive successes required to become reachable.
    pub reachable_threshold: u32,

    /// Consecutive failures required to become unreachable.
    pub unreachable_threshold: u32,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            method: ProbeMethod::Icmp,
            timeout_ms: 1000,
            attempts: 3,
            tcp_port: 80,
            packet_size: 64,
            reachable_threshold: 1,
            unreachable_threshold: 1,
        }
    }
}

/// Upstream nameservers used by the resolver.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Nameservers {
    /// Host resolver configuration (resolv.conf), Cloudflare if unreadable.
    System,
    Cloudflare,
    Google,
}

/// Name resolution configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct DnsConfig {
    /// Only accept IPv4 results.
    pub ipv4_only: bool,

    pub nameservers: Nameservers,
}

impl Default for DnsConfig {
    fn default() -> Self {
        Self {
            ipv4_only: true,
            nameservers: Nameservers::System,
        }
    }
}

/// Status API configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ApiConfig {
    /// Serve the read-only status API.
    pub enabled: bool,

    /// Bind address (e.g., "127.0.0.1:8581").
    pub bind_address: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            bind_address: "127.0.0.1:8581".to_string(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins when set.
    pub log_level: String,

    pub log_format: LogFormat,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9464".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config: PingyConfig = toml::from_str(
            r#"
            [[targets]]
            target = "router.lan"
            "#,
        )
        .unwrap();

        assert_eq!(config.targets, vec![TargetConfig::new("router.lan", 0)]);
        assert!(!config.aggregate.enabled);
        assert_eq!(config.probe.method, ProbeMethod::Icmp);
        assert_eq!(config.probe.timeout_ms, 1000);
        assert_eq!(config.probe.attempts, 3);
        assert!(config.dns.ipv4_only);
    }

    #[test]
    fn test_full_config() {
        let config: PingyConfig = toml::from_str(
            r#"
            [[targets]]
            target = "10.0.0.1"
            interval = 30

            [[targets]]
            target = "nas.lan"
            interval = 2

            [aggregate]
            enabled = true
            name = "Home Network"

            [probe]
            method = "tcp"
            tcp_port = 22

            [dns]
            nameservers = "google"

            [observability]
            log_format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.targets.len(), 2);
        assert_eq!(config.targets[0].interval, 30);
        assert_eq!(config.aggregate.name, "Home Network");
        assert_eq!(config.probe.method, ProbeMethod::Tcp);
        assert_eq!(config.probe.tcp_port, 22);
        assert_eq!(config.probe.attempts, 3);
        assert_eq!(config.dns.nameservers, Nameservers::Google);
        assert_eq!(config.observability.log_format, LogFormat::Json);
    }
}
