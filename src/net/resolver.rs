//! Target name resolution.
//!
//! # Responsibilities
//! - Turn a target identifier into an address a prober can reach
//! - Skip DNS for literal IP addresses
//! - Restrict results to IPv4 unless configured otherwise

use std::net::IpAddr;

use async_trait::async_trait;
use hickory_resolver::config::ResolverConfig;
use hickory_resolver::name_server::TokioConnectionProvider;
use hickory_resolver::TokioResolver;
use thiserror::Error;

use crate::config::{DnsConfig, Nameservers};

/// Errors raised while resolving a target.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    /// The name resolved, but to no usable address.
    #[error("no {family} address found for '{target}'")]
    NoAddress { target: String, family: &'static str },

    /// The lookup itself failed (NXDOMAIN, timeout, no nameserver).
    #[error("lookup of '{target}' failed: {message}")]
    Lookup { target: String, message: String },
}

/// Resolves a target identifier to a single address.
#[async_trait]
pub trait Resolver: Send + Sync {
    async fn resolve(&self, target: &str) -> Result<IpAddr, ResolutionError>;
}

/// DNS-backed resolver.
pub struct DnsResolver {
    inner: TokioResolver,
    ipv4_only: bool,
}

impl DnsResolver {
    pub fn new(config: &DnsConfig) -> Self {
        let inner = match config.nameservers {
            Nameservers::System => match TokioResolver::builder_tokio() {
                Ok(builder) => {
                    tracing::info!("DNS resolver configured from system settings");
                    builder.build()
                }
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        "System resolver configuration unavailable, falling back to Cloudflare"
                    );
                    Self::public(ResolverConfig::cloudflare())
                }
            },
            Nameservers::Cloudflare => Self::public(ResolverConfig::cloudflare()),
            Nameservers::Google => Self::public(ResolverConfig::google()),
        };

        Self {
            inner,
            ipv4_only: config.ipv4_only,
        }
    }

    fn public(config: ResolverConfig) -> TokioResolver {
        TokioResolver::builder_with_config(config, TokioConnectionProvider::default()).build()
    }
}

#[async_trait]
impl Resolver for DnsResolver {
    async fn resolve(&self, target: &str) -> Result<IpAddr, ResolutionError> {
        if let Ok(ip) = target.parse::<IpAddr>() {
            return select_address(target, [ip], self.ipv4_only);
        }

        let lookup = self
            .inner
            .lookup_ip(target)
            .await
            .map_err(|e| ResolutionError::Lookup {
                target: target.to_string(),
                message: e.to_string(),
            })?;

        select_address(target, lookup.iter(), self.ipv4_only)
    }
}

/// Pick the first acceptable address from a lookup result.
fn select_address(
    target: &str,
    addresses: impl IntoIterator<Item = IpAddr>,
    ipv4_only: bool,
) -> Result<IpAddr, ResolutionError> {
    addresses
        .into_iter()
        .find(|ip| !ipv4_only || ip.is_ipv4())
        .ok_or_else(|| ResolutionError::NoAddress {
            target: target.to_string(),
            family: if ipv4_only { "IPv4" } else { "IP" },
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_prefers_ipv4_when_restricted() {
        let v6: IpAddr = "2001:db8::1".parse().unwrap();
        let v4: IpAddr = "192.0.2.7".parse().unwrap();
        assert_eq!(select_address("host", [v6, v4], true).unwrap(), v4);
        assert_eq!(select_address("host", [v6, v4], false).unwrap(), v6);
    }

    #[test]
    fn test_select_without_match() {
        let v6: IpAddr = "2001:db8::1".parse().unwrap();
        let err = select_address("v6only", [v6], true).unwrap_err();
        assert_eq!(
            err,
            ResolutionError::NoAddress {
                target: "v6only".into(),
                family: "IPv4",
            }
        );
    }

    #[tokio::test]
    async fn test_literal_address_skips_dns() {
        let resolver = DnsResolver::new(&DnsConfig {
            ipv4_only: true,
            nameservers: Nameservers::Cloudflare,
        });
        let ip = resolver.resolve("10.1.2.3").await.unwrap();
        assert_eq!(ip, "10.1.2.3".parse::<IpAddr>().unwrap());
        assert!(resolver.resolve("::1").await.is_err());
    }
}
