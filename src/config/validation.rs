//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, packet sizes, thresholds)
//! - Validate bind addresses
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: PingyConfig → Result<(), Vec<ValidationError>>
//! - Intervals are never rejected; they are clamped when monitors are built
//! - Duplicate targets are not errors; the registry keeps the first

use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::PingyConfig;

/// Smallest ICMP packet: the 8-byte echo header with no payload.
pub const MIN_PACKET_SIZE: usize = 8;
/// Largest ICMP packet that fits in an IPv4 datagram.
pub const MAX_PACKET_SIZE: usize = 65_507;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("target #{index} has an empty identifier")]
    EmptyTarget { index: usize },

    #[error("probe.attempts must be at least 1")]
    ZeroAttempts,

    #[error("probe.timeout_ms must be greater than 0")]
    ZeroTimeout,

    #[error("probe.packet_size {0} is outside {min}..={max}", min = MIN_PACKET_SIZE, max = MAX_PACKET_SIZE)]
    PacketSize(usize),

    #[error("probe.{0} must be at least 1")]
    ZeroThreshold(&'static str),

    #[error("aggregate.name must not be empty when the aggregate is enabled")]
    EmptyAggregateName,

    #[error("{field} '{value}' is not a valid socket address")]
    BindAddress { field: &'static str, value: String },
}

/// Validate a parsed configuration.
pub fn validate_config(config: &PingyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    for (index, target) in config.targets.iter().enumerate() {
        if target.target.trim().is_empty() {
            errors.push(ValidationError::EmptyTarget { index });
        }
    }

    let probe = &config.probe;
    if probe.attempts == 0 {
        errors.push(ValidationError::ZeroAttempts);
    }
    if probe.timeout_ms == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }
    if !(MIN_PACKET_SIZE..=MAX_PACKET_SIZE).contains(&probe.packet_size) {
        errors.push(ValidationError::PacketSize(probe.packet_size));
    }
    if probe.reachable_threshold == 0 {
        errors.push(ValidationError::ZeroThreshold("reachable_threshold"));
    }
    if probe.unreachable_threshold == 0 {
        errors.push(ValidationError::ZeroThreshold("unreachable_threshold"));
    }

    if config.aggregate.enabled && config.aggregate.name.trim().is_empty() {
        errors.push(ValidationError::EmptyAggregateName);
    }

    if config.api.enabled && config.api.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress {
            field: "api.bind_address",
            value: config.api.bind_address.clone(),
        });
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::BindAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
