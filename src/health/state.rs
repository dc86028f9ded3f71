//! Reachability state machine and published status types.
//!
//! # States
//! - Reachable: the last accepted outcome was a positive-latency reply
//! - Unreachable: resolution or probe failed (also the initial state)
//!
//! # State Transitions
//! ```text
//! Unreachable → Reachable: consecutive successes >= reachable_threshold
//! Reachable → Unreachable: consecutive failures >= unreachable_threshold
//! ```
//!
//! # Design Decisions
//! - Thresholds default to 1: every differing outcome is published
//! - Identical outcomes reset the opposite streak and publish nothing
//! - Counters reset on state transition

use serde::Serialize;

use crate::config::ProbeConfig;

/// Debounced reachability of a target or of the aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Reachability {
    Unreachable,
    Reachable,
}

impl Reachability {
    pub fn is_reachable(self) -> bool {
        self == Reachability::Reachable
    }
}

impl From<bool> for Reachability {
    fn from(reachable: bool) -> Self {
        if reachable {
            Reachability::Reachable
        } else {
            Reachability::Unreachable
        }
    }
}

/// Consecutive outcomes needed before a transition is published.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    pub reachable: u32,
    pub unreachable: u32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            reachable: 1,
            unreachable: 1,
        }
    }
}

impl From<&ProbeConfig> for Thresholds {
    fn from(config: &ProbeConfig) -> Self {
        Self {
            reachable: config.reachable_threshold.max(1),
            unreachable: config.unreachable_threshold.max(1),
        }
    }
}

/// Run of consecutive outcomes that disagree with the published status.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Streak {
    successes: u32,
    failures: u32,
}

impl Streak {
    /// Feed one computed outcome. Returns the status to publish, if it changed.
    pub fn observe(
        &mut self,
        current: Reachability,
        computed: Reachability,
        thresholds: Thresholds,
    ) -> Option<Reachability> {
        if computed == current {
            *self = Streak::default();
            return None;
        }

        let (run, threshold) = match computed {
            Reachability::Reachable => {
                self.failures = 0;
                self.successes += 1;
                (self.successes, thresholds.reachable)
            }
            Reachability::Unreachable => {
                self.successes = 0;
                self.failures += 1;
                (self.failures, thresholds.unreachable)
            }
        };

        if run >= threshold {
            *self = Streak::default();
            Some(computed)
        } else {
            None
        }
    }
}

/// Published view of one target.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetStatus {
    pub identifier: String,
    pub reachable: bool,
    /// Last observed round trip, `None` when unknown.
    pub latency_ms: Option<f64>,
}

impl TargetStatus {
    /// Status of a target nothing is known about yet.
    pub fn unknown(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            reachable: false,
            latency_ms: None,
        }
    }

    pub fn reachability(&self) -> Reachability {
        Reachability::from(self.reachable)
    }
}

/// Published view of the aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregateStatus {
    pub name: String,
    pub reachable: bool,
    /// Member identifiers, sorted.
    pub members: Vec<String>,
}

/// A published status transition.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StatusEvent {
    Target(TargetStatus),
    Aggregate(AggregateStatus),
}
