//! Monitor lifetimes and reconciliation.
//!
//! # Responsibilities
//! - Own every TargetMonitor, keyed by target identifier
//! - Diff the configured target set against running monitors
//! - Create, sync or tear down the AggregateMonitor
//! - Publish a lock-free StatusBoard for readers
//!
//! # Design Decisions
//! - Identity is the trimmed target identifier, never object identity
//! - Monitors are keyed in a BTreeMap; reports list created/retained/replaced
//!   in configured order and removed in identifier order
//! - New monitors are attached to the aggregate before they start
//! - A changed interval replaces the monitor but carries its status and
//!   any partial hysteresis streak over
//! - Removed targets and retired aggregates have their reachability gauges zeroed

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use arc_swap::ArcSwap;
use serde::Serialize;
use tokio::sync::broadcast;

use crate::config::{AggregateConfig, TargetConfig};
use crate::health::aggregate::AggregateMonitor;
use crate::health::state::{AggregateStatus, StatusEvent, TargetStatus};
use crate::health::target::{MonitorSettings, Target, TargetMonitor};
use crate::net::{Prober, Resolver};
use crate::observability::metrics;

/// What a reconciliation did to the aggregate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregateAction {
    #[default]
    Unchanged,
    Created,
    /// Display name changed.
    Recreated,
    /// Membership changed and the status was recomputed.
    Resynced,
    TornDown,
}

/// Actions taken by one `MonitorRegistry::apply`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    pub created: Vec<String>,
    pub retained: Vec<String>,
    /// Interval changed; status carried over to a new monitor.
    pub replaced: Vec<String>,
    pub removed: Vec<String>,
    /// Identifiers configured more than once (later entries ignored).
    pub duplicates: Vec<String>,
    pub aggregate: AggregateAction,
}

impl ReconcileReport {
    /// True when nothing was created, replaced, removed or changed.
    pub fn is_noop(&self) -> bool {
        self.created.is_empty()
            && self.replaced.is_empty()
            && self.removed.is_empty()
            && self.aggregate == AggregateAction::Unchanged
    }
}

/// Everything the status API returns at once.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusSnapshot {
    pub targets: Vec<TargetStatus>,
    pub aggregate: Option<AggregateStatus>,
}

#[derive(Default)]
struct BoardState {
    monitors: Vec<Arc<TargetMonitor>>,
    aggregate: Option<Arc<AggregateMonitor>>,
}

/// Read-only, lock-free view of the running monitors.
#[derive(Clone, Default)]
pub struct StatusBoard {
    inner: Arc<ArcSwap<BoardState>>,
}

impl StatusBoard {
    /// Target statuses in configured order.
    pub fn targets(&self) -> Vec<TargetStatus> {
        self.inner.load().monitors.iter().map(|m| m.status()).collect()
    }

    pub fn target(&self, identifier: &str) -> Option<TargetStatus> {
        self.inner
            .load()
            .monitors
            .iter()
            .find(|m| m.identifier() == identifier)
            .map(|m| m.status())
    }

    pub fn aggregate(&self) -> Option<AggregateStatus> {
        self.inner.load().aggregate.as_ref().map(|a| a.status())
    }

    pub fn snapshot(&self) -> StatusSnapshot {
        let state = self.inner.load();
        StatusSnapshot {
            targets: state.monitors.iter().map(|m| m.status()).collect(),
            aggregate: state.aggregate.as_ref().map(|a| a.status()),
        }
    }
}

/// Owns the monitors for the configured target set.
pub struct MonitorRegistry {
    resolver: Arc<dyn Resolver>,
    prober: Arc<dyn Prober>,
    settings: MonitorSettings,
    events: broadcast::Sender<StatusEvent>,
    monitors: BTreeMap<String, Arc<TargetMonitor>>,
    order: Vec<String>,
    aggregate: Option<Arc<AggregateMonitor>>,
    board: StatusBoard,
}

impl MonitorRegistry {
    pub fn new(
        resolver: Arc<dyn Resolver>,
        prober: Arc<dyn Prober>,
        settings: MonitorSettings,
        events: broadcast::Sender<StatusEvent>,
    ) -> Self {
        Self {
            resolver,
            prober,
            settings,
            events,
            monitors: BTreeMap::new(),
            order: Vec::new(),
            aggregate: None,
            board: StatusBoard::default(),
        }
    }

    pub fn board(&self) -> StatusBoard {
        self.board.clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StatusEvent> {
        self.events.subscribe()
    }

    /// Reconcile running monitors against the configured targets.
    ///
    /// Must be called from within a Tokio runtime: new monitors are started.
    pub fn apply(
        &mut self,
        targets: &[TargetConfig],
        aggregate: &AggregateConfig,
    ) -> ReconcileReport {
        let mut report = ReconcileReport::default();

        let mut seen = BTreeSet::new();
        let mut desired = Vec::with_capacity(targets.len());
        for config in targets {
            let target = Target::from(config);
            if !seen.insert(target.identifier().to_string()) {
                tracing::warn!(identifier = %target.identifier(), "Duplicate target ignored");
                report.duplicates.push(target.identifier().to_string());
                continue;
            }
            desired.push(target);
        }

        let stale: Vec<String> = self
            .monitors
            .keys()
            .filter(|id| !seen.contains(*id))
            .cloned()
            .collect();
        for id in stale {
            if let Some(monitor) = self.monitors.remove(&id) {
                self.retire(&monitor);
                metrics::set_target_reachable(&id, false);
                tracing::info!(identifier = %id, "Target removed");
                report.removed.push(id);
            }
        }

        let mut to_start = Vec::new();
        for target in desired {
            let id = target.identifier().to_string();
            if let Some(existing) = self.monitors.get(&id) {
                if existing.target() == &target {
                    report.retained.push(id);
                    continue;
                }
            }

            let monitor = TargetMonitor::new(
                target,
                self.resolver.clone(),
                self.prober.clone(),
                self.settings,
                self.events.clone(),
            );
            match self.monitors.get(&id) {
                Some(existing) => {
                    monitor.carry_over(existing);
                    self.retire(existing);
                    report.replaced.push(id.clone());
                }
                None => report.created.push(id.clone()),
            }
            self.monitors.insert(id, monitor.clone());
            to_start.push(monitor);
        }
        self.order = seen_in_order(targets, &self.monitors);

        report.aggregate = self.reconcile_aggregate(aggregate, !report.removed.is_empty());

        for monitor in &to_start {
            monitor.start();
        }

        metrics::set_active_monitors(self.monitors.len());
        self.publish_board();

        tracing::info!(
            created = report.created.len(),
            retained = report.retained.len(),
            replaced = report.replaced.len(),
            removed = report.removed.len(),
            aggregate = ?report.aggregate,
            "Configuration applied"
        );
        report
    }

    fn reconcile_aggregate(&mut self, config: &AggregateConfig, members_removed: bool) -> AggregateAction {
        if !config.enabled {
            return match self.aggregate.take() {
                Some(old) => {
                    old.clear();
                    metrics::set_aggregate_reachable(old.name(), false);
                    tracing::info!(aggregate = %old.name(), "Aggregate disabled");
                    AggregateAction::TornDown
                }
                None => AggregateAction::Unchanged,
            };
        }

        if let Some(existing) = &self.aggregate {
            if existing.name() == config.name {
                let attached = self
                    .ordered_monitors()
                    .filter(|m| existing.attach(m))
                    .count();
                if attached == 0 && !members_removed {
                    return AggregateAction::Unchanged;
                }
                existing.on_member_status_changed();
                return AggregateAction::Resynced;
            }
        }

        let recreated = match self.aggregate.take() {
            Some(old) => {
                old.clear();
                metrics::set_aggregate_reachable(old.name(), false);
                true
            }
            None => false,
        };

        let aggregate = AggregateMonitor::new(config.name.clone(), self.events.clone());
        for monitor in self.ordered_monitors() {
            aggregate.attach(monitor);
        }
        aggregate.on_member_status_changed();
        metrics::set_aggregate_reachable(aggregate.name(), aggregate.is_reachable());
        tracing::info!(
            aggregate = %aggregate.name(),
            members = aggregate.member_count(),
            "Aggregate created"
        );
        self.aggregate = Some(aggregate);

        if recreated {
            AggregateAction::Recreated
        } else {
            AggregateAction::Created
        }
    }

    /// Stop a monitor and take it out of the aggregate.
    fn retire(&self, monitor: &Arc<TargetMonitor>) {
        monitor.stop();
        if let Some(aggregate) = &self.aggregate {
            aggregate.detach(monitor.identifier());
        }
    }

    fn ordered_monitors(&self) -> impl Iterator<Item = &Arc<TargetMonitor>> {
        self.order.iter().filter_map(|id| self.monitors.get(id))
    }

    fn publish_board(&self) {
        self.board.inner.store(Arc::new(BoardState {
            monitors: self.ordered_monitors().cloned().collect(),
            aggregate: self.aggregate.clone(),
        }));
    }

    /// Stop every monitor and drop the aggregate.
    pub fn shutdown(&mut self) {
        if let Some(aggregate) = self.aggregate.take() {
            aggregate.clear();
            metrics::set_aggregate_reachable(aggregate.name(), false);
        }
        for monitor in self.monitors.values() {
            monitor.stop();
            metrics::set_target_reachable(monitor.identifier(), false);
        }
        self.monitors.clear();
        self.order.clear();
        metrics::set_active_monitors(0);
        self.publish_board();
        tracing::info!("All monitors stopped");
    }

    pub fn monitor(&self, identifier: &str) -> Option<Arc<TargetMonitor>> {
        self.monitors.get(identifier).cloned()
    }

    /// Monitors in configured order.
    pub fn monitors(&self) -> Vec<Arc<TargetMonitor>> {
        self.ordered_monitors().cloned().collect()
    }

    pub fn aggregate(&self) -> Option<Arc<AggregateMonitor>> {
        self.aggregate.clone()
    }

    pub fn len(&self) -> usize {
        self.monitors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.monitors.is_empty()
    }
}

/// Configured identifiers, first occurrence only, that have a monitor.
fn seen_in_order(
    targets: &[TargetConfig],
    monitors: &BTreeMap<String, Arc<TargetMonitor>>,
) -> Vec<String> {
    let mut seen = BTreeSet::new();
    targets
        .iter()
        .map(|config| Target::from(config).identifier().to_string())
        .filter(|id| monitors.contains_key(id) && seen.insert(id.clone()))
        .collect()
}
