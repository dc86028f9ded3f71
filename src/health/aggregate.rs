//! Aggregate "all targets reachable" status.
//!
//! # Responsibilities
//! - Track a set of target monitors, unique by identifier
//! - Recompute on every member transition
//! - Publish only when the combined status changes
//!
//! # Design Decisions
//! - An empty aggregate is Unreachable
//! - Members are read through their published snapshots only
//! - Membership is an `ArcSwap` list so recomputes never wait on edits

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};

use arc_swap::ArcSwap;
use tokio::sync::broadcast;

use crate::health::state::{AggregateStatus, StatusEvent, TargetStatus};
use crate::health::target::{StatusObserver, TargetMonitor};
use crate::observability::metrics;

pub struct AggregateMonitor {
    name: String,
    members: ArcSwap<Vec<Arc<TargetMonitor>>>,
    reachable: AtomicBool,
    /// Serializes recompute-and-publish.
    gate: Mutex<()>,
    me: Weak<AggregateMonitor>,
    events: broadcast::Sender<StatusEvent>,
}

impl AggregateMonitor {
    pub fn new(name: impl Into<String>, events: broadcast::Sender<StatusEvent>) -> Arc<Self> {
        Arc::new_cyclic(|me| Self {
            name: name.into(),
            members: ArcSwap::from_pointee(Vec::new()),
            reachable: AtomicBool::new(false),
            gate: Mutex::new(()),
            me: me.clone(),
            events,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add a member. Returns `false` if a monitor for the same target is
    /// already attached.
    pub fn attach(&self, monitor: &Arc<TargetMonitor>) -> bool {
        let _gate = self.gate.lock().unwrap_or_else(PoisonError::into_inner);
        let current = self.members.load();
        if current
            .iter()
            .any(|m| m.identifier() == monitor.identifier())
        {
            return false;
        }

        let mut next = Vec::clone(&current);
        next.push(monitor.clone());
        self.members.store(Arc::new(next));

        let observer: Weak<dyn StatusObserver> = self.me.clone();
        monitor.set_observer(observer);
        true
    }

    /// Remove the member monitoring `identifier`.
    pub fn detach(&self, identifier: &str) -> Option<Arc<TargetMonitor>> {
        let _gate = self.gate.lock().unwrap_or_else(PoisonError::into_inner);
        let current = self.members.load();
        let index = current.iter().position(|m| m.identifier() == identifier)?;

        let mut next = Vec::clone(&current);
        let removed = next.remove(index);
        self.members.store(Arc::new(next));

        removed.clear_observer();
        Some(removed)
    }

    /// Detach every member.
    pub fn clear(&self) {
        let _gate = self.gate.lock().unwrap_or_else(PoisonError::into_inner);
        let members = self.members.swap(Arc::new(Vec::new()));
        for member in members.iter() {
            member.clear_observer();
        }
    }

    /// Recompute from the members' published statuses.
    /// Returns `true` if the aggregate status changed.
    pub fn on_member_status_changed(&self) -> bool {
        let _gate = self.gate.lock().unwrap_or_else(PoisonError::into_inner);
        let members = self.members.load();
        let reachable = !members.is_empty() && members.iter().all(|m| m.is_reachable());

        if self.reachable.swap(reachable, Ordering::AcqRel) == reachable {
            return false;
        }

        if reachable {
            tracing::info!(aggregate = %self.name, members = members.len(), "All targets reachable");
        } else {
            tracing::warn!(aggregate = %self.name, members = members.len(), "Aggregate unreachable");
        }
        metrics::set_aggregate_reachable(&self.name, reachable);
        let _ = self.events.send(StatusEvent::Aggregate(Self::snapshot(
            &self.name,
            reachable,
            &members,
        )));
        true
    }

    pub fn is_reachable(&self) -> bool {
        self.reachable.load(Ordering::Acquire)
    }

    pub fn member_count(&self) -> usize {
        self.members.load().len()
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.members
            .load()
            .iter()
            .any(|m| m.identifier() == identifier)
    }

    pub fn status(&self) -> AggregateStatus {
        Self::snapshot(&self.name, self.is_reachable(), &self.members.load())
    }

    fn snapshot(name: &str, reachable: bool, members: &[Arc<TargetMonitor>]) -> AggregateStatus {
        let mut ids: Vec<String> = members.iter().map(|m| m.identifier().to_string()).collect();
        ids.sort();
        AggregateStatus {
            name: name.to_string(),
            reachable,
            members: ids,
        }
    }
}

impl StatusObserver for AggregateMonitor {
    fn member_status_changed(&self, _status: &TargetStatus) {
        self.on_member_status_changed();
    }
}

impl std::fmt::Debug for AggregateMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AggregateMonitor")
            .field("name", &self.name)
            .field("reachable", &self.is_reachable())
            .field("members", &self.member_count())
            .finish()
    }
}
