//! Per-target liveness monitor.
//!
//! # Responsibilities
//! - Poll one target on its own timer
//! - Resolve, probe, then apply the outcome in a single step
//! - Publish debounced transitions and notify the aggregate
//!
//! # Design Decisions
//! - Every tick spawns its probe as a separate task; a slow probe never
//!   delays the next tick, and overlapping probes apply in completion order
//! - Results are applied under a per-monitor gate so status, latency and
//!   notification never interleave between two probes
//! - Readers see an `ArcSwap` snapshot and never take the gate
//! - `stop()` only cancels the timer; late probe results are discarded

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};
use std::time::Duration;

use arc_swap::ArcSwap;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use crate::config::{ProbeConfig, TargetConfig};
use crate::health::state::{Reachability, StatusEvent, Streak, TargetStatus, Thresholds};
use crate::net::{check_latency, ProbeError, ProbePolicy, Prober, ResolutionError, Resolver};
use crate::observability::metrics;

/// Shortest poll interval, in seconds.
pub const MIN_INTERVAL_SECS: u64 = 5;
/// Poll interval used when none (or a non-positive one) is configured.
pub const DEFAULT_INTERVAL_SECS: u64 = 60;

/// Clamp a configured interval to the supported range.
pub fn clamp_interval(secs: i64) -> Duration {
    let secs = if secs <= 0 {
        DEFAULT_INTERVAL_SECS
    } else {
        (secs as u64).max(MIN_INTERVAL_SECS)
    };
    Duration::from_secs(secs)
}

/// A monitored endpoint. Immutable for the lifetime of its monitor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    identifier: String,
    interval: Duration,
}

impl Target {
    pub fn new(identifier: impl Into<String>, interval_secs: i64) -> Self {
        Self {
            identifier: identifier.into(),
            interval: clamp_interval(interval_secs),
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl From<&TargetConfig> for Target {
    fn from(config: &TargetConfig) -> Self {
        Target::new(config.target.trim(), config.interval)
    }
}

/// Probe policy and debounce thresholds shared by all monitors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MonitorSettings {
    pub policy: ProbePolicy,
    pub thresholds: Thresholds,
}

impl From<&ProbeConfig> for MonitorSettings {
    fn from(config: &ProbeConfig) -> Self {
        Self {
            policy: ProbePolicy::from(config),
            thresholds: Thresholds::from(config),
        }
    }
}

/// Receives a monitor's published transitions.
///
/// Called synchronously from the probe completion path, so implementations
/// must not block and must not call back into the monitor's mutating API.
pub trait StatusObserver: Send + Sync {
    fn member_status_changed(&self, status: &TargetStatus);
}

/// Outcome of one probe, before debouncing.
#[derive(Debug, Clone, PartialEq)]
pub enum ProbeOutcome {
    Latency(f64),
    ResolutionFailed(ResolutionError),
    ProbeFailed(ProbeError),
}

impl ProbeOutcome {
    pub fn latency(&self) -> Option<f64> {
        match self {
            ProbeOutcome::Latency(ms) => Some(*ms),
            _ => None,
        }
    }

    /// Reachable iff a reply came back with a positive round trip.
    pub fn reachability(&self) -> Reachability {
        Reachability::from(matches!(self, ProbeOutcome::Latency(ms) if *ms > 0.0))
    }

    fn label(&self) -> &'static str {
        match self {
            ProbeOutcome::Latency(_) => "reply",
            ProbeOutcome::ResolutionFailed(_) => "resolution_failed",
            ProbeOutcome::ProbeFailed(ProbeError::Timeout { .. }) => "timeout",
            ProbeOutcome::ProbeFailed(_) => "probe_failed",
        }
    }
}

#[derive(Debug, Default)]
struct ApplyGate {
    streak: Streak,
    last_applied_seq: u64,
}

/// Liveness monitor for exactly one target.
pub struct TargetMonitor {
    target: Target,
    resolver: Arc<dyn Resolver>,
    prober: Arc<dyn Prober>,
    settings: MonitorSettings,
    status: ArcSwap<TargetStatus>,
    gate: Mutex<ApplyGate>,
    probe_seq: AtomicU64,
    stopped: AtomicBool,
    timer: Mutex<Option<JoinHandle<()>>>,
    observer: Mutex<Option<Weak<dyn StatusObserver>>>,
    events: broadcast::Sender<StatusEvent>,
}

impl TargetMonitor {
    pub fn new(
        target: Target,
        resolver: Arc<dyn Resolver>,
        prober: Arc<dyn Prober>,
        settings: MonitorSettings,
        events: broadcast::Sender<StatusEvent>,
    ) -> Arc<Self> {
        let initial = TargetStatus::unknown(target.identifier());
        Self::with_status(target, resolver, prober, settings, events, initial)
    }

    /// Create a monitor that starts from a previously published status.
    pub fn with_status(
        target: Target,
        resolver: Arc<dyn Resolver>,
        prober: Arc<dyn Prober>,
        settings: MonitorSettings,
        events: broadcast::Sender<StatusEvent>,
        initial: TargetStatus,
    ) -> Arc<Self> {
        let initial = TargetStatus {
            identifier: target.identifier().to_string(),
            ..initial
        };
        Arc::new(Self {
            target,
            resolver,
            prober,
            settings,
            status: ArcSwap::from_pointee(initial),
            gate: Mutex::new(ApplyGate::default()),
            probe_seq: AtomicU64::new(0),
            stopped: AtomicBool::new(false),
            timer: Mutex::new(None),
            observer: Mutex::new(None),
            events,
        })
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn identifier(&self) -> &str {
        self.target.identifier()
    }

    /// Probe now, then every interval. A second call is refused.
    pub fn start(self: &Arc<Self>) {
        let mut timer = self.timer.lock().unwrap_or_else(PoisonError::into_inner);
        if self.stopped.load(Ordering::Acquire) {
            tracing::warn!(identifier = %self.identifier(), "Monitor was stopped, ignoring start");
            return;
        }
        if timer.is_some() {
            tracing::warn!(identifier = %self.identifier(), "Monitor already started, ignoring start");
            return;
        }

        let monitor = Arc::downgrade(self);
        let period = self.target.interval();
        *timer = Some(tokio::spawn(async move {
            let mut ticker = time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let Some(monitor) = monitor.upgrade() else {
                    break;
                };
                tokio::spawn(async move {
                    monitor.probe_once().await;
                });
            }
        }));

        tracing::info!(
            identifier = %self.identifier(),
            interval_secs = period.as_secs(),
            "Monitor started"
        );
    }

    /// Cancel the timer. In-flight probes finish but are discarded.
    pub fn stop(&self) {
        {
            let _gate = self.gate.lock().unwrap_or_else(PoisonError::into_inner);
            self.stopped.store(true, Ordering::Release);
        }
        let handle = self
            .timer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            handle.abort();
            tracing::info!(identifier = %self.identifier(), "Monitor stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        !self.stopped.load(Ordering::Acquire)
            && self
                .timer
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .is_some()
    }

    /// Resolve and probe once, then apply the outcome.
    pub async fn probe_once(&self) -> ProbeOutcome {
        let seq = self.probe_seq.fetch_add(1, Ordering::Relaxed) + 1;
        let identifier = self.identifier();

        let outcome = match self.resolver.resolve(identifier).await {
            Err(e) => {
                tracing::debug!(identifier = %identifier, seq, error = %e, "Resolution failed");
                ProbeOutcome::ResolutionFailed(e)
            }
            Ok(addr) => {
                let result = self
                    .prober
                    .probe(addr, &self.settings.policy)
                    .await
                    .and_then(check_latency);
                match result {
                    Ok(ms) => {
                        tracing::trace!(identifier = %identifier, addr = %addr, seq, latency_ms = ms, "Probe reply");
                        ProbeOutcome::Latency(ms)
                    }
                    Err(e) => {
                        tracing::debug!(identifier = %identifier, addr = %addr, seq, error = %e, "Probe failed");
                        ProbeOutcome::ProbeFailed(e)
                    }
                }
            }
        };

        self.apply(seq, &outcome);
        outcome
    }

    /// Apply a completed probe. Returns the published transition, if any.
    fn apply(&self, seq: u64, outcome: &ProbeOutcome) -> Option<Reachability> {
        let mut gate = self.gate.lock().unwrap_or_else(PoisonError::into_inner);
        if self.stopped.load(Ordering::Acquire) {
            tracing::debug!(identifier = %self.identifier(), seq, "Discarding probe result after stop");
            return None;
        }
        if seq < gate.last_applied_seq {
            tracing::debug!(
                identifier = %self.identifier(),
                seq,
                newer = gate.last_applied_seq,
                "Probe completed after a newer one"
            );
        }
        gate.last_applied_seq = gate.last_applied_seq.max(seq);

        let current = self.status.load().reachability();
        let transition =
            gate.streak
                .observe(current, outcome.reachability(), self.settings.thresholds);
        let next = TargetStatus {
            identifier: self.identifier().to_string(),
            reachable: transition.unwrap_or(current).is_reachable(),
            latency_ms: outcome.latency(),
        };
        self.status.store(Arc::new(next.clone()));

        metrics::record_probe(self.identifier(), outcome.label(), outcome.latency());

        if let Some(reachability) = transition {
            match reachability {
                Reachability::Reachable => tracing::info!(
                    identifier = %self.identifier(),
                    latency_ms = ?next.latency_ms,
                    "Target reachable"
                ),
                Reachability::Unreachable => tracing::warn!(
                    identifier = %self.identifier(),
                    reason = outcome.label(),
                    "Target unreachable"
                ),
            }
            metrics::set_target_reachable(self.identifier(), reachability.is_reachable());
            self.publish(&next);
        }

        transition
    }

    fn publish(&self, status: &TargetStatus) {
        let _ = self.events.send(StatusEvent::Target(status.clone()));

        let observer = self
            .observer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        if let Some(observer) = observer.and_then(|weak| weak.upgrade()) {
            observer.member_status_changed(status);
        }
    }

    /// Last recorded round trip, `None` when unknown.
    pub fn latency(&self) -> Option<f64> {
        self.status.load().latency_ms
    }

    /// Current debounced status.
    pub fn is_reachable(&self) -> bool {
        self.status.load().reachable
    }

    pub fn status(&self) -> TargetStatus {
        TargetStatus::clone(&self.status.load())
    }

    /// Continue from `previous`: its published status and any partial
    /// streak toward a transition. Call before `start`.
    pub(crate) fn carry_over(&self, previous: &TargetMonitor) {
        let streak = previous
            .gate
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .streak;
        let mut gate = self.gate.lock().unwrap_or_else(PoisonError::into_inner);
        gate.streak = streak;
        self.status.store(Arc::new(TargetStatus {
            identifier: self.identifier().to_string(),
            ..previous.status()
        }));
    }

    pub(crate) fn set_observer(&self, observer: Weak<dyn StatusObserver>) {
        *self.observer.lock().unwrap_or_else(PoisonError::into_inner) = Some(observer);
    }

    pub(crate) fn clear_observer(&self) {
        self.observer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
    }
}

impl Drop for TargetMonitor {
    fn drop(&mut self) {
        if let Some(handle) = self
            .timer
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            handle.abort();
        }
    }
}

impl std::fmt::Debug for TargetMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TargetMonitor")
            .field("target", &self.target)
            .field("status", &self.status.load())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::net::IpAddr;
    use std::sync::atomic::AtomicUsize;

    struct FixedResolver(Result<IpAddr, ResolutionError>);

    #[async_trait]
    impl Resolver for FixedResolver {
        async fn resolve(&self, _target: &str) -> Result<IpAddr, ResolutionError> {
            self.0.clone()
        }
    }

    #[derive(Default)]
    struct ScriptedProber {
        replies: Mutex<VecDeque<Result<f64, ProbeError>>>,
        calls: AtomicUsize,
    }

    impl ScriptedProber {
        fn new(replies: impl IntoIterator<Item = Result<f64, ProbeError>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into_iter().collect()),
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl Prober for ScriptedProber {
        async fn probe(&self, _addr: IpAddr, policy: &ProbePolicy) -> Result<f64, ProbeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(ProbeError::Timeout {
                    attempts: policy.attempts,
                }))
        }
    }

    #[derive(Default)]
    struct Recorder(Mutex<Vec<TargetStatus>>);

    impl StatusObserver for Recorder {
        fn member_status_changed(&self, status: &TargetStatus) {
            self.0.lock().unwrap().push(status.clone());
        }
    }

    fn ok_resolver() -> Arc<dyn Resolver> {
        Arc::new(FixedResolver(Ok("192.0.2.1".parse().unwrap())))
    }

    fn monitor_with(
        resolver: Arc<dyn Resolver>,
        prober: Arc<ScriptedProber>,
    ) -> (Arc<TargetMonitor>, Arc<Recorder>, broadcast::Receiver<StatusEvent>) {
        let (tx, rx) = broadcast::channel(16);
        let monitor = TargetMonitor::new(
            Target::new("host.lan", 30),
            resolver,
            prober,
            MonitorSettings::default(),
            tx,
        );
        let recorder = Arc::new(Recorder::default());
        let weak: Weak<dyn StatusObserver> = Arc::downgrade(&recorder) as Weak<dyn StatusObserver>;
        monitor.set_observer(weak);
        (monitor, recorder, rx)
    }

    #[test]
    fn test_interval_clamping() {
        assert_eq!(clamp_interval(0), Duration::from_secs(60));
        assert_eq!(clamp_interval(-10), Duration::from_secs(60));
        assert_eq!(clamp_interval(1), Duration::from_secs(5));
        assert_eq!(clamp_interval(5), Duration::from_secs(5));
        assert_eq!(clamp_interval(90), Duration::from_secs(90));
    }

    #[tokio::test]
    async fn test_reply_marks_reachable() {
        let prober = ScriptedProber::new([Ok(12.0)]);
        let (monitor, recorder, mut rx) = monitor_with(ok_resolver(), prober);

        assert!(!monitor.is_reachable());
        assert_eq!(monitor.latency(), None);

        assert_eq!(monitor.probe_once().await, ProbeOutcome::Latency(12.0));
        assert!(monitor.is_reachable());
        assert_eq!(monitor.latency(), Some(12.0));

        assert_eq!(recorder.0.lock().unwrap().len(), 1);
        match rx.try_recv().unwrap() {
            StatusEvent::Target(status) => {
                assert!(status.reachable);
                assert_eq!(status.latency_ms, Some(12.0));
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_resolution_failure_skips_probe() {
        let resolver = Arc::new(FixedResolver(Err(ResolutionError::Lookup {
            target: "host.lan".into(),
            message: "NXDOMAIN".into(),
        })));
        let prober = ScriptedProber::new([Ok(5.0)]);
        let (monitor, recorder, mut rx) = monitor_with(resolver, prober.clone());

        let outcome = monitor.probe_once().await;
        assert!(matches!(outcome, ProbeOutcome::ResolutionFailed(_)));
        assert_eq!(prober.calls.load(Ordering::SeqCst), 0);
        assert!(!monitor.is_reachable());
        assert_eq!(monitor.latency(), None);
        // Already unreachable: nothing to publish.
        assert!(recorder.0.lock().unwrap().is_empty());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_repeated_outcomes_publish_once() {
        let prober = ScriptedProber::new([
            Ok(10.0),
            Ok(11.0),
            Ok(9.5),
            Err(ProbeError::Timeout { attempts: 3 }),
            Err(ProbeError::Timeout { attempts: 3 }),
            Ok(20.0),
        ]);
        let (monitor, recorder, _rx) = monitor_with(ok_resolver(), prober);

        for _ in 0..3 {
            monitor.probe_once().await;
        }
        assert_eq!(monitor.latency(), Some(9.5));
        assert_eq!(recorder.0.lock().unwrap().len(), 1);

        monitor.probe_once().await;
        monitor.probe_once().await;
        assert!(!monitor.is_reachable());
        assert_eq!(monitor.latency(), None);
        assert_eq!(recorder.0.lock().unwrap().len(), 2);

        monitor.probe_once().await;
        let published: Vec<bool> = recorder.0.lock().unwrap().iter().map(|s| s.reachable).collect();
        assert_eq!(published, vec![true, false, true]);
    }

    #[tokio::test]
    async fn test_zero_and_invalid_latency_are_unreachable() {
        let prober = ScriptedProber::new([Ok(0.0), Ok(f64::NAN), Ok(-3.0)]);
        let (monitor, recorder, _rx) = monitor_with(ok_resolver(), prober);

        assert_eq!(monitor.probe_once().await, ProbeOutcome::Latency(0.0));
        assert!(!monitor.is_reachable());
        assert_eq!(monitor.latency(), Some(0.0));

        assert!(matches!(
            monitor.probe_once().await,
            ProbeOutcome::ProbeFailed(ProbeError::InvalidLatency(_))
        ));
        assert!(matches!(
            monitor.probe_once().await,
            ProbeOutcome::ProbeFailed(ProbeError::InvalidLatency(_))
        ));
        assert_eq!(monitor.latency(), None);
        assert!(recorder.0.lock().unwrap().is_empty());
    }

    /// Replies after a per-call delay, in call order.
    struct DelayedProber {
        replies: Mutex<VecDeque<(Duration, Result<f64, ProbeError>)>>,
    }

    #[async_trait]
    impl Prober for DelayedProber {
        async fn probe(&self, _addr: IpAddr, policy: &ProbePolicy) -> Result<f64, ProbeError> {
            let (delay, reply) = self.replies.lock().unwrap().pop_front().unwrap_or((
                Duration::ZERO,
                Err(ProbeError::Timeout {
                    attempts: policy.attempts,
                }),
            ));
            time::sleep(delay).await;
            reply
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_overlapping_probes_apply_in_completion_order() {
        let (tx, _rx) = broadcast::channel(16);
        let prober = Arc::new(DelayedProber {
            replies: Mutex::new(VecDeque::from([
                (Duration::from_millis(900), Ok(15.0)),
                (Duration::from_millis(50), Err(ProbeError::Timeout { attempts: 3 })),
            ])),
        });
        let monitor = TargetMonitor::new(
            Target::new("host.lan", 30),
            ok_resolver(),
            prober,
            MonitorSettings::default(),
            tx,
        );

        // Issued first, completes last.
        let (slow, fast) = tokio::join!(monitor.probe_once(), monitor.probe_once());
        assert_eq!(slow, ProbeOutcome::Latency(15.0));
        assert!(matches!(fast, ProbeOutcome::ProbeFailed(ProbeError::Timeout { .. })));
        assert!(monitor.is_reachable());
        assert_eq!(monitor.latency(), Some(15.0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_during_inflight_probe_publishes_nothing() {
        let (tx, mut rx) = broadcast::channel(16);
        let prober = Arc::new(DelayedProber {
            replies: Mutex::new(VecDeque::from([(Duration::from_millis(500), Ok(8.0))])),
        });
        let monitor = TargetMonitor::new(
            Target::new("host.lan", 30),
            ok_resolver(),
            prober,
            MonitorSettings::default(),
            tx,
        );

        let stopper = async {
            time::sleep(Duration::from_millis(100)).await;
            monitor.stop();
        };
        let (outcome, ()) = tokio::join!(monitor.probe_once(), stopper);
        assert_eq!(outcome, ProbeOutcome::Latency(8.0));
        assert!(!monitor.is_reachable());
        assert_eq!(monitor.latency(), None);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_carry_over_keeps_status_and_streak() {
        let (tx, mut rx) = broadcast::channel(16);
        let settings = MonitorSettings {
            policy: ProbePolicy::default(),
            thresholds: Thresholds {
                reachable: 2,
                unreachable: 2,
            },
        };
        let old = TargetMonitor::new(
            Target::new("host.lan", 30),
            ok_resolver(),
            ScriptedProber::new([Ok(4.0)]),
            settings,
            tx.clone(),
        );
        old.probe_once().await;
        assert!(!old.is_reachable());

        let new = TargetMonitor::new(
            Target::new("host.lan", 10),
            ok_resolver(),
            ScriptedProber::new([Ok(6.0)]),
            settings,
            tx,
        );
        new.carry_over(&old);
        old.stop();
        assert_eq!(new.latency(), Some(4.0));

        // Second success in a row completes the streak begun on the old monitor.
        new.probe_once().await;
        assert!(new.is_reachable());
        assert!(matches!(rx.try_recv(), Ok(StatusEvent::Target(s)) if s.reachable));
    }

    #[tokio::test]
    async fn test_start_after_stop_is_refused() {
        let prober = ScriptedProber::new([Ok(1.0)]);
        let (monitor, _recorder, _rx) = monitor_with(ok_resolver(), prober);

        monitor.stop();
        monitor.start();
        assert!(!monitor.is_running());
    }

    #[tokio::test]
    async fn test_result_after_stop_is_discarded() {
        let prober = ScriptedProber::new([Ok(12.0)]);
        let (monitor, recorder, _rx) = monitor_with(ok_resolver(), prober);

        monitor.stop();
        monitor.stop();
        monitor.probe_once().await;
        assert!(!monitor.is_reachable());
        assert!(recorder.0.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_hysteresis_thresholds() {
        let (tx, _rx) = broadcast::channel(16);
        let prober = ScriptedProber::new([Ok(1.0), Ok(1.0), Err(ProbeError::Timeout { attempts: 3 })]);
        let settings = MonitorSettings {
            policy: ProbePolicy::default(),
            thresholds: Thresholds {
                reachable: 2,
                unreachable: 2,
            },
        };
        let monitor = TargetMonitor::new(Target::new("h", 0), ok_resolver(), prober, settings, tx);

        monitor.probe_once().await;
        assert!(!monitor.is_reachable());
        assert_eq!(monitor.latency(), Some(1.0));
        monitor.probe_once().await;
        assert!(monitor.is_reachable());
        monitor.probe_once().await;
        assert!(monitor.is_reachable());
        assert_eq!(monitor.latency(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_probes_immediately_then_on_interval() {
        let prober = ScriptedProber::new([Ok(1.0), Ok(1.0), Ok(1.0)]);
        let (monitor, _recorder, _rx) = monitor_with(ok_resolver(), prober.clone());

        monitor.start();
        monitor.start();
        assert!(monitor.is_running());

        time::sleep(Duration::from_millis(1)).await;
        assert_eq!(prober.calls.load(Ordering::SeqCst), 1);
        assert!(monitor.is_reachable());

        time::sleep(Duration::from_secs(30)).await;
        assert_eq!(prober.calls.load(Ordering::SeqCst), 2);

        monitor.stop();
        assert!(!monitor.is_running());
        time::sleep(Duration::from_secs(120)).await;
        assert_eq!(prober.calls.load(Ordering::SeqCst), 2);
    }
}
