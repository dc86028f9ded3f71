//! Supervisor loop: applies configuration updates to the registry until shutdown.

use tokio::sync::{broadcast, mpsc};

use crate::config::PingyConfig;
use crate::health::{MonitorRegistry, ReconcileReport, StatusBoard};

/// Owns the registry and the configuration currently applied to it.
pub struct Supervisor {
    registry: MonitorRegistry,
    config: PingyConfig,
}

impl Supervisor {
    pub fn new(registry: MonitorRegistry, config: PingyConfig) -> Self {
        Self { registry, config }
    }

    pub fn board(&self) -> StatusBoard {
        self.registry.board()
    }

    /// Apply the initial configuration, then follow updates until shutdown.
    pub async fn run(
        mut self,
        mut config_updates: mpsc::UnboundedReceiver<PingyConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) {
        let report = self
            .registry
            .apply(&self.config.targets, &self.config.aggregate);
        tracing::info!(
            targets = report.created.len(),
            aggregate = ?report.aggregate,
            "Monitoring started"
        );

        let mut updates_open = true;
        loop {
            tokio::select! {
                update = config_updates.recv(), if updates_open => match update {
                    Some(config) => {
                        self.reload(config);
                    }
                    None => {
                        tracing::debug!("Config update channel closed");
                        updates_open = false;
                    }
                },
                _ = shutdown.recv() => {
                    tracing::info!("Supervisor received shutdown signal, stopping monitors");
                    break;
                }
            }
        }

        self.registry.shutdown();
    }

    /// Reconcile against a new configuration.
    pub fn reload(&mut self, config: PingyConfig) -> ReconcileReport {
        for section in restart_required(&self.config, &config) {
            tracing::warn!(section, "Configuration section changed; takes effect on restart");
        }

        let report = self.registry.apply(&config.targets, &config.aggregate);
        if report.is_noop() {
            tracing::debug!("Configuration reload changed nothing");
        }
        self.config = config;
        report
    }
}

/// Sections that differ between `old` and `new` but are only read at startup.
pub fn restart_required(old: &PingyConfig, new: &PingyConfig) -> Vec<&'static str> {
    let mut sections = Vec::new();
    if old.probe != new.probe {
        sections.push("probe");
    }
    if old.dns != new.dns {
        sections.push("dns");
    }
    if old.api != new.api {
        sections.push("api");
    }
    if old.observability != new.observability {
        sections.push("observability");
    }
    sections
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TargetConfig;

    #[test]
    fn test_restart_required_ignores_live_sections() {
        let old = PingyConfig::default();
        let mut new = old.clone();
        new.targets.push(TargetConfig::new("10.0.0.1", 10));
        new.aggregate.enabled = true;
        assert!(restart_required(&old, &new).is_empty());

        new.probe.attempts = 5;
        new.api.enabled = false;
        assert_eq!(restart_required(&old, &new), vec!["probe", "api"]);
    }
}
