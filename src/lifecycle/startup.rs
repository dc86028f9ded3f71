//! Startup orchestration.
//!
//! # Responsibilities
//! - Initialize subsystems in dependency order
//! - Start background tasks (supervisor, API, watcher, signals)
//! - Wait for shutdown and let every task drain
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Metrics before monitors, so the first probes are recorded
//! - A failing config watcher is logged, not fatal (SIGHUP still reloads)

use std::error::Error;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::broadcast;

use crate::api;
use crate::config::watcher::ConfigWatcher;
use crate::config::PingyConfig;
use crate::health::{MonitorRegistry, MonitorSettings};
use crate::lifecycle::shutdown::Shutdown;
use crate::lifecycle::signals::handle_signals;
use crate::lifecycle::supervisor::Supervisor;
use crate::net::{build_prober, DnsResolver};
use crate::observability::metrics;

/// Capacity of the status event channel.
pub const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Run the daemon with an already loaded configuration.
pub async fn run(config_path: PathBuf, config: PingyConfig) -> Result<(), Box<dyn Error>> {
    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let resolver = Arc::new(DnsResolver::new(&config.dns));
    let prober = build_prober(&config.probe);
    let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
    let registry = MonitorRegistry::new(
        resolver,
        prober,
        MonitorSettings::from(&config.probe),
        events,
    );

    tracing::info!(
        targets = config.targets.len(),
        method = ?config.probe.method,
        timeout_ms = config.probe.timeout_ms,
        attempts = config.probe.attempts,
        aggregate = config.aggregate.enabled,
        "Configuration loaded"
    );

    let shutdown = Shutdown::new();
    let (watcher, config_updates) = ConfigWatcher::new(&config_path);
    let reload_tx = watcher.sender();
    let _watcher = match watcher.run() {
        Ok(w) => Some(w),
        Err(e) => {
            tracing::warn!(error = %e, "Config watcher unavailable; reload with SIGHUP");
            None
        }
    };

    let api_task = if config.api.enabled {
        let listener = TcpListener::bind(&config.api.bind_address).await?;
        let registry_board = registry.board();
        let api_shutdown = shutdown.subscribe();
        Some(tokio::spawn(async move {
            if let Err(e) = api::serve(listener, registry_board, api_shutdown).await {
                tracing::error!(error = %e, "Status API failed");
            }
        }))
    } else {
        None
    };

    let supervisor = Supervisor::new(registry, config);
    let supervisor_task = tokio::spawn(supervisor.run(config_updates, shutdown.subscribe()));

    handle_signals(shutdown.clone(), config_path, reload_tx).await?;

    supervisor_task.await?;
    if let Some(task) = api_task {
        task.await?;
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
