//! OS signal handling.
//!
//! # Responsibilities
//! - Listen for SIGTERM/SIGINT and SIGHUP
//! - Translate signals to internal events
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - SIGHUP triggers config reload, not shutdown
//! - Non-unix platforms only get Ctrl+C

use std::path::PathBuf;

use tokio::sync::mpsc;

use crate::config::watcher::reload_into;
use crate::config::PingyConfig;
use crate::lifecycle::shutdown::Shutdown;

/// Run until a termination signal arrives, then trigger `shutdown`.
/// SIGHUP reloads `config_path` into `reload_tx`.
pub async fn handle_signals(
    shutdown: Shutdown,
    config_path: PathBuf,
    reload_tx: mpsc::UnboundedSender<PingyConfig>,
) -> std::io::Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut terminate = signal(SignalKind::terminate())?;
        let mut hangup = signal(SignalKind::hangup())?;
        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("SIGINT received");
                    break;
                }
                _ = terminate.recv() => {
                    tracing::info!("SIGTERM received");
                    break;
                }
                _ = hangup.recv() => {
                    tracing::info!(path = ?config_path, "SIGHUP received, reloading configuration");
                    reload_into(&config_path, &reload_tx);
                }
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = (&config_path, &reload_tx);
        tokio::signal::ctrl_c().await?;
        tracing::info!("Ctrl+C received");
    }

    shutdown.trigger();
    Ok(())
}
