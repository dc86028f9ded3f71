//! pingy: network reachability monitor daemon.
//!
//! # Architecture Overview
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────┐
//!   │                           PINGY                              │
//!   │                                                              │
//!   │  config file ──▶ config ──▶ supervisor ──▶ MonitorRegistry   │
//!   │  (watch/HUP)                                  │              │
//!   │                          ┌────────────────────┼──────────┐   │
//!   │                          ▼                    ▼          ▼   │
//!   │                   TargetMonitor        TargetMonitor   ...   │
//!   │                   resolve → probe → debounce                 │
//!   │                          │ transition         │              │
//!   │                          ▼                    ▼              │
//!   │                        AggregateMonitor ("all up")           │
//!   │                          │                                   │
//!   │                          ▼                                   │
//!   │            StatusBoard ──▶ status API / metrics / logs       │
//!   └──────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use pingy::config::load_config;
use pingy::lifecycle::startup;
use pingy::observability::logging::init_logging;

#[derive(Parser)]
#[command(name = "pingy")]
#[command(about = "Monitor reachability of network targets", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "pingy.toml")]
    config: PathBuf,

    /// Validate the configuration and exit.
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}: {}", cli.config.display(), e);
            return ExitCode::FAILURE;
        }
    };

    if cli.check {
        println!(
            "{}: OK ({} targets, aggregate {})",
            cli.config.display(),
            config.targets.len(),
            if config.aggregate.enabled { "enabled" } else { "disabled" }
        );
        return ExitCode::SUCCESS;
    }

    if let Err(e) = init_logging(&config.observability) {
        eprintln!("Failed to initialize logging: {}", e);
        return ExitCode::FAILURE;
    }

    tracing::info!("pingy v{} starting", env!("CARGO_PKG_VERSION"));

    match startup::run(cli.config, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Fatal error");
            ExitCode::FAILURE
        }
    }
}
