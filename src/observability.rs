//! Tracing and logging setup module.
//!
//! All events go to stderr so the output tree and any stdout consumers stay
//! clean. Per-filter timings are emitted at `debug` under the
//! `dataset_preprocessing` target, per-class progress at `info`, and skipped
//! input files at `warn`.

use anyhow::Result;
use tracing_subscriber::prelude::*;

use crate::config::{LogFormat, LoggingConfig};

/// Build the event filter: `RUST_LOG` directives plus this crate's configured level.
pub fn build_env_filter(config: &LoggingConfig) -> Result<tracing_subscriber::EnvFilter> {
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(format!("dataset_filters={}", config.level).parse()?)
        .add_directive(format!("dataset_preprocessing={}", config.level).parse()?);
    Ok(filter)
}

/// Initialize structured logging with tracing and configuration
pub fn init_tracing_with_config(config: &LoggingConfig) -> Result<()> {
    let filter = build_env_filter(config)?;

    match config.format {
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .pretty()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_thread_ids(false)
                        .with_thread_names(false),
                )
                .try_init()?;
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_thread_ids(true)
                        .with_thread_names(true),
                )
                .try_init()?;
        }
    }

    tracing::info!(
        log_level = %config.level,
        log_format = ?config.format,
        "Tracing initialized with structured logging"
    );
    Ok(())
}
