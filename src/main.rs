use anyhow::{Context, Result};
use dataset_filters::config::{AppConfig, LoggingConfig};
use dataset_filters::errors::error_logging::log_config_error;
use dataset_filters::observability;
use dataset_filters::DatasetProcessor;
use tracing::info;

fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;

    // Fall back to default logging so a bad LOG_LEVEL is still reported
    let logging = match config.logging.validate() {
        Ok(()) => config.logging.clone(),
        Err(_) => LoggingConfig::default(),
    };
    observability::init_tracing_with_config(&logging).context("Failed to initialize tracing")?;

    if let Err(e) = config.validate() {
        log_config_error(&e, "AppConfig", "validate");
        return Err(e).context("Configuration validation failed");
    }

    info!(
        input_root = %config.dataset.input_root.display(),
        output_root = %config.dataset.output_root.display(),
        "Configuration validated successfully"
    );

    let summary = DatasetProcessor::new(config.dataset)
        .run()
        .context("Dataset filtering aborted")?;

    info!(
        summary = %serde_json::to_string(&summary).context("Failed to serialize run summary")?,
        "Run summary"
    );

    Ok(())
}
