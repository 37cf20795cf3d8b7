//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging utilities
//! for the StudyCal application.

use crate::config::LoggingConfig;
use crate::utils::errors::Result;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging based on configuration
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let file_appender = tracing_appender::rolling::daily(&config.file_path, "studycal.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .with(tracing_subscriber::fmt::layer().with_writer(non_blocking))
        .init();

    info!("Logging initialized with level: {}", config.level);
    Ok(())
}

/// Log single-event actions with structured data
pub fn log_event_action(owner: &str, event_id: &str, action: &str) {
    info!(
        owner = owner,
        event_id = event_id,
        action = action,
        "Event action performed"
    );
}

/// Log group-wide actions with the affected row count
pub fn log_group_action(owner: &str, group_id: &str, action: &str, rows: usize) {
    info!(
        owner = owner,
        group_id = group_id,
        action = action,
        rows = rows,
        "Group action performed"
    );
}

/// Log an interrupted multi-row write
pub fn log_partial_write(owner: &str, applied: usize, attempted: usize, error: &str) {
    warn!(
        owner = owner,
        applied = applied,
        attempted = attempted,
        error = error,
        "Multi-row write interrupted"
    );
}
