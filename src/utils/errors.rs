//! Error handling for StudyCal
//!
//! This module defines the main error types used throughout the application
//! and provides a unified error handling strategy.

use chrono::NaiveDate;
use thiserror::Error;

/// Main error type for StudyCal application
#[derive(Error, Debug)]
pub enum StudyCalError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Partial write: {applied} of {attempted} rows persisted before the backend failed: {source}")]
    PartialWrite {
        applied: usize,
        attempted: usize,
        source: RepositoryError,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Event not found: {event_id}")]
    EventNotFound { event_id: String },

    #[error("Invalid date range: {start} to {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("Import payload is not a list of calendar events: {0}")]
    InvalidImport(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid state transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Event repository backend errors, tagged with the operation that failed
#[derive(Error, Debug)]
#[error("{operation} failed: {message}")]
pub struct RepositoryError {
    pub operation: RepositoryOperation,
    pub message: String,
}

impl RepositoryError {
    pub fn new(operation: RepositoryOperation, source: impl std::fmt::Display) -> Self {
        Self {
            operation,
            message: source.to_string(),
        }
    }
}

/// The remote row operation a repository error originated from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryOperation {
    List,
    Upsert,
    DeleteRow,
    DeleteGroup,
    DeleteAll,
    UpdateGroup,
    Subscribe,
}

impl std::fmt::Display for RepositoryOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RepositoryOperation::List => write!(f, "Event list"),
            RepositoryOperation::Upsert => write!(f, "Event upsert"),
            RepositoryOperation::DeleteRow => write!(f, "Event delete"),
            RepositoryOperation::DeleteGroup => write!(f, "Group delete"),
            RepositoryOperation::DeleteAll => write!(f, "Bulk delete"),
            RepositoryOperation::UpdateGroup => write!(f, "Group update"),
            RepositoryOperation::Subscribe => write!(f, "Change feed subscription"),
        }
    }
}

/// Result type alias for StudyCal operations
pub type Result<T> = std::result::Result<T, StudyCalError>;

/// Result type alias for repository operations
pub type RepositoryResult<T> = std::result::Result<T, RepositoryError>;

impl StudyCalError {
    /// Check if the error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            StudyCalError::Database(_) => false,
            StudyCalError::Migration(_) => false,
            StudyCalError::Repository(_) => true,
            StudyCalError::PartialWrite { .. } => false,
            StudyCalError::Config(_) => false,
            StudyCalError::EventNotFound { .. } => false,
            StudyCalError::InvalidDateRange { .. } => false,
            StudyCalError::InvalidImport(_) => false,
            StudyCalError::InvalidInput(_) => false,
            StudyCalError::InvalidStateTransition { .. } => false,
            StudyCalError::Serialization(_) => false,
        }
    }

    /// Check if the error was raised before any remote call was made
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            StudyCalError::InvalidDateRange { .. }
                | StudyCalError::InvalidImport(_)
                | StudyCalError::InvalidInput(_)
        )
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            StudyCalError::Database(_) => ErrorSeverity::Critical,
            StudyCalError::Migration(_) => ErrorSeverity::Critical,
            StudyCalError::Config(_) => ErrorSeverity::Critical,
            StudyCalError::PartialWrite { .. } => ErrorSeverity::Warning,
            StudyCalError::InvalidDateRange { .. } => ErrorSeverity::Info,
            StudyCalError::InvalidImport(_) => ErrorSeverity::Info,
            StudyCalError::InvalidInput(_) => ErrorSeverity::Info,
            _ => ErrorSeverity::Error,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}
