//! StudyCal event store
//!
//! A grouped multi-day event store for student course calendars. This library
//! provides the event model, a pluggable repository layer with Postgres and
//! in-memory backends, the store that keeps a local snapshot in sync with the
//! backend, and the editor and delete flows layered on top of it.

#![allow(non_snake_case)]

pub mod calendar;
pub mod config;
pub mod database;
pub mod flows;
pub mod models;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{Result, StudyCalError};

// Re-export main components for easy access
pub use database::{ChangeFeed, ChangeNotice, EventRepository, InMemoryEventRepository, PgEventRepository};
pub use flows::{DeleteFlow, EditorForm};
pub use models::{CalendarEvent, EventFields, EventType};
pub use services::EventService;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
