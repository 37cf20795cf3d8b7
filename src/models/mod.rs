//! Data models module
//!
//! This module contains all data structures used throughout the application

pub mod event;

// Re-export commonly used models
pub use event::{CalendarEvent, EventFields, EventType, ImportedEvent, DEFAULT_TITLE};
