//! Services module
//!
//! This module contains business logic services

pub mod events;

// Re-export commonly used services
pub use events::{EventService, GroupMembership, ImportSummary};
