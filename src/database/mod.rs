//! Database module
//!
//! This module handles database connections and event storage backends

pub mod connection;
pub mod repositories;

// Re-export commonly used database components
pub use connection::{create_pool, run_migrations, DatabaseConfig, DatabasePool};
pub use repositories::{
    ChangeFeed, ChangeNotice, EventRepository, InMemoryEventRepository, PgEventRepository,
};
