//! Event repository backends
//!
//! This module defines the remote storage contract the event store is
//! written against, and the backends implementing it.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use futures::stream::{BoxStream, Stream, StreamExt};

use crate::models::event::{CalendarEvent, EventFields};
use crate::utils::errors::RepositoryResult;

// Re-export repositories
pub use memory::InMemoryEventRepository;
pub use postgres::PgEventRepository;

/// A change observed on some owner's calendar rows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeNotice {
    pub owner: String,
}

/// Stream of change notices for one owner.
///
/// The feed is advisory: consumers reload when a notice arrives, but every
/// store operation stays correct if the feed is never read.
pub struct ChangeFeed {
    stream: BoxStream<'static, ChangeNotice>,
}

impl ChangeFeed {
    pub fn new(stream: impl Stream<Item = ChangeNotice> + Send + 'static) -> Self {
        Self {
            stream: stream.boxed(),
        }
    }

    /// Wait for the next change notice; `None` once the feed closes
    pub async fn recv(&mut self) -> Option<ChangeNotice> {
        self.stream.next().await
    }
}

impl std::fmt::Debug for ChangeFeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeFeed").finish_non_exhaustive()
    }
}

/// Remote storage contract for calendar rows.
///
/// Every call is scoped to an owner. `list` returns rows ascending by date
/// with ties broken by id, so callers always see a deterministic sequence.
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Fetch every row belonging to the owner, date-ascending
    async fn list(&self, owner: &str) -> RepositoryResult<Vec<CalendarEvent>>;

    /// Insert the row, or replace the stored one carrying the same id
    async fn upsert(&self, event: &CalendarEvent) -> RepositoryResult<CalendarEvent>;

    /// Delete one row by id
    async fn delete_by_id(&self, owner: &str, id: &str) -> RepositoryResult<()>;

    /// Delete every row sharing the group id
    async fn delete_by_group(&self, owner: &str, group_id: &str) -> RepositoryResult<()>;

    /// Delete every row belonging to the owner
    async fn delete_by_owner(&self, owner: &str) -> RepositoryResult<()>;

    /// Overwrite title, course, type and notes on every row of the group,
    /// leaving dates and ids untouched
    async fn update_fields_by_group(
        &self,
        owner: &str,
        group_id: &str,
        fields: &EventFields,
    ) -> RepositoryResult<()>;

    /// Open a change feed yielding a notice whenever the owner's rows change
    async fn subscribe(&self, owner: &str) -> RepositoryResult<ChangeFeed>;
}
