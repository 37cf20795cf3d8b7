//! In-memory event repository
//!
//! Keeps rows in a process-local map. Used by the test suites and as a
//! lightweight local backend; mirrors the PostgreSQL backend's behavior,
//! including the per-owner change feed.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_stream::stream;
use async_trait::async_trait;
use tokio::sync::broadcast;

use super::{ChangeFeed, ChangeNotice, EventRepository};
use crate::models::event::{CalendarEvent, EventFields};
use crate::utils::errors::RepositoryResult;

const FEED_CAPACITY: usize = 64;

#[derive(Debug)]
pub struct InMemoryEventRepository {
    rows: RwLock<HashMap<String, CalendarEvent>>,
    feed_tx: broadcast::Sender<ChangeNotice>,
}

impl InMemoryEventRepository {
    pub fn new() -> Self {
        let (feed_tx, _) = broadcast::channel(FEED_CAPACITY);
        Self {
            rows: RwLock::new(HashMap::new()),
            feed_tx,
        }
    }

    /// Number of stored rows across all owners
    pub fn row_count(&self) -> usize {
        self.read_rows().len()
    }

    // Writers replace whole entries, so a poisoned lock still holds a
    // consistent map.
    fn read_rows(&self) -> RwLockReadGuard<'_, HashMap<String, CalendarEvent>> {
        self.rows.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_rows(&self) -> RwLockWriteGuard<'_, HashMap<String, CalendarEvent>> {
        self.rows.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn notify(&self, owner: &str) {
        let _ = self.feed_tx.send(ChangeNotice {
            owner: owner.to_string(),
        });
    }
}

impl Default for InMemoryEventRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventRepository for InMemoryEventRepository {
    async fn list(&self, owner: &str) -> RepositoryResult<Vec<CalendarEvent>> {
        let mut events: Vec<CalendarEvent> = self
            .read_rows()
            .values()
            .filter(|event| event.owner == owner)
            .cloned()
            .collect();
        events.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));
        Ok(events)
    }

    async fn upsert(&self, event: &CalendarEvent) -> RepositoryResult<CalendarEvent> {
        self.write_rows().insert(event.id.clone(), event.clone());
        self.notify(&event.owner);
        Ok(event.clone())
    }

    async fn delete_by_id(&self, owner: &str, id: &str) -> RepositoryResult<()> {
        let removed = {
            let mut rows = self.write_rows();
            match rows.get(id) {
                Some(stored) if stored.owner == owner => rows.remove(id).is_some(),
                _ => false,
            }
        };
        if removed {
            self.notify(owner);
        }
        Ok(())
    }

    async fn delete_by_group(&self, owner: &str, group_id: &str) -> RepositoryResult<()> {
        let removed = {
            let mut rows = self.write_rows();
            let before = rows.len();
            rows.retain(|_, event| {
                !(event.owner == owner && event.group_id.as_deref() == Some(group_id))
            });
            before != rows.len()
        };
        if removed {
            self.notify(owner);
        }
        Ok(())
    }

    async fn delete_by_owner(&self, owner: &str) -> RepositoryResult<()> {
        let removed = {
            let mut rows = self.write_rows();
            let before = rows.len();
            rows.retain(|_, event| event.owner != owner);
            before != rows.len()
        };
        if removed {
            self.notify(owner);
        }
        Ok(())
    }

    async fn update_fields_by_group(
        &self,
        owner: &str,
        group_id: &str,
        fields: &EventFields,
    ) -> RepositoryResult<()> {
        let touched = {
            let mut rows = self.write_rows();
            let mut touched = 0;
            for event in rows.values_mut() {
                if event.owner == owner && event.group_id.as_deref() == Some(group_id) {
                    event.apply_fields(fields);
                    touched += 1;
                }
            }
            touched
        };
        if touched > 0 {
            self.notify(owner);
        }
        Ok(())
    }

    async fn subscribe(&self, owner: &str) -> RepositoryResult<ChangeFeed> {
        let mut rx = self.feed_tx.subscribe();
        let owner = owner.to_string();
        let feed = stream! {
            loop {
                match rx.recv().await {
                    Ok(notice) if notice.owner == owner => yield notice,
                    Ok(_) => continue,
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        };
        Ok(ChangeFeed::new(feed))
    }
}
