//! Test store helpers
//!
//! This module builds event stores backed by the in-memory repository,
//! including a wrapper that injects backend failures at a chosen point in
//! a write sequence.

use std::sync::{Arc, Mutex, Once};

use async_trait::async_trait;
use StudyCal::database::{ChangeFeed, EventRepository, InMemoryEventRepository};
use StudyCal::models::{CalendarEvent, EventFields};
use StudyCal::services::EventService;
use StudyCal::utils::errors::{RepositoryError, RepositoryOperation, RepositoryResult};

static INIT: Once = Once::new();

/// Initialize test environment
pub fn init_test_env() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt::try_init();
    });
}

/// Store backed by a fresh in-memory repository
pub fn memory_store(owner: &str) -> EventService {
    init_test_env();
    EventService::new(Arc::new(InMemoryEventRepository::new()), owner)
}

/// Two stores for different owners sharing one backend
pub fn shared_backend_stores(first: &str, second: &str) -> (EventService, EventService) {
    init_test_env();
    let repository = Arc::new(InMemoryEventRepository::new());
    (
        EventService::new(repository.clone(), first),
        EventService::new(repository, second),
    )
}

/// Store plus a handle to its failure-injecting repository
pub fn flaky_store(owner: &str) -> (EventService, Arc<FlakyRepository>) {
    init_test_env();
    let repository = Arc::new(FlakyRepository::new());
    (EventService::new(repository.clone(), owner), repository)
}

/// Repository wrapper that starts failing upserts after a set number of
/// successful ones. Reads, deletes and subscriptions always pass through.
pub struct FlakyRepository {
    inner: InMemoryEventRepository,
    upserts_left: Mutex<Option<usize>>,
}

impl FlakyRepository {
    /// Never fails until `fail_upserts_after` arms it
    pub fn new() -> Self {
        Self {
            inner: InMemoryEventRepository::new(),
            upserts_left: Mutex::new(None),
        }
    }

    /// Let `successes` upserts through, then fail every later one
    pub fn fail_upserts_after(&self, successes: usize) {
        *self.upserts_left.lock().expect("budget lock") = Some(successes);
    }

    /// Stop injecting failures
    pub fn heal(&self) {
        *self.upserts_left.lock().expect("budget lock") = None;
    }

    fn take_upsert_slot(&self) -> RepositoryResult<()> {
        let mut left = self.upserts_left.lock().expect("budget lock");
        match left.as_mut() {
            Some(0) => Err(RepositoryError::new(
                RepositoryOperation::Upsert,
                "injected backend failure",
            )),
            Some(n) => {
                *n -= 1;
                Ok(())
            }
            None => Ok(()),
        }
    }
}

impl Default for FlakyRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventRepository for FlakyRepository {
    async fn list(&self, owner: &str) -> RepositoryResult<Vec<CalendarEvent>> {
        self.inner.list(owner).await
    }

    async fn upsert(&self, event: &CalendarEvent) -> RepositoryResult<CalendarEvent> {
        self.take_upsert_slot()?;
        self.inner.upsert(event).await
    }

    async fn delete_by_id(&self, owner: &str, id: &str) -> RepositoryResult<()> {
        self.inner.delete_by_id(owner, id).await
    }

    async fn delete_by_group(&self, owner: &str, group_id: &str) -> RepositoryResult<()> {
        self.inner.delete_by_group(owner, group_id).await
    }

    async fn delete_by_owner(&self, owner: &str) -> RepositoryResult<()> {
        self.inner.delete_by_owner(owner).await
    }

    async fn update_fields_by_group(
        &self,
        owner: &str,
        group_id: &str,
        fields: &EventFields,
    ) -> RepositoryResult<()> {
        self.inner
            .update_fields_by_group(owner, group_id, fields)
            .await
    }

    async fn subscribe(&self, owner: &str) -> RepositoryResult<ChangeFeed> {
        self.inner.subscribe(owner).await
    }
}
