//! Grouped event store
//!
//! The event service owns the loaded snapshot of one owner's calendar and
//! the group semantics layered over plain rows: a multi-day event is one row
//! per day sharing a group id. Group consistency is restored only by the
//! group-aware operations here; loading never validates or repairs it.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::database::repositories::{ChangeFeed, EventRepository};
use crate::flows::delete::DeleteDecision;
use crate::models::event::{CalendarEvent, EventFields, ImportedEvent};
use crate::utils::errors::{RepositoryError, Result, StudyCalError};
use crate::utils::helpers::generate_uuid;
use crate::utils::logging::{log_event_action, log_group_action, log_partial_write};

/// Group membership of one event, resolved against the loaded snapshot
#[derive(Debug, Clone)]
pub struct GroupMembership {
    /// True iff the event carries a non-empty group id shared by at least
    /// two loaded rows. A leftover unique group id does not count.
    pub is_grouped: bool,
    /// Rows sharing the event's group id, date-ascending. Holds just the
    /// event itself when it is standalone.
    pub members: Vec<CalendarEvent>,
}

/// Result of a JSON import
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
}

/// Event service holding one owner's calendar
#[derive(Clone)]
pub struct EventService {
    repository: Arc<dyn EventRepository>,
    owner: String,
    events: Arc<RwLock<Vec<CalendarEvent>>>,
}

impl EventService {
    /// Create a new EventService instance
    pub fn new(repository: Arc<dyn EventRepository>, owner: impl Into<String>) -> Self {
        Self {
            repository,
            owner: owner.into(),
            events: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Re-fetch the full event collection and replace the snapshot
    pub async fn load(&self) -> Result<Vec<CalendarEvent>> {
        debug!(owner = %self.owner, "Loading events");
        let events = self.repository.list(&self.owner).await?;
        *self.write_events() = events.clone();
        info!(owner = %self.owner, count = events.len(), "Event snapshot loaded");
        Ok(events)
    }

    /// Clone of the currently loaded events, date-ascending
    pub fn snapshot(&self) -> Vec<CalendarEvent> {
        self.read_events().clone()
    }

    /// Feed of backend change notices for this owner. The feed carries no
    /// row data; call [`load`](Self::load) to pick up what changed.
    pub async fn subscribe(&self) -> Result<ChangeFeed> {
        let feed = self.repository.subscribe(&self.owner).await?;
        Ok(feed)
    }

    /// Look up a loaded event by id
    pub fn find_event(&self, id: &str) -> Option<CalendarEvent> {
        self.read_events()
            .iter()
            .find(|event| event.id == id)
            .cloned()
    }

    /// Resolve how an event relates to its group.
    ///
    /// Pure query over the loaded snapshot; membership is counted fresh on
    /// every call rather than remembered from earlier resolutions.
    pub fn group_membership(&self, event: &CalendarEvent) -> GroupMembership {
        let members: Vec<CalendarEvent> = match event.group_ref() {
            Some(group_id) => self
                .read_events()
                .iter()
                .filter(|candidate| candidate.group_ref() == Some(group_id))
                .cloned()
                .collect(),
            None => Vec::new(),
        };

        if members.len() > 1 {
            GroupMembership {
                is_grouped: true,
                members,
            }
        } else {
            GroupMembership {
                is_grouped: false,
                members: if members.is_empty() {
                    vec![event.clone()]
                } else {
                    members
                },
            }
        }
    }

    /// Create one standalone event on the given day
    pub async fn create_single(&self, fields: EventFields, date: NaiveDate) -> Result<CalendarEvent> {
        let fields = fields.normalized();
        let event = CalendarEvent::new(&self.owner, date, fields, None);
        let stored = self.repository.upsert(&event).await?;
        log_event_action(&self.owner, &stored.id, "created");
        self.load().await?;
        Ok(stored)
    }

    /// Create one row per day from start through end inclusive, all sharing
    /// a fresh group id, inserted in ascending date order.
    ///
    /// The range is validated before any remote call; an inverted range
    /// leaves the backend untouched. The insert loop stops at the first
    /// backend failure, reporting how many rows were already written.
    pub async fn create_range(
        &self,
        fields: EventFields,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<String> {
        if end < start {
            warn!(owner = %self.owner, %start, %end, "Rejecting inverted date range");
            return Err(StudyCalError::InvalidDateRange { start, end });
        }

        let fields = fields.normalized();
        let group_id = generate_uuid();
        let rows: Vec<CalendarEvent> = start
            .iter_days()
            .take_while(|date| *date <= end)
            .map(|date| CalendarEvent::new(&self.owner, date, fields.clone(), Some(group_id.clone())))
            .collect();

        let attempted = rows.len();
        for (applied, row) in rows.iter().enumerate() {
            if let Err(source) = self.repository.upsert(row).await {
                return Err(self.sequence_error(applied, attempted, source));
            }
        }

        log_group_action(&self.owner, &group_id, "created", attempted);
        self.load().await?;
        Ok(group_id)
    }

    /// Apply new fields to an event.
    ///
    /// If the target currently belongs to a group with more than one loaded
    /// row, the fields fan out to every row of the group; otherwise only the
    /// target row is rewritten. Dates are never touched either way. The
    /// membership count is re-read on every call, so an event whose group
    /// shrank to one row is updated standalone.
    pub async fn update_event(&self, id: &str, fields: EventFields) -> Result<()> {
        let fields = fields.normalized();
        let target = self
            .find_event(id)
            .ok_or_else(|| StudyCalError::EventNotFound {
                event_id: id.to_string(),
            })?;

        let membership = self.group_membership(&target);
        match target.group_ref() {
            Some(group_id) if membership.is_grouped => {
                self.repository
                    .update_fields_by_group(&self.owner, group_id, &fields)
                    .await?;
                log_group_action(&self.owner, group_id, "updated", membership.members.len());
            }
            _ => {
                let mut updated = target.clone();
                updated.apply_fields(&fields);
                self.repository.upsert(&updated).await?;
                log_event_action(&self.owner, id, "updated");
            }
        }

        self.load().await?;
        Ok(())
    }

    /// Delete exactly one row
    pub async fn delete_event(&self, id: &str) -> Result<()> {
        self.repository.delete_by_id(&self.owner, id).await?;
        log_event_action(&self.owner, id, "deleted");
        self.load().await?;
        Ok(())
    }

    /// Delete every row sharing the group id
    pub async fn delete_group(&self, group_id: &str) -> Result<()> {
        let rows = self
            .read_events()
            .iter()
            .filter(|event| event.group_ref() == Some(group_id))
            .count();
        self.repository.delete_by_group(&self.owner, group_id).await?;
        log_group_action(&self.owner, group_id, "deleted", rows);
        self.load().await?;
        Ok(())
    }

    /// Delete every row belonging to the owner
    pub async fn clear_all(&self) -> Result<()> {
        self.repository.delete_by_owner(&self.owner).await?;
        info!(owner = %self.owner, "All events cleared");
        self.load().await?;
        Ok(())
    }

    /// Execute a resolved delete decision; returns whether anything was
    /// deleted. `Keep` performs no remote call at all.
    pub async fn apply_delete(&self, decision: &DeleteDecision) -> Result<bool> {
        match decision {
            DeleteDecision::RemoveGroup { group_id } => {
                self.delete_group(group_id).await?;
                Ok(true)
            }
            DeleteDecision::RemoveRow { id } => {
                self.delete_event(id).await?;
                Ok(true)
            }
            DeleteDecision::Keep => Ok(false),
        }
    }

    /// Serialize the loaded events as a pretty JSON array
    pub fn export_json(&self) -> Result<String> {
        let events = self.read_events();
        Ok(serde_json::to_string_pretty(&*events)?)
    }

    /// Import a JSON array of event records.
    ///
    /// The whole payload is validated before any remote call; records
    /// missing an id get a fresh one and every record is re-homed under this
    /// store's owner. Rows are upserted sequentially and the loop stops at
    /// the first backend failure, reporting how many rows were written.
    pub async fn import_events(&self, payload: &str) -> Result<ImportSummary> {
        let records: Vec<ImportedEvent> = serde_json::from_str(payload)
            .map_err(|e| StudyCalError::InvalidImport(e.to_string()))?;

        let rows: Vec<CalendarEvent> = records
            .into_iter()
            .map(|record| record.into_event(&self.owner))
            .collect();

        let attempted = rows.len();
        for (applied, row) in rows.iter().enumerate() {
            if let Err(source) = self.repository.upsert(row).await {
                return Err(self.sequence_error(applied, attempted, source));
            }
        }

        info!(owner = %self.owner, imported = attempted, "Import completed");
        self.load().await?;
        Ok(ImportSummary {
            imported: attempted,
        })
    }

    fn sequence_error(
        &self,
        applied: usize,
        attempted: usize,
        source: RepositoryError,
    ) -> StudyCalError {
        log_partial_write(&self.owner, applied, attempted, &source.to_string());
        if applied == 0 {
            StudyCalError::Repository(source)
        } else {
            StudyCalError::PartialWrite {
                applied,
                attempted,
                source,
            }
        }
    }

    // Snapshot writes replace the whole Vec, so a poisoned lock still holds
    // a consistent list.
    fn read_events(&self) -> RwLockReadGuard<'_, Vec<CalendarEvent>> {
        self.events.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_events(&self) -> RwLockWriteGuard<'_, Vec<CalendarEvent>> {
        self.events.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for EventService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventService")
            .field("owner", &self.owner)
            .finish_non_exhaustive()
    }
}
