//! PostgreSQL event repository
//!
//! Rows live in the `calendar_events` table; the change feed rides the
//! LISTEN/NOTIFY channel fired by the table trigger.

use async_stream::stream;
use async_trait::async_trait;
use sqlx::postgres::PgListener;
use sqlx::PgPool;
use tracing::warn;

use super::{ChangeFeed, ChangeNotice, EventRepository};
use crate::models::event::{CalendarEvent, EventFields};
use crate::utils::errors::{RepositoryError, RepositoryOperation, RepositoryResult};

/// NOTIFY channel fired by the calendar_events trigger
const CHANGE_CHANNEL: &str = "calendar_events_changed";

#[derive(Clone)]
pub struct PgEventRepository {
    pool: PgPool,
}

impl PgEventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventRepository for PgEventRepository {
    async fn list(&self, owner: &str) -> RepositoryResult<Vec<CalendarEvent>> {
        let events = sqlx::query_as::<_, CalendarEvent>(
            r#"
            SELECT id, owner, event_date AS date, start_time AS start, end_time AS "end",
                   title, course, event_type, notes, group_id
            FROM calendar_events
            WHERE owner = $1
            ORDER BY event_date ASC, id ASC
            "#,
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::new(RepositoryOperation::List, e))?;

        Ok(events)
    }

    async fn upsert(&self, event: &CalendarEvent) -> RepositoryResult<CalendarEvent> {
        let stored = sqlx::query_as::<_, CalendarEvent>(
            r#"
            INSERT INTO calendar_events (id, owner, event_date, start_time, end_time, title, course, event_type, notes, group_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (id) DO UPDATE SET
                owner = EXCLUDED.owner,
                event_date = EXCLUDED.event_date,
                start_time = EXCLUDED.start_time,
                end_time = EXCLUDED.end_time,
                title = EXCLUDED.title,
                course = EXCLUDED.course,
                event_type = EXCLUDED.event_type,
                notes = EXCLUDED.notes,
                group_id = EXCLUDED.group_id,
                updated_at = NOW()
            RETURNING id, owner, event_date AS date, start_time AS start, end_time AS "end",
                      title, course, event_type, notes, group_id
            "#,
        )
        .bind(&event.id)
        .bind(&event.owner)
        .bind(event.date)
        .bind(&event.start)
        .bind(&event.end)
        .bind(&event.title)
        .bind(&event.course)
        .bind(event.event_type.as_str())
        .bind(&event.notes)
        .bind(&event.group_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| RepositoryError::new(RepositoryOperation::Upsert, e))?;

        Ok(stored)
    }

    async fn delete_by_id(&self, owner: &str, id: &str) -> RepositoryResult<()> {
        sqlx::query("DELETE FROM calendar_events WHERE owner = $1 AND id = $2")
            .bind(owner)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::new(RepositoryOperation::DeleteRow, e))?;

        Ok(())
    }

    async fn delete_by_group(&self, owner: &str, group_id: &str) -> RepositoryResult<()> {
        sqlx::query("DELETE FROM calendar_events WHERE owner = $1 AND group_id = $2")
            .bind(owner)
            .bind(group_id)
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::new(RepositoryOperation::DeleteGroup, e))?;

        Ok(())
    }

    async fn delete_by_owner(&self, owner: &str) -> RepositoryResult<()> {
        sqlx::query("DELETE FROM calendar_events WHERE owner = $1")
            .bind(owner)
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::new(RepositoryOperation::DeleteAll, e))?;

        Ok(())
    }

    async fn update_fields_by_group(
        &self,
        owner: &str,
        group_id: &str,
        fields: &EventFields,
    ) -> RepositoryResult<()> {
        sqlx::query(
            r#"
            UPDATE calendar_events
            SET title = $3,
                course = $4,
                event_type = $5,
                notes = $6,
                updated_at = NOW()
            WHERE owner = $1 AND group_id = $2
            "#,
        )
        .bind(owner)
        .bind(group_id)
        .bind(&fields.title)
        .bind(&fields.course)
        .bind(fields.event_type.as_str())
        .bind(&fields.notes)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::new(RepositoryOperation::UpdateGroup, e))?;

        Ok(())
    }

    async fn subscribe(&self, owner: &str) -> RepositoryResult<ChangeFeed> {
        let mut listener = PgListener::connect_with(&self.pool)
            .await
            .map_err(|e| RepositoryError::new(RepositoryOperation::Subscribe, e))?;
        listener
            .listen(CHANGE_CHANNEL)
            .await
            .map_err(|e| RepositoryError::new(RepositoryOperation::Subscribe, e))?;

        let owner = owner.to_string();
        let feed = stream! {
            loop {
                match listener.recv().await {
                    Ok(notification) => {
                        if notification.payload() == owner {
                            yield ChangeNotice { owner: owner.clone() };
                        }
                    }
                    Err(e) => {
                        warn!(error = %e, "change feed connection lost");
                        break;
                    }
                }
            }
        };

        Ok(ChangeFeed::new(feed))
    }
}
