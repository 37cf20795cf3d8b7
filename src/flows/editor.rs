//! Event editor form
//!
//! Collects the editor's field values and resolves what saving them means:
//! a fresh standalone event, a fresh multi-day range, or an update to an
//! existing event. The store fans a grouped update out to every member of
//! the group, so the form never needs to know about groups.

use chrono::NaiveDate;

use crate::models::event::{CalendarEvent, EventFields};
use crate::services::events::EventService;
use crate::utils::errors::{Result, StudyCalError};

/// Field values collected by the event editor
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EditorForm {
    /// Id of the event being edited, absent when creating
    pub event_id: Option<String>,
    /// First (or only) day of the event
    pub date: Option<NaiveDate>,
    /// Last day of the range, read only when `multi_day` is on
    pub end_date: Option<NaiveDate>,
    /// Whether the multi-day toggle is on
    pub multi_day: bool,
    pub fields: EventFields,
}

/// Store operation a submitted form resolves to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveAction {
    CreateSingle { date: NaiveDate },
    CreateRange { start: NaiveDate, end: NaiveDate },
    UpdateExisting { id: String },
}

/// Result of submitting a form
#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    Created(CalendarEvent),
    RangeCreated { group_id: String, days: usize },
    Updated { id: String },
}

impl EditorForm {
    /// Blank form for a new event on the given day
    pub fn for_new(date: NaiveDate) -> Self {
        Self {
            date: Some(date),
            ..Self::default()
        }
    }

    /// Form pre-filled from an existing event. The multi-day toggle starts
    /// off: editing never moves or extends dates.
    pub fn for_event(event: &CalendarEvent) -> Self {
        Self {
            event_id: Some(event.id.clone()),
            date: Some(event.date),
            end_date: None,
            multi_day: false,
            fields: event.fields(),
        }
    }

    /// Resolve which store operation this form stands for
    pub fn save_action(&self) -> Result<SaveAction> {
        if let Some(id) = &self.event_id {
            return Ok(SaveAction::UpdateExisting { id: id.clone() });
        }

        let date = self
            .date
            .ok_or_else(|| StudyCalError::InvalidInput("event needs a date".to_string()))?;

        if self.multi_day {
            let end = self.end_date.ok_or_else(|| {
                StudyCalError::InvalidInput("multi-day events need an end date".to_string())
            })?;
            return Ok(SaveAction::CreateRange { start: date, end });
        }

        Ok(SaveAction::CreateSingle { date })
    }

    /// Submit the form against the store.
    ///
    /// The course field only applies to the default event type; for any
    /// other type it is dropped on save, matching the editor disabling the
    /// course input.
    pub async fn submit(mut self, events: &EventService) -> Result<SaveOutcome> {
        if !self.fields.event_type.course_applies() {
            self.fields.course.clear();
        }

        match self.save_action()? {
            SaveAction::CreateSingle { date } => {
                let created = events.create_single(self.fields, date).await?;
                Ok(SaveOutcome::Created(created))
            }
            SaveAction::CreateRange { start, end } => {
                let group_id = events.create_range(self.fields, start, end).await?;
                let days = (end - start).num_days() as usize + 1;
                Ok(SaveOutcome::RangeCreated { group_id, days })
            }
            SaveAction::UpdateExisting { id } => {
                events.update_event(&id, self.fields).await?;
                Ok(SaveOutcome::Updated { id })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 4, d).unwrap()
    }

    #[test]
    fn new_form_saves_a_single_event() {
        let form = EditorForm::for_new(day(10));
        assert_eq!(
            form.save_action().unwrap(),
            SaveAction::CreateSingle { date: day(10) }
        );
    }

    #[test]
    fn multi_day_form_saves_a_range() {
        let mut form = EditorForm::for_new(day(10));
        form.multi_day = true;
        form.end_date = Some(day(12));
        assert_eq!(
            form.save_action().unwrap(),
            SaveAction::CreateRange {
                start: day(10),
                end: day(12),
            }
        );
    }

    #[test]
    fn multi_day_without_end_date_is_rejected() {
        let mut form = EditorForm::for_new(day(10));
        form.multi_day = true;
        assert!(matches!(
            form.save_action(),
            Err(StudyCalError::InvalidInput(_))
        ));
    }

    #[test]
    fn form_with_event_id_updates_regardless_of_toggle() {
        let mut form = EditorForm::for_new(day(10));
        form.event_id = Some("row-1".to_string());
        form.multi_day = true;
        assert_eq!(
            form.save_action().unwrap(),
            SaveAction::UpdateExisting {
                id: "row-1".to_string()
            }
        );
    }

    #[test]
    fn form_without_date_is_rejected() {
        let form = EditorForm::default();
        assert!(matches!(
            form.save_action(),
            Err(StudyCalError::InvalidInput(_))
        ));
    }
}
