//! Calendar event model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::utils::helpers::generate_uuid;

/// Title stored when an event is created or edited with an empty one
pub const DEFAULT_TITLE: &str = "Untitled";

/// One persisted calendar row. A multi-day event is a set of rows, one per
/// day, sharing a `group_id`; standalone events carry no group id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct CalendarEvent {
    pub id: String,
    pub owner: String,
    pub date: NaiveDate,
    pub start: Option<String>,
    pub end: Option<String>,
    pub title: String,
    pub course: String,
    #[serde(rename = "type")]
    #[sqlx(try_from = "String")]
    pub event_type: EventType,
    pub notes: Option<String>,
    pub group_id: Option<String>,
}

impl CalendarEvent {
    /// Build a fresh row for the given owner and day
    pub fn new(owner: &str, date: NaiveDate, fields: EventFields, group_id: Option<String>) -> Self {
        Self {
            id: generate_uuid(),
            owner: owner.to_string(),
            date,
            start: None,
            end: None,
            title: fields.title,
            course: fields.course,
            event_type: fields.event_type,
            notes: fields.notes,
            group_id,
        }
    }

    /// The shared group identifier, when one is actually set.
    ///
    /// Imported data can carry an empty string in `group_id`; that counts as
    /// ungrouped, same as `None`.
    pub fn group_ref(&self) -> Option<&str> {
        self.group_id.as_deref().filter(|group| !group.is_empty())
    }

    /// Overwrite the editable fields, leaving id, owner, date and group intact
    pub fn apply_fields(&mut self, fields: &EventFields) {
        self.title = fields.title.clone();
        self.course = fields.course.clone();
        self.event_type = fields.event_type;
        self.notes = fields.notes.clone();
    }

    /// The editable fields as a bag, for pre-filling an editor form
    pub fn fields(&self) -> EventFields {
        EventFields {
            title: self.title.clone(),
            course: self.course.clone(),
            event_type: self.event_type,
            notes: self.notes.clone(),
        }
    }
}

/// Event classification. Every non-default type carries a fixed display
/// color; only the default type uses the course field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    #[default]
    Submission,
    Exam,
    TermExam,
    MockExam,
    ScheduleChange,
    ClubActivity,
    LongBreak,
}

impl EventType {
    pub const ALL: [EventType; 7] = [
        EventType::Submission,
        EventType::Exam,
        EventType::TermExam,
        EventType::MockExam,
        EventType::ScheduleChange,
        EventType::ClubActivity,
        EventType::LongBreak,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Submission => "submission",
            EventType::Exam => "exam",
            EventType::TermExam => "term_exam",
            EventType::MockExam => "mock_exam",
            EventType::ScheduleChange => "schedule_change",
            EventType::ClubActivity => "club_activity",
            EventType::LongBreak => "long_break",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "submission" => Some(EventType::Submission),
            "exam" => Some(EventType::Exam),
            "term_exam" => Some(EventType::TermExam),
            "mock_exam" => Some(EventType::MockExam),
            "schedule_change" => Some(EventType::ScheduleChange),
            "club_activity" => Some(EventType::ClubActivity),
            "long_break" => Some(EventType::LongBreak),
            _ => None,
        }
    }

    /// Human-readable label for list views
    pub fn label(&self) -> &'static str {
        match self {
            EventType::Submission => "Assignment due",
            EventType::Exam => "Exam",
            EventType::TermExam => "Term exam",
            EventType::MockExam => "Mock exam",
            EventType::ScheduleChange => "Schedule change",
            EventType::ClubActivity => "Club activity",
            EventType::LongBreak => "Long break",
        }
    }

    /// Whether the course field applies to this type
    pub fn course_applies(&self) -> bool {
        matches!(self, EventType::Submission)
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<String> for EventType {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("unknown event type: {value}"))
    }
}

/// The field bag applied by create and update operations.
///
/// Dates are never part of it: a row's date is fixed at creation, and group
/// updates touch title, course, type and notes only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventFields {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub course: String,
    #[serde(rename = "type", default)]
    pub event_type: EventType,
    #[serde(default)]
    pub notes: Option<String>,
}

impl EventFields {
    /// Trim the text fields, substituting the placeholder title for blanks
    pub fn normalized(mut self) -> Self {
        let title = self.title.trim();
        self.title = if title.is_empty() {
            DEFAULT_TITLE.to_string()
        } else {
            title.to_string()
        };
        self.course = self.course.trim().to_string();
        self.notes = self
            .notes
            .as_deref()
            .map(str::trim)
            .filter(|notes| !notes.is_empty())
            .map(str::to_string);
        self
    }
}

/// A lenient event record accepted by the JSON import
#[derive(Debug, Clone, Deserialize)]
pub struct ImportedEvent {
    #[serde(default)]
    pub id: Option<String>,
    pub date: NaiveDate,
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub course: String,
    #[serde(rename = "type", default)]
    pub event_type: EventType,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub group_id: Option<String>,
}

impl ImportedEvent {
    /// Build the persisted row, assigning a fresh id where missing and
    /// re-homing the record under the importing owner
    pub fn into_event(self, owner: &str) -> CalendarEvent {
        CalendarEvent {
            id: self
                .id
                .filter(|id| !id.is_empty())
                .unwrap_or_else(generate_uuid),
            owner: owner.to_string(),
            date: self.date,
            start: self.start,
            end: self.end,
            title: self.title,
            course: self.course,
            event_type: self.event_type,
            notes: self.notes,
            group_id: self.group_id,
        }
    }
}
