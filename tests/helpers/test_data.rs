//! Test data helpers for creating event drafts and dates

use chrono::NaiveDate;
use fake::faker::lorem::en::Sentence;
use fake::Fake;
use StudyCal::models::{EventFields, EventType};

/// Shorthand for a calendar date
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
}

/// Draft with fixed title and course
pub fn draft(title: &str, course: &str, event_type: EventType) -> EventFields {
    EventFields {
        title: title.to_string(),
        course: course.to_string(),
        event_type,
        notes: None,
    }
}

/// Draft with generated text, for tests that only care about structure
pub fn random_draft() -> EventFields {
    EventFields {
        title: Sentence(2..5).fake(),
        course: "Math".to_string(),
        event_type: EventType::Submission,
        notes: None,
    }
}
