//! Deterministic colors for calendar chips
//!
//! Event types with a fixed meaning get a fixed color; everything else is
//! colored by course name so the same course always renders the same hue.

use crate::models::event::EventType;

/// Fallback for events without a course
pub const DEFAULT_COURSE_COLOR: &str = "#64748b";

/// Stable color for a course name, hashed into an HSL hue.
///
/// Hashes UTF-16 code units so names in any script spread across the
/// hue wheel.
pub fn course_color(course: &str) -> String {
    if course.is_empty() {
        return DEFAULT_COURSE_COLOR.to_string();
    }

    let mut hue: u32 = 0;
    for unit in course.encode_utf16() {
        hue = (hue * 31 + u32::from(unit)) % 360;
    }
    format!("hsl({hue}, 70%, 50%)")
}

/// Fixed color for event types that always look the same, regardless of
/// course. Submissions have none and fall back to the course color.
pub fn type_color(event_type: EventType) -> Option<&'static str> {
    match event_type {
        EventType::ScheduleChange => Some("#8a9990"),
        EventType::Exam => Some("#e63946"),
        EventType::TermExam => Some("#f7a500"),
        EventType::MockExam => Some("#009c88"),
        EventType::ClubActivity => Some("#00c3ff"),
        EventType::LongBreak => Some("#ff6b9d"),
        EventType::Submission => None,
    }
}

/// Color for one event's chip: the type color when the type has one,
/// otherwise the course color
pub fn event_color(event_type: EventType, course: &str) -> String {
    match type_color(event_type) {
        Some(color) => color.to_string(),
        None => course_color(course),
    }
}
