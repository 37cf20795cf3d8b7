//! Month grid and dashboard projections over a loaded event list
//!
//! Everything here is a pure function over an event slice. The store owns
//! the data; these helpers shape it for rendering.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};

use crate::models::event::{CalendarEvent, EventType};

/// Most chips shown inside one day cell
pub const DAY_EVENT_LIMIT: usize = 4;

/// Most rows shown in the upcoming list
pub const UPCOMING_LIMIT: usize = 20;

/// Deepest heat shade a day cell can reach
pub const MAX_HEAT_LEVEL: usize = 4;

/// Active course and type filters, both optional
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventFilter {
    pub course: Option<String>,
    pub event_type: Option<EventType>,
}

impl EventFilter {
    pub fn matches(&self, event: &CalendarEvent) -> bool {
        if let Some(course) = &self.course {
            if &event.course != course {
                return false;
            }
        }
        if let Some(event_type) = self.event_type {
            if event.event_type != event_type {
                return false;
            }
        }
        true
    }
}

/// Counters for the dashboard header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardStats {
    /// Events falling inside the displayed month
    pub in_month: usize,
    /// All events passing the filter
    pub total: usize,
    /// Events due within the coming week, today included
    pub within_week: usize,
}

/// Cells of a month grid laid out Monday-first. Leading `None` cells pad
/// the first week; every following cell is one day of the month in order.
/// An invalid year/month yields an empty grid.
pub fn month_matrix(year: i32, month: u32) -> Vec<Option<NaiveDate>> {
    let first = match NaiveDate::from_ymd_opt(year, month, 1) {
        Some(first) => first,
        None => return Vec::new(),
    };

    let offset = first.weekday().num_days_from_monday() as usize;
    let mut cells: Vec<Option<NaiveDate>> = vec![None; offset];
    cells.extend(
        first
            .iter_days()
            .take_while(|day| day.month() == month)
            .map(Some),
    );
    cells
}

/// Chips for one day cell: filtered, title-sorted, capped
pub fn events_on<'a>(
    events: &'a [CalendarEvent],
    date: NaiveDate,
    filter: &EventFilter,
) -> Vec<&'a CalendarEvent> {
    let mut day_events: Vec<&CalendarEvent> = events
        .iter()
        .filter(|event| event.date == date && filter.matches(event))
        .collect();
    day_events.sort_by(|a, b| a.title.cmp(&b.title));
    day_events.truncate(DAY_EVENT_LIMIT);
    day_events
}

/// Filtered event count per day, for heat shading
pub fn day_counts(events: &[CalendarEvent], filter: &EventFilter) -> HashMap<NaiveDate, usize> {
    let mut counts = HashMap::new();
    for event in events.iter().filter(|event| filter.matches(event)) {
        *counts.entry(event.date).or_insert(0) += 1;
    }
    counts
}

/// Heat shade for a day cell, saturating at the deepest level
pub fn heat_level(count: usize) -> usize {
    count.min(MAX_HEAT_LEVEL)
}

/// Next events from today onward, date-sorted and capped
pub fn upcoming<'a>(
    events: &'a [CalendarEvent],
    today: NaiveDate,
    filter: &EventFilter,
) -> Vec<&'a CalendarEvent> {
    let mut ahead: Vec<&CalendarEvent> = events
        .iter()
        .filter(|event| event.date >= today && filter.matches(event))
        .collect();
    ahead.sort_by_key(|event| event.date);
    ahead.truncate(UPCOMING_LIMIT);
    ahead
}

/// Dashboard counters for the displayed month
pub fn dashboard_stats(
    events: &[CalendarEvent],
    year: i32,
    month: u32,
    today: NaiveDate,
    filter: &EventFilter,
) -> DashboardStats {
    let filtered: Vec<&CalendarEvent> =
        events.iter().filter(|event| filter.matches(event)).collect();

    let in_month = filtered
        .iter()
        .filter(|event| event.date.year() == year && event.date.month() == month)
        .count();

    let within_week = filtered
        .iter()
        .filter(|event| {
            let days_ahead = (event.date - today).num_days();
            (0..=7).contains(&days_ahead)
        })
        .count();

    DashboardStats {
        in_month,
        total: filtered.len(),
        within_week,
    }
}

/// Distinct course names across all events, sorted, blanks skipped
pub fn course_facets(events: &[CalendarEvent]) -> Vec<String> {
    let mut courses: Vec<String> = events
        .iter()
        .filter(|event| !event.course.is_empty())
        .map(|event| event.course.clone())
        .collect();
    courses.sort();
    courses.dedup();
    courses
}
