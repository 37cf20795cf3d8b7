//! Calendar presentation helpers

pub mod colors;
pub mod view;

pub use colors::{course_color, event_color, type_color, DEFAULT_COURSE_COLOR};
pub use view::{
    course_facets, dashboard_stats, day_counts, events_on, heat_level, month_matrix, upcoming,
    DashboardStats, EventFilter, DAY_EVENT_LIMIT, MAX_HEAT_LEVEL, UPCOMING_LIMIT,
};
