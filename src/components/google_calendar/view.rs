use super::models::CalendarEvent;
use chrono::DateTime;
use serde::Serialize;

/// Display-ready projection of a provider event
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventView {
    pub summary: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
}

/// Render a precise event timestamp for display
///
/// All-day events carry only a date and yield `None`. A timestamp the
/// provider sends in an unexpected shape is passed through verbatim rather
/// than dropped.
fn format_date_time(value: Option<&str>) -> Option<String> {
    let raw = value?;
    match DateTime::parse_from_rfc3339(raw) {
        Ok(parsed) => Some(parsed.format("%Y-%m-%d %H:%M:%S").to_string()),
        Err(_) => Some(raw.to_string()),
    }
}

/// Project provider events into views, optionally filtered on summary
///
/// The filter is a case-insensitive substring match; events without a
/// summary never match. An absent or empty filter retains everything.
/// Input order is preserved.
pub fn map_events(events: &[CalendarEvent], summary_filter: Option<&str>) -> Vec<EventView> {
    let filter = summary_filter
        .map(str::to_lowercase)
        .filter(|f| !f.is_empty());

    events
        .iter()
        .map(|event| EventView {
            summary: event.summary.clone(),
            start: format_date_time(event.start.date_time.as_deref()),
            end: format_date_time(event.end.date_time.as_deref()),
        })
        .filter(|view| match &filter {
            Some(filter) => view
                .summary
                .as_ref()
                .is_some_and(|summary| summary.to_lowercase().contains(filter)),
            None => true,
        })
        .collect()
}
