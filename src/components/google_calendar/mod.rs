pub mod client;
pub mod models;
pub mod time;
pub mod token;
pub mod view;

pub use client::{CalendarApi, GoogleCalendarClient};
pub use models::{CalendarEvent, EventPayload, EventTime};
pub use time::{resolve_range, TimeWindow};
pub use view::{map_events, EventView};
