use crate::components::google_calendar::{
    map_events, resolve_range, CalendarApi, CalendarEvent, EventPayload, EventTime, EventView,
};
use crate::error::{validation_error, Error, ServiceResult};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Shared state injected into every handler
#[derive(Clone)]
pub struct AppState {
    /// Calendar provider capability
    pub calendar: Arc<dyn CalendarApi>,
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/items", get(list_events_handler))
        .route("/events", post(create_event_handler))
        .route(
            "/events/{event_id}",
            put(update_event_handler).delete(delete_event_handler),
        )
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Query parameters accepted by the list endpoint
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub day: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub summary: Option<String>,
}

/// Handler for listing events within a date range
pub async fn list_events_handler(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<EventView>>, Error> {
    let window = resolve_range(
        query.day.as_deref(),
        query.start.as_deref(),
        query.end.as_deref(),
    )?;

    let events = state.calendar.list_events(&window).await?;
    let views = map_events(&events, query.summary.as_deref());

    Ok(Json(views))
}

/// Request body for creating or updating an event
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRequest {
    pub summary: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start_date_time: Option<String>,
    pub end_date_time: Option<String>,
}

impl EventRequest {
    /// Validate required fields and normalize timestamps to UTC
    fn into_payload(self) -> ServiceResult<EventPayload> {
        let summary = self
            .summary
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                validation_error("Summary, startDateTime and endDateTime are required")
            })?;

        let start = required_date_time(self.start_date_time.as_deref(), "startDateTime")?;
        let end = required_date_time(self.end_date_time.as_deref(), "endDateTime")?;

        Ok(EventPayload {
            summary,
            description: self.description,
            location: self.location,
            start: utc_event_time(start),
            end: utc_event_time(end),
        })
    }
}

fn required_date_time(value: Option<&str>, field: &str) -> ServiceResult<DateTime<Utc>> {
    let raw = value.ok_or_else(|| {
        validation_error("Summary, startDateTime and endDateTime are required")
    })?;

    DateTime::parse_from_rfc3339(raw)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|_| {
            validation_error(&format!(
                "Invalid {} format. Expected an RFC 3339 timestamp.",
                field
            ))
        })
}

fn utc_event_time(value: DateTime<Utc>) -> EventTime {
    EventTime {
        date_time: Some(value.to_rfc3339_opts(SecondsFormat::Millis, true)),
        date: None,
        time_zone: Some("UTC".to_string()),
    }
}

/// Handler for creating a new event
pub async fn create_event_handler(
    State(state): State<AppState>,
    Json(request): Json<EventRequest>,
) -> Result<(StatusCode, Json<CalendarEvent>), Error> {
    let payload = request.into_payload()?;
    let created = state.calendar.insert_event(&payload).await?;

    info!("Created event {}", created.id);
    Ok((StatusCode::CREATED, Json(created)))
}

/// Handler for updating an existing event
pub async fn update_event_handler(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
    Json(request): Json<EventRequest>,
) -> Result<Json<CalendarEvent>, Error> {
    let payload = request.into_payload()?;
    let updated = state.calendar.update_event(&event_id, &payload).await?;

    info!("Updated event {}", event_id);
    Ok(Json(updated))
}

/// Handler for deleting an event
pub async fn delete_event_handler(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
) -> Result<StatusCode, Error> {
    state.calendar.delete_event(&event_id).await?;

    info!("Deleted event {}", event_id);
    Ok(StatusCode::NO_CONTENT)
}

// Handler for API health check
pub async fn health_handler() -> &'static str {
    "OK"
}
