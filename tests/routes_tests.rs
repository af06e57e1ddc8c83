use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use kalenteri::components::google_calendar::{
    CalendarApi, CalendarEvent, EventPayload, EventTime, TimeWindow,
};
use kalenteri::error::{google_calendar_error, ServiceResult};
use kalenteri::routes::{router, AppState};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

/// Calendar double backing the router under test
#[derive(Debug, Clone, Default)]
struct StubCalendar {
    fail_upstream: bool,
}

#[async_trait]
impl CalendarApi for StubCalendar {
    async fn list_events(&self, _window: &TimeWindow) -> ServiceResult<Vec<CalendarEvent>> {
        if self.fail_upstream {
            return Err(google_calendar_error("HTTP 503 - backend unavailable"));
        }
        Ok(vec![
            CalendarEvent {
                id: "event1".to_string(),
                summary: Some("Team Sync".to_string()),
                start: EventTime {
                    date_time: Some("2024-01-01T10:00:00Z".to_string()),
                    ..Default::default()
                },
                end: EventTime {
                    date_time: Some("2024-01-01T11:00:00Z".to_string()),
                    ..Default::default()
                },
                ..Default::default()
            },
            CalendarEvent {
                id: "event2".to_string(),
                summary: Some("All Day Event".to_string()),
                start: EventTime {
                    date: Some("2024-01-01".to_string()),
                    ..Default::default()
                },
                end: EventTime {
                    date: Some("2024-01-02".to_string()),
                    ..Default::default()
                },
                ..Default::default()
            },
        ])
    }

    async fn insert_event(&self, payload: &EventPayload) -> ServiceResult<CalendarEvent> {
        Ok(CalendarEvent {
            id: "created1".to_string(),
            summary: Some(payload.summary.clone()),
            description: payload.description.clone(),
            location: payload.location.clone(),
            start: payload.start.clone(),
            end: payload.end.clone(),
            ..Default::default()
        })
    }

    async fn update_event(
        &self,
        event_id: &str,
        payload: &EventPayload,
    ) -> ServiceResult<CalendarEvent> {
        Ok(CalendarEvent {
            id: event_id.to_string(),
            summary: Some(payload.summary.clone()),
            ..Default::default()
        })
    }

    async fn delete_event(&self, _event_id: &str) -> ServiceResult<()> {
        Ok(())
    }
}

fn app() -> Router {
    router(AppState {
        calendar: Arc::new(StubCalendar::default()),
    })
}

fn failing_app() -> Router {
    router(AppState {
        calendar: Arc::new(StubCalendar { fail_upstream: true }),
    })
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health() {
    let response = app()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "OK");
}

#[tokio::test]
async fn test_list_requires_date_parameters() {
    let response = app()
        .oneshot(Request::builder().uri("/items").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_text(response).await,
        "Day parameter is required or both start and end parameters are required"
    );
}

#[tokio::test]
async fn test_list_rejects_partial_range() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/items?start=2024-01-01")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_rejects_invalid_day() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/items?day=2024-02-30")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_text(response).await,
        "Invalid day format. Expected YYYY-MM-DD."
    );
}

#[tokio::test]
async fn test_list_returns_views() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/items?day=2024-01-01")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let views = body_json(response).await;
    assert_eq!(
        views,
        json!([
            {"summary": "Team Sync", "start": "2024-01-01 10:00:00", "end": "2024-01-01 11:00:00"},
            {"summary": "All Day Event", "start": null, "end": null}
        ])
    );
}

#[tokio::test]
async fn test_list_applies_summary_filter() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/items?day=2024-01-01&summary=sync")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let views = body_json(response).await;
    assert_eq!(
        views,
        json!([
            {"summary": "Team Sync", "start": "2024-01-01 10:00:00", "end": "2024-01-01 11:00:00"}
        ])
    );
}

#[tokio::test]
async fn test_list_upstream_failure_is_500() {
    let response = failing_app()
        .oneshot(
            Request::builder()
                .uri("/items?day=2024-01-01")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_text(response).await,
        "Error communicating with Google Calendar"
    );
}

#[tokio::test]
async fn test_create_event() {
    let body = json!({
        "summary": "Planning",
        "location": "Office",
        "startDateTime": "2024-01-05T09:00:00Z",
        "endDateTime": "2024-01-05T10:00:00Z"
    });

    let response = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/events")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let created = body_json(response).await;
    assert_eq!(created["id"], "created1");
    assert_eq!(created["summary"], "Planning");
    assert_eq!(created["start"]["dateTime"], "2024-01-05T09:00:00.000Z");
    assert_eq!(created["start"]["timeZone"], "UTC");
}

#[tokio::test]
async fn test_create_event_requires_fields() {
    let body = json!({
        "summary": "Planning"
    });

    let response = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/events")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_text(response).await,
        "Summary, startDateTime and endDateTime are required"
    );
}

#[tokio::test]
async fn test_create_event_rejects_bad_timestamp() {
    let body = json!({
        "summary": "Planning",
        "startDateTime": "tomorrow",
        "endDateTime": "2024-01-05T10:00:00Z"
    });

    let response = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/events")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_event() {
    let body = json!({
        "summary": "Planning (moved)",
        "startDateTime": "2024-01-06T09:00:00Z",
        "endDateTime": "2024-01-06T10:00:00Z"
    });

    let response = app()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/events/event1")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let updated = body_json(response).await;
    assert_eq!(updated["id"], "event1");
    assert_eq!(updated["summary"], "Planning (moved)");
}

#[tokio::test]
async fn test_delete_event() {
    let response = app()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/events/event1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}
