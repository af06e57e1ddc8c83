use super::models::{CalendarEvent, EventPayload, EventsListResponse};
use super::time::TimeWindow;
use super::token::{ServiceAccountKey, TokenManager};
use crate::error::{google_calendar_error, ServiceResult};
use async_trait::async_trait;
use reqwest::Client;
use url::Url;

/// Google Calendar API base URL
const API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// Fixed page size for list queries
const MAX_RESULTS: u32 = 2500;

/// Provider boundary for calendar event CRUD
///
/// Handlers receive this as an injected capability so tests can substitute
/// a double without touching process-wide state.
#[async_trait]
pub trait CalendarApi: Send + Sync + 'static {
    /// List events within the given time window, expanded into single
    /// occurrences and ordered by start time
    async fn list_events(&self, window: &TimeWindow) -> ServiceResult<Vec<CalendarEvent>>;

    /// Insert a new event into the calendar
    async fn insert_event(&self, payload: &EventPayload) -> ServiceResult<CalendarEvent>;

    /// Update an existing event
    async fn update_event(
        &self,
        event_id: &str,
        payload: &EventPayload,
    ) -> ServiceResult<CalendarEvent>;

    /// Delete an existing event
    async fn delete_event(&self, event_id: &str) -> ServiceResult<()>;
}

/// Google Calendar API client authenticated with a service account
#[derive(Clone)]
pub struct GoogleCalendarClient {
    calendar_id: String,
    api_base: String,
    token_manager: TokenManager,
    client: Client,
}

impl GoogleCalendarClient {
    /// Create a client for the given calendar
    pub fn new(calendar_id: String, key: ServiceAccountKey) -> Self {
        Self::with_api_base(calendar_id, key, API_BASE.to_string())
    }

    /// Create a client pointed at a custom API base, used by tests
    pub fn with_api_base(calendar_id: String, key: ServiceAccountKey, api_base: String) -> Self {
        let client = Client::new();
        Self {
            calendar_id,
            api_base,
            token_manager: TokenManager::new(key, client.clone()),
            client,
        }
    }

    fn events_url(&self) -> ServiceResult<Url> {
        let url_str = format!("{}/calendars/{}/events", self.api_base, self.calendar_id);
        Url::parse(&url_str)
            .map_err(|e| google_calendar_error(&format!("Failed to parse URL: {}", e)))
    }

    fn event_url(&self, event_id: &str) -> ServiceResult<Url> {
        let url_str = format!(
            "{}/calendars/{}/events/{}",
            self.api_base, self.calendar_id, event_id
        );
        Url::parse(&url_str)
            .map_err(|e| google_calendar_error(&format!("Failed to parse URL: {}", e)))
    }

    async fn bearer(&self) -> ServiceResult<String> {
        let token = self.token_manager.get_token().await?;
        Ok(format!("Bearer {}", token))
    }

    async fn check_status(
        response: reqwest::Response,
        action: &str,
    ) -> ServiceResult<reqwest::Response> {
        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(google_calendar_error(&format!(
                "Failed to {}: HTTP {} - {}",
                action, status, error_body
            )));
        }
        Ok(response)
    }
}

#[async_trait]
impl CalendarApi for GoogleCalendarClient {
    async fn list_events(&self, window: &TimeWindow) -> ServiceResult<Vec<CalendarEvent>> {
        let mut url = self.events_url()?;
        url.query_pairs_mut()
            .append_pair("timeMin", &window.time_min_rfc3339())
            .append_pair("timeMax", &window.time_max_rfc3339())
            .append_pair("maxResults", &MAX_RESULTS.to_string())
            .append_pair("singleEvents", "true")
            .append_pair("orderBy", "startTime");

        let response = self
            .client
            .get(url)
            .header("Authorization", self.bearer().await?)
            .send()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to fetch events: {}", e)))?;

        let response = Self::check_status(response, "fetch events").await?;

        let list: EventsListResponse = response
            .json()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to parse events response: {}", e)))?;

        Ok(list.items)
    }

    async fn insert_event(&self, payload: &EventPayload) -> ServiceResult<CalendarEvent> {
        let url = self.events_url()?;

        let response = self
            .client
            .post(url)
            .header("Authorization", self.bearer().await?)
            .json(payload)
            .send()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to create event: {}", e)))?;

        let response = Self::check_status(response, "create event").await?;

        response
            .json()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to parse event response: {}", e)))
    }

    async fn update_event(
        &self,
        event_id: &str,
        payload: &EventPayload,
    ) -> ServiceResult<CalendarEvent> {
        let url = self.event_url(event_id)?;

        let response = self
            .client
            .put(url)
            .header("Authorization", self.bearer().await?)
            .json(payload)
            .send()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to update event: {}", e)))?;

        let response = Self::check_status(response, "update event").await?;

        response
            .json()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to parse event response: {}", e)))
    }

    async fn delete_event(&self, event_id: &str) -> ServiceResult<()> {
        let url = self.event_url(event_id)?;

        let response = self
            .client
            .delete(url)
            .header("Authorization", self.bearer().await?)
            .send()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to delete event: {}", e)))?;

        Self::check_status(response, "delete event").await?;

        Ok(())
    }
}
