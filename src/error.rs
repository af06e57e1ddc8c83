use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use miette::Diagnostic;
use thiserror::Error;
use tracing::error;

/// Main error type for the service
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Validation error: {0}")]
    #[diagnostic(code(kalenteri::validation))]
    Validation(String),

    #[error("Google Calendar API error: {0}")]
    #[diagnostic(code(kalenteri::google_calendar))]
    GoogleCalendar(String),

    #[error("Environment error: {0}")]
    #[diagnostic(code(kalenteri::environment))]
    Environment(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(kalenteri::config))]
    Config(String),

    #[error(transparent)]
    #[diagnostic(code(kalenteri::io))]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(kalenteri::serialization))]
    Serialization(String),

    #[error("Other error: {0}")]
    #[diagnostic(code(kalenteri::other))]
    Other(String),
}

// Implement From for JSON serialization errors
impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

/// Type alias for Result with our Error type
pub type ServiceResult<T> = std::result::Result<T, Error>;

/// Helper to create environment errors
pub fn env_error(var: &str) -> Error {
    Error::Environment(format!("Missing environment variable: {}", var))
}

/// Helper to create validation errors
pub fn validation_error(message: &str) -> Error {
    Error::Validation(message.to_string())
}

/// Helper to create Google Calendar errors
pub fn google_calendar_error(message: &str) -> Error {
    Error::GoogleCalendar(message.to_string())
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            // Caller mistakes are answered as 400 with the message, not logged
            Error::Validation(message) => (StatusCode::BAD_REQUEST, message).into_response(),
            Error::GoogleCalendar(detail) => {
                error!("Google Calendar request failed: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Error communicating with Google Calendar",
                )
                    .into_response()
            }
            other => {
                error!("Request failed: {:?}", other);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}
