use crate::error::{google_calendar_error, ServiceResult};
use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;

/// OAuth scope granting event read and write access
const CALENDAR_SCOPE: &str = "https://www.googleapis.com/auth/calendar";

/// Seconds before expiry at which a cached token is refreshed
const EXPIRY_MARGIN_SECS: i64 = 60;

/// Lifetime requested for each signed grant
const GRANT_LIFETIME_SECS: i64 = 3600;

/// Service account credentials as issued by the provider console
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    pub token_uri: String,
}

impl ServiceAccountKey {
    /// Load credentials from a JSON key file
    pub fn from_file(path: impl AsRef<Path>) -> ServiceResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let key = serde_json::from_str(&content)?;
        Ok(key)
    }
}

/// Claims for the service account JWT grant
#[derive(Debug, Serialize)]
struct GrantClaims {
    iss: String,
    scope: String,
    aud: String,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

fn default_expires_in() -> i64 {
    GRANT_LIFETIME_SECS
}

/// Manages the service account access token used for API calls
///
/// Tokens are cached in-process and re-requested shortly before expiry.
#[derive(Clone)]
pub struct TokenManager {
    key: Arc<ServiceAccountKey>,
    client: Client,
    cached: Arc<RwLock<Option<CachedToken>>>,
}

impl TokenManager {
    pub fn new(key: ServiceAccountKey, client: Client) -> Self {
        Self {
            key: Arc::new(key),
            client,
            cached: Arc::new(RwLock::new(None)),
        }
    }

    /// Get a valid access token, requesting a new one when the cached token
    /// is missing or about to expire
    pub async fn get_token(&self) -> ServiceResult<String> {
        let now = Utc::now().timestamp();

        {
            let cached = self.cached.read().await;
            if let Some(token) = cached.as_ref() {
                if token.expires_at - EXPIRY_MARGIN_SECS > now {
                    return Ok(token.access_token.clone());
                }
            }
        }

        self.request_token(now).await
    }

    /// Exchange a freshly signed grant for an access token
    async fn request_token(&self, now: i64) -> ServiceResult<String> {
        let assertion = self.sign_grant(now)?;

        let params = [
            ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
            ("assertion", assertion.as_str()),
        ];

        let response = self
            .client
            .post(&self.key.token_uri)
            .form(&params)
            .send()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to request token: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(google_calendar_error(&format!(
                "Failed to request token: HTTP {} - {}",
                status, error_body
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to parse token response: {}", e)))?;

        let mut cached = self.cached.write().await;
        *cached = Some(CachedToken {
            access_token: token.access_token.clone(),
            expires_at: now + token.expires_in,
        });

        Ok(token.access_token)
    }

    /// Sign the JWT grant with the service account private key
    fn sign_grant(&self, now: i64) -> ServiceResult<String> {
        let claims = GrantClaims {
            iss: self.key.client_email.clone(),
            scope: CALENDAR_SCOPE.to_string(),
            aud: self.key.token_uri.clone(),
            iat: now,
            exp: now + GRANT_LIFETIME_SECS,
        };

        let encoding_key = EncodingKey::from_rsa_pem(self.key.private_key.as_bytes())
            .map_err(|e| {
                google_calendar_error(&format!("Invalid service account private key: {}", e))
            })?;

        encode(&Header::new(Algorithm::RS256), &claims, &encoding_key)
            .map_err(|e| google_calendar_error(&format!("Failed to sign token grant: {}", e)))
    }
}
