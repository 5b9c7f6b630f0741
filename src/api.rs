// API client module: a small async HTTP client for the biometric backend.
// The backend owns the camera and the matching; this side only asks it to
// verify or enroll and reads back a JSON verdict.

use async_trait::async_trait;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::error::ApiError;

/// Reports whether the backend's biometric SDK came up.
pub const STATUS_ENDPOINT: &str = "/api/status";
/// Recent activity of the signed-in user.
pub const ACTIVITY_ENDPOINT: &str = "/api/activity";
/// Ends the server-side session.
pub const LOGOUT_ENDPOINT: &str = "/logout";

/// Body of a verify or register call. Verification sends `{}`,
/// enrollment sends `{"user_id": ...}`.
#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl ActionRequest {
    pub fn verify() -> Self {
        ActionRequest { user_id: None }
    }

    pub fn register(user_id: impl Into<String>) -> Self {
        ActionRequest {
            user_id: Some(user_id.into()),
        }
    }
}

/// Verdict returned by the verify/register endpoints. Anything other than
/// `status == "success"` (including a missing status) is a denial.
///
/// Fields are kept as raw JSON values: the backend passes some of them
/// through from the capture SDK untyped, and a field of an unexpected type
/// must not turn a verdict into an unreadable response.
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionResult {
    #[serde(default)]
    pub status: Option<Value>,
    #[serde(default)]
    pub message: Option<Value>,
    /// Identity matched by a successful verification.
    #[serde(default)]
    pub user_id: Option<Value>,
}

impl ActionResult {
    pub fn is_success(&self) -> bool {
        matches!(&self.status, Some(Value::String(s)) if s == "success")
    }

    /// Message to show for a denial, if the backend sent a usable one.
    /// Falsy values (`""`, `0`, `false`, `null`) count as absent; other
    /// non-string values are shown as their JSON text.
    pub fn message_text(&self) -> Option<String> {
        self.message.as_ref().and_then(display_text)
    }

    /// Matched identity as text; numeric IDs are rendered as digits.
    pub fn user_id_text(&self) -> Option<String> {
        self.user_id.as_ref().and_then(display_text)
    }
}

fn display_text(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    }
}

/// Answer of `GET /api/status`.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct SystemStatus {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}

impl SystemStatus {
    pub fn is_ready(&self) -> bool {
        self.status == "ready"
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ActivityEntry {
    pub action: String,
    #[serde(default)]
    pub details: String,
    pub date: String,
}

/// Answer of `GET /api/activity`. Without a session the backend answers
/// with an error status and a message instead of logs.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct ActivityFeed {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub logs: Vec<ActivityEntry>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ActivityFeed {
    pub fn is_success(&self) -> bool {
        self.status.as_deref() == Some("success")
    }
}

/// The one call the mode controller makes. Split out so the controller can
/// run against a scripted backend in tests.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    async fn submit(&self, endpoint: &str, request: &ActionRequest)
        -> Result<ActionResult, ApiError>;
}

/// HTTP client bound to one backend. Cookies are kept in a jar so the
/// session set by a successful verification carries over to later calls.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    jar: Arc<Jar>,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let parsed = Url::parse(base_url).map_err(|e| ApiError::InvalidUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if parsed.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl {
                url: base_url.to_string(),
                reason: "not a base URL".into(),
            });
        }

        let jar = Arc::new(Jar::default());
        let client = Client::builder()
            .cookie_provider(jar.clone())
            .build()
            .map_err(ApiError::Client)?;

        Ok(ApiClient {
            client,
            base_url: parsed,
            jar,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url.as_str().trim_end_matches('/'), endpoint)
    }

    /// Cookies the backend has set for this base URL, as a `Cookie` header
    /// value (`name=value; other=value`).
    pub fn session_cookie(&self) -> Option<String> {
        self.jar
            .cookies(&self.base_url)
            .and_then(|value| value.to_str().ok().map(str::to_string))
            .filter(|value| !value.is_empty())
    }

    /// Put back cookies captured by `session_cookie` on an earlier run.
    pub fn restore_session(&self, cookie: &str) {
        for pair in cookie.split(';').map(str::trim).filter(|p| !p.is_empty()) {
            self.jar.add_cookie_str(pair, &self.base_url);
        }
    }

    /// Query whether the backend is able to capture at all.
    #[instrument(skip(self))]
    pub async fn system_status(&self) -> Result<SystemStatus, ApiError> {
        self.get_json(STATUS_ENDPOINT).await
    }

    /// Fetch the signed-in user's recent activity.
    #[instrument(skip(self))]
    pub async fn activity(&self) -> Result<ActivityFeed, ApiError> {
        self.get_json(ACTIVITY_ENDPOINT).await
    }

    /// End the session on the backend. The backend answers with a redirect
    /// to its landing page, so only a failed request or an error status
    /// counts as a failure.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<(), ApiError> {
        let res = self
            .client
            .get(self.url(LOGOUT_ENDPOINT))
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|source| transport(LOGOUT_ENDPOINT, source))?;
        debug!(status = %res.status(), "session ended");
        Ok(())
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        let res = self
            .client
            .get(self.url(endpoint))
            .send()
            .await
            .map_err(|source| transport(endpoint, source))?;
        debug!(status = %res.status(), endpoint, "backend answered");
        let body = res.bytes().await.map_err(|source| transport(endpoint, source))?;
        decode(endpoint, &body)
    }
}

#[async_trait]
impl AuthBackend for ApiClient {
    /// POST the request as JSON. The HTTP status code is not inspected;
    /// only the `status` field of the JSON body decides the outcome.
    #[instrument(skip(self, request))]
    async fn submit(
        &self,
        endpoint: &str,
        request: &ActionRequest,
    ) -> Result<ActionResult, ApiError> {
        let res = self
            .client
            .post(self.url(endpoint))
            .json(request)
            .send()
            .await
            .map_err(|source| transport(endpoint, source))?;
        debug!(status = %res.status(), endpoint, "backend answered");
        let body = res.bytes().await.map_err(|source| transport(endpoint, source))?;
        decode(endpoint, &body)
    }
}

fn transport(endpoint: &str, source: reqwest::Error) -> ApiError {
    ApiError::Transport {
        endpoint: endpoint.to_string(),
        source,
    }
}

fn decode<T: DeserializeOwned>(endpoint: &str, body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|source| ApiError::Decode {
        endpoint: endpoint.to_string(),
        source,
    })
}
