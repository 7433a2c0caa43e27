//! HTTP access to the policy backend.
//!
//! Every operation maps to exactly one request (no retries, no timeouts). The
//! [`PolicyBackend`] trait is the seam the chat loop talks through, so the
//! controller can run against an in-memory backend in tests.

use std::error::Error as StdError;
use std::fmt;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::{
    DeleteResponse, HealthResponse, QueryRequest, QueryResponse, SessionResponse,
    SessionsResponse, UpdateSessionRequest,
};
use crate::core::message::Message;
use crate::core::session::{Session, SessionId, SessionStore};
use crate::utils::url::{construct_api_url, normalize_base_url};

#[derive(Debug)]
pub enum BackendError {
    /// The request never produced a response (connection refused, DNS, ...).
    Transport(reqwest::Error),
    /// The backend answered with a non-success status.
    Status { status: StatusCode, message: String },
    /// The body could not be decoded into the expected shape.
    Decode {
        endpoint: String,
        source: serde_json::Error,
    },
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::Transport(err) => write!(f, "{err}"),
            BackendError::Status { status, message } if message.is_empty() => {
                write!(f, "request failed with status {status}")
            }
            BackendError::Status { status, message } => {
                write!(f, "request failed with status {status}: {message}")
            }
            BackendError::Decode { endpoint, source } => {
                write!(f, "invalid response from {endpoint}: {source}")
            }
        }
    }
}

impl StdError for BackendError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            BackendError::Transport(err) => Some(err),
            BackendError::Status { .. } => None,
            BackendError::Decode { source, .. } => Some(source),
        }
    }
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        BackendError::Transport(err)
    }
}

#[async_trait]
pub trait PolicyBackend: Send + Sync {
    /// All stored sessions. Failures are logged and reported as an empty set.
    async fn load_sessions(&self) -> SessionStore;

    async fn create_session(&self) -> Result<Session, BackendError>;

    async fn save_session(
        &self,
        id: SessionId,
        messages: &[Message],
        created_at: &str,
    ) -> Result<Session, BackendError>;

    async fn delete_session(&self, id: SessionId) -> Result<bool, BackendError>;

    /// The decoded query body. Error statuses still decode, since the backend
    /// reports query failures as `{"error": ...}` with a 4xx/5xx status.
    async fn query(&self, request: &QueryRequest) -> Result<QueryResponse, BackendError>;

    async fn health(&self) -> Result<HealthResponse, BackendError>;
}

#[derive(Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: normalize_base_url(base_url),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        construct_api_url(&self.base_url, endpoint)
    }

    /// Like [`PolicyBackend::load_sessions`], but reports failures instead of
    /// falling back to an empty set.
    pub async fn fetch_sessions(&self) -> Result<SessionStore, BackendError> {
        let endpoint = self.url("api/sessions");
        let response = self.client.get(&endpoint).send().await?;
        let parsed: SessionsResponse = decode_success(response, &endpoint).await?;
        Ok(parsed.into_store())
    }
}

/// Pull a readable message out of an error body, preferring the backend's
/// `{"error": "..."}` shape.
fn error_message_from_body(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("error")
                .and_then(|v| v.as_str())
                .map(str::to_owned)
        })
        .unwrap_or_else(|| body.trim().to_string())
}

async fn decode_success<T: DeserializeOwned>(
    response: reqwest::Response,
    endpoint: &str,
) -> Result<T, BackendError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(BackendError::Status {
            status,
            message: error_message_from_body(&body),
        });
    }

    serde_json::from_str(&body).map_err(|source| BackendError::Decode {
        endpoint: endpoint.to_string(),
        source,
    })
}

#[async_trait]
impl PolicyBackend for HttpBackend {
    async fn load_sessions(&self) -> SessionStore {
        match self.fetch_sessions().await {
            Ok(store) => {
                debug!(count = store.len(), "loaded sessions");
                store
            }
            Err(err) => {
                warn!(error = %err, "error loading sessions");
                SessionStore::new()
            }
        }
    }

    async fn create_session(&self) -> Result<Session, BackendError> {
        let endpoint = self.url("api/sessions");
        let response = self
            .client
            .post(&endpoint)
            .header("Content-Type", "application/json")
            .send()
            .await?;
        let parsed: SessionResponse = decode_success(response, &endpoint).await?;
        debug!(id = parsed.session.id, "created session");
        Ok(parsed.session)
    }

    async fn save_session(
        &self,
        id: SessionId,
        messages: &[Message],
        created_at: &str,
    ) -> Result<Session, BackendError> {
        let endpoint = self.url(&format!("api/sessions/{id}"));
        let body = UpdateSessionRequest {
            messages,
            created_at,
        };
        let response = self.client.put(&endpoint).json(&body).send().await?;
        let parsed: SessionResponse = decode_success(response, &endpoint).await?;
        debug!(id, messages = messages.len(), "saved session");
        Ok(parsed.session)
    }

    async fn delete_session(&self, id: SessionId) -> Result<bool, BackendError> {
        let endpoint = self.url(&format!("api/sessions/{id}"));
        let response = self.client.delete(&endpoint).send().await?;
        let parsed: DeleteResponse = decode_success(response, &endpoint).await?;
        debug!(id, success = parsed.success, "deleted session");
        Ok(parsed.success)
    }

    async fn query(&self, request: &QueryRequest) -> Result<QueryResponse, BackendError> {
        let endpoint = self.url("api/query");
        let response = self.client.post(&endpoint).json(request).send().await?;
        let status = response.status();
        let body = response.text().await?;

        match serde_json::from_str::<QueryResponse>(&body) {
            Ok(parsed) => {
                debug!(%status, success = parsed.success, "query answered");
                Ok(parsed)
            }
            Err(_) if !status.is_success() => Err(BackendError::Status {
                status,
                message: error_message_from_body(&body),
            }),
            Err(source) => Err(BackendError::Decode { endpoint, source }),
        }
    }

    async fn health(&self) -> Result<HealthResponse, BackendError> {
        let endpoint = self.url("api/health");
        let response = self.client.get(&endpoint).send().await?;
        decode_success(response, &endpoint).await
    }
}
