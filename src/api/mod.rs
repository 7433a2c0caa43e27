//! Payloads exchanged with the policy backend and the client that sends them.

pub mod backend;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::core::constants::QUERY_FAILED_FALLBACK;
use crate::core::message::Message;
use crate::core::session::{Session, SessionStore};

pub use backend::{BackendError, HttpBackend, PolicyBackend};

#[derive(Debug, Deserialize)]
pub struct SessionsResponse {
    /// Keyed by the session id rendered as a string.
    #[serde(default)]
    pub sessions: HashMap<String, Session>,
}

impl SessionsResponse {
    pub fn into_store(self) -> SessionStore {
        SessionStore::from_sessions(self.sessions.into_values())
    }
}

#[derive(Debug, Deserialize)]
pub struct SessionResponse {
    pub session: Session,
}

#[derive(Debug, Serialize)]
pub struct UpdateSessionRequest<'a> {
    pub messages: &'a [Message],
    pub created_at: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct DeleteResponse {
    #[serde(default)]
    pub success: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryRequest {
    pub question: String,
    pub url: String,
    /// Full conversation including the question being asked.
    pub messages: Vec<Message>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub success: bool,
    pub response: Option<String>,
    #[serde(default)]
    pub is_out_of_domain: bool,
    pub error: Option<String>,
}

/// A successful answer from `/api/query`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryReply {
    pub response: String,
    pub is_out_of_domain: bool,
}

impl QueryResponse {
    /// Collapse the wire shape into an answer or the message to show the user.
    pub fn into_reply(self) -> Result<QueryReply, String> {
        match (self.success, self.response) {
            (true, Some(response)) => Ok(QueryReply {
                response,
                is_out_of_domain: self.is_out_of_domain,
            }),
            _ => Err(self
                .error
                .filter(|error| !error.trim().is_empty())
                .unwrap_or_else(|| QUERY_FAILED_FALLBACK.to_string())),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sessions_response_builds_store_from_string_keys() {
        let json = r#"{
            "sessions": {
                "1700000000000": {"id": 1700000000000, "created_at": "2024-10-17T15:04:05", "messages": []},
                "1700000000500": {"id": 1700000000500, "created_at": "2024-10-17T15:05:05",
                    "messages": [{"role": "user", "content": "hi"}]}
            }
        }"#;
        let parsed: SessionsResponse = serde_json::from_str(json).expect("parse");
        let store = parsed.into_store();
        assert_eq!(store.ids_newest_first(), vec![1700000000500, 1700000000000]);
        assert_eq!(
            store.get(1700000000500).expect("session").messages,
            vec![Message::user("hi")]
        );
    }

    #[test]
    fn missing_sessions_key_is_empty() {
        let parsed: SessionsResponse = serde_json::from_str("{}").expect("parse");
        assert!(parsed.into_store().is_empty());
    }

    #[test]
    fn query_request_serializes_contract_fields() {
        let request = QueryRequest {
            question: "What is ESEA?".into(),
            url: String::new(),
            messages: vec![Message::user("What is ESEA?")],
        };
        let value = serde_json::to_value(&request).expect("serialize");
        assert_eq!(
            value,
            serde_json::json!({
                "question": "What is ESEA?",
                "url": "",
                "messages": [{"role": "user", "content": "What is ESEA?"}]
            })
        );
    }

    #[test]
    fn successful_query_becomes_reply() {
        let parsed: QueryResponse = serde_json::from_str(
            r#"{"success": true, "response": "ESEA is...", "is_out_of_domain": false}"#,
        )
        .expect("parse");
        assert_eq!(
            parsed.into_reply(),
            Ok(QueryReply {
                response: "ESEA is...".into(),
                is_out_of_domain: false
            })
        );
    }

    #[test]
    fn failed_query_carries_backend_error() {
        let parsed: QueryResponse =
            serde_json::from_str(r#"{"success": false, "error": "timeout"}"#).expect("parse");
        assert_eq!(parsed.into_reply(), Err("timeout".to_string()));
    }

    #[test]
    fn error_only_body_uses_error_text() {
        // The backend answers 4xx/5xx with just an `error` field.
        let parsed: QueryResponse =
            serde_json::from_str(r#"{"error": "Question is required"}"#).expect("parse");
        assert_eq!(parsed.into_reply(), Err("Question is required".to_string()));
    }

    #[test]
    fn failure_without_error_uses_fallback() {
        let parsed: QueryResponse = serde_json::from_str(r#"{"success": false}"#).expect("parse");
        assert_eq!(parsed.into_reply(), Err(QUERY_FAILED_FALLBACK.to_string()));

        let missing_response: QueryResponse =
            serde_json::from_str(r#"{"success": true}"#).expect("parse");
        assert_eq!(
            missing_response.into_reply(),
            Err(QUERY_FAILED_FALLBACK.to_string())
        );
    }
}
