use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::api::{BackendError, HealthResponse, PolicyBackend, QueryRequest, QueryResponse};
use crate::core::app::App;
use crate::core::message::Message;
use crate::core::session::{Session, SessionId, SessionStore};

pub const TEST_CREATED_AT: &str = "2024-10-17T15:04:05";

pub fn create_test_app() -> App {
    App::new(false)
}

pub fn test_session(id: SessionId, messages: Vec<Message>) -> Session {
    Session {
        id,
        created_at: TEST_CREATED_AT.to_string(),
        messages,
    }
}

/// App with the given sessions loaded and the newest one current.
pub fn create_loaded_app(sessions: Vec<Session>) -> App {
    let mut app = create_test_app();
    app.sessions = SessionStore::from_sessions(sessions);
    if let Some(id) = app.sessions.most_recent_id() {
        app.activate_session(id);
    }
    app
}

pub fn ok_reply(response: &str, is_out_of_domain: bool) -> QueryResponse {
    QueryResponse {
        success: true,
        response: Some(response.to_string()),
        is_out_of_domain,
        error: None,
    }
}

pub fn error_reply(error: &str) -> QueryResponse {
    QueryResponse {
        success: false,
        response: None,
        is_out_of_domain: false,
        error: Some(error.to_string()),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCall {
    Load,
    Create,
    Save { id: SessionId, messages: Vec<Message> },
    Delete { id: SessionId },
    Query(QueryRequest),
    Health,
}

#[derive(Default)]
struct InMemoryState {
    sessions: SessionStore,
    next_id: SessionId,
    calls: Vec<BackendCall>,
    query_replies: VecDeque<QueryResponse>,
    fail_creates: bool,
    fail_saves: bool,
    fail_deletes: bool,
}

/// Backend double that keeps sessions in memory and records every call.
#[derive(Clone, Default)]
pub struct InMemoryBackend {
    state: Arc<Mutex<InMemoryState>>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sessions(sessions: Vec<Session>) -> Self {
        let backend = Self::new();
        {
            let mut state = backend.state.lock().unwrap();
            state.next_id = sessions.iter().map(|s| s.id).max().unwrap_or(0);
            state.sessions = SessionStore::from_sessions(sessions);
        }
        backend
    }

    pub fn push_query_reply(&self, reply: QueryResponse) {
        self.state.lock().unwrap().query_replies.push_back(reply);
    }

    pub fn fail_creates(&self) {
        self.state.lock().unwrap().fail_creates = true;
    }

    pub fn fail_saves(&self) {
        self.state.lock().unwrap().fail_saves = true;
    }

    pub fn fail_deletes(&self) {
        self.state.lock().unwrap().fail_deletes = true;
    }

    pub fn calls(&self) -> Vec<BackendCall> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn stored(&self, id: SessionId) -> Option<Session> {
        self.state.lock().unwrap().sessions.get(id).cloned()
    }

    pub fn session_count(&self) -> usize {
        self.state.lock().unwrap().sessions.len()
    }

    fn record(&self, call: BackendCall) {
        self.state.lock().unwrap().calls.push(call);
    }
}

fn injected_failure() -> BackendError {
    BackendError::Status {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        message: "injected failure".to_string(),
    }
}

#[async_trait]
impl PolicyBackend for InMemoryBackend {
    async fn load_sessions(&self) -> SessionStore {
        self.record(BackendCall::Load);
        self.state.lock().unwrap().sessions.clone()
    }

    async fn create_session(&self) -> Result<Session, BackendError> {
        self.record(BackendCall::Create);
        let mut state = self.state.lock().unwrap();
        if state.fail_creates {
            return Err(injected_failure());
        }
        state.next_id += 1;
        let session = test_session(state.next_id, Vec::new());
        state.sessions.insert(session.clone());
        Ok(session)
    }

    async fn save_session(
        &self,
        id: SessionId,
        messages: &[Message],
        created_at: &str,
    ) -> Result<Session, BackendError> {
        self.record(BackendCall::Save {
            id,
            messages: messages.to_vec(),
        });
        let mut state = self.state.lock().unwrap();
        if state.fail_saves {
            return Err(injected_failure());
        }
        let session = Session {
            id,
            created_at: created_at.to_string(),
            messages: messages.to_vec(),
        };
        state.sessions.insert(session.clone());
        Ok(session)
    }

    async fn delete_session(&self, id: SessionId) -> Result<bool, BackendError> {
        self.record(BackendCall::Delete { id });
        let mut state = self.state.lock().unwrap();
        if state.fail_deletes {
            return Err(injected_failure());
        }
        Ok(state.sessions.remove(id).is_some())
    }

    async fn query(&self, request: &QueryRequest) -> Result<QueryResponse, BackendError> {
        self.record(BackendCall::Query(request.clone()));
        let reply = self.state.lock().unwrap().query_replies.pop_front();
        Ok(reply.unwrap_or_else(|| ok_reply("ok", false)))
    }

    async fn health(&self) -> Result<HealthResponse, BackendError> {
        self.record(BackendCall::Health);
        Ok(HealthResponse {
            status: "healthy".to_string(),
        })
    }
}
