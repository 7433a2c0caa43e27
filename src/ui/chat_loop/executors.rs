use std::error::Error as StdError;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::api::backend::PolicyBackend;
use crate::core::app::{AppAction, AppActionDispatcher, AppCommand, SaveRequest};
use crate::core::config::Config;
use crate::core::session::Session;

/// Runs [`AppCommand`]s against the backend and turns each outcome into an action.
#[derive(Clone)]
pub struct CommandRunner {
    backend: Arc<dyn PolicyBackend>,
    config_path: Option<PathBuf>,
}

impl CommandRunner {
    pub fn new(backend: Arc<dyn PolicyBackend>, config_path: Option<PathBuf>) -> Self {
        Self {
            backend,
            config_path,
        }
    }

    pub fn spawn(&self, cmd: AppCommand, dispatcher: AppActionDispatcher) {
        let runner = self.clone();
        tokio::spawn(async move {
            if let Some(action) = runner.run(cmd).await {
                dispatcher.dispatch(action);
            }
        });
    }

    pub async fn run(&self, cmd: AppCommand) -> Option<AppAction> {
        match cmd {
            AppCommand::LoadSessions => {
                let sessions = self.backend.load_sessions().await;
                Some(AppAction::SessionsLoaded { sessions })
            }
            AppCommand::CreateSession { flush } => {
                let flushed = match self.flush(flush).await {
                    Ok(flushed) => flushed,
                    Err(action) => return Some(action),
                };
                Some(match self.backend.create_session().await {
                    Ok(session) => AppAction::SessionCreated { session, flushed },
                    Err(err) => {
                        warn!(error = %err, "create session failed");
                        AppAction::SessionOpFailed {
                            message: err.to_string(),
                        }
                    }
                })
            }
            AppCommand::ActivateSession { flush, target } => {
                Some(match self.flush(flush).await {
                    Ok(flushed) => AppAction::SessionActivated {
                        id: target,
                        flushed,
                    },
                    Err(action) => action,
                })
            }
            AppCommand::SaveSession(request) => {
                Some(match self.save(&request).await {
                    Ok(session) => AppAction::SessionSaved { session },
                    Err(message) => AppAction::SaveFailed {
                        session_id: Some(request.id),
                        message,
                    },
                })
            }
            AppCommand::DeleteSession { id } => {
                Some(match self.backend.delete_session(id).await {
                    Ok(success) => {
                        if !success {
                            warn!(id, "backend reported delete as unsuccessful");
                        }
                        AppAction::SessionDeleted { id }
                    }
                    Err(err) => {
                        warn!(id, error = %err, "delete session failed");
                        AppAction::SessionOpFailed {
                            message: err.to_string(),
                        }
                    }
                })
            }
            AppCommand::Query(request) => {
                let result = match self.backend.query(&request).await {
                    Ok(response) => response.into_reply(),
                    Err(err) => {
                        warn!(error = %err, "query failed");
                        Err(err.to_string())
                    }
                };
                Some(AppAction::QueryCompleted { result })
            }
            AppCommand::PersistTheme { dark } => {
                let outcome = self.persist_theme(dark).map_err(|err| err.to_string());
                match outcome {
                    Ok(()) => None,
                    Err(message) => {
                        warn!(error = %message, "failed to save theme");
                        Some(AppAction::SaveFailed {
                            session_id: None,
                            message,
                        })
                    }
                }
            }
        }
    }

    /// Save the outgoing conversation. A failure becomes the action to report
    /// so the follow-up step never runs.
    async fn flush(&self, request: Option<SaveRequest>) -> Result<Option<Session>, AppAction> {
        let Some(request) = request else {
            return Ok(None);
        };
        self.save(&request)
            .await
            .map(Some)
            .map_err(|message| AppAction::SessionOpFailed { message })
    }

    async fn save(&self, request: &SaveRequest) -> Result<Session, String> {
        debug!(id = request.id, messages = request.messages.len(), "saving session");
        self.backend
            .save_session(request.id, &request.messages, &request.created_at)
            .await
            .map_err(|err| {
                warn!(id = request.id, error = %err, "save session failed");
                err.to_string()
            })
    }

    fn persist_theme(&self, dark: bool) -> Result<(), Box<dyn StdError>> {
        let path = match &self.config_path {
            Some(path) => path.clone(),
            None => Config::get_config_path()?,
        };
        update_theme_in(&path, dark)
    }
}

fn update_theme_in(path: &Path, dark: bool) -> Result<(), Box<dyn StdError>> {
    let mut config = Config::load_from_path(path)?;
    config.dark_theme = Some(dark);
    config.save_to_path(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::QueryRequest;
    use crate::core::message::Message;
    use crate::utils::test_utils::{
        error_reply, ok_reply, test_session, BackendCall, InMemoryBackend, TEST_CREATED_AT,
    };
    use tempfile::TempDir;

    fn runner(backend: &InMemoryBackend) -> CommandRunner {
        CommandRunner::new(Arc::new(backend.clone()), None)
    }

    fn save_request(id: u64, messages: Vec<Message>) -> SaveRequest {
        SaveRequest {
            id,
            messages,
            created_at: TEST_CREATED_AT.to_string(),
        }
    }

    #[tokio::test]
    async fn create_flushes_outgoing_conversation_first() {
        let backend = InMemoryBackend::with_sessions(vec![test_session(1, Vec::new())]);
        let messages = vec![Message::user("Hi"), Message::assistant("Hello")];

        let action = runner(&backend)
            .run(AppCommand::CreateSession {
                flush: Some(save_request(1, messages.clone())),
            })
            .await;

        match action {
            Some(AppAction::SessionCreated { session, flushed }) => {
                assert_eq!(session.id, 2);
                assert_eq!(flushed.map(|s| s.messages), Some(messages.clone()));
            }
            _ => panic!("expected SessionCreated"),
        }
        assert_eq!(
            backend.calls(),
            vec![
                BackendCall::Save { id: 1, messages },
                BackendCall::Create,
            ]
        );
    }

    #[tokio::test]
    async fn failed_flush_skips_create() {
        let backend = InMemoryBackend::with_sessions(vec![test_session(1, Vec::new())]);
        backend.fail_saves();

        let action = runner(&backend)
            .run(AppCommand::CreateSession {
                flush: Some(save_request(1, vec![Message::user("Hi")])),
            })
            .await;

        assert!(matches!(action, Some(AppAction::SessionOpFailed { .. })));
        assert_eq!(backend.session_count(), 1);
        assert!(!backend.calls().contains(&BackendCall::Create));
    }

    #[tokio::test]
    async fn create_failure_is_reported() {
        let backend = InMemoryBackend::new();
        backend.fail_creates();

        let action = runner(&backend)
            .run(AppCommand::CreateSession { flush: None })
            .await;

        match action {
            Some(AppAction::SessionOpFailed { message }) => {
                assert!(message.contains("injected failure"));
            }
            _ => panic!("expected SessionOpFailed"),
        }
    }

    #[tokio::test]
    async fn activate_without_flush_makes_no_backend_call() {
        let backend = InMemoryBackend::with_sessions(vec![test_session(1, Vec::new())]);

        let action = runner(&backend)
            .run(AppCommand::ActivateSession {
                flush: None,
                target: 1,
            })
            .await;

        assert!(matches!(
            action,
            Some(AppAction::SessionActivated {
                id: 1,
                flushed: None
            })
        ));
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn delete_removes_session() {
        let backend = InMemoryBackend::with_sessions(vec![
            test_session(1, Vec::new()),
            test_session(2, Vec::new()),
        ]);

        let action = runner(&backend)
            .run(AppCommand::DeleteSession { id: 1 })
            .await;

        assert!(matches!(action, Some(AppAction::SessionDeleted { id: 1 })));
        assert!(backend.stored(1).is_none());
        assert!(backend.stored(2).is_some());
    }

    #[tokio::test]
    async fn delete_failure_leaves_backend_untouched() {
        let backend = InMemoryBackend::with_sessions(vec![test_session(1, Vec::new())]);
        backend.fail_deletes();

        let action = runner(&backend)
            .run(AppCommand::DeleteSession { id: 1 })
            .await;

        assert!(matches!(action, Some(AppAction::SessionOpFailed { .. })));
        assert!(backend.stored(1).is_some());
    }

    #[tokio::test]
    async fn query_maps_backend_replies() {
        let backend = InMemoryBackend::new();
        backend.push_query_reply(ok_reply("ESSA replaced NCLB.", true));
        backend.push_query_reply(error_reply("timeout"));
        let request = QueryRequest {
            question: "What is ESSA?".into(),
            url: String::new(),
            messages: vec![Message::user("What is ESSA?")],
        };
        let runner = runner(&backend);

        match runner.run(AppCommand::Query(request.clone())).await {
            Some(AppAction::QueryCompleted { result: Ok(reply) }) => {
                assert_eq!(reply.response, "ESSA replaced NCLB.");
                assert!(reply.is_out_of_domain);
            }
            _ => panic!("expected a successful reply"),
        }
        match runner.run(AppCommand::Query(request.clone())).await {
            Some(AppAction::QueryCompleted { result: Err(message) }) => {
                assert_eq!(message, "timeout");
            }
            _ => panic!("expected a failed reply"),
        }
        assert_eq!(
            backend.calls(),
            vec![
                BackendCall::Query(request.clone()),
                BackendCall::Query(request)
            ]
        );
    }

    #[tokio::test]
    async fn save_failure_is_reported() {
        let backend = InMemoryBackend::with_sessions(vec![test_session(1, Vec::new())]);
        backend.fail_saves();

        let action = runner(&backend)
            .run(AppCommand::SaveSession(save_request(1, Vec::new())))
            .await;

        assert!(matches!(
            action,
            Some(AppAction::SaveFailed {
                session_id: Some(1),
                ..
            })
        ));
    }

    #[tokio::test]
    async fn persist_theme_writes_config() {
        let temp_dir = TempDir::new().expect("temp dir");
        let path = temp_dir.path().join("config.toml");
        Config {
            backend_url: Some("http://policy.example".into()),
            dark_theme: None,
        }
        .save_to_path(&path)
        .expect("seed config");

        let runner = CommandRunner::new(Arc::new(InMemoryBackend::new()), Some(path.clone()));
        assert!(runner
            .run(AppCommand::PersistTheme { dark: true })
            .await
            .is_none());

        let config = Config::load_from_path(&path).expect("reload");
        assert_eq!(config.dark_theme, Some(true));
        assert_eq!(config.backend_url.as_deref(), Some("http://policy.example"));
    }
}
