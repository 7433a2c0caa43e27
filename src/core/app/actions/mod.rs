mod chat;
mod sessions;
mod view;

use std::time::Instant;

use tokio::sync::mpsc;

use super::App;
use crate::api::{QueryReply, QueryRequest};
use crate::core::message::Message;
use crate::core::session::{Session, SessionId, SessionStore};

#[derive(Debug)]
pub enum AppAction {
    // Questions
    SendMessage {
        question: String,
        url: String,
    },
    SubmitInput,
    SendExamplePrompt {
        index: usize,
    },
    QueryCompleted {
        result: Result<QueryReply, String>,
    },

    // Sessions
    NewSession,
    SwitchSession {
        id: SessionId,
    },
    SwitchToSelected,
    RequestDeleteCurrent,
    DeleteSession {
        id: SessionId,
    },
    ClearChat,
    SessionsLoaded {
        sessions: SessionStore,
    },
    SessionCreated {
        session: Session,
        flushed: Option<Session>,
    },
    SessionActivated {
        id: SessionId,
        flushed: Option<Session>,
    },
    SessionSaved {
        session: Session,
    },
    SessionDeleted {
        id: SessionId,
    },
    /// A create, switch, or delete failed; the local view is left as it was.
    SessionOpFailed {
        message: String,
    },
    /// A background save failed: a session save when `session_id` is set,
    /// otherwise the config file.
    SaveFailed {
        session_id: Option<SessionId>,
        message: String,
    },

    // View
    ToggleTheme,
    DismissNotification,
    Tick,
}

#[derive(Debug, Clone, Copy)]
pub struct AppActionContext {
    pub now: Instant,
}

impl AppActionContext {
    pub fn now() -> Self {
        Self {
            now: Instant::now(),
        }
    }
}

pub struct AppActionEnvelope {
    pub action: AppAction,
    pub context: AppActionContext,
}

#[derive(Clone)]
pub struct AppActionDispatcher {
    tx: mpsc::UnboundedSender<AppActionEnvelope>,
}

impl AppActionDispatcher {
    pub fn new(tx: mpsc::UnboundedSender<AppActionEnvelope>) -> Self {
        Self { tx }
    }

    pub fn dispatch(&self, action: AppAction) {
        self.dispatch_many([action], AppActionContext::now());
    }

    pub fn dispatch_many<I>(&self, actions: I, ctx: AppActionContext)
    where
        I: IntoIterator<Item = AppAction>,
    {
        for action in actions.into_iter() {
            let _ = self.tx.send(AppActionEnvelope {
                action,
                context: ctx,
            });
        }
    }
}

/// Persist `messages` to session `id`, keeping its original creation stamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveRequest {
    pub id: SessionId,
    pub messages: Vec<Message>,
    pub created_at: String,
}

/// Backend work requested by the reducer. Each command runs on its own task
/// and reports back with an [`AppAction`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    LoadSessions,
    /// Save the outgoing conversation first (when there is one), then create.
    CreateSession { flush: Option<SaveRequest> },
    /// Save the outgoing conversation first (when there is one), then switch.
    ActivateSession {
        flush: Option<SaveRequest>,
        target: SessionId,
    },
    SaveSession(SaveRequest),
    DeleteSession { id: SessionId },
    Query(QueryRequest),
    PersistTheme { dark: bool },
}

pub fn apply_actions(
    app: &mut App,
    envelopes: impl IntoIterator<Item = AppActionEnvelope>,
) -> Vec<AppCommand> {
    let mut commands = Vec::new();
    for envelope in envelopes {
        if let Some(cmd) = apply_action(app, envelope.action, envelope.context) {
            commands.push(cmd);
        }
    }
    commands
}

pub fn apply_action(app: &mut App, action: AppAction, ctx: AppActionContext) -> Option<AppCommand> {
    match action {
        AppAction::SendMessage { .. }
        | AppAction::SubmitInput
        | AppAction::SendExamplePrompt { .. }
        | AppAction::QueryCompleted { .. } => chat::handle_chat_action(app, action, ctx),

        AppAction::NewSession
        | AppAction::SwitchSession { .. }
        | AppAction::SwitchToSelected
        | AppAction::RequestDeleteCurrent
        | AppAction::DeleteSession { .. }
        | AppAction::ClearChat
        | AppAction::SessionsLoaded { .. }
        | AppAction::SessionCreated { .. }
        | AppAction::SessionActivated { .. }
        | AppAction::SessionSaved { .. }
        | AppAction::SessionDeleted { .. }
        | AppAction::SessionOpFailed { .. }
        | AppAction::SaveFailed { .. } => sessions::handle_session_action(app, action, ctx),

        AppAction::ToggleTheme | AppAction::DismissNotification | AppAction::Tick => {
            view::handle_view_action(app, action, ctx)
        }
    }
}
