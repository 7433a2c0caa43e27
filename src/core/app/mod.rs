use std::time::Instant;

use crate::core::message::Message;
use crate::core::notification::{error_text, Notification, NotificationKind};
use crate::core::session::{SessionId, SessionStore};
use crate::ui::theme::Theme;

pub mod actions;
pub mod send_state;
pub mod ui_state;

pub use actions::{
    apply_action, apply_actions, AppAction, AppActionContext, AppActionDispatcher,
    AppActionEnvelope, AppCommand, SaveRequest,
};
pub use send_state::SendState;
pub use ui_state::{UiFocus, UiState};

/// Everything the chat screen shows. Renderers only ever read it; all writes
/// go through the reducer in [`actions`] or the key handlers.
pub struct App {
    /// Conversation of the current session, possibly ahead of what the backend has saved.
    pub messages: Vec<Message>,
    pub sessions: SessionStore,
    pub current_session_id: Option<SessionId>,
    pub send_state: SendState,
    pub notification: Option<Notification>,
    pub theme: Theme,
    pub ui: UiState,
    /// A create, switch, or delete is waiting on the backend.
    pub session_busy: bool,
}

impl App {
    pub fn new(dark_theme: bool) -> Self {
        let theme = Theme::from_dark_flag(dark_theme);
        let ui = UiState::new(&theme);
        Self {
            messages: Vec::new(),
            sessions: SessionStore::new(),
            current_session_id: None,
            send_state: SendState::Idle,
            notification: None,
            theme,
            ui,
            session_busy: false,
        }
    }

    /// Mark the session list as loading and return the command that loads it.
    pub fn begin_startup(&mut self) -> AppCommand {
        self.session_busy = true;
        AppCommand::LoadSessions
    }

    pub fn is_sending(&self) -> bool {
        self.send_state.is_sending()
    }

    pub fn is_dark_theme(&self) -> bool {
        self.theme.is_dark
    }

    pub fn show_notification(
        &mut self,
        message: impl Into<String>,
        kind: NotificationKind,
        now: Instant,
    ) {
        self.notification = Some(Notification::new(message, kind, now));
    }

    pub fn show_error(&mut self, message: &str, now: Instant) {
        self.show_notification(error_text(message), NotificationKind::Error, now);
    }

    /// Save request for the current conversation, if there is anything to save.
    pub fn pending_flush(&self) -> Option<SaveRequest> {
        if self.messages.is_empty() {
            return None;
        }
        let id = self.current_session_id?;
        Some(self.save_request(id, self.messages.clone()))
    }

    pub fn save_request(&self, id: SessionId, messages: Vec<Message>) -> SaveRequest {
        SaveRequest {
            id,
            messages,
            created_at: self.sessions.created_at(id).unwrap_or_default().to_string(),
        }
    }

    /// Make `id` current and show its cached conversation.
    pub fn activate_session(&mut self, id: SessionId) {
        self.messages = self
            .sessions
            .get(id)
            .map(|session| session.messages.clone())
            .unwrap_or_default();
        self.current_session_id = Some(id);
        self.select_current_in_sidebar();
        self.ui.follow_latest();
    }

    pub fn select_current_in_sidebar(&mut self) {
        if let Some(current) = self.current_session_id {
            if let Some(index) = self
                .sessions
                .ids_newest_first()
                .iter()
                .position(|id| *id == current)
            {
                self.ui.sidebar_selected = index;
            }
        }
        self.clamp_sidebar_selection();
    }

    pub fn clamp_sidebar_selection(&mut self) {
        let len = self.sessions.len();
        if len == 0 {
            self.ui.sidebar_selected = 0;
        } else if self.ui.sidebar_selected >= len {
            self.ui.sidebar_selected = len - 1;
        }
    }

    pub fn selected_session_id(&self) -> Option<SessionId> {
        self.sessions
            .ids_newest_first()
            .get(self.ui.sidebar_selected)
            .copied()
    }

    pub fn move_sidebar_selection(&mut self, delta: isize) {
        let len = self.sessions.len();
        if len == 0 {
            return;
        }
        let current = self.ui.sidebar_selected.min(len - 1);
        self.ui.sidebar_selected = current.saturating_add_signed(delta).min(len - 1);
    }

    pub fn set_theme(&mut self, dark: bool) {
        self.theme = Theme::from_dark_flag(dark);
        self.ui.configure_textareas(&self.theme);
    }
}
