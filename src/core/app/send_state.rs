use crate::core::message::Message;
use crate::core::session::SessionId;

/// Lifecycle of a single question.
///
/// `Idle → Sending → [Saving →] (Succeeded | RolledBack)`, then back to
/// `Sending` on the next question. `Sending` and `Saving` both block input and
/// session operations, so the answer's save lands before any later write.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SendState {
    #[default]
    Idle,
    Sending {
        /// Conversation as it was before the optimistic user turn was appended.
        snapshot: Vec<Message>,
        /// Session the answer will be saved to.
        session_id: Option<SessionId>,
    },
    /// The answer is shown and its session save has not settled yet.
    Saving { session_id: SessionId },
    Succeeded,
    RolledBack,
}

impl SendState {
    pub fn is_sending(&self) -> bool {
        matches!(self, SendState::Sending { .. } | SendState::Saving { .. })
    }

    pub fn is_saving(&self, id: SessionId) -> bool {
        matches!(self, SendState::Saving { session_id } if *session_id == id)
    }
}
