//! Client-side cache of backend sessions and the labels shown for them.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

use crate::core::constants::SESSION_TITLE_MAX_LENGTH;
use crate::core::message::Message;

pub type SessionId = u64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub created_at: String,
    #[serde(default)]
    pub messages: Vec<Message>,
}

impl Session {
    /// Label used by the sidebar and the `sessions` subcommand.
    pub fn title(&self) -> String {
        if self.messages.is_empty() {
            return format!("New Chat - {}", format_created_at(&self.created_at));
        }

        match self.messages.iter().find(|msg| msg.role.is_user()) {
            Some(msg) => {
                let flattened = msg.content.replace('\n', " ");
                format!(
                    "💬 {}",
                    truncate_graphemes(flattened.trim(), SESSION_TITLE_MAX_LENGTH)
                )
            }
            None => format!("📝 Chat - {}", format_created_at(&self.created_at)),
        }
    }
}

fn truncate_graphemes(text: &str, max: usize) -> String {
    let mut graphemes = text.graphemes(true);
    let head: String = graphemes.by_ref().take(max).collect();
    if graphemes.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

/// Render a backend timestamp as `Oct 17, 3:04 PM`.
///
/// The backend writes naive local timestamps (`2024-10-17T15:04:05.123456`);
/// RFC 3339 values are accepted too. Anything else is shown verbatim.
pub fn format_created_at(created_at: &str) -> String {
    const DISPLAY: &str = "%b %-d, %-I:%M %p";

    if let Ok(naive) = NaiveDateTime::parse_from_str(created_at, "%Y-%m-%dT%H:%M:%S%.f") {
        return naive.format(DISPLAY).to_string();
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(created_at) {
        return parsed.naive_local().format(DISPLAY).to_string();
    }
    created_at.to_string()
}

/// Sessions keyed by id. Iteration order is ascending id, so the most recent
/// session is always the last entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionStore {
    sessions: BTreeMap<SessionId, Session>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_sessions(sessions: impl IntoIterator<Item = Session>) -> Self {
        Self {
            sessions: sessions.into_iter().map(|s| (s.id, s)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn get(&self, id: SessionId) -> Option<&Session> {
        self.sessions.get(&id)
    }

    pub fn contains(&self, id: SessionId) -> bool {
        self.sessions.contains_key(&id)
    }

    pub fn insert(&mut self, session: Session) {
        self.sessions.insert(session.id, session);
    }

    pub fn remove(&mut self, id: SessionId) -> Option<Session> {
        self.sessions.remove(&id)
    }

    pub fn most_recent_id(&self) -> Option<SessionId> {
        self.sessions.keys().next_back().copied()
    }

    /// Ids ordered newest first, the order the sidebar lists them in.
    pub fn ids_newest_first(&self) -> Vec<SessionId> {
        self.sessions.keys().rev().copied().collect()
    }

    pub fn iter_newest_first(&self) -> impl Iterator<Item = &Session> {
        self.sessions.values().rev()
    }

    pub fn created_at(&self, id: SessionId) -> Option<&str> {
        self.sessions.get(&id).map(|s| s.created_at.as_str())
    }
}
