//! Shared constants used across the application

use std::time::Duration;

/// Backend used when neither the CLI, the environment, nor the config name one.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5000";

/// Environment variable that overrides the configured backend URL.
pub const BACKEND_URL_ENV: &str = "POLICY_NAVIGATOR_BACKEND_URL";

/// Sidebar titles keep at most this many characters of the first question.
pub const SESSION_TITLE_MAX_LENGTH: usize = 30;

/// How long a notification stays on screen.
pub const NOTIFICATION_LIFETIME: Duration = Duration::from_secs(5);

/// Window in which a second delete press confirms the first.
pub const DELETE_CONFIRM_WINDOW: Duration = Duration::from_secs(5);

pub const APP_TITLE: &str = "Education Policy Knowledge Assistant";
pub const APP_SUBTITLE: &str =
    "Get authoritative guidance on education policies and federal requirements";
pub const FOOTER_TEXT: &str = "Built with humain ❤️ to provide AI guidance";

pub const INSTRUCTIONS: [&str; 4] = [
    "Ask questions about education policies and federal requirements",
    "Optionally provide a URL to scrape education policy content",
    "Get responses with citations from verified sources",
    "Manage multiple conversation sessions",
];

pub const EXAMPLE_PROMPTS: [&str; 3] = [
    "What are the federal requirements for educational guidance programs?",
    "What are the responsibilities of an SEA and an LEA for preparing a report card?",
    "Explain the Every Student Succeeds Act",
];

pub const EMPTY_CHAT_PLACEHOLDER: &str =
    "👋 Start a conversation by asking a question about education policy!";
pub const OUT_OF_DOMAIN_WARNING: &str =
    "⚠️ This question appears to be outside the bot's domain of education policy.";
pub const CHAT_ALREADY_EMPTY: &str = "Chat is already empty!";
pub const QUERY_FAILED_FALLBACK: &str = "Failed to get response";
pub const BUSY_NOTICE: &str = "Please wait for the current answer to finish.";
