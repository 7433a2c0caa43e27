use ratatui::layout::{Constraint, Direction, Layout as RatatuiLayout, Rect};
use ratatui::text::{Line, Span};

use super::markdown::render_markdown;
use super::theme::Theme;
use crate::core::constants::EMPTY_CHAT_PLACEHOLDER;
use crate::core::message::{Message, Role};
use crate::utils::scroll::ScrollCalculator;

pub const USER_HEADER: &str = "You";
pub const ASSISTANT_HEADER: &str = "🤖 Assistant";

/// Mapping for a single message's contribution to the flattened line stream.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MessageLineSpan {
    pub start: usize,
    pub len: usize,
}

/// Result of a layout pass: wrapped lines ready to draw, plus the rows each
/// message occupies.
#[derive(Clone, Debug, Default)]
pub struct Layout {
    pub lines: Vec<Line<'static>>,
    pub message_spans: Vec<MessageLineSpan>,
}

pub struct LayoutEngine;

impl LayoutEngine {
    /// Lay out the conversation for a chat log `width` columns wide. No
    /// further wrapping should be applied to the result.
    pub fn layout_messages(messages: &[Message], theme: &Theme, width: u16) -> Layout {
        if messages.is_empty() {
            let placeholder = Line::from(Span::styled(EMPTY_CHAT_PLACEHOLDER, theme.placeholder_style));
            return Layout {
                lines: ScrollCalculator::prewrap_lines(&[placeholder], width),
                message_spans: Vec::new(),
            };
        }

        let mut lines = Vec::new();
        let mut message_spans = Vec::with_capacity(messages.len());
        for (index, msg) in messages.iter().enumerate() {
            if index > 0 {
                lines.push(Line::default());
            }
            let start = lines.len();
            let body = match msg.role {
                Role::User => {
                    lines.push(Line::from(Span::styled(USER_HEADER, theme.user_prefix_style)));
                    msg.content
                        .split('\n')
                        .map(|text| Line::from(Span::styled(text.to_string(), theme.user_text_style)))
                        .collect::<Vec<_>>()
                }
                Role::Assistant => {
                    lines.push(Line::from(Span::styled(
                        ASSISTANT_HEADER,
                        theme.assistant_prefix_style,
                    )));
                    render_markdown(&msg.content, theme, usize::from(width))
                }
            };
            lines.extend(ScrollCalculator::prewrap_lines(&body, width));
            message_spans.push(MessageLineSpan {
                start,
                len: lines.len() - start,
            });
        }

        Layout {
            lines,
            message_spans,
        }
    }
}

/// Regions of the full-screen layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScreenAreas {
    pub sidebar: Rect,
    pub header: Rect,
    /// Instructions and example prompts; zero-sized on short terminals.
    pub guide: Rect,
    pub chat: Rect,
    pub url_input: Rect,
    pub question_input: Rect,
    pub buttons: Rect,
    pub footer: Rect,
}

const SIDEBAR_WIDTH: u16 = 34;
const GUIDE_HEIGHT: u16 = 6;
const MIN_HEIGHT_FOR_GUIDE: u16 = 32;
const MIN_WIDTH_FOR_SIDEBAR: u16 = 80;

impl ScreenAreas {
    pub fn compute(area: Rect) -> Self {
        let sidebar_width = if area.width >= MIN_WIDTH_FOR_SIDEBAR {
            SIDEBAR_WIDTH
        } else {
            0
        };
        let columns = RatatuiLayout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(sidebar_width), Constraint::Min(0)])
            .split(area);

        let guide_height = if area.height >= MIN_HEIGHT_FOR_GUIDE {
            GUIDE_HEIGHT
        } else {
            0
        };
        let rows = RatatuiLayout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(guide_height),
                Constraint::Min(3),
                Constraint::Length(3),
                Constraint::Length(5),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(columns[1]);

        Self {
            sidebar: columns[0],
            header: rows[0],
            guide: rows[1],
            chat: rows[2],
            url_input: rows[3],
            question_input: rows[4],
            buttons: rows[5],
            footer: rows[6],
        }
    }
}
