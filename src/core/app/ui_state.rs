use std::time::Instant;

use ratatui::layout::Size;
use ratatui::style::Style;
use tui_textarea::{CursorMove, TextArea};

use crate::core::constants::DELETE_CONFIRM_WINDOW;
use crate::ui::theme::Theme;

/// Which pane receives keystrokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiFocus {
    /// Multi-line question field.
    Question,

    /// Optional single-line URL field.
    Url,

    /// Session list.
    Sidebar,
}

impl UiFocus {
    pub fn next(self) -> Self {
        match self {
            UiFocus::Question => UiFocus::Url,
            UiFocus::Url => UiFocus::Sidebar,
            UiFocus::Sidebar => UiFocus::Question,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            UiFocus::Question => UiFocus::Sidebar,
            UiFocus::Url => UiFocus::Question,
            UiFocus::Sidebar => UiFocus::Url,
        }
    }
}

#[derive(Debug, Clone)]
pub struct UiState {
    pub focus: UiFocus,
    question: TextArea<'static>,
    url: TextArea<'static>,
    /// Row highlighted in the sidebar, indexing sessions newest first.
    pub sidebar_selected: usize,
    /// Set by the first delete press; a second press inside the window deletes.
    pub delete_armed_at: Option<Instant>,
    /// Lines scrolled up from the bottom of the chat log. Zero follows the latest message.
    pub scroll_back: u16,
    /// Terminal size from the most recent draw, used for scroll limits.
    pub last_term_size: Size,
    pub exit_requested: bool,
}

impl UiState {
    pub fn new(theme: &Theme) -> Self {
        let mut state = Self {
            focus: UiFocus::Question,
            question: TextArea::default(),
            url: TextArea::default(),
            sidebar_selected: 0,
            delete_armed_at: None,
            scroll_back: 0,
            last_term_size: Size::default(),
            exit_requested: false,
        };
        state.configure_textareas(theme);
        state
    }

    /// Apply the palette to both input fields. Called again after a theme switch.
    pub fn configure_textareas(&mut self, theme: &Theme) {
        let text_style = theme
            .input_text_style
            .patch(Style::default().bg(theme.background_color));
        for (area, placeholder) in [
            (&mut self.question, "Ask a question about education policy..."),
            (&mut self.url, "https://example.com"),
        ] {
            area.set_style(text_style);
            area.set_cursor_style(theme.input_cursor_style);
            area.set_cursor_line_style(theme.input_cursor_line_style);
            area.set_placeholder_text(placeholder);
            area.set_placeholder_style(theme.input_placeholder_style);
        }
    }

    pub fn question_area(&self) -> &TextArea<'static> {
        &self.question
    }

    pub fn url_area(&self) -> &TextArea<'static> {
        &self.url
    }

    pub fn question_text(&self) -> String {
        self.question.lines().join("\n")
    }

    /// URL field contents. The field is single-line, so stray breaks are dropped.
    pub fn url_text(&self) -> String {
        self.url.lines().concat()
    }

    pub fn set_question_text(&mut self, text: &str) {
        replace_text(&mut self.question, text);
    }

    pub fn set_url_text(&mut self, text: &str) {
        replace_text(&mut self.url, &text.replace(['\r', '\n'], ""));
    }

    /// Empty both fields, keeping their styling.
    pub fn clear_inputs(&mut self) {
        replace_text(&mut self.question, "");
        replace_text(&mut self.url, "");
    }

    /// Run an edit against whichever field has focus. Returns false when the
    /// sidebar has focus and nothing was edited.
    pub fn edit_focused<F>(&mut self, f: F) -> bool
    where
        F: FnOnce(&mut TextArea<'static>),
    {
        match self.focus {
            UiFocus::Question => {
                f(&mut self.question);
                true
            }
            UiFocus::Url => {
                f(&mut self.url);
                true
            }
            UiFocus::Sidebar => false,
        }
    }

    pub fn is_delete_armed(&self, now: Instant) -> bool {
        self.delete_armed_at
            .is_some_and(|armed| now.saturating_duration_since(armed) < DELETE_CONFIRM_WINDOW)
    }

    pub fn arm_delete(&mut self, now: Instant) {
        self.delete_armed_at = Some(now);
    }

    pub fn disarm_delete(&mut self) {
        self.delete_armed_at = None;
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.scroll_back = self.scroll_back.saturating_add(lines);
    }

    pub fn scroll_down(&mut self, lines: u16) {
        self.scroll_back = self.scroll_back.saturating_sub(lines);
    }

    pub fn follow_latest(&mut self) {
        self.scroll_back = 0;
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll_back = u16::MAX;
    }
}

fn replace_text(area: &mut TextArea<'static>, text: &str) {
    area.select_all();
    area.cut();
    if !text.is_empty() {
        area.insert_str(text);
    }
    area.move_cursor(CursorMove::Bottom);
    area.move_cursor(CursorMove::End);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn focus_cycles_question_url_sidebar() {
        assert_eq!(UiFocus::Question.next(), UiFocus::Url);
        assert_eq!(UiFocus::Url.next(), UiFocus::Sidebar);
        assert_eq!(UiFocus::Sidebar.next(), UiFocus::Question);
        assert_eq!(UiFocus::Question.prev(), UiFocus::Sidebar);
    }

    #[test]
    fn multi_line_question_round_trips() {
        let mut ui = UiState::new(&Theme::light());
        ui.set_question_text("first\nsecond");
        assert_eq!(ui.question_text(), "first\nsecond");
        ui.clear_inputs();
        assert_eq!(ui.question_text(), "");
    }

    #[test]
    fn url_field_stays_single_line() {
        let mut ui = UiState::new(&Theme::light());
        ui.set_url_text("https://example.com/\npolicy");
        assert_eq!(ui.url_text(), "https://example.com/policy");
    }

    #[test]
    fn edits_are_ignored_with_sidebar_focus() {
        let mut ui = UiState::new(&Theme::light());
        ui.focus = UiFocus::Sidebar;
        assert!(!ui.edit_focused(|area| {
            area.insert_char('x');
        }));
        ui.focus = UiFocus::Url;
        assert!(ui.edit_focused(|area| {
            area.insert_char('x');
        }));
        assert_eq!(ui.url_text(), "x");
        assert_eq!(ui.question_text(), "");
    }

    #[test]
    fn delete_arm_expires() {
        let mut ui = UiState::new(&Theme::light());
        let start = Instant::now();
        assert!(!ui.is_delete_armed(start));
        ui.arm_delete(start);
        assert!(ui.is_delete_armed(start + Duration::from_millis(4_900)));
        assert!(!ui.is_delete_armed(start + Duration::from_secs(5)));
    }
}
