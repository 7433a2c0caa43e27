//! Key handling for the chat screen.
//!
//! Global shortcuts are resolved first, then keys are routed by focus: the
//! sidebar navigates sessions, the two input fields receive text edits.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tui_textarea::Input as TAInput;

use crate::core::app::{App, AppAction, UiFocus};
use crate::ui::chat_display::{chat_viewport_height, clamp_scroll};

/// What the event loop should do after a key press.
#[derive(Debug)]
pub enum KeyResult {
    /// Leave the chat loop.
    Exit,
    /// Feed these actions through the reducer.
    Dispatch(Vec<AppAction>),
    /// Local UI state changed; redraw.
    Handled,
    /// Nothing to do for this key.
    NotHandled,
}

impl From<AppAction> for KeyResult {
    fn from(action: AppAction) -> Self {
        KeyResult::Dispatch(vec![action])
    }
}

pub fn handle_key(app: &mut App, key: &KeyEvent) -> KeyResult {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);

    match key.code {
        KeyCode::Char('c') if ctrl => return KeyResult::Exit,
        KeyCode::Char('n') if ctrl => return AppAction::NewSession.into(),
        KeyCode::Char('d') if ctrl => return AppAction::RequestDeleteCurrent.into(),
        KeyCode::Char('l') if ctrl => return AppAction::ClearChat.into(),
        KeyCode::Char('t') if ctrl => return AppAction::ToggleTheme.into(),
        KeyCode::Char(digit @ '1'..='3') if alt => {
            let index = digit as usize - '1' as usize;
            return AppAction::SendExamplePrompt { index }.into();
        }
        KeyCode::Esc => return AppAction::DismissNotification.into(),
        KeyCode::Tab => {
            app.ui.focus = app.ui.focus.next();
            return KeyResult::Handled;
        }
        KeyCode::BackTab => {
            app.ui.focus = app.ui.focus.prev();
            return KeyResult::Handled;
        }
        KeyCode::PageUp | KeyCode::PageDown | KeyCode::Home | KeyCode::End => {
            return handle_scroll_keys(app, key.code);
        }
        _ => {}
    }

    match app.ui.focus {
        UiFocus::Sidebar => handle_sidebar_keys(app, key),
        UiFocus::Question | UiFocus::Url => handle_input_keys(app, key),
    }
}

fn handle_scroll_keys(app: &mut App, code: KeyCode) -> KeyResult {
    let page = chat_viewport_height(app).saturating_sub(1).max(1);
    match code {
        KeyCode::PageUp => app.ui.scroll_up(page),
        KeyCode::PageDown => app.ui.scroll_down(page),
        KeyCode::Home => app.ui.scroll_to_top(),
        KeyCode::End => app.ui.follow_latest(),
        _ => return KeyResult::NotHandled,
    }
    clamp_scroll(app);
    KeyResult::Handled
}

fn handle_sidebar_keys(app: &mut App, key: &KeyEvent) -> KeyResult {
    match key.code {
        KeyCode::Up => {
            app.move_sidebar_selection(-1);
            KeyResult::Handled
        }
        KeyCode::Down => {
            app.move_sidebar_selection(1);
            KeyResult::Handled
        }
        KeyCode::Enter => AppAction::SwitchToSelected.into(),
        _ => KeyResult::NotHandled,
    }
}

fn handle_input_keys(app: &mut App, key: &KeyEvent) -> KeyResult {
    let newline_modifier = key
        .modifiers
        .intersects(KeyModifiers::SHIFT | KeyModifiers::ALT);

    if key.code == KeyCode::Enter && !newline_modifier {
        return AppAction::SubmitInput.into();
    }

    // Fields are read-only while an answer is pending.
    if app.is_sending() {
        return KeyResult::NotHandled;
    }

    if key.code == KeyCode::Enter {
        if app.ui.focus != UiFocus::Question {
            return KeyResult::NotHandled;
        }
        app.ui.edit_focused(|area| area.insert_newline());
        return KeyResult::Handled;
    }

    let edited = app.ui.edit_focused(|area| {
        area.input(TAInput::from(*key));
    });
    if !edited {
        return KeyResult::NotHandled;
    }
    if app.ui.focus == UiFocus::Url && app.ui.url_area().lines().len() > 1 {
        let single_line = app.ui.url_text();
        app.ui.set_url_text(&single_line);
    }
    KeyResult::Handled
}

pub(crate) fn sanitize_pasted_text(text: &str) -> String {
    let without_crlf = text.replace("\r\n", "\n");
    let without_cr = without_crlf.replace('\r', "\n");
    let expanded_tabs = without_cr.replace('\t', "    ");
    expanded_tabs
        .chars()
        .filter(|&c| c == '\n' || !c.is_control())
        .collect()
}

/// Insert pasted text into the focused field. Line breaks are dropped for the URL field.
pub fn handle_paste(app: &mut App, text: &str) -> bool {
    if app.is_sending() {
        return false;
    }
    let mut sanitized = sanitize_pasted_text(text);
    if app.ui.focus == UiFocus::Url {
        sanitized.retain(|c| c != '\n');
    }
    if sanitized.is_empty() {
        return false;
    }
    app.ui.edit_focused(|area| {
        area.insert_str(&sanitized);
    })
}
