use std::time::Instant;

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use ratatui::Frame;

use crate::core::app::{App, UiFocus};

pub const NEW_SESSION_LABEL: &str = "➕ New Session (Ctrl+N)";
pub const PREVIOUS_SESSIONS_LABEL: &str = "Previous Sessions";
pub const NO_SESSIONS_LABEL: &str = "No previous sessions";
pub const DELETE_LABEL: &str = "🗑️ Delete Session (Ctrl+D)";
pub const CONFIRM_DELETE_LABEL: &str = "⚠️ Confirm Delete";

pub fn render_sidebar(f: &mut Frame, app: &App, area: Rect, now: Instant) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    let theme = &app.theme;
    let focused = app.ui.focus == UiFocus::Sidebar;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(if focused {
            theme.focused_border_style
        } else {
            theme.border_style
        })
        .title(Span::styled(" Sessions ", theme.section_title_style));
    let inner = block.inner(area);
    f.render_widget(block, area);
    if inner.height < 4 {
        return;
    }

    let new_style = if app.session_busy || app.is_sending() {
        theme.disabled_style
    } else {
        theme.key_hint_style
    };
    let header = Paragraph::new(vec![
        Line::from(Span::styled(NEW_SESSION_LABEL, new_style)),
        Line::default(),
        Line::from(Span::styled(PREVIOUS_SESSIONS_LABEL, theme.section_title_style)),
    ]);
    f.render_widget(header, Rect { height: 3, ..inner });

    let list_area = Rect {
        y: inner.y + 3,
        height: inner.height.saturating_sub(4),
        ..inner
    };
    let footer_area = Rect {
        y: inner.y + inner.height - 1,
        height: 1,
        ..inner
    };

    if app.sessions.is_empty() {
        f.render_widget(
            Paragraph::new(Span::styled(NO_SESSIONS_LABEL, theme.placeholder_style)),
            list_area,
        );
    } else {
        let items: Vec<ListItem> = app
            .sessions
            .iter_newest_first()
            .map(|session| {
                let is_current = app.current_session_id == Some(session.id);
                let style = if is_current {
                    theme.sidebar_current_style
                } else {
                    theme.sidebar_item_style
                };
                let marker = if is_current { "▶ " } else { "  " };
                ListItem::new(Line::from(vec![
                    Span::styled(marker, style),
                    Span::styled(session.title(), style),
                ]))
            })
            .collect();
        let list = List::new(items).highlight_style(if focused {
            theme.sidebar_selected_style
        } else {
            ratatui::style::Style::default()
        });
        let mut state = ListState::default().with_selected(Some(app.ui.sidebar_selected));
        f.render_stateful_widget(list, list_area, &mut state);
    }

    let delete = if app.ui.is_delete_armed(now) {
        Span::styled(CONFIRM_DELETE_LABEL, theme.delete_armed_style)
    } else {
        Span::styled(DELETE_LABEL, theme.delete_style)
    };
    f.render_widget(Paragraph::new(Line::from(delete)), footer_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message::Message;
    use crate::utils::test_utils::{create_loaded_app, create_test_app, test_session};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn draw(app: &App, now: Instant) -> String {
        let backend = TestBackend::new(36, 12);
        let mut terminal = Terminal::new(backend).expect("terminal");
        terminal
            .draw(|f| render_sidebar(f, app, f.area(), now))
            .expect("draw");
        let buffer = terminal.backend().buffer().clone();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn empty_store_shows_placeholder() {
        let app = create_test_app();
        let text = draw(&app, Instant::now());
        assert!(text.contains(NO_SESSIONS_LABEL));
        assert!(text.contains(PREVIOUS_SESSIONS_LABEL));
    }

    #[test]
    fn sessions_are_listed_newest_first() {
        let app = create_loaded_app(vec![
            test_session(1, vec![Message::user("Older question")]),
            test_session(2, vec![Message::user("Newer question")]),
        ]);
        let text = draw(&app, Instant::now());
        let newer = text.find("Newer question").expect("newer listed");
        let older = text.find("Older question").expect("older listed");
        assert!(newer < older);
    }

    #[test]
    fn armed_delete_changes_label() {
        let mut app = create_loaded_app(vec![test_session(1, Vec::new())]);
        let now = Instant::now();
        assert!(draw(&app, now).contains("Delete Session"));
        app.ui.arm_delete(now);
        assert!(draw(&app, now).contains("Confirm Delete"));
    }
}
