use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;
use tui_textarea::TextArea;

use crate::core::app::{App, UiFocus};
use crate::ui::theme::Theme;

pub const URL_TITLE: &str = "🔗 URL (Optional)";
pub const QUESTION_TITLE: &str = "💬 Your Question";
pub const PROCESSING_TITLE: &str = "⏳ Processing...";
pub const SEND_LABEL: &str = "📤 Send (Enter)";
pub const CLEAR_LABEL: &str = "🗑️ Clear History (Ctrl+L)";

pub fn render_url_input(f: &mut Frame, app: &App, area: Rect) {
    let focused = app.ui.focus == UiFocus::Url;
    let field = styled_field(app.ui.url_area(), URL_TITLE, focused, app);
    f.render_widget(&field, area);
}

pub fn render_question_input(f: &mut Frame, app: &App, area: Rect) {
    let focused = app.ui.focus == UiFocus::Question;
    let title = question_title(app);
    let field = styled_field(app.ui.question_area(), title, focused, app);
    f.render_widget(&field, area);
}

pub fn question_title(app: &App) -> &'static str {
    if app.is_sending() {
        PROCESSING_TITLE
    } else {
        QUESTION_TITLE
    }
}

fn styled_field(
    source: &TextArea<'static>,
    title: &'static str,
    focused: bool,
    app: &App,
) -> TextArea<'static> {
    let theme = &app.theme;
    let mut field = source.clone();
    let border = if focused && !app.is_sending() {
        theme.focused_border_style
    } else {
        theme.border_style
    };
    field.set_block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(Span::styled(format!(" {title} "), theme.section_title_style)),
    );
    if !focused || app.is_sending() {
        field.set_cursor_style(Style::default());
    }
    if app.is_sending() {
        field.set_style(theme.disabled_style);
    }
    field
}

/// Whether the send affordance accepts input right now.
pub fn can_send(app: &App) -> bool {
    !app.is_sending() && !app.ui.question_text().trim().is_empty()
}

pub fn render_buttons(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let send_style = button_style(can_send(app), theme);
    let clear_style = button_style(!app.is_sending(), theme);
    let line = Line::from(vec![
        Span::styled(CLEAR_LABEL, clear_style),
        Span::raw("   "),
        Span::styled(SEND_LABEL, send_style),
        Span::styled(
            "   Shift+Enter newline · Tab switch field · Ctrl+C quit",
            theme.footer_style,
        ),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn button_style(enabled: bool, theme: &Theme) -> Style {
    if enabled {
        theme.key_hint_style
    } else {
        theme.disabled_style
    }
}
