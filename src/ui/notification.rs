use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Clear, Paragraph, Wrap};
use ratatui::Frame;
use unicode_width::UnicodeWidthStr;

use crate::core::app::App;

const MAX_BANNER_WIDTH: u16 = 70;

/// Banner anchored to the top-right corner of `area`, drawn over whatever is there.
pub fn render_notification(f: &mut Frame, app: &App, area: Rect) {
    let Some(note) = &app.notification else {
        return;
    };
    let style = app.theme.notification_style(note.kind);
    let text = format!(" {}  [Esc] ", note.message);
    let text_width = u16::try_from(text.width()).unwrap_or(u16::MAX);
    let width = text_width.min(MAX_BANNER_WIDTH).min(area.width);
    if width == 0 || area.height == 0 {
        return;
    }
    let height = text_width.div_ceil(width).clamp(1, 3).min(area.height);
    let banner = Rect {
        x: area.x + area.width - width,
        y: area.y,
        width,
        height,
    };
    f.render_widget(Clear, banner);
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(text, style)))
            .style(style)
            .wrap(Wrap { trim: false }),
        banner,
    );
}
