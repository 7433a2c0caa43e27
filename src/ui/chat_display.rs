use ratatui::layout::Rect;
use ratatui::text::Span;
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use super::layout::{LayoutEngine, ScreenAreas};
use crate::core::app::App;
use crate::utils::scroll::ScrollCalculator;

pub const CHAT_TITLE: &str = " Conversation ";

fn chat_block(app: &App) -> Block<'static> {
    Block::default()
        .borders(Borders::TOP)
        .border_style(app.theme.border_style)
        .title(Span::styled(CHAT_TITLE, app.theme.section_title_style))
}

pub fn render_chat(f: &mut Frame, app: &App, area: Rect) {
    let block = chat_block(app);
    let inner = block.inner(area);
    f.render_widget(block, area);
    if inner.width == 0 || inner.height == 0 {
        return;
    }

    let layout = LayoutEngine::layout_messages(&app.messages, &app.theme, inner.width);
    let offset =
        ScrollCalculator::offset_from_bottom(layout.lines.len(), inner.height, app.ui.scroll_back);
    f.render_widget(Paragraph::new(layout.lines).scroll((offset, 0)), inner);
}

fn chat_inner_area(app: &App) -> Rect {
    let size = app.ui.last_term_size;
    let areas = ScreenAreas::compute(Rect::new(0, 0, size.width, size.height));
    chat_block(app).inner(areas.chat)
}

/// Rows of the chat log visible at the last draw; one page for PageUp/PageDown.
pub fn chat_viewport_height(app: &App) -> u16 {
    chat_inner_area(app).height
}

/// Largest useful `scroll_back` for the terminal size seen at the last draw.
pub fn max_scroll_back(app: &App) -> u16 {
    let inner = chat_inner_area(app);
    if inner.width == 0 {
        return 0;
    }
    let layout = LayoutEngine::layout_messages(&app.messages, &app.theme, inner.width);
    ScrollCalculator::max_scroll_offset(layout.lines.len(), inner.height)
}

/// Keep `scroll_back` within what the chat log can actually scroll.
pub fn clamp_scroll(app: &mut App) {
    let max = max_scroll_back(app);
    if app.ui.scroll_back > max {
        app.ui.scroll_back = max;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message::Message;
    use crate::utils::test_utils::create_test_app;
    use ratatui::layout::Size;

    fn long_conversation(app: &mut App) {
        for i in 0..40 {
            app.messages.push(Message::user(format!("question {i}")));
            app.messages.push(Message::assistant(format!("answer {i}")));
        }
    }

    #[test]
    fn clamp_limits_scroll_to_content() {
        let mut app = create_test_app();
        app.ui.last_term_size = Size::new(120, 40);
        app.ui.scroll_to_top();
        clamp_scroll(&mut app);
        assert_eq!(app.ui.scroll_back, 0);

        long_conversation(&mut app);
        app.ui.scroll_to_top();
        clamp_scroll(&mut app);
        assert!(app.ui.scroll_back > 0);
        assert_eq!(app.ui.scroll_back, max_scroll_back(&app));
    }

    #[test]
    fn unknown_terminal_size_never_scrolls() {
        let mut app = create_test_app();
        long_conversation(&mut app);
        app.ui.scroll_up(10);
        clamp_scroll(&mut app);
        assert_eq!(app.ui.scroll_back, 0);
    }
}
