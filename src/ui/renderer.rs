use std::time::Instant;

use ratatui::widgets::Block;
use ratatui::Frame;

use super::chat_display::render_chat;
use super::header::{render_footer, render_guide, render_header};
use super::input_section::{render_buttons, render_question_input, render_url_input};
use super::layout::ScreenAreas;
use super::notification::render_notification;
use super::sidebar::render_sidebar;
use crate::core::app::App;

pub fn ui(f: &mut Frame, app: &App) {
    let area = f.area();
    f.render_widget(Block::default().style(app.theme.base_style()), area);

    let areas = ScreenAreas::compute(area);
    render_sidebar(f, app, areas.sidebar, Instant::now());
    render_header(f, app, areas.header);
    render_guide(f, app, areas.guide);
    render_chat(f, app, areas.chat);
    render_url_input(f, app, areas.url_input);
    render_question_input(f, app, areas.question_input);
    render_buttons(f, app, areas.buttons);
    render_footer(f, app, areas.footer);
    render_notification(f, app, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::app::{apply_action, AppAction, AppActionContext};
    use crate::core::constants::APP_TITLE;
    use crate::core::message::Message;
    use crate::utils::test_utils::{create_loaded_app, test_session};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn draw(app: &App, width: u16, height: u16) -> String {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).expect("terminal");
        terminal.draw(|f| ui(f, app)).expect("draw");
        let buffer = terminal.backend().buffer();
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
    fn empty_session_shows_title_and_placeholder() {
        let app = create_loaded_app(vec![test_session(1, Vec::new())]);
        let screen = draw(&app, 120, 40);
        assert!(screen.contains(APP_TITLE));
        assert!(screen.contains("Start a conversation by asking a question"));
        assert!(screen.contains("How to Use"));
    }

    #[test]
    fn conversation_and_error_banner_render() {
        let mut app = create_loaded_app(vec![test_session(
            1,
            vec![Message::user("Hi"), Message::assistant("Hello there")],
        )]);
        app.show_error("backend down", std::time::Instant::now());
        let screen = draw(&app, 120, 30);
        assert!(screen.contains("Hello there"));
        assert!(screen.contains("backend down"));
        assert!(!screen.contains("How to Use"));
    }

    #[test]
    fn narrow_terminal_hides_sidebar() {
        let app = create_loaded_app(vec![test_session(1, Vec::new())]);
        let screen = draw(&app, 60, 20);
        assert!(!screen.contains("Sessions"));
    }

    #[test]
    fn sending_state_shows_processing_title() {
        let mut app = create_loaded_app(vec![test_session(1, Vec::new())]);
        apply_action(
            &mut app,
            AppAction::SendMessage {
                question: "What is FERPA?".into(),
                url: String::new(),
            },
            AppActionContext::now(),
        );
        let screen = draw(&app, 120, 40);
        assert!(screen.contains("Processing..."));
        assert!(screen.contains("What is FERPA?"));
    }
}
