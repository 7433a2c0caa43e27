//! Static chrome around the chat: title bar, usage guide, example prompts and footer.

use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::core::app::App;
use crate::core::constants::{APP_SUBTITLE, APP_TITLE, EXAMPLE_PROMPTS, FOOTER_TEXT, INSTRUCTIONS};
use crate::ui::theme::Theme;

pub const INSTRUCTIONS_TITLE: &str = "📚 How to Use";
pub const EXAMPLES_TITLE: &str = "💡 Example Questions";

pub fn render_header(f: &mut Frame, app: &App, area: Rect) {
    if area.height == 0 {
        return;
    }
    let theme = &app.theme;
    let toggle = Line::from(vec![
        Span::styled(theme.toggle_glyph(), theme.key_hint_style),
        Span::styled(" Ctrl+T", theme.footer_style),
    ])
    .alignment(Alignment::Right);
    let lines = vec![
        Line::from(Span::styled(APP_TITLE, theme.title_style)),
        Line::from(Span::styled(APP_SUBTITLE, theme.subtitle_style)),
    ];
    f.render_widget(Paragraph::new(lines), area);
    f.render_widget(Paragraph::new(toggle), Rect { height: 1, ..area });
}

pub fn render_guide(f: &mut Frame, app: &App, area: Rect) {
    if area.height == 0 {
        return;
    }
    let theme = &app.theme;
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    let instructions: Vec<Line> = INSTRUCTIONS
        .iter()
        .map(|text| Line::from(Span::styled(format!("• {text}"), theme.subtitle_style)))
        .collect();
    f.render_widget(
        Paragraph::new(instructions)
            .wrap(ratatui::widgets::Wrap { trim: true })
            .block(titled_block(INSTRUCTIONS_TITLE, theme)),
        columns[0],
    );

    f.render_widget(
        Paragraph::new(example_lines(app))
            .wrap(ratatui::widgets::Wrap { trim: true })
            .block(titled_block(EXAMPLES_TITLE, theme)),
        columns[1],
    );
}

fn example_lines(app: &App) -> Vec<Line<'static>> {
    let theme = &app.theme;
    let text_style = if app.is_sending() {
        theme.disabled_style
    } else {
        theme.subtitle_style
    };
    EXAMPLE_PROMPTS
        .iter()
        .enumerate()
        .map(|(index, prompt)| {
            Line::from(vec![
                Span::styled(format!("Alt+{} ", index + 1), theme.key_hint_style),
                Span::styled(prompt.to_string(), text_style),
            ])
        })
        .collect()
}

fn titled_block<'a>(title: &'a str, theme: &Theme) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style)
        .title(Span::styled(format!(" {title} "), theme.section_title_style))
}

pub fn render_footer(f: &mut Frame, app: &App, area: Rect) {
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(FOOTER_TEXT, app.theme.footer_style)))
            .alignment(Alignment::Center),
        area,
    );
}
