use ratatui::style::{Color, Modifier, Style};

use crate::core::notification::NotificationKind;

#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub is_dark: bool,
    // Overall background color to paint the full frame
    pub background_color: Color,

    // Chat message styles
    pub user_prefix_style: Style,
    pub user_text_style: Style,
    pub assistant_prefix_style: Style,
    pub assistant_text_style: Style,
    pub placeholder_style: Style,

    // Markdown
    pub md_heading_styles: [Style; 3],
    pub md_code_style: Style,
    pub md_blockquote_style: Style,
    pub md_list_marker_style: Style,
    pub md_link_style: Style,
    pub md_rule_style: Style,

    // Chrome
    pub title_style: Style,
    pub subtitle_style: Style,
    pub section_title_style: Style,
    pub border_style: Style,
    pub focused_border_style: Style,
    pub footer_style: Style,
    pub disabled_style: Style,
    pub key_hint_style: Style,

    // Sidebar
    pub sidebar_item_style: Style,
    pub sidebar_selected_style: Style,
    pub sidebar_current_style: Style,
    pub delete_style: Style,
    pub delete_armed_style: Style,

    // Input area
    pub input_text_style: Style,
    pub input_placeholder_style: Style,
    pub input_cursor_style: Style,
    pub input_cursor_line_style: Style,

    // Notifications
    pub notification_info_style: Style,
    pub notification_warning_style: Style,
    pub notification_error_style: Style,
}

impl Theme {
    pub fn dark() -> Self {
        Theme {
            is_dark: true,
            background_color: Color::Rgb(0x1e, 0x1f, 0x26),

            user_prefix_style: Style::default()
                .fg(Color::Rgb(0x7d, 0xcf, 0xff))
                .add_modifier(Modifier::BOLD),
            user_text_style: Style::default().fg(Color::Rgb(0xc0, 0xe8, 0xff)),
            assistant_prefix_style: Style::default()
                .fg(Color::Rgb(0xbb, 0x9a, 0xf7))
                .add_modifier(Modifier::BOLD),
            assistant_text_style: Style::default().fg(Color::Rgb(0xe6, 0xe6, 0xe6)),
            placeholder_style: Style::default()
                .fg(Color::Rgb(0x8a, 0x8f, 0x98))
                .add_modifier(Modifier::ITALIC),

            md_heading_styles: [
                Style::default()
                    .fg(Color::Rgb(0xff, 0xc7, 0x77))
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
                Style::default()
                    .fg(Color::Rgb(0xff, 0xc7, 0x77))
                    .add_modifier(Modifier::BOLD),
                Style::default()
                    .fg(Color::Rgb(0xe0, 0xaf, 0x68))
                    .add_modifier(Modifier::BOLD),
            ],
            md_code_style: Style::default().fg(Color::Rgb(0x9e, 0xce, 0x6a)),
            md_blockquote_style: Style::default()
                .fg(Color::Rgb(0xa9, 0xb1, 0xd6))
                .add_modifier(Modifier::ITALIC),
            md_list_marker_style: Style::default().fg(Color::Rgb(0x7a, 0xa2, 0xf7)),
            md_link_style: Style::default()
                .fg(Color::Rgb(0x7a, 0xa2, 0xf7))
                .add_modifier(Modifier::UNDERLINED),
            md_rule_style: Style::default().fg(Color::Rgb(0x56, 0x5f, 0x89)),

            title_style: Style::default()
                .fg(Color::Rgb(0xff, 0xff, 0xff))
                .add_modifier(Modifier::BOLD),
            subtitle_style: Style::default().fg(Color::Rgb(0xa9, 0xb1, 0xd6)),
            section_title_style: Style::default()
                .fg(Color::Rgb(0xe6, 0xe6, 0xe6))
                .add_modifier(Modifier::BOLD),
            border_style: Style::default().fg(Color::Rgb(0x56, 0x5f, 0x89)),
            focused_border_style: Style::default().fg(Color::Rgb(0x7d, 0xcf, 0xff)),
            footer_style: Style::default().fg(Color::Rgb(0x8a, 0x8f, 0x98)),
            disabled_style: Style::default().fg(Color::Rgb(0x56, 0x5f, 0x89)),
            key_hint_style: Style::default()
                .fg(Color::Rgb(0xbb, 0x9a, 0xf7))
                .add_modifier(Modifier::BOLD),

            sidebar_item_style: Style::default().fg(Color::Rgb(0xc0, 0xca, 0xf5)),
            sidebar_selected_style: Style::default().add_modifier(Modifier::REVERSED),
            sidebar_current_style: Style::default()
                .fg(Color::Rgb(0x7d, 0xcf, 0xff))
                .add_modifier(Modifier::BOLD),
            delete_style: Style::default().fg(Color::Rgb(0xf7, 0x76, 0x8e)),
            delete_armed_style: Style::default()
                .fg(Color::Rgb(0x1e, 0x1f, 0x26))
                .bg(Color::Rgb(0xf7, 0x76, 0x8e))
                .add_modifier(Modifier::BOLD),

            input_text_style: Style::default().fg(Color::Rgb(0xe6, 0xe6, 0xe6)),
            input_placeholder_style: Style::default().fg(Color::Rgb(0x6b, 0x70, 0x89)),
            input_cursor_style: Style::default().add_modifier(Modifier::REVERSED),
            input_cursor_line_style: Style::default(),

            notification_info_style: Style::default()
                .fg(Color::Rgb(0x1e, 0x1f, 0x26))
                .bg(Color::Rgb(0x7d, 0xcf, 0xff)),
            notification_warning_style: Style::default()
                .fg(Color::Rgb(0x1e, 0x1f, 0x26))
                .bg(Color::Rgb(0xe0, 0xaf, 0x68)),
            notification_error_style: Style::default()
                .fg(Color::Rgb(0xff, 0xff, 0xff))
                .bg(Color::Rgb(0xdb, 0x4b, 0x4b)),
        }
    }

    pub fn light() -> Self {
        Theme {
            is_dark: false,
            background_color: Color::Rgb(0xfa, 0xfa, 0xfa),

            user_prefix_style: Style::default()
                .fg(Color::Rgb(0x1d, 0x4e, 0xd8))
                .add_modifier(Modifier::BOLD),
            user_text_style: Style::default().fg(Color::Rgb(0x1e, 0x3a, 0x8a)),
            assistant_prefix_style: Style::default()
                .fg(Color::Rgb(0x6d, 0x28, 0xd9))
                .add_modifier(Modifier::BOLD),
            assistant_text_style: Style::default().fg(Color::Rgb(0x1f, 0x29, 0x37)),
            placeholder_style: Style::default()
                .fg(Color::Rgb(0x6b, 0x72, 0x80))
                .add_modifier(Modifier::ITALIC),

            md_heading_styles: [
                Style::default()
                    .fg(Color::Rgb(0x9a, 0x34, 0x12))
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
                Style::default()
                    .fg(Color::Rgb(0x9a, 0x34, 0x12))
                    .add_modifier(Modifier::BOLD),
                Style::default()
                    .fg(Color::Rgb(0xb4, 0x53, 0x09))
                    .add_modifier(Modifier::BOLD),
            ],
            md_code_style: Style::default().fg(Color::Rgb(0x04, 0x78, 0x57)),
            md_blockquote_style: Style::default()
                .fg(Color::Rgb(0x4b, 0x55, 0x63))
                .add_modifier(Modifier::ITALIC),
            md_list_marker_style: Style::default().fg(Color::Rgb(0x1d, 0x4e, 0xd8)),
            md_link_style: Style::default()
                .fg(Color::Rgb(0x1d, 0x4e, 0xd8))
                .add_modifier(Modifier::UNDERLINED),
            md_rule_style: Style::default().fg(Color::Rgb(0x9c, 0xa3, 0xaf)),

            title_style: Style::default()
                .fg(Color::Rgb(0x11, 0x18, 0x27))
                .add_modifier(Modifier::BOLD),
            subtitle_style: Style::default().fg(Color::Rgb(0x4b, 0x55, 0x63)),
            section_title_style: Style::default()
                .fg(Color::Rgb(0x11, 0x18, 0x27))
                .add_modifier(Modifier::BOLD),
            border_style: Style::default().fg(Color::Rgb(0x9c, 0xa3, 0xaf)),
            focused_border_style: Style::default().fg(Color::Rgb(0x1d, 0x4e, 0xd8)),
            footer_style: Style::default().fg(Color::Rgb(0x6b, 0x72, 0x80)),
            disabled_style: Style::default().fg(Color::Rgb(0x9c, 0xa3, 0xaf)),
            key_hint_style: Style::default()
                .fg(Color::Rgb(0x6d, 0x28, 0xd9))
                .add_modifier(Modifier::BOLD),

            sidebar_item_style: Style::default().fg(Color::Rgb(0x1f, 0x29, 0x37)),
            sidebar_selected_style: Style::default().add_modifier(Modifier::REVERSED),
            sidebar_current_style: Style::default()
                .fg(Color::Rgb(0x1d, 0x4e, 0xd8))
                .add_modifier(Modifier::BOLD),
            delete_style: Style::default().fg(Color::Rgb(0xb9, 0x1c, 0x1c)),
            delete_armed_style: Style::default()
                .fg(Color::Rgb(0xff, 0xff, 0xff))
                .bg(Color::Rgb(0xb9, 0x1c, 0x1c))
                .add_modifier(Modifier::BOLD),

            input_text_style: Style::default().fg(Color::Rgb(0x11, 0x18, 0x27)),
            input_placeholder_style: Style::default().fg(Color::Rgb(0x9c, 0xa3, 0xaf)),
            input_cursor_style: Style::default().add_modifier(Modifier::REVERSED),
            input_cursor_line_style: Style::default(),

            notification_info_style: Style::default()
                .fg(Color::Rgb(0xff, 0xff, 0xff))
                .bg(Color::Rgb(0x1d, 0x4e, 0xd8)),
            notification_warning_style: Style::default()
                .fg(Color::Rgb(0x11, 0x18, 0x27))
                .bg(Color::Rgb(0xfb, 0xbf, 0x24)),
            notification_error_style: Style::default()
                .fg(Color::Rgb(0xff, 0xff, 0xff))
                .bg(Color::Rgb(0xb9, 0x1c, 0x1c)),
        }
    }

    /// Palette for the persisted theme flag.
    pub fn from_dark_flag(dark: bool) -> Self {
        if dark {
            Self::dark()
        } else {
            Self::light()
        }
    }

    /// Monochrome palette for output that leaves the terminal colors alone.
    pub fn monochrome() -> Self {
        let plain = Style::default();
        let bold = Style::default().add_modifier(Modifier::BOLD);
        let italic = Style::default().add_modifier(Modifier::ITALIC);
        Theme {
            is_dark: false,
            background_color: Color::Reset,
            user_prefix_style: bold,
            user_text_style: plain,
            assistant_prefix_style: bold,
            assistant_text_style: plain,
            placeholder_style: italic,
            md_heading_styles: [bold.add_modifier(Modifier::UNDERLINED), bold, bold],
            md_code_style: plain,
            md_blockquote_style: italic,
            md_list_marker_style: plain,
            md_link_style: Style::default().add_modifier(Modifier::UNDERLINED),
            md_rule_style: plain,
            title_style: bold,
            subtitle_style: plain,
            section_title_style: bold,
            border_style: plain,
            focused_border_style: bold,
            footer_style: plain,
            disabled_style: Style::default().add_modifier(Modifier::DIM),
            key_hint_style: bold,
            sidebar_item_style: plain,
            sidebar_selected_style: Style::default().add_modifier(Modifier::REVERSED),
            sidebar_current_style: bold,
            delete_style: plain,
            delete_armed_style: Style::default().add_modifier(Modifier::REVERSED),
            input_text_style: plain,
            input_placeholder_style: Style::default().add_modifier(Modifier::DIM),
            input_cursor_style: Style::default().add_modifier(Modifier::REVERSED),
            input_cursor_line_style: plain,
            notification_info_style: Style::default().add_modifier(Modifier::REVERSED),
            notification_warning_style: Style::default().add_modifier(Modifier::REVERSED),
            notification_error_style: Style::default()
                .add_modifier(Modifier::REVERSED | Modifier::BOLD),
        }
    }

    /// Heading style for `#`..`######`; levels past three share the third style.
    pub fn md_heading_style(&self, level: u8) -> Style {
        let index = usize::from(level.clamp(1, 3)) - 1;
        self.md_heading_styles[index]
    }

    pub fn notification_style(&self, kind: NotificationKind) -> Style {
        match kind {
            NotificationKind::Info => self.notification_info_style,
            NotificationKind::Warning => self.notification_warning_style,
            NotificationKind::Error => self.notification_error_style,
        }
    }

    /// Glyph of the theme toggle: the icon of the theme a toggle switches to.
    pub fn toggle_glyph(&self) -> &'static str {
        if self.is_dark {
            "☀️"
        } else {
            "🌙"
        }
    }

    pub fn base_style(&self) -> Style {
        Style::default().bg(self.background_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dark_flag_selects_palette() {
        assert!(Theme::from_dark_flag(true).is_dark);
        assert!(!Theme::from_dark_flag(false).is_dark);
        assert_ne!(Theme::dark(), Theme::light());
    }

    #[test]
    fn heading_levels_clamp() {
        let theme = Theme::dark();
        assert_eq!(theme.md_heading_style(1), theme.md_heading_styles[0]);
        assert_eq!(theme.md_heading_style(6), theme.md_heading_styles[2]);
        assert_eq!(theme.md_heading_style(0), theme.md_heading_styles[0]);
    }

    #[test]
    fn toggle_glyph_shows_the_other_theme() {
        assert_eq!(Theme::dark().toggle_glyph(), "☀️");
        assert_eq!(Theme::light().toggle_glyph(), "🌙");
    }
}
