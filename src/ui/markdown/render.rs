use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthStr;

use crate::ui::theme::Theme;

const BLOCKQUOTE_BAR: &str = "│ ";
const CODE_BLOCK_INDENT: &str = "    ";

/// Render assistant Markdown into unwrapped lines. `width` only sizes
/// horizontal rules; wrapping happens afterwards.
pub fn render_markdown(content: &str, theme: &Theme, width: usize) -> Vec<Line<'static>> {
    MarkdownRenderer::new(content, theme, width).render()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ListKind {
    Unordered,
    Ordered(u64),
}

struct ListLevel {
    kind: ListKind,
    marker_width: usize,
}

struct PendingLink {
    dest: String,
    text: String,
}

struct MarkdownRenderer<'a> {
    content: &'a str,
    theme: &'a Theme,
    width: usize,
    lines: Vec<Line<'static>>,
    current_spans: Vec<Span<'static>>,
    style_stack: Vec<Style>,
    list_stack: Vec<ListLevel>,
    /// Marker of a list item whose first line has not been flushed yet.
    pending_marker: Option<(usize, String)>,
    quote_depth: usize,
    code_block: Option<Vec<String>>,
    links: Vec<PendingLink>,
}

impl<'a> MarkdownRenderer<'a> {
    fn new(content: &'a str, theme: &'a Theme, width: usize) -> Self {
        Self {
            content,
            theme,
            width,
            lines: Vec::new(),
            current_spans: Vec::new(),
            style_stack: vec![theme.assistant_text_style],
            list_stack: Vec::new(),
            pending_marker: None,
            quote_depth: 0,
            code_block: None,
            links: Vec::new(),
        }
    }

    fn render(mut self) -> Vec<Line<'static>> {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);
        let parser = Parser::new_ext(self.content, options);

        for event in parser {
            match event {
                Event::Start(tag) => self.start_tag(tag),
                Event::End(tag_end) => self.end_tag(tag_end),
                Event::Text(text) => {
                    if let Some(buffer) = self.code_block.as_mut() {
                        buffer.push(text.into_string());
                    } else {
                        self.push_text(&text, self.current_style());
                    }
                }
                Event::Code(code) => self.push_text(&code, self.theme.md_code_style),
                Event::SoftBreak | Event::HardBreak => self.flush_line(),
                Event::Rule => {
                    self.flush_line();
                    self.push_rule();
                    self.push_blank_line();
                }
                Event::TaskListMarker(checked) => {
                    let marker = if checked { "[x] " } else { "[ ] " };
                    self.current_spans
                        .push(Span::styled(marker, self.theme.md_list_marker_style));
                }
                Event::Html(html) | Event::InlineHtml(html) => {
                    self.push_text(&html, self.current_style());
                }
                _ => {}
            }
        }

        self.flush_line();
        while self
            .lines
            .last()
            .is_some_and(|line| line.width() == 0)
        {
            self.lines.pop();
        }
        self.lines
    }

    fn start_tag(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Heading { level, .. } => {
                self.flush_line();
                let style = self.theme.md_heading_style(level as u8);
                self.style_stack.push(style);
            }
            Tag::BlockQuote(_) => {
                self.flush_line();
                self.quote_depth += 1;
                self.style_stack.push(self.theme.md_blockquote_style);
            }
            Tag::List(start) => {
                self.flush_line();
                self.list_stack.push(ListLevel {
                    kind: match start {
                        Some(n) => ListKind::Ordered(n),
                        None => ListKind::Unordered,
                    },
                    marker_width: 0,
                });
            }
            Tag::Item => {
                self.flush_line();
                let depth = self.list_stack.len().saturating_sub(1);
                let parent_indent: usize = self.list_stack[..depth]
                    .iter()
                    .map(|level| level.marker_width)
                    .sum();
                let Some(level) = self.list_stack.last_mut() else {
                    return;
                };
                let marker = match &mut level.kind {
                    ListKind::Unordered => "• ".to_string(),
                    ListKind::Ordered(n) => {
                        let marker = format!("{n}. ");
                        *n += 1;
                        marker
                    }
                };
                level.marker_width = marker.width();
                self.pending_marker = Some((parent_indent, marker));
            }
            Tag::CodeBlock(kind) => {
                self.flush_line();
                if let CodeBlockKind::Fenced(lang) = kind {
                    if !lang.is_empty() {
                        self.push_prefixed_line(vec![Span::styled(
                            format!("{CODE_BLOCK_INDENT}{lang}"),
                            self.theme.md_rule_style,
                        )]);
                    }
                }
                self.code_block = Some(Vec::new());
            }
            Tag::Emphasis => self.push_modifier(Modifier::ITALIC),
            Tag::Strong => self.push_modifier(Modifier::BOLD),
            Tag::Strikethrough => self.push_modifier(Modifier::CROSSED_OUT),
            Tag::Link { dest_url, .. } => {
                self.style_stack.push(self.theme.md_link_style);
                self.links.push(PendingLink {
                    dest: dest_url.into_string(),
                    text: String::new(),
                });
            }
            _ => {}
        }
    }

    fn end_tag(&mut self, tag_end: TagEnd) {
        match tag_end {
            TagEnd::Paragraph => {
                self.flush_line();
                if self.list_stack.is_empty() {
                    self.push_blank_line();
                }
            }
            TagEnd::Heading(_) => {
                self.flush_line();
                self.push_blank_line();
                self.style_stack.pop();
            }
            TagEnd::BlockQuote(_) => {
                self.flush_line();
                self.quote_depth = self.quote_depth.saturating_sub(1);
                self.style_stack.pop();
            }
            TagEnd::List(_) => {
                self.flush_line();
                self.list_stack.pop();
                if self.list_stack.is_empty() {
                    self.push_blank_line();
                }
            }
            TagEnd::Item => {
                self.flush_line();
                self.pending_marker = None;
            }
            TagEnd::CodeBlock => {
                let buffer = self.code_block.take().unwrap_or_default();
                let joined = buffer.concat();
                for code_line in joined.trim_end_matches('\n').split('\n') {
                    self.push_prefixed_line(vec![Span::styled(
                        format!("{CODE_BLOCK_INDENT}{}", detab(code_line)),
                        self.theme.md_code_style,
                    )]);
                }
                self.push_blank_line();
            }
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough => {
                self.style_stack.pop();
            }
            TagEnd::Link => {
                self.style_stack.pop();
                if let Some(link) = self.links.pop() {
                    if !link.dest.is_empty() && link.dest != link.text {
                        self.current_spans.push(Span::styled(
                            format!(" ({})", link.dest),
                            self.theme.md_rule_style,
                        ));
                    }
                }
            }
            _ => {}
        }
    }

    fn current_style(&self) -> Style {
        self.style_stack
            .last()
            .copied()
            .unwrap_or(self.theme.assistant_text_style)
    }

    fn push_modifier(&mut self, modifier: Modifier) {
        let style = self.current_style().add_modifier(modifier);
        self.style_stack.push(style);
    }

    fn push_text(&mut self, text: &str, style: Style) {
        if let Some(link) = self.links.last_mut() {
            link.text.push_str(text);
        }
        self.current_spans.push(Span::styled(detab(text), style));
    }

    fn list_indent(&self) -> usize {
        self.list_stack.iter().map(|level| level.marker_width).sum()
    }

    /// Close the line being built, adding quote bars and list indentation.
    fn flush_line(&mut self) {
        if self.current_spans.is_empty() {
            return;
        }
        let mut spans = Vec::with_capacity(self.current_spans.len() + 2);
        match self.pending_marker.take() {
            Some((indent, marker)) => {
                if indent > 0 {
                    spans.push(Span::raw(" ".repeat(indent)));
                }
                spans.push(Span::styled(marker, self.theme.md_list_marker_style));
            }
            None => {
                let indent = self.list_indent();
                if indent > 0 {
                    spans.push(Span::raw(" ".repeat(indent)));
                }
            }
        }
        spans.append(&mut self.current_spans);
        self.push_prefixed_line(spans);
    }

    fn push_prefixed_line(&mut self, spans: Vec<Span<'static>>) {
        if self.quote_depth == 0 {
            self.lines.push(Line::from(spans));
            return;
        }
        let mut prefixed = vec![Span::styled(
            BLOCKQUOTE_BAR.repeat(self.quote_depth),
            self.theme.md_blockquote_style,
        )];
        prefixed.extend(spans);
        self.lines.push(Line::from(prefixed));
    }

    fn push_blank_line(&mut self) {
        if self.lines.last().is_some_and(|line| line.width() == 0) || self.lines.is_empty() {
            return;
        }
        self.lines.push(Line::default());
    }

    fn push_rule(&mut self) {
        let rule_width = (self.width * 4 / 5).clamp(3, 80);
        self.push_prefixed_line(vec![Span::styled(
            "─".repeat(rule_width),
            self.theme.md_rule_style,
        )]);
    }
}

fn detab(s: &str) -> String {
    s.replace('\t', "    ")
}
