use ratatui::style::Style;
use ratatui::text::{Line, Span};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Handles wrapping and scroll math for the chat log.
pub struct ScrollCalculator;

impl ScrollCalculator {
    /// Pre-wrap lines to `width` columns, breaking at spaces and splitting
    /// words that are wider than a whole line. Styles are preserved, and
    /// continuation rows keep the leading indentation of their source line so
    /// list items and code blocks stay aligned.
    pub fn prewrap_lines(lines: &[Line], width: u16) -> Vec<Line<'static>> {
        let width = usize::from(width);
        let mut out = Vec::with_capacity(lines.len());
        for line in lines {
            if width == 0 {
                out.push(to_owned_line(line));
            } else {
                LineWrapper::new(width, leading_indent(line, width)).wrap(line, &mut out);
            }
        }
        out
    }

    /// Offset from the top that leaves `scroll_back` lines hidden below the viewport.
    pub fn offset_from_bottom(total_lines: usize, viewport_height: u16, scroll_back: u16) -> u16 {
        let max = Self::max_scroll_offset(total_lines, viewport_height);
        max.saturating_sub(scroll_back.min(max))
    }

    pub fn max_scroll_offset(total_lines: usize, viewport_height: u16) -> u16 {
        let total = u16::try_from(total_lines).unwrap_or(u16::MAX);
        total.saturating_sub(viewport_height)
    }
}

fn to_owned_line(line: &Line) -> Line<'static> {
    Line::from(
        line.spans
            .iter()
            .map(|s| Span::styled(s.content.to_string(), s.style))
            .collect::<Vec<_>>(),
    )
}

/// Width of the leading spaces of a line, capped so wrapped text always has room.
fn leading_indent(line: &Line, width: usize) -> usize {
    let mut indent = 0;
    'spans: for span in &line.spans {
        for ch in span.content.chars() {
            if ch == ' ' {
                indent += 1;
            } else {
                break 'spans;
            }
        }
    }
    if indent * 2 > width {
        0
    } else {
        indent
    }
}

struct LineWrapper {
    width: usize,
    indent: usize,
    current: Vec<Span<'static>>,
    current_width: usize,
    word: Vec<(String, Style)>,
    word_width: usize,
    emitted: bool,
}

impl LineWrapper {
    fn new(width: usize, indent: usize) -> Self {
        Self {
            width,
            indent,
            current: Vec::new(),
            current_width: 0,
            word: Vec::new(),
            word_width: 0,
            emitted: false,
        }
    }

    fn wrap(mut self, line: &Line, out: &mut Vec<Line<'static>>) {
        for span in &line.spans {
            for grapheme in span.content.graphemes(true) {
                if grapheme == " " {
                    self.flush_word(out);
                    if self.current_width < self.width {
                        self.append(" ", span.style);
                    } else {
                        self.emit(out);
                    }
                } else {
                    push_styled(&mut self.word, grapheme, span.style);
                    self.word_width += grapheme.width();
                }
            }
        }
        self.flush_word(out);
        if !self.current.is_empty() || !self.emitted {
            out.push(Line::from(std::mem::take(&mut self.current)));
        }
    }

    fn flush_word(&mut self, out: &mut Vec<Line<'static>>) {
        if self.word_width == 0 {
            return;
        }
        if self.current_width > self.indent_for_row() && self.current_width + self.word_width > self.width
        {
            self.emit(out);
        }
        let word = std::mem::take(&mut self.word);
        for (text, style) in word {
            for grapheme in text.graphemes(true) {
                let w = grapheme.width();
                if self.current_width + w > self.width && self.current_width > self.indent_for_row()
                {
                    self.emit(out);
                }
                self.append(grapheme, style);
            }
        }
        self.word_width = 0;
    }

    /// Columns at the start of the current row that belong to the indent.
    fn indent_for_row(&self) -> usize {
        if self.emitted {
            self.indent
        } else {
            0
        }
    }

    fn append(&mut self, text: &str, style: Style) {
        if self.current.is_empty() && self.emitted && self.indent > 0 {
            self.current.push(Span::raw(" ".repeat(self.indent)));
            self.current_width = self.indent;
        }
        if self.emitted && text == " " && self.current_width == self.indent {
            return;
        }
        self.current_width += text.width();
        if let Some(last) = self.current.last_mut() {
            if last.style == style {
                last.content.to_mut().push_str(text);
                return;
            }
        }
        self.current.push(Span::styled(text.to_string(), style));
    }

    fn emit(&mut self, out: &mut Vec<Line<'static>>) {
        out.push(Line::from(std::mem::take(&mut self.current)));
        self.current_width = 0;
        self.emitted = true;
    }
}

fn push_styled(segments: &mut Vec<(String, Style)>, text: &str, style: Style) {
    match segments.last_mut() {
        Some((last, last_style)) if *last_style == style => last.push_str(text),
        _ => segments.push((text.to_string(), style)),
    }
}
