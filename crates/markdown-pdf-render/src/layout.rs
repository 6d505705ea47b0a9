use markdown_pdf_config::{PageSettings, Rgb, StyleConfig};
use markdown_pdf_flow::RenderBlock;

use crate::metrics::{text_width, Font, BULLET};

/// Heading line height as a multiple of the font size.
const HEADING_LEADING: f32 = 1.2;
/// Gap between the bullet glyph and the item text.
const BULLET_GAP: f32 = 10.0;

/// One positioned line of text, in PDF user space (origin bottom-left).
#[derive(Clone, Debug, PartialEq)]
pub struct TextRun {
    pub x: f32,
    pub baseline: f32,
    pub font: Font,
    pub size: f32,
    pub color: Rgb,
    pub text: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Page {
    pub runs: Vec<TextRun>,
}

/// Lays `blocks` out top to bottom, breaking pages when a line no longer fits.
///
/// Always returns at least one page.
pub fn layout(blocks: &[RenderBlock], style: &StyleConfig, page: &PageSettings) -> Vec<Page> {
    let mut cursor = Cursor::new(page);
    let body = Pen {
        font: Font::Regular,
        size: style.paragraph.font_size,
        color: Rgb::BLACK,
        line_height: style.paragraph.line_height,
    };

    for block in blocks {
        match block {
            RenderBlock::Heading { level, text } => {
                let heading = style.heading(level.depth());
                let pen = Pen {
                    font: Font::Bold,
                    size: heading.font_size,
                    color: heading.color,
                    line_height: heading.font_size * HEADING_LEADING,
                };
                if !cursor.at_top() {
                    cursor.advance(heading.space_before);
                }
                for line in wrap(text, pen.font, pen.size, page.content_width()) {
                    cursor.line(&pen, &[(0.0, line)]);
                }
                cursor.advance(heading.space_after);
            }
            RenderBlock::Paragraph { text } => {
                for line in wrap(text, body.font, body.size, page.content_width()) {
                    cursor.line(&body, &[(0.0, line)]);
                }
                cursor.advance(style.paragraph.space_after);
            }
            RenderBlock::List { items } => {
                let indent = style.list.indent;
                let bullet_x = (indent - BULLET_GAP).max(0.0);
                let width = (page.content_width() - indent).max(body.size);

                for item in items {
                    let lines = wrap(item, body.font, body.size, width);
                    for (idx, line) in lines.into_iter().enumerate() {
                        if idx == 0 {
                            cursor.line(&body, &[(bullet_x, BULLET.to_string()), (indent, line)]);
                        } else {
                            cursor.line(&body, &[(indent, line)]);
                        }
                    }
                    cursor.advance(style.paragraph.space_after);
                }
            }
            RenderBlock::Spacer => cursor.advance(style.spacer_height),
        }
    }

    cursor.finish()
}

struct Pen {
    font: Font,
    size: f32,
    color: Rgb,
    line_height: f32,
}

struct Cursor<'a> {
    settings: &'a PageSettings,
    pages: Vec<Page>,
    /// Vertical space consumed on the current page, measured from the top margin.
    used: f32,
}

impl<'a> Cursor<'a> {
    fn new(settings: &'a PageSettings) -> Self {
        Cursor {
            settings,
            pages: vec![Page::default()],
            used: 0.0,
        }
    }

    fn at_top(&self) -> bool {
        self.used <= 0.0
    }

    /// Spacing may run past the bottom; the next line then starts a new page.
    fn advance(&mut self, amount: f32) {
        self.used += amount;
    }

    /// Places one line made of `(x offset, text)` segments and moves below it.
    fn line(&mut self, pen: &Pen, segments: &[(f32, String)]) {
        if !self.at_top() && self.used + pen.line_height > self.settings.content_height() {
            self.pages.push(Page::default());
            self.used = 0.0;
        }

        let top = self.settings.height() - self.settings.margins.top - self.used;
        let baseline = top - pen.line_height / 2.0 - pen.size * 0.35;
        if let Some(page) = self.pages.last_mut() {
            for (offset, text) in segments {
                page.runs.push(TextRun {
                    x: self.settings.margins.left + offset,
                    baseline,
                    font: pen.font,
                    size: pen.size,
                    color: pen.color,
                    text: text.clone(),
                });
            }
        }
        self.used += pen.line_height;
    }

    fn finish(self) -> Vec<Page> {
        self.pages
    }
}

/// Greedy word wrap. Words wider than `max_width` are split between characters.
pub fn wrap(text: &str, font: Font, size: f32, max_width: f32) -> Vec<String> {
    let space = text_width(" ", font, size);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0.0;

    for word in text.split_whitespace() {
        let word_width = text_width(word, font, size);

        if word_width > max_width {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                current_width = 0.0;
            }
            for ch in word.chars() {
                let ch_width = text_width(ch.encode_utf8(&mut [0; 4]), font, size);
                if !current.is_empty() && current_width + ch_width > max_width {
                    lines.push(std::mem::take(&mut current));
                    current_width = 0.0;
                }
                current.push(ch);
                current_width += ch_width;
            }
            continue;
        }

        if current.is_empty() {
            current.push_str(word);
            current_width = word_width;
        } else if current_width + space + word_width <= max_width {
            current.push(' ');
            current.push_str(word);
            current_width += space + word_width;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
            current_width = word_width;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
