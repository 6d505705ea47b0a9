use std::fs;
use std::path::Path;

use markdown_pdf_config::{PageSettings, StyleConfig};
use markdown_pdf_flow::{HeadingLevel, RenderBlock};
use pdf_writer::{Content, Finish, Name, Pdf, Rect, Ref, Str, TextStr};

use crate::layout::{layout, Page};
use crate::metrics::{encode, Font, ENCODING};
use crate::{RenderError, Renderer};

// Fixed object ids; page and content stream pairs follow from FIRST_PAGE_ID.
const CATALOG_ID: i32 = 1;
const PAGE_TREE_ID: i32 = 2;
const REGULAR_FONT_ID: i32 = 3;
const BOLD_FONT_ID: i32 = 4;
const INFO_ID: i32 = 5;
const FIRST_PAGE_ID: i32 = 6;

const PRODUCER: &str = concat!("markdown-pdf ", env!("CARGO_PKG_VERSION"));

/// Renders blocks to a PDF file using the built-in Helvetica faces.
#[derive(Clone, Debug, Default)]
pub struct PdfRenderer {
    page: PageSettings,
}

impl PdfRenderer {
    pub fn new(page: PageSettings) -> Self {
        PdfRenderer { page }
    }

    pub fn page_settings(&self) -> &PageSettings {
        &self.page
    }

    /// Lays out and serialises the document without touching the filesystem.
    pub fn render_bytes(&self, blocks: &[RenderBlock], style: &StyleConfig) -> Vec<u8> {
        let pages = layout(blocks, style, &self.page);
        log::debug!("laid out {} blocks on {} pages", blocks.len(), pages.len());
        write_document(&pages, &self.page, document_title(blocks))
    }
}

impl Renderer for PdfRenderer {
    type Error = RenderError;

    fn render(
        &mut self,
        blocks: &[RenderBlock],
        style: &StyleConfig,
        output: &Path,
    ) -> Result<(), Self::Error> {
        let bytes = self.render_bytes(blocks, style);
        fs::write(output, &bytes).map_err(|source| RenderError::Write {
            path: output.to_path_buf(),
            source,
        })?;
        log::info!("wrote {} ({} bytes)", output.display(), bytes.len());
        Ok(())
    }
}

/// Text of the first level-1 heading.
pub fn document_title(blocks: &[RenderBlock]) -> Option<&str> {
    blocks.iter().find_map(|block| match block {
        RenderBlock::Heading {
            level: HeadingLevel::H1,
            text,
        } => Some(text.as_str()),
        _ => None,
    })
}

fn write_document(pages: &[Page], settings: &PageSettings, title: Option<&str>) -> Vec<u8> {
    let mut pdf = Pdf::new();
    let page_tree_id = Ref::new(PAGE_TREE_ID);

    let page_ids: Vec<(Ref, Ref)> = (0..pages.len() as i32)
        .map(|idx| {
            let page_id = FIRST_PAGE_ID + idx * 2;
            (Ref::new(page_id), Ref::new(page_id + 1))
        })
        .collect();

    pdf.catalog(Ref::new(CATALOG_ID)).pages(page_tree_id);
    pdf.pages(page_tree_id)
        .kids(page_ids.iter().map(|(page_id, _)| *page_id))
        .count(page_ids.len() as i32);

    for font in [Font::Regular, Font::Bold] {
        pdf.type1_font(font_ref(font))
            .base_font(Name(font.base_name()))
            .encoding_predefined(Name(ENCODING));
    }

    let mut info = pdf.document_info(Ref::new(INFO_ID));
    info.producer(TextStr(PRODUCER));
    if let Some(title) = title {
        info.title(TextStr(title));
    }
    info.finish();

    let media_box = Rect::new(0.0, 0.0, settings.width(), settings.height());
    for (page, (page_id, content_id)) in pages.iter().zip(&page_ids) {
        let mut writer = pdf.page(*page_id);
        writer.media_box(media_box);
        writer.parent(page_tree_id);
        writer.contents(*content_id);
        writer
            .resources()
            .fonts()
            .pair(Name(Font::Regular.resource_name()), font_ref(Font::Regular))
            .pair(Name(Font::Bold.resource_name()), font_ref(Font::Bold));
        writer.finish();

        pdf.stream(*content_id, &page_content(page));
    }

    pdf.finish()
}

fn page_content(page: &Page) -> Vec<u8> {
    let mut content = Content::new();
    for run in &page.runs {
        let [r, g, b] = run.color.to_unit();
        content.set_fill_rgb(r, g, b);
        content.begin_text();
        content.set_font(Name(run.font.resource_name()), run.size);
        content.next_line(run.x, run.baseline);
        content.show(Str(&encode(&run.text)));
        content.end_text();
    }
    content.finish().to_vec()
}

fn font_ref(font: Font) -> Ref {
    match font {
        Font::Regular => Ref::new(REGULAR_FONT_ID),
        Font::Bold => Ref::new(BOLD_FONT_ID),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_comes_from_first_level_one_heading() {
        let blocks = vec![
            RenderBlock::heading(HeadingLevel::H2, "Intro"),
            RenderBlock::heading(HeadingLevel::H1, "Jane Doe"),
            RenderBlock::heading(HeadingLevel::H1, "Other"),
        ];
        assert_eq!(document_title(&blocks), Some("Jane Doe"));
        assert_eq!(document_title(&[RenderBlock::Spacer]), None);
    }

    #[test]
    fn page_content_draws_each_run() {
        let pages = layout(
            &[RenderBlock::paragraph("hello (world)")],
            &StyleConfig::default(),
            &PageSettings::default(),
        );
        let content = page_content(&pages[0]);
        let text = String::from_utf8_lossy(&content);
        assert!(text.contains("/F1 10.5 Tf"));
        assert!(text.contains("hello"));
        assert_eq!(text.matches("BT").count(), 1);
    }

    #[test]
    fn latin1_text_reaches_the_content_stream() {
        let pages = layout(
            &[RenderBlock::paragraph("José Müller, Zürich")],
            &StyleConfig::default(),
            &PageSettings::default(),
        );
        let content = page_content(&pages[0]);

        let shown = content_strings(&content);
        assert_eq!(shown, vec![b"Jos\xE9 M\xFCller, Z\xFCrich".to_vec()]);
    }

    #[test]
    fn fonts_declare_win_ansi_encoding() {
        let bytes = PdfRenderer::default().render_bytes(&[], &StyleConfig::default());
        let text = String::from_utf8_lossy(&bytes);
        assert_eq!(text.matches("/Encoding /WinAnsiEncoding").count(), 2);
    }

    /// Decodes the operand of every `Tj` in a content stream, whether written
    /// as a literal or a hex string.
    fn content_strings(content: &[u8]) -> Vec<Vec<u8>> {
        content
            .split(|&byte| byte == b'\n')
            .filter_map(|line| line.trim_ascii().strip_suffix(b"Tj"))
            .map(|operand| match operand.trim_ascii() {
                [b'<', hex @ .., b'>'] => hex
                    .chunks(2)
                    .map(|pair| {
                        let digits = std::str::from_utf8(pair).expect("ascii hex");
                        u8::from_str_radix(digits, 16).expect("hex byte")
                    })
                    .collect(),
                [b'(', literal @ .., b')'] => unescape(literal),
                other => panic!("unexpected operand {:?}", String::from_utf8_lossy(other)),
            })
            .collect()
    }

    fn unescape(literal: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        let mut iter = literal.iter().copied().peekable();
        while let Some(byte) = iter.next() {
            if byte != b'\\' {
                out.push(byte);
                continue;
            }
            let mut octal = 0u16;
            let mut digits = 0;
            while digits < 3 && matches!(iter.peek(), Some(b'0'..=b'7')) {
                octal = octal * 8 + u16::from(iter.next().expect("peeked") - b'0');
                digits += 1;
            }
            if digits > 0 {
                out.push(octal as u8);
            } else if let Some(escaped) = iter.next() {
                out.push(escaped);
            }
        }
        out
    }
}
