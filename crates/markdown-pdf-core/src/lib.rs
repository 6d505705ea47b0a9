//! Core orchestration layer for markdown-pdf.
//!
//! Reads markdown, runs it through the tokenizer and flow builder, and hands
//! the resulting blocks to a [`Renderer`].

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use markdown_pdf_config::Config;
use markdown_pdf_flow::{parse, FlowStats, RenderBlock};
use markdown_pdf_render::{PdfRenderer, Renderer};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConvertError<E>
where
    E: std::error::Error + 'static,
{
    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error(transparent)]
    Render(E),
}

/// Result of one successful conversion.
#[derive(Clone, Debug, PartialEq)]
pub struct Conversion {
    pub blocks: Vec<RenderBlock>,
    pub stats: FlowStats,
    pub output: PathBuf,
}

/// Entry point for higher-level consumers.
pub struct MarkdownPdf<R> {
    config: Config,
    renderer: R,
}

impl MarkdownPdf<PdfRenderer> {
    /// Uses the PDF renderer configured with the config's page settings.
    pub fn with_pdf(config: Config) -> Self {
        let renderer = PdfRenderer::new(config.page);
        Self::bootstrap(config, renderer)
    }
}

impl<R: Renderer> MarkdownPdf<R> {
    pub fn bootstrap(config: Config, renderer: R) -> Self {
        Self { config, renderer }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn into_renderer(self) -> R {
        self.renderer
    }

    /// Reads `input` wholly into memory and renders it to `output`.
    pub fn convert_file(
        &mut self,
        input: &Path,
        output: &Path,
    ) -> Result<Conversion, ConvertError<R::Error>> {
        let text = fs::read_to_string(input).map_err(|source| ConvertError::Read {
            path: input.to_path_buf(),
            source,
        })?;
        log::debug!("read {} bytes from {}", text.len(), input.display());
        self.convert_text(&text, output)
    }

    pub fn convert_text(
        &mut self,
        text: &str,
        output: &Path,
    ) -> Result<Conversion, ConvertError<R::Error>> {
        let blocks = parse(text);
        let stats = FlowStats::from_blocks(&blocks);
        log::debug!("built {} blocks: {stats}", blocks.len());

        self.renderer
            .render(&blocks, &self.config.style, output)
            .map_err(ConvertError::Render)?;

        Ok(Conversion {
            blocks,
            stats,
            output: output.to_path_buf(),
        })
    }
}

/// `resume.md` → `resume.pdf`, next to the input.
pub fn default_output_path(input: &Path) -> PathBuf {
    input.with_extension("pdf")
}
