//! Rendering boundary for markdown-pdf.
//!
//! [`Renderer`] is the only contract between the block flow and whatever
//! produces the final artifact. [`PdfRenderer`] is the production
//! implementation: it lays blocks out with [`layout::layout`] and writes a PDF
//! with `pdf-writer`.

pub mod layout;
pub mod metrics;
mod pdf;

use std::io;
use std::path::{Path, PathBuf};

use markdown_pdf_config::StyleConfig;
use markdown_pdf_flow::RenderBlock;
use thiserror::Error;

pub use pdf::{document_title, PdfRenderer};

/// Turns an ordered block sequence into an artifact at `output`.
pub trait Renderer {
    type Error: std::error::Error + Send + Sync + 'static;

    fn render(
        &mut self,
        blocks: &[RenderBlock],
        style: &StyleConfig,
        output: &Path,
    ) -> Result<(), Self::Error>;
}

impl<R: Renderer + ?Sized> Renderer for &mut R {
    type Error = R::Error;

    fn render(
        &mut self,
        blocks: &[RenderBlock],
        style: &StyleConfig,
        output: &Path,
    ) -> Result<(), Self::Error> {
        (**self).render(blocks, style, output)
    }
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
}
