//! Shared test harness utilities for markdown-pdf crates.

use std::io;
use std::path::{Path, PathBuf};

use markdown_pdf_config::{Config, StyleConfig};
use markdown_pdf_flow::RenderBlock;
use markdown_pdf_render::Renderer;

/// Returns a baseline configuration for tests.
pub fn test_config() -> Config {
    Config::builtin()
}

/// Arguments of one `Renderer::render` call.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderCall {
    pub blocks: Vec<RenderBlock>,
    pub style: StyleConfig,
    pub output: PathBuf,
}

/// Renderer that records its input instead of producing an artifact.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub calls: Vec<RenderCall>,
    fail_with: Option<io::ErrorKind>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records calls, then fails each one with an error of `kind`.
    pub fn failing(kind: io::ErrorKind) -> Self {
        RecordingRenderer {
            calls: Vec::new(),
            fail_with: Some(kind),
        }
    }

    pub fn last(&self) -> Option<&RenderCall> {
        self.calls.last()
    }
}

impl Renderer for RecordingRenderer {
    type Error = io::Error;

    fn render(
        &mut self,
        blocks: &[RenderBlock],
        style: &StyleConfig,
        output: &Path,
    ) -> Result<(), Self::Error> {
        self.calls.push(RenderCall {
            blocks: blocks.to_vec(),
            style: style.clone(),
            output: output.to_path_buf(),
        });

        match self.fail_with {
            Some(kind) => Err(io::Error::new(kind, "recording renderer failure")),
            None => Ok(()),
        }
    }
}
