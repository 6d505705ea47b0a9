use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
}

impl HeadingLevel {
    pub fn depth(self) -> u8 {
        match self {
            HeadingLevel::H1 => 1,
            HeadingLevel::H2 => 2,
            HeadingLevel::H3 => 3,
        }
    }
}

impl fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "h{}", self.depth())
    }
}

/// Renderer-ready block. The variant plus its fields is everything a renderer
/// gets to work with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RenderBlock {
    Heading { level: HeadingLevel, text: String },
    /// Never constructed with an empty `items`.
    List { items: Vec<String> },
    Paragraph { text: String },
    Spacer,
}

impl RenderBlock {
    pub fn heading(level: HeadingLevel, text: impl Into<String>) -> Self {
        RenderBlock::Heading {
            level,
            text: text.into(),
        }
    }

    pub fn paragraph(text: impl Into<String>) -> Self {
        RenderBlock::Paragraph { text: text.into() }
    }

    pub fn list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        RenderBlock::List {
            items: items.into_iter().map(Into::into).collect(),
        }
    }
}

/// Per-variant counts over a block sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlowStats {
    pub headings: usize,
    pub lists: usize,
    pub list_items: usize,
    pub paragraphs: usize,
    pub spacers: usize,
}

impl FlowStats {
    pub fn from_blocks(blocks: &[RenderBlock]) -> Self {
        let mut stats = FlowStats::default();
        for block in blocks {
            match block {
                RenderBlock::Heading { .. } => stats.headings += 1,
                RenderBlock::List { items } => {
                    stats.lists += 1;
                    stats.list_items += items.len();
                }
                RenderBlock::Paragraph { .. } => stats.paragraphs += 1,
                RenderBlock::Spacer => stats.spacers += 1,
            }
        }
        stats
    }

    pub fn total(&self) -> usize {
        self.headings + self.lists + self.paragraphs + self.spacers
    }
}

impl fmt::Display for FlowStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} headings, {} lists ({} items), {} paragraphs, {} spacers",
            self.headings, self.lists, self.list_items, self.paragraphs, self.spacers
        )
    }
}
