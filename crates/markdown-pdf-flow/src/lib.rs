//! Tokenizer and flow builder for a small markdown dialect.
//!
//! Input text is classified line by line into [`Unit`]s, which [`build`] then
//! groups into [`RenderBlock`]s, batching consecutive bullets into lists.

mod block;
mod state;
mod unit;

pub use block::{FlowStats, HeadingLevel, RenderBlock};
pub use state::FlowState;
pub use unit::{classify, tokenize, Unit, UnitKind};

/// Groups units into render blocks in a single pass.
///
/// Consecutive bullets become one list, flushed by the next non-bullet unit
/// or by the end of input.
pub fn build<I>(units: I) -> Vec<RenderBlock>
where
    I: IntoIterator<Item = Unit>,
{
    let mut state = FlowState::new();
    let mut blocks = Vec::new();

    for Unit { kind, text } in units {
        let block = match kind {
            UnitKind::Bullet => {
                state.push_bullet(text);
                continue;
            }
            UnitKind::Heading1 => RenderBlock::heading(HeadingLevel::H1, text),
            UnitKind::Heading2 => RenderBlock::heading(HeadingLevel::H2, text),
            UnitKind::Heading3 => RenderBlock::heading(HeadingLevel::H3, text),
            UnitKind::Paragraph => RenderBlock::paragraph(text),
            UnitKind::Spacer => RenderBlock::Spacer,
        };

        state.flush_into(&mut blocks);
        blocks.push(block);
    }

    state.flush_into(&mut blocks);
    blocks
}

/// `build(tokenize(text))`.
pub fn parse(text: &str) -> Vec<RenderBlock> {
    build(tokenize(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn spacers_are_never_merged() {
        let blocks = parse("a\n\n\n\nb");
        assert_eq!(
            blocks,
            vec![
                RenderBlock::paragraph("a"),
                RenderBlock::Spacer,
                RenderBlock::Spacer,
                RenderBlock::Spacer,
                RenderBlock::paragraph("b"),
            ]
        );
    }

    #[test]
    fn every_heading_level_flushes_a_pending_list() {
        let blocks = parse("- a\n# One\n- b\n## Two\n- c\n### Three");
        assert_eq!(
            blocks,
            vec![
                RenderBlock::list(["a"]),
                RenderBlock::heading(HeadingLevel::H1, "One"),
                RenderBlock::list(["b"]),
                RenderBlock::heading(HeadingLevel::H2, "Two"),
                RenderBlock::list(["c"]),
                RenderBlock::heading(HeadingLevel::H3, "Three"),
            ]
        );
    }

    #[test]
    fn empty_units_build_nothing() {
        assert!(build(Vec::new()).is_empty());
    }
}
