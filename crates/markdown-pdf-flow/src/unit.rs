#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitKind {
    Heading1,
    Heading2,
    Heading3,
    Bullet,
    Paragraph,
    Spacer,
}

/// One classified input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unit {
    pub kind: UnitKind,
    pub text: String,
}

impl Unit {
    pub fn new(kind: UnitKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn spacer() -> Self {
        Self::new(UnitKind::Spacer, String::new())
    }
}

// Longer markers first; "## x" must never be read as a level-1 heading.
const MARKERS: [(&str, UnitKind); 4] = [
    ("### ", UnitKind::Heading3),
    ("## ", UnitKind::Heading2),
    ("# ", UnitKind::Heading1),
    ("- ", UnitKind::Bullet),
];

/// Classifies a single line. The result depends on `line` alone.
pub fn classify(line: &str) -> Unit {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Unit::spacer();
    }

    MARKERS
        .iter()
        .find_map(|(marker, kind)| {
            trimmed
                .strip_prefix(marker)
                .map(|rest| Unit::new(*kind, rest))
        })
        .unwrap_or_else(|| Unit::new(UnitKind::Paragraph, trimmed))
}

/// Splits `text` into lines and classifies each one, in order.
///
/// An empty string has no lines and yields no units; a trailing newline does
/// not add an extra blank line.
pub fn tokenize(text: &str) -> Vec<Unit> {
    text.lines().map(classify).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_each_marker() {
        assert_eq!(classify("# Title"), Unit::new(UnitKind::Heading1, "Title"));
        assert_eq!(classify("## Work"), Unit::new(UnitKind::Heading2, "Work"));
        assert_eq!(classify("### Role"), Unit::new(UnitKind::Heading3, "Role"));
        assert_eq!(classify("- item"), Unit::new(UnitKind::Bullet, "item"));
        assert_eq!(
            classify("plain text"),
            Unit::new(UnitKind::Paragraph, "plain text")
        );
    }

    #[test]
    fn whitespace_only_line_is_spacer() {
        assert_eq!(classify("   \t "), Unit::spacer());
        assert_eq!(classify(""), Unit::spacer());
    }

    #[test]
    fn markers_need_a_trailing_space() {
        assert_eq!(classify("#Title").kind, UnitKind::Paragraph);
        assert_eq!(classify("-dash").kind, UnitKind::Paragraph);
        assert_eq!(classify("####  deep").kind, UnitKind::Paragraph);
        assert_eq!(classify("#").text, "#");
    }

    #[test]
    fn surrounding_whitespace_is_trimmed_before_matching() {
        assert_eq!(classify("   - indented  "), Unit::new(UnitKind::Bullet, "indented"));
        assert_eq!(classify("  paragraph  ").text, "paragraph");
    }

    #[test]
    fn text_after_marker_is_kept_verbatim() {
        assert_eq!(classify("#   spaced").text, "  spaced");
        assert_eq!(classify("- - nested?").text, "- nested?");
    }

    #[test]
    fn empty_input_has_no_units() {
        assert!(tokenize("").is_empty());
        assert_eq!(tokenize("\n"), vec![Unit::spacer()]);
    }

    #[test]
    fn handles_crlf_and_trailing_newline() {
        let units = tokenize("# A\r\n- b\r\n");
        assert_eq!(
            units,
            vec![
                Unit::new(UnitKind::Heading1, "A"),
                Unit::new(UnitKind::Bullet, "b"),
            ]
        );
    }
}
