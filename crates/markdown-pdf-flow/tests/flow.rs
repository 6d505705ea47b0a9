use markdown_pdf_flow::{
    build, classify, parse, tokenize, FlowStats, HeadingLevel, RenderBlock, UnitKind,
};
use pretty_assertions::assert_eq;

fn bullet_runs(text: &str) -> usize {
    let mut runs = 0;
    let mut in_run = false;
    for unit in tokenize(text) {
        let is_bullet = unit.kind == UnitKind::Bullet;
        if is_bullet && !in_run {
            runs += 1;
        }
        in_run = is_bullet;
    }
    runs
}

#[test]
fn should_build_heading_spacer_paragraph() {
    // Given
    let text = "# Title\n\nSome text";

    // When
    let blocks = parse(text);

    // Then
    assert_eq!(
        blocks,
        vec![
            RenderBlock::heading(HeadingLevel::H1, "Title"),
            RenderBlock::Spacer,
            RenderBlock::paragraph("Some text"),
        ]
    );
}

#[test]
fn should_batch_bullets_under_a_section() {
    // Given
    let text = "## Section\n- one\n- two\nNormal para";

    // When
    let blocks = parse(text);

    // Then
    assert_eq!(
        blocks,
        vec![
            RenderBlock::heading(HeadingLevel::H2, "Section"),
            RenderBlock::list(["one", "two"]),
            RenderBlock::paragraph("Normal para"),
        ]
    );
}

#[test]
fn should_split_lists_on_blank_line() {
    // Given
    let text = "- a\n\n- b";

    // When
    let blocks = parse(text);

    // Then
    assert_eq!(
        blocks,
        vec![
            RenderBlock::list(["a"]),
            RenderBlock::Spacer,
            RenderBlock::list(["b"]),
        ]
    );
}

#[test]
fn should_flush_trailing_list_at_end_of_input() {
    assert_eq!(parse("- a\n- b"), vec![RenderBlock::list(["a", "b"])]);
    assert_eq!(parse("- a\n- b\n"), vec![RenderBlock::list(["a", "b"])]);
}

#[test]
fn should_build_nothing_from_empty_input() {
    assert!(tokenize("").is_empty());
    assert!(parse("").is_empty());
}

#[test]
fn should_keep_blank_only_input_as_spacers() {
    assert_eq!(
        parse("\n  \n"),
        vec![RenderBlock::Spacer, RenderBlock::Spacer]
    );
}

#[test]
fn should_classify_lines_independently_of_context() {
    let line = "## Experience";
    let alone = classify(line);

    for context in ["- a\n", "# Title\n", "\n\n", "paragraph\n"] {
        let text = format!("{context}{line}\n- after");
        let units = tokenize(&text);
        let found = units
            .iter()
            .find(|unit| unit.text == "Experience")
            .expect("heading unit");
        assert_eq!(found, &alone);
    }
}

#[test]
fn should_tokenize_concatenation_like_the_parts() {
    let first = "# Name\n- a\n\n";
    let second = "## Skills\n- rust\n- go";

    let mut separate = tokenize(first);
    separate.extend(tokenize(second));

    assert_eq!(tokenize(&format!("{first}{second}")), separate);
}

#[test]
fn should_emit_one_list_per_bullet_run() {
    let samples = [
        "",
        "- a",
        "- a\n- b\n- c",
        "- a\ntext\n- b",
        "# H\n- a\n- b\n\n- c\n## H2\n- d\n### H3\npara\n- e\n- f",
        "\n\n- a\n\n\n- b\n\n",
    ];

    for sample in samples {
        let blocks = parse(sample);
        let stats = FlowStats::from_blocks(&blocks);
        assert_eq!(stats.lists, bullet_runs(sample), "sample: {sample:?}");
        assert!(blocks.iter().all(|block| match block {
            RenderBlock::List { items } => !items.is_empty(),
            _ => true,
        }));
    }
}

#[test]
fn should_build_a_resume() {
    // Given
    let text = "\
# Jane Doe
jane@example.com

## Experience
### Engineer, Acme
- Built things
- Shipped things
## Skills
- Rust
";

    // When
    let blocks = build(tokenize(text));
    let stats = FlowStats::from_blocks(&blocks);

    // Then
    assert_eq!(
        blocks,
        vec![
            RenderBlock::heading(HeadingLevel::H1, "Jane Doe"),
            RenderBlock::paragraph("jane@example.com"),
            RenderBlock::Spacer,
            RenderBlock::heading(HeadingLevel::H2, "Experience"),
            RenderBlock::heading(HeadingLevel::H3, "Engineer, Acme"),
            RenderBlock::list(["Built things", "Shipped things"]),
            RenderBlock::heading(HeadingLevel::H2, "Skills"),
            RenderBlock::list(["Rust"]),
        ]
    );
    assert_eq!(stats.list_items, 3);
    assert_eq!(stats.total(), blocks.len());
}

#[test]
fn should_serialize_blocks_with_a_type_tag() {
    let blocks = parse("# T\n- a");
    let json = serde_json::to_value(&blocks).expect("serialize");

    assert_eq!(
        json,
        serde_json::json!([
            { "type": "heading", "level": "H1", "text": "T" },
            { "type": "list", "items": ["a"] },
        ])
    );
}
