//! End-to-end exercises of the editing core: typing, expansion, and
//! navigation flowing through a single `Document`.

use pretty_assertions::assert_eq;
use rstest::rstest;
use texcaret_engine::{builtin_shortcuts, resolve, try_expand, Document};
use texcaret_syntax::{parse, SyntaxKind};

#[test]
fn mat_expansion_round_trip() {
    let mut doc = Document::new("");
    doc.insert_text("mat");
    doc.expand_shortcut(&builtin_shortcuts()).unwrap();

    let expected = "\\begin{bmatrix}1 & 2 & 3 \\\\ 4 & 5 & 6\\end{bmatrix}";
    assert_eq!(doc.text(), expected);
    assert_eq!(doc.cursor(), expected.len() - "\\end{bmatrix}".len());

    // The expansion parses cleanly.
    let commands: Vec<_> = doc
        .tree()
        .descendants()
        .filter(|n| n.kind() == SyntaxKind::COMMAND)
        .map(|n| n.text().to_string())
        .collect();
    assert!(commands.contains(&"\\begin{bmatrix}".to_string()));
    assert!(commands.contains(&"\\end{bmatrix}".to_string()));
}

#[test]
fn building_a_fraction_by_keystrokes() {
    let mut doc = Document::new("");
    doc.insert_text("1/");
    doc.expand_shortcut(&builtin_shortcuts()).unwrap();
    assert_eq!(doc.text(), "1\\frac{}{}");
    // Cursor in the denominator.
    assert_eq!(doc.cursor(), 9);

    doc.insert_text("2");
    assert_eq!(doc.text(), "1\\frac{}{2}");

    // Back into the numerator.
    doc.tab_backward().unwrap();
    doc.insert_text("x");
    assert_eq!(doc.text(), "1\\frac{x}{2}");
}

#[test]
fn matrix_row_insertion_preserves_structure() {
    let mut doc = Document::new("\\begin{bmatrix}1 & 2\\end{bmatrix}");
    doc.set_selection(20..20); // immediately before \end
    doc.insert_matrix_row().unwrap();

    assert_eq!(doc.text(), "\\begin{bmatrix}1 & 2 \\\\ &\\end{bmatrix}");
    // Cursor in the first cell of the new row.
    assert_eq!(doc.cursor(), 24);

    // The environment delimiters still parse as commands.
    let begins = doc
        .tree()
        .descendants()
        .filter(|n| n.kind() == SyntaxKind::COMMAND)
        .filter(|n| n.text().to_string().starts_with("\\begin"))
        .count();
    assert_eq!(begins, 1);
}

#[test]
fn tab_cycles_through_matrix_cells_and_arguments() {
    let mut doc = Document::new("");
    doc.insert_text("mat");
    doc.expand_shortcut(&builtin_shortcuts()).unwrap();

    // Inside the matrix, Tab inserts a separator rather than navigating.
    let before = doc.text();
    doc.tab_forward().unwrap();
    assert_eq!(doc.text().len(), before.len() + 3);
    assert!(doc.text().contains("6 & \\end"));
}

#[rstest]
#[case("")]
#[case("}}}}")]
#[case("$ never closed")]
#[case("\\frac{{{")]
#[case("\\\\\\")]
#[case("\u{1F4a9} unicode $x")]
fn hostile_buffers_never_panic(#[case] input: &str) {
    let tree = parse(input);
    assert_eq!(tree.text().to_string(), input);

    for offset in 0..=input.len() + 2 {
        let _ = resolve(&tree, offset);
        let _ = try_expand(input, offset, &builtin_shortcuts());

        let mut doc = Document::new(input);
        doc.set_selection(offset..offset);
        let _ = doc.tab_forward();
        let _ = doc.tab_backward();
        let _ = doc.insert_matrix_row();
        let _ = doc.next_cell();
        let _ = doc.auto_pair('(');
    }
}

#[test]
fn top_level_coverage_has_no_gaps() {
    let inputs = [
        "\\frac{1}{2} + $x$ {g} plain",
        "a } b { c",
        "$$display$$ and \\[more\\]",
    ];
    for input in inputs {
        let tree = parse(input);
        // Concatenating all direct children (nodes and tokens) in order
        // reproduces the buffer exactly.
        let mut covered = String::new();
        for element in tree.children_with_tokens() {
            if let Some(node) = element.as_node() {
                covered.push_str(&node.text().to_string());
            } else if let Some(token) = element.as_token() {
                covered.push_str(token.text());
            }
        }
        assert_eq!(covered, input);
    }
}

#[test]
fn command_nodes_are_well_formed() {
    let tree = parse("\\frac{\\sqrt[3]{x}}{2} $\\alpha$ \\\\[1em]");
    for command in tree
        .descendants()
        .filter(|n| n.kind() == SyntaxKind::COMMAND)
    {
        let names = command
            .children()
            .filter(|n| n.kind() == SyntaxKind::COMMAND_NAME)
            .count();
        assert_eq!(names, 1, "command {:?}", command.text().to_string());

        // Arguments sit in document order with no overlap.
        let mut last_end = 0;
        for arg in command.children().filter(|n| {
            matches!(
                n.kind(),
                SyntaxKind::COMMAND_ARGS | SyntaxKind::COMMAND_OPTIONAL
            )
        }) {
            let range = arg.text_range();
            assert!(u32::from(range.start()) >= last_end);
            last_end = u32::from(range.end());
        }
    }
}
