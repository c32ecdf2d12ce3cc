//! # texcaret-syntax
//!
//! Lossless syntax trees for LaTeX fragments, built for editor use.
//!
//! The pipeline is lexer → events → tree:
//!
//! 1. [`lexer`] breaks the source into tokens with [Logos]; every byte lands
//!    in exactly one token.
//! 2. [`parser`] runs an explicit-stack grammar that emits flat events and
//!    never fails: malformed input degrades to plain tokens.
//! 3. The sink folds the events into a [Rowan] green tree, so every node
//!    carries its byte range and `tree.text()` reproduces the input exactly.
//!
//! [Logos]: https://docs.rs/logos
//! [Rowan]: https://docs.rs/rowan
//!
//! ```
//! use texcaret_syntax::{parse, SyntaxKind};
//!
//! let tree = parse("a $x+y$ b");
//! let math = tree.children().find(|n| n.kind() == SyntaxKind::MATH).unwrap();
//! assert_eq!(math.text().to_string(), "$x+y$");
//! assert_eq!(u32::from(math.text_range().start()), 2);
//! ```

pub mod lexer;
pub mod parser;
pub mod syntax_kind;

pub use parser::parse;
pub use syntax_kind::{LatexLang, SyntaxElement, SyntaxKind, SyntaxNode, SyntaxToken};

use std::fmt::Write;

/// Which delimiter style a MATH node uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathFlavor {
    /// `$...$`
    Inline,
    /// `$$...$$`
    DisplayDollar,
    /// `\[...\]`
    DisplayBracket,
}

/// Classify a MATH node by its opening delimiter.
///
/// Returns `None` for non-MATH nodes.
pub fn math_flavor(node: &SyntaxNode) -> Option<MathFlavor> {
    if node.kind() != SyntaxKind::MATH {
        return None;
    }
    // Look at the first two child elements in order; a node child right
    // after the opening `$` means inline math, not a doubled dollar.
    let mut elements = node.children_with_tokens();
    let first = elements.next()?.into_token()?;
    match first.kind() {
        SyntaxKind::BACKSLASH => Some(MathFlavor::DisplayBracket),
        SyntaxKind::DOLLAR => {
            let doubled = elements
                .next()
                .and_then(|element| element.into_token())
                .is_some_and(|t| t.kind() == SyntaxKind::DOLLAR);
            if doubled {
                Some(MathFlavor::DisplayDollar)
            } else {
                Some(MathFlavor::Inline)
            }
        }
        _ => None,
    }
}

/// Render a tree as indented text with byte ranges, for debugging and
/// snapshot tests.
pub fn format_tree(node: &SyntaxNode) -> String {
    let mut out = String::new();
    format_node(node, 0, &mut out);
    out
}

fn format_node(node: &SyntaxNode, indent: usize, out: &mut String) {
    let _ = writeln!(
        out,
        "{:indent$}{:?}@{:?}",
        "",
        node.kind(),
        node.text_range(),
        indent = indent
    );
    for child in node.children_with_tokens() {
        match child {
            rowan::NodeOrToken::Node(n) => format_node(&n, indent + 2, out),
            rowan::NodeOrToken::Token(t) => {
                let _ = writeln!(
                    out,
                    "{:indent$}{:?}@{:?} {:?}",
                    "",
                    t.kind(),
                    t.text_range(),
                    t.text(),
                    indent = indent + 2
                );
            }
        }
    }
}
