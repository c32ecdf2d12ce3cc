//! # Cursor Context Resolver
//!
//! Given a parsed tree and a cursor offset, work out what surrounds the
//! cursor: the innermost enclosing command, which of its arguments (if any)
//! holds the cursor, and whether the cursor sits in a math region. The
//! structured fields drive editing decisions (Tab navigation); the `label`
//! is a display convenience only.
//!
//! Containment rules differ by construct and are deliberate:
//!
//! - **Commands and math** use inclusive ends (`start <= offset <= end`), so
//!   the cursor directly after `$x+y$` still counts as "in math".
//! - **Arguments** use strict interior (`start < offset < end`): sitting on
//!   a brace is "between args", not inside one.

use std::ops::Range;

use texcaret_syntax::{math_flavor, MathFlavor, SyntaxKind, SyntaxNode};

/// Where the cursor sits relative to the enclosing command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgumentPlace {
    /// On the backslash or within the command name
    InName,
    /// Strictly inside the argument at `index` (document order, 0-based)
    InArgument { index: usize, optional: bool },
    /// Inside the command's span but on a delimiter or between arguments
    AtCommand,
}

/// The innermost command enclosing the cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandContext {
    /// Command name without the backslash
    pub name: String,
    /// Byte range of the whole command
    pub range: Range<usize>,
    pub place: ArgumentPlace,
}

/// Everything the core knows about the cursor's surroundings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorContext {
    /// Whether the offset is a usable cursor position. The policy is
    /// permissive: any offset within buffer bounds is valid, and
    /// out-of-range offsets are clamped rather than rejected.
    pub valid: bool,
    /// True iff the offset lies within a math region, ends inclusive
    pub in_math: bool,
    /// Delimiter style of the innermost enclosing math region
    pub math_flavor: Option<MathFlavor>,
    /// Innermost enclosing command, if any
    pub command: Option<CommandContext>,
    /// Human-readable description, e.g. `"\frac (in arg 1 of 2)"`
    pub label: String,
}

/// Resolve the cursor context at `offset` within the parsed tree.
///
/// Out-of-range offsets are clamped to the buffer; the result is always a
/// fully-populated context, never an error.
pub fn resolve(tree: &SyntaxNode, offset: usize) -> CursorContext {
    let len = usize::from(tree.text_range().end());
    let offset = offset.min(len);

    let math = innermost(tree, SyntaxKind::MATH, offset);
    let math_kind = math.as_ref().and_then(math_flavor);

    let command = innermost(tree, SyntaxKind::COMMAND, offset).map(|node| {
        let range = node_range(&node);
        let name_node = node
            .children()
            .find(|n| n.kind() == SyntaxKind::COMMAND_NAME);
        let name = name_node
            .as_ref()
            .map(|n| n.text().to_string())
            .unwrap_or_default();

        let place = match name_node {
            Some(n) if offset <= usize::from(n.text_range().end()) => ArgumentPlace::InName,
            _ => argument_place(&node, offset),
        };

        CommandContext { name, range, place }
    });

    let label = describe(command.as_ref(), math.is_some(), tree);

    CursorContext {
        valid: true,
        in_math: math.is_some(),
        math_flavor: math_kind,
        command,
        label,
    }
}

/// Innermost node of `kind` whose range contains `offset`, ends inclusive.
pub(crate) fn innermost(tree: &SyntaxNode, kind: SyntaxKind, offset: usize) -> Option<SyntaxNode> {
    tree.descendants()
        .filter(|n| n.kind() == kind)
        .filter(|n| {
            let range = n.text_range();
            usize::from(range.start()) <= offset && offset <= usize::from(range.end())
        })
        .min_by_key(|n| u32::from(n.text_range().len()))
}

fn argument_place(command: &SyntaxNode, offset: usize) -> ArgumentPlace {
    for (index, child) in command
        .children()
        .filter(|n| is_argument(n.kind()))
        .enumerate()
    {
        let range = child.text_range();
        if usize::from(range.start()) < offset && offset < usize::from(range.end()) {
            return ArgumentPlace::InArgument {
                index,
                optional: child.kind() == SyntaxKind::COMMAND_OPTIONAL,
            };
        }
    }
    ArgumentPlace::AtCommand
}

fn is_argument(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::COMMAND_ARGS | SyntaxKind::COMMAND_OPTIONAL
    )
}

fn describe(command: Option<&CommandContext>, in_math: bool, tree: &SyntaxNode) -> String {
    if let Some(cmd) = command {
        let total = tree
            .descendants()
            .find(|n| n.kind() == SyntaxKind::COMMAND && node_range(n) == cmd.range)
            .map(|n| n.children().filter(|c| is_argument(c.kind())).count())
            .unwrap_or(0);
        match &cmd.place {
            ArgumentPlace::InName => format!("\\{} (in command name)", cmd.name),
            ArgumentPlace::InArgument { index, optional } => {
                let which = if *optional { "optional arg" } else { "arg" };
                format!("\\{} (in {} {} of {})", cmd.name, which, index + 1, total)
            }
            ArgumentPlace::AtCommand => {
                format!("\\{} (between args or at command)", cmd.name)
            }
        }
    } else if in_math {
        "math".to_string()
    } else {
        "text".to_string()
    }
}

fn node_range(node: &SyntaxNode) -> Range<usize> {
    let range = node.text_range();
    usize::from(range.start())..usize::from(range.end())
}

/// All depth-one `{...}` spans in the buffer, by a plain brace-depth scan.
///
/// This is the generic argument finder: it knows nothing about commands and
/// agrees with [`resolve`] on which span holds the cursor whenever the span
/// in question is a command argument. Stray closing braces never push the
/// depth below zero.
pub fn argument_spans(buffer: &str) -> Vec<Range<usize>> {
    let mut spans = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    for (i, ch) in buffer.char_indices() {
        match ch {
            '{' => {
                if depth == 0 {
                    start = i;
                }
                depth += 1;
            }
            '}' => {
                if depth > 0 {
                    depth -= 1;
                    if depth == 0 {
                        spans.push(start..i + 1);
                    }
                }
            }
            _ => {}
        }
    }
    spans
}

/// Index of the depth-one brace span strictly containing `offset`.
pub fn argument_at(buffer: &str, offset: usize) -> Option<usize> {
    argument_spans(buffer)
        .iter()
        .position(|span| span.start < offset && offset < span.end)
}
