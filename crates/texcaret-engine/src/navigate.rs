//! # Argument/Bracket Navigator
//!
//! Discrete cursor-and-buffer operations bound to key combinations:
//!
//! - auto-pairing of `(`, `[`, `{`
//! - Tab/Shift+Tab between command arguments (or `&` insertion in a matrix)
//! - Shift+Enter row insertion inside a matrix environment
//! - Alt+Right jump past the next column separator
//!
//! Every operation is a total function over any `(buffer, cursor)` pair:
//! out-of-range cursors are clamped, and a missing target (no enclosing
//! matrix, no next argument) yields `None` rather than an error.
//!
//! Matrix detection is textual, not structural: the nearest
//! `\begin{..matrix}` before the cursor and `\end{..matrix}` after it, with
//! no intervening `\end`, delimit the environment. This matches how the
//! operations behave while the user is mid-edit and the buffer does not yet
//! parse cleanly.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;
use texcaret_syntax::{parse, SyntaxKind};

use crate::context::innermost;
use crate::shortcuts::clamp_boundary;

static BEGIN_MATRIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\begin\{[bpvV]?matrix\}").expect("static pattern"));
static END_MATRIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\end\{[bpvV]?matrix\}").expect("static pattern"));

/// The outcome of a navigator operation: either a buffer edit with a new
/// cursor, or a pure cursor move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavEdit {
    Edit {
        replace: Range<usize>,
        text: String,
        cursor: usize,
    },
    Move {
        cursor: usize,
    },
}

/// Auto-pair an opening bracket: insert both characters and place the
/// cursor between them. Returns `None` for non-bracket characters.
pub fn auto_pair(buffer: &str, cursor: usize, ch: char) -> Option<NavEdit> {
    let pair = match ch {
        '(' => "()",
        '[' => "[]",
        '{' => "{}",
        _ => return None,
    };
    let cursor = clamp_boundary(buffer, cursor);
    Some(NavEdit::Edit {
        replace: cursor..cursor,
        text: pair.to_string(),
        cursor: cursor + 1,
    })
}

/// Tab: inside a matrix environment, insert a padded column separator;
/// otherwise jump into the next argument of the enclosing command, or just
/// past the command after its last argument.
pub fn tab_forward(buffer: &str, cursor: usize) -> Option<NavEdit> {
    let cursor = clamp_boundary(buffer, cursor);

    if enclosing_matrix(buffer, cursor).is_some() {
        return Some(NavEdit::Edit {
            replace: cursor..cursor,
            text: " & ".to_string(),
            cursor: cursor + 3,
        });
    }

    let (command, args) = command_arguments(buffer, cursor)?;
    let target = args
        .iter()
        .find(|arg| arg.start >= cursor)
        .map(|arg| arg.start + 1)
        .unwrap_or(command.end);
    if target == cursor {
        return None;
    }
    Some(NavEdit::Move { cursor: target })
}

/// Shift+Tab: jump into the previous argument of the enclosing command, or
/// to the command's backslash when already in the first argument.
pub fn tab_backward(buffer: &str, cursor: usize) -> Option<NavEdit> {
    let cursor = clamp_boundary(buffer, cursor);
    let (command, args) = command_arguments(buffer, cursor)?;
    let target = args
        .iter()
        .rev()
        .find(|arg| arg.end - 1 < cursor)
        .map(|arg| arg.end - 1)
        .unwrap_or(command.start);
    if target >= cursor {
        return None;
    }
    Some(NavEdit::Move { cursor: target })
}

/// Shift+Enter: insert a new matrix row below the cursor, with as many
/// empty cells as the current row has columns. No-op outside a matrix.
pub fn insert_matrix_row(buffer: &str, cursor: usize) -> Option<NavEdit> {
    let cursor = clamp_boundary(buffer, cursor);
    let (body_start, _) = enclosing_matrix(buffer, cursor)?;

    // Current row: text since the last `\\` (or the environment start).
    let body = &buffer[body_start..cursor];
    let row = match body.rfind("\\\\") {
        Some(i) => &body[i + 2..],
        None => body,
    };
    let columns = row.split('&').count();

    let text = format!(" \\\\ {}", "&".repeat(columns - 1));
    Some(NavEdit::Edit {
        replace: cursor..cursor,
        text,
        // After the ` \\ `, in the first cell of the new row.
        cursor: cursor + 4,
    })
}

/// Alt+Right: move just past the next `&` in the buffer. Plain forward
/// search, not environment-aware.
pub fn next_cell(buffer: &str, cursor: usize) -> Option<NavEdit> {
    let cursor = clamp_boundary(buffer, cursor);
    let offset = buffer[cursor..].find('&')?;
    Some(NavEdit::Move {
        cursor: cursor + offset + 1,
    })
}

/// Locate the matrix environment around `cursor`, returning the byte offset
/// just after `\begin{..matrix}` and the start of the matching `\end`.
///
/// The nearest `\begin` fully before the cursor counts only when no `\end`
/// sits between it and the cursor, so positions after a closed environment
/// are not treated as inside it.
fn enclosing_matrix(buffer: &str, cursor: usize) -> Option<(usize, usize)> {
    let begin = BEGIN_MATRIX
        .find_iter(buffer)
        .filter(|m| m.end() <= cursor)
        .last()?;
    let end = END_MATRIX.find_iter(buffer).find(|m| m.start() >= cursor)?;
    let closed_before_cursor = END_MATRIX
        .find_iter(buffer)
        .any(|m| m.start() >= begin.end() && m.start() < cursor);
    if closed_before_cursor {
        return None;
    }
    Some((begin.end(), end.start()))
}

/// Range of the innermost command containing `cursor` plus the ranges of
/// its argument groups in document order.
fn command_arguments(buffer: &str, cursor: usize) -> Option<(Range<usize>, Vec<Range<usize>>)> {
    let tree = parse(buffer);
    let command = innermost(&tree, SyntaxKind::COMMAND, cursor)?;
    let range = command.text_range();
    let args = command
        .children()
        .filter(|n| {
            matches!(
                n.kind(),
                SyntaxKind::COMMAND_ARGS | SyntaxKind::COMMAND_OPTIONAL
            )
        })
        .map(|n| {
            let r = n.text_range();
            usize::from(r.start())..usize::from(r.end())
        })
        .collect();
    Some((usize::from(range.start())..usize::from(range.end()), args))
}
