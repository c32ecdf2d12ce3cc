//! # Shortcut Expander
//!
//! Maps a trigger typed immediately before the cursor to a LaTeX template.
//! The trigger is either the contiguous run of letters ending at the cursor
//! (`mat`, `sqrt`) or, when no letters precede the cursor, the single
//! preceding character (`/`, `^`, `_`).
//!
//! Expansion is purely substitutional: the trigger span is replaced by the
//! template with its `$0` placeholder filled in, and the cursor lands at
//! `word_start + expanded.len() + cursor_offset`. Nothing outside the
//! trigger span is inspected or modified.

use std::ops::Range;

/// Placeholder marker; appears exactly once in every template.
pub const PLACEHOLDER: &str = "$0";

/// One trigger → template mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shortcut {
    /// Letter run or single symbol matched against the text before the cursor
    pub trigger: String,
    /// Inserted text, containing [`PLACEHOLDER`] exactly once
    pub template: String,
    /// Characters back from the end of the expanded text to place the cursor;
    /// zero or negative
    pub cursor_offset: isize,
    /// Substituted for the placeholder; empty when absent
    pub default_content: Option<String>,
}

impl Shortcut {
    pub fn new(trigger: &str, template: &str, cursor_offset: isize) -> Self {
        Self {
            trigger: trigger.to_string(),
            template: template.to_string(),
            cursor_offset,
            default_content: None,
        }
    }

    pub fn with_default(mut self, content: &str) -> Self {
        self.default_content = Some(content.to_string());
        self
    }

    /// The template with the placeholder substituted.
    pub fn expanded(&self) -> String {
        let content = self.default_content.as_deref().unwrap_or("");
        self.template.replacen(PLACEHOLDER, content, 1)
    }
}

/// The edit produced by a successful expansion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expansion {
    /// Span of the trigger to replace
    pub replaced: Range<usize>,
    /// Replacement text
    pub text: String,
    /// Cursor position after the edit, in post-edit coordinates
    pub new_cursor: usize,
}

/// The built-in shortcut table. User configuration may extend or shadow it.
pub fn builtin_shortcuts() -> Vec<Shortcut> {
    vec![
        // Cursor offsets of -13 land just before `\end{bmatrix}`.
        Shortcut::new("mat", "\\begin{bmatrix}$0\\end{bmatrix}", -13)
            .with_default("1 & 2 & 3 \\\\ 4 & 5 & 6"),
        Shortcut::new("vec", "\\begin{bmatrix}$0\\end{bmatrix}", -13)
            .with_default("1 \\\\ 2 \\\\ 3"),
        // Cursor in the empty denominator.
        Shortcut::new("/", "\\frac{$0}{}", -1),
        Shortcut::new("sqrt", "\\sqrt{$0}", -1),
        Shortcut::new("^", "^{$0}", -1),
        Shortcut::new("_", "_{$0}", -1),
    ]
}

/// Try to expand the trigger ending at `cursor`.
///
/// Returns `None` without touching anything when no trigger matches. Offsets
/// outside the buffer (or off a character boundary) are clamped first, so
/// this never panics on hostile input.
pub fn try_expand(buffer: &str, cursor: usize, table: &[Shortcut]) -> Option<Expansion> {
    let cursor = clamp_boundary(buffer, cursor);
    let before = &buffer[..cursor];

    // Letter run ending at the cursor.
    let mut word_start = cursor;
    for (i, ch) in before.char_indices().rev() {
        if ch.is_ascii_alphabetic() {
            word_start = i;
        } else {
            break;
        }
    }

    if word_start == cursor {
        // No letters; fall back to the single preceding character.
        let ch = before.chars().next_back()?;
        word_start = cursor - ch.len_utf8();
    }
    let candidate = &buffer[word_start..cursor];

    let shortcut = table.iter().find(|s| s.trigger == candidate)?;
    let text = shortcut.expanded();

    let end = word_start + text.len();
    let new_len = buffer.len() - (cursor - word_start) + text.len();
    let new_cursor = (end as isize + shortcut.cursor_offset).clamp(0, new_len as isize) as usize;

    Some(Expansion {
        replaced: word_start..cursor,
        text,
        new_cursor,
    })
}

/// Largest valid char boundary at or below `offset`.
pub(crate) fn clamp_boundary(buffer: &str, offset: usize) -> usize {
    let mut offset = offset.min(buffer.len());
    while !buffer.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}
