//! The edit command algebra and its compilation to xi-rope deltas.

use xi_rope::delta::Builder;
use xi_rope::{Delta, Rope, RopeInfo};

use crate::editing::Document;

/// Commands that can be applied to the document.
///
/// Every buffer mutation in the core flows through one of these three
/// primitives; higher-level operations (shortcut expansion, auto-pairing,
/// matrix row insertion) compile down to a `ReplaceRange` before applying.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cmd {
    InsertText {
        at: usize,
        text: String,
    },
    DeleteRange {
        range: std::ops::Range<usize>,
    },
    ReplaceRange {
        range: std::ops::Range<usize>,
        text: String,
    },
}

/// Compile a command into a delta.
///
/// Ranges are clamped to the buffer so that a stale or out-of-range command
/// degrades to a smaller edit instead of panicking inside xi-rope.
pub(crate) fn compile_command(doc: &Document, cmd: &Cmd) -> Delta<RopeInfo> {
    let len = doc.len();
    match cmd {
        Cmd::InsertText { at, text } => {
            let at = (*at).min(len);
            let mut builder = Builder::new(len);
            builder.replace(at..at, Rope::from(text));
            builder.build()
        }
        Cmd::DeleteRange { range } => {
            let range = clamp_range(range, len);
            let mut builder = Builder::new(len);
            builder.delete(range);
            builder.build()
        }
        Cmd::ReplaceRange { range, text } => {
            let range = clamp_range(range, len);
            let mut builder = Builder::new(len);
            builder.replace(range, Rope::from(text));
            builder.build()
        }
    }
}

fn clamp_range(range: &std::ops::Range<usize>, len: usize) -> std::ops::Range<usize> {
    let start = range.start.min(len);
    let end = range.end.min(len).max(start);
    start..end
}

/// Transform the selection through the command being applied.
pub(crate) fn transform_selection_for_command(
    doc: &Document,
    range: &std::ops::Range<usize>,
    cmd: &Cmd,
) -> std::ops::Range<usize> {
    let len = doc.len();
    match cmd {
        Cmd::InsertText { at, text } => {
            let at = (*at).min(len);
            let text_len = text.len();
            if at <= range.start {
                // Insertion before or at selection start: shift right
                (range.start + text_len)..(range.end + text_len)
            } else if at < range.end {
                // Insertion within selection: grow the end
                range.start..(range.end + text_len)
            } else {
                range.clone()
            }
        }
        Cmd::DeleteRange { range: del_range } => {
            let del_range = clamp_range(del_range, len);
            let del_len = del_range.len();
            if del_range.end <= range.start {
                // Deletion entirely before selection: shift left
                (range.start - del_len)..(range.end - del_len)
            } else if del_range.start >= range.end {
                range.clone()
            } else {
                // Deletion overlaps selection: collapse to deletion point
                del_range.start..del_range.start
            }
        }
        Cmd::ReplaceRange {
            range: replace_range,
            text,
        } => {
            let replace_range = clamp_range(replace_range, len);
            let del_len = replace_range.len();
            let insert_len = text.len();
            if replace_range.end <= range.start {
                // Replacement before selection: shift by the net change
                if insert_len >= del_len {
                    let shift = insert_len - del_len;
                    (range.start + shift)..(range.end + shift)
                } else {
                    let shift = del_len - insert_len;
                    (range.start.saturating_sub(shift))..(range.end.saturating_sub(shift))
                }
            } else if replace_range.start >= range.end {
                range.clone()
            } else {
                // Replacement overlaps selection: land after the inserted text
                let at = replace_range.start + insert_len;
                at..at
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn insert_compiles_to_delta() {
        let doc = Document::new("hello");
        let delta = compile_command(
            &doc,
            &Cmd::InsertText {
                at: 5,
                text: " world".to_string(),
            },
        );
        let rope = delta.apply(&Rope::from("hello"));
        assert_eq!(rope.to_string(), "hello world");
    }

    #[test]
    fn delete_compiles_to_delta() {
        let doc = Document::new("hello world");
        let delta = compile_command(&doc, &Cmd::DeleteRange { range: 5..11 });
        let rope = delta.apply(&Rope::from("hello world"));
        assert_eq!(rope.to_string(), "hello");
    }

    #[test]
    fn replace_compiles_to_delta() {
        let doc = Document::new("hello world");
        let delta = compile_command(
            &doc,
            &Cmd::ReplaceRange {
                range: 6..11,
                text: "there".to_string(),
            },
        );
        let rope = delta.apply(&Rope::from("hello world"));
        assert_eq!(rope.to_string(), "hello there");
    }

    #[test]
    fn out_of_range_command_is_clamped() {
        let doc = Document::new("ab");
        let delta = compile_command(&doc, &Cmd::DeleteRange { range: 1..100 });
        let rope = delta.apply(&Rope::from("ab"));
        assert_eq!(rope.to_string(), "a");
    }

    #[test]
    fn selection_shifts_right_for_insert_before() {
        let doc = Document::new("abcdef");
        let new = transform_selection_for_command(
            &doc,
            &(3..5),
            &Cmd::InsertText {
                at: 0,
                text: "xx".to_string(),
            },
        );
        assert_eq!(new, 5..7);
    }

    #[test]
    fn selection_collapses_on_overlapping_delete() {
        let doc = Document::new("abcdef");
        let new = transform_selection_for_command(&doc, &(3..5), &Cmd::DeleteRange { range: 2..4 });
        assert_eq!(new, 2..2);
    }

    #[test]
    fn selection_lands_after_overlapping_replace() {
        let doc = Document::new("abcdef");
        let new = transform_selection_for_command(
            &doc,
            &(2..2),
            &Cmd::ReplaceRange {
                range: 1..3,
                text: "XYZ".to_string(),
            },
        );
        assert_eq!(new, 4..4);
    }
}
