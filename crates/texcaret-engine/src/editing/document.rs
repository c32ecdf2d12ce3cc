use xi_rope::{Delta, Rope, RopeInfo};

use texcaret_syntax::{parse, SyntaxNode};

use crate::context::{self, CursorContext};
use crate::editing::{Cmd, Patch};
use crate::events::{EditorEvent, Observer};
use crate::navigate::{self, NavEdit};
use crate::shortcuts::{self, Shortcut};

/// The editor state container.
///
/// Owns the buffer (an `xi_rope::Rope`), the selection, the parsed tree,
/// and the derived cursor context. All mutations flow through [`apply`]:
///
/// 1. compile the [`Cmd`] to a Delta
/// 2. transform the selection through the edit (pre-edit coordinates)
/// 3. apply the Delta to the buffer
/// 4. re-parse the buffer
/// 5. re-resolve the cursor context against the new tree
/// 6. notify observers
///
/// No step partially updates buffer without selection or vice versa; the
/// host always observes a consistent state.
///
/// ```
/// use texcaret_engine::editing::Document;
///
/// let mut doc = Document::new("");
/// doc.insert_text("\\frac{1}{2}");
/// doc.set_selection(6..6);
/// assert_eq!(doc.context().label, "\\frac (in arg 1 of 2)");
/// ```
///
/// [`apply`]: Document::apply
pub struct Document {
    /// xi-rope buffer holding the entire fragment, source of truth
    buffer: Rope,
    /// Current selection as byte offsets; collapsed means a plain cursor
    selection: std::ops::Range<usize>,
    /// Version counter incremented on each edit
    version: u64,
    /// Tree over the current buffer, rebuilt after every edit
    tree: SyntaxNode,
    /// Cursor context derived from `tree` and `selection`
    context: CursorContext,
    /// Instance-scoped diagnostic observers
    observers: Vec<Observer>,
}

impl Document {
    /// Create a document with the cursor at the end of the text.
    pub fn new(text: &str) -> Self {
        let buffer = Rope::from(text);
        let len = buffer.len();
        let tree = parse(text);
        let context = context::resolve(&tree, len);
        Self {
            buffer,
            selection: len..len,
            version: 0,
            tree,
            context,
            observers: Vec::new(),
        }
    }

    /// Create a document from raw bytes, validating UTF-8.
    pub fn from_bytes(bytes: &[u8]) -> anyhow::Result<Self> {
        let text = std::str::from_utf8(bytes)?;
        Ok(Self::new(text))
    }

    /// Apply a command: the core edit loop.
    pub fn apply(&mut self, cmd: Cmd) -> Patch {
        let delta = self.compile_command(&cmd);

        // Changed ranges in post-edit coordinates.
        let mut changed = Vec::new();
        let mut cursor = 0;
        for op in delta.els.iter() {
            match op {
                xi_rope::delta::DeltaElement::Copy(_from, to) => {
                    cursor = *to;
                }
                xi_rope::delta::DeltaElement::Insert(inserted) => {
                    let start = cursor;
                    let end = cursor + inserted.len();
                    changed.push(start..end);
                    cursor = end;
                }
            }
        }

        // The transform reads pre-edit coordinates, so it must run before
        // the delta shortens the buffer.
        let new_selection = self.transform_selection_for_command(&self.selection, &cmd);

        self.buffer = delta.apply(&self.buffer);
        self.tree = parse(&self.buffer.to_string());

        self.selection = new_selection.clone();
        self.version += 1;
        self.refresh_context();
        self.emit(EditorEvent::Edited {
            version: self.version,
        });

        Patch {
            changed,
            new_selection,
            version: self.version,
        }
    }

    /// Register a diagnostic observer for this document instance.
    pub fn subscribe(&mut self, observer: impl FnMut(&EditorEvent) + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Get the current selection range.
    pub fn selection(&self) -> std::ops::Range<usize> {
        self.selection.clone()
    }

    /// Set the selection, clamping to buffer bounds and char boundaries,
    /// and re-derive the cursor context.
    pub fn set_selection(&mut self, selection: std::ops::Range<usize>) {
        let text = self.text();
        let start = shortcuts::clamp_boundary(&text, selection.start);
        let end = shortcuts::clamp_boundary(&text, selection.end).max(start);
        self.selection = start..end;
        self.refresh_context();
    }

    /// The cursor position (start of the selection).
    pub fn cursor(&self) -> usize {
        self.selection.start
    }

    /// The current cursor context, fresh for the current buffer and cursor.
    pub fn context(&self) -> &CursorContext {
        &self.context
    }

    /// The parsed tree over the current buffer.
    pub fn tree(&self) -> &SyntaxNode {
        &self.tree
    }

    /// Get the current version.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Get the current text content.
    pub fn text(&self) -> String {
        self.buffer.to_string()
    }

    /// Get the buffer length in bytes.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.len() == 0
    }

    // ---- High-level operations the host binds to keys ----

    /// Replace the selection with typed text.
    pub fn insert_text(&mut self, text: &str) -> Patch {
        let range = self.selection.clone();
        self.apply(Cmd::ReplaceRange {
            range,
            text: text.to_string(),
        })
    }

    /// Delete the selection, or the character before a collapsed cursor.
    pub fn backspace(&mut self) -> Option<Patch> {
        let range = if self.selection.is_empty() {
            let text = self.text();
            let end = self.selection.start;
            let start = text[..end].char_indices().next_back()?.0;
            start..end
        } else {
            self.selection.clone()
        };
        Some(self.apply(Cmd::DeleteRange { range }))
    }

    /// Auto-pair an opening bracket at the cursor.
    pub fn auto_pair(&mut self, ch: char) -> Option<Patch> {
        let text = self.text();
        let edit = navigate::auto_pair(&text, self.cursor(), ch)?;
        let patch = self.apply_nav(edit);
        self.emit(EditorEvent::PairInserted { open: ch });
        Some(patch)
    }

    /// Tab: column separator inside a matrix, argument jump otherwise.
    pub fn tab_forward(&mut self) -> Option<Patch> {
        let from = self.cursor();
        let text = self.text();
        let edit = navigate::tab_forward(&text, from)?;
        let patch = self.apply_nav(edit);
        self.emit(EditorEvent::TabJump {
            from,
            to: patch.new_selection.start,
        });
        Some(patch)
    }

    /// Shift+Tab: jump to the previous argument boundary.
    pub fn tab_backward(&mut self) -> Option<Patch> {
        let from = self.cursor();
        let text = self.text();
        let edit = navigate::tab_backward(&text, from)?;
        let patch = self.apply_nav(edit);
        self.emit(EditorEvent::TabJump {
            from,
            to: patch.new_selection.start,
        });
        Some(patch)
    }

    /// Shift+Enter: insert a matrix row matching the current column count.
    pub fn insert_matrix_row(&mut self) -> Option<Patch> {
        let text = self.text();
        let edit = navigate::insert_matrix_row(&text, self.cursor())?;
        let columns = match &edit {
            NavEdit::Edit { text, .. } => text.matches('&').count() + 1,
            NavEdit::Move { .. } => 1,
        };
        let patch = self.apply_nav(edit);
        self.emit(EditorEvent::RowInserted { columns });
        Some(patch)
    }

    /// Alt+Right: move just past the next column separator.
    pub fn next_cell(&mut self) -> Option<Patch> {
        let from = self.cursor();
        let text = self.text();
        let edit = navigate::next_cell(&text, from)?;
        let patch = self.apply_nav(edit);
        self.emit(EditorEvent::CellJump {
            from,
            to: patch.new_selection.start,
        });
        Some(patch)
    }

    /// Expand the shortcut trigger ending at the cursor, if any.
    pub fn expand_shortcut(&mut self, table: &[Shortcut]) -> Option<Patch> {
        let text = self.text();
        let expansion = shortcuts::try_expand(&text, self.cursor(), table)?;
        let trigger = text[expansion.replaced.clone()].to_string();
        let patch = self.apply(Cmd::ReplaceRange {
            range: expansion.replaced,
            text: expansion.text,
        });
        self.set_selection(expansion.new_cursor..expansion.new_cursor);
        let patch = Patch {
            new_selection: self.selection.clone(),
            ..patch
        };
        self.emit(EditorEvent::ShortcutExpanded { trigger });
        Some(patch)
    }

    /// Move the cursor one character left.
    pub fn move_left(&mut self) {
        let text = self.text();
        if let Some((i, _)) = text[..self.selection.start].char_indices().next_back() {
            self.set_selection(i..i);
        } else {
            let start = self.selection.start;
            self.set_selection(start..start);
        }
    }

    /// Move the cursor one character right.
    pub fn move_right(&mut self) {
        let text = self.text();
        let end = self.selection.end;
        let next = text[end..]
            .chars()
            .next()
            .map(|c| end + c.len_utf8())
            .unwrap_or(end);
        self.set_selection(next..next);
    }

    fn apply_nav(&mut self, edit: NavEdit) -> Patch {
        match edit {
            NavEdit::Edit {
                replace,
                text,
                cursor,
            } => {
                let patch = self.apply(Cmd::ReplaceRange {
                    range: replace,
                    text,
                });
                self.set_selection(cursor..cursor);
                Patch {
                    new_selection: self.selection.clone(),
                    ..patch
                }
            }
            NavEdit::Move { cursor } => {
                self.set_selection(cursor..cursor);
                Patch {
                    changed: Vec::new(),
                    new_selection: self.selection.clone(),
                    version: self.version,
                }
            }
        }
    }

    fn refresh_context(&mut self) {
        self.context = context::resolve(&self.tree, self.selection.start);
    }

    fn emit(&mut self, event: EditorEvent) {
        for observer in &mut self.observers {
            observer(&event);
        }
    }

    pub(crate) fn compile_command(&self, cmd: &Cmd) -> Delta<RopeInfo> {
        crate::editing::commands::compile_command(self, cmd)
    }

    pub(crate) fn transform_selection_for_command(
        &self,
        range: &std::ops::Range<usize>,
        cmd: &Cmd,
    ) -> std::ops::Range<usize> {
        crate::editing::commands::transform_selection_for_command(self, range, cmd)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shortcuts::builtin_shortcuts;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn typing_advances_cursor_and_version() {
        let mut doc = Document::new("");
        let patch = doc.insert_text("ab");
        assert_eq!(doc.text(), "ab");
        assert_eq!(doc.selection(), 2..2);
        assert_eq!(patch.version, 1);

        doc.set_selection(1..1);
        doc.insert_text("X");
        assert_eq!(doc.text(), "aXb");
        assert_eq!(doc.selection(), 2..2);
        assert_eq!(doc.version(), 2);
    }

    #[test]
    fn backspace_deletes_previous_char() {
        let mut doc = Document::new("ab");
        doc.backspace();
        assert_eq!(doc.text(), "a");
        assert_eq!(doc.selection(), 1..1);
    }

    #[test]
    fn backspace_at_buffer_end_keeps_cursor_in_bounds() {
        let mut doc = Document::new("ab");
        doc.backspace();
        assert_eq!(doc.selection(), 1..1);
        doc.backspace();
        assert_eq!(doc.text(), "");
        assert_eq!(doc.selection(), 0..0);
    }

    #[test]
    fn delete_before_cursor_shifts_selection_left() {
        let mut doc = Document::new("abcdef");
        doc.set_selection(6..6);
        doc.apply(Cmd::DeleteRange { range: 2..5 });
        assert_eq!(doc.text(), "abf");
        assert_eq!(doc.selection(), 3..3);
    }

    #[test]
    fn backspace_at_start_is_noop() {
        let mut doc = Document::new("ab");
        doc.set_selection(0..0);
        assert_eq!(doc.backspace(), None);
        assert_eq!(doc.text(), "ab");
    }

    #[test]
    fn backspace_removes_selection() {
        let mut doc = Document::new("abcd");
        doc.set_selection(1..3);
        doc.backspace();
        assert_eq!(doc.text(), "ad");
        assert_eq!(doc.selection(), 1..1);
    }

    #[test]
    fn context_follows_edits() {
        let mut doc = Document::new("");
        doc.insert_text("$x$");
        doc.set_selection(2..2);
        assert!(doc.context().in_math);
        assert_eq!(doc.context().label, "math");
    }

    #[test]
    fn auto_pair_places_cursor_inside() {
        let mut doc = Document::new("");
        doc.auto_pair('(');
        assert_eq!(doc.text(), "()");
        assert_eq!(doc.selection(), 1..1);
    }

    #[test]
    fn shortcut_expansion_through_document() {
        let mut doc = Document::new("mat");
        let patch = doc.expand_shortcut(&builtin_shortcuts()).unwrap();
        assert_eq!(
            doc.text(),
            "\\begin{bmatrix}1 & 2 & 3 \\\\ 4 & 5 & 6\\end{bmatrix}"
        );
        // Cursor just before `\end{bmatrix}`.
        assert_eq!(patch.new_selection.start, doc.len() - 13);
    }

    #[test]
    fn tab_navigation_through_document() {
        let mut doc = Document::new("\\frac{1}{2}");
        doc.set_selection(6..6);
        doc.tab_forward().unwrap();
        assert_eq!(doc.selection(), 9..9);
        doc.tab_backward().unwrap();
        assert_eq!(doc.selection(), 7..7);
    }

    #[test]
    fn observers_receive_events() {
        let seen: Rc<RefCell<Vec<EditorEvent>>> = Rc::default();
        let sink = Rc::clone(&seen);

        let mut doc = Document::new("");
        doc.subscribe(move |event| sink.borrow_mut().push(event.clone()));
        doc.insert_text("x");
        doc.auto_pair('(');

        let events = seen.borrow();
        assert!(events.contains(&EditorEvent::Edited { version: 1 }));
        assert!(events.contains(&EditorEvent::PairInserted { open: '(' }));
    }

    #[test]
    fn observers_are_instance_scoped() {
        let count: Rc<RefCell<usize>> = Rc::default();
        let sink = Rc::clone(&count);

        let mut observed = Document::new("");
        observed.subscribe(move |_| *sink.borrow_mut() += 1);

        let mut other = Document::new("");
        other.insert_text("x");
        assert_eq!(*count.borrow(), 0);
    }

    #[test]
    fn from_bytes_rejects_invalid_utf8() {
        assert!(Document::from_bytes(&[0xff, 0xfe]).is_err());
        assert!(Document::from_bytes(b"\\alpha").is_ok());
    }
}
