//! Diagnostic events emitted by the editing core.
//!
//! Events are purely observational: no editing decision depends on them.
//! They exist so a host UI (debug panel, status line) can display what the
//! core just did. Each [`Document`](crate::editing::Document) owns its own
//! observer list; there is no global event channel, so multiple independent
//! editor instances never see each other's events.

/// Something the editing core did, described for diagnostic display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorEvent {
    /// The buffer changed; `version` is the document version after the edit.
    Edited { version: u64 },
    /// A shortcut trigger was expanded into its template.
    ShortcutExpanded { trigger: String },
    /// Tab/Shift+Tab moved the cursor between argument boundaries.
    TabJump { from: usize, to: usize },
    /// An auto-pair insertion placed the cursor between `open` and its match.
    PairInserted { open: char },
    /// A matrix row was inserted with this many columns.
    RowInserted { columns: usize },
    /// Alt+Right moved the cursor past the next column separator.
    CellJump { from: usize, to: usize },
}

/// Observer callback invoked synchronously after each state transition.
pub type Observer = Box<dyn FnMut(&EditorEvent)>;
