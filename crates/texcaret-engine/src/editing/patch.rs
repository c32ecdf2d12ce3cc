//! Edit result metadata returned from `Document::apply`.

/// Describes what an applied command changed.
///
/// Hosts use this to update their view of the buffer and to move the native
/// cursor: `changed` lists the byte ranges touched by the edit (in
/// post-edit coordinates), `new_selection` is where the selection ended up,
/// and `version` is the document version after the edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    /// Byte ranges modified by this edit
    pub changed: Vec<std::ops::Range<usize>>,
    /// Updated cursor/selection position
    pub new_selection: std::ops::Range<usize>,
    /// Document version after the edit
    pub version: u64,
}
