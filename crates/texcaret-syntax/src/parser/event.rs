//! # Parser Events
//!
//! Events are the intermediate representation between parsing and tree building.
//! Instead of building the tree directly, the parser emits a **flat sequence**
//! of events that describe the tree structure.
//!
//! The four event types form a simple protocol:
//!
//! ```text
//! Start(COMMAND)       ← Begin a COMMAND node
//!   Token(BACKSLASH)   ← Add a `\` token
//!   Start(COMMAND_NAME)
//!     Token(WORD)
//!   Finish
//! Finish               ← End the COMMAND node
//! ```
//!
//! The Sink processes these in order, maintaining a stack of open nodes.
//! Start pushes, Finish pops. The `forward_parent` field in `Start` supports
//! wrapping an already-parsed node in a new parent; the Sink resolves the
//! link chain and opens nodes outermost-first.

use crate::syntax_kind::SyntaxKind;

/// An event emitted by the parser during tree construction.
///
/// Events form a flat representation of the tree that the [`Sink`](super::sink::Sink)
/// converts into an actual Rowan tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Begin a new composite node.
    ///
    /// The `kind` specifies what type of node (COMMAND, MATH, etc.).
    ///
    /// If `forward_parent` is set, it points to another `Start` event that
    /// should become this node's parent.
    Start {
        kind: SyntaxKind,
        forward_parent: Option<usize>,
    },

    /// Add a token to the current node.
    ///
    /// The `n_raw_tokens` field says how many lexer tokens this event
    /// consumes. Usually 1, but can be more when grouping.
    Token { kind: SyntaxKind, n_raw_tokens: u8 },

    /// Finish the current node.
    ///
    /// Must be paired with a preceding `Start`. The Sink pops the node
    /// stack when it sees this.
    Finish,

    /// A placeholder that will be replaced.
    ///
    /// When `parser.start()` is called, a `Placeholder` is pushed. Later,
    /// `marker.complete()` replaces it with a real `Start`, or
    /// `marker.abandon()` leaves it (the Sink ignores placeholders).
    Placeholder,
}

impl Event {
    /// Create a start event with no forward parent.
    pub fn start(kind: SyntaxKind) -> Self {
        Event::Start {
            kind,
            forward_parent: None,
        }
    }

    /// Create a token event for a single raw token.
    pub fn token(kind: SyntaxKind) -> Self {
        Event::Token {
            kind,
            n_raw_tokens: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_start_creation() {
        let event = Event::start(SyntaxKind::COMMAND);
        assert_eq!(
            event,
            Event::Start {
                kind: SyntaxKind::COMMAND,
                forward_parent: None
            }
        );
    }

    #[test]
    fn event_token_creation() {
        let event = Event::token(SyntaxKind::WORD);
        assert_eq!(
            event,
            Event::Token {
                kind: SyntaxKind::WORD,
                n_raw_tokens: 1
            }
        );
    }
}
