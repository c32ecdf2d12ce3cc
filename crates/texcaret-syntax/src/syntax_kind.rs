//! SyntaxKind enum for all tokens and nodes in the LaTeX-fragment CST.
//!
//! Following the rust-analyzer model, all tokens and nodes share a single enum.
//! Every byte in the source must appear as a token in the tree.

/// All syntax kinds for the LaTeX-fragment CST.
///
/// This enum represents both tokens (lexer output) and composite nodes (parser output).
/// The `repr(u16)` ensures efficient storage in rowan's green tree.
///
/// We use SCREAMING_CASE following the rust-analyzer convention for SyntaxKind.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // === Tokens (lexer output) ===
    /// Horizontal whitespace (spaces, tabs)
    WHITESPACE,
    /// Line ending
    NEWLINE,
    /// `\` introducing a command (or a display-math delimiter)
    BACKSLASH,
    /// `{` opening a group or command argument
    LBRACE,
    /// `}` closing a group or command argument
    RBRACE,
    /// `[` opening an optional argument
    LBRACKET,
    /// `]` closing an optional argument
    RBRACKET,
    /// `(` - plain in the grammar, auto-paired by the editor
    LPAREN,
    /// `)` - plain in the grammar
    RPAREN,
    /// `$` math delimiter
    DOLLAR,
    /// `&` column separator in matrix-like environments
    AMP,
    /// `^` superscript
    CARET,
    /// `_` subscript
    UNDERSCORE,
    /// A run of ASCII letters (command names, prose words)
    WORD,
    /// Any other single character
    TEXT,
    /// End of file marker
    EOF,

    // === Composite Nodes (parser output) ===
    /// Root node covering the whole fragment
    ROOT,
    /// A command: `\name` plus adjacent argument groups
    COMMAND,
    /// The identifier after `\` (letter run, or one non-letter character)
    COMMAND_NAME,
    /// A `{...}` group attached to a command
    COMMAND_ARGS,
    /// A `[...]` group attached to a command
    COMMAND_OPTIONAL,
    /// A free-standing `{...}` group
    GROUP,
    /// A math region: `$...$`, `$$...$$`, or `\[...\]`
    MATH,
}

impl SyntaxKind {
    /// Returns true if this kind represents a token (lexer output).
    pub fn is_token(self) -> bool {
        (self as u16) <= (Self::EOF as u16)
    }

    /// Returns true if this kind represents a composite node.
    pub fn is_node(self) -> bool {
        !self.is_token()
    }

    /// Returns true if this kind is trivia (whitespace/newlines).
    pub fn is_trivia(self) -> bool {
        matches!(self, Self::WHITESPACE | Self::NEWLINE)
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

/// Language definition for rowan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LatexLang {}

impl rowan::Language for LatexLang {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        assert!(raw.0 <= SyntaxKind::MATH as u16);
        // SAFETY: We check bounds above and SyntaxKind is repr(u16)
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// Type alias for our syntax nodes.
pub type SyntaxNode = rowan::SyntaxNode<LatexLang>;
/// Type alias for our syntax tokens.
pub type SyntaxToken = rowan::SyntaxToken<LatexLang>;
/// Type alias for syntax elements (node or token).
pub type SyntaxElement = rowan::SyntaxElement<LatexLang>;
