//! # Lexer - Tokenizing LaTeX fragments
//!
//! This module provides the first stage of parsing: breaking source text into
//! tokens using the [Logos] lexer generator.
//!
//! [Logos]: https://docs.rs/logos
//!
//! ## The Lossless Guarantee
//!
//! The most important property of this lexer is that **every byte in the input
//! appears in exactly one token**. We never skip or discard characters. This
//! is what makes round-tripping possible:
//!
//! ```
//! use texcaret_syntax::lexer::lex;
//!
//! let input = "\\frac{1}{2} + x";
//! let tokens = lex(input);
//!
//! // Concatenating all token texts gives back the original
//! let reconstructed: String = tokens.iter().map(|t| t.text).collect();
//! assert_eq!(input, reconstructed);
//! ```
//!
//! ## Token Design Philosophy
//!
//! Tokens are kept **minimal and context-free**. The lexer doesn't know if `[`
//! opens an optional argument or is prose punctuation - that's the parser's
//! job. Characters with syntactic meaning get their own token types:
//!
//! - `\` → `BACKSLASH` (commands, display math, `\\` row breaks)
//! - `{`, `}`, `[`, `]` → brace/bracket tokens (groups, arguments)
//! - `$` → `DOLLAR` (math regions)
//! - `&`, `^`, `_` → alignment and script tokens
//!
//! ASCII letter runs become `WORD` tokens (command names are letter runs, so
//! `\frac` lexes as `BACKSLASH WORD`). Everything else becomes one `TEXT`
//! token **per character**: command names may also be a single non-letter
//! character (`\%`), so the grammar needs character granularity there.
//!
//! ## Public API
//!
//! - [`lex`] - Tokenize input, returning `Vec<Token>`
//! - [`lex_with_spans`] - Tokenize with byte offset spans
//! - [`Token`] - A token with its kind and text slice

use logos::Logos;

use crate::syntax_kind::SyntaxKind;

/// Token kinds produced by the Logos lexer.
///
/// This enum exists separately from [`SyntaxKind`] because Logos needs to
/// derive on it. Each variant maps to a corresponding `SyntaxKind` token.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Horizontal whitespace (spaces, tabs)
    #[regex(r"[ \t]+")]
    Whitespace,

    /// Line ending (LF or CRLF)
    #[regex(r"\r?\n")]
    Newline,

    /// `\` for commands and display-math delimiters
    #[token("\\")]
    Backslash,

    /// `{` opening a group
    #[token("{")]
    LBrace,

    /// `}` closing a group
    #[token("}")]
    RBrace,

    /// `[` opening an optional argument
    #[token("[")]
    LBracket,

    /// `]` closing an optional argument
    #[token("]")]
    RBracket,

    /// `(` plain parenthesis
    #[token("(")]
    LParen,

    /// `)` plain parenthesis
    #[token(")")]
    RParen,

    /// `$` math delimiter
    #[token("$")]
    Dollar,

    /// `&` column separator
    #[token("&")]
    Amp,

    /// `^` superscript
    #[token("^")]
    Caret,

    /// `_` subscript
    #[token("_")]
    Underscore,

    /// Run of ASCII letters
    #[regex(r"[a-zA-Z]+")]
    Word,

    /// Any other single character (digits, punctuation, unicode)
    #[regex(r"[^ \t\r\n\\{}\[\]()$&^_a-zA-Z]")]
    Text,
}

impl TokenKind {
    /// Convert to SyntaxKind.
    pub fn to_syntax_kind(self) -> SyntaxKind {
        match self {
            TokenKind::Whitespace => SyntaxKind::WHITESPACE,
            TokenKind::Newline => SyntaxKind::NEWLINE,
            TokenKind::Backslash => SyntaxKind::BACKSLASH,
            TokenKind::LBrace => SyntaxKind::LBRACE,
            TokenKind::RBrace => SyntaxKind::RBRACE,
            TokenKind::LBracket => SyntaxKind::LBRACKET,
            TokenKind::RBracket => SyntaxKind::RBRACKET,
            TokenKind::LParen => SyntaxKind::LPAREN,
            TokenKind::RParen => SyntaxKind::RPAREN,
            TokenKind::Dollar => SyntaxKind::DOLLAR,
            TokenKind::Amp => SyntaxKind::AMP,
            TokenKind::Caret => SyntaxKind::CARET,
            TokenKind::Underscore => SyntaxKind::UNDERSCORE,
            TokenKind::Word => SyntaxKind::WORD,
            TokenKind::Text => SyntaxKind::TEXT,
        }
    }
}

/// A lexed token with its kind and text slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: SyntaxKind,
    pub text: &'a str,
}

/// Lex the input into a sequence of tokens.
///
/// Guarantees that all bytes from the input appear in the output tokens.
pub fn lex(input: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut lexer = TokenKind::lexer(input);

    while let Some(result) = lexer.next() {
        let text = lexer.slice();
        let kind = match result {
            Ok(token_kind) => token_kind.to_syntax_kind(),
            Err(()) => {
                // Logos error means unrecognized bytes - treat as TEXT
                SyntaxKind::TEXT
            }
        };
        tokens.push(Token { kind, text });
    }

    tokens
}

/// Lex and return tokens along with their byte spans.
pub fn lex_with_spans(input: &str) -> Vec<(Token<'_>, std::ops::Range<usize>)> {
    let mut tokens = Vec::new();
    let mut lexer = TokenKind::lexer(input);

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let text = lexer.slice();
        let kind = match result {
            Ok(token_kind) => token_kind.to_syntax_kind(),
            Err(()) => SyntaxKind::TEXT,
        };
        tokens.push((Token { kind, text }, span));
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn token(kind: SyntaxKind, text: &str) -> Token<'_> {
        Token { kind, text }
    }

    #[test]
    fn lex_empty_input() {
        assert_eq!(lex(""), vec![]);
    }

    #[test]
    fn lex_plain_word() {
        let tokens = lex("hello");
        assert_eq!(tokens, vec![token(SyntaxKind::WORD, "hello")]);
    }

    #[test]
    fn lex_command() {
        let tokens = lex("\\frac");
        assert_eq!(
            tokens,
            vec![
                token(SyntaxKind::BACKSLASH, "\\"),
                token(SyntaxKind::WORD, "frac"),
            ]
        );
    }

    #[test]
    fn lex_command_with_args() {
        let tokens = lex("\\frac{1}{2}");
        assert_eq!(
            tokens,
            vec![
                token(SyntaxKind::BACKSLASH, "\\"),
                token(SyntaxKind::WORD, "frac"),
                token(SyntaxKind::LBRACE, "{"),
                token(SyntaxKind::TEXT, "1"),
                token(SyntaxKind::RBRACE, "}"),
                token(SyntaxKind::LBRACE, "{"),
                token(SyntaxKind::TEXT, "2"),
                token(SyntaxKind::RBRACE, "}"),
            ]
        );
    }

    #[test]
    fn lex_inline_math() {
        let tokens = lex("$x+y$");
        assert_eq!(
            tokens,
            vec![
                token(SyntaxKind::DOLLAR, "$"),
                token(SyntaxKind::WORD, "x"),
                token(SyntaxKind::TEXT, "+"),
                token(SyntaxKind::WORD, "y"),
                token(SyntaxKind::DOLLAR, "$"),
            ]
        );
    }

    #[test]
    fn lex_row_break() {
        let tokens = lex("\\\\");
        assert_eq!(
            tokens,
            vec![
                token(SyntaxKind::BACKSLASH, "\\"),
                token(SyntaxKind::BACKSLASH, "\\"),
            ]
        );
    }

    #[test]
    fn lex_matrix_cells() {
        let tokens = lex("1 & 2");
        assert_eq!(
            tokens,
            vec![
                token(SyntaxKind::TEXT, "1"),
                token(SyntaxKind::WHITESPACE, " "),
                token(SyntaxKind::AMP, "&"),
                token(SyntaxKind::WHITESPACE, " "),
                token(SyntaxKind::TEXT, "2"),
            ]
        );
    }

    #[test]
    fn lex_scripts() {
        let tokens = lex("x^{2}_{i}");
        assert_eq!(
            tokens,
            vec![
                token(SyntaxKind::WORD, "x"),
                token(SyntaxKind::CARET, "^"),
                token(SyntaxKind::LBRACE, "{"),
                token(SyntaxKind::TEXT, "2"),
                token(SyntaxKind::RBRACE, "}"),
                token(SyntaxKind::UNDERSCORE, "_"),
                token(SyntaxKind::LBRACE, "{"),
                token(SyntaxKind::WORD, "i"),
                token(SyntaxKind::RBRACE, "}"),
            ]
        );
    }

    #[test]
    fn lex_digits_one_token_each() {
        let tokens = lex("123");
        assert_eq!(
            tokens,
            vec![
                token(SyntaxKind::TEXT, "1"),
                token(SyntaxKind::TEXT, "2"),
                token(SyntaxKind::TEXT, "3"),
            ]
        );
    }

    #[test]
    fn lex_unicode_degrades_to_text() {
        let tokens = lex("é");
        assert_eq!(tokens, vec![token(SyntaxKind::TEXT, "é")]);
    }

    #[test]
    fn all_bytes_preserved() {
        let input = "\\begin{bmatrix}1 & 2 \\\\ 3 & 4\\end{bmatrix}";
        let tokens = lex(input);
        let reconstructed: String = tokens.iter().map(|t| t.text).collect();
        assert_eq!(input, reconstructed);
    }

    #[test]
    fn all_bytes_preserved_malformed() {
        let input = "a $unclosed math\n\\frac{no close";
        let tokens = lex(input);
        let reconstructed: String = tokens.iter().map(|t| t.text).collect();
        assert_eq!(input, reconstructed);
    }

    #[test]
    fn spans_are_correct() {
        let input = "\\sqrt{2} + x";
        let tokens = lex_with_spans(input);
        for (token, span) in &tokens {
            assert_eq!(token.text, &input[span.clone()]);
        }
    }
}
