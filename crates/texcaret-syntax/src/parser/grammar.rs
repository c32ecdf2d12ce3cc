//! # Grammar Rules
//!
//! The grammar recognizes four constructs over the token stream:
//!
//! - **Commands**: `\name` (letter run) or `\x` (one non-letter character),
//!   followed by zero or more immediately-adjacent `{...}` / `[...]` argument
//!   groups.
//! - **Math regions**: `$...$`, `$$...$$`, `\[...\]`.
//! - **Free groups**: `{...}` not attached to a command.
//! - **Plain text**: everything else, left as loose tokens.
//!
//! ## The Frame Stack
//!
//! Instead of recursive grammar functions, the content loop runs over an
//! explicit stack of open-construct [`Frame`]s. Each frame owns the `Marker`
//! for its node; opening a construct pushes a frame, seeing its closing
//! delimiter pops and completes it. Nesting depth therefore never grows the
//! call stack, no matter how deeply the input nests.
//!
//! ## Error Tolerance
//!
//! A construct frame is only opened when its closing delimiter is visible
//! ahead (token lookahead with a depth counter for braces/brackets, same-line
//! lookahead for `$`, end-of-input lookahead for `$$` and `\[`). An
//! unterminated opener therefore stays a plain token: malformed input
//! degrades to text and parsing never fails. Stray closers (`}`, `]`) with no
//! open frame are plain tokens too - depth never goes below zero.

use crate::parser::{Marker, Parser};
use crate::syntax_kind::SyntaxKind;

/// What kind of construct an open frame represents.
enum FrameKind {
    /// `\name`, still accepting adjacent argument groups
    Command,
    /// `{...}` attached to a command
    CommandArgs,
    /// `[...]` attached to a command
    CommandOptional,
    /// Free-standing `{...}`
    Group,
    /// `$...$` or `$$...$$`
    DollarMath { double: bool },
    /// `\[...\]`
    BracketMath,
}

/// An open construct: its kind plus the marker that will become its node.
struct Frame {
    kind: FrameKind,
    marker: Marker,
}

fn node_kind(kind: &FrameKind) -> SyntaxKind {
    match kind {
        FrameKind::Command => SyntaxKind::COMMAND,
        FrameKind::CommandArgs => SyntaxKind::COMMAND_ARGS,
        FrameKind::CommandOptional => SyntaxKind::COMMAND_OPTIONAL,
        FrameKind::Group => SyntaxKind::GROUP,
        FrameKind::DollarMath { .. } | FrameKind::BracketMath => SyntaxKind::MATH,
    }
}

fn complete_frame(p: &mut Parser<'_, '_>, frame: Frame) {
    let kind = node_kind(&frame.kind);
    frame.marker.complete(p, kind);
}

/// Parse the root fragment.
///
/// This is the entry point for parsing. It creates a ROOT node containing
/// all top-level constructs and loose text tokens.
pub(crate) fn root(p: &mut Parser<'_, '_>) {
    let m = p.start();
    let mut stack: Vec<Frame> = Vec::new();

    while !p.at_end() {
        step(p, &mut stack);
    }

    // Opening is gated on a visible closer, so frames still open here only
    // come from pathological delimiter overlaps; close them in LIFO order.
    while let Some(frame) = stack.pop() {
        complete_frame(p, frame);
    }

    m.complete(p, SyntaxKind::ROOT);
}

/// Process one token (or one construct boundary).
fn step(p: &mut Parser<'_, '_>, stack: &mut Vec<Frame>) {
    if try_close_top(p, stack) {
        return;
    }

    match p.current() {
        SyntaxKind::BACKSLASH => backslash(p, stack),
        SyntaxKind::LBRACE
            if has_matching_close(p, SyntaxKind::LBRACE, SyntaxKind::RBRACE) =>
        {
            let marker = p.start();
            p.bump();
            stack.push(Frame {
                kind: FrameKind::Group,
                marker,
            });
        }
        SyntaxKind::DOLLAR => dollar(p, stack),
        _ => p.bump(),
    }
}

/// If the current token closes the innermost open frame, consume it and
/// complete the frame. Returns true if a frame was closed.
fn try_close_top(p: &mut Parser<'_, '_>, stack: &mut Vec<Frame>) -> bool {
    let Some(top) = stack.last() else {
        return false;
    };

    match &top.kind {
        FrameKind::Group if p.at(SyntaxKind::RBRACE) => {
            p.bump();
            let frame = stack.pop().expect("frame checked above");
            complete_frame(p, frame);
            true
        }
        FrameKind::CommandArgs if p.at(SyntaxKind::RBRACE) => {
            p.bump();
            let frame = stack.pop().expect("frame checked above");
            complete_frame(p, frame);
            after_argument(p, stack);
            true
        }
        FrameKind::CommandOptional if p.at(SyntaxKind::RBRACKET) => {
            p.bump();
            let frame = stack.pop().expect("frame checked above");
            complete_frame(p, frame);
            after_argument(p, stack);
            true
        }
        FrameKind::DollarMath { double }
            if p.at(SyntaxKind::DOLLAR) && (!double || p.nth(1) == SyntaxKind::DOLLAR) =>
        {
            let double = *double;
            p.bump();
            if double {
                p.bump();
            }
            let frame = stack.pop().expect("frame checked above");
            complete_frame(p, frame);
            true
        }
        FrameKind::BracketMath
            if p.at(SyntaxKind::BACKSLASH) && p.nth(1) == SyntaxKind::RBRACKET =>
        {
            p.bump();
            p.bump();
            let frame = stack.pop().expect("frame checked above");
            complete_frame(p, frame);
            true
        }
        _ => false,
    }
}

/// An argument group just closed; the enclosing command may attach another
/// immediately-adjacent one, otherwise the command itself is done.
fn after_argument(p: &mut Parser<'_, '_>, stack: &mut Vec<Frame>) {
    debug_assert!(matches!(
        stack.last().map(|f| &f.kind),
        Some(FrameKind::Command)
    ));
    if !open_argument(p, stack) {
        if let Some(frame) = stack.pop() {
            complete_frame(p, frame);
        }
    }
}

/// Open a command argument frame if the current token starts a balanced
/// `{...}` or `[...]` group. Returns false (consuming nothing) otherwise.
fn open_argument(p: &mut Parser<'_, '_>, stack: &mut Vec<Frame>) -> bool {
    let kind = if p.at(SyntaxKind::LBRACE)
        && has_matching_close(p, SyntaxKind::LBRACE, SyntaxKind::RBRACE)
    {
        FrameKind::CommandArgs
    } else if p.at(SyntaxKind::LBRACKET)
        && has_matching_close(p, SyntaxKind::LBRACKET, SyntaxKind::RBRACKET)
    {
        FrameKind::CommandOptional
    } else {
        return false;
    };

    let marker = p.start();
    p.bump();
    stack.push(Frame { kind, marker });
    true
}

/// Dispatch a `\`: command, display math, or plain text.
fn backslash(p: &mut Parser<'_, '_>, stack: &mut Vec<Frame>) {
    match p.nth(1) {
        SyntaxKind::WORD => {
            let marker = p.start();
            p.bump(); // backslash
            let name = p.start();
            p.bump(); // letter run
            name.complete(p, SyntaxKind::COMMAND_NAME);
            finish_command(p, stack, marker);
        }
        SyntaxKind::LBRACKET => {
            // `\[` opens display math only when `\]` exists ahead; an
            // unterminated opener stays plain text.
            if has_display_close(p) {
                let marker = p.start();
                p.bump();
                p.bump();
                stack.push(Frame {
                    kind: FrameKind::BracketMath,
                    marker,
                });
            } else {
                p.bump();
            }
        }
        kind if is_single_char_name(kind) => {
            let marker = p.start();
            p.bump(); // backslash
            let name = p.start();
            p.bump(); // the single-character name
            name.complete(p, SyntaxKind::COMMAND_NAME);
            finish_command(p, stack, marker);
        }
        _ => {
            // Backslash before whitespace, newline, or end of input: plain.
            p.bump();
        }
    }
}

/// Token kinds usable as a one-character command name (`\\`, `\{`, `\%`, ...).
///
/// `[` is excluded: `\[` is the display-math opener and is handled first.
fn is_single_char_name(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::BACKSLASH
            | SyntaxKind::LBRACE
            | SyntaxKind::RBRACE
            | SyntaxKind::RBRACKET
            | SyntaxKind::LPAREN
            | SyntaxKind::RPAREN
            | SyntaxKind::DOLLAR
            | SyntaxKind::AMP
            | SyntaxKind::CARET
            | SyntaxKind::UNDERSCORE
            | SyntaxKind::TEXT
    )
}

/// The command name is parsed; attach adjacent arguments or complete.
fn finish_command(p: &mut Parser<'_, '_>, stack: &mut Vec<Frame>, marker: Marker) {
    stack.push(Frame {
        kind: FrameKind::Command,
        marker,
    });
    if !open_argument(p, stack) {
        if let Some(frame) = stack.pop() {
            complete_frame(p, frame);
        }
    }
}

/// Dispatch a `$`: open inline or display math, or plain text if unclosed.
fn dollar(p: &mut Parser<'_, '_>, stack: &mut Vec<Frame>) {
    let double = p.nth(1) == SyntaxKind::DOLLAR;
    if double && has_double_dollar_close(p) {
        let marker = p.start();
        p.bump();
        p.bump();
        stack.push(Frame {
            kind: FrameKind::DollarMath { double: true },
            marker,
        });
    } else if has_inline_close(p) {
        let marker = p.start();
        p.bump();
        stack.push(Frame {
            kind: FrameKind::DollarMath { double: false },
            marker,
        });
    } else {
        // No closing `$` before end of line: stays plain text.
        p.bump();
    }
}

/// Depth-counted lookahead for a matching closer, starting at the opener.
/// One counter per group type; scans to end of input.
fn has_matching_close(p: &Parser<'_, '_>, open: SyntaxKind, close: SyntaxKind) -> bool {
    debug_assert!(p.at(open));
    let mut depth = 0usize;
    let mut i = 0;
    loop {
        let kind = p.nth(i);
        if kind == SyntaxKind::EOF {
            return false;
        } else if kind == open {
            depth += 1;
        } else if kind == close {
            depth -= 1;
            if depth == 0 {
                return true;
            }
        }
        i += 1;
    }
}

/// From just after an opening `$`: is there a closing `$` on this line?
fn has_inline_close(p: &Parser<'_, '_>) -> bool {
    let mut i = 1;
    loop {
        match p.nth(i) {
            SyntaxKind::EOF | SyntaxKind::NEWLINE => return false,
            SyntaxKind::DOLLAR => return true,
            _ => i += 1,
        }
    }
}

/// From just after an opening `$$`: is there an adjacent `$$` before EOF?
fn has_double_dollar_close(p: &Parser<'_, '_>) -> bool {
    let mut i = 2;
    loop {
        match p.nth(i) {
            SyntaxKind::EOF => return false,
            SyntaxKind::DOLLAR if p.nth(i + 1) == SyntaxKind::DOLLAR => return true,
            _ => i += 1,
        }
    }
}

/// From an opening `\[`: is there a `\]` before EOF?
fn has_display_close(p: &Parser<'_, '_>) -> bool {
    debug_assert!(p.at(SyntaxKind::BACKSLASH) && p.nth(1) == SyntaxKind::LBRACKET);
    let mut i = 2;
    loop {
        match p.nth(i) {
            SyntaxKind::EOF => return false,
            SyntaxKind::BACKSLASH if p.nth(i + 1) == SyntaxKind::RBRACKET => return true,
            _ => i += 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::parse;
    use crate::syntax_kind::SyntaxKind;
    use pretty_assertions::assert_eq;

    fn top_level_kinds(input: &str) -> Vec<SyntaxKind> {
        parse(input).children().map(|n| n.kind()).collect()
    }

    #[test]
    fn command_with_two_args() {
        let tree = parse("\\frac{1}{2}");
        let command = tree.children().next().unwrap();
        assert_eq!(command.kind(), SyntaxKind::COMMAND);

        let child_kinds: Vec<_> = command.children().map(|n| n.kind()).collect();
        assert_eq!(
            child_kinds,
            vec![
                SyntaxKind::COMMAND_NAME,
                SyntaxKind::COMMAND_ARGS,
                SyntaxKind::COMMAND_ARGS,
            ]
        );
    }

    #[test]
    fn command_with_optional_argument() {
        let tree = parse("\\sqrt[3]{8}");
        let command = tree.children().next().unwrap();
        let child_kinds: Vec<_> = command.children().map(|n| n.kind()).collect();
        assert_eq!(
            child_kinds,
            vec![
                SyntaxKind::COMMAND_NAME,
                SyntaxKind::COMMAND_OPTIONAL,
                SyntaxKind::COMMAND_ARGS,
            ]
        );
    }

    #[test]
    fn argument_attachment_stops_at_first_other_character() {
        // The space after `\frac{1}` detaches the following group.
        let tree = parse("\\frac{1} {2}");
        let kinds = top_level_kinds("\\frac{1} {2}");
        assert_eq!(kinds, vec![SyntaxKind::COMMAND, SyntaxKind::GROUP]);

        let command = tree.children().next().unwrap();
        assert_eq!(command.text().to_string(), "\\frac{1}");
    }

    #[test]
    fn bare_command_has_no_argument_children() {
        let tree = parse("\\alpha + x");
        let command = tree.children().next().unwrap();
        assert_eq!(command.kind(), SyntaxKind::COMMAND);
        assert_eq!(command.text().to_string(), "\\alpha");
        assert_eq!(command.children().count(), 1); // just the name
    }

    #[test]
    fn row_break_is_one_char_command() {
        let tree = parse("\\\\");
        let command = tree.children().next().unwrap();
        assert_eq!(command.kind(), SyntaxKind::COMMAND);
        let name = command.children().next().unwrap();
        assert_eq!(name.kind(), SyntaxKind::COMMAND_NAME);
        assert_eq!(name.text().to_string(), "\\");
    }

    #[test]
    fn row_break_takes_optional_argument() {
        let tree = parse("\\\\[2pt]");
        let command = tree.children().next().unwrap();
        let child_kinds: Vec<_> = command.children().map(|n| n.kind()).collect();
        assert_eq!(
            child_kinds,
            vec![SyntaxKind::COMMAND_NAME, SyntaxKind::COMMAND_OPTIONAL]
        );
    }

    #[test]
    fn escaped_brace_is_command_not_group() {
        let kinds = top_level_kinds("\\{x\\}");
        assert_eq!(
            kinds,
            vec![SyntaxKind::COMMAND, SyntaxKind::COMMAND]
        );
    }

    #[test]
    fn inline_math_region() {
        let tree = parse("a $x+y$ b");
        let math = tree
            .children()
            .find(|n| n.kind() == SyntaxKind::MATH)
            .unwrap();
        assert_eq!(math.text().to_string(), "$x+y$");
        assert_eq!(u32::from(math.text_range().start()), 2);
        assert_eq!(u32::from(math.text_range().end()), 7);
    }

    #[test]
    fn display_math_double_dollar() {
        let tree = parse("$$x^{2}$$");
        let math = tree.children().next().unwrap();
        assert_eq!(math.kind(), SyntaxKind::MATH);
        assert_eq!(math.text().to_string(), "$$x^{2}$$");
    }

    #[test]
    fn display_math_brackets() {
        let tree = parse("\\[ x \\]");
        let math = tree.children().next().unwrap();
        assert_eq!(math.kind(), SyntaxKind::MATH);
        assert_eq!(math.text().to_string(), "\\[ x \\]");
    }

    #[test]
    fn commands_nest_inside_math() {
        let tree = parse("$\\frac{1}{2}$");
        let math = tree.children().next().unwrap();
        assert_eq!(math.kind(), SyntaxKind::MATH);
        let command = math.children().next().unwrap();
        assert_eq!(command.kind(), SyntaxKind::COMMAND);
    }

    #[test]
    fn commands_nest_inside_arguments() {
        let tree = parse("\\frac{\\sqrt{2}}{3}");
        let outer = tree.children().next().unwrap();
        let first_arg = outer
            .children()
            .find(|n| n.kind() == SyntaxKind::COMMAND_ARGS)
            .unwrap();
        let inner = first_arg.children().next().unwrap();
        assert_eq!(inner.kind(), SyntaxKind::COMMAND);
        assert_eq!(inner.text().to_string(), "\\sqrt{2}");
    }

    #[test]
    fn unterminated_math_degrades_to_text() {
        let tree = parse("a $unclosed");
        assert_eq!(tree.children().count(), 0);
        assert_eq!(tree.text().to_string(), "a $unclosed");
    }

    #[test]
    fn unterminated_math_bounded_by_line() {
        // The `$` on line one never closes; the pair on line two does.
        let tree = parse("a $b\nc $d$ e");
        let math_nodes: Vec<_> = tree
            .children()
            .filter(|n| n.kind() == SyntaxKind::MATH)
            .collect();
        assert_eq!(math_nodes.len(), 1);
        assert_eq!(math_nodes[0].text().to_string(), "$d$");
    }

    #[test]
    fn unterminated_group_degrades_to_text() {
        let tree = parse("\\frac{no close");
        let command = tree.children().next().unwrap();
        // The brace never closes, so no argument attaches.
        assert_eq!(command.text().to_string(), "\\frac");
        assert_eq!(tree.text().to_string(), "\\frac{no close");
    }

    #[test]
    fn stray_closing_brace_is_plain_text() {
        let tree = parse("}x{y}");
        let kinds: Vec<_> = tree.children().map(|n| n.kind()).collect();
        assert_eq!(kinds, vec![SyntaxKind::GROUP]);
        assert_eq!(tree.text().to_string(), "}x{y}");
    }

    #[test]
    fn nested_groups_match_by_depth() {
        let tree = parse("{a{b}c}");
        let outer = tree.children().next().unwrap();
        assert_eq!(outer.kind(), SyntaxKind::GROUP);
        assert_eq!(outer.text().to_string(), "{a{b}c}");
        let inner = outer.children().next().unwrap();
        assert_eq!(inner.kind(), SyntaxKind::GROUP);
        assert_eq!(inner.text().to_string(), "{b}");
    }

    #[test]
    fn deep_nesting_does_not_overflow() {
        let depth = 10_000;
        let input = format!("{}x{}", "{".repeat(depth), "}".repeat(depth));
        let tree = parse(&input);
        assert_eq!(tree.text().to_string(), input);
    }

    #[test]
    fn matrix_environment_parses_cleanly() {
        let tree = parse("\\begin{bmatrix}1 & 2\\end{bmatrix}");
        let commands: Vec<_> = tree
            .children()
            .filter(|n| n.kind() == SyntaxKind::COMMAND)
            .collect();
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[0].text().to_string(), "\\begin{bmatrix}");
        assert_eq!(commands[1].text().to_string(), "\\end{bmatrix}");
    }

    #[test]
    fn parse_is_pure() {
        let input = "\\frac{1}{2} $x$ {g}";
        let a = format!("{:#?}", parse(input));
        let b = format!("{:#?}", parse(input));
        assert_eq!(a, b);
    }
}
