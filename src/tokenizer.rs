//! Line splitting and token classification for pixie source text.
//!
//! The grammar is line oriented: a line is a label definition (`loop:`), a
//! data line (`10 0x20 :table`), or an instruction (`add r0 *sp`). Only
//! full-line `#` comments exist.

use std::num::IntErrorKind;

use crate::isa::Word;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// 1-based line number in the source text.
    pub number: usize,
    pub tokens: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    LabelDef,
    Data,
    Instruction,
}

impl Line {
    pub fn kind(&self) -> LineKind {
        // tokenize never yields an empty line
        let first = self.tokens.first().map(String::as_str).unwrap_or_default();
        if first.ends_with(':') {
            LineKind::LabelDef
        } else if is_numeric(first) || is_label_ref(first) {
            LineKind::Data
        } else {
            LineKind::Instruction
        }
    }

    pub fn text(&self) -> String {
        self.tokens.join(" ")
    }
}

pub fn tokenize(source: &str) -> Vec<Line> {
    source
        .lines()
        .enumerate()
        .filter_map(|(i, raw)| {
            let trimmed = raw.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                return None;
            }
            let tokens = trimmed.split_whitespace().map(str::to_owned).collect();
            Some(Line { number: i + 1, tokens })
        })
        .collect()
}

/// Split off a single leading dereference marker.
pub fn strip_deref(token: &str) -> (bool, &str) {
    match token.strip_prefix('*') {
        Some(rest) => (true, rest),
        None => (false, token),
    }
}

/// A token is numeric when, ignoring one `*`, it starts with a decimal digit.
pub fn is_numeric(token: &str) -> bool {
    let (_, body) = strip_deref(token);
    body.chars().next().is_some_and(|c| c.is_ascii_digit())
}

/// `:name` refers to the label defined by `name:`.
pub fn is_label_ref(token: &str) -> bool {
    token.starts_with(':')
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralError {
    Invalid,
    OutOfRange,
}

/// Parse a literal without its dereference marker.
///
/// The radix comes from the token content, not a prefix grammar: any `x`
/// selects base 16, otherwise any `b` selects base 2, otherwise base 10.
/// `0x`/`0b` prefixes are accepted and stripped. `12b` is therefore an
/// invalid binary literal rather than a decimal with garbage after it.
pub fn parse_literal(token: &str) -> Result<Word, LiteralError> {
    let (radix, digits) = if token.contains('x') {
        (16, token.strip_prefix("0x").unwrap_or(token))
    } else if token.contains('b') {
        (2, token.strip_prefix("0b").unwrap_or(token))
    } else {
        (10, token)
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(LiteralError::Invalid);
    }
    Word::from_str_radix(digits, radix).map_err(|e| match e.kind() {
        IntErrorKind::PosOverflow => LiteralError::OutOfRange,
        _ => LiteralError::Invalid,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_blank_and_comment_lines() {
        let src = "# header\n\n   \n  # indented comment\nmov r0 5\n\tadd   r0\tr1  \n";
        let lines = tokenize(src);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].number, 5);
        assert_eq!(lines[0].tokens, vec!["mov", "r0", "5"]);
        assert_eq!(lines[1].number, 6);
        assert_eq!(lines[1].text(), "add r0 r1");
    }

    #[test]
    fn trailing_hash_is_not_a_comment() {
        let lines = tokenize("mov r0 r1 # nope");
        assert_eq!(lines[0].tokens.len(), 5);
    }

    #[test]
    fn classifies_lines() {
        let kinds: Vec<_> = tokenize("loop:\n10 20\n:loop 3\n*7\njnz r0 :loop\n")
            .iter()
            .map(Line::kind)
            .collect();
        assert_eq!(
            kinds,
            vec![LineKind::LabelDef, LineKind::Data, LineKind::Data, LineKind::Data, LineKind::Instruction]
        );
    }

    #[test]
    fn numeric_ignores_one_deref() {
        assert!(is_numeric("5"));
        assert!(is_numeric("*0x10"));
        assert!(!is_numeric("**5"));
        assert!(!is_numeric("r0"));
        assert!(!is_numeric(":end"));
        assert!(!is_numeric(""));
    }

    #[test]
    fn literal_radix_follows_content() {
        assert_eq!(parse_literal("42"), Ok(42));
        assert_eq!(parse_literal("0x2A"), Ok(42));
        assert_eq!(parse_literal("2a"), Err(LiteralError::Invalid));
        assert_eq!(parse_literal("0b101010"), Ok(42));
        assert_eq!(parse_literal("101010b"), Err(LiteralError::Invalid));
        assert_eq!(parse_literal("0xb"), Ok(11));
        assert_eq!(parse_literal("65535"), Ok(0xFFFF));
        assert_eq!(parse_literal("65536"), Err(LiteralError::OutOfRange));
        assert_eq!(parse_literal("0x10000"), Err(LiteralError::OutOfRange));
    }

    // Content-based radix means a stray letter changes the base of the whole
    // token; these stay invalid instead of silently parsing as decimal.
    #[test]
    fn stray_radix_letters_misparse() {
        assert_eq!(parse_literal("1x2"), Err(LiteralError::Invalid));
        assert_eq!(parse_literal("0X1F"), Err(LiteralError::Invalid));
        assert_eq!(parse_literal("12b"), Err(LiteralError::Invalid));
        assert_eq!(parse_literal("0x+5"), Err(LiteralError::Invalid));
    }
}
