//! The textual wire format shared by the assembler, the disassembler and the
//! runtime: decimal words separated by whitespace, no header.

use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::WordError;
use crate::isa::{RawWord, Word};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Program(Vec<Word>);

impl Program {
    pub fn new(words: Vec<Word>) -> Self {
        Self(words)
    }

    pub fn words(&self) -> &[Word] {
        &self.0
    }

    pub fn into_words(self) -> Vec<Word> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Write the wire text. The file is only created once the program exists.
    pub fn store(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_string()).with_context(|| format!("writing {}", path.display()))
    }
}

impl From<Vec<Word>> for Program {
    fn from(words: Vec<Word>) -> Self {
        Self(words)
    }
}

/// Single spaces between words, no trailing newline.
impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, word) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{word}")?;
        }
        Ok(())
    }
}

/// Read whitespace-separated decimal integers. Values outside the `Word`
/// range are kept; the disassembler lists them as raw data.
pub fn parse_words(text: &str) -> Result<Vec<RawWord>, WordError> {
    text.split_whitespace()
        .enumerate()
        .map(|(index, token)| {
            token
                .parse::<RawWord>()
                .map_err(|_| WordError::Invalid { index, token: token.to_owned() })
        })
        .collect()
}

pub fn load_words(path: &Path) -> Result<Vec<RawWord>> {
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    parse_words(&text).with_context(|| format!("parsing {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_space_separated_decimal() {
        assert_eq!(Program::new(vec![7, 5, 257]).to_string(), "7 5 257");
        assert_eq!(Program::default().to_string(), "");
    }

    #[test]
    fn parse_accepts_any_whitespace() {
        assert_eq!(parse_words(" 7\n5\t\t257 \n").unwrap(), vec![7, 5, 257]);
        assert!(parse_words("").unwrap().is_empty());
    }

    #[test]
    fn parse_reports_bad_token_position() {
        assert_eq!(parse_words("1 2 0x3").unwrap_err(), WordError::Invalid { index: 2, token: "0x3".into() });
        assert_eq!(parse_words("7 r0").unwrap_err(), WordError::Invalid { index: 1, token: "r0".into() });
    }

    #[test]
    fn parse_keeps_values_outside_word_range() {
        assert_eq!(parse_words("7 70000 5").unwrap(), vec![7, 70000, 5]);
        assert_eq!(parse_words("-1 65536").unwrap(), vec![-1, 65536]);
    }

    #[test]
    fn store_then_load() {
        let path = std::env::temp_dir().join(format!("pixie_program_{}.txt", std::process::id()));
        let program = Program::new(vec![0x0F7F, 1, 0x20]);
        program.store(&path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "3967 1 32");
        let widened: Vec<RawWord> = program.words().iter().map(|&w| w.into()).collect();
        assert_eq!(load_words(&path).unwrap(), widened);
        let _ = std::fs::remove_file(&path);
    }
}
