use thiserror::Error;

/// Fatal assembler diagnostics. Line numbers are 1-based source lines.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AsmError {
    #[error("line {line}: unknown mnemonic `{token}`")]
    UnknownMnemonic { line: usize, token: String },
    #[error("line {line}: unknown operand `{token}`")]
    UnknownOperand { line: usize, token: String },
    #[error("line {line}: undefined label `{label}`")]
    UndefinedLabel { line: usize, label: String },
    #[error("line {line}: malformed line `{text}`: {reason}")]
    MalformedLine { line: usize, text: String, reason: &'static str },
    #[error("line {line}: label `{label}` already defined on line {first}")]
    DuplicateLabel { line: usize, label: String, first: usize },
    #[error("line {line}: literal `{token}` does not fit in a 16-bit word")]
    LiteralOutOfRange { line: usize, token: String },
    #[error("line {line}: label `{label}` lands at offset {offset:#x}, past the last addressable word")]
    LabelOutOfRange { line: usize, label: String, offset: usize },
}

impl AsmError {
    pub fn line(&self) -> usize {
        match self {
            AsmError::UnknownMnemonic { line, .. }
            | AsmError::UnknownOperand { line, .. }
            | AsmError::UndefinedLabel { line, .. }
            | AsmError::MalformedLine { line, .. }
            | AsmError::DuplicateLabel { line, .. }
            | AsmError::LiteralOutOfRange { line, .. }
            | AsmError::LabelOutOfRange { line, .. } => *line,
        }
    }
}

/// Failure to read a textual word stream.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WordError {
    #[error("word {index}: `{token}` is not a decimal integer")]
    Invalid { index: usize, token: String },
}
