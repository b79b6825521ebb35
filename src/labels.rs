//! Two-pass label resolution.
//!
//! Pass one walks the token lines with an explicit word-offset accumulator and
//! binds each `name:` to the offset of the next emitted word. Pass two drops
//! the definitions and rewrites every `:name` (or `*:name`) reference into the
//! bound offset, so forward references resolve like backward ones.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::AsmError;
use crate::isa::{Register, Word};
use crate::tokenizer::{is_label_ref, strip_deref, Line, LineKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    /// Word offset of the instruction or data following the definition.
    pub offset: usize,
    /// Source line of the definition.
    pub line: usize,
}

/// Label references (`:name`) mapped to their binding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelTable {
    labels: BTreeMap<String, Label>,
}

impl LabelTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a reference such as `:end`.
    pub fn get(&self, reference: &str) -> Option<&Label> {
        self.labels.get(reference)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Label)> {
        self.labels.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Bare label names (without the `:` prefix) at `offset`, in name order.
    pub fn names_at(&self, offset: usize) -> Vec<&str> {
        self.labels
            .iter()
            .filter(|(_, label)| label.offset == offset)
            .map(|(reference, _)| reference.trim_start_matches(':'))
            .collect()
    }

    fn bind(&mut self, reference: String, label: Label) -> Result<(), AsmError> {
        if let Some(first) = self.labels.get(&reference) {
            return Err(AsmError::DuplicateLabel { line: label.line, label: reference, first: first.line });
        }
        self.labels.insert(reference, label);
        Ok(())
    }
}

/// Words a non-label line will emit: one per data token, or the instruction
/// word plus one per operand that is not a register after dropping `*`.
pub fn predicted_len(line: &Line) -> usize {
    match line.kind() {
        LineKind::LabelDef => 0,
        LineKind::Data => line.tokens.len(),
        LineKind::Instruction => {
            let immediates = line
                .tokens
                .iter()
                .skip(1)
                .filter(|t| Register::from_name(strip_deref(t).1).is_none())
                .count();
            1 + immediates
        }
    }
}

/// Pass one. Returns the label table and the total program length in words.
pub fn first_pass(lines: &[Line]) -> Result<(LabelTable, usize), AsmError> {
    let mut table = LabelTable::new();
    let mut offset = 0usize;
    for line in lines {
        if line.kind() != LineKind::LabelDef {
            offset += predicted_len(line);
            continue;
        }
        if line.tokens.len() != 1 {
            return Err(AsmError::MalformedLine {
                line: line.number,
                text: line.text(),
                reason: "a label definition must be alone on its line",
            });
        }
        let name = line.tokens[0].trim_end_matches(':');
        if name.is_empty() {
            return Err(AsmError::MalformedLine { line: line.number, text: line.text(), reason: "empty label name" });
        }
        let reference = format!(":{name}");
        if offset > Word::MAX as usize {
            return Err(AsmError::LabelOutOfRange { line: line.number, label: reference, offset });
        }
        debug!(label = %reference, offset, line = line.number, "bound label");
        table.bind(reference, Label { offset, line: line.number })?;
    }
    Ok((table, offset))
}

/// Pass two. Drops label definitions and substitutes references.
pub fn substitute(lines: &[Line], table: &LabelTable) -> Result<Vec<Line>, AsmError> {
    lines
        .iter()
        .filter(|line| line.kind() != LineKind::LabelDef)
        .map(|line| {
            let tokens = line
                .tokens
                .iter()
                .map(|token| resolve_token(token, table, line.number))
                .collect::<Result<Vec<_>, _>>()?;
            Ok::<_, AsmError>(Line { number: line.number, tokens })
        })
        .collect()
}

fn resolve_token(token: &str, table: &LabelTable, line: usize) -> Result<String, AsmError> {
    let (deref, body) = strip_deref(token);
    if !is_label_ref(body) {
        return Ok(token.to_owned());
    }
    let label = table
        .get(body)
        .ok_or_else(|| AsmError::UndefinedLabel { line, label: body.to_owned() })?;
    Ok(if deref { format!("*{}", label.offset) } else { label.offset.to_string() })
}
