//! Source text to [`Program`].
//!
//! Nothing is written until the whole source has been resolved and encoded;
//! any error aborts the run.

use tracing::{debug, trace};

use crate::encoder::encode_line;
use crate::error::AsmError;
use crate::labels::{first_pass, predicted_len, substitute, LabelTable};
use crate::program::Program;
use crate::tokenizer::tokenize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assembly {
    pub program: Program,
    pub labels: LabelTable,
}

pub fn assemble(source: &str) -> Result<Assembly, AsmError> {
    let lines = tokenize(source);
    let (labels, total) = first_pass(&lines)?;
    let resolved = substitute(&lines, &labels)?;

    let mut words = Vec::with_capacity(total);
    for line in &resolved {
        let encoded = encode_line(line)?;
        // label offsets are only right if pass one predicted every line exactly
        debug_assert_eq!(encoded.len(), predicted_len(line), "line {}", line.number);
        trace!(line = line.number, words = ?encoded, "encoded");
        words.extend(encoded);
    }
    debug!(lines = lines.len(), labels = labels.len(), words = words.len(), "assembled");

    Ok(Assembly { program: Program::new(words), labels })
}

pub fn assemble_program(source: &str) -> Result<Program, AsmError> {
    assemble(source).map(|a| a.program)
}
