use crate::error::AsmError;
use crate::instructions::{Instruction, Operand};
use crate::isa::{Opcode, Register, Word};
use crate::tokenizer::{is_label_ref, is_numeric, parse_literal, strip_deref, Line, LineKind, LiteralError};

/// Encode one label-free line into the words it contributes to the program.
pub fn encode_line(line: &Line) -> Result<Vec<Word>, AsmError> {
    match line.kind() {
        LineKind::LabelDef => Ok(Vec::new()),
        LineKind::Data => line.tokens.iter().map(|t| data_word(line.number, t)).collect(),
        LineKind::Instruction => Ok(parse_instruction(line)?.encode()),
    }
}

pub fn parse_instruction(line: &Line) -> Result<Instruction, AsmError> {
    let mnemonic = line.tokens.first().map(String::as_str).unwrap_or_default();
    let op = Opcode::from_mnemonic(mnemonic)
        .ok_or_else(|| AsmError::UnknownMnemonic { line: line.number, token: mnemonic.to_owned() })?;
    let [_, dst, src] = line.tokens.as_slice() else {
        return Err(AsmError::MalformedLine {
            line: line.number,
            text: line.text(),
            reason: "expected an opcode followed by exactly two operands",
        });
    };
    Ok(Instruction::new(op, parse_operand(line.number, dst)?, parse_operand(line.number, src)?))
}

pub fn parse_operand(line: usize, token: &str) -> Result<Operand, AsmError> {
    let (deref, body) = strip_deref(token);
    if let Some(reg) = Register::from_name(body) {
        return Ok(if deref { Operand::Indirect(reg) } else { Operand::Register(reg) });
    }
    if is_label_ref(body) {
        return Err(AsmError::UndefinedLabel { line, label: body.to_owned() });
    }
    let value = literal(line, token, body)?;
    Ok(if deref { Operand::Deref(value) } else { Operand::Immediate(value) })
}

fn data_word(line: usize, token: &str) -> Result<Word, AsmError> {
    if token.starts_with('*') {
        return Err(AsmError::UnknownOperand { line, token: token.to_owned() });
    }
    literal(line, token, token)
}

fn literal(line: usize, token: &str, body: &str) -> Result<Word, AsmError> {
    if !is_numeric(body) {
        return Err(AsmError::UnknownOperand { line, token: token.to_owned() });
    }
    parse_literal(body).map_err(|e| match e {
        LiteralError::Invalid => AsmError::UnknownOperand { line, token: token.to_owned() },
        LiteralError::OutOfRange => AsmError::LiteralOutOfRange { line, token: token.to_owned() },
    })
}
