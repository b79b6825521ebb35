use std::fmt;

use serde::{Deserialize, Serialize};

use crate::isa::{Field, Opcode, Register, Target, Word, OPCODE_SHIFT, OPERAND1_SHIFT, OPERAND2_SHIFT};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum Operand {
    /// `r0`
    Register(Register),
    /// `*r0`
    Indirect(Register),
    /// `5`, carried in a trailing word
    Immediate(Word),
    /// `*5`, load from the address carried in a trailing word
    Deref(Word),
}

impl Operand {
    pub fn field(self) -> Field {
        match self {
            Operand::Register(reg) => Field { target: Target::Register(reg), deref: false },
            Operand::Indirect(reg) => Field { target: Target::Register(reg), deref: true },
            Operand::Immediate(_) => Field { target: Target::Immediate, deref: false },
            Operand::Deref(_) => Field { target: Target::Immediate, deref: true },
        }
    }

    /// The trailing word this operand contributes to the encoding, if any.
    pub fn immediate(self) -> Option<Word> {
        match self {
            Operand::Immediate(v) | Operand::Deref(v) => Some(v),
            Operand::Register(_) | Operand::Indirect(_) => None,
        }
    }

    /// Rebuild an operand from a decoded field and the word that followed it.
    pub fn from_field(field: Field, value: Option<Word>) -> Option<Self> {
        match (field.target, field.deref) {
            (Target::Register(reg), false) => Some(Operand::Register(reg)),
            (Target::Register(reg), true) => Some(Operand::Indirect(reg)),
            (Target::Immediate, false) => value.map(Operand::Immediate),
            (Target::Immediate, true) => value.map(Operand::Deref),
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Register(reg) => f.write_str(reg.name()),
            Operand::Indirect(reg) => write!(f, "*{}", reg.name()),
            Operand::Immediate(v) => write!(f, "{v:#06x}"),
            Operand::Deref(v) => write!(f, "*{v:#06x}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instruction {
    pub op: Opcode,
    pub dst: Operand,
    pub src: Operand,
}

impl Instruction {
    pub fn new(op: Opcode, dst: Operand, src: Operand) -> Self {
        Self { op, dst, src }
    }

    /// The instruction word alone, without trailing immediates.
    pub fn word(&self) -> Word {
        ((self.op.index() as Word) << OPCODE_SHIFT)
            | ((self.dst.field().bits() as Word) << OPERAND1_SHIFT)
            | ((self.src.field().bits() as Word) << OPERAND2_SHIFT)
    }

    /// Number of words `encode` emits: the instruction word plus one per immediate.
    pub fn width(&self) -> usize {
        1 + self.immediates().count()
    }

    pub fn encode(&self) -> Vec<Word> {
        let mut out = Vec::with_capacity(3);
        out.push(self.word());
        out.extend(self.immediates());
        out
    }

    fn immediates(&self) -> impl Iterator<Item = Word> {
        self.dst.immediate().into_iter().chain(self.src.immediate())
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.op.mnemonic(), self.dst, self.src)
    }
}
