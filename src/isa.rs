//! Pixie instruction set tables.
//!
//! An instruction word is laid out as `oooo_oooo aaaa bbbb`: the high byte
//! selects the opcode, the two low nibbles are operand fields. Each field is
//! `d sss` where `d` marks a dereference and `sss` is a register slot, with
//! slot 7 meaning "an immediate word follows".

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// One memory cell of the runtime, and one unit of a program.
pub type Word = u16;

/// A word as read from text, before it is known to fit in a [`Word`].
pub type RawWord = i64;

pub const OPCODE_SHIFT: u32 = 8;
pub const OPERAND1_SHIFT: u32 = 4;
pub const OPERAND2_SHIFT: u32 = 0;

/// Slot value that marks an operand as a trailing immediate.
pub const IMMEDIATE_SLOT: u8 = 0b0111;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Opcode {
    Mov,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Not,
    And,
    Or,
    Xor,
    Eq,
    Le,
    Leq,
    Jnz,
    In,
    Out,
}

impl Opcode {
    pub const ALL: [Opcode; 16] = [
        Opcode::Mov,
        Opcode::Add,
        Opcode::Sub,
        Opcode::Mul,
        Opcode::Div,
        Opcode::Rem,
        Opcode::Not,
        Opcode::And,
        Opcode::Or,
        Opcode::Xor,
        Opcode::Eq,
        Opcode::Le,
        Opcode::Leq,
        Opcode::Jnz,
        Opcode::In,
        Opcode::Out,
    ];

    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Mov => "mov",
            Opcode::Add => "add",
            Opcode::Sub => "sub",
            Opcode::Mul => "mul",
            Opcode::Div => "div",
            Opcode::Rem => "rem",
            Opcode::Not => "not",
            Opcode::And => "and",
            Opcode::Or => "or",
            Opcode::Xor => "xor",
            Opcode::Eq => "eq",
            Opcode::Le => "le",
            Opcode::Leq => "leq",
            Opcode::Jnz => "jnz",
            Opcode::In => "in",
            Opcode::Out => "out",
        }
    }

    /// Mnemonics are case sensitive, as the runtime's toolchain always was.
    pub fn from_mnemonic(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|op| op.mnemonic() == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Register {
    R0,
    R1,
    R2,
    R3,
    Sb, // stack base
    Sp, // stack pointer
    Pc,
}

impl Register {
    pub const ALL: [Register; 7] = [
        Register::R0,
        Register::R1,
        Register::R2,
        Register::R3,
        Register::Sb,
        Register::Sp,
        Register::Pc,
    ];

    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Register::R0 => "r0",
            Register::R1 => "r1",
            Register::R2 => "r2",
            Register::R3 => "r3",
            Register::Sb => "sb",
            Register::Sp => "sp",
            Register::Pc => "pc",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|r| r.name() == name)
    }
}

pub fn opcode_index(name: &str) -> Option<u8> {
    Opcode::from_mnemonic(name).map(Opcode::index)
}

pub fn register_index(name: &str) -> Option<u8> {
    Register::from_name(name).map(Register::index)
}

pub fn opcode_name(index: u8) -> Option<&'static str> {
    Opcode::from_index(index).map(Opcode::mnemonic)
}

pub fn register_name(index: u8) -> Option<&'static str> {
    Register::from_index(index).map(Register::name)
}

bitflags! {
    /// Raw 4-bit operand field.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct FieldBits: u8 {
        const DEREF = 0b1000;
        const SLOT = 0b0111;
    }
}

/// What an operand field refers to, before any immediate word is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Target {
    Register(Register),
    Immediate,
}

/// A decoded operand field. Total over all 16 nibble values: 7 registers plus
/// the immediate marker, each plain or dereferenced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Field {
    pub target: Target,
    pub deref: bool,
}

impl Field {
    pub fn from_bits(nibble: u8) -> Self {
        let bits = FieldBits::from_bits_truncate(nibble);
        let slot = (bits & FieldBits::SLOT).bits();
        let target = match Register::from_index(slot) {
            Some(reg) => Target::Register(reg),
            None => Target::Immediate,
        };
        Self { target, deref: bits.contains(FieldBits::DEREF) }
    }

    pub fn bits(self) -> u8 {
        let slot = match self.target {
            Target::Register(reg) => reg.index(),
            Target::Immediate => IMMEDIATE_SLOT,
        };
        let mut bits = FieldBits::from_bits_truncate(slot);
        bits.set(FieldBits::DEREF, self.deref);
        bits.bits()
    }

    pub fn is_immediate(self) -> bool {
        self.target == Target::Immediate
    }
}
