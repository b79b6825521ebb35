pub mod assembler;
pub mod decoder;
pub mod disasm;
pub mod encoder;
pub mod error;
pub mod instructions;
pub mod isa;
pub mod labels;
pub mod program;
pub mod tokenizer;

pub use assembler::{assemble, assemble_program, Assembly};
pub use decoder::{Decoded, Decoder, Item, PixieDecoder, Slot};
pub use disasm::{disassemble, fmt_decoded, listing, Disassembly, ListingConfig};
pub use error::{AsmError, WordError};
pub use instructions::{Instruction, Operand};
pub use isa::{Opcode, RawWord, Register, Word};
pub use labels::{Label, LabelTable};
pub use program::{load_words, parse_words, Program};
