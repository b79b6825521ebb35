use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::instructions::Operand;
use crate::isa::{Field, Opcode, RawWord, Word, OPCODE_SHIFT, OPERAND1_SHIFT, OPERAND2_SHIFT};

/// A decoded operand. An immediate whose word lies past the end of the
/// stream is `Missing` rather than an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    Known(Operand),
    Missing { deref: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Item {
    Instruction { op: Opcode, dst: Slot, src: Slot },
    /// A word whose high byte names no opcode, or a value that is not a
    /// word at all (negative or above 0xFFFF).
    Data(RawWord),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decoded {
    /// Word offset of the first consumed word.
    pub offset: usize,
    pub item: Item,
    /// Every word this item consumed, instruction word first.
    pub raw: Vec<RawWord>,
}

impl Decoded {
    /// Number of words consumed, 1 to 3.
    pub fn width(&self) -> usize {
        self.raw.len()
    }
}

pub trait Decoder {
    /// Decode the item starting at `offset`, or `None` past the end.
    fn decode(&self, words: &[RawWord], offset: usize) -> Option<Decoded>;
}

/// Decoder for pixie words. Makes no attempt to tell code from data: any
/// word with a valid opcode byte is an instruction.
#[derive(Debug, Clone, Copy, Default)]
pub struct PixieDecoder;

impl PixieDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl Decoder for PixieDecoder {
    fn decode(&self, words: &[RawWord], offset: usize) -> Option<Decoded> {
        let value = *words.get(offset)?;
        let mut raw = vec![value];

        let op = Word::try_from(value)
            .ok()
            .and_then(|word| Opcode::from_index(((word >> OPCODE_SHIFT) & 0xFF) as u8).map(|op| (op, word)));
        let Some((op, word)) = op else {
            trace!(offset, value, "no opcode, treating as data");
            return Some(Decoded { offset, item: Item::Data(value), raw });
        };

        let dst = operand(words, offset, &mut raw, ((word >> OPERAND1_SHIFT) & 0xF) as u8);
        let src = operand(words, offset, &mut raw, ((word >> OPERAND2_SHIFT) & 0xF) as u8);
        Some(Decoded { offset, item: Item::Instruction { op, dst, src }, raw })
    }
}

// Immediates are taken from the word after the last one consumed so far. A
// following value outside the word range is left unconsumed and is listed
// as data on its own.
fn operand(words: &[RawWord], offset: usize, raw: &mut Vec<RawWord>, nibble: u8) -> Slot {
    let field = Field::from_bits(nibble);
    let value = if field.is_immediate() {
        let next = words.get(offset + raw.len()).copied();
        match next.and_then(|v| Word::try_from(v).ok()) {
            Some(v) => {
                raw.push(v.into());
                Some(v)
            }
            None => return Slot::Missing { deref: field.deref },
        }
    } else {
        None
    };
    match Operand::from_field(field, value) {
        Some(op) => Slot::Known(op),
        None => Slot::Missing { deref: field.deref },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::isa::Register;

    #[test]
    fn decodes_register_form() {
        let d = PixieDecoder::new().decode(&[0x0101], 0).unwrap();
        assert_eq!(
            d.item,
            Item::Instruction {
                op: Opcode::Add,
                dst: Slot::Known(Operand::Register(Register::R0)),
                src: Slot::Known(Operand::Register(Register::R1)),
            }
        );
        assert_eq!(d.width(), 1);
    }

    #[test]
    fn opcode_byte_above_fifteen_is_data() {
        let d = PixieDecoder::new().decode(&[0x1000, 0x0007], 0).unwrap();
        assert_eq!(d.item, Item::Data(0x1000));
        assert_eq!(d.raw, vec![0x1000]);
    }

    #[test]
    fn second_immediate_follows_first() {
        let d = PixieDecoder::new().decode(&[9, 0x0F7F, 1, 0x20, 4], 1).unwrap();
        assert_eq!(d.offset, 1);
        assert_eq!(d.raw, vec![0x0F7F, 1, 0x20]);
        assert_eq!(
            d.item,
            Item::Instruction {
                op: Opcode::Out,
                dst: Slot::Known(Operand::Immediate(1)),
                src: Slot::Known(Operand::Deref(0x20)),
            }
        );
    }

    #[test]
    fn exhausted_stream_leaves_missing_slots() {
        let d = PixieDecoder::new().decode(&[0x0F7F, 1], 0).unwrap();
        assert_eq!(d.raw, vec![0x0F7F, 1]);
        assert!(matches!(d.item, Item::Instruction { src: Slot::Missing { deref: true }, .. }));
        assert!(PixieDecoder::new().decode(&[0x0F7F], 1).is_none());
    }

    #[test]
    fn out_of_range_values_are_data() {
        let dec = PixieDecoder::new();
        assert_eq!(dec.decode(&[70000], 0).unwrap().item, Item::Data(70000));
        assert_eq!(dec.decode(&[-1], 0).unwrap().item, Item::Data(-1));

        // an immediate slot does not swallow a value that is not a word
        let d = dec.decode(&[0x0007, 70000], 0).unwrap();
        assert_eq!(d.raw, vec![0x0007]);
        assert!(matches!(d.item, Item::Instruction { src: Slot::Missing { deref: false }, .. }));
    }
}
