//! Best-effort listing of a word stream.
//!
//! The format carries no code/data discriminant, so the listing walks the
//! stream linearly: each step consumes one instruction with its immediates,
//! or one undecodable word rendered as raw data, and resumes right after it.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::decoder::{Decoded, Decoder, Item, PixieDecoder, Slot};
use crate::isa::RawWord;
use crate::labels::LabelTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingConfig {
    /// Append the consumed words after a `|` on each line.
    pub show_raw: bool,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self { show_raw: true }
    }
}

/// Iterator over the decoded items of a word stream.
pub struct Disassembly<'a, D = PixieDecoder> {
    words: &'a [RawWord],
    offset: usize,
    decoder: D,
}

impl<'a> Disassembly<'a> {
    pub fn new(words: &'a [RawWord]) -> Self {
        Self::with_decoder(words, PixieDecoder::new())
    }
}

impl<'a, D: Decoder> Disassembly<'a, D> {
    pub fn with_decoder(words: &'a [RawWord], decoder: D) -> Self {
        Self { words, offset: 0, decoder }
    }
}

impl<D: Decoder> Iterator for Disassembly<'_, D> {
    type Item = Decoded;

    fn next(&mut self) -> Option<Decoded> {
        let d = self.decoder.decode(self.words, self.offset)?;
        self.offset += d.width();
        Some(d)
    }
}

fn widen<W: Copy + Into<RawWord>>(words: &[W]) -> Vec<RawWord> {
    words.iter().map(|&w| w.into()).collect()
}

/// Decode a whole stream. Accepts assembled `Word`s as well as raw values
/// read from text.
pub fn disassemble<W: Copy + Into<RawWord>>(words: &[W]) -> Vec<Decoded> {
    Disassembly::new(&widen(words)).collect()
}

// `{:#06x}` with the sign kept in front for negative input.
fn fmt_hex(value: RawWord) -> String {
    if value < 0 {
        format!("-{:#06x}", value.unsigned_abs())
    } else {
        format!("{value:#06x}")
    }
}

fn fmt_slot(slot: &Slot) -> String {
    match slot {
        Slot::Known(op) => op.to_string(),
        Slot::Missing { deref: false } => "value?".to_string(),
        Slot::Missing { deref: true } => "*value?".to_string(),
    }
}

/// One listing line: `0x0000: mov     r0 0x0005 | 0x0007 0x0005`.
pub fn fmt_decoded(d: &Decoded, cfg: &ListingConfig) -> String {
    let (mnemonic, dst, src) = match &d.item {
        Item::Instruction { op, dst, src } => (op.mnemonic().to_string(), fmt_slot(dst), fmt_slot(src)),
        Item::Data(value) => ("raw".to_string(), "data: ".to_string(), fmt_hex(*value)),
    };
    let mut line = format!("{:#06x}: {mnemonic:>3} {dst:>6} {src:>6}", d.offset);
    if cfg.show_raw {
        line.push_str(" |");
        for w in &d.raw {
            let _ = write!(line, " {}", fmt_hex(*w));
        }
    }
    line
}

/// Full listing, one line per item. Offsets bound in `labels` get a
/// `0x0004 <name>:` header line ahead of the item covering that offset, so a
/// label on a word consumed as an immediate is still shown.
pub fn listing<W: Copy + Into<RawWord>>(
    words: &[W],
    labels: Option<&LabelTable>,
    cfg: &ListingConfig,
) -> String {
    let words = widen(words);
    let mut out = String::new();
    for d in Disassembly::new(&words) {
        if let Some(labels) = labels {
            for at in d.offset..d.offset + d.width() {
                for name in labels.names_at(at) {
                    let _ = writeln!(out, "{at:#06x} <{name}>:");
                }
            }
        }
        let _ = writeln!(out, "{}", fmt_decoded(&d, cfg));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_instruction_line() {
        let d = &disassemble(&[0x0007, 5])[0];
        assert_eq!(fmt_decoded(d, &ListingConfig::default()), "0x0000: mov     r0 0x0005 | 0x0007 0x0005");
        assert_eq!(fmt_decoded(d, &ListingConfig { show_raw: false }), "0x0000: mov     r0 0x0005");
    }

    #[test]
    fn renders_raw_data_line() {
        let d = &disassemble(&[0x1234])[0];
        assert_eq!(fmt_decoded(d, &ListingConfig::default()), "0x0000: raw data:  0x1234 | 0x1234");
    }

    #[test]
    fn renders_missing_immediate() {
        let d = &disassemble(&[0x0D07])[0];
        assert_eq!(fmt_decoded(d, &ListingConfig::default()), "0x0000: jnz     r0 value? | 0x0d07");
        let d = &disassemble(&[0x00F8])[0];
        assert_eq!(fmt_decoded(d, &ListingConfig::default()), "0x0000: mov *value?    *r0 | 0x00f8");
    }

    #[test]
    fn empty_stream_lists_nothing() {
        assert!(disassemble::<RawWord>(&[]).is_empty());
        assert_eq!(listing::<RawWord>(&[], None, &ListingConfig::default()), "");
    }

    #[test]
    fn renders_values_outside_word_range() {
        let cfg = ListingConfig::default();
        let text = listing(&[7i64, 70000, 5], None, &cfg);
        assert_eq!(
            text,
            "0x0000: mov     r0 value? | 0x0007\n\
             0x0001: raw data:  0x11170 | 0x11170\n\
             0x0002: mov     r0     sp | 0x0005\n"
        );
        let d = &disassemble(&[-1i64])[0];
        assert_eq!(fmt_decoded(d, &cfg), "0x0000: raw data:  -0x0001 | -0x0001");
    }
}
