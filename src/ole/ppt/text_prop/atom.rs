//! StyleTextPropAtom and MasterTextPropAtom payload codecs.
//!
//! A StyleTextPropAtom cannot be decoded on its own: the paragraph and
//! character tables each run until they cover the text length plus one
//! (the implicit terminator), so the caller supplies the text length.

use super::collection::{StyleCollection, TextPropCollection};
use super::defs::TextPropType;
use crate::common::binary::{read_u16_le, read_u32_le};
use crate::ole::ppt::error::{PptError, Result};

/// Decoded StyleTextPropAtom.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleTextPropAtom {
    /// Paragraph style entries
    pub paragraph_styles: StyleCollection,
    /// Character style entries
    pub character_styles: StyleCollection,
    /// Bytes after the character table, preserved as read
    pub reserved: Vec<u8>,
}

impl StyleTextPropAtom {
    /// Parse a payload describing `text_len` UTF-16 code units.
    pub fn parse(data: &[u8], text_len: usize) -> Result<Self> {
        Self::parse_at(data, text_len, 0)
    }

    /// Like [`parse`](Self::parse), reporting errors relative to `base`, the
    /// payload position in the source stream.
    pub fn parse_at(data: &[u8], text_len: usize, base: usize) -> Result<Self> {
        let size = text_len as u64 + 1;
        let mut pos = 0usize;

        let mut paragraphs = Vec::new();
        let mut handled = 0u64;
        while pos < data.len() && handled < size {
            let count = read_u32_le(data, pos)
                .map_err(|_| PptError::corrupt(base + pos, "truncated paragraph style count"))?;
            let indent = read_u16_le(data, pos + 4)
                .map_err(|_| PptError::corrupt(base + pos + 4, "truncated paragraph indent"))?;
            let mask = read_u32_le(data, pos + 6)
                .map_err(|_| PptError::corrupt(base + pos + 6, "truncated paragraph mask"))?;
            pos += 10;

            let mut entry = TextPropCollection::parse_props(
                TextPropType::Paragraph,
                count,
                mask,
                data,
                &mut pos,
                base,
            )?;
            entry.indent_level = indent;
            paragraphs.push(entry);
            handled += u64::from(count);
        }

        let mut characters = Vec::new();
        handled = 0;
        while pos < data.len() && handled < size {
            let count = read_u32_le(data, pos)
                .map_err(|_| PptError::corrupt(base + pos, "truncated character style count"))?;
            let mask = read_u32_le(data, pos + 4)
                .map_err(|_| PptError::corrupt(base + pos + 4, "truncated character mask"))?;
            pos += 8;

            let entry = TextPropCollection::parse_props(
                TextPropType::Character,
                count,
                mask,
                data,
                &mut pos,
                base,
            )?;
            characters.push(entry);
            handled += u64::from(count);
        }

        let reserved = data[pos..].to_vec();
        log::debug!(
            "StyleTextPropAtom: {} paragraph entries, {} character entries, {} reserved bytes",
            paragraphs.len(),
            characters.len(),
            reserved.len()
        );

        Ok(Self {
            paragraph_styles: StyleCollection::new(paragraphs),
            character_styles: StyleCollection::new(characters),
            reserved,
        })
    }

    /// Serialize the payload.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for entry in self.paragraph_styles.entries() {
            out.extend_from_slice(&entry.characters_covered.to_le_bytes());
            out.extend_from_slice(&entry.indent_level.to_le_bytes());
            entry.write_props(&mut out);
        }
        for entry in self.character_styles.entries() {
            out.extend_from_slice(&entry.characters_covered.to_le_bytes());
            entry.write_props(&mut out);
        }
        out.extend_from_slice(&self.reserved);
        out
    }
}

/// Indent level applying to a range of characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndentRun {
    pub characters_covered: u32,
    pub indent_level: u16,
}

/// Decoded MasterTextPropAtom: indent levels overriding the paragraph styles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MasterTextPropAtom {
    pub runs: Vec<IndentRun>,
}

impl MasterTextPropAtom {
    const ENTRY_SIZE: usize = 6;

    pub fn parse(data: &[u8]) -> Result<Self> {
        Self::parse_at(data, 0)
    }

    /// Parse with error offsets relative to `base`.
    pub fn parse_at(data: &[u8], base: usize) -> Result<Self> {
        if data.len() % Self::ENTRY_SIZE != 0 {
            return Err(PptError::corrupt(
                base + data.len() - data.len() % Self::ENTRY_SIZE,
                format!("MasterTextPropAtom payload of {} bytes", data.len()),
            ));
        }
        let mut runs = Vec::with_capacity(data.len() / Self::ENTRY_SIZE);
        for pos in (0..data.len()).step_by(Self::ENTRY_SIZE) {
            let truncated = |_| PptError::corrupt(base + pos, "truncated indent run");
            runs.push(IndentRun {
                characters_covered: read_u32_le(data, pos).map_err(truncated)?,
                indent_level: read_u16_le(data, pos + 4).map_err(truncated)?,
            });
        }
        Ok(Self { runs })
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.runs.len() * Self::ENTRY_SIZE);
        for run in &self.runs {
            out.extend_from_slice(&run.characters_covered.to_le_bytes());
            out.extend_from_slice(&run.indent_level.to_le_bytes());
        }
        out
    }

    /// Append a run, folding it into the previous one on equal indent.
    pub fn push_merged(&mut self, run: IndentRun) {
        match self.runs.last_mut() {
            Some(last) if last.indent_level == run.indent_level => {
                last.characters_covered =
                    last.characters_covered.saturating_add(run.characters_covered)
            },
            _ => self.runs.push(run),
        }
    }
}
