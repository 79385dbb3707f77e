//! Text atom codec.
//!
//! A text block stores its characters either in a TextBytesAtom (one byte per
//! character, ISO-8859-1) or in a TextCharsAtom (UTF-16LE). Logical text is
//! always a Rust `String`; lengths are counted in UTF-16 code units so that
//! they line up with the style tables.

use crate::common::binary::utf16_len;
use crate::ole::consts::PptRecordType;
use crate::ole::ppt::error::{PptError, Result};
use encoding_rs::UTF_16LE;

/// On-disk encoding of a text atom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextEncoding {
    /// TextBytesAtom, 8 bits per character
    Narrow,
    /// TextCharsAtom, 16 bits per code unit
    Wide,
}

impl TextEncoding {
    /// Record type carrying this encoding.
    pub fn record_type(self) -> PptRecordType {
        match self {
            TextEncoding::Narrow => PptRecordType::TextBytesAtom,
            TextEncoding::Wide => PptRecordType::TextCharsAtom,
        }
    }

    /// Encoding stored by the given record type, if it is a text atom.
    pub fn from_record_type(kind: PptRecordType) -> Option<Self> {
        match kind {
            PptRecordType::TextBytesAtom => Some(TextEncoding::Narrow),
            PptRecordType::TextCharsAtom => Some(TextEncoding::Wide),
            _ => None,
        }
    }

    /// Narrowest encoding able to hold `text`.
    pub fn for_text(text: &str) -> Self {
        if text.chars().all(|c| (c as u32) <= 0xFF) {
            TextEncoding::Narrow
        } else {
            TextEncoding::Wide
        }
    }
}

/// Pick the encoding for rewriting a block currently stored as `current`.
///
/// Narrow blocks are promoted when the text needs it; wide blocks stay wide.
pub fn select_encoding(current: TextEncoding, text: &str) -> TextEncoding {
    match current {
        TextEncoding::Wide => TextEncoding::Wide,
        TextEncoding::Narrow => TextEncoding::for_text(text),
    }
}

/// Payload of a TextBytesAtom or TextCharsAtom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextAtom {
    encoding: TextEncoding,
    payload: Vec<u8>,
}

impl TextAtom {
    /// Wrap a raw payload read from disk.
    ///
    /// Wide payloads must hold whole code units.
    pub fn from_payload(encoding: TextEncoding, payload: Vec<u8>, offset: usize) -> Result<Self> {
        if encoding == TextEncoding::Wide && payload.len() % 2 != 0 {
            return Err(PptError::corrupt(
                offset,
                format!("TextCharsAtom payload has odd length {}", payload.len()),
            ));
        }
        Ok(Self { encoding, payload })
    }

    /// Encode `text` with the narrowest encoding that holds it.
    pub fn encode(text: &str) -> Self {
        let encoding = TextEncoding::for_text(text);
        Self {
            encoding,
            payload: encode_payload(text, encoding),
        }
    }

    /// Encode `text` with a fixed encoding; `None` if narrow cannot hold it.
    pub fn encode_as(text: &str, encoding: TextEncoding) -> Option<Self> {
        if encoding == TextEncoding::Narrow && TextEncoding::for_text(text) == TextEncoding::Wide {
            return None;
        }
        Some(Self {
            encoding,
            payload: encode_payload(text, encoding),
        })
    }

    /// An empty narrow atom.
    pub fn empty() -> Self {
        Self {
            encoding: TextEncoding::Narrow,
            payload: Vec::new(),
        }
    }

    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Decode the payload. Wide payloads with unpaired surrogates decode
    /// them to U+FFFD.
    pub fn decode(&self) -> String {
        match self.encoding {
            TextEncoding::Narrow => self.payload.iter().map(|&b| b as char).collect(),
            TextEncoding::Wide => {
                let (text, _) = UTF_16LE.decode_without_bom_handling(&self.payload);
                text.into_owned()
            },
        }
    }

    /// Number of UTF-16 code units stored.
    pub fn char_count(&self) -> usize {
        match self.encoding {
            TextEncoding::Narrow => self.payload.len(),
            TextEncoding::Wide => self.payload.len() / 2,
        }
    }
}

fn encode_payload(text: &str, encoding: TextEncoding) -> Vec<u8> {
    match encoding {
        TextEncoding::Narrow => text.chars().map(|c| c as u32 as u8).collect(),
        TextEncoding::Wide => {
            let mut out = Vec::with_capacity(utf16_len(text) * 2);
            for unit in text.encode_utf16() {
                out.extend_from_slice(&unit.to_le_bytes());
            }
            out
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_narrow_round_trip() {
        let atom = TextAtom::encode("Caf\u{e9}\rline");
        assert_eq!(atom.encoding(), TextEncoding::Narrow);
        assert_eq!(atom.payload(), b"Caf\xe9\rline");
        assert_eq!(atom.decode(), "Caf\u{e9}\rline");
        assert_eq!(atom.char_count(), 9);
    }

    #[test]
    fn test_wide_when_needed() {
        let atom = TextAtom::encode("\u{0121}x");
        assert_eq!(atom.encoding(), TextEncoding::Wide);
        assert_eq!(atom.payload(), &[0x21, 0x01, b'x', 0x00]);
        assert_eq!(atom.decode(), "\u{0121}x");
        assert_eq!(atom.char_count(), 2);
    }

    #[test]
    fn test_surrogate_pairs_count_two_units() {
        let atom = TextAtom::encode("\u{1F600}");
        assert_eq!(atom.payload().len(), 4);
        assert_eq!(atom.char_count(), 2);
        assert_eq!(atom.decode(), "\u{1F600}");
    }

    #[test]
    fn test_lone_surrogate_decodes_to_replacement() {
        let atom = TextAtom::from_payload(TextEncoding::Wide, vec![0x00, 0xD8], 0).unwrap();
        assert_eq!(atom.decode(), "\u{FFFD}");
    }

    #[test]
    fn test_odd_wide_payload_is_corrupt() {
        let err = TextAtom::from_payload(TextEncoding::Wide, vec![1, 2, 3], 40).unwrap_err();
        assert!(matches!(err, PptError::CorruptRecord { offset: 40, .. }));
    }

    #[test]
    fn test_select_encoding_promotes_only() {
        assert_eq!(select_encoding(TextEncoding::Narrow, "abc"), TextEncoding::Narrow);
        assert_eq!(select_encoding(TextEncoding::Narrow, "\u{0147}"), TextEncoding::Wide);
        assert_eq!(select_encoding(TextEncoding::Wide, "abc"), TextEncoding::Wide);
    }

    #[test]
    fn test_encode_as() {
        assert!(TextAtom::encode_as("\u{0147}", TextEncoding::Narrow).is_none());
        let wide = TextAtom::encode_as("ab", TextEncoding::Wide).unwrap();
        assert_eq!(wide.payload(), &[b'a', 0, b'b', 0]);
        assert_eq!(
            TextEncoding::from_record_type(PptRecordType::TextCharsAtom),
            Some(TextEncoding::Wide)
        );
        assert_eq!(TextEncoding::Narrow.record_type(), PptRecordType::TextBytesAtom);
    }
}
