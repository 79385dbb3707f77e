//! Typed PPT records.
//!
//! Records the text model understands are decoded into dedicated variants;
//! everything else is kept as an opaque byte slice so that serialization
//! reproduces it unchanged.

use super::header::RecordHeader;
use super::text_header::TextHeaderAtom;
use crate::ole::consts::{PptRecordType, RECORD_HEADER_SIZE};
use crate::ole::ppt::text::codec::{TextAtom, TextEncoding};
use bytes::Bytes;

slotmap::new_key_type! {
    /// Stable handle of a record inside a [`RecordTree`](super::RecordTree).
    pub struct RecordId;
}

/// Record payload, tagged by the kinds the text model works with.
#[derive(Debug, Clone)]
pub enum Record {
    /// Container holding ordered child records
    Container(Vec<RecordId>),
    /// TextHeaderAtom anchoring a text block
    TextHeader(TextHeaderAtom),
    /// TextBytesAtom or TextCharsAtom
    Text(TextAtom),
    /// StyleTextPropAtom; decoded on demand since it needs the text length
    StyleTextProp(Bytes),
    /// MasterTextPropAtom; decoded on demand like the style table
    MasterTextProp(Bytes),
    /// Any other atom, preserved byte for byte
    Opaque(Bytes),
}

impl Record {
    /// Decode an atom payload according to its header.
    ///
    /// Text headers and text atoms whose payload does not decode are kept as
    /// [`Record::Opaque`]; the text block built on them reports the error.
    /// `offset` is the payload position in the source buffer.
    pub(crate) fn from_atom(header: &RecordHeader, payload: Bytes, offset: usize) -> Self {
        let decoded = match header.kind() {
            PptRecordType::TextHeaderAtom => {
                TextHeaderAtom::parse(&payload, offset).map(Record::TextHeader)
            },
            kind @ (PptRecordType::TextBytesAtom | PptRecordType::TextCharsAtom) => {
                let encoding = if kind == PptRecordType::TextBytesAtom {
                    TextEncoding::Narrow
                } else {
                    TextEncoding::Wide
                };
                TextAtom::from_payload(encoding, payload.to_vec(), offset).map(Record::Text)
            },
            PptRecordType::StyleTextPropAtom => return Record::StyleTextProp(payload),
            PptRecordType::MasterTextPropAtom => return Record::MasterTextProp(payload),
            _ => return Record::Opaque(payload),
        };
        decoded.unwrap_or_else(|err| {
            log::warn!("keeping undecodable record type {} as raw bytes: {err}", header.record_type);
            Record::Opaque(payload)
        })
    }

    /// Whether this record holds children.
    pub fn is_container(&self) -> bool {
        matches!(self, Record::Container(_))
    }
}

/// A record stored in the tree arena.
#[derive(Debug, Clone)]
pub struct RecordNode {
    /// Header as read (or as built); `length` is recomputed on serialization
    pub header: RecordHeader,
    /// Decoded payload
    pub record: Record,
    pub(crate) parent: Option<RecordId>,
    /// Payload position in the parsed buffer; `None` for records built in memory
    pub(crate) offset: Option<usize>,
}

impl RecordNode {
    /// Create a detached node.
    pub fn new(header: RecordHeader, record: Record) -> Self {
        Self {
            header,
            record,
            parent: None,
            offset: None,
        }
    }

    /// Build a node for a text atom, deriving the record type from its encoding.
    pub fn text_atom(atom: TextAtom) -> Self {
        let header = RecordHeader::new(
            0,
            0,
            atom.encoding().record_type() as u16,
            atom.payload().len() as u32,
        );
        Self::new(header, Record::Text(atom))
    }

    /// Known record type of this node.
    pub fn kind(&self) -> PptRecordType {
        self.header.kind()
    }

    /// Payload position in the buffer the record was parsed from.
    pub fn source_offset(&self) -> Option<usize> {
        self.offset
    }

    /// Parent handle, `None` for top-level records.
    pub fn parent(&self) -> Option<RecordId> {
        self.parent
    }

    /// Child handles; empty for atoms.
    pub fn children(&self) -> &[RecordId] {
        match &self.record {
            Record::Container(children) => children,
            _ => &[],
        }
    }

    /// Serialized payload of an atom. Containers return `None`.
    pub(crate) fn atom_payload(&self) -> Option<Vec<u8>> {
        match &self.record {
            Record::Container(_) => None,
            Record::TextHeader(atom) => Some(atom.to_bytes().to_vec()),
            Record::Text(atom) => Some(atom.payload().to_vec()),
            Record::StyleTextProp(raw) | Record::MasterTextProp(raw) | Record::Opaque(raw) => {
                Some(raw.to_vec())
            },
        }
    }

    /// Payload length of an atom without copying.
    pub(crate) fn atom_len(&self) -> usize {
        match &self.record {
            Record::Container(_) => 0,
            Record::TextHeader(_) => TextHeaderAtom::SIZE,
            Record::Text(atom) => atom.payload().len(),
            Record::StyleTextProp(raw) | Record::MasterTextProp(raw) | Record::Opaque(raw) => {
                raw.len()
            },
        }
    }

    /// Serialized size of an atom including its header.
    pub(crate) fn atom_total_len(&self) -> usize {
        RECORD_HEADER_SIZE + self.atom_len()
    }
}
