//! Document font table.
//!
//! Character styles refer to fonts by index. The index is the instance of a
//! FontEntityAtom inside the FontCollection container of the document's
//! Environment record.

use crate::ole::consts::PptRecordType;
use crate::ole::ppt::error::{PptError, Result};
use crate::ole::ppt::records::{Record, RecordHeader, RecordId, RecordNode, RecordTree};
use bytes::Bytes;

/// Size of a FontEntityAtom payload.
const FONT_ENTITY_SIZE: usize = 68;
/// Bytes reserved for the UTF-16 face name.
const FACE_NAME_SIZE: usize = 64;
/// Highest index a record instance can hold.
const MAX_FONT_INDEX: u16 = 0x0FFF;

/// One FontEntityAtom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontEntity {
    /// Index referenced by `font.index` style properties
    pub index: u16,
    /// Face name (at most 32 UTF-16 units are stored)
    pub name: String,
    /// LOGFONT character set
    pub charset: u8,
    /// LOGFONT pitch and family
    pub pitch_family: u8,
}

impl FontEntity {
    /// Decode a FontEntityAtom payload.
    pub fn parse(index: u16, payload: &[u8]) -> Self {
        let face = &payload[..payload.len().min(FACE_NAME_SIZE)];
        let units: Vec<u16> = face
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .take_while(|&unit| unit != 0)
            .collect();
        Self {
            index,
            name: String::from_utf16_lossy(&units),
            charset: payload.get(64).copied().unwrap_or(0),
            pitch_family: payload.get(67).copied().unwrap_or(0),
        }
    }

    /// Encode the 68-byte payload.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut data = vec![0u8; FONT_ENTITY_SIZE];
        for (i, unit) in self.name.encode_utf16().take(FACE_NAME_SIZE / 2).enumerate() {
            data[i * 2..i * 2 + 2].copy_from_slice(&unit.to_le_bytes());
        }
        data[64] = self.charset;
        // fEmbedSubsetted and lfQuality stay zero
        data[67] = self.pitch_family;
        data
    }
}

/// Fonts declared by a document.
#[derive(Debug, Clone, Default)]
pub struct FontCollection {
    container: Option<RecordId>,
    fonts: Vec<FontEntity>,
}

impl FontCollection {
    /// Locate the FontCollection container below `root` and read its fonts.
    ///
    /// A tree without one yields an empty collection.
    pub fn load(tree: &RecordTree, root: RecordId) -> Result<Self> {
        let container = std::iter::once(root)
            .chain(tree.descendants(root))
            .find(|&id| {
                tree.get(id)
                    .is_ok_and(|n| n.kind() == PptRecordType::FontCollection)
            });

        let Some(container) = container else {
            log::debug!("no FontCollection record, using default fonts only");
            return Ok(Self::default());
        };

        let mut fonts = Vec::new();
        for id in tree.find_children_by_type(container, PptRecordType::FontEntityAtom) {
            let node = tree.get(id)?;
            if let Record::Opaque(payload) = &node.record {
                fonts.push(FontEntity::parse(node.header.instance, payload));
            }
        }
        log::debug!("loaded {} fonts", fonts.len());

        Ok(Self {
            container: Some(container),
            fonts,
        })
    }

    pub fn fonts(&self) -> &[FontEntity] {
        &self.fonts
    }

    /// Face name for a font index.
    pub fn name(&self, index: u16) -> Option<&str> {
        self.fonts
            .iter()
            .find(|f| f.index == index)
            .map(|f| f.name.as_str())
    }

    /// Index of a face name, compared case-insensitively.
    pub fn index_of(&self, name: &str) -> Option<u16> {
        self.fonts
            .iter()
            .find(|f| f.name.eq_ignore_ascii_case(name))
            .map(|f| f.index)
    }

    /// One past the highest index in use, or the lowest free index once
    /// that would not fit in a record instance.
    fn next_index(&self) -> Result<u16> {
        let next = self.fonts.iter().map(|f| f.index + 1).max().unwrap_or(0);
        if next <= MAX_FONT_INDEX {
            return Ok(next);
        }
        (0..=MAX_FONT_INDEX)
            .find(|&index| self.fonts.iter().all(|f| f.index != index))
            .ok_or(PptError::IndexOutOfBounds {
                what: "font",
                index: usize::from(next),
                len: usize::from(MAX_FONT_INDEX) + 1,
            })
    }

    /// Return the index of `name`, appending a FontEntityAtom when missing.
    pub fn add_font(&mut self, tree: &mut RecordTree, name: &str) -> Result<u16> {
        if let Some(index) = self.index_of(name) {
            return Ok(index);
        }
        let container = self.container.ok_or_else(|| {
            PptError::RecordNotFound("FontCollection container".to_string())
        })?;

        let index = self.next_index()?;
        let entity = FontEntity {
            index,
            name: name.to_string(),
            charset: 0,
            pitch_family: 0,
        };
        let payload = entity.to_bytes();
        let header = RecordHeader::new(
            0,
            index,
            PptRecordType::FontEntityAtom as u16,
            payload.len() as u32,
        );
        let id = tree.add(RecordNode::new(header, Record::Opaque(Bytes::from(payload))));
        let position = tree.children(container).len();
        tree.insert_child(container, position, id)?;

        log::debug!("added font {name:?} at index {index}");
        self.fonts.push(entity);
        Ok(index)
    }
}
