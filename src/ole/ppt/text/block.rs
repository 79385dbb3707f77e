//! Text blocks: the editable view of one TextHeaderAtom and its atoms.
//!
//! A block is anchored by a TextHeaderAtom; the text atom, StyleTextPropAtom
//! and MasterTextPropAtom that follow it (up to the next header) hold its
//! characters, styles and indent overrides. The block keeps record handles,
//! never references, so the tree stays free to change underneath it.
//! Edits touch the paragraph model only until [`TextBlock::store`] writes
//! them back.

use super::codec::{TextAtom, TextEncoding, select_encoding};
use super::paragraph::{
    self, TextParagraph, apply_character_styles, apply_indents, apply_paragraph_styles,
    collect_character_styles, collect_indents, collect_paragraph_styles, split_paragraphs,
};
use crate::common::binary::utf16_len;
use crate::ole::consts::PptRecordType;
use crate::ole::ppt::error::{PptError, Result};
use crate::ole::ppt::options::TextModelOptions;
use crate::ole::ppt::records::{
    Record, RecordHeader, RecordId, RecordNode, RecordTree, TextHeaderAtom, TextType,
};
use crate::ole::ppt::text_prop::{MasterTextPropAtom, StyleTextPropAtom, TextPropCollection};
use bytes::Bytes;

/// Records making up one block, found next to its header.
struct BlockRecords {
    atom: Option<RecordId>,
    style: Option<RecordId>,
    master: Option<RecordId>,
}

/// Paragraphs of one text block plus the handles needed to store them.
#[derive(Debug, Clone)]
pub struct TextBlock {
    header: RecordId,
    atom: RecordId,
    style_atom: Option<RecordId>,
    master_atom: Option<RecordId>,
    text_type: TextType,
    encoding: TextEncoding,
    paragraphs: Vec<TextParagraph>,
    reserved: Vec<u8>,
    dirty: bool,
}

impl TextBlock {
    /// Load every text block below `root` in document order.
    pub fn find_all(tree: &mut RecordTree, root: RecordId) -> Result<Vec<TextBlock>> {
        let headers: Vec<RecordId> = std::iter::once(root)
            .chain(tree.descendants(root))
            .filter(|&id| {
                tree.get(id)
                    .is_ok_and(|n| n.kind() == PptRecordType::TextHeaderAtom)
            })
            .collect();
        headers
            .into_iter()
            .map(|header| Self::load(tree, header))
            .collect()
    }

    /// Build the block anchored at `header`.
    ///
    /// A header with no text atom before the next header gets an empty narrow
    /// TextBytesAtom inserted right after it.
    pub fn load(tree: &mut RecordTree, header: RecordId) -> Result<TextBlock> {
        let node = tree.get(header)?;
        let text_type = match &node.record {
            Record::TextHeader(atom) => atom.text_type,
            Record::Opaque(payload) if node.kind() == PptRecordType::TextHeaderAtom => {
                TextHeaderAtom::parse(payload, node.source_offset().unwrap_or(0))?.text_type
            },
            _ => {
                return Err(PptError::RecordNotFound(
                    "text block must start at a TextHeaderAtom".to_string(),
                ));
            },
        };

        let found = Self::scan_siblings(tree, header)?;
        let atom = match found.atom {
            Some(atom) => atom,
            None => {
                log::warn!("TextHeaderAtom without text, inserting an empty TextBytesAtom");
                let id = tree.add(RecordNode::text_atom(TextAtom::empty()));
                tree.insert_after(header, id)?;
                id
            },
        };

        let node = tree.get(atom)?;
        let (encoding, raw) = match &node.record {
            Record::Text(text) => (text.encoding(), text.decode()),
            Record::Opaque(payload) => {
                let encoding = if node.kind() == PptRecordType::TextCharsAtom {
                    TextEncoding::Wide
                } else {
                    TextEncoding::Narrow
                };
                let offset = node.source_offset().unwrap_or(0);
                let text = TextAtom::from_payload(encoding, payload.to_vec(), offset)?;
                (text.encoding(), text.decode())
            },
            _ => return Err(PptError::RecordNotFound("text atom".to_string())),
        };
        let mut paragraphs = split_paragraphs(&raw);

        let mut reserved = Vec::new();
        if let Some(id) = found.style
            && let node = tree.get(id)?
            && let Record::StyleTextProp(payload) = &node.record
        {
            let base = node.source_offset().unwrap_or(0);
            let styles = StyleTextPropAtom::parse_at(payload, utf16_len(&raw), base)?;
            apply_paragraph_styles(&mut paragraphs, styles.paragraph_styles.entries());
            apply_character_styles(&mut paragraphs, styles.character_styles.entries());
            reserved = styles.reserved;
        }
        if let Some(id) = found.master
            && let node = tree.get(id)?
            && let Record::MasterTextProp(payload) = &node.record
        {
            let base = node.source_offset().unwrap_or(0);
            apply_indents(&mut paragraphs, &MasterTextPropAtom::parse_at(payload, base)?);
        }

        log::debug!(
            "loaded {:?} text block: {} paragraphs, {:?} encoding",
            text_type,
            paragraphs.len(),
            encoding
        );

        Ok(TextBlock {
            header,
            atom,
            style_atom: found.style,
            master_atom: found.master,
            text_type,
            encoding,
            paragraphs,
            reserved,
            dirty: false,
        })
    }

    fn scan_siblings(tree: &RecordTree, header: RecordId) -> Result<BlockRecords> {
        let siblings = tree.siblings(header)?;
        let start = siblings
            .iter()
            .position(|&id| id == header)
            .ok_or_else(|| PptError::RecordNotFound("header not attached".to_string()))?;

        let mut found = BlockRecords {
            atom: None,
            style: None,
            master: None,
        };
        for &id in &siblings[start + 1..] {
            match tree.get(id)?.kind() {
                PptRecordType::TextHeaderAtom | PptRecordType::SlidePersistAtom => break,
                PptRecordType::TextBytesAtom | PptRecordType::TextCharsAtom => {
                    found.atom.get_or_insert(id);
                },
                PptRecordType::StyleTextPropAtom => {
                    found.style.get_or_insert(id);
                },
                PptRecordType::MasterTextPropAtom => {
                    found.master.get_or_insert(id);
                },
                _ => {},
            }
        }
        Ok(found)
    }

    pub fn header_id(&self) -> RecordId {
        self.header
    }

    /// Handle of the current text atom; changes when the encoding does.
    pub fn atom_id(&self) -> RecordId {
        self.atom
    }

    pub fn style_atom_id(&self) -> Option<RecordId> {
        self.style_atom
    }

    pub fn master_atom_id(&self) -> Option<RecordId> {
        self.master_atom
    }

    pub fn text_type(&self) -> TextType {
        self.text_type
    }

    /// Encoding of the stored text atom.
    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    pub fn paragraphs(&self) -> &[TextParagraph] {
        &self.paragraphs
    }

    /// Mutable paragraphs; the block counts as modified afterwards.
    pub fn paragraphs_mut(&mut self) -> &mut Vec<TextParagraph> {
        self.dirty = true;
        &mut self.paragraphs
    }

    /// Whether the model holds edits not yet stored.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn raw_text(&self) -> String {
        paragraph::raw_text(&self.paragraphs)
    }

    pub fn text(&self) -> String {
        paragraph::text(&self.paragraphs)
    }

    /// Replace the whole raw text and store the block.
    ///
    /// `raw` is split on `\r`; every paragraph gets one run. Text is kept
    /// verbatim, `\n` included.
    pub fn set_text(
        &mut self,
        tree: &mut RecordTree,
        raw: &str,
        options: &TextModelOptions,
    ) -> Result<()> {
        paragraph::set_text(&mut self.paragraphs, raw);
        self.dirty = true;
        self.store(tree, options)
    }

    /// Replace the text of a single run. Call [`store`](Self::store) to persist.
    pub fn set_run_text(&mut self, paragraph: usize, run: usize, text: &str) -> Result<()> {
        let para_count = self.paragraphs.len();
        let para = self
            .paragraphs
            .get_mut(paragraph)
            .ok_or(PptError::IndexOutOfBounds {
                what: "paragraph",
                index: paragraph,
                len: para_count,
            })?;
        let run_count = para.runs().len();
        let target = para
            .runs_mut()
            .get_mut(run)
            .ok_or(PptError::IndexOutOfBounds {
                what: "run",
                index: run,
                len: run_count,
            })?;
        target.set_text(text)?;
        self.dirty = true;
        Ok(())
    }

    /// Character style in effect at UTF-16 offset `offset` of the block.
    ///
    /// The terminator position, one past the text, is addressable.
    pub fn character_style_at(&self, offset: usize) -> Result<TextPropCollection> {
        let styles = collect_character_styles(&self.paragraphs);
        let at = table_offset(offset, styles.total_covered())?;
        styles.properties_at(at).cloned()
    }

    /// Paragraph style in effect at UTF-16 offset `offset` of the block.
    pub fn paragraph_style_at(&self, offset: usize) -> Result<TextPropCollection> {
        let styles = collect_paragraph_styles(&self.paragraphs);
        let at = table_offset(offset, styles.total_covered())?;
        styles.properties_at(at).cloned()
    }

    /// Start a new run at UTF-16 offset `offset` of the block.
    ///
    /// The run containing the offset is split in two, both halves keeping
    /// its style. Offsets on an existing run boundary change nothing.
    pub fn split_run_at(&mut self, offset: usize) -> Result<()> {
        let mut start = 0usize;
        for para in &mut self.paragraphs {
            let mut hit = None;
            for (idx, run) in para.runs().iter().enumerate() {
                let end = start + run.len();
                if offset < end {
                    hit = Some((idx, offset - start));
                    break;
                }
                start = end;
            }
            if let Some((idx, at)) = hit {
                para.split_run(idx, at)?;
                self.dirty = true;
                return Ok(());
            }
        }
        if offset == start {
            return Ok(());
        }
        Err(PptError::OutOfRange {
            offset: offset as u64,
            covered: start as u64,
        })
    }

    /// Write the model back into the tree.
    ///
    /// The text atom is re-encoded (narrow blocks are promoted when needed,
    /// wide blocks stay wide unless `options.allow_demotion` is set) and
    /// replaced in place when the encoding changes. Style and indent tables
    /// are regenerated from the paragraphs.
    pub fn store(&mut self, tree: &mut RecordTree, options: &TextModelOptions) -> Result<()> {
        let raw = self.raw_text();
        let encoding = if options.allow_demotion {
            TextEncoding::for_text(&raw)
        } else {
            select_encoding(self.encoding, &raw)
        };
        self.store_as(tree, options, &raw, encoding)
    }

    /// Store the block narrow if its text allows it.
    ///
    /// Returns `false`, leaving the tree untouched, when some character
    /// needs the wide encoding.
    pub fn demote_to_narrow(
        &mut self,
        tree: &mut RecordTree,
        options: &TextModelOptions,
    ) -> Result<bool> {
        let raw = self.raw_text();
        if TextEncoding::for_text(&raw) == TextEncoding::Wide {
            return Ok(false);
        }
        self.store_as(tree, options, &raw, TextEncoding::Narrow)?;
        Ok(true)
    }

    fn store_as(
        &mut self,
        tree: &mut RecordTree,
        options: &TextModelOptions,
        raw: &str,
        encoding: TextEncoding,
    ) -> Result<()> {
        self.write_atom(tree, raw, encoding)?;
        self.write_styles(tree, options)?;

        if let Some(id) = self.master_atom {
            let master = collect_indents(&self.paragraphs);
            tree.set_record(id, Record::MasterTextProp(Bytes::from(master.to_bytes())))?;
        }

        self.dirty = false;
        Ok(())
    }

    fn write_atom(&mut self, tree: &mut RecordTree, raw: &str, encoding: TextEncoding) -> Result<()> {
        let atom = TextAtom::encode_as(raw, encoding).unwrap_or_else(|| TextAtom::encode(raw));
        if atom.encoding() == self.encoding {
            return tree.set_record(self.atom, Record::Text(atom));
        }

        log::debug!(
            "re-encoding text block from {:?} to {:?}",
            self.encoding,
            atom.encoding()
        );
        let encoding = atom.encoding();
        let id = tree.add(RecordNode::text_atom(atom));
        tree.replace_child(self.atom, id)?;
        self.atom = id;
        self.encoding = encoding;
        Ok(())
    }

    fn write_styles(&mut self, tree: &mut RecordTree, options: &TextModelOptions) -> Result<()> {
        let styled = self.paragraphs.iter().any(|p| {
            p.paragraph_style().is_some() || p.runs().iter().any(|r| r.character_style().is_some())
        });
        if self.style_atom.is_none() && !styled && !options.create_style_atom {
            return Ok(());
        }

        let styles = StyleTextPropAtom {
            paragraph_styles: collect_paragraph_styles(&self.paragraphs),
            character_styles: collect_character_styles(&self.paragraphs),
            reserved: self.reserved.clone(),
        };
        let payload = Bytes::from(styles.to_bytes());

        match self.style_atom {
            Some(id) => tree.set_record(id, Record::StyleTextProp(payload))?,
            None => {
                let header = RecordHeader::new(
                    0,
                    0,
                    PptRecordType::StyleTextPropAtom as u16,
                    payload.len() as u32,
                );
                let id = tree.add(RecordNode::new(header, Record::StyleTextProp(payload)));
                tree.insert_after(self.atom, id)?;
                self.style_atom = Some(id);
            },
        }
        Ok(())
    }
}

/// Convert a block offset for a style table lookup.
fn table_offset(offset: usize, covered: u64) -> Result<u32> {
    u32::try_from(offset).map_err(|_| PptError::OutOfRange {
        offset: offset as u64,
        covered,
    })
}
