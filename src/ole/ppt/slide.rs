//! Slide - the text blocks of one slide.
//!
//! Text lives in two places: the SlideListWithText of the document (one
//! [`SlideAtomsSet`] per slide) and the client textboxes inside a slide's
//! drawing. A [`Slide`] collects the blocks from either source.
//!
//! # Examples
//!
//! ```rust
//! use litchi_pptext::ppt::{RecordTree, Slide, TextModelOptions};
//!
//! # fn run(stream: &[u8]) -> litchi_pptext::ppt::Result<()> {
//! let mut tree = RecordTree::parse(stream)?;
//! let slide_list = tree.roots()[0];
//! let mut slides = Slide::from_slide_list(&mut tree, slide_list)?;
//!
//! for slide in &slides {
//!     for block in slide.text_blocks() {
//!         println!("{:?}: {}", block.text_type(), block.text());
//!     }
//! }
//!
//! slides[0].text_blocks_mut()[0].set_run_text(0, 0, "New title")?;
//! slides[0].store(&mut tree, &TextModelOptions::default())?;
//! let bytes = tree.to_bytes()?;
//! # let _ = bytes;
//! # Ok(())
//! # }
//! ```
use super::error::Result;
use super::options::TextModelOptions;
use super::records::{
    RecordId, RecordTree, SlideAtomsSet, group_slide_atoms_sets,
};
use super::text::{TextBlock, TextParagraph};
use crate::ole::consts::PptRecordType;

/// Text blocks belonging to one slide.
#[derive(Debug, Clone)]
pub struct Slide {
    /// Slide container or SlidePersistAtom the blocks were read from
    source: RecordId,
    slide_id: Option<u32>,
    blocks: Vec<TextBlock>,
}

impl Slide {
    /// Read every text block below a Slide, Notes or MainMaster container.
    pub fn from_container(tree: &mut RecordTree, container: RecordId) -> Result<Self> {
        let blocks = TextBlock::find_all(tree, container)?;
        Ok(Self {
            source: container,
            slide_id: None,
            blocks,
        })
    }

    /// Read the text blocks of one SlideListWithText entry.
    pub fn from_atoms_set(tree: &mut RecordTree, set: &SlideAtomsSet) -> Result<Self> {
        let headers: Vec<RecordId> = set
            .records
            .iter()
            .copied()
            .filter(|&id| {
                tree.get(id)
                    .is_ok_and(|n| n.kind() == PptRecordType::TextHeaderAtom)
            })
            .collect();

        let mut blocks = Vec::with_capacity(headers.len());
        for header in headers {
            blocks.push(TextBlock::load(tree, header)?);
        }

        Ok(Self {
            source: set.persist,
            slide_id: set.slide_id(tree),
            blocks,
        })
    }

    /// Read all slides of a SlideListWithText container.
    pub fn from_slide_list(tree: &mut RecordTree, slide_list: RecordId) -> Result<Vec<Self>> {
        let sets = group_slide_atoms_sets(tree, slide_list)?;
        log::debug!("SlideListWithText holds {} slides", sets.len());
        sets.iter()
            .map(|set| Self::from_atoms_set(tree, set))
            .collect()
    }

    pub fn source(&self) -> RecordId {
        self.source
    }

    /// Identifier from the SlidePersistAtom, when read from a slide list.
    pub fn slide_id(&self) -> Option<u32> {
        self.slide_id
    }

    pub fn text_blocks(&self) -> &[TextBlock] {
        &self.blocks
    }

    pub fn text_blocks_mut(&mut self) -> &mut [TextBlock] {
        &mut self.blocks
    }

    /// Paragraph lists of all blocks, in document order.
    pub fn text_paragraphs(&self) -> Vec<&[TextParagraph]> {
        self.blocks.iter().map(TextBlock::paragraphs).collect()
    }

    /// Store every modified block.
    pub fn store(&mut self, tree: &mut RecordTree, options: &TextModelOptions) -> Result<()> {
        for block in self.blocks.iter_mut().filter(|b| b.is_dirty()) {
            block.store(tree, options)?;
        }
        Ok(())
    }
}
