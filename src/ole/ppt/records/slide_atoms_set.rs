//! SlideAtomsSet - groups text records associated with a single slide.
//!
//! A SlideListWithText container is a flat list: each SlidePersistAtom is
//! followed by the text records of that slide, up to the next persist atom.

use super::record::{Record, RecordId};
use super::tree::RecordTree;
use crate::common::binary::read_u32_le;
use crate::ole::consts::PptRecordType;
use crate::ole::ppt::error::Result;

/// Offset of the slide identifier inside a SlidePersistAtom payload.
const SLIDE_ID_OFFSET: usize = 12;

/// A SlidePersistAtom and the records that follow it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideAtomsSet {
    /// The SlidePersistAtom that identifies which slide this text belongs to
    pub persist: RecordId,
    /// Records up to the next SlidePersistAtom (TextHeaderAtom, TextCharsAtom, ...)
    pub records: Vec<RecordId>,
}

impl SlideAtomsSet {
    /// Slide identifier stored in the persist atom.
    pub fn slide_id(&self, tree: &RecordTree) -> Option<u32> {
        match &tree.get(self.persist).ok()?.record {
            Record::Opaque(payload) => read_u32_le(payload, SLIDE_ID_OFFSET).ok(),
            _ => None,
        }
    }
}

/// Split the children of a SlideListWithText container into per-slide sets.
///
/// Records before the first SlidePersistAtom belong to no slide and are
/// skipped.
pub fn group_slide_atoms_sets(tree: &RecordTree, slide_list: RecordId) -> Result<Vec<SlideAtomsSet>> {
    let mut sets: Vec<SlideAtomsSet> = Vec::new();
    for &child in tree.children(slide_list) {
        if tree.get(child)?.kind() == PptRecordType::SlidePersistAtom {
            sets.push(SlideAtomsSet {
                persist: child,
                records: Vec::new(),
            });
        } else if let Some(current) = sets.last_mut() {
            current.records.push(child);
        } else {
            log::debug!("skipping record before the first SlidePersistAtom");
        }
    }
    Ok(sets)
}
