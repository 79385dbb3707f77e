//! Arena-backed tree of PPT records.
//!
//! Records are stored in a [`SlotMap`] and refer to each other through
//! [`RecordId`] handles, so text blocks can keep handles to the atoms they
//! were built from while the tree is rewritten around them.

use std::io::Write;

use super::header::RecordHeader;
use super::record::{Record, RecordId, RecordNode};
use crate::ole::consts::{PptRecordType, RECORD_HEADER_SIZE};
use crate::ole::ppt::error::{PptError, Result};
use bytes::Bytes;
use slotmap::SlotMap;

/// A mutable tree of PPT records.
#[derive(Debug, Clone, Default)]
pub struct RecordTree {
    nodes: SlotMap<RecordId, RecordNode>,
    roots: Vec<RecordId>,
}

impl RecordTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a buffer holding a sequence of top-level records.
    ///
    /// Fails with [`PptError::CorruptRecord`] when a declared length runs past
    /// its enclosing buffer or container, or when a container's children do
    /// not exactly fill it.
    pub fn parse(data: &[u8]) -> Result<Self> {
        Self::parse_bytes(Bytes::copy_from_slice(data))
    }

    /// Parse from a shared buffer; opaque payloads borrow from it.
    pub fn parse_bytes(data: Bytes) -> Result<Self> {
        let mut tree = Self::new();
        let roots = tree.parse_sequence(&data, 0, data.len(), None)?;
        tree.roots = roots;
        log::debug!(
            "parsed {} top-level records ({} total) from {} bytes",
            tree.roots.len(),
            tree.nodes.len(),
            data.len()
        );
        Ok(tree)
    }

    fn parse_sequence(
        &mut self,
        data: &Bytes,
        start: usize,
        end: usize,
        parent: Option<RecordId>,
    ) -> Result<Vec<RecordId>> {
        let mut ids = Vec::new();
        let mut offset = start;

        while offset < end {
            if end - offset < RECORD_HEADER_SIZE {
                return Err(PptError::corrupt(
                    offset,
                    format!(
                        "{} trailing bytes do not form a record header",
                        end - offset
                    ),
                ));
            }
            let (id, consumed) = self.parse_record(data, offset, end, parent)?;
            ids.push(id);
            offset += consumed;
        }

        Ok(ids)
    }

    fn parse_record(
        &mut self,
        data: &Bytes,
        offset: usize,
        end: usize,
        parent: Option<RecordId>,
    ) -> Result<(RecordId, usize)> {
        let header = RecordHeader::parse(&data[..end], offset)?;
        let payload_start = offset + RECORD_HEADER_SIZE;
        let available = end - payload_start;
        if header.length as usize > available {
            return Err(PptError::corrupt(
                offset,
                format!(
                    "record type {} declares {} bytes but only {} remain",
                    header.record_type, header.length, available
                ),
            ));
        }
        let payload_end = payload_start + header.length as usize;

        let id = if header.is_container() {
            let id = self.nodes.insert(RecordNode {
                header,
                record: Record::Container(Vec::new()),
                parent,
                offset: Some(payload_start),
            });
            let children = self.parse_sequence(data, payload_start, payload_end, Some(id))?;
            self.nodes[id].record = Record::Container(children);
            id
        } else {
            let payload = data.slice(payload_start..payload_end);
            let record = Record::from_atom(&header, payload, payload_start);
            self.nodes.insert(RecordNode {
                header,
                record,
                parent,
                offset: Some(payload_start),
            })
        };

        Ok((id, header.total_size()))
    }

    /// Top-level records in order.
    pub fn roots(&self) -> &[RecordId] {
        &self.roots
    }

    /// Number of live records.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree holds no records.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Look up a record.
    pub fn get(&self, id: RecordId) -> Result<&RecordNode> {
        self.nodes
            .get(id)
            .ok_or_else(|| PptError::RecordNotFound(format!("stale record handle {id:?}")))
    }

    /// Look up a record for mutation.
    pub fn get_mut(&mut self, id: RecordId) -> Result<&mut RecordNode> {
        self.nodes
            .get_mut(id)
            .ok_or_else(|| PptError::RecordNotFound(format!("stale record handle {id:?}")))
    }

    /// Children of `id`; empty for atoms and unknown handles.
    pub fn children(&self, id: RecordId) -> &[RecordId] {
        self.nodes.get(id).map(RecordNode::children).unwrap_or(&[])
    }

    /// Siblings list containing `id` (its parent's children, or the roots).
    pub fn siblings(&self, id: RecordId) -> Result<&[RecordId]> {
        match self.get(id)?.parent {
            Some(parent) => Ok(self.children(parent)),
            None => Ok(&self.roots),
        }
    }

    /// Direct children of `parent` with the given record type.
    pub fn find_children_by_type(&self, parent: RecordId, kind: PptRecordType) -> Vec<RecordId> {
        self.children(parent)
            .iter()
            .copied()
            .filter(|&child| self.nodes.get(child).is_some_and(|n| n.kind() == kind))
            .collect()
    }

    /// First direct child of `parent` with the given record type.
    pub fn find_child_by_type(&self, parent: RecordId, kind: PptRecordType) -> Option<RecordId> {
        self.children(parent)
            .iter()
            .copied()
            .find(|&child| self.nodes.get(child).is_some_and(|n| n.kind() == kind))
    }

    /// All records below `id` in document (pre-)order, excluding `id` itself.
    pub fn descendants(&self, id: RecordId) -> Vec<RecordId> {
        let mut out = Vec::new();
        let mut stack: Vec<RecordId> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    /// Swap the decoded payload of an atom in place, keeping its position.
    pub fn set_record(&mut self, id: RecordId, record: Record) -> Result<()> {
        let node = self.get_mut(id)?;
        node.record = record;
        if !node.record.is_container() {
            node.header.length = node.atom_len() as u32;
        }
        Ok(())
    }

    /// Add a detached record; attach it with [`insert_child`](Self::insert_child),
    /// [`insert_after`](Self::insert_after) or [`replace_child`](Self::replace_child).
    pub fn add(&mut self, mut node: RecordNode) -> RecordId {
        node.parent = None;
        self.nodes.insert(node)
    }

    /// Append a detached record to the top level.
    pub fn push_root(&mut self, id: RecordId) -> Result<()> {
        self.get_mut(id)?.parent = None;
        self.roots.push(id);
        Ok(())
    }

    /// Insert a detached record into `parent` at `index`.
    pub fn insert_child(&mut self, parent: RecordId, index: usize, child: RecordId) -> Result<()> {
        self.get(child)?;
        let node = self.get_mut(parent)?;
        let Record::Container(children) = &mut node.record else {
            return Err(PptError::RecordNotFound(format!(
                "record type {} is not a container",
                node.header.record_type
            )));
        };
        if index > children.len() {
            return Err(PptError::IndexOutOfBounds {
                what: "child",
                index,
                len: children.len(),
            });
        }
        children.insert(index, child);
        self.nodes[child].parent = Some(parent);
        Ok(())
    }

    /// Insert a detached record right after `sibling`.
    pub fn insert_after(&mut self, sibling: RecordId, child: RecordId) -> Result<()> {
        self.get(child)?;
        let parent = self.get(sibling)?.parent;
        let list = self.sibling_list_mut(parent)?;
        let pos = list
            .iter()
            .position(|&id| id == sibling)
            .ok_or_else(|| PptError::RecordNotFound("sibling not attached".to_string()))?;
        list.insert(pos + 1, child);
        self.nodes[child].parent = parent;
        Ok(())
    }

    /// Put the detached record `new` in place of `old`, keeping sibling order.
    ///
    /// The old record and its subtree are removed from the arena.
    pub fn replace_child(&mut self, old: RecordId, new: RecordId) -> Result<()> {
        self.get(new)?;
        let parent = self.get(old)?.parent;
        let list = self.sibling_list_mut(parent)?;
        let pos = list
            .iter()
            .position(|&id| id == old)
            .ok_or_else(|| PptError::RecordNotFound("record not attached".to_string()))?;
        list[pos] = new;
        self.nodes[new].parent = parent;
        self.drop_subtree(old);
        Ok(())
    }

    fn sibling_list_mut(&mut self, parent: Option<RecordId>) -> Result<&mut Vec<RecordId>> {
        match parent {
            None => Ok(&mut self.roots),
            Some(parent) => match &mut self.get_mut(parent)?.record {
                Record::Container(children) => Ok(children),
                _ => Err(PptError::RecordNotFound(
                    "parent is not a container".to_string(),
                )),
            },
        }
    }

    fn drop_subtree(&mut self, id: RecordId) {
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(node) = self.nodes.remove(next) {
                stack.extend(node.children().iter().copied());
            }
        }
    }

    /// Serialized size of `id` including its header.
    pub fn serialized_len(&self, id: RecordId) -> usize {
        match self.nodes.get(id) {
            Some(node) if node.record.is_container() => {
                RECORD_HEADER_SIZE
                    + node
                        .children()
                        .iter()
                        .map(|&child| self.serialized_len(child))
                        .sum::<usize>()
            },
            Some(node) => node.atom_total_len(),
            None => 0,
        }
    }

    /// Write a single record (and its subtree) with recomputed lengths.
    pub fn write_record<W: Write>(&self, id: RecordId, writer: &mut W) -> Result<()> {
        let node = self.get(id)?;
        let length = self.serialized_len(id) - RECORD_HEADER_SIZE;
        let header = RecordHeader {
            length: length as u32,
            ..node.header
        };
        header.write(writer)?;
        match node.atom_payload() {
            Some(payload) => writer.write_all(&payload)?,
            None => {
                for &child in node.children() {
                    self.write_record(child, writer)?;
                }
            },
        }
        Ok(())
    }

    /// Write every top-level record.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        for &root in &self.roots {
            self.write_record(root, writer)?;
        }
        Ok(())
    }

    /// Serialize the whole tree.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let total = self.roots.iter().map(|&r| self.serialized_len(r)).sum();
        let mut out = Vec::with_capacity(total);
        self.write_to(&mut out)?;
        Ok(out)
    }
}
