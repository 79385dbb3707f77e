//! Text property collections and range-keyed style tables.
//!
//! Mask-driven property sets (MS-PPT TextPFException / TextCFException).

use super::defs::{
    CHAR_FLAGS, CharFlags, PropDef, PropSize, TAB_STOPS, TextPropType, find_def, props_for,
};
use crate::common::binary::{read_i16_le, read_u16_le, read_u32_le};
use crate::ole::ppt::error::{PptError, Result};
use smallvec::SmallVec;

/// One tab stop of the `tabStops` paragraph property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabStop {
    /// Position in master units
    pub position: i16,
    /// Alignment code (left, center, right, decimal)
    pub kind: u16,
}

/// Value of a text property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropValue {
    /// Fixed-width value; 2-byte props are zero-extended
    Int(u32),
    /// Tab stop list
    TabStops(Vec<TabStop>),
}

/// A property present in a collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextProp {
    pub def: &'static PropDef,
    pub value: PropValue,
}

impl TextProp {
    pub fn name(&self) -> &'static str {
        self.def.name
    }

    /// Integer value; tab stop lists report their count.
    pub fn int_value(&self) -> u32 {
        match &self.value {
            PropValue::Int(v) => *v,
            PropValue::TabStops(stops) => stops.len() as u32,
        }
    }

    fn write(&self, out: &mut Vec<u8>) {
        match (&self.value, self.def.size) {
            (PropValue::Int(v), PropSize::Fixed(2)) => {
                out.extend_from_slice(&(*v as u16).to_le_bytes())
            },
            (PropValue::Int(v), PropSize::Fixed(4)) => out.extend_from_slice(&v.to_le_bytes()),
            (PropValue::TabStops(stops), _) => {
                out.extend_from_slice(&(stops.len() as u16).to_le_bytes());
                for stop in stops {
                    out.extend_from_slice(&stop.position.to_le_bytes());
                    out.extend_from_slice(&stop.kind.to_le_bytes());
                }
            },
            _ => {},
        }
    }
}

/// Properties shared by a range of paragraphs or characters.
#[derive(Debug, Clone)]
pub struct TextPropCollection {
    /// Number of UTF-16 code units the entry covers
    pub characters_covered: u32,
    /// Paragraph indent level; always 0 for character collections
    pub indent_level: u16,
    mask: u32,
    props: SmallVec<[TextProp; 4]>,
    kind: TextPropType,
}

impl PartialEq for TextPropCollection {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.indent_level == other.indent_level
            && self.mask == other.mask
            && self.props == other.props
    }
}

impl Eq for TextPropCollection {}

impl TextPropCollection {
    /// Create an empty collection.
    pub fn new(kind: TextPropType, characters_covered: u32) -> Self {
        Self {
            characters_covered,
            indent_level: 0,
            mask: 0,
            props: SmallVec::new(),
            kind,
        }
    }

    pub fn kind(&self) -> TextPropType {
        self.kind
    }

    /// Raw mask as read or as extended by setters.
    pub fn mask(&self) -> u32 {
        self.mask
    }

    pub fn props(&self) -> &[TextProp] {
        &self.props
    }

    pub fn is_empty(&self) -> bool {
        self.props.is_empty() && self.mask == 0
    }

    /// Find a property by name.
    pub fn find(&self, name: &str) -> Option<&TextProp> {
        self.props.iter().find(|p| p.def.name == name)
    }

    /// Integer value of a property.
    pub fn value(&self, name: &str) -> Option<u32> {
        self.find(name).map(TextProp::int_value)
    }

    /// Tab stops of a paragraph collection.
    pub fn tab_stops(&self) -> Option<&[TabStop]> {
        match &self.find(TAB_STOPS)?.value {
            PropValue::TabStops(stops) => Some(stops),
            PropValue::Int(_) => None,
        }
    }

    /// Set an integer property, adding its mask bits.
    ///
    /// Returns `false` when `name` is not a property of this collection kind.
    pub fn set_value(&mut self, name: &str, value: u32) -> bool {
        let Some(def) = find_def(self.kind, name) else {
            return false;
        };
        if def.size == PropSize::TabStops {
            return false;
        }
        self.mask |= def.mask;
        self.upsert(def, PropValue::Int(value));
        true
    }

    /// Replace the tab stop list of a paragraph collection.
    pub fn set_tab_stops(&mut self, stops: Vec<TabStop>) -> bool {
        let Some(def) = find_def(self.kind, TAB_STOPS) else {
            return false;
        };
        self.mask |= def.mask;
        self.upsert(def, PropValue::TabStops(stops));
        true
    }

    /// Drop a property and its mask bits.
    pub fn remove(&mut self, name: &str) {
        if let Some(pos) = self.props.iter().position(|p| p.def.name == name) {
            let prop = self.props.remove(pos);
            self.mask &= !prop.def.mask;
        }
    }

    /// Whether a `char_flags` bit is on.
    pub fn char_flag(&self, flag: CharFlags) -> bool {
        self.value(CHAR_FLAGS)
            .is_some_and(|v| CharFlags::from_bits_truncate(v as u16).contains(flag))
    }

    /// Switch a `char_flags` bit, announcing only that bit in the mask.
    pub fn set_char_flag(&mut self, flag: CharFlags, on: bool) -> bool {
        let Some(def) = find_def(self.kind, CHAR_FLAGS) else {
            return false;
        };
        let mut flags = CharFlags::from_bits_retain(self.value(CHAR_FLAGS).unwrap_or(0) as u16);
        flags.set(flag, on);
        self.mask |= u32::from(flag.bits());
        self.upsert(def, PropValue::Int(u32::from(flags.bits())));
        true
    }

    fn upsert(&mut self, def: &'static PropDef, value: PropValue) {
        if let Some(prop) = self.props.iter_mut().find(|p| std::ptr::eq(p.def, def)) {
            prop.value = value;
            return;
        }
        let order = def_order(self.kind, def);
        let pos = self
            .props
            .iter()
            .position(|p| def_order(self.kind, p.def) > order)
            .unwrap_or(self.props.len());
        self.props.insert(pos, TextProp { def, value });
    }

    /// Read the properties announced by `mask` starting at `*pos`.
    ///
    /// `offset` is the position of `data` inside the record stream, used for
    /// error reporting.
    pub fn parse_props(
        kind: TextPropType,
        characters_covered: u32,
        mask: u32,
        data: &[u8],
        pos: &mut usize,
        offset: usize,
    ) -> Result<Self> {
        let mut collection = Self::new(kind, characters_covered);
        collection.mask = mask;

        for def in props_for(kind) {
            if mask & def.mask == 0 {
                continue;
            }
            let overrun = |at: usize| {
                PptError::corrupt(
                    offset + at,
                    format!("property {} overruns style data", def.name),
                )
            };
            let value = match def.size {
                PropSize::Fixed(0) => PropValue::Int(0),
                PropSize::Fixed(2) => {
                    let v = read_u16_le(data, *pos).map_err(|_| overrun(*pos))?;
                    *pos += 2;
                    PropValue::Int(u32::from(v))
                },
                PropSize::Fixed(_) => {
                    let v = read_u32_le(data, *pos).map_err(|_| overrun(*pos))?;
                    *pos += 4;
                    PropValue::Int(v)
                },
                PropSize::TabStops => {
                    let count = read_u16_le(data, *pos).map_err(|_| overrun(*pos))?;
                    *pos += 2;
                    let mut stops = Vec::with_capacity(count as usize);
                    for _ in 0..count {
                        let position = read_i16_le(data, *pos).map_err(|_| overrun(*pos))?;
                        let stop_kind = read_u16_le(data, *pos + 2).map_err(|_| overrun(*pos))?;
                        *pos += 4;
                        stops.push(TabStop {
                            position,
                            kind: stop_kind,
                        });
                    }
                    PropValue::TabStops(stops)
                },
            };
            collection.props.push(TextProp { def, value });
        }

        Ok(collection)
    }

    /// Write mask and property values (without count or indent).
    pub fn write_props(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.mask.to_le_bytes());
        for prop in &self.props {
            prop.write(out);
        }
    }
}

fn def_order(kind: TextPropType, def: &PropDef) -> usize {
    props_for(kind)
        .iter()
        .position(|d| std::ptr::eq(d, def))
        .unwrap_or(usize::MAX)
}

/// Ordered list of style entries, each covering a range of characters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleCollection {
    entries: Vec<TextPropCollection>,
}

impl StyleCollection {
    pub fn new(entries: Vec<TextPropCollection>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[TextPropCollection] {
        &self.entries
    }

    pub fn entries_mut(&mut self) -> &mut Vec<TextPropCollection> {
        &mut self.entries
    }

    pub fn into_entries(self) -> Vec<TextPropCollection> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all coverage counters.
    pub fn total_covered(&self) -> u64 {
        self.entries
            .iter()
            .map(|e| u64::from(e.characters_covered))
            .sum()
    }

    /// Append an entry, folding it into the previous one when the styles match.
    ///
    /// Folded coverage saturates at `u32::MAX`.
    pub fn push_merged(&mut self, entry: TextPropCollection) {
        match self.entries.last_mut() {
            Some(last) if *last == entry => {
                last.characters_covered =
                    last.characters_covered.saturating_add(entry.characters_covered)
            },
            _ => self.entries.push(entry),
        }
    }

    /// Index and start offset of the entry containing `offset`.
    fn locate(&self, offset: u32) -> Result<(usize, u32)> {
        let target = u64::from(offset);
        let mut start = 0u64;
        for (idx, entry) in self.entries.iter().enumerate() {
            let end = start + u64::from(entry.characters_covered);
            if target < end {
                // start <= offset, so it fits
                return Ok((idx, start as u32));
            }
            start = end;
        }
        Err(PptError::OutOfRange {
            offset: target,
            covered: start,
        })
    }

    /// Style in effect at `offset`.
    pub fn properties_at(&self, offset: u32) -> Result<&TextPropCollection> {
        let (idx, _) = self.locate(offset)?;
        Ok(&self.entries[idx])
    }

    /// Split the entry containing `offset` so that a boundary falls on it.
    ///
    /// Offsets already on a boundary, including the end, leave the list unchanged.
    pub fn split_at(&mut self, offset: u32) -> Result<()> {
        if u64::from(offset) == self.total_covered() {
            return Ok(());
        }
        let (idx, start) = self.locate(offset)?;
        if start == offset {
            return Ok(());
        }
        let head = offset - start;
        let mut tail = self.entries[idx].clone();
        tail.characters_covered -= head;
        self.entries[idx].characters_covered = head;
        self.entries.insert(idx + 1, tail);
        Ok(())
    }

    /// Grow or shrink the entry containing `at_offset` by `delta`.
    ///
    /// An offset equal to the total coverage addresses the last entry. Fails
    /// with [`PptError::OutOfRange`], leaving the entry as it was, when the
    /// new coverage would be negative or exceed `u32::MAX`.
    pub fn resize(&mut self, delta: i64, at_offset: u32) -> Result<()> {
        let total = self.total_covered();
        let idx = if u64::from(at_offset) == total && !self.entries.is_empty() {
            self.entries.len() - 1
        } else {
            self.locate(at_offset)?.0
        };
        let entry = &mut self.entries[idx];
        let resized = i64::from(entry.characters_covered)
            .checked_add(delta)
            .and_then(|n| u32::try_from(n).ok())
            .ok_or(PptError::OutOfRange {
                offset: u64::from(at_offset),
                covered: total,
            })?;
        entry.characters_covered = resized;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ole::ppt::text_prop::defs::{ALIGNMENT, FONT_SIZE, PARAGRAPH_FLAGS};

    fn char_style(covered: u32, size: u32) -> TextPropCollection {
        let mut c = TextPropCollection::new(TextPropType::Character, covered);
        c.set_value(FONT_SIZE, size);
        c
    }

    #[test]
    fn test_parse_in_canonical_order() {
        // mask: alignment (0x800) + paragraph flags (0xF) + tab stops (0x100000)
        let mut data = Vec::new();
        data.extend_from_slice(&0x0001u16.to_le_bytes()); // paragraph flags
        data.extend_from_slice(&2u16.to_le_bytes()); // alignment
        data.extend_from_slice(&1u16.to_le_bytes()); // one tab stop
        data.extend_from_slice(&576i16.to_le_bytes());
        data.extend_from_slice(&0u16.to_le_bytes());

        let mut pos = 0;
        let c = TextPropCollection::parse_props(
            TextPropType::Paragraph,
            5,
            0x0010_080F,
            &data,
            &mut pos,
            0,
        )
        .unwrap();
        assert_eq!(pos, data.len());
        assert_eq!(c.value(PARAGRAPH_FLAGS), Some(1));
        assert_eq!(c.value(ALIGNMENT), Some(2));
        assert_eq!(
            c.tab_stops(),
            Some(&[TabStop {
                position: 576,
                kind: 0
            }][..])
        );

        let mut out = Vec::new();
        c.write_props(&mut out);
        assert_eq!(&out[..4], &0x0010_080Fu32.to_le_bytes());
        assert_eq!(&out[4..], &data[..]);
    }

    #[test]
    fn test_overrun_is_corrupt() {
        let mut pos = 0;
        let err = TextPropCollection::parse_props(
            TextPropType::Character,
            1,
            0x0004_0000,
            &[1, 2],
            &mut pos,
            100,
        )
        .unwrap_err();
        assert!(matches!(err, PptError::CorruptRecord { offset: 100, .. }));
    }

    #[test]
    fn test_setters_extend_mask() {
        let mut c = TextPropCollection::new(TextPropType::Character, 3);
        c.set_value(FONT_SIZE, 24);
        c.set_char_flag(CharFlags::BOLD, true);
        assert_eq!(c.mask(), 0x0002_0001);
        assert!(c.char_flag(CharFlags::BOLD));
        assert!(!c.char_flag(CharFlags::ITALIC));
        // char_flags sits before font.size on the wire
        assert_eq!(c.props()[0].name(), CHAR_FLAGS);
        assert!(!c.set_value(ALIGNMENT, 1));

        c.remove(FONT_SIZE);
        assert_eq!(c.mask(), 0x0000_0001);
    }

    #[test]
    fn test_equality_ignores_coverage() {
        assert_eq!(char_style(3, 12), char_style(9, 12));
        assert_ne!(char_style(3, 12), char_style(3, 14));
    }

    #[test]
    fn test_properties_at_and_split() {
        let mut styles = StyleCollection::new(vec![char_style(4, 10), char_style(6, 20)]);
        assert_eq!(styles.properties_at(3).unwrap().value(FONT_SIZE), Some(10));
        assert_eq!(styles.properties_at(4).unwrap().value(FONT_SIZE), Some(20));
        assert!(matches!(
            styles.properties_at(10),
            Err(PptError::OutOfRange {
                offset: 10,
                covered: 10
            })
        ));

        styles.split_at(4).unwrap();
        assert_eq!(styles.len(), 2);
        styles.split_at(7).unwrap();
        assert_eq!(styles.len(), 3);
        assert_eq!(styles.entries()[1].characters_covered, 3);
        assert_eq!(styles.entries()[2].characters_covered, 3);
        assert_eq!(styles.entries()[1], styles.entries()[2]);
        assert_eq!(styles.total_covered(), 10);
    }

    #[test]
    fn test_resize_touches_one_entry() {
        let mut styles = StyleCollection::new(vec![char_style(4, 10), char_style(6, 20)]);
        styles.resize(5, 2).unwrap();
        assert_eq!(styles.entries()[0].characters_covered, 9);
        assert_eq!(styles.entries()[1].characters_covered, 6);

        styles.resize(-2, 15).unwrap();
        assert_eq!(styles.entries()[1].characters_covered, 4);
        assert!(styles.resize(-20, 0).is_err());
        assert!(styles.resize(i64::from(u32::MAX), 0).is_err());
        assert_eq!(styles.entries()[0].characters_covered, 9);
    }

    #[test]
    fn test_coverage_beyond_u32() {
        let mut styles =
            StyleCollection::new(vec![char_style(5, 10), char_style(u32::MAX, 20)]);
        assert_eq!(styles.total_covered(), u64::from(u32::MAX) + 5);
        assert_eq!(styles.properties_at(100).unwrap().value(FONT_SIZE), Some(20));
        assert_eq!(styles.properties_at(u32::MAX).unwrap().value(FONT_SIZE), Some(20));

        styles.split_at(100).unwrap();
        assert_eq!(styles.len(), 3);
        assert_eq!(styles.entries()[1].characters_covered, 95);
        assert_eq!(styles.entries()[2].characters_covered, u32::MAX - 95);

        let mut merged = StyleCollection::default();
        merged.push_merged(char_style(u32::MAX, 10));
        merged.push_merged(char_style(7, 10));
        assert_eq!(merged.entries()[0].characters_covered, u32::MAX);
    }

    #[test]
    fn test_push_merged() {
        let mut styles = StyleCollection::default();
        styles.push_merged(char_style(2, 10));
        styles.push_merged(char_style(3, 10));
        styles.push_merged(char_style(1, 12));
        assert_eq!(styles.len(), 2);
        assert_eq!(styles.entries()[0].characters_covered, 5);
    }
}
