//! Paragraphs and the mapping between raw text and style tables.
//!
//! Raw text separates paragraphs with `\r`; each paragraph keeps its
//! separator in the raw text of its last run. Style tables count UTF-16
//! code units and always cover one character more than the text, the
//! implicit terminator, which is charged to the last paragraph and the last
//! run of the block.

use super::run::TextRun;
use crate::common::binary::{utf16_len, utf16_to_byte_offset};
use crate::ole::consts::PARAGRAPH_SEPARATOR;
use crate::ole::ppt::error::{PptError, Result};
use crate::ole::ppt::text_prop::{
    IndentRun, MasterTextPropAtom, StyleCollection, TextPropCollection, TextPropType,
};

/// A `\r`-terminated paragraph made of styled runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextParagraph {
    runs: Vec<TextRun>,
    paragraph_style: Option<TextPropCollection>,
    style_group: Option<usize>,
    indent_level: u16,
}

impl TextParagraph {
    /// Create an unstyled paragraph holding a single run.
    pub fn new(raw_text: impl Into<String>) -> Self {
        Self {
            runs: vec![TextRun::new(raw_text)],
            ..Self::default()
        }
    }

    pub fn runs(&self) -> &[TextRun] {
        &self.runs
    }

    pub fn runs_mut(&mut self) -> &mut Vec<TextRun> {
        &mut self.runs
    }

    /// Concatenated raw text of the runs.
    pub fn raw_text(&self) -> String {
        self.runs.iter().map(TextRun::raw_text).collect()
    }

    /// Length in UTF-16 code units.
    pub fn len(&self) -> usize {
        self.runs.iter().map(TextRun::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.iter().all(TextRun::is_empty)
    }

    pub fn indent_level(&self) -> u16 {
        self.indent_level
    }

    pub fn set_indent_level(&mut self, level: u16) {
        self.indent_level = level;
        if let Some(style) = &mut self.paragraph_style {
            style.indent_level = level;
        }
    }

    pub fn paragraph_style(&self) -> Option<&TextPropCollection> {
        self.paragraph_style.as_ref()
    }

    pub fn paragraph_style_mut(&mut self) -> &mut TextPropCollection {
        let indent = self.indent_level;
        self.paragraph_style.get_or_insert_with(|| {
            let mut style = TextPropCollection::new(TextPropType::Paragraph, 0);
            style.indent_level = indent;
            style
        })
    }

    /// Split run `run` at UTF-16 offset `at` within it.
    ///
    /// Both halves carry the run's character style, its coverage divided at
    /// the split point. Offsets at either end of the run, or inside a
    /// surrogate pair at its end, leave the runs unchanged.
    pub fn split_run(&mut self, run: usize, at: usize) -> Result<()> {
        let run_count = self.runs.len();
        let target = self.runs.get(run).ok_or(PptError::IndexOutOfBounds {
            what: "run",
            index: run,
            len: run_count,
        })?;
        let len = target.len();
        if at > len {
            return Err(PptError::OutOfRange {
                offset: at as u64,
                covered: len as u64,
            });
        }
        let byte = utf16_to_byte_offset(target.raw_text(), at);
        if at == 0 || byte == target.raw_text().len() {
            return Ok(());
        }
        let head_len = utf16_len(&target.raw_text()[..byte]) as u32;

        let (head_style, tail_style) = match target.character_style() {
            Some(style) => {
                let mut styles = StyleCollection::new(vec![style.clone()]);
                styles.split_at(head_len)?;
                let mut parts = styles.into_entries().into_iter();
                let head = parts.next();
                let tail = parts.next().or_else(|| {
                    head.clone().map(|mut s| {
                        s.characters_covered = 0;
                        s
                    })
                });
                (head, tail)
            },
            None => (None, None),
        };

        let target = &mut self.runs[run];
        let tail_text = target.raw_text_mut().split_off(byte);
        target.set_character_style(head_style);
        let mut tail = TextRun::new(tail_text);
        tail.set_character_style(tail_style);
        self.runs.insert(run + 1, tail);
        Ok(())
    }

    /// Index of the style table entry this paragraph's style came from.
    ///
    /// Paragraphs read from one entry share a group even after their copies
    /// of the style are edited independently.
    pub fn style_group(&self) -> Option<usize> {
        self.style_group
    }
}

/// Split raw text into paragraphs, one unstyled run each.
///
/// Empty text yields a single empty paragraph; a trailing separator does not
/// open a new paragraph.
pub fn split_paragraphs(raw: &str) -> Vec<TextParagraph> {
    split_raw(raw).into_iter().map(TextParagraph::new).collect()
}

fn split_raw(raw: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut start = 0;
    for pos in memchr::memchr_iter(PARAGRAPH_SEPARATOR as u8, raw.as_bytes()) {
        segments.push(&raw[start..=pos]);
        start = pos + 1;
    }
    if start < raw.len() || segments.is_empty() {
        segments.push(&raw[start..]);
    }
    segments
}

/// Raw text of a paragraph list, separators kept as `\r`.
pub fn raw_text(paragraphs: &[TextParagraph]) -> String {
    paragraphs.iter().map(TextParagraph::raw_text).collect()
}

/// Display text of a paragraph list: every `\r` becomes `\n`.
pub fn text(paragraphs: &[TextParagraph]) -> String {
    raw_text(paragraphs).replace(PARAGRAPH_SEPARATOR, "\n")
}

/// Replace the whole text of a paragraph list.
///
/// The first paragraph style and first character style survive; every other
/// paragraph and run is rebuilt, one run per paragraph.
pub fn set_text(paragraphs: &mut Vec<TextParagraph>, raw: &str) {
    let first = paragraphs.first();
    let paragraph_style = first.and_then(|p| p.paragraph_style.clone());
    let style_group = first.and_then(|p| p.style_group);
    let indent_level = first.map_or(0, |p| p.indent_level);
    let run_style = first
        .and_then(|p| p.runs.first())
        .and_then(|r| r.character_style().cloned());

    *paragraphs = split_raw(raw)
        .into_iter()
        .map(|segment| TextParagraph {
            runs: vec![TextRun::with_style(segment, run_style.clone())],
            paragraph_style: paragraph_style.clone(),
            style_group,
            indent_level,
        })
        .collect();
}

/// Attach paragraph style entries to paragraphs.
///
/// The last entry covers whatever remains, so an undercounting table still
/// styles every paragraph.
pub(crate) fn apply_paragraph_styles(
    paragraphs: &mut [TextParagraph],
    styles: &[TextPropCollection],
) {
    let count = paragraphs.len();
    let mut idx = 0;
    for (group, style) in styles.iter().enumerate() {
        let is_last = group + 1 == styles.len();
        let declared = u64::from(style.characters_covered);
        let mut covered = 0u64;
        while idx < count && (is_last || covered < declared) {
            let para = &mut paragraphs[idx];
            let mut len = para.len() as u64;
            if idx + 1 == count {
                len += 1;
            }
            let mut copy = style.clone();
            copy.characters_covered = len as u32;
            para.indent_level = style.indent_level;
            para.paragraph_style = Some(copy);
            para.style_group = Some(group);
            covered += len;
            idx += 1;
        }
        if is_last && covered > declared {
            log::warn!(
                "last paragraph style covers {declared} characters, extended to {covered}"
            );
        }
    }
}

/// Split runs at character style boundaries and attach the styles.
///
/// Mirrors [`apply_paragraph_styles`]: the last entry covers the remainder.
/// A table with entries left over once the text is exhausted gets a single
/// empty trailing run carrying the last entry.
pub(crate) fn apply_character_styles(
    paragraphs: &mut [TextParagraph],
    styles: &[TextPropCollection],
) {
    let Some(last_style) = styles.last() else {
        return;
    };
    let para_count = paragraphs.len();
    let mut para_idx = 0;
    let mut run_idx = 0;

    'styles: for (i, style) in styles.iter().enumerate() {
        let is_last = i + 1 == styles.len();
        let declared = style.characters_covered as usize;
        let mut covered = 0usize;

        while is_last || covered < declared {
            let Some(para) = paragraphs.get_mut(para_idx) else {
                break 'styles;
            };

            if !is_last && covered + para.runs[run_idx].len() > declared {
                let keep = declared - covered;
                let run = &mut para.runs[run_idx];
                let at = utf16_to_byte_offset(run.raw_text(), keep);
                let tail = run.raw_text_mut().split_off(at);
                if !tail.is_empty() {
                    para.runs.insert(run_idx + 1, TextRun::new(tail));
                }
            }

            let runs_in_para = para.runs.len();
            let run = &mut para.runs[run_idx];
            let len = run.len();
            covered += len;
            let mut copy = style.clone();
            copy.characters_covered = len as u32;

            let end_of_text = para_idx + 1 == para_count && run_idx + 1 == runs_in_para;
            if end_of_text && is_last {
                copy.characters_covered += 1;
            }
            run.set_character_style(Some(copy));

            if end_of_text {
                if !is_last {
                    log::warn!(
                        "character styles outlast the text, adding an empty trailing run"
                    );
                    let mut terminator = last_style.clone();
                    terminator.characters_covered = 1;
                    let mut empty = TextRun::new(String::new());
                    empty.set_character_style(Some(terminator));
                    para.runs.push(empty);
                }
                break 'styles;
            }

            run_idx += 1;
            if run_idx == para.runs.len() {
                para_idx += 1;
                run_idx = 0;
            }
        }
    }
}

/// Apply MasterTextPropAtom indent levels, walking paragraphs like the
/// paragraph style table.
pub(crate) fn apply_indents(paragraphs: &mut [TextParagraph], master: &MasterTextPropAtom) {
    let count = paragraphs.len();
    let mut idx = 0;
    for (i, run) in master.runs.iter().enumerate() {
        let is_last = i + 1 == master.runs.len();
        let declared = u64::from(run.characters_covered);
        let mut covered = 0u64;
        while idx < count && (is_last || covered < declared) {
            let mut len = paragraphs[idx].len() as u64;
            if idx + 1 == count {
                len += 1;
            }
            paragraphs[idx].set_indent_level(run.indent_level);
            covered += len;
            idx += 1;
        }
    }
}

/// Paragraph style table for `paragraphs`, adjacent equal styles merged.
pub(crate) fn collect_paragraph_styles(paragraphs: &[TextParagraph]) -> StyleCollection {
    let mut styles = StyleCollection::default();
    for (idx, para) in paragraphs.iter().enumerate() {
        let mut len = para.len() as u32;
        if idx + 1 == paragraphs.len() {
            len += 1;
        }
        let mut entry = para
            .paragraph_style
            .clone()
            .unwrap_or_else(|| TextPropCollection::new(TextPropType::Paragraph, 0));
        entry.indent_level = para.indent_level;
        entry.characters_covered = len;
        styles.push_merged(entry);
    }
    styles
}

/// Character style table for `paragraphs`, adjacent equal styles merged.
pub(crate) fn collect_character_styles(paragraphs: &[TextParagraph]) -> StyleCollection {
    let mut styles = StyleCollection::default();
    let total = paragraphs.iter().map(|p| p.runs.len()).sum::<usize>();
    for (idx, run) in paragraphs.iter().flat_map(|p| p.runs.iter()).enumerate() {
        let mut len = run.len() as u32;
        if idx + 1 == total {
            len += 1;
        }
        if len == 0 {
            continue;
        }
        let mut entry = run
            .character_style()
            .cloned()
            .unwrap_or_else(|| TextPropCollection::new(TextPropType::Character, 0));
        entry.characters_covered = len;
        styles.push_merged(entry);
    }
    styles
}

/// MasterTextPropAtom contents for `paragraphs`.
pub(crate) fn collect_indents(paragraphs: &[TextParagraph]) -> MasterTextPropAtom {
    let mut master = MasterTextPropAtom::default();
    for (idx, para) in paragraphs.iter().enumerate() {
        let mut len = para.len() as u32;
        if idx + 1 == paragraphs.len() {
            len += 1;
        }
        master.push_merged(IndentRun {
            characters_covered: len,
            indent_level: para.indent_level,
        });
    }
    master
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ole::ppt::text_prop::CharFlags;
    use crate::ole::ppt::text_prop::defs::{ALIGNMENT, FONT_SIZE};

    fn para_style(covered: u32, indent: u16) -> TextPropCollection {
        let mut s = TextPropCollection::new(TextPropType::Paragraph, covered);
        s.indent_level = indent;
        s.set_value(ALIGNMENT, 1);
        s
    }

    fn char_style(covered: u32, size: u32) -> TextPropCollection {
        let mut s = TextPropCollection::new(TextPropType::Character, covered);
        s.set_value(FONT_SIZE, size);
        s
    }

    const SUBTITLE: &str =
        "This is the subtitle, in bold\rThis bit is blue and italic\rThis bit is red (normal)";

    #[test]
    fn test_split_paragraphs() {
        let paras = split_paragraphs("a\rb\rc");
        assert_eq!(paras.len(), 3);
        assert_eq!(paras[0].raw_text(), "a\r");
        assert_eq!(paras[2].raw_text(), "c");

        let paras = split_paragraphs("a\r");
        assert_eq!(paras.len(), 1);
        assert_eq!(paras[0].raw_text(), "a\r");

        let paras = split_paragraphs("");
        assert_eq!(paras.len(), 1);
        assert!(paras[0].is_empty());
    }

    #[test]
    fn test_text_vs_raw_text() {
        let paras = split_paragraphs("This is a test subtitle\rThis is on page 1");
        assert_eq!(raw_text(&paras), "This is a test subtitle\rThis is on page 1");
        assert_eq!(text(&paras), "This is a test subtitle\nThis is on page 1");
    }

    #[test]
    fn test_rich_subtitle_runs() {
        let mut paras = split_paragraphs(SUBTITLE);
        apply_paragraph_styles(&mut paras, &[para_style(83, 0)]);
        apply_character_styles(
            &mut paras,
            &[char_style(30, 32), char_style(28, 28), char_style(25, 24)],
        );

        assert_eq!(paras.len(), 3);
        let runs: Vec<&TextRun> = paras.iter().map(|p| &p.runs()[0]).collect();
        assert_eq!(runs[0].raw_text(), "This is the subtitle, in bold\r");
        assert_eq!(runs[1].raw_text(), "This bit is blue and italic\r");
        assert_eq!(runs[2].raw_text(), "This bit is red (normal)");
        assert_eq!(runs[2].character_style().unwrap().characters_covered, 25);

        // One paragraph entry shared by all three
        assert!(paras.iter().all(|p| p.style_group() == Some(0)));
        assert_eq!(paras[0].paragraph_style(), paras[2].paragraph_style());
        assert_ne!(runs[0].character_style(), runs[1].character_style());

        assert_eq!(collect_character_styles(&paras).total_covered(), 83);
        assert_eq!(collect_paragraph_styles(&paras).len(), 1);
    }

    #[test]
    fn test_character_styles_split_inside_paragraph() {
        let mut paras = split_paragraphs("Hello world\rnext");
        apply_character_styles(&mut paras, &[char_style(6, 10), char_style(11, 20)]);
        assert_eq!(paras[0].runs().len(), 2);
        assert_eq!(paras[0].runs()[0].raw_text(), "Hello ");
        assert_eq!(paras[0].runs()[1].raw_text(), "world\r");
        assert_eq!(paras[1].runs().len(), 1);
        assert_eq!(paras[1].runs()[0].character_style().unwrap().characters_covered, 5);
        assert_eq!(raw_text(&paras), "Hello world\rnext");
    }

    #[test]
    fn test_undercounting_paragraph_styles() {
        let texts = ["Sdfsdfsdf\r", "Dfgdfg\r", "Dfgdfgdfg\r", "Sdfsdfs\r", "Sdfsdf\r"];
        let mut paras = split_paragraphs(&texts.concat());
        assert_eq!(paras.len(), 5);
        apply_paragraph_styles(&mut paras, &[para_style(27, 0), para_style(10, 1)]);

        let indents: Vec<u16> = paras.iter().map(TextParagraph::indent_level).collect();
        assert_eq!(indents, vec![0, 0, 0, 1, 1]);
        for (para, expected) in paras.iter().zip(texts) {
            assert_eq!(para.runs()[0].raw_text(), expected);
        }
        assert_eq!(paras[4].style_group(), Some(1));
    }

    #[test]
    fn test_leftover_character_styles_add_empty_run() {
        let mut paras = split_paragraphs("abc");
        apply_character_styles(&mut paras, &[char_style(3, 10), char_style(1, 20)]);
        let runs = paras[0].runs();
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].character_style().unwrap().characters_covered, 3);
        assert!(runs[1].is_empty());
        assert_eq!(runs[1].character_style().unwrap().value(FONT_SIZE), Some(20));

        let table = collect_character_styles(&paras);
        assert_eq!(table.len(), 2);
        assert_eq!(table.entries()[1].characters_covered, 1);
    }

    #[test]
    fn test_set_text_keeps_first_styles() {
        let mut paras = split_paragraphs(SUBTITLE);
        apply_paragraph_styles(&mut paras, &[para_style(83, 2)]);
        let mut bold = char_style(30, 32);
        bold.set_char_flag(CharFlags::BOLD, true);
        apply_character_styles(&mut paras, &[bold, char_style(53, 12)]);

        set_text(&mut paras, "One\rTwo");
        assert_eq!(paras.len(), 2);
        assert_eq!(raw_text(&paras), "One\rTwo");
        for para in &paras {
            assert_eq!(para.runs().len(), 1);
            assert_eq!(para.indent_level(), 2);
            assert!(para.runs()[0].is_bold());
        }
        assert_eq!(paras[0].runs()[0].character_style().unwrap().characters_covered, 4);
    }

    #[test]
    fn test_master_indents() {
        let mut paras = split_paragraphs("aa\rbb\rcc");
        let master = MasterTextPropAtom {
            runs: vec![
                IndentRun {
                    characters_covered: 3,
                    indent_level: 0,
                },
                IndentRun {
                    characters_covered: 2,
                    indent_level: 2,
                },
            ],
        };
        apply_indents(&mut paras, &master);
        let indents: Vec<u16> = paras.iter().map(TextParagraph::indent_level).collect();
        assert_eq!(indents, vec![0, 2, 2]);

        let regenerated = collect_indents(&paras);
        assert_eq!(regenerated.runs.len(), 2);
        assert_eq!(regenerated.runs[1].characters_covered, 6);
    }
    #[test]
    fn test_split_run_divides_coverage() {
        // Last run of a block also covers the terminator
        let mut style = TextPropCollection::new(TextPropType::Character, 11);
        style.set_char_flag(CharFlags::BOLD, true);
        let mut run = TextRun::new("Bold text\r");
        run.set_character_style(Some(style));
        let mut para = TextParagraph::default();
        para.runs_mut().push(run);

        para.split_run(0, 4).unwrap();
        assert_eq!(para.runs().len(), 2);
        assert_eq!(para.runs()[0].raw_text(), "Bold");
        assert_eq!(para.runs()[1].raw_text(), " text\r");
        assert_eq!(para.runs()[0].character_style().unwrap().characters_covered, 4);
        assert_eq!(para.runs()[1].character_style().unwrap().characters_covered, 7);
        assert!(para.runs()[1].is_bold());

        para.split_run(1, 0).unwrap();
        para.split_run(1, 6).unwrap();
        assert_eq!(para.runs().len(), 2);
        assert!(matches!(
            para.split_run(1, 7),
            Err(PptError::OutOfRange { offset: 7, covered: 6 })
        ));
        assert!(matches!(
            para.split_run(5, 1),
            Err(PptError::IndexOutOfBounds { what: "run", .. })
        ));
    }
}
