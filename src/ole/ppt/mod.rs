/// PowerPoint (.ppt) text model.
///
/// Text in the legacy binary format is spread over sibling records: a
/// TextHeaderAtom opens each block, a TextBytesAtom or TextCharsAtom holds the
/// characters, and optional StyleTextPropAtom / MasterTextPropAtom records
/// describe paragraph and character formatting by character counts.
///
/// # Architecture
///
/// - `RecordTree`: arena of parsed records, written back byte for byte
/// - `TextBlock`: paragraphs and runs of one text header, stored on demand
/// - `TextParagraph`, `TextRun`: the editable model with attached styles
/// - `TextPropCollection`, `StyleCollection`: style tables and their coverage
/// - `Slide`: the text blocks of one slide
///
/// # Example
///
/// ```rust
/// use litchi_pptext::ppt::{RecordTree, TextBlock, TextModelOptions};
///
/// # fn run(stream: &[u8]) -> litchi_pptext::ppt::Result<()> {
/// let mut tree = RecordTree::parse(stream)?;
/// let root = tree.roots()[0];
/// let options = TextModelOptions::default();
///
/// for mut block in TextBlock::find_all(&mut tree, root)? {
///     println!("{}", block.text());
///     for paragraph in block.paragraphs_mut() {
///         for run in paragraph.runs_mut() {
///             run.set_bold(true);
///         }
///     }
///     block.store(&mut tree, &options)?;
/// }
/// # Ok(())
/// # }
/// ```
pub mod error;
pub mod fonts;
pub mod options;
pub mod records;
pub mod slide;
pub mod text;
pub mod text_prop;

#[cfg(test)]
pub(crate) mod fixtures;
#[cfg(test)]
mod proptests;

// Re-export main types for convenience
pub use error::{PptError, Result};
pub use fonts::{FontCollection, FontEntity};
pub use options::TextModelOptions;
pub use records::{
    Record, RecordBuilder, RecordHeader, RecordId, RecordNode, RecordTree, SlideAtomsSet,
    TextHeaderAtom, TextType,
};
pub use slide::Slide;
pub use text::{
    TextAtom, TextBlock, TextColor, TextEncoding, TextParagraph, TextRun, select_encoding,
};
pub use text_prop::{
    CharFlags, ParagraphFlags, StyleCollection, StyleTextPropAtom, TextProp, TextPropCollection,
    TextPropType,
};
