//! Litchi PPT text - the text model of legacy PowerPoint presentations
//!
//! This library reads, edits and writes back the text of the binary .ppt
//! record stream: paragraphs, styled runs, and the style tables that tie
//! character counts to formatting.
//!
//! # Features
//!
//! - **Record tree**: Parse records into an arena and serialize them unchanged
//! - **Text atoms**: Narrow (TextBytesAtom) and wide (TextCharsAtom) encodings
//!   with automatic promotion
//! - **Styles**: Paragraph and character property collections with exact
//!   character coverage
//! - **Editing**: Replace run or block text while keeping styles consistent
//!
//! # Example - Editing a run
//!
//! ```no_run
//! use litchi_pptext::ppt::{RecordTree, Slide, TextModelOptions};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let stream = std::fs::read("PowerPoint Document.bin")?;
//! let mut tree = RecordTree::parse(&stream)?;
//! let root = tree.roots()[0];
//!
//! let mut slide = Slide::from_container(&mut tree, root)?;
//! for block in slide.text_blocks() {
//!     println!("{:?}: {}", block.text_type(), block.text());
//! }
//!
//! if let Some(block) = slide.text_blocks_mut().first_mut() {
//!     block.set_run_text(0, 0, "Updated title")?;
//! }
//! slide.store(&mut tree, &TextModelOptions::default())?;
//! std::fs::write("PowerPoint Document.out", tree.to_bytes()?)?;
//! # Ok(())
//! # }
//! ```

/// Shared binary helpers
pub mod common;

/// Legacy Office record formats
///
/// The `ole` module holds the record constants and the `ppt` text model.
pub mod ole;

// Re-export commonly used types for convenience
pub use ole::ppt;
