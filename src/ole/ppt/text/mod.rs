//! Text model: atoms, blocks, paragraphs and runs.

pub mod block;
pub mod codec;
pub mod paragraph;
pub mod run;

// Re-export commonly used items
pub use block::TextBlock;
pub use codec::{TextAtom, TextEncoding, select_encoding};
pub use paragraph::{TextParagraph, raw_text, set_text, split_paragraphs, text};
pub use run::{TextColor, TextRun};
