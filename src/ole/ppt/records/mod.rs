/// PPT record tree.
///
/// Records are parsed into an arena-backed tree. Text atoms and the text
/// header are decoded eagerly; style atoms stay raw until a text block reads
/// them; everything else is kept as opaque bytes and written back untouched.

pub mod header;
pub mod record;
pub mod slide_atoms_set;
pub mod text_header;
pub mod tree;

// Re-export commonly used types
pub use header::{RecordBuilder, RecordHeader};
pub use record::{Record, RecordId, RecordNode};
pub use slide_atoms_set::{SlideAtomsSet, group_slide_atoms_sets};
pub use text_header::{TextHeaderAtom, TextType};
pub use tree::RecordTree;
