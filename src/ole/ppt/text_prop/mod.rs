//! Paragraph and character style properties.
//!
//! - [`defs`]: the property catalogue and packed flag sets
//! - [`collection`]: property collections and range-keyed style lists
//! - [`atom`]: StyleTextPropAtom / MasterTextPropAtom payloads

pub mod atom;
pub mod collection;
pub mod defs;

pub use atom::{IndentRun, MasterTextPropAtom, StyleTextPropAtom};
pub use collection::{PropValue, StyleCollection, TabStop, TextProp, TextPropCollection};
pub use defs::{CharFlags, ParagraphFlags, PropDef, PropSize, TextPropType};
