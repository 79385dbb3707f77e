/// Constants for PowerPoint record streams
pub mod consts;

/// Legacy PowerPoint presentation (.ppt) text model
///
/// This module parses the record stream of the "PowerPoint Document" stream
/// into an editable tree and exposes the text it contains.
pub mod ppt;
