//! Utilities shared by the record and text layers.

pub mod binary;

pub use binary::{BinaryError, utf16_len};
