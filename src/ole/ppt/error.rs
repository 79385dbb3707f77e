//! Error types for the PPT text model.
use crate::common::binary::BinaryError;
use thiserror::Error;

/// Errors raised while parsing, querying or rewriting PPT records and text.
#[derive(Error, Debug)]
pub enum PptError {
    /// IO error while writing serialized records
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A record header, style table or text header does not match its payload
    #[error("Corrupt record at offset {offset}: {reason}")]
    CorruptRecord { offset: usize, reason: String },

    /// Character offset beyond what a style table covers
    #[error("Offset {offset} out of range: style covers {covered} characters")]
    OutOfRange { offset: u64, covered: u64 },

    /// Paragraph, run or child index beyond the collection length
    #[error("{what} index {index} out of bounds (len {len})")]
    IndexOutOfBounds {
        what: &'static str,
        index: usize,
        len: usize,
    },

    /// A required record is missing or a handle no longer resolves
    #[error("Record not found: {0}")]
    RecordNotFound(String),
}

impl PptError {
    pub(crate) fn corrupt(offset: usize, reason: impl Into<String>) -> Self {
        PptError::CorruptRecord {
            offset,
            reason: reason.into(),
        }
    }
}

impl From<BinaryError> for PptError {
    fn from(err: BinaryError) -> Self {
        match err {
            BinaryError::InsufficientData {
                expected,
                available,
            } => PptError::corrupt(
                available,
                format!("truncated field, needed {expected} bytes"),
            ),
        }
    }
}

/// Result type for PPT operations.
pub type Result<T> = std::result::Result<T, PptError>;
