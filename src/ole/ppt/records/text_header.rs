//! TextHeaderAtom - the record that opens every text block.
//!
//! The payload is a single u32 naming the kind of text that follows
//! (title, body, notes, ...).

use crate::common::binary::read_u32_le;
use crate::ole::ppt::error::{PptError, Result};

/// TextHeaderAtom text type codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextType {
    /// Title text
    Title,
    /// Body text
    Body,
    /// Notes text
    Notes,
    /// Not used
    NotUsed,
    /// Other (non-placeholder)
    Other,
    /// Center body
    CenterBody,
    /// Center title
    CenterTitle,
    /// Half body
    HalfBody,
    /// Quarter body
    QuarterBody,
    /// Value outside the documented range, preserved as read
    Unknown(u32),
}

impl From<u32> for TextType {
    fn from(value: u32) -> Self {
        match value {
            0 => TextType::Title,
            1 => TextType::Body,
            2 => TextType::Notes,
            3 => TextType::NotUsed,
            4 => TextType::Other,
            5 => TextType::CenterBody,
            6 => TextType::CenterTitle,
            7 => TextType::HalfBody,
            8 => TextType::QuarterBody,
            other => TextType::Unknown(other),
        }
    }
}

impl From<TextType> for u32 {
    fn from(value: TextType) -> Self {
        match value {
            TextType::Title => 0,
            TextType::Body => 1,
            TextType::Notes => 2,
            TextType::NotUsed => 3,
            TextType::Other => 4,
            TextType::CenterBody => 5,
            TextType::CenterTitle => 6,
            TextType::HalfBody => 7,
            TextType::QuarterBody => 8,
            TextType::Unknown(other) => other,
        }
    }
}

/// Decoded TextHeaderAtom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextHeaderAtom {
    /// Kind of text in the block
    pub text_type: TextType,
}

impl TextHeaderAtom {
    /// Payload size in bytes
    pub const SIZE: usize = 4;

    /// Create a header for the given text type.
    pub fn new(text_type: TextType) -> Self {
        Self { text_type }
    }

    /// Parse the 4-byte payload.
    pub fn parse(payload: &[u8], offset: usize) -> Result<Self> {
        if payload.len() != Self::SIZE {
            return Err(PptError::corrupt(
                offset,
                format!("TextHeaderAtom payload is {} bytes, expected 4", payload.len()),
            ));
        }
        let raw = read_u32_le(payload, 0)?;
        Ok(Self {
            text_type: TextType::from(raw),
        })
    }

    /// Serialize the payload.
    pub fn to_bytes(&self) -> [u8; 4] {
        u32::from(self.text_type).to_le_bytes()
    }
}
