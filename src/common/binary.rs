//! Binary data helpers shared by the record and text-property parsers.
//!
//! All multi-byte values in the PowerPoint binary format are little-endian.
//! Text lengths throughout the model are measured in UTF-16 code units, the
//! unit the on-disk style tables count in.

use thiserror::Error;
use zerocopy::{FromBytes, I16, I32, LE, U16, U32};

/// Binary parsing error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BinaryError {
    /// Not enough data to read the requested type
    #[error("Insufficient data: expected {expected}, got {available}")]
    InsufficientData { expected: usize, available: usize },
}

/// Result type for binary operations
pub type BinaryResult<T> = Result<T, BinaryError>;

#[inline]
fn read_le<T: FromBytes>(data: &[u8], offset: usize) -> BinaryResult<T> {
    let size = std::mem::size_of::<T>();
    let insufficient = || BinaryError::InsufficientData {
        expected: offset.saturating_add(size),
        available: data.len(),
    };
    let end = offset.checked_add(size).ok_or_else(insufficient)?;
    let bytes = data.get(offset..end).ok_or_else(insufficient)?;
    T::read_from_bytes(bytes).map_err(|_| insufficient())
}

/// Read a little-endian u16 from a byte slice at the given offset.
///
/// # Examples
///
/// ```
/// use litchi_pptext::common::binary::read_u16_le;
/// let data = [0x34, 0x12, 0x78, 0x56];
/// assert_eq!(read_u16_le(&data, 0).unwrap(), 0x1234);
/// assert_eq!(read_u16_le(&data, 2).unwrap(), 0x5678);
/// ```
#[inline]
pub fn read_u16_le(data: &[u8], offset: usize) -> BinaryResult<u16> {
    read_le::<U16<LE>>(data, offset).map(|v| v.get())
}

/// Read a little-endian i16 from a byte slice at the given offset.
#[inline]
pub fn read_i16_le(data: &[u8], offset: usize) -> BinaryResult<i16> {
    read_le::<I16<LE>>(data, offset).map(|v| v.get())
}

/// Read a little-endian u32 from a byte slice at the given offset.
///
/// # Examples
///
/// ```
/// use litchi_pptext::common::binary::read_u32_le;
/// let data = [0x78, 0x56, 0x34, 0x12];
/// assert_eq!(read_u32_le(&data, 0).unwrap(), 0x12345678);
/// assert!(read_u32_le(&data, 1).is_err());
/// ```
#[inline]
pub fn read_u32_le(data: &[u8], offset: usize) -> BinaryResult<u32> {
    read_le::<U32<LE>>(data, offset).map(|v| v.get())
}

/// Read a little-endian i32 from a byte slice at the given offset.
#[inline]
pub fn read_i32_le(data: &[u8], offset: usize) -> BinaryResult<i32> {
    read_le::<I32<LE>>(data, offset).map(|v| v.get())
}

/// Length of `text` in UTF-16 code units.
///
/// # Examples
///
/// ```
/// use litchi_pptext::common::binary::utf16_len;
/// assert_eq!(utf16_len("abc"), 3);
/// assert_eq!(utf16_len("\u{1F600}"), 2);
/// ```
#[inline]
pub fn utf16_len(text: &str) -> usize {
    text.chars().map(char::len_utf16).sum()
}

/// Convert an offset in UTF-16 code units to a byte offset into `text`.
///
/// Offsets falling inside a surrogate pair round up to the next character
/// boundary; offsets past the end clamp to `text.len()`.
pub fn utf16_to_byte_offset(text: &str, units: usize) -> usize {
    let mut seen = 0usize;
    for (idx, ch) in text.char_indices() {
        if seen >= units {
            return idx;
        }
        seen += ch.len_utf16();
    }
    text.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_signed() {
        assert_eq!(read_i16_le(&[0xFF, 0xFF], 0).unwrap(), -1);
        assert_eq!(read_i32_le(&[0xFE, 0xFF, 0xFF, 0xFF], 0).unwrap(), -2);
    }

    #[test]
    fn test_insufficient_data() {
        let err = read_u16_le(&[0x01], 0).unwrap_err();
        assert_eq!(
            err,
            BinaryError::InsufficientData {
                expected: 2,
                available: 1
            }
        );
    }

    #[test]
    fn test_offset_past_end() {
        assert!(read_u32_le(&[1, 2, 3, 4], 2).is_err());
        let err = read_u16_le(&[1, 2], usize::MAX).unwrap_err();
        assert_eq!(
            err,
            BinaryError::InsufficientData {
                expected: usize::MAX,
                available: 2
            }
        );
    }

    #[test]
    fn test_utf16_offsets() {
        let text = "a\u{1F600}b";
        assert_eq!(utf16_len(text), 4);
        assert_eq!(utf16_to_byte_offset(text, 0), 0);
        assert_eq!(utf16_to_byte_offset(text, 1), 1);
        // Inside the surrogate pair rounds up to the 'b'
        assert_eq!(utf16_to_byte_offset(text, 2), 5);
        assert_eq!(utf16_to_byte_offset(text, 3), 5);
        assert_eq!(utf16_to_byte_offset(text, 9), text.len());
    }
}
