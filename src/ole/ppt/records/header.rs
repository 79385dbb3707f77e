//! PPT record header codec.
//!
//! Every record starts with an 8-byte little-endian header:
//! - Bytes 0-1: version (low 4 bits) and instance (high 12 bits)
//! - Bytes 2-3: record type
//! - Bytes 4-7: payload length
//!
//! Layout follows the MS-PPT RecordHeader structure.

use std::io::Write;

use crate::common::binary::{read_u16_le, read_u32_le};
use crate::ole::consts::{CONTAINER_VERSION, PptRecordType, RECORD_HEADER_SIZE};
use crate::ole::ppt::error::{PptError, Result};

/// PPT record header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordHeader {
    /// Record version (4 bits)
    pub version: u16,
    /// Record instance (12 bits)
    pub instance: u16,
    /// Raw record type code
    pub record_type: u16,
    /// Record length (payload only, not including header)
    pub length: u32,
}

impl RecordHeader {
    /// Create a new record header
    pub fn new(version: u16, instance: u16, record_type: u16, length: u32) -> Self {
        Self {
            version: version & 0x000F,
            instance: instance & 0x0FFF,
            record_type,
            length,
        }
    }

    /// Read a header at `offset`, failing when fewer than 8 bytes remain.
    pub fn parse(data: &[u8], offset: usize) -> Result<Self> {
        if data.len().saturating_sub(offset) < RECORD_HEADER_SIZE {
            return Err(PptError::corrupt(offset, "not enough data for record header"));
        }
        let truncated = |_| PptError::corrupt(offset, "not enough data for record header");
        let version_instance = read_u16_le(data, offset).map_err(truncated)?;
        let record_type = read_u16_le(data, offset + 2).map_err(truncated)?;
        let length = read_u32_le(data, offset + 4).map_err(truncated)?;

        Ok(Self {
            version: version_instance & 0x000F,
            instance: (version_instance >> 4) & 0x0FFF,
            record_type,
            length,
        })
    }

    /// Known record type for this header, `Unknown` for anything else.
    pub fn kind(&self) -> PptRecordType {
        PptRecordType::from(self.record_type)
    }

    /// Whether the payload is a sequence of child records.
    pub fn is_container(&self) -> bool {
        self.version == CONTAINER_VERSION
    }

    /// Write the header to a writer (8 bytes)
    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        let ver_inst = (self.version & 0x000F) | ((self.instance & 0x0FFF) << 4);
        writer.write_all(&ver_inst.to_le_bytes())?;
        writer.write_all(&self.record_type.to_le_bytes())?;
        writer.write_all(&self.length.to_le_bytes())?;
        Ok(())
    }

    /// Total size including header
    pub fn total_size(&self) -> usize {
        RECORD_HEADER_SIZE + self.length as usize
    }
}

/// Builder for serialized records, used to assemble fixtures and new atoms.
pub struct RecordBuilder {
    header: RecordHeader,
    data: Vec<u8>,
}

impl RecordBuilder {
    /// Create a new record builder
    pub fn new(version: u16, instance: u16, record_type: u16) -> Self {
        Self {
            header: RecordHeader::new(version, instance, record_type, 0),
            data: Vec::new(),
        }
    }

    /// Create a builder for a container record (version 0xF)
    pub fn container(instance: u16, record_type: u16) -> Self {
        Self::new(CONTAINER_VERSION, instance, record_type)
    }

    /// Append payload bytes
    pub fn write_data(&mut self, data: &[u8]) -> &mut Self {
        self.data.extend_from_slice(data);
        self.header.length = self.data.len() as u32;
        self
    }

    /// Append an already serialized child record
    pub fn write_child(&mut self, child: &[u8]) -> &mut Self {
        self.write_data(child)
    }

    /// Build the complete record (header + data)
    pub fn build(&self) -> Vec<u8> {
        let mut record = Vec::with_capacity(self.header.total_size());
        let ver_inst = (self.header.version & 0x000F) | ((self.header.instance & 0x0FFF) << 4);
        record.extend_from_slice(&ver_inst.to_le_bytes());
        record.extend_from_slice(&self.header.record_type.to_le_bytes());
        record.extend_from_slice(&self.header.length.to_le_bytes());
        record.extend_from_slice(&self.data);
        record
    }

    /// Get the current total length
    pub fn len(&self) -> usize {
        self.header.total_size()
    }

    /// Check if the payload is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_packing() {
        let header = RecordHeader::new(0x0F, 3, PptRecordType::Slide as u16, 100);
        let mut out = Vec::new();
        header.write(&mut out).unwrap();
        assert_eq!(out, [0x3F, 0x00, 0xEE, 0x03, 100, 0, 0, 0]);

        let parsed = RecordHeader::parse(&out, 0).unwrap();
        assert_eq!(parsed, header);
        assert!(parsed.is_container());
        assert_eq!(parsed.kind(), PptRecordType::Slide);
        assert_eq!(parsed.total_size(), 108);
    }

    #[test]
    fn test_short_header_is_corrupt() {
        let err = RecordHeader::parse(&[0u8; 7], 0).unwrap_err();
        assert!(matches!(err, PptError::CorruptRecord { offset: 0, .. }));

        let err = RecordHeader::parse(&[0u8; 16], 12).unwrap_err();
        assert!(matches!(err, PptError::CorruptRecord { offset: 12, .. }));
        assert!(RecordHeader::parse(&[0u8; 16], usize::MAX).is_err());
    }

    #[test]
    fn test_record_builder() {
        let mut builder = RecordBuilder::new(0x00, 0, PptRecordType::TextBytesAtom as u16);
        builder.write_data(b"test");
        assert_eq!(builder.len(), 12);

        let record = builder.build();
        assert_eq!(record.len(), 12);
        assert_eq!(&record[2..4], &4008u16.to_le_bytes());
        assert_eq!(&record[4..8], &4u32.to_le_bytes());
    }
}
