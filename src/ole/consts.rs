// PowerPoint Binary File Format (MS-PPT) constants

/// Length of a record header in bytes
pub const RECORD_HEADER_SIZE: usize = 8;

/// Version nibble that marks a record as a container of child records
pub const CONTAINER_VERSION: u16 = 0x0F;

/// Paragraph separator inside raw text
pub const PARAGRAPH_SEPARATOR: char = '\r';

/// Index byte of a ColorIndexStruct holding an sRGB value
pub const SRGB_COLOR_INDEX: u8 = 0xFE;

/// PPT record types used by the text model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum PptRecordType {
    /// Unknown record type, kept as an opaque atom or container
    Unknown = 0,
    /// Document record
    Document = 1000,
    /// Slide record
    Slide = 1006,
    /// Notes record
    Notes = 1008,
    /// Environment record
    Environment = 1010,
    /// Slide persist atom record
    SlidePersistAtom = 1011,
    /// Main master record
    MainMaster = 1016,
    /// PPDrawing record (Escher drawing container)
    PPDrawing = 1036,
    /// Font collection container
    FontCollection = 2005,
    /// Outline text reference atom
    OutlineTextRefAtom = 3998,
    /// Text header atom
    TextHeaderAtom = 3999,
    /// Wide (UTF-16LE) text atom
    TextCharsAtom = 4000,
    /// Style text property atom
    StyleTextPropAtom = 4001,
    /// Master text property atom (paragraph indent levels)
    MasterTextPropAtom = 4002,
    /// Text ruler atom
    TextRulerAtom = 4006,
    /// Narrow (8-bit) text atom
    TextBytesAtom = 4008,
    /// Text special info atom
    TextSpecInfoAtom = 4010,
    /// Font entity atom
    FontEntityAtom = 4023,
    /// CString record
    CString = 4026,
    /// Slide list with text container
    SlideListWithText = 4080,
    /// Escher client textbox (holds PPT text records)
    EscherClientTextbox = 0xF00D,
}

impl From<u16> for PptRecordType {
    fn from(value: u16) -> Self {
        match value {
            1000 => PptRecordType::Document,
            1006 => PptRecordType::Slide,
            1008 => PptRecordType::Notes,
            1010 => PptRecordType::Environment,
            1011 => PptRecordType::SlidePersistAtom,
            1016 => PptRecordType::MainMaster,
            1036 => PptRecordType::PPDrawing,
            2005 => PptRecordType::FontCollection,
            3998 => PptRecordType::OutlineTextRefAtom,
            3999 => PptRecordType::TextHeaderAtom,
            4000 => PptRecordType::TextCharsAtom,
            4001 => PptRecordType::StyleTextPropAtom,
            4002 => PptRecordType::MasterTextPropAtom,
            4006 => PptRecordType::TextRulerAtom,
            4008 => PptRecordType::TextBytesAtom,
            4010 => PptRecordType::TextSpecInfoAtom,
            4023 => PptRecordType::FontEntityAtom,
            4026 => PptRecordType::CString,
            4080 => PptRecordType::SlideListWithText,
            0xF00D => PptRecordType::EscherClientTextbox,
            _ => PptRecordType::Unknown,
        }
    }
}
