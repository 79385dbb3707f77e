//! Record streams shared by the text model tests.

use crate::ole::consts::PptRecordType;
use crate::ole::ppt::records::RecordBuilder;
use crate::ole::ppt::text::codec::{TextAtom, TextEncoding};

pub(crate) fn atom(kind: PptRecordType, instance: u16, data: &[u8]) -> Vec<u8> {
    let mut builder = RecordBuilder::new(0, instance, kind as u16);
    builder.write_data(data);
    builder.build()
}

pub(crate) fn container(kind: PptRecordType, children: &[Vec<u8>]) -> Vec<u8> {
    let mut builder = RecordBuilder::container(0, kind as u16);
    for child in children {
        builder.write_child(child);
    }
    builder.build()
}

pub(crate) fn text_header(text_type: u32) -> Vec<u8> {
    atom(PptRecordType::TextHeaderAtom, 0, &text_type.to_le_bytes())
}

pub(crate) fn text_bytes(text: &str) -> Vec<u8> {
    let encoded = TextAtom::encode_as(text, TextEncoding::Narrow).unwrap_or_else(TextAtom::empty);
    atom(PptRecordType::TextBytesAtom, 0, encoded.payload())
}

pub(crate) fn text_chars(text: &str) -> Vec<u8> {
    let encoded = TextAtom::encode_as(text, TextEncoding::Wide).unwrap_or_else(TextAtom::empty);
    atom(PptRecordType::TextCharsAtom, 0, encoded.payload())
}

pub(crate) fn persist_atom(slide_id: u32) -> Vec<u8> {
    let mut data = Vec::with_capacity(20);
    data.extend_from_slice(&1u32.to_le_bytes()); // persist reference
    data.extend_from_slice(&0u32.to_le_bytes()); // flags
    data.extend_from_slice(&2i32.to_le_bytes()); // text count
    data.extend_from_slice(&slide_id.to_le_bytes());
    data.extend_from_slice(&0u32.to_le_bytes());
    atom(PptRecordType::SlidePersistAtom, 0, &data)
}

/// Paragraph entry: count, indent, mask, prop bytes.
pub(crate) type ParaEntry = (u32, u16, u32, Vec<u8>);
/// Character entry: count, mask, prop bytes.
pub(crate) type CharEntry = (u32, u32, Vec<u8>);

pub(crate) fn style_atom(paragraphs: &[ParaEntry], characters: &[CharEntry]) -> Vec<u8> {
    let mut data = Vec::new();
    for (count, indent, mask, props) in paragraphs {
        data.extend_from_slice(&count.to_le_bytes());
        data.extend_from_slice(&indent.to_le_bytes());
        data.extend_from_slice(&mask.to_le_bytes());
        data.extend_from_slice(props);
    }
    for (count, mask, props) in characters {
        data.extend_from_slice(&count.to_le_bytes());
        data.extend_from_slice(&mask.to_le_bytes());
        data.extend_from_slice(props);
    }
    atom(PptRecordType::StyleTextPropAtom, 0, &data)
}

pub(crate) const BASIC_TITLE: &str = "This is a test title";
pub(crate) const BASIC_BODY: &str = "This is a test subtitle\rThis is on page 1";

/// One slide with an unstyled title and body, both narrow.
pub(crate) fn basic_slide_list() -> Vec<u8> {
    container(
        PptRecordType::SlideListWithText,
        &[
            persist_atom(256),
            text_header(0),
            text_bytes(BASIC_TITLE),
            text_header(1),
            text_bytes(BASIC_BODY),
        ],
    )
}

pub(crate) const RICH_TITLE: &str = "This is a title, it\u{2019}s in black";
pub(crate) const RICH_SUBTITLE: [&str; 3] = [
    "This is the subtitle, in bold\r",
    "This bit is blue and italic\r",
    "This bit is red (normal)",
];

/// One slide whose subtitle has three differently styled paragraphs.
pub(crate) fn rich_slide_list() -> Vec<u8> {
    let mut bold_32 = Vec::new();
    bold_32.extend_from_slice(&1u16.to_le_bytes());
    bold_32.extend_from_slice(&32u16.to_le_bytes());
    let mut blue_italic = Vec::new();
    blue_italic.extend_from_slice(&2u16.to_le_bytes());
    blue_italic.extend_from_slice(&0xFEFF_0000u32.to_le_bytes());
    let red = 0xFE00_00FFu32.to_le_bytes().to_vec();

    container(
        PptRecordType::SlideListWithText,
        &[
            persist_atom(256),
            text_header(0),
            text_chars(RICH_TITLE),
            text_header(1),
            text_bytes(&RICH_SUBTITLE.concat()),
            style_atom(
                &[(83, 0, 0x0800, 1u16.to_le_bytes().to_vec())],
                &[
                    (30, 0x0002_0001, bold_32),
                    (28, 0x0004_0002, blue_italic),
                    (25, 0x0004_0000, red),
                ],
            ),
        ],
    )
}

pub(crate) const UNDERCOUNT_BODY: [&str; 5] = [
    "Sdfsdfsdf\r",
    "Dfgdfg\r",
    "Dfgdfgdfg\r",
    "Sdfsdfs\r",
    "Sdfsdf\r",
];

/// Body whose last paragraph style entry undercounts the text.
pub(crate) fn undercounted_slide_list() -> Vec<u8> {
    container(
        PptRecordType::SlideListWithText,
        &[
            persist_atom(256),
            text_header(0),
            text_bytes("sdfsdfsdf"),
            text_header(1),
            text_bytes(&UNDERCOUNT_BODY.concat()),
            style_atom(
                &[(27, 0, 0, Vec::new()), (10, 1, 0, Vec::new())],
                &[(43, 0, Vec::new())],
            ),
        ],
    )
}
