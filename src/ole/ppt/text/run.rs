//! Styled text runs.
//!
//! A run is the longest stretch of a paragraph sharing one character style.
//! Its raw text keeps paragraph separators exactly as stored.

use crate::common::binary::utf16_len;
use crate::ole::consts::SRGB_COLOR_INDEX;
use crate::ole::ppt::error::Result;
use crate::ole::ppt::fonts::FontCollection;
use crate::ole::ppt::options::TextModelOptions;
use crate::ole::ppt::records::RecordTree;
use crate::ole::ppt::text_prop::defs::{FONT_COLOR, FONT_INDEX, FONT_SIZE};
use crate::ole::ppt::text_prop::{CharFlags, StyleCollection, TextPropCollection, TextPropType};

/// Font color of a run.
///
/// Stored on disk as a ColorIndexStruct: red, green, blue, then an index
/// byte that is either a color scheme slot (0-7) or `0xFE` for plain sRGB.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextColor {
    /// Explicit red, green and blue components
    Rgb { r: u8, g: u8, b: u8 },
    /// Slot of the slide's color scheme
    Scheme(u8),
}

impl TextColor {
    /// Black color
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    /// Create an RGB color
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        TextColor::Rgb { r, g, b }
    }

    /// Decode a ColorIndexStruct; `None` for undefined colors.
    pub fn from_raw(value: u32) -> Option<Self> {
        let index = (value >> 24) as u8;
        match index {
            0..=7 => Some(TextColor::Scheme(index)),
            SRGB_COLOR_INDEX => Some(TextColor::Rgb {
                r: (value & 0xFF) as u8,
                g: ((value >> 8) & 0xFF) as u8,
                b: ((value >> 16) & 0xFF) as u8,
            }),
            _ => None,
        }
    }

    /// Encode as a ColorIndexStruct.
    pub fn to_raw(self) -> u32 {
        match self {
            TextColor::Rgb { r, g, b } => {
                u32::from(r)
                    | (u32::from(g) << 8)
                    | (u32::from(b) << 16)
                    | (u32::from(SRGB_COLOR_INDEX) << 24)
            },
            TextColor::Scheme(index) => u32::from(index) << 24,
        }
    }
}

impl Default for TextColor {
    fn default() -> Self {
        Self::BLACK
    }
}

/// A run of text sharing one character style.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextRun {
    raw_text: String,
    character_style: Option<TextPropCollection>,
}

impl TextRun {
    /// Create an unstyled run.
    pub fn new(raw_text: impl Into<String>) -> Self {
        Self {
            raw_text: raw_text.into(),
            character_style: None,
        }
    }

    /// Create a run carrying `style`, with coverage set to the text length.
    pub fn with_style(raw_text: impl Into<String>, style: Option<TextPropCollection>) -> Self {
        let mut run = Self::new(raw_text);
        let covered = run.len() as u32;
        run.character_style = style.map(|mut s| {
            s.characters_covered = covered;
            s
        });
        run
    }

    /// Text as stored, separators included.
    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    pub(crate) fn raw_text_mut(&mut self) -> &mut String {
        &mut self.raw_text
    }

    /// Length in UTF-16 code units.
    pub fn len(&self) -> usize {
        utf16_len(&self.raw_text)
    }

    pub fn is_empty(&self) -> bool {
        self.raw_text.is_empty()
    }

    /// Replace the run's text verbatim.
    ///
    /// Siblings and the paragraph style are left alone; the character style
    /// grows or shrinks by the length difference. Fails with
    /// [`PptError::OutOfRange`](crate::ole::ppt::PptError::OutOfRange),
    /// leaving the run unchanged, when the style covers fewer characters
    /// than the shrink removes.
    pub fn set_text(&mut self, text: impl Into<String>) -> Result<()> {
        let text = text.into();
        let delta = utf16_len(&text) as i64 - self.len() as i64;
        if let Some(style) = self.character_style.take() {
            let mut styles = StyleCollection::new(vec![style]);
            let resized = styles.resize(delta, 0);
            self.character_style = styles.into_entries().pop();
            resized?;
        }
        self.raw_text = text;
        Ok(())
    }

    pub fn character_style(&self) -> Option<&TextPropCollection> {
        self.character_style.as_ref()
    }

    pub fn set_character_style(&mut self, style: Option<TextPropCollection>) {
        self.character_style = style;
    }

    fn style_mut(&mut self) -> &mut TextPropCollection {
        let covered = self.len() as u32;
        self.character_style
            .get_or_insert_with(|| TextPropCollection::new(TextPropType::Character, covered))
    }

    fn flag(&self, flag: CharFlags) -> bool {
        self.character_style
            .as_ref()
            .is_some_and(|s| s.char_flag(flag))
    }

    pub fn is_bold(&self) -> bool {
        self.flag(CharFlags::BOLD)
    }

    pub fn set_bold(&mut self, bold: bool) {
        self.style_mut().set_char_flag(CharFlags::BOLD, bold);
    }

    pub fn is_italic(&self) -> bool {
        self.flag(CharFlags::ITALIC)
    }

    pub fn set_italic(&mut self, italic: bool) {
        self.style_mut().set_char_flag(CharFlags::ITALIC, italic);
    }

    pub fn is_underlined(&self) -> bool {
        self.flag(CharFlags::UNDERLINE)
    }

    pub fn set_underlined(&mut self, underline: bool) {
        self.style_mut()
            .set_char_flag(CharFlags::UNDERLINE, underline);
    }

    /// Font size in points, falling back to `options.default_font_size`.
    pub fn font_size(&self, options: &TextModelOptions) -> u16 {
        self.character_style
            .as_ref()
            .and_then(|s| s.value(FONT_SIZE))
            .map_or(options.default_font_size, |v| v as u16)
    }

    pub fn set_font_size(&mut self, points: u16) {
        self.style_mut().set_value(FONT_SIZE, u32::from(points));
    }

    /// Font color, black when unset or undefined.
    pub fn font_color(&self) -> TextColor {
        self.character_style
            .as_ref()
            .and_then(|s| s.value(FONT_COLOR))
            .and_then(TextColor::from_raw)
            .unwrap_or_default()
    }

    pub fn set_font_color(&mut self, color: TextColor) {
        self.style_mut().set_value(FONT_COLOR, color.to_raw());
    }

    /// Index into the document font table, if set.
    pub fn font_index(&self) -> Option<u16> {
        self.character_style
            .as_ref()
            .and_then(|s| s.value(FONT_INDEX))
            .map(|v| v as u16)
    }

    pub fn set_font_index(&mut self, index: u16) {
        self.style_mut().set_value(FONT_INDEX, u32::from(index));
    }

    /// Font family resolved through the document's font table.
    pub fn font_family(&self, fonts: &FontCollection, options: &TextModelOptions) -> String {
        self.font_index()
            .and_then(|index| fonts.name(index))
            .unwrap_or(options.default_font_family.as_str())
            .to_string()
    }

    /// Point the run at `family`, registering the font when the document lacks it.
    pub fn set_font_family(
        &mut self,
        tree: &mut RecordTree,
        fonts: &mut FontCollection,
        family: &str,
    ) -> Result<()> {
        let index = fonts.add_font(tree, family)?;
        self.set_font_index(index);
        Ok(())
    }
}
