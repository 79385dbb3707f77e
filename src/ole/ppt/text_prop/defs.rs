//! Text property catalogue.
//!
//! Property lists from MS-PPT TextPFException / TextCFException. Each entry of a
//! StyleTextPropAtom carries a mask; properties whose mask bits are set follow
//! the mask in the order listed here, which is also the order they are written
//! back in.

use bitflags::bitflags;

/// Whether a collection describes paragraphs or character runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextPropType {
    /// Paragraph properties
    Paragraph,
    /// Character properties
    Character,
}

/// On-disk size of a property value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropSize {
    /// Fixed width in bytes; zero-width props are flags carried by the mask alone
    Fixed(usize),
    /// u16 count followed by `count` 4-byte tab stops
    TabStops,
}

/// Definition of one text property.
#[derive(Debug, PartialEq, Eq)]
pub struct PropDef {
    /// Property name used for lookups
    pub name: &'static str,
    /// Bits of the entry mask announcing the property
    pub mask: u32,
    /// Value width
    pub size: PropSize,
}

impl PropDef {
    const fn new(name: &'static str, size: usize, mask: u32) -> Self {
        Self {
            name,
            mask,
            size: PropSize::Fixed(size),
        }
    }
}

pub const PARAGRAPH_FLAGS: &str = "paragraph_flags";
pub const BULLET_CHAR: &str = "bullet.char";
pub const BULLET_FONT: &str = "bullet.font";
pub const BULLET_SIZE: &str = "bullet.size";
pub const BULLET_COLOR: &str = "bullet.color";
pub const ALIGNMENT: &str = "alignment";
pub const LINE_SPACING: &str = "linespacing";
pub const SPACE_BEFORE: &str = "spacebefore";
pub const SPACE_AFTER: &str = "spaceafter";
pub const TEXT_OFFSET: &str = "text.offset";
pub const BULLET_OFFSET: &str = "bullet.offset";
pub const DEFAULT_TAB_SIZE: &str = "defaultTabSize";
pub const TAB_STOPS: &str = "tabStops";
pub const FONT_ALIGN: &str = "fontAlign";
pub const WRAP_FLAGS: &str = "wrapFlags";
pub const TEXT_DIRECTION: &str = "textDirection";
pub const BULLET_BLIP: &str = "bullet.blip";
pub const BULLET_SCHEME: &str = "bullet.scheme";
pub const HAS_BULLET_SCHEME: &str = "hasBulletScheme";

pub const PP10_EXT: &str = "pp10ext";
pub const NEW_ASIAN_FONT_INDEX: &str = "newAsian.font.index";
pub const CS_FONT_INDEX: &str = "cs.font.index";
pub const PP11_EXT: &str = "pp11ext";
pub const CHAR_FLAGS: &str = "char_flags";
pub const FONT_INDEX: &str = "font.index";
pub const ASIAN_FONT_INDEX: &str = "asian.font.index";
pub const ANSI_FONT_INDEX: &str = "ansi.font.index";
pub const SYMBOL_FONT_INDEX: &str = "symbol.font.index";
pub const FONT_SIZE: &str = "font.size";
pub const FONT_COLOR: &str = "font.color";
pub const SUPERSCRIPT: &str = "superscript";

/// Paragraph properties in wire order.
pub static PARAGRAPH_PROPS: [PropDef; 19] = [
    PropDef::new(PARAGRAPH_FLAGS, 2, 0x0000_000F),
    PropDef::new(BULLET_CHAR, 2, 0x0000_0080),
    PropDef::new(BULLET_FONT, 2, 0x0000_0010),
    PropDef::new(BULLET_SIZE, 2, 0x0000_0040),
    PropDef::new(BULLET_COLOR, 4, 0x0000_0020),
    PropDef::new(ALIGNMENT, 2, 0x0000_0800),
    PropDef::new(LINE_SPACING, 2, 0x0000_1000),
    PropDef::new(SPACE_BEFORE, 2, 0x0000_2000),
    PropDef::new(SPACE_AFTER, 2, 0x0000_4000),
    PropDef::new(TEXT_OFFSET, 2, 0x0000_0100),
    PropDef::new(BULLET_OFFSET, 2, 0x0000_0400),
    PropDef::new(DEFAULT_TAB_SIZE, 2, 0x0000_8000),
    PropDef {
        name: TAB_STOPS,
        mask: 0x0010_0000,
        size: PropSize::TabStops,
    },
    PropDef::new(FONT_ALIGN, 2, 0x0001_0000),
    PropDef::new(WRAP_FLAGS, 2, 0x000E_0000),
    PropDef::new(TEXT_DIRECTION, 2, 0x0020_0000),
    PropDef::new(BULLET_BLIP, 0, 0x0080_0000),
    PropDef::new(BULLET_SCHEME, 0, 0x0100_0000),
    PropDef::new(HAS_BULLET_SCHEME, 0, 0x0200_0000),
];

/// Character properties in wire order.
pub static CHARACTER_PROPS: [PropDef; 12] = [
    PropDef::new(PP10_EXT, 0, 0x0010_0000),
    PropDef::new(NEW_ASIAN_FONT_INDEX, 0, 0x0100_0000),
    PropDef::new(CS_FONT_INDEX, 0, 0x0200_0000),
    PropDef::new(PP11_EXT, 0, 0x0400_0000),
    PropDef::new(CHAR_FLAGS, 2, 0x0000_FFFF),
    PropDef::new(FONT_INDEX, 2, 0x0001_0000),
    PropDef::new(ASIAN_FONT_INDEX, 2, 0x0020_0000),
    PropDef::new(ANSI_FONT_INDEX, 2, 0x0040_0000),
    PropDef::new(SYMBOL_FONT_INDEX, 2, 0x0080_0000),
    PropDef::new(FONT_SIZE, 2, 0x0002_0000),
    PropDef::new(FONT_COLOR, 4, 0x0004_0000),
    PropDef::new(SUPERSCRIPT, 2, 0x0008_0000),
];

/// Property list for a collection kind.
pub fn props_for(kind: TextPropType) -> &'static [PropDef] {
    match kind {
        TextPropType::Paragraph => &PARAGRAPH_PROPS,
        TextPropType::Character => &CHARACTER_PROPS,
    }
}

/// Look up a property definition by name.
pub fn find_def(kind: TextPropType, name: &str) -> Option<&'static PropDef> {
    props_for(kind).iter().find(|def| def.name == name)
}

bitflags! {
    /// Bits packed into the `char_flags` property.
    ///
    /// Each bit is announced by the same bit of the entry mask.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CharFlags: u16 {
        /// Bold
        const BOLD = 0x0001;
        /// Italic
        const ITALIC = 0x0002;
        /// Underline
        const UNDERLINE = 0x0004;
        /// Shadow
        const SHADOW = 0x0010;
        /// Emboss
        const EMBOSS = 0x0200;
    }
}

bitflags! {
    /// Bits packed into the `paragraph_flags` property.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ParagraphFlags: u16 {
        /// Bullet visible
        const HAS_BULLET = 0x0001;
        /// Bullet uses its own font
        const BULLET_HAS_FONT = 0x0002;
        /// Bullet uses its own color
        const BULLET_HAS_COLOR = 0x0004;
        /// Bullet uses its own size
        const BULLET_HAS_SIZE = 0x0008;
    }
}
