/// Configuration for reading and rewriting text blocks.
///
/// # Examples
///
/// ```rust
/// use litchi_pptext::ole::ppt::TextModelOptions;
///
/// // Create with defaults
/// let options = TextModelOptions::default();
///
/// // Or customize
/// let options = TextModelOptions::new()
///     .with_default_font_family("Calibri")
///     .with_default_font_size(24)
///     .with_create_style_atom(true);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TextModelOptions {
    /// Family reported for runs without a resolvable font index
    pub default_font_family: String,
    /// Size in points reported for runs without a font size
    pub default_font_size: u16,
    /// Let `store` write wide blocks back as narrow when the text allows it
    pub allow_demotion: bool,
    /// Let `store` add a StyleTextPropAtom to blocks that have none
    pub create_style_atom: bool,
}

impl Default for TextModelOptions {
    fn default() -> Self {
        Self {
            default_font_family: "Arial".to_string(),
            default_font_size: 18,
            allow_demotion: false,
            create_style_atom: false,
        }
    }
}

impl TextModelOptions {
    /// Create options with default values.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the fallback font family.
    #[inline]
    pub fn with_default_font_family(mut self, family: impl Into<String>) -> Self {
        self.default_font_family = family.into();
        self
    }

    /// Set the fallback font size in points.
    #[inline]
    pub fn with_default_font_size(mut self, points: u16) -> Self {
        self.default_font_size = points;
        self
    }

    /// Allow wide-to-narrow demotion on store.
    ///
    /// Off by default: a block stored wide stays wide.
    #[inline]
    pub fn with_allow_demotion(mut self, allow: bool) -> Self {
        self.allow_demotion = allow;
        self
    }

    /// Always write a StyleTextPropAtom on store.
    #[inline]
    pub fn with_create_style_atom(mut self, create: bool) -> Self {
        self.create_style_atom = create;
        self
    }
}
