//! Font catalogue entries

use super::Color;

/// Default body font family
pub const DEFAULT_FONT_NAME: &str = "Calibri";

/// Default body font size in points
pub const DEFAULT_FONT_SIZE: f64 = 11.0;

/// A `<font>` entry of the style table
#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    /// Font family name (e.g., "Calibri", "Arial")
    pub name: String,
    /// Font size in points
    pub size: f64,
    /// Bold
    pub bold: bool,
    /// Italic
    pub italic: bool,
    /// Single underline
    pub underline: bool,
    /// Font color
    pub color: Color,
    /// Font family class (2 = Swiss)
    pub family: Option<u8>,
    /// Theme font scheme the face belongs to
    pub scheme: FontScheme,
}

impl Default for Font {
    /// Body font: Calibri 11, theme text color, minor scheme.
    fn default() -> Self {
        Self {
            name: DEFAULT_FONT_NAME.to_string(),
            size: DEFAULT_FONT_SIZE,
            bold: false,
            italic: false,
            underline: false,
            color: Color::theme(1),
            family: Some(2),
            scheme: FontScheme::Minor,
        }
    }
}

impl Font {
    /// Create the default body font
    pub fn new() -> Self {
        Self::default()
    }

    /// Set font size
    pub fn with_size(mut self, size: f64) -> Self {
        self.size = size;
        self
    }

    /// Set bold
    pub fn with_bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    /// Set italic
    pub fn with_italic(mut self, italic: bool) -> Self {
        self.italic = italic;
        self
    }

    /// Set color
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }
}

impl std::hash::Hash for Font {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.size.to_bits().hash(state);
        self.bold.hash(state);
        self.italic.hash(state);
        self.underline.hash(state);
        self.color.hash(state);
        self.family.hash(state);
        self.scheme.hash(state);
    }
}

impl Eq for Font {}

/// Theme font scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FontScheme {
    /// Not bound to the theme
    #[default]
    None,
    /// Heading font
    Major,
    /// Body font
    Minor,
}

impl FontScheme {
    /// The `<scheme val>` value, `None` when no element is written
    pub fn xlsx_name(&self) -> Option<&'static str> {
        match self {
            FontScheme::None => None,
            FontScheme::Major => Some("major"),
            FontScheme::Minor => Some("minor"),
        }
    }

    /// Parse a `<scheme val>` value
    pub fn from_xlsx(s: &str) -> Self {
        match s {
            "major" => FontScheme::Major,
            "minor" => FontScheme::Minor,
            _ => FontScheme::None,
        }
    }
}
