//! Fill catalogue entries

use super::Color;

/// A `<fill>` entry of the style table (pattern fills only)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Fill {
    /// Pattern type
    pub pattern: PatternType,
    /// Pattern foreground color (the visible color of a solid fill)
    pub foreground: Option<Color>,
    /// Pattern background color
    pub background: Option<Color>,
}

impl Fill {
    /// "No fill", required at index 0
    pub fn none() -> Self {
        Self::default()
    }

    /// 12.5% gray hatch, required at index 1
    pub fn gray125() -> Self {
        Self {
            pattern: PatternType::Gray125,
            foreground: None,
            background: None,
        }
    }

    /// Solid fill in the given color
    pub fn solid(color: Color) -> Self {
        Self {
            pattern: PatternType::Solid,
            foreground: Some(color),
            background: Some(Color::Indexed(64)),
        }
    }

    /// Check if this is a "no fill"
    pub fn is_none(&self) -> bool {
        self.pattern == PatternType::None
    }
}

/// Pattern fill types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PatternType {
    /// No pattern
    #[default]
    None,
    /// Solid (100% foreground)
    Solid,
    /// 50% gray
    MediumGray,
    /// 75% gray
    DarkGray,
    /// 25% gray
    LightGray,
    /// 12.5% gray
    Gray125,
    /// 6.25% gray
    Gray0625,
}

impl PatternType {
    /// The `patternType` attribute value
    pub fn xlsx_name(&self) -> &'static str {
        match self {
            PatternType::None => "none",
            PatternType::Solid => "solid",
            PatternType::MediumGray => "mediumGray",
            PatternType::DarkGray => "darkGray",
            PatternType::LightGray => "lightGray",
            PatternType::Gray125 => "gray125",
            PatternType::Gray0625 => "gray0625",
        }
    }

    /// Parse a `patternType` attribute value
    pub fn from_xlsx(s: &str) -> Option<Self> {
        match s {
            "none" => Some(PatternType::None),
            "solid" => Some(PatternType::Solid),
            "mediumGray" => Some(PatternType::MediumGray),
            "darkGray" => Some(PatternType::DarkGray),
            "lightGray" => Some(PatternType::LightGray),
            "gray125" => Some(PatternType::Gray125),
            "gray0625" => Some(PatternType::Gray0625),
            _ => None,
        }
    }
}
