//! Border catalogue entries

use super::Color;

/// A `<border>` entry of the style table
///
/// Every edge is always present; an edge with [`BorderLineStyle::None`] is
/// written as an empty element and renders as no line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Border {
    /// Left border
    pub left: BorderEdge,
    /// Right border
    pub right: BorderEdge,
    /// Top border
    pub top: BorderEdge,
    /// Bottom border
    pub bottom: BorderEdge,
    /// Diagonal border
    pub diagonal: BorderEdge,
    /// Draw the diagonal from bottom-left to top-right
    pub diagonal_up: bool,
    /// Draw the diagonal from top-left to bottom-right
    pub diagonal_down: bool,
}

impl Border {
    /// A border with every edge present but unstyled
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the four outline edges to the same line
    pub fn outline(style: BorderLineStyle, color: Color) -> Self {
        let edge = BorderEdge::new(style, color);
        Self {
            left: edge,
            right: edge,
            top: edge,
            bottom: edge,
            ..Self::default()
        }
    }

    /// Check if no edge draws a line
    pub fn is_empty(&self) -> bool {
        [
            &self.left,
            &self.right,
            &self.top,
            &self.bottom,
            &self.diagonal,
        ]
        .iter()
        .all(|e| e.style == BorderLineStyle::None)
    }
}

/// A single border edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BorderEdge {
    /// Line style
    pub style: BorderLineStyle,
    /// Line color (ignored when unstyled)
    pub color: Option<Color>,
}

impl BorderEdge {
    /// Create a styled edge
    pub fn new(style: BorderLineStyle, color: Color) -> Self {
        Self {
            style,
            color: Some(color),
        }
    }
}

/// Border line styles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BorderLineStyle {
    /// No border
    #[default]
    None,
    /// Thin line
    Thin,
    /// Medium line
    Medium,
    /// Thick line
    Thick,
    /// Dashed line
    Dashed,
    /// Dotted line
    Dotted,
    /// Double line
    Double,
    /// Hair line
    Hair,
}

impl BorderLineStyle {
    /// The `style` attribute value, `None` for an unstyled edge
    pub fn xlsx_name(&self) -> Option<&'static str> {
        match self {
            BorderLineStyle::None => None,
            BorderLineStyle::Thin => Some("thin"),
            BorderLineStyle::Medium => Some("medium"),
            BorderLineStyle::Thick => Some("thick"),
            BorderLineStyle::Dashed => Some("dashed"),
            BorderLineStyle::Dotted => Some("dotted"),
            BorderLineStyle::Double => Some("double"),
            BorderLineStyle::Hair => Some("hair"),
        }
    }

    /// Parse a `style` attribute value
    pub fn from_xlsx(s: &str) -> Option<Self> {
        match s {
            "none" => Some(BorderLineStyle::None),
            "thin" => Some(BorderLineStyle::Thin),
            "medium" => Some(BorderLineStyle::Medium),
            "thick" => Some(BorderLineStyle::Thick),
            "dashed" => Some(BorderLineStyle::Dashed),
            "dotted" => Some(BorderLineStyle::Dotted),
            "double" => Some(BorderLineStyle::Double),
            "hair" => Some(BorderLineStyle::Hair),
            _ => None,
        }
    }
}
