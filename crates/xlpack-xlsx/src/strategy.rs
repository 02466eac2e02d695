//! Style table build strategies
//!
//! A package's style part comes either from the built-in programmatic table
//! or from a named, externally supplied `styles.xml` document.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;

use xlpack_core::{StyleTable, Stylesheet};

use crate::error::{XlsxError, XlsxResult};
use crate::styles::read_styles_xml;

/// Produces the style part a package is built with
pub trait StyleStrategy {
    /// Build the style part
    fn build_style_table(&self) -> XlsxResult<Stylesheet>;
}

impl<T: StyleStrategy + ?Sized> StyleStrategy for &T {
    fn build_style_table(&self) -> XlsxResult<Stylesheet> {
        (**self).build_style_table()
    }
}

impl<T: StyleStrategy + ?Sized> StyleStrategy for Box<T> {
    fn build_style_table(&self) -> XlsxResult<Stylesheet> {
        (**self).build_style_table()
    }
}

/// The built-in four-format table (see [`xlpack_core::preset`])
#[derive(Debug, Clone, Copy, Default)]
pub struct ProgrammaticStyle;

impl StyleStrategy for ProgrammaticStyle {
    fn build_style_table(&self) -> XlsxResult<Stylesheet> {
        Ok(Stylesheet::built(StyleTable::programmatic()))
    }
}

/// Looks up predefined `styles.xml` markup by name
pub trait StyleSource {
    /// Markup of the named style document, or [`XlsxError::StyleNotFound`]
    fn style_markup(&self, name: &str) -> XlsxResult<String>;
}

impl<T: StyleSource + ?Sized> StyleSource for &T {
    fn style_markup(&self, name: &str) -> XlsxResult<String> {
        (**self).style_markup(name)
    }
}

/// In-memory named style documents
#[derive(Debug, Clone, Default)]
pub struct NamedStyles {
    entries: HashMap<String, String>,
}

impl NamedStyles {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a named document
    pub fn insert<N: Into<String>, M: Into<String>>(&mut self, name: N, markup: M) {
        self.entries.insert(name.into(), markup.into());
    }

    /// Builder form of [`insert`](Self::insert)
    pub fn with<N: Into<String>, M: Into<String>>(mut self, name: N, markup: M) -> Self {
        self.insert(name, markup);
        self
    }

    /// Names of the documents held
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl StyleSource for NamedStyles {
    fn style_markup(&self, name: &str) -> XlsxResult<String> {
        self.entries
            .get(name)
            .cloned()
            .ok_or_else(|| XlsxError::StyleNotFound(name.to_string()))
    }
}

/// Style documents stored as `<root>/<name>.xml`
#[derive(Debug, Clone)]
pub struct DirectoryStyles {
    root: PathBuf,
}

impl DirectoryStyles {
    /// Look up documents in `root`
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, name: &str) -> Option<PathBuf> {
        // Names are single path components.
        if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
            return None;
        }
        Some(self.root.join(format!("{}.xml", name)))
    }
}

impl StyleSource for DirectoryStyles {
    fn style_markup(&self, name: &str) -> XlsxResult<String> {
        let path = self
            .path_for(name)
            .ok_or_else(|| XlsxError::StyleNotFound(name.to_string()))?;
        match fs::read_to_string(&path) {
            Ok(markup) => Ok(markup),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(XlsxError::StyleNotFound(name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// A named style document installed verbatim.
///
/// The markup is parsed into a catalogue so style indices can be bound-checked,
/// but the package writes the original text unchanged.
#[derive(Debug, Clone)]
pub struct PredefinedStyle<S> {
    source: S,
    name: String,
}

impl<S: StyleSource> PredefinedStyle<S> {
    /// Use the document `name` from `source`
    pub fn new<N: Into<String>>(source: S, name: N) -> Self {
        Self {
            source,
            name: name.into(),
        }
    }

    /// The requested document name
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<S: StyleSource> StyleStrategy for PredefinedStyle<S> {
    fn build_style_table(&self) -> XlsxResult<Stylesheet> {
        let markup = self.source.style_markup(&self.name)?;
        let table = read_styles_xml(markup.as_bytes())?;
        log::debug!(
            "loaded predefined style '{}' with {} cell formats",
            self.name,
            table.cell_format_count()
        );
        Ok(Stylesheet::predefined(self.name.clone(), markup, table))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::styles::write_styles_xml;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_programmatic_strategy() {
        let stylesheet = ProgrammaticStyle.build_style_table().unwrap();
        assert!(!stylesheet.is_predefined());
        assert_eq!(stylesheet.table().cell_format_count(), 4);
    }

    #[test]
    fn test_predefined_from_memory_keeps_markup() {
        let markup = write_styles_xml(&StyleTable::new());
        let styles = NamedStyles::new().with("plain", markup.clone());
        let stylesheet = PredefinedStyle::new(&styles, "plain")
            .build_style_table()
            .unwrap();

        assert!(stylesheet.is_predefined());
        assert_eq!(stylesheet.markup(), Some(markup.as_str()));
        assert_eq!(stylesheet.source(), Some("plain"));
        assert_eq!(stylesheet.table().cell_format_count(), 1);
    }

    #[test]
    fn test_unknown_name_is_not_found() {
        let styles = NamedStyles::new();
        let result = PredefinedStyle::new(styles, "corporate").build_style_table();
        assert!(matches!(result, Err(XlsxError::StyleNotFound(n)) if n == "corporate"));
    }

    #[test]
    fn test_directory_source() {
        let dir = TempDir::new().unwrap();
        let markup = write_styles_xml(&StyleTable::programmatic());
        fs::write(dir.path().join("report.xml"), &markup).unwrap();

        let source = DirectoryStyles::new(dir.path());
        assert_eq!(source.style_markup("report").unwrap(), markup);
        assert!(matches!(
            source.style_markup("missing"),
            Err(XlsxError::StyleNotFound(_))
        ));
        assert!(matches!(
            source.style_markup("../report"),
            Err(XlsxError::StyleNotFound(_))
        ));
    }

    #[test]
    fn test_malformed_markup_fails_the_build() {
        let styles = NamedStyles::new().with("broken", "<styleSheet><fonts></styleSheet>");
        let result = PredefinedStyle::new(styles, "broken").build_style_table();
        assert!(matches!(result, Err(XlsxError::Xml(_))));
    }
}
