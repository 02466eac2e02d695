//! Package parts, content types and relationships
//!
//! Part names are absolute within the package (`/xl/workbook.xml`).
//! Relationships are stored with absolute targets and rewritten relative to
//! their source part when the `.rels` part is serialized.

use std::fmt;

use crate::error::{XlsxError, XlsxResult};

/// Source name used for package-level relationships (`/_rels/.rels`)
pub const PACKAGE_ROOT: &str = "/";

/// The content types part (not itself a registered part)
pub const CONTENT_TYPES_PART: &str = "/[Content_Types].xml";

/// The workbook part
pub const WORKBOOK_PART: &str = "/xl/workbook.xml";

/// The shared style part
pub const STYLES_PART: &str = "/xl/styles.xml";

/// Core document properties
pub const CORE_PROPERTIES_PART: &str = "/docProps/core.xml";

/// Content type of relationship parts
pub const RELATIONSHIPS_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-package.relationships+xml";

/// Name of the worksheet part for a given `sheetId`
pub fn worksheet_part_name(sheet_id: u32) -> String {
    format!("/xl/worksheets/sheet{}.xml", sheet_id)
}

/// Name of the relationship part holding relationships sourced at `source`
pub fn rels_part_name(source: &str) -> String {
    if source == PACKAGE_ROOT {
        return "/_rels/.rels".to_string();
    }
    let (dir, file) = split_part_name(source);
    format!("{}_rels/{}.rels", dir, file)
}

/// Zip entry name for a part name
pub fn zip_entry_name(part_name: &str) -> &str {
    part_name.trim_start_matches('/')
}

/// Split a part name into its directory (with trailing slash) and file name
fn split_part_name(name: &str) -> (&str, &str) {
    match name.rfind('/') {
        Some(pos) => (&name[..=pos], &name[pos + 1..]),
        None => ("/", name),
    }
}

fn source_dir(source: &str) -> &str {
    if source == PACKAGE_ROOT {
        PACKAGE_ROOT
    } else {
        split_part_name(source).0
    }
}

/// Kind of a registered part
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartKind {
    /// `xl/workbook.xml`
    Workbook,
    /// A worksheet, identified by its `sheetId`
    Worksheet {
        /// Sheet id the part belongs to
        sheet_id: u32,
    },
    /// `xl/styles.xml`
    Styles,
    /// `docProps/core.xml`
    CoreProperties,
}

impl PartKind {
    /// Content type recorded in `[Content_Types].xml`
    pub fn content_type(&self) -> &'static str {
        match self {
            PartKind::Workbook => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"
            }
            PartKind::Worksheet { .. } => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"
            }
            PartKind::Styles => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"
            }
            PartKind::CoreProperties => "application/vnd.openxmlformats-package.core-properties+xml",
        }
    }

    /// Relationship type linking a part of this kind to its source
    pub fn relationship_type(&self) -> RelationshipType {
        match self {
            PartKind::Workbook => RelationshipType::OfficeDocument,
            PartKind::Worksheet { .. } => RelationshipType::Worksheet,
            PartKind::Styles => RelationshipType::Styles,
            PartKind::CoreProperties => RelationshipType::CoreProperties,
        }
    }
}

/// A registered package part
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    /// Absolute part name
    pub name: String,
    /// What the part holds
    pub kind: PartKind,
}

/// The set of parts in a package, in registration order
#[derive(Debug, Clone, Default)]
pub struct PartRegistry {
    parts: Vec<Part>,
}

impl PartRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a part. Part names are unique.
    pub fn register<S: Into<String>>(&mut self, name: S, kind: PartKind) -> XlsxResult<()> {
        let name = name.into();
        if self.contains(&name) {
            return Err(XlsxError::InvalidFormat(format!(
                "part {} is already registered",
                name
            )));
        }
        log::debug!("registered part {} ({:?})", name, kind);
        self.parts.push(Part { name, kind });
        Ok(())
    }

    /// Check whether a part is registered
    pub fn contains(&self, name: &str) -> bool {
        self.parts.iter().any(|p| p.name == name)
    }

    /// Look up a part
    pub fn get(&self, name: &str) -> Option<&Part> {
        self.parts.iter().find(|p| p.name == name)
    }

    /// All parts in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Part> {
        self.parts.iter()
    }

    /// Number of registered parts
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Check whether no part is registered
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

/// Relationship types used by spreadsheet packages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationshipType {
    /// Package → workbook
    OfficeDocument,
    /// Workbook → worksheet
    Worksheet,
    /// Workbook → styles
    Styles,
    /// Package → core properties
    CoreProperties,
}

impl RelationshipType {
    /// The relationship type URI
    pub fn uri(&self) -> &'static str {
        match self {
            RelationshipType::OfficeDocument => {
                "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument"
            }
            RelationshipType::Worksheet => {
                "http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet"
            }
            RelationshipType::Styles => {
                "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles"
            }
            RelationshipType::CoreProperties => {
                "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties"
            }
        }
    }

    /// Parse a relationship type URI
    pub fn from_uri(uri: &str) -> Option<Self> {
        [
            RelationshipType::OfficeDocument,
            RelationshipType::Worksheet,
            RelationshipType::Styles,
            RelationshipType::CoreProperties,
        ]
        .into_iter()
        .find(|t| t.uri() == uri)
    }
}

/// A typed link from a source part to a target part
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    /// Id, unique among the relationships of `source`
    pub id: String,
    /// Source part name, or [`PACKAGE_ROOT`]
    pub source: String,
    /// Absolute target part name
    pub target: String,
    /// Relationship type
    pub rel_type: RelationshipType,
}

impl Relationship {
    /// Target as written into the source's `.rels` part
    pub fn relative_target(&self) -> String {
        let dir = source_dir(&self.source);
        match self.target.strip_prefix(dir) {
            Some(rest) => rest.to_string(),
            None => self.target.clone(),
        }
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -[{}]-> {}", self.source, self.id, self.target)
    }
}

/// Resolve a `.rels` target (relative to the source part's directory) to an
/// absolute part name
pub fn resolve_target(source: &str, target: &str) -> String {
    if target.starts_with('/') {
        return target.to_string();
    }
    let mut segments: Vec<&str> = source_dir(source)
        .split('/')
        .filter(|s| !s.is_empty())
        .collect();
    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }
    format!("/{}", segments.join("/"))
}

/// All relationships of a package, grouped by source on output
#[derive(Debug, Clone, Default)]
pub struct RelationshipTable {
    entries: Vec<Relationship>,
}

impl RelationshipTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// The id the next relationship from `source` will receive
    pub fn next_id(&self, source: &str) -> String {
        let max = self
            .from_source(source)
            .filter_map(|r| r.id.strip_prefix("rId")?.parse::<u32>().ok())
            .max()
            .unwrap_or(0);
        format!("rId{}", max + 1)
    }

    /// Create a relationship with a fresh id, returning the id
    pub fn add(&mut self, source: &str, target: &str, rel_type: RelationshipType) -> String {
        let id = self.next_id(source);
        let rel = Relationship {
            id: id.clone(),
            source: source.to_string(),
            target: target.to_string(),
            rel_type,
        };
        log::debug!("created relationship {}", rel);
        self.entries.push(rel);
        id
    }

    /// Insert a relationship with a caller-chosen id
    pub fn insert(&mut self, rel: Relationship) -> XlsxResult<()> {
        if self.get(&rel.source, &rel.id).is_some() {
            return Err(XlsxError::InvalidFormat(format!(
                "duplicate relationship id {} from {}",
                rel.id, rel.source
            )));
        }
        log::debug!("created relationship {}", rel);
        self.entries.push(rel);
        Ok(())
    }

    /// Look up a relationship by source and id
    pub fn get(&self, source: &str, id: &str) -> Option<&Relationship> {
        self.entries
            .iter()
            .find(|r| r.source == source && r.id == id)
    }

    /// First relationship of a type from `source`
    pub fn find_by_type(&self, source: &str, rel_type: RelationshipType) -> Option<&Relationship> {
        self.entries
            .iter()
            .find(|r| r.source == source && r.rel_type == rel_type)
    }

    /// Relationships from `source` in creation order
    pub fn from_source<'a>(&'a self, source: &'a str) -> impl Iterator<Item = &'a Relationship> {
        self.entries.iter().filter(move |r| r.source == source)
    }

    /// Distinct sources in first-use order
    pub fn sources(&self) -> Vec<&str> {
        let mut sources: Vec<&str> = Vec::new();
        for rel in &self.entries {
            if !sources.contains(&rel.source.as_str()) {
                sources.push(&rel.source);
            }
        }
        sources
    }

    /// All relationships
    pub fn iter(&self) -> impl Iterator<Item = &Relationship> {
        self.entries.iter()
    }

    /// Number of relationships
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check every relationship's source and target are registered parts
    pub fn check_targets(&self, parts: &PartRegistry) -> XlsxResult<()> {
        for rel in &self.entries {
            if rel.source != PACKAGE_ROOT && !parts.contains(&rel.source) {
                return Err(XlsxError::MissingPart(rel.source.clone()));
            }
            if !parts.contains(&rel.target) {
                return Err(XlsxError::MissingPart(rel.target.clone()));
            }
        }
        Ok(())
    }
}
