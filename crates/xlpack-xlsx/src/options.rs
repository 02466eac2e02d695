//! Package build options

use chrono::{DateTime, Utc};

/// Creator recorded when none is configured
pub const DEFAULT_CREATOR: &str = "xlpack";

/// Core document properties (`docProps/core.xml`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentProperties {
    /// `dc:creator`
    pub creator: Option<String>,
    /// `dc:title`
    pub title: Option<String>,
    /// `dcterms:created`; the save time is used when unset
    pub created: Option<DateTime<Utc>>,
}

impl Default for DocumentProperties {
    fn default() -> Self {
        Self {
            creator: Some(DEFAULT_CREATOR.to_string()),
            title: None,
            created: None,
        }
    }
}

impl DocumentProperties {
    /// Create the default properties
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the creator
    pub fn with_creator<S: Into<String>>(mut self, creator: S) -> Self {
        self.creator = Some(creator.into());
        self
    }

    /// Set the title
    pub fn with_title<S: Into<String>>(mut self, title: S) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Pin the creation timestamp
    pub fn with_created(mut self, created: DateTime<Utc>) -> Self {
        self.created = Some(created);
        self
    }
}

/// Options for [`Package::create_with_options`](crate::Package::create_with_options)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageOptions {
    /// Core document properties
    pub properties: DocumentProperties,
    /// Run the schema validator over every XML part before writing
    pub validate_on_save: bool,
}

impl Default for PackageOptions {
    fn default() -> Self {
        Self {
            properties: DocumentProperties::default(),
            validate_on_save: true,
        }
    }
}

impl PackageOptions {
    /// Create the default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the document properties
    pub fn with_properties(mut self, properties: DocumentProperties) -> Self {
        self.properties = properties;
        self
    }

    /// Enable or disable validation on save
    pub fn with_validate_on_save(mut self, validate: bool) -> Self {
        self.validate_on_save = validate;
        self
    }
}
