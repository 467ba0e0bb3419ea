//! Marker discovery over a translation unit
//!
//! The [`Scanner`] finds class and enum markers, the resolver recovers
//! fully-qualified names, and the member associator binds property markers
//! to the data members that follow them.

pub mod members;
pub mod resolver;
pub mod scanner;

pub use members::find_members;
pub use resolver::{MAX_SCOPE_DEPTH, resolve};
pub use scanner::Scanner;

use crate::error::ScanError;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::path::PathBuf;

/// Identifiers that flag declarations and members for registration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct MarkerSet {
    #[serde(default = "default_class_marker")]
    pub class: String,
    #[serde(default = "default_property_marker")]
    pub property: String,
    #[serde(default = "default_readonly_marker")]
    pub readonly_property: String,
    #[serde(rename = "enum", default = "default_enum_marker")]
    pub enum_: String,
}

fn default_class_marker() -> String {
    "REGISTER_CLASS".to_string()
}
fn default_property_marker() -> String {
    "REGISTER_PROPERTY".to_string()
}
fn default_readonly_marker() -> String {
    "REGISTER_READONLY_PROPERTY".to_string()
}
fn default_enum_marker() -> String {
    "REGISTER_ENUM".to_string()
}

impl Default for MarkerSet {
    fn default() -> Self {
        Self {
            class: default_class_marker(),
            property: default_property_marker(),
            readonly_property: default_readonly_marker(),
            enum_: default_enum_marker(),
        }
    }
}

impl MarkerSet {
    /// Each marker with the configuration key it is set under
    pub fn roles(&self) -> [(&'static str, &str); 4] {
        [
            ("class", self.class.as_str()),
            ("property", self.property.as_str()),
            ("readonly_property", self.readonly_property.as_str()),
            ("enum", self.enum_.as_str()),
        ]
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.roles().into_iter().map(|(_, name)| name)
    }
}

/// Scope names from outermost to innermost, ending with the entity itself
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct QualifiedPath(Vec<String>);

impl QualifiedPath {
    pub const SEPARATOR: &'static str = "::";

    pub fn new(segments: Vec<String>) -> Self {
        Self(segments)
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for QualifiedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(Self::SEPARATOR))
    }
}

impl Serialize for QualifiedPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<S: Into<String>> FromIterator<S> for QualifiedPath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// A marked class or struct with its registered data members
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassRecord {
    pub name: String,
    pub path: QualifiedPath,
    pub properties: Vec<String>,
    pub readonly_properties: Vec<String>,
}

/// A marked enum with its enumerators in declaration order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumRecord {
    pub name: String,
    pub path: QualifiedPath,
    pub elements: Vec<String>,
}

/// A marker occurrence that could not be turned into a record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanDiagnostic {
    pub header: PathBuf,
    pub marker: String,
    /// Byte offset of the marker token
    pub offset: usize,
    pub message: String,
    #[serde(skip)]
    pub error: ScanError,
}

/// Records discovered in one or more headers, in discovery order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanResult {
    pub classes: Vec<ClassRecord>,
    pub enums: Vec<EnumRecord>,
    pub diagnostics: Vec<ScanDiagnostic>,
}

impl ScanResult {
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty() && self.enums.is_empty()
    }

    /// Append the records of a later header
    pub fn merge(&mut self, other: ScanResult) {
        self.classes.extend(other.classes);
        self.enums.extend(other.enums);
        self.diagnostics.extend(other.diagnostics);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class(name: &str) -> ClassRecord {
        ClassRecord {
            name: name.to_string(),
            path: QualifiedPath::from_iter([name]),
            properties: Vec::new(),
            readonly_properties: Vec::new(),
        }
    }

    #[test]
    fn test_qualified_path_display() {
        let path: QualifiedPath = ["ns", "Outer", "Inner"].into_iter().collect();
        assert_eq!(path.to_string(), "ns::Outer::Inner");
        assert_eq!(path.len(), 3);
        assert_eq!(QualifiedPath::default().to_string(), "");
    }

    #[test]
    fn test_qualified_path_serializes_as_string() {
        let path: QualifiedPath = ["a", "B"].into_iter().collect();
        assert_eq!(serde_json::to_string(&path).unwrap(), "\"a::B\"");
    }

    #[test]
    fn test_merge_preserves_order() {
        let mut first = ScanResult {
            classes: vec![class("A")],
            ..ScanResult::default()
        };
        let second = ScanResult {
            classes: vec![class("B"), class("A")],
            ..ScanResult::default()
        };
        first.merge(second);
        let names: Vec<_> = first.classes.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "A"]);
    }

    #[test]
    fn test_marker_names_follow_roles() {
        let markers = MarkerSet::default();
        let names: Vec<_> = markers.names().collect();
        assert_eq!(
            names,
            vec![
                "REGISTER_CLASS",
                "REGISTER_PROPERTY",
                "REGISTER_READONLY_PROPERTY",
                "REGISTER_ENUM"
            ]
        );
    }
}
