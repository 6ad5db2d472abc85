//! Field mappings: target fields, source locators, converters.
//!
//! A [`FieldMapping`] is the ordered list of entries that defines one
//! conversion: for each target field, where its value lives in a source
//! record ([`Locator`]) and how the raw string becomes canonical
//! ([`Convert`]). Entry order is significant; it is both the iteration
//! order over target fields and the emitted column order.
//!
//! Converters are a capability seam: anything implementing
//! [`Convert`] works, including plain closures. The declarative
//! [`Conversion`] steps in [`conversion`] cover the common cases and
//! are what mapping spec files lower into.

pub mod conversion;
pub mod spec;

pub use conversion::{chain, conversions_description, Conversion};
pub use spec::{FieldSpec, LayoutSpec, MappingSpec};

use serde::{Deserialize, Serialize};

use crate::error::MappingError;

// =============================================================================
// Locators
// =============================================================================

/// Where one target field's value lives within a source record.
///
/// Serialized untagged: a JSON integer is a column index, a JSON string
/// is a header label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Locator {
    /// Zero-based value index: the column of a row-oriented record, or
    /// the line position within a field-oriented record.
    Column(usize),
    /// Header label naming the line within a field-oriented record.
    /// Resolved against the header layout by exact match, first match
    /// wins.
    Header(String),
}

impl Locator {
    /// Header-label locator.
    pub fn header(name: impl Into<String>) -> Self {
        Self::Header(name.into())
    }

    /// Column-index locator.
    pub fn column(index: usize) -> Self {
        Self::Column(index)
    }
}

// =============================================================================
// Converters
// =============================================================================

/// A pure value conversion, applied to one raw source string per field
/// per record.
///
/// Implementations must be total: unrecognized input degrades to a
/// sentinel string (see [`crate::models::SENTINEL`]), never a panic or
/// an error. Any `Fn(&str) -> String` qualifies.
pub trait Convert: Send + Sync {
    /// Convert one raw source value into its canonical form.
    fn convert(&self, raw: &str) -> String;
}

impl<F> Convert for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn convert(&self, raw: &str) -> String {
        self(raw)
    }
}

// =============================================================================
// Mapping
// =============================================================================

/// One target field: its name, source locator, and converter.
pub struct MappingEntry {
    /// Target field name, emitted in the canonical header.
    pub target: String,
    /// Where the source value lives.
    pub locator: Locator,
    /// How the raw value becomes canonical.
    pub convert: Box<dyn Convert>,
}

impl MappingEntry {
    pub fn new(target: impl Into<String>, locator: Locator, convert: impl Convert + 'static) -> Self {
        Self {
            target: target.into(),
            locator,
            convert: Box::new(convert),
        }
    }
}

/// An ordered field mapping with unique target names.
pub struct FieldMapping {
    entries: Vec<MappingEntry>,
}

impl FieldMapping {
    /// Build from entries, rejecting empty mappings and duplicate
    /// target names.
    pub fn from_entries(entries: Vec<MappingEntry>) -> Result<Self, MappingError> {
        if entries.is_empty() {
            return Err(MappingError::Empty);
        }
        for (i, entry) in entries.iter().enumerate() {
            if entries[..i].iter().any(|e| e.target == entry.target) {
                return Err(MappingError::DuplicateTarget(entry.target.clone()));
            }
        }
        Ok(Self { entries })
    }

    /// Start building a mapping entry by entry.
    pub fn builder() -> MappingBuilder {
        MappingBuilder {
            entries: Vec::new(),
        }
    }

    /// Entries in mapping order.
    pub fn entries(&self) -> &[MappingEntry] {
        &self.entries
    }

    /// Target field names in mapping order.
    pub fn targets(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.target.as_str())
    }

    /// Number of target fields.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Builder for [`FieldMapping`].
pub struct MappingBuilder {
    entries: Vec<MappingEntry>,
}

impl MappingBuilder {
    /// Append one target field.
    pub fn field(
        mut self,
        target: impl Into<String>,
        locator: Locator,
        convert: impl Convert + 'static,
    ) -> Self {
        self.entries.push(MappingEntry::new(target, locator, convert));
        self
    }

    /// Finish, validating uniqueness of target names.
    pub fn build(self) -> Result<FieldMapping, MappingError> {
        FieldMapping::from_entries(self.entries)
    }
}

/// The identity conversion, for fields that pass through verbatim.
pub fn identity(raw: &str) -> String {
    raw.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_preserves_order() {
        let mapping = FieldMapping::builder()
            .field("B", Locator::column(1), identity)
            .field("A", Locator::column(0), identity)
            .build()
            .unwrap();

        let targets: Vec<&str> = mapping.targets().collect();
        assert_eq!(targets, vec!["B", "A"]);
    }

    #[test]
    fn test_duplicate_target_rejected() {
        let result = FieldMapping::builder()
            .field("A", Locator::column(0), identity)
            .field("A", Locator::column(1), identity)
            .build();

        assert!(matches!(result, Err(MappingError::DuplicateTarget(t)) if t == "A"));
    }

    #[test]
    fn test_empty_mapping_rejected() {
        assert!(matches!(
            FieldMapping::builder().build(),
            Err(MappingError::Empty)
        ));
    }

    #[test]
    fn test_closure_converter() {
        let entry = MappingEntry::new("Type", Locator::header("Type"), |raw: &str| {
            format!("<{raw}>")
        });
        assert_eq!(entry.convert.convert("2"), "<2>");
    }

    #[test]
    fn test_locator_serde_shapes() {
        let column: Locator = serde_json::from_str("3").unwrap();
        assert_eq!(column, Locator::column(3));

        let header: Locator = serde_json::from_str("\"Identifier\"").unwrap();
        assert_eq!(header, Locator::header("Identifier"));

        assert_eq!(serde_json::to_string(&Locator::column(0)).unwrap(), "0");
        assert_eq!(
            serde_json::to_string(&Locator::header("Opened")).unwrap(),
            "\"Opened\""
        );
    }
}
