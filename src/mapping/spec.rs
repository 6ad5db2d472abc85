//! Mapping spec files.
//!
//! A [`MappingSpec`] is the serde model of one source layout: which
//! shape the source has, and for each canonical target field, where its
//! value lives and which conversion steps apply. Specs are what the CLI
//! loads from JSON and what the registry stores; they lower into a
//! [`FieldMapping`] for the engine.

use serde::{Deserialize, Serialize};

use super::{FieldMapping, Locator, MappingEntry};
use crate::error::MappingError;
use crate::mapping::Conversion;

/// A complete mapping spec for one source layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappingSpec {
    /// Version of the spec format.
    #[serde(default = "default_version")]
    pub version: String,

    /// Human-readable description.
    #[serde(default)]
    pub description: String,

    /// Shape of the source.
    pub layout: LayoutSpec,

    /// Target fields, in output order.
    pub fields: Vec<FieldSpec>,
}

fn default_version() -> String {
    "1.0".to_string()
}

/// Shape of a source document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum LayoutSpec {
    /// One value per physical line; `header_rows` header lines followed
    /// by records of `header_rows` lines each.
    Fields { header_rows: usize },

    /// One comma-delimited record per physical line; the first line is
    /// skipped as metadata iff `has_header` is set.
    Rows {
        #[serde(default)]
        has_header: bool,
    },
}

/// One target field: name, source locator, conversion steps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Target field name.
    pub target: String,

    /// Where the source value lives (header label or column index).
    pub locator: Locator,

    /// Conversion steps, applied in order. Empty means identity.
    #[serde(default)]
    pub steps: Vec<Conversion>,
}

impl MappingSpec {
    /// Parse a spec from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Structural validation: rejects empty field lists, duplicate
    /// targets, and header locators in row layouts. Returns every
    /// problem found, not just the first.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut problems = Vec::new();

        if self.fields.is_empty() {
            problems.push("mapping has no fields".to_string());
        }

        for (i, field) in self.fields.iter().enumerate() {
            if self.fields[..i].iter().any(|f| f.target == field.target) {
                problems.push(format!("duplicate target field '{}'", field.target));
            }
            if matches!(self.layout, LayoutSpec::Rows { .. }) {
                if let Locator::Header(name) = &field.locator {
                    problems.push(format!(
                        "field '{}' locates header '{}' but the layout is row-oriented",
                        field.target, name
                    ));
                }
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(problems)
        }
    }

    /// Header labels referenced by the spec's locators, in field order.
    /// Used by the registry to match a spec against a source.
    pub fn source_headers(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter_map(|f| match &f.locator {
                Locator::Header(name) => Some(name.as_str()),
                Locator::Column(_) => None,
            })
            .collect()
    }

    /// Target field names, in output order.
    pub fn targets(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.target.as_str()).collect()
    }

    /// Lower into an executable [`FieldMapping`].
    pub fn to_mapping(&self) -> Result<FieldMapping, MappingError> {
        if let Err(problems) = self.validate() {
            return Err(MappingError::InvalidSpec(problems.join("; ")));
        }
        let entries = self
            .fields
            .iter()
            .map(|f| {
                MappingEntry::new(
                    f.target.clone(),
                    f.locator.clone(),
                    super::chain(f.steps.clone()),
                )
            })
            .collect();
        FieldMapping::from_entries(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_spec() -> MappingSpec {
        MappingSpec {
            version: default_version(),
            description: "test".to_string(),
            layout: LayoutSpec::Fields { header_rows: 2 },
            fields: vec![
                FieldSpec {
                    target: "Name".to_string(),
                    locator: Locator::header("Name"),
                    steps: Vec::new(),
                },
                FieldSpec {
                    target: "Type".to_string(),
                    locator: Locator::header("Type"),
                    steps: vec![Conversion::AccountTypeName],
                },
            ],
        }
    }

    #[test]
    fn test_json_round_trip() {
        let spec = sample_spec();
        let json = spec.to_json().unwrap();
        let parsed = MappingSpec::from_json(&json).unwrap();
        assert_eq!(parsed.version, spec.version);
        assert_eq!(parsed.targets(), spec.targets());
        assert_eq!(parsed.layout, spec.layout);
    }

    #[test]
    fn test_layout_serde_shape() {
        let json = r#"{"mode": "rows", "has_header": true}"#;
        let layout: LayoutSpec = serde_json::from_str(json).unwrap();
        assert_eq!(layout, LayoutSpec::Rows { has_header: true });

        let json = r#"{"mode": "fields", "header_rows": 5}"#;
        let layout: LayoutSpec = serde_json::from_str(json).unwrap();
        assert_eq!(layout, LayoutSpec::Fields { header_rows: 5 });
    }

    #[test]
    fn test_validate_duplicate_target() {
        let mut spec = sample_spec();
        spec.fields[1].target = "Name".to_string();
        let problems = spec.validate().unwrap_err();
        assert!(problems.iter().any(|p| p.contains("duplicate")));
    }

    #[test]
    fn test_validate_header_locator_in_rows() {
        let mut spec = sample_spec();
        spec.layout = LayoutSpec::Rows { has_header: false };
        let problems = spec.validate().unwrap_err();
        assert_eq!(problems.len(), 2);
        assert!(problems[0].contains("row-oriented"));
    }

    #[test]
    fn test_validate_empty_fields() {
        let mut spec = sample_spec();
        spec.fields.clear();
        assert!(spec.validate().is_err());
    }

    #[test]
    fn test_source_headers() {
        let spec = sample_spec();
        assert_eq!(spec.source_headers(), vec!["Name", "Type"]);
    }

    #[test]
    fn test_to_mapping_preserves_order() {
        let mapping = sample_spec().to_mapping().unwrap();
        let targets: Vec<&str> = mapping.targets().collect();
        assert_eq!(targets, vec!["Name", "Type"]);
    }

    #[test]
    fn test_to_mapping_rejects_invalid() {
        let mut spec = sample_spec();
        spec.fields[1].target = "Name".to_string();
        assert!(matches!(
            spec.to_mapping(),
            Err(MappingError::InvalidSpec(_))
        ));
    }
}
