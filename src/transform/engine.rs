//! Transformation engines.
//!
//! The two sibling engines orchestrate the same steps: split the blob
//! into lines, partition lines into records, resolve each mapping
//! entry's locator, run its converter, and assemble the canonical
//! output blob. They differ only in framing and in how records are
//! serialized: field-oriented output puts one value per line,
//! row-oriented output puts one comma-joined record per line. Both emit
//! the canonical header first and keep records in input order.
//!
//! Lookup failures are configuration errors and abort the whole call;
//! conversion mismatches degrade to sentinel values inside the output.

use crate::document::RawDocument;
use crate::error::MappingError;
use crate::mapping::{FieldMapping, LayoutSpec, Locator, MappingSpec};

use super::partition::{partition_fields, partition_rows};

/// Outcome of one transformation call.
#[derive(Debug, Clone)]
pub struct TransformOutput {
    /// The canonical output blob, newline-terminated.
    pub text: String,
    /// Number of records emitted (equals the number partitioned).
    pub record_count: usize,
    /// Trailing source lines dropped by field-oriented framing.
    pub dropped_lines: usize,
}

impl TransformOutput {
    /// One-line summary for status output.
    pub fn summary(&self) -> String {
        if self.dropped_lines > 0 {
            format!(
                "{} records ({} trailing lines dropped)",
                self.record_count, self.dropped_lines
            )
        } else {
            format!("{} records", self.record_count)
        }
    }
}

/// Transform a field-oriented source (one value per line,
/// `header_rows` lines per record) into the canonical layout.
///
/// Output is one target field name per line, then for each record one
/// converted value per line, in mapping order.
pub fn transform_fields(
    source: &str,
    header_rows: usize,
    mapping: &FieldMapping,
) -> Result<TransformOutput, MappingError> {
    let doc = RawDocument::parse(source);
    let partition = partition_fields(&doc, header_rows);

    // Resolve header names to indices once, not per record
    let indices = resolve_field_indices(mapping, &partition.headers)?;

    let mut text = String::new();
    for target in mapping.targets() {
        text.push_str(target);
        text.push('\n');
    }

    for (row, record) in partition.records.iter().enumerate() {
        for (entry, &index) in mapping.entries().iter().zip(&indices) {
            let raw = record.get(index).ok_or(MappingError::IndexOutOfRange {
                index,
                row,
                width: record.width(),
            })?;
            text.push_str(&entry.convert.convert(raw));
            text.push('\n');
        }
    }

    Ok(TransformOutput {
        text,
        record_count: partition.records.len(),
        dropped_lines: partition.dropped_lines,
    })
}

/// Transform a row-oriented source (one comma-delimited record per
/// line) into the canonical layout.
///
/// Output is one comma-joined header line, then one comma-joined line
/// per record, in mapping order.
pub fn transform_rows(
    source: &str,
    has_header: bool,
    mapping: &FieldMapping,
) -> Result<TransformOutput, MappingError> {
    let doc = RawDocument::parse(source);
    let partition = partition_rows(&doc, has_header);

    // Row layouts are purely positional; a header locator has nothing
    // to resolve against
    let indices = resolve_row_indices(mapping)?;

    let mut text = mapping.targets().collect::<Vec<_>>().join(",");
    text.push('\n');

    for (row, record) in partition.records.iter().enumerate() {
        let mut converted = Vec::with_capacity(mapping.len());
        for (entry, &index) in mapping.entries().iter().zip(&indices) {
            let raw = record.get(index).ok_or(MappingError::IndexOutOfRange {
                index,
                row,
                width: record.width(),
            })?;
            converted.push(entry.convert.convert(raw));
        }
        text.push_str(&converted.join(","));
        text.push('\n');
    }

    Ok(TransformOutput {
        text,
        record_count: partition.records.len(),
        dropped_lines: 0,
    })
}

/// Dispatch on a spec's layout and run the matching engine.
pub fn transform_with_spec(
    source: &str,
    spec: &MappingSpec,
) -> Result<TransformOutput, MappingError> {
    let mapping = spec.to_mapping()?;
    match spec.layout {
        LayoutSpec::Fields { header_rows } => transform_fields(source, header_rows, &mapping),
        LayoutSpec::Rows { has_header } => transform_rows(source, has_header, &mapping),
    }
}

fn resolve_field_indices(
    mapping: &FieldMapping,
    headers: &[&str],
) -> Result<Vec<usize>, MappingError> {
    mapping
        .entries()
        .iter()
        .map(|entry| match &entry.locator {
            // exact match, first match wins
            Locator::Header(name) => headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| MappingError::UnknownHeader(name.clone())),
            Locator::Column(index) => Ok(*index),
        })
        .collect()
}

fn resolve_row_indices(mapping: &FieldMapping) -> Result<Vec<usize>, MappingError> {
    mapping
        .entries()
        .iter()
        .map(|entry| match &entry.locator {
            Locator::Column(index) => Ok(*index),
            Locator::Header(_) => Err(MappingError::HeaderLocatorInRowLayout(
                entry.target.clone(),
            )),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::{chain, identity, Conversion, FieldMapping, Locator};

    fn statement_mapping() -> FieldMapping {
        FieldMapping::builder()
            .field(
                "AccountCode",
                Locator::header("Identifier"),
                chain(vec![Conversion::SplitTake {
                    separator: "|".to_string(),
                    index: 1,
                }]),
            )
            .field("Name", Locator::header("Name"), identity)
            .field(
                "Type",
                Locator::header("Type"),
                chain(vec![Conversion::AccountTypeName]),
            )
            .field(
                "Open Date",
                Locator::header("Opened"),
                chain(vec![Conversion::ReformatDate {
                    from: "%d-%m-%Y".to_string(),
                    to: "%Y-%m-%d".to_string(),
                }]),
            )
            .field(
                "Currency",
                Locator::header("Currency"),
                chain(vec![Conversion::CurrencyCode]),
            )
            .build()
            .unwrap()
    }

    #[test]
    fn test_field_oriented_statement() {
        // one value per line, five header lines, then one record
        let source =
            "Identifier\nName\nType\nOpened\nCurrency\n123|AbcCode\nMy Account\n2\n01-01-2018\nCD";
        let output = transform_fields(source, 5, &statement_mapping()).unwrap();

        assert_eq!(
            output.text,
            "AccountCode\nName\nType\nOpen Date\nCurrency\nAbcCode\nMy Account\nRRSP\n2018-01-01\nCAD\n"
        );
        assert_eq!(output.record_count, 1);
        assert_eq!(output.dropped_lines, 0);
    }

    #[test]
    fn test_field_oriented_source_order_irrelevant() {
        // same mapping, source headers in a different order
        let source =
            "Currency\nIdentifier\nName\nType\nOpened\nCD\n123|AbcCode\nMy Account\n2\n01-01-2018";
        let output = transform_fields(source, 5, &statement_mapping()).unwrap();

        assert_eq!(
            output.text,
            "AccountCode\nName\nType\nOpen Date\nCurrency\nAbcCode\nMy Account\nRRSP\n2018-01-01\nCAD\n"
        );
    }

    #[test]
    fn test_row_oriented_with_header() {
        let source = "Identifier,Name,Type,Opened,Currency\n123|AbcCode,My Account,2,01-01-2018,CD";
        let mapping = FieldMapping::builder()
            .field(
                "AccountCode",
                Locator::column(0),
                chain(vec![Conversion::SplitTake {
                    separator: "|".to_string(),
                    index: 1,
                }]),
            )
            .field("Name", Locator::column(1), identity)
            .field("Type", Locator::column(2), chain(vec![Conversion::AccountTypeName]))
            .field(
                "Open Date",
                Locator::column(3),
                chain(vec![Conversion::ReformatDate {
                    from: "%d-%m-%Y".to_string(),
                    to: "%Y-%m-%d".to_string(),
                }]),
            )
            .field("Currency", Locator::column(4), chain(vec![Conversion::CurrencyCode]))
            .build()
            .unwrap();

        let output = transform_rows(source, true, &mapping).unwrap();
        assert_eq!(
            output.text,
            "AccountCode,Name,Type,Open Date,Currency\nAbcCode,My Account,RRSP,2018-01-01,CAD\n"
        );
        assert_eq!(output.record_count, 1);
    }

    #[test]
    fn test_row_oriented_no_header_empty_value_passes_through() {
        // identity mapping: empty Open Date stays empty
        let source = "Abc|1,2019-01-01,RRSP,CAD,Account 1\nAbc|2,,RESP,USD,Account 2";
        let mapping = FieldMapping::builder()
            .field("AccountCode", Locator::column(0), identity)
            .field("Name", Locator::column(4), identity)
            .field("Type", Locator::column(2), identity)
            .field("Open Date", Locator::column(1), identity)
            .field("Currency", Locator::column(3), identity)
            .build()
            .unwrap();

        let output = transform_rows(source, false, &mapping).unwrap();
        assert_eq!(
            output.text,
            "AccountCode,Name,Type,Open Date,Currency\nAbc|1,Account 1,RRSP,2019-01-01,CAD\nAbc|2,Account 2,RESP,,USD\n"
        );
        assert_eq!(output.record_count, 2);
    }

    #[test]
    fn test_record_count_preserved() {
        let source = "H\n1\n2\n3\n4";
        let mapping = FieldMapping::builder()
            .field("Out", Locator::header("H"), identity)
            .build()
            .unwrap();

        let output = transform_fields(source, 1, &mapping).unwrap();
        assert_eq!(output.record_count, 4);
        assert_eq!(output.text, "Out\n1\n2\n3\n4\n");
    }

    #[test]
    fn test_identity_mapping_reorders_only() {
        let source = "A,B\nx,y";
        let mapping = FieldMapping::builder()
            .field("B", Locator::column(1), identity)
            .field("A", Locator::column(0), identity)
            .build()
            .unwrap();

        let output = transform_rows(source, true, &mapping).unwrap();
        assert_eq!(output.text, "B,A\ny,x\n");
    }

    #[test]
    fn test_unknown_header_aborts() {
        let source = "H\nvalue";
        let mapping = FieldMapping::builder()
            .field("Out", Locator::header("Missing"), identity)
            .build()
            .unwrap();

        let result = transform_fields(source, 1, &mapping);
        assert!(matches!(result, Err(MappingError::UnknownHeader(name)) if name == "Missing"));
    }

    #[test]
    fn test_short_row_aborts() {
        let source = "a,b,c\nd";
        let mapping = FieldMapping::builder()
            .field("Out", Locator::column(2), identity)
            .build()
            .unwrap();

        let result = transform_rows(source, false, &mapping);
        assert!(matches!(
            result,
            Err(MappingError::IndexOutOfRange { index: 2, row: 1, width: 1 })
        ));
    }

    #[test]
    fn test_header_locator_rejected_in_row_mode() {
        let mapping = FieldMapping::builder()
            .field("Out", Locator::header("A"), identity)
            .build()
            .unwrap();

        let result = transform_rows("a,b\n1,2", true, &mapping);
        assert!(matches!(
            result,
            Err(MappingError::HeaderLocatorInRowLayout(t)) if t == "Out"
        ));
    }

    #[test]
    fn test_truncation_reported() {
        let source = "H1\nH2\na\nb\nc";
        let mapping = FieldMapping::builder()
            .field("One", Locator::header("H1"), identity)
            .build()
            .unwrap();

        let output = transform_fields(source, 2, &mapping).unwrap();
        assert_eq!(output.record_count, 1);
        assert_eq!(output.dropped_lines, 1);
        assert!(output.summary().contains("dropped"));
    }

    #[test]
    fn test_zero_header_rows_yields_header_only() {
        let mapping = FieldMapping::builder()
            .field("Out", Locator::column(0), identity)
            .build()
            .unwrap();

        let output = transform_fields("a\nb\nc", 0, &mapping).unwrap();
        assert_eq!(output.record_count, 0);
        assert_eq!(output.text, "Out\n");
        assert_eq!(output.dropped_lines, 3);
    }

    #[test]
    fn test_sentinel_in_output_not_a_crash() {
        let source = "Currency\nXX";
        let mapping = FieldMapping::builder()
            .field(
                "Currency",
                Locator::header("Currency"),
                chain(vec![Conversion::CurrencyCode]),
            )
            .build()
            .unwrap();

        let output = transform_fields(source, 1, &mapping).unwrap();
        assert_eq!(output.text, "Currency\nError\n");
    }

    #[test]
    fn test_transform_with_spec_dispatch() {
        let spec = MappingSpec {
            version: "1.0".to_string(),
            description: String::new(),
            layout: LayoutSpec::Rows { has_header: true },
            fields: vec![crate::mapping::FieldSpec {
                target: "A".to_string(),
                locator: Locator::column(0),
                steps: Vec::new(),
            }],
        };

        let output = transform_with_spec("A\n1\n2", &spec).unwrap();
        assert_eq!(output.text, "A\n1\n2\n");
        assert_eq!(output.record_count, 2);
    }
}
