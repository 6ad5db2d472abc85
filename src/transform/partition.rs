//! Record partitioning for the two source shapes.
//!
//! Field-oriented sources frame a record as a fixed run of consecutive
//! lines; row-oriented sources frame a record as one comma-delimited
//! line. Both partitioners are pure views over a [`RawDocument`].

use tracing::warn;

use crate::document::RawDocument;

/// Borrowed view over one logical record's values.
///
/// Field-oriented: one value per line of the record's chunk.
/// Row-oriented: one value per comma-separated column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRecord<'a> {
    values: Vec<&'a str>,
}

impl<'a> SourceRecord<'a> {
    pub fn new(values: Vec<&'a str>) -> Self {
        Self { values }
    }

    /// Value at `index`, if in range.
    pub fn get(&self, index: usize) -> Option<&'a str> {
        self.values.get(index).copied()
    }

    /// Number of values in this record.
    pub fn width(&self) -> usize {
        self.values.len()
    }

    pub fn values(&self) -> &[&'a str] {
        &self.values
    }
}

// =============================================================================
// Field-oriented partitioning
// =============================================================================

/// Result of partitioning a field-oriented document.
#[derive(Debug)]
pub struct FieldPartition<'a> {
    /// The header layout: the first `header_rows` lines. Its length is
    /// also the number of lines per record.
    pub headers: Vec<&'a str>,
    /// Records, in input order.
    pub records: Vec<SourceRecord<'a>>,
    /// Trailing lines that did not fill a whole record and were
    /// dropped. Surfaced so callers can audit the truncation.
    pub dropped_lines: usize,
}

/// Partition a field-oriented document: the first `header_rows` lines
/// are the header layout, and every following run of `header_rows`
/// lines is one record.
///
/// Trailing lines short of a full record are dropped, preserving the
/// long-standing truncation behavior of this format; the count is
/// reported and logged. `header_rows == 0` means no framing is
/// possible: zero records, never a division by zero.
pub fn partition_fields<'a>(doc: &RawDocument<'a>, header_rows: usize) -> FieldPartition<'a> {
    let lines = doc.lines();

    if header_rows == 0 {
        warn!(
            lines = lines.len(),
            "header_rows is 0; no records can be framed"
        );
        return FieldPartition {
            headers: Vec::new(),
            records: Vec::new(),
            dropped_lines: lines.len(),
        };
    }

    let header_end = header_rows.min(lines.len());
    let headers: Vec<&str> = lines[..header_end].to_vec();
    let body = &lines[header_end..];

    let dropped_lines = body.len() % header_rows;
    if dropped_lines > 0 {
        warn!(
            dropped_lines,
            record_lines = header_rows,
            "trailing lines do not fill a record; dropping them"
        );
    }

    let records = body
        .chunks_exact(header_rows)
        .map(|chunk| SourceRecord::new(chunk.to_vec()))
        .collect();

    FieldPartition {
        headers,
        records,
        dropped_lines,
    }
}

// =============================================================================
// Row-oriented partitioning
// =============================================================================

/// Result of partitioning a row-oriented document.
#[derive(Debug)]
pub struct RowPartition<'a> {
    /// Records, in input order.
    pub records: Vec<SourceRecord<'a>>,
}

/// Partition a row-oriented document: skip the first line iff
/// `has_header`, then every remaining line is one record, split on `,`.
///
/// No width validation happens here; a short row surfaces an
/// out-of-range lookup only when a locator resolves against it.
pub fn partition_rows<'a>(doc: &RawDocument<'a>, has_header: bool) -> RowPartition<'a> {
    let lines = doc.lines();
    let body = if has_header {
        lines.get(1..).unwrap_or(&[])
    } else {
        lines
    };

    let records = body
        .iter()
        .map(|line| SourceRecord::new(line.split(',').collect()))
        .collect();

    RowPartition { records }
}
