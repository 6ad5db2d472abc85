//! Declarative conversion steps.
//!
//! Pure string transformations that can be named in a mapping spec file
//! and chained per field. Every step is total: input it does not
//! recognize degrades to the sentinel value (or a per-step override),
//! so one bad source value marks itself in the output instead of
//! aborting the batch.

use std::collections::HashMap;
use std::fmt::Write as _;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Convert;
use crate::models::{AccountType, Currency, SENTINEL};

/// All available conversion steps.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Conversion {
    /// Pass the value through unchanged.
    Identity,

    /// Remove leading and trailing whitespace.
    Trim,

    /// Convert to uppercase.
    Uppercase,

    /// Convert to lowercase.
    Lowercase,

    /// Ignore the source value and emit a fixed string.
    Constant {
        #[serde(default)]
        value: String,
    },

    /// Split a composite value and keep one piece (e.g. the account
    /// code out of `123|AbcCode`). An out-of-range piece index yields
    /// the sentinel.
    SplitTake {
        #[serde(default = "default_split_separator")]
        separator: String,
        index: usize,
    },

    /// Replace using a regex pattern.
    Replace {
        pattern: String,
        #[serde(default)]
        value: String,
    },

    /// Map values through a lookup table. A value absent from the table
    /// yields `unmapped` (the sentinel unless overridden).
    MapCode {
        mapping: HashMap<String, String>,
        #[serde(default = "default_sentinel")]
        unmapped: String,
    },

    /// Re-render a date from one strftime format to another. Empty
    /// input stays empty (missing values are blank by convention);
    /// anything unparseable yields the sentinel.
    ReformatDate {
        #[serde(default = "default_date_from")]
        from: String,
        #[serde(default = "default_date_to")]
        to: String,
    },

    /// Numeric account-type code to canonical type name.
    AccountTypeName,

    /// Currency abbreviation to ISO currency code.
    CurrencyCode,
}

fn default_split_separator() -> String {
    "|".to_string()
}

fn default_sentinel() -> String {
    SENTINEL.to_string()
}

fn default_date_from() -> String {
    "%d-%m-%Y".to_string()
}

fn default_date_to() -> String {
    "%Y-%m-%d".to_string()
}

impl Conversion {
    /// Apply this step to a raw value.
    pub fn apply(&self, raw: &str) -> String {
        match self {
            Conversion::Identity => raw.to_string(),
            Conversion::Trim => raw.trim().to_string(),
            Conversion::Uppercase => raw.to_uppercase(),
            Conversion::Lowercase => raw.to_lowercase(),
            Conversion::Constant { value } => value.clone(),
            Conversion::SplitTake { separator, index } => apply_split_take(raw, separator, *index),
            Conversion::Replace { pattern, value } => apply_replace(raw, pattern, value),
            Conversion::MapCode { mapping, unmapped } => mapping
                .get(raw)
                .cloned()
                .unwrap_or_else(|| unmapped.clone()),
            Conversion::ReformatDate { from, to } => apply_reformat_date(raw, from, to),
            Conversion::AccountTypeName => AccountType::from_code(raw)
                .map(|ty| ty.name().to_string())
                .unwrap_or_else(|| SENTINEL.to_string()),
            Conversion::CurrencyCode => Currency::from_code(raw)
                .map(|c| c.code().to_string())
                .unwrap_or_else(|| SENTINEL.to_string()),
        }
    }
}

fn apply_split_take(raw: &str, separator: &str, index: usize) -> String {
    if separator.is_empty() {
        return raw.to_string();
    }
    raw.split(separator)
        .nth(index)
        .map(str::to_string)
        .unwrap_or_else(|| SENTINEL.to_string())
}

fn apply_replace(raw: &str, pattern: &str, replacement: &str) -> String {
    // An unparseable pattern leaves the value unchanged
    regex::Regex::new(pattern)
        .map(|re| re.replace_all(raw, replacement).to_string())
        .unwrap_or_else(|_| raw.to_string())
}

fn apply_reformat_date(raw: &str, from: &str, to: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }
    let Ok(date) = NaiveDate::parse_from_str(raw, from) else {
        return SENTINEL.to_string();
    };
    // write! propagates errors from unknown output format specifiers
    let mut out = String::new();
    match write!(out, "{}", date.format(to)) {
        Ok(()) => out,
        Err(_) => SENTINEL.to_string(),
    }
}

/// Compose a sequence of steps into one converter, applied in order.
/// An empty sequence is the identity.
pub fn chain(steps: Vec<Conversion>) -> impl Convert {
    move |raw: &str| {
        steps
            .iter()
            .fold(raw.to_string(), |value, step| step.apply(&value))
    }
}

/// Human-readable listing of the available conversion steps.
pub fn conversions_description() -> String {
    r#"Available conversion steps:

| Step | Description | Parameters |
|------|-------------|------------|
| identity | Pass value through unchanged | - |
| trim | Remove leading/trailing whitespace | - |
| uppercase | Convert to uppercase | - |
| lowercase | Convert to lowercase | - |
| constant | Emit a fixed string | value: the string |
| split_take | Split composite value, keep one piece | separator (default "|"), index: zero-based piece |
| replace | Regex pattern replacement | pattern: regex, value: replacement |
| map_code | Map values through a lookup table | mapping: {source: target}, unmapped: fallback (default "Error") |
| reformat_date | Re-render a date between strftime formats | from (default "%d-%m-%Y"), to (default "%Y-%m-%d") |
| account_type_name | Numeric type code to canonical name | - |
| currency_code | Currency abbreviation to ISO code | - |

Example steps in JSON:
[
  {"type": "trim"},
  {"type": "split_take", "separator": "|", "index": 1},
  {"type": "map_code", "mapping": {"CD": "CAD", "US": "USD"}},
  {"type": "reformat_date", "from": "%d-%m-%Y", "to": "%Y-%m-%d"}
]"#
    .to_string()
}
