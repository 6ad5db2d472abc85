//! Built-in mapping specs for the known source layouts.
//!
//! These are the reference instantiations against the canonical schema
//! `{AccountCode, Name, Type, Open Date, Currency}`: the field-oriented
//! account statement and the two CSV export variants. They double as
//! worked examples of what a mapping spec file looks like.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::mapping::{Conversion, FieldSpec, LayoutSpec, Locator, MappingSpec};

static BUILTINS: Lazy<Vec<(&'static str, MappingSpec)>> = Lazy::new(|| {
    vec![
        ("statement", statement()),
        ("export-headered", export_headered()),
        ("export-bare", export_bare()),
    ]
});

/// Look up a built-in format by name.
pub fn builtin(name: &str) -> Option<MappingSpec> {
    BUILTINS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, spec)| spec.clone())
}

/// Names of all built-in formats, in registration order.
pub fn builtin_names() -> Vec<&'static str> {
    BUILTINS.iter().map(|(n, _)| *n).collect()
}

fn date_reformat() -> Conversion {
    Conversion::ReformatDate {
        from: "%d-%m-%Y".to_string(),
        to: "%Y-%m-%d".to_string(),
    }
}

fn code_from_composite() -> Conversion {
    Conversion::SplitTake {
        separator: "|".to_string(),
        index: 1,
    }
}

/// Field-oriented account statement: five header lines, then five lines
/// per record, account code embedded as `id|code`.
fn statement() -> MappingSpec {
    MappingSpec {
        version: "1.0".to_string(),
        description: "Field-oriented account statement (one value per line)".to_string(),
        layout: LayoutSpec::Fields { header_rows: 5 },
        fields: vec![
            FieldSpec {
                target: "AccountCode".to_string(),
                locator: Locator::header("Identifier"),
                steps: vec![code_from_composite()],
            },
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
            FieldSpec {
                target: "Open Date".to_string(),
                locator: Locator::header("Opened"),
                steps: vec![date_reformat()],
            },
            FieldSpec {
                target: "Currency".to_string(),
                locator: Locator::header("Currency"),
                steps: vec![Conversion::CurrencyCode],
            },
        ],
    }
}

/// Headered CSV export: same vocabulary as the statement, one record
/// per row.
fn export_headered() -> MappingSpec {
    MappingSpec {
        version: "1.0".to_string(),
        description: "Headered CSV export (one record per row)".to_string(),
        layout: LayoutSpec::Rows { has_header: true },
        fields: vec![
            FieldSpec {
                target: "AccountCode".to_string(),
                locator: Locator::column(0),
                steps: vec![code_from_composite()],
            },
            FieldSpec {
                target: "Name".to_string(),
                locator: Locator::column(1),
                steps: Vec::new(),
            },
            FieldSpec {
                target: "Type".to_string(),
                locator: Locator::column(2),
                steps: vec![Conversion::AccountTypeName],
            },
            FieldSpec {
                target: "Open Date".to_string(),
                locator: Locator::column(3),
                steps: vec![date_reformat()],
            },
            FieldSpec {
                target: "Currency".to_string(),
                locator: Locator::column(4),
                steps: vec![Conversion::CurrencyCode],
            },
        ],
    }
}

/// Bare CSV export: no header row, `Name,Type,Currency,AccountCode`
/// column order, single-letter currency codes, no open date recorded.
fn export_bare() -> MappingSpec {
    let currency_letters: HashMap<String, String> = [("C", "CAD"), ("U", "USD")]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    MappingSpec {
        version: "1.0".to_string(),
        description: "Bare CSV export (no header row, no open date)".to_string(),
        layout: LayoutSpec::Rows { has_header: false },
        fields: vec![
            FieldSpec {
                target: "AccountCode".to_string(),
                locator: Locator::column(3),
                steps: Vec::new(),
            },
            FieldSpec {
                target: "Name".to_string(),
                locator: Locator::column(0),
                steps: Vec::new(),
            },
            FieldSpec {
                target: "Type".to_string(),
                locator: Locator::column(1),
                steps: vec![Conversion::AccountTypeName],
            },
            FieldSpec {
                // this export does not record an open date
                target: "Open Date".to_string(),
                locator: Locator::column(0),
                steps: vec![Conversion::Constant {
                    value: String::new(),
                }],
            },
            FieldSpec {
                target: "Currency".to_string(),
                locator: Locator::column(2),
                steps: vec![Conversion::MapCode {
                    mapping: currency_letters,
                    unmapped: "Err".to_string(),
                }],
            },
        ],
    }
}
