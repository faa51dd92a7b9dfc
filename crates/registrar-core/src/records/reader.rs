//! CSV record loading and validation

use std::collections::{BTreeMap, BTreeSet};

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::debug;

use crate::error::{Error, Result};

/// One loaded CSV row, keyed by requested field name
pub type Record = BTreeMap<String, String>;

/// Normalize a header token: strip whitespace (and a stray BOM) and lowercase.
///
/// Uploaded CSVs are often produced by spreadsheet tools that pad headers,
/// and their authors rarely know field names are case-sensitive.
pub fn normalize_header(header: &str) -> String {
    header.trim_matches('\u{feff}').trim().to_lowercase()
}

fn join_fields<'a>(fields: impl IntoIterator<Item = &'a str>) -> String {
    fields.into_iter().collect::<Vec<_>>().join(", ")
}

/// Load a CSV string into records keyed by `field_names`.
///
/// Headers are matched case- and whitespace-insensitively and must include
/// every field not listed in `optional_fields`. Columns that were not
/// requested are dropped and values are trimmed. Optional fields appear in
/// a record only when their column exists.
///
/// # Errors
/// [`Error::Validation`] when a required header is missing, or when a row is
/// ragged or has an empty required value. Rows are numbered from 1.
pub fn load_records_from_csv(
    text: &str,
    field_names: &[&str],
    optional_fields: &[&str],
) -> Result<Vec<Record>> {
    let requested: BTreeSet<&str> = field_names.iter().copied().collect();
    let optional: BTreeSet<&str> = optional_fields.iter().copied().collect();
    let required: BTreeSet<&str> = requested.difference(&optional).copied().collect();

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::None)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(normalize_header).collect();

    // Later duplicate headers win.
    let mut columns: BTreeMap<&str, usize> = BTreeMap::new();
    for (index, header) in headers.iter().enumerate() {
        if let Some(field) = requested.get(header.as_str()) {
            columns.insert(*field, index);
        }
    }

    let missing: Vec<&str> = required
        .iter()
        .copied()
        .filter(|field| !columns.contains_key(field))
        .collect();
    if !missing.is_empty() {
        return Err(Error::validation(format!(
            "CSV is missing headers [{}]",
            join_fields(missing)
        )));
    }

    let mut records = Vec::new();
    for (index, row) in reader.records().enumerate() {
        let row = row?;
        let row_number = index + 1;

        if !row_is_complete(&row, headers.len(), &required, &columns) {
            return Err(Error::validation(format!(
                "CSV is missing data at row #{}. Required fields are [{}].",
                row_number,
                join_fields(requested.iter().copied())
            )));
        }

        let record: Record = columns
            .iter()
            .map(|(field, &column)| {
                let value = row.get(column).unwrap_or_default();
                (field.to_string(), value.trim().to_string())
            })
            .collect();
        records.push(record);
    }

    debug!(
        rows = records.len(),
        columns = columns.len(),
        "loaded CSV records"
    );
    Ok(records)
}

/// A row is complete when it has exactly one value per header and every
/// required value is non-empty.
fn row_is_complete(
    row: &StringRecord,
    width: usize,
    required: &BTreeSet<&str>,
    columns: &BTreeMap<&str, usize>,
) -> bool {
    if row.len() != width {
        return false;
    }
    required.iter().all(|field| {
        columns
            .get(field)
            .and_then(|&column| row.get(column))
            .is_some_and(|value| !value.is_empty())
    })
}
