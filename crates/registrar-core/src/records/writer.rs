//! CSV serialization

use std::collections::{BTreeMap, HashMap};

use csv::{QuoteStyle, Terminator, WriterBuilder};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Item that can be written as a CSV row
///
/// Returning `None` leaves the column empty.
pub trait CsvItem {
    /// Rendered value of the named field
    fn csv_field(&self, name: &str) -> Option<String>;
}

/// Render a JSON value the way it appears in exported CSVs
pub fn render_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

impl CsvItem for Map<String, Value> {
    fn csv_field(&self, name: &str) -> Option<String> {
        self.get(name).map(render_value)
    }
}

impl CsvItem for Value {
    fn csv_field(&self, name: &str) -> Option<String> {
        match self {
            Value::Object(map) => map.csv_field(name),
            _ => None,
        }
    }
}

impl CsvItem for BTreeMap<String, String> {
    fn csv_field(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl CsvItem for HashMap<String, String> {
    fn csv_field(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl<T: CsvItem + ?Sized> CsvItem for &T {
    fn csv_field(&self, name: &str) -> Option<String> {
        (**self).csv_field(name)
    }
}

/// Serialize items into a CSV-formatted string, optionally with a header row.
///
/// Only the columns in `field_names` are written, in that order; extra item
/// fields are ignored and missing ones are left empty. Rows end with `\r\n`,
/// including the last one.
pub fn serialize_to_csv<I, T, S>(items: I, field_names: &[S], include_headers: bool) -> Result<String>
where
    I: IntoIterator<Item = T>,
    T: CsvItem,
    S: AsRef<str>,
{
    let mut writer = WriterBuilder::new()
        .terminator(Terminator::CRLF)
        .quote_style(QuoteStyle::Necessary)
        .from_writer(Vec::new());

    if include_headers {
        let headers: Vec<&str> = field_names.iter().map(|name| name.as_ref()).collect();
        writer.write_record(&headers)?;
    }

    for item in items {
        let row: Vec<String> = field_names
            .iter()
            .map(|name| item.csv_field(name.as_ref()).unwrap_or_default())
            .collect();
        writer.write_record(&row)?;
    }

    let bytes = writer.into_inner().map_err(|e| Error::Io(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| Error::Decode(e.utf8_error()))
}
