use crate::media::MediaCategory;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One data row of a tabular export, keyed by lower-cased header name.
///
/// Rows shorter than the header simply lack the trailing columns, so
/// `get` distinguishes "column absent from this row" (`None`) from
/// "column present but empty" (`Some("")`).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExportRow {
    /// 1-based data line (header excluded)
    pub line: u64,
    fields: HashMap<String, String>,
}

impl ExportRow {
    pub fn new(line: u64) -> Self {
        Self {
            line,
            fields: HashMap::new(),
        }
    }

    pub fn insert(&mut self, column: &str, value: impl Into<String>) {
        self.fields.insert(normalize_column(column), value.into());
    }

    pub fn with_field(mut self, column: &str, value: impl Into<String>) -> Self {
        self.insert(column, value);
        self
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(&normalize_column(column)).map(String::as_str)
    }

    /// First present column out of a list of aliases
    pub fn get_any(&self, columns: &[&str]) -> Option<&str> {
        columns.iter().find_map(|column| self.get(column))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

fn normalize_column(column: &str) -> String {
    column.trim().to_lowercase()
}

/// A single exported title, ready for classification
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourceRecord {
    pub external_id: String,
    pub title: String,
    pub category: MediaCategory,
    /// Raw "Title Type" label from the export, kept for diagnostics
    pub title_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating_raw: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl SourceRecord {
    /// The user's rating as an integer, if the raw value parses as one
    pub fn parsed_rating(&self) -> Option<i32> {
        self.rating_raw
            .as_deref()
            .and_then(|raw| raw.trim().parse::<i32>().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(rating_raw: Option<&str>) -> SourceRecord {
        SourceRecord {
            external_id: "tt001".to_string(),
            title: "Movie A".to_string(),
            category: MediaCategory::Movie,
            title_type: "movie".to_string(),
            rating_raw: rating_raw.map(str::to_string),
            url: None,
        }
    }

    #[test]
    fn test_parsed_rating() {
        assert_eq!(record(Some("9")).parsed_rating(), Some(9));
        assert_eq!(record(Some(" 7 ")).parsed_rating(), Some(7));
        assert_eq!(record(Some("")).parsed_rating(), None);
        assert_eq!(record(Some("8.5")).parsed_rating(), None);
        assert_eq!(record(Some("n/a")).parsed_rating(), None);
        assert_eq!(record(None).parsed_rating(), None);
    }

    #[test]
    fn test_export_row_lookup_is_case_insensitive() {
        let row = ExportRow::new(1)
            .with_field("Const", "tt001")
            .with_field("Your Rating", "");

        assert_eq!(row.get("const"), Some("tt001"));
        assert_eq!(row.get("CONST"), Some("tt001"));
        assert_eq!(row.get_any(&["you rated", "your rating"]), Some(""));
        assert_eq!(row.get("title type"), None);
    }
}
