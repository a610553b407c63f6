use anyhow::{Context, Result};
use csv::ReaderBuilder;
use media_sync_models::ExportRow;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

/// Column holding the IMDb id ("tt...")
pub const COLUMN_ID: &str = "const";
pub const COLUMN_TITLE: &str = "title";
pub const COLUMN_TITLE_TYPE: &str = "title type";
pub const COLUMN_URL: &str = "url";
/// The rating column was renamed between export formats
pub const COLUMN_RATING: [&str; 2] = ["you rated", "your rating"];

/// Parse an IMDb list/ratings export into generic rows
pub fn parse_export_csv<P: AsRef<Path>>(path: P) -> Result<Vec<ExportRow>> {
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open CSV export {}", path.display()))?;
    parse_export_reader(file)
        .with_context(|| format!("Failed to parse CSV export {}", path.display()))
}

/// Parse rows from any reader.
///
/// The header row is required. Data rows may be shorter than the header;
/// their missing trailing columns are simply absent from the row. A row the
/// CSV reader cannot decode is logged and skipped.
pub fn parse_export_reader<R: Read>(reader: R) -> Result<Vec<ExportRow>> {
    let mut reader = ReaderBuilder::new().flexible(true).from_reader(reader);

    let headers: Vec<String> = reader
        .headers()
        .context("Failed to read CSV header")?
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect();

    debug!("Available CSV columns: {:?}", headers);
    if !headers.iter().any(|h| h == COLUMN_ID) {
        warn!(
            "CSV has no '{}' column; every row will be dropped. Available columns: {:?}",
            COLUMN_ID, headers
        );
    }

    let mut rows = Vec::new();
    let mut line = 0u64;
    for result in reader.records() {
        line += 1;
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                warn!(row = line, error = %e, "Skipping unreadable CSV row");
                continue;
            }
        };

        let mut row = ExportRow::new(line);
        for (column, value) in headers.iter().zip(record.iter()) {
            row.insert(column, value);
        }

        if line <= 3 {
            debug!(
                row = line,
                imdb_id = ?row.get(COLUMN_ID),
                title = ?row.get(COLUMN_TITLE),
                title_type = ?row.get(COLUMN_TITLE_TYPE),
                rating = ?row.get_any(&COLUMN_RATING),
                "Parsed CSV row"
            );
        }

        rows.push(row);
    }

    info!("Parsed {} rows from CSV export", rows.len());
    Ok(rows)
}
