use media_sync_models::{CollectionType, ExportRow, MediaCategory, SourceRecord};
use media_sync_sources::imdb::{COLUMN_ID, COLUMN_RATING, COLUMN_TITLE, COLUMN_TITLE_TYPE, COLUMN_URL};
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, warn};

/// Default minimum rating for a title to be added to favorites
pub const DEFAULT_FAVORITE_THRESHOLD: u8 = 8;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClassifyError {
    #[error("Malformed record on line {line}: missing '{missing}' field")]
    MalformedRecord { line: u64, missing: &'static str },
}

/// Records grouped by (category, collection), in input order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassifiedBuckets {
    buckets: HashMap<(MediaCategory, CollectionType), Vec<SourceRecord>>,
}

impl ClassifiedBuckets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, category: MediaCategory, collection: CollectionType) -> &[SourceRecord] {
        self.buckets
            .get(&(category, collection))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn push(&mut self, collection: CollectionType, record: SourceRecord) {
        self.buckets
            .entry((record.category, collection))
            .or_default()
            .push(record);
    }

    /// Number of (record, collection) pairs across all buckets
    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Result of classifying raw export rows
#[derive(Debug, Clone, Default)]
pub struct Classification {
    pub buckets: ClassifiedBuckets,
    /// Rows dropped because a required field was absent
    pub dropped: Vec<ClassifyError>,
}

/// Build a record from an export row.
///
/// The id and title type fields must be present in the row and the id must
/// not be empty. A missing or empty rating means "not rated".
pub fn record_from_row(row: &ExportRow) -> Result<SourceRecord, ClassifyError> {
    let malformed = |missing| ClassifyError::MalformedRecord {
        line: row.line,
        missing,
    };

    let external_id = row
        .get(COLUMN_ID)
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| malformed(COLUMN_ID))?;
    let title_type = row.get(COLUMN_TITLE_TYPE).ok_or_else(|| malformed(COLUMN_TITLE_TYPE))?;

    Ok(SourceRecord {
        external_id: external_id.to_string(),
        title: row.get(COLUMN_TITLE).unwrap_or_default().to_string(),
        category: MediaCategory::from_title_type(title_type),
        title_type: title_type.to_string(),
        rating_raw: row
            .get_any(&COLUMN_RATING)
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
            .map(str::to_string),
        url: row
            .get(COLUMN_URL)
            .filter(|url| !url.is_empty())
            .map(str::to_string),
    })
}

/// Sort records into collections.
///
/// - no parseable rating: Watchlist only
/// - any parseable rating: Rated, plus Favorite when `rating >= favorite_threshold`
pub fn classify<I>(records: I, favorite_threshold: u8) -> ClassifiedBuckets
where
    I: IntoIterator<Item = SourceRecord>,
{
    let mut buckets = ClassifiedBuckets::new();

    for record in records {
        match record.parsed_rating() {
            Some(rating) => {
                if rating >= i32::from(favorite_threshold) {
                    buckets.push(CollectionType::Favorite, record.clone());
                }
                buckets.push(CollectionType::Rated, record);
            }
            None => buckets.push(CollectionType::Watchlist, record),
        }
    }

    debug!(
        favorite_threshold,
        entries = buckets.len(),
        "Classified records"
    );
    buckets
}

/// Convert and classify raw rows, dropping malformed ones with a diagnostic
pub fn classify_rows(rows: &[ExportRow], favorite_threshold: u8) -> Classification {
    let mut records = Vec::with_capacity(rows.len());
    let mut dropped = Vec::new();

    for row in rows {
        match record_from_row(row) {
            Ok(record) => records.push(record),
            Err(e) => {
                warn!(line = row.line, "Dropping row: {}", e);
                dropped.push(e);
            }
        }
    }

    Classification {
        buckets: classify(records, favorite_threshold),
        dropped,
    }
}
