use serde::{Deserialize, Serialize};
use std::fmt;

/// IMDb "Title Type" label that maps to a TMDB series.
///
/// Matching is exact. Other television labels ("TV Mini Series", "TV Movie",
/// "TV Special", ...) fall through to [`MediaCategory::Movie`].
pub const SERIES_TITLE_TYPE: &str = "TV Series";

/// Media category as understood by the remote catalog.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MediaCategory {
    #[serde(rename = "movie")]
    Movie,
    #[serde(rename = "tv")]
    Series,
}

impl MediaCategory {
    /// Reconciliation order: movies first, then series
    pub const ALL: [MediaCategory; 2] = [MediaCategory::Movie, MediaCategory::Series];

    pub fn from_title_type(title_type: &str) -> Self {
        if title_type == SERIES_TITLE_TYPE {
            MediaCategory::Series
        } else {
            MediaCategory::Movie
        }
    }

    /// Path/body segment used by the remote API ("movie" or "tv")
    pub fn api_name(&self) -> &'static str {
        match self {
            MediaCategory::Movie => "movie",
            MediaCategory::Series => "tv",
        }
    }

    /// Plural segment used by account listings ("movies" or "tv")
    pub fn listing_name(&self) -> &'static str {
        match self {
            MediaCategory::Movie => "movies",
            MediaCategory::Series => "tv",
        }
    }
}

impl fmt::Display for MediaCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.api_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_series_label_is_exact_match() {
        assert_eq!(MediaCategory::from_title_type("TV Series"), MediaCategory::Series);
        assert_eq!(MediaCategory::from_title_type("tv series"), MediaCategory::Movie);
        assert_eq!(MediaCategory::from_title_type("TV Mini Series"), MediaCategory::Movie);
        assert_eq!(MediaCategory::from_title_type("TV Movie"), MediaCategory::Movie);
        assert_eq!(MediaCategory::from_title_type(""), MediaCategory::Movie);
    }

    #[test]
    fn test_category_serializes_as_api_name() {
        assert_eq!(serde_json::to_string(&MediaCategory::Series).unwrap(), "\"tv\"");
        assert_eq!(serde_json::to_string(&MediaCategory::Movie).unwrap(), "\"movie\"");
    }
}
