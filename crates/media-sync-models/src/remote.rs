use crate::media::MediaCategory;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A media item as returned by the remote catalog.
///
/// Only `id` is required. Every other field the remote sends is kept in
/// `extra` so cached entries round-trip the full object.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RemoteMedia {
    pub id: u64,
    /// Movie title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Series title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RemoteMedia {
    pub fn new(id: u64) -> Self {
        Self {
            id,
            title: None,
            name: None,
            extra: Map::new(),
        }
    }

    pub fn display_title(&self) -> Option<&str> {
        self.title.as_deref().or(self.name.as_deref())
    }
}

/// Remote identity of a resolved item
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct RemoteMediaRef {
    pub remote_id: u64,
    pub category: MediaCategory,
}

/// Response of a lookup by external id, split by media category
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FindResults {
    #[serde(default)]
    pub movie_results: Vec<RemoteMedia>,
    #[serde(default)]
    pub tv_results: Vec<RemoteMedia>,
}

impl FindResults {
    pub fn results_for(&self, category: MediaCategory) -> &[RemoteMedia] {
        match category {
            MediaCategory::Movie => &self.movie_results,
            MediaCategory::Series => &self.tv_results,
        }
    }
}

/// One page of an account listing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccountPage {
    pub page: u32,
    pub total_pages: u32,
    #[serde(default)]
    pub results: Vec<RemoteMedia>,
    #[serde(default)]
    pub total_results: Option<u64>,
}
