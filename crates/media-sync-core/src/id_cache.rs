use media_sync_models::RemoteMedia;
use std::collections::BTreeMap;

/// In-memory resolution cache: external id -> remote item, or `None` for a
/// lookup that found nothing.
///
/// A BTreeMap keeps the on-disk file ordered and diff-friendly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolutionCache {
    entries: BTreeMap<String, Option<RemoteMedia>>,

    /// Track dirty state so unchanged caches are not rewritten
    dirty: bool,
}

impl ResolutionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: BTreeMap<String, Option<RemoteMedia>>) -> Self {
        Self {
            entries,
            dirty: false,
        }
    }

    /// `None` on a miss, `Some(None)` for a cached "not found"
    pub fn get(&self, external_id: &str) -> Option<Option<&RemoteMedia>> {
        self.entries.get(external_id).map(Option::as_ref)
    }

    pub fn contains(&self, external_id: &str) -> bool {
        self.entries.contains_key(external_id)
    }

    pub fn insert_found(&mut self, external_id: &str, media: RemoteMedia) {
        self.entries.insert(external_id.to_string(), Some(media));
        self.dirty = true;
    }

    pub fn insert_not_found(&mut self, external_id: &str) {
        self.entries.insert(external_id.to_string(), None);
        self.dirty = true;
    }

    pub fn entries(&self) -> &BTreeMap<String, Option<RemoteMedia>> {
        &self.entries
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of cached negative results
    pub fn not_found_count(&self) -> usize {
        self.entries.values().filter(|entry| entry.is_none()).count()
    }
}
