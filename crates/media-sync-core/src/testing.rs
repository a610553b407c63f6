//! In-memory remote used by the engine tests.

use async_trait::async_trait;
use media_sync_models::{AccountPage, CollectionType, FindResults, MediaCategory, RemoteMedia};
use media_sync_sources::{AccountListing, AccountWriter, IdLookup, SourceError};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
pub enum RecordedWrite {
    Favorite { category: MediaCategory, remote_id: u64 },
    Watchlist { category: MediaCategory, remote_id: u64 },
    Rate { category: MediaCategory, remote_id: u64, value: f32 },
}

#[derive(Default)]
struct State {
    account: HashMap<(MediaCategory, CollectionType), Vec<u64>>,
    lookups: usize,
    listed_pages: usize,
    writes: Vec<RecordedWrite>,
}

/// Catalog plus account state. Successful writes are applied to the account,
/// so a fresh snapshot after a run sees them.
pub struct FakeRemote {
    catalog: HashMap<String, FindResults>,
    page_size: usize,
    failing_lookups: HashSet<String>,
    failing_writes: HashSet<u64>,
    failing_pages: HashSet<(MediaCategory, CollectionType, u32)>,
    state: Mutex<State>,
}

impl FakeRemote {
    pub fn new() -> Self {
        Self {
            catalog: HashMap::new(),
            page_size: 2,
            failing_lookups: HashSet::new(),
            failing_writes: HashSet::new(),
            failing_pages: HashSet::new(),
            state: Mutex::new(State::default()),
        }
    }

    pub fn with_movie(mut self, external_id: &str, remote_id: u64) -> Self {
        let mut media = RemoteMedia::new(remote_id);
        media.title = Some(format!("Movie {}", remote_id));
        self.catalog.entry(external_id.to_string()).or_default().movie_results.push(media);
        self
    }

    pub fn with_series(mut self, external_id: &str, remote_id: u64) -> Self {
        let mut media = RemoteMedia::new(remote_id);
        media.name = Some(format!("Series {}", remote_id));
        self.catalog.entry(external_id.to_string()).or_default().tv_results.push(media);
        self
    }

    pub fn with_account_item(self, category: MediaCategory, collection: CollectionType, remote_id: u64) -> Self {
        self.lock().account.entry((category, collection)).or_default().push(remote_id);
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn failing_lookup(mut self, external_id: &str) -> Self {
        self.failing_lookups.insert(external_id.to_string());
        self
    }

    pub fn failing_write(mut self, remote_id: u64) -> Self {
        self.failing_writes.insert(remote_id);
        self
    }

    pub fn failing_page(mut self, category: MediaCategory, collection: CollectionType, page: u32) -> Self {
        self.failing_pages.insert((category, collection, page));
        self
    }

    pub fn lookup_count(&self) -> usize {
        self.lock().lookups
    }

    pub fn listed_pages(&self) -> usize {
        self.lock().listed_pages
    }

    pub fn writes(&self) -> Vec<RecordedWrite> {
        self.lock().writes.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    fn write(
        &self,
        write: RecordedWrite,
        category: MediaCategory,
        collection: CollectionType,
        remote_id: u64,
    ) -> Result<(), SourceError> {
        if self.failing_writes.contains(&remote_id) {
            return Err(SourceError::with_status(format!("Failed to write {}: 500", remote_id), 500));
        }
        let mut state = self.lock();
        state.writes.push(write);
        let ids = state.account.entry((category, collection)).or_default();
        if !ids.contains(&remote_id) {
            ids.push(remote_id);
        }
        Ok(())
    }
}

#[async_trait]
impl IdLookup for FakeRemote {
    async fn find_by_external_id(&self, external_id: &str) -> Result<FindResults, SourceError> {
        self.lock().lookups += 1;
        if self.failing_lookups.contains(external_id) {
            return Err(SourceError::new(format!("Failed to look up {}: timed out", external_id)));
        }
        Ok(self.catalog.get(external_id).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl AccountListing for FakeRemote {
    async fn list_page(
        &self,
        category: MediaCategory,
        collection: CollectionType,
        page: u32,
    ) -> Result<AccountPage, SourceError> {
        if self.failing_pages.contains(&(category, collection, page)) {
            return Err(SourceError::with_status(format!("Failed to list page {}: 503", page), 503));
        }

        let mut state = self.lock();
        state.listed_pages += 1;
        let ids = state.account.get(&(category, collection)).cloned().unwrap_or_default();
        let total_pages = ids.len().div_ceil(self.page_size).max(1) as u32;
        let results = ids
            .chunks(self.page_size)
            .nth(page.saturating_sub(1) as usize)
            .map(|chunk| chunk.iter().map(|id| RemoteMedia::new(*id)).collect())
            .unwrap_or_default();

        Ok(AccountPage {
            page,
            total_pages,
            results,
            total_results: Some(ids.len() as u64),
        })
    }
}

#[async_trait]
impl AccountWriter for FakeRemote {
    async fn mark_favorite(&self, category: MediaCategory, remote_id: u64) -> Result<(), SourceError> {
        self.write(
            RecordedWrite::Favorite { category, remote_id },
            category,
            CollectionType::Favorite,
            remote_id,
        )
    }

    async fn add_to_watchlist(&self, category: MediaCategory, remote_id: u64) -> Result<(), SourceError> {
        self.write(
            RecordedWrite::Watchlist { category, remote_id },
            category,
            CollectionType::Watchlist,
            remote_id,
        )
    }

    async fn rate(&self, category: MediaCategory, remote_id: u64, value: f32) -> Result<(), SourceError> {
        self.write(
            RecordedWrite::Rate {
                category,
                remote_id,
                value,
            },
            category,
            CollectionType::Rated,
            remote_id,
        )
    }
}
