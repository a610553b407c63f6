use media_sync_models::{CollectionType, MediaCategory};
use media_sync_sources::{AccountListing, SourceError};
use std::collections::{HashMap, HashSet};
use thiserror::Error;
use tracing::{debug, info};

/// Upper bound on pages fetched for one collection listing
pub const MAX_PAGES: u32 = 1000;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Failed to fetch {category} {collection} page {page}: {source}")]
    Remote {
        category: MediaCategory,
        collection: CollectionType,
        page: u32,
        #[source]
        source: SourceError,
    },

    #[error("{category} {collection} listing did not finish within {limit} pages")]
    PageLimitExceeded {
        category: MediaCategory,
        collection: CollectionType,
        limit: u32,
    },
}

/// Remote ids currently in each collection of the account, taken once at the
/// start of a run and never updated afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RemoteSnapshot {
    members: HashMap<(MediaCategory, CollectionType), HashSet<u64>>,
}

impl RemoteSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, category: MediaCategory, collection: CollectionType, remote_id: u64) {
        self.members.entry((category, collection)).or_default().insert(remote_id);
    }

    pub fn contains(&self, category: MediaCategory, collection: CollectionType, remote_id: u64) -> bool {
        self.members
            .get(&(category, collection))
            .is_some_and(|ids| ids.contains(&remote_id))
    }

    pub fn ids(&self, category: MediaCategory, collection: CollectionType) -> Option<&HashSet<u64>> {
        self.members.get(&(category, collection))
    }

    /// Number of ids in one collection
    pub fn len(&self, category: MediaCategory, collection: CollectionType) -> usize {
        self.ids(category, collection).map_or(0, HashSet::len)
    }

    pub fn total(&self) -> usize {
        self.members.values().map(HashSet::len).sum()
    }
}

/// Fetch every page of one collection listing and return the ids it holds
pub async fn fetch_collection(
    account: &dyn AccountListing,
    category: MediaCategory,
    collection: CollectionType,
) -> Result<HashSet<u64>, SnapshotError> {
    let mut ids = HashSet::new();
    let mut requested: u32 = 1;

    for _ in 0..MAX_PAGES {
        let page = account
            .list_page(category, collection, requested)
            .await
            .map_err(|source| SnapshotError::Remote {
                category,
                collection,
                page: requested,
                source,
            })?;

        debug!(
            category = %category,
            collection = %collection,
            page = page.page,
            total_pages = page.total_pages,
            results = page.results.len(),
            "Fetched listing page"
        );
        ids.extend(page.results.iter().map(|media| media.id));

        if page.page >= page.total_pages {
            return Ok(ids);
        }
        // Never go backwards, even if the remote echoes a stale page number
        requested = page.page.max(requested) + 1;
    }

    Err(SnapshotError::PageLimitExceeded {
        category,
        collection,
        limit: MAX_PAGES,
    })
}

/// Fetch all six (category, collection) listings. Any failure aborts the
/// whole snapshot.
pub async fn fetch_snapshot(account: &dyn AccountListing) -> Result<RemoteSnapshot, SnapshotError> {
    let mut snapshot = RemoteSnapshot::new();

    for category in MediaCategory::ALL {
        for collection in CollectionType::ALL {
            let ids = fetch_collection(account, category, collection).await?;
            info!("Remote {} {}: {} items", category, collection, ids.len());
            snapshot.members.insert((category, collection), ids);
        }
    }

    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeRemote;
    use async_trait::async_trait;
    use media_sync_models::{AccountPage, RemoteMedia};
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Listing whose page numbers and totals are scripted per call
    struct ScriptedListing {
        declared_page: fn(u32) -> u32,
        total_pages: u32,
        calls: AtomicU32,
    }

    impl ScriptedListing {
        fn new(declared_page: fn(u32) -> u32, total_pages: u32) -> Self {
            Self {
                declared_page,
                total_pages,
                calls: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl AccountListing for ScriptedListing {
        async fn list_page(
            &self,
            _category: MediaCategory,
            _collection: CollectionType,
            page: u32,
        ) -> Result<AccountPage, SourceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(AccountPage {
                page: (self.declared_page)(page),
                total_pages: self.total_pages,
                results: vec![RemoteMedia::new(u64::from(page))],
                total_results: None,
            })
        }
    }

    #[tokio::test]
    async fn test_merges_all_pages() {
        let mut remote = FakeRemote::new().with_page_size(2);
        for id in [1, 2, 3, 4, 5] {
            remote = remote.with_account_item(MediaCategory::Movie, CollectionType::Rated, id);
        }

        let ids = fetch_collection(&remote, MediaCategory::Movie, CollectionType::Rated).await.unwrap();

        assert_eq!(ids, HashSet::from([1, 2, 3, 4, 5]));
        assert_eq!(remote.listed_pages(), 3);
    }

    #[tokio::test]
    async fn test_snapshot_covers_all_six_listings() {
        let remote = FakeRemote::new()
            .with_account_item(MediaCategory::Movie, CollectionType::Favorite, 10)
            .with_account_item(MediaCategory::Series, CollectionType::Watchlist, 20)
            .with_account_item(MediaCategory::Series, CollectionType::Watchlist, 20);

        let snapshot = fetch_snapshot(&remote).await.unwrap();

        assert!(snapshot.contains(MediaCategory::Movie, CollectionType::Favorite, 10));
        assert!(!snapshot.contains(MediaCategory::Movie, CollectionType::Watchlist, 10));
        assert!(snapshot.contains(MediaCategory::Series, CollectionType::Watchlist, 20));
        assert_eq!(snapshot.len(MediaCategory::Series, CollectionType::Watchlist), 1);
        assert_eq!(snapshot.total(), 2);
        // Empty listings still answer with one page
        assert_eq!(remote.listed_pages(), 6);
    }

    #[tokio::test]
    async fn test_failing_page_aborts_snapshot() {
        let mut remote = FakeRemote::new()
            .with_page_size(1)
            .failing_page(MediaCategory::Series, CollectionType::Rated, 2);
        for id in [1, 2, 3] {
            remote = remote.with_account_item(MediaCategory::Series, CollectionType::Rated, id);
        }

        let err = fetch_snapshot(&remote).await.unwrap_err();

        match err {
            SnapshotError::Remote {
                category,
                collection,
                page,
                source,
            } => {
                assert_eq!(category, MediaCategory::Series);
                assert_eq!(collection, CollectionType::Rated);
                assert_eq!(page, 2);
                assert_eq!(source.status(), Some(503));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_huge_total_pages_hits_limit() {
        let listing = ScriptedListing::new(|page| page, u32::MAX);

        let err = fetch_collection(&listing, MediaCategory::Movie, CollectionType::Favorite)
            .await
            .unwrap_err();

        assert!(matches!(err, SnapshotError::PageLimitExceeded { limit: MAX_PAGES, .. }));
        assert_eq!(listing.calls.load(Ordering::SeqCst), MAX_PAGES);
    }

    #[tokio::test]
    async fn test_stale_page_number_still_advances() {
        // Remote always claims page 0 of 3
        let listing = ScriptedListing::new(|_| 0, 3);

        let ids = fetch_collection(&listing, MediaCategory::Movie, CollectionType::Favorite)
            .await
            .unwrap_err();

        // Declared page never reaches the total, so the bound kicks in while
        // requested pages keep increasing
        assert!(matches!(ids, SnapshotError::PageLimitExceeded { .. }));
        assert_eq!(listing.calls.load(Ordering::SeqCst), MAX_PAGES);
    }

    #[tokio::test]
    async fn test_lagging_page_number_finishes() {
        // Remote reports one less than requested; the request counter drives progress
        let listing = ScriptedListing::new(|page| page.saturating_sub(1), 3);

        let ids = fetch_collection(&listing, MediaCategory::Movie, CollectionType::Favorite)
            .await
            .unwrap();

        // Requests 1..=4; page 4 declares 3 == total_pages
        assert_eq!(ids, HashSet::from([1, 2, 3, 4]));
        assert_eq!(listing.calls.load(Ordering::SeqCst), 4);
    }
}
