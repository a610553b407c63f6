use anyhow::Result;
use media_sync_models::{MediaCategory, RemoteMedia, RemoteMediaRef};
use media_sync_sources::{IdLookup, SourceError};
use std::sync::Arc;
use tracing::{debug, warn};
use crate::id_cache::ResolutionCache;
use crate::id_cache_storage::ResolutionCacheStorage;

/// Result of resolving one external id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Found(RemoteMediaRef),
    NotFound,
}

/// Maps external ids to remote ids, consulting the cache before the remote.
///
/// Every external id is looked up remotely at most once: both hits and
/// misses are cached, and with storage attached each new entry is flushed
/// to disk immediately so an interrupted run keeps its progress.
pub struct IdResolver {
    cache: ResolutionCache,
    storage: Option<ResolutionCacheStorage>,
    lookup: Arc<dyn IdLookup>,
    remote_lookups: usize,
}

impl IdResolver {
    /// In-memory resolver (nothing is persisted)
    pub fn new(lookup: Arc<dyn IdLookup>, cache: ResolutionCache) -> Self {
        Self {
            cache,
            storage: None,
            lookup,
            remote_lookups: 0,
        }
    }

    /// Resolver backed by a cache file, loaded now
    pub fn with_storage(lookup: Arc<dyn IdLookup>, storage: ResolutionCacheStorage) -> Result<Self> {
        let cache = storage.load()?;
        Ok(Self {
            cache,
            storage: Some(storage),
            lookup,
            remote_lookups: 0,
        })
    }

    /// Resolve an external id for the given category.
    ///
    /// A cached entry (found or not) is returned without a remote call. On a
    /// miss, exactly one lookup is made and the first result of the matching
    /// category wins. Lookup errors are returned and not cached.
    pub async fn resolve(&mut self, external_id: &str, category: MediaCategory) -> Result<Resolution, SourceError> {
        if let Some(cached) = self.cache.get(external_id) {
            debug!(external_id = %external_id, found = cached.is_some(), "Resolution cache hit");
            return Ok(Self::resolution_of(cached, category));
        }

        self.remote_lookups += 1;
        let results = self.lookup.find_by_external_id(external_id).await?;

        let first = results.results_for(category).first().cloned();
        let resolution = Self::resolution_of(first.as_ref(), category);
        match first {
            Some(media) => {
                debug!(external_id = %external_id, remote_id = media.id, "Resolved");
                self.cache.insert_found(external_id, media);
            }
            None => {
                debug!(external_id = %external_id, category = %category, "No remote match");
                self.cache.insert_not_found(external_id);
            }
        }

        self.flush();
        Ok(resolution)
    }

    /// Persist the cache if it changed. Failures are logged, not returned.
    pub fn flush(&mut self) {
        let Some(storage) = &self.storage else {
            return;
        };
        if !self.cache.is_dirty() {
            return;
        }

        match storage.save(&self.cache) {
            Ok(()) => self.cache.mark_clean(),
            Err(e) => warn!("Failed to save resolution cache to {:?}: {:#}", storage.path(), e),
        }
    }

    /// Number of remote lookups made by this resolver
    pub fn remote_lookups(&self) -> usize {
        self.remote_lookups
    }

    pub fn cache(&self) -> &ResolutionCache {
        &self.cache
    }

    fn resolution_of(media: Option<&RemoteMedia>, category: MediaCategory) -> Resolution {
        match media {
            Some(media) => Resolution::Found(RemoteMediaRef {
                remote_id: media.id,
                category,
            }),
            None => Resolution::NotFound,
        }
    }
}
