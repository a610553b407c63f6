use async_trait::async_trait;
use media_sync_models::{AccountPage, CollectionType, FindResults, MediaCategory};
use crate::error::SourceError;

/// Lookup of remote items by an external (IMDb) identifier
#[async_trait]
pub trait IdLookup: Send + Sync {
    async fn find_by_external_id(&self, external_id: &str) -> Result<FindResults, SourceError>;
}

/// Paged read access to the collections of the authenticated account
#[async_trait]
pub trait AccountListing: Send + Sync {
    /// Fetch one page (1-based) of a collection listing
    async fn list_page(
        &self,
        category: MediaCategory,
        collection: CollectionType,
        page: u32,
    ) -> Result<AccountPage, SourceError>;
}

/// Single-item writes against the authenticated account.
///
/// Each call issues exactly one remote request. No batching, no retries.
#[async_trait]
pub trait AccountWriter: Send + Sync {
    async fn mark_favorite(&self, category: MediaCategory, remote_id: u64) -> Result<(), SourceError>;

    async fn add_to_watchlist(&self, category: MediaCategory, remote_id: u64) -> Result<(), SourceError>;

    async fn rate(&self, category: MediaCategory, remote_id: u64, value: f32) -> Result<(), SourceError>;
}
