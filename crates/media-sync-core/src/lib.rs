pub mod classify;
pub mod id_cache;
pub mod id_cache_storage;
pub mod id_resolver;
pub mod reconcile;
pub mod snapshot;

#[cfg(test)]
mod testing;

pub use classify::{classify, classify_rows, record_from_row, Classification, ClassifiedBuckets, ClassifyError, DEFAULT_FAVORITE_THRESHOLD};
pub use id_cache::ResolutionCache;
pub use id_cache_storage::ResolutionCacheStorage;
pub use id_resolver::{IdResolver, Resolution};
pub use reconcile::{reconcile, Outcome, ReconcileSummary, Reconciler, WriteRequest};
pub use snapshot::{fetch_collection, fetch_snapshot, RemoteSnapshot, SnapshotError, MAX_PAGES};
