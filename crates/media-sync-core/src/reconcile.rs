use media_sync_models::{CollectionType, MediaCategory, SourceRecord};
use media_sync_sources::{AccountWriter, SourceError};
use serde::Serialize;
use tracing::{debug, info, warn};
use crate::classify::ClassifiedBuckets;
use crate::id_resolver::{IdResolver, Resolution};
use crate::snapshot::RemoteSnapshot;


/// What happened to one (record, collection) pair
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// No remote item matches the record's external id
    Unresolved {
        record: SourceRecord,
        collection: CollectionType,
    },
    /// Already in the remote collection; nothing written
    Skipped {
        record: SourceRecord,
        collection: CollectionType,
        remote_id: u64,
    },
    Written {
        record: SourceRecord,
        collection: CollectionType,
        remote_id: u64,
    },
    /// Lookup or write failed; the run carries on
    Failed {
        record: SourceRecord,
        collection: CollectionType,
        cause: String,
    },
}

impl Outcome {
    pub fn record(&self) -> &SourceRecord {
        match self {
            Outcome::Unresolved { record, .. }
            | Outcome::Skipped { record, .. }
            | Outcome::Written { record, .. }
            | Outcome::Failed { record, .. } => record,
        }
    }

    pub fn collection(&self) -> CollectionType {
        match self {
            Outcome::Unresolved { collection, .. }
            | Outcome::Skipped { collection, .. }
            | Outcome::Written { collection, .. }
            | Outcome::Failed { collection, .. } => *collection,
        }
    }
}

/// The single write issued for a missing (record, collection) pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WriteRequest {
    Favorite,
    Watchlist,
    Rate { value: f32 },
}

impl WriteRequest {
    /// `None` for a Rated entry without a parseable rating
    pub fn for_collection(collection: CollectionType, record: &SourceRecord) -> Option<Self> {
        match collection {
            CollectionType::Favorite => Some(WriteRequest::Favorite),
            CollectionType::Watchlist => Some(WriteRequest::Watchlist),
            CollectionType::Rated => record
                .parsed_rating()
                .map(|rating| WriteRequest::Rate { value: rating as f32 }),
        }
    }

    pub async fn apply(
        &self,
        writer: &dyn AccountWriter,
        category: MediaCategory,
        remote_id: u64,
    ) -> Result<(), SourceError> {
        match *self {
            WriteRequest::Favorite => writer.mark_favorite(category, remote_id).await,
            WriteRequest::Watchlist => writer.add_to_watchlist(category, remote_id).await,
            WriteRequest::Rate { value } => writer.rate(category, remote_id, value).await,
        }
    }
}

/// Counts per outcome kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileSummary {
    pub written: usize,
    pub skipped: usize,
    pub unresolved: usize,
    pub failed: usize,
}

impl ReconcileSummary {
    pub fn add(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Unresolved { .. } => self.unresolved += 1,
            Outcome::Skipped { .. } => self.skipped += 1,
            Outcome::Written { .. } => self.written += 1,
            Outcome::Failed { .. } => self.failed += 1,
        }
    }

    pub fn from_outcomes<'a>(outcomes: impl IntoIterator<Item = &'a Outcome>) -> Self {
        let mut summary = Self::default();
        for outcome in outcomes {
            summary.add(outcome);
        }
        summary
    }

    pub fn total(&self) -> usize {
        self.written + self.skipped + self.unresolved + self.failed
    }
}

/// Brings the remote account in line with the classified buckets.
///
/// Every (record, collection) pair yields exactly one outcome and at most one
/// write. The snapshot is taken before the run and is not updated as writes
/// land, so duplicate records in one batch each produce a write.
pub struct Reconciler<'a> {
    resolver: &'a mut IdResolver,
    snapshot: &'a RemoteSnapshot,
    writer: &'a dyn AccountWriter,
}

impl<'a> Reconciler<'a> {
    pub fn new(resolver: &'a mut IdResolver, snapshot: &'a RemoteSnapshot, writer: &'a dyn AccountWriter) -> Self {
        Self {
            resolver,
            snapshot,
            writer,
        }
    }

    pub async fn reconcile(&mut self, buckets: &ClassifiedBuckets) -> Vec<Outcome> {
        self.reconcile_with(buckets, |_| {}).await
    }

    /// Like [`Reconciler::reconcile`], handing each outcome to `on_outcome`
    /// as soon as it is known
    pub async fn reconcile_with<F>(&mut self, buckets: &ClassifiedBuckets, mut on_outcome: F) -> Vec<Outcome>
    where
        F: FnMut(&Outcome),
    {
        let mut outcomes = Vec::with_capacity(buckets.len());

        for category in MediaCategory::ALL {
            for collection in CollectionType::RECONCILE_ORDER {
                let records = buckets.get(category, collection);
                if records.is_empty() {
                    continue;
                }
                debug!(category = %category, collection = %collection, records = records.len(), "Reconciling bucket");

                for record in records {
                    let outcome = self.reconcile_one(record, collection).await;
                    on_outcome(&outcome);
                    outcomes.push(outcome);
                }
            }
        }

        let summary = ReconcileSummary::from_outcomes(&outcomes);
        info!(
            written = summary.written,
            skipped = summary.skipped,
            unresolved = summary.unresolved,
            failed = summary.failed,
            "Reconciliation finished"
        );
        outcomes
    }

    async fn reconcile_one(&mut self, record: &SourceRecord, collection: CollectionType) -> Outcome {
        let category = record.category;

        let remote_id = match self.resolver.resolve(&record.external_id, category).await {
            Ok(Resolution::Found(remote)) => remote.remote_id,
            Ok(Resolution::NotFound) => {
                return Outcome::Unresolved {
                    record: record.clone(),
                    collection,
                }
            }
            Err(e) => {
                warn!(external_id = %record.external_id, "Lookup failed: {}", e);
                return Outcome::Failed {
                    record: record.clone(),
                    collection,
                    cause: e.to_string(),
                };
            }
        };

        if self.snapshot.contains(category, collection, remote_id) {
            return Outcome::Skipped {
                record: record.clone(),
                collection,
                remote_id,
            };
        }

        let Some(request) = WriteRequest::for_collection(collection, record) else {
            return Outcome::Failed {
                record: record.clone(),
                collection,
                cause: format!("no usable rating in '{}'", record.rating_raw.as_deref().unwrap_or_default()),
            };
        };

        match request.apply(self.writer, category, remote_id).await {
            Ok(()) => Outcome::Written {
                record: record.clone(),
                collection,
                remote_id,
            },
            Err(e) => {
                warn!(external_id = %record.external_id, remote_id, collection = %collection, "Write failed: {}", e);
                Outcome::Failed {
                    record: record.clone(),
                    collection,
                    cause: e.to_string(),
                }
            }
        }
    }
}

/// Reconcile all buckets and collect the outcomes
pub async fn reconcile(
    buckets: &ClassifiedBuckets,
    snapshot: &RemoteSnapshot,
    resolver: &mut IdResolver,
    writer: &dyn AccountWriter,
) -> Vec<Outcome> {
    Reconciler::new(resolver, snapshot, writer).reconcile(buckets).await
}
