//! Optional shared fuzzy index, reused across searches over the same snapshot.
//!
//! Concurrency model:
//! - Readers clone the current `Arc<FuzzyIndex>` under a short read lock, so a
//!   search always works on one complete index, old or new.
//! - Rebuilds are serialized by `rebuild_lock` and run outside the slot lock;
//!   only the final pointer swap takes the write lock.
//! - The slot is keyed by a fingerprint of the snapshot's searchable content,
//!   so a changed snapshot never reuses a stale index.

use crate::config::MatcherConfig;
use crate::fuzzy::FuzzyIndex;
use crate::models::Document;
use parking_lot::{Mutex, RwLock};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone)]
struct CachedIndex {
    fingerprint: u64,
    index: Arc<FuzzyIndex>,
}

/// Shared, atomically replaced fuzzy index.
#[derive(Debug)]
pub struct IndexCache {
    config: MatcherConfig,
    slot: RwLock<Option<CachedIndex>>,
    rebuild_lock: Mutex<()>,
}

impl IndexCache {
    pub fn new(config: MatcherConfig) -> Self {
        Self {
            config,
            slot: RwLock::new(None),
            rebuild_lock: Mutex::new(()),
        }
    }

    /// Index for `documents`, rebuilding only if the snapshot changed.
    pub fn index_for(&self, documents: &[Document]) -> Arc<FuzzyIndex> {
        let fingerprint = snapshot_fingerprint(documents);
        if let Some(index) = self.lookup(fingerprint) {
            return index;
        }

        let _guard = self.rebuild_lock.lock();
        // Another caller may have finished the same rebuild while we waited.
        if let Some(index) = self.lookup(fingerprint) {
            return index;
        }
        self.install(fingerprint, documents)
    }

    /// Unconditionally rebuild from `documents` and publish the result.
    pub fn rebuild(&self, documents: &[Document]) -> Arc<FuzzyIndex> {
        let fingerprint = snapshot_fingerprint(documents);
        let _guard = self.rebuild_lock.lock();
        self.install(fingerprint, documents)
    }

    /// The currently published index, if any.
    pub fn current(&self) -> Option<Arc<FuzzyIndex>> {
        self.slot.read().as_ref().map(|cached| Arc::clone(&cached.index))
    }

    pub fn invalidate(&self) {
        *self.slot.write() = None;
    }

    fn lookup(&self, fingerprint: u64) -> Option<Arc<FuzzyIndex>> {
        self.slot
            .read()
            .as_ref()
            .filter(|cached| cached.fingerprint == fingerprint)
            .map(|cached| Arc::clone(&cached.index))
    }

    /// Caller must hold `rebuild_lock`.
    fn install(&self, fingerprint: u64, documents: &[Document]) -> Arc<FuzzyIndex> {
        let index = Arc::new(FuzzyIndex::build(self.config.clone(), documents));
        *self.slot.write() = Some(CachedIndex {
            fingerprint,
            index: Arc::clone(&index),
        });
        debug!(documents = documents.len(), fingerprint, "published rebuilt fuzzy index");
        index
    }
}

/// Hash of the snapshot's order and every field the matcher reads.
pub fn snapshot_fingerprint(documents: &[Document]) -> u64 {
    let mut hasher = DefaultHasher::new();
    documents.len().hash(&mut hasher);
    for doc in documents {
        doc.id.hash(&mut hasher);
        doc.text_fields().hash(&mut hasher);
        doc.tags.hash(&mut hasher);
    }
    hasher.finish()
}
