use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

use lru::LruCache;
use parking_lot::Mutex;
use tracing::debug;

use crate::disk::FileEntry;

pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

struct CachedListing {
    entries: Vec<FileEntry>,
    stored_at: Instant,
}

/// Public link -> unfiltered listing, bounded by capacity (LRU) and by age.
///
/// An expired entry is removed on the lookup that finds it, so nothing is
/// ever served past the TTL.
pub struct ListingCache {
    entries: Mutex<LruCache<String, CachedListing>>,
    ttl: Duration,
}

impl ListingCache {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            ttl,
        }
    }

    pub fn get(&self, public_key: &str) -> Option<Vec<FileEntry>> {
        let mut entries = self.entries.lock();

        match entries.get(public_key) {
            Some(cached) if cached.stored_at.elapsed() < self.ttl => {
                return Some(cached.entries.clone());
            }
            Some(_) => {}
            None => return None,
        }

        entries.pop(public_key);
        debug!(public_key, "Evicted expired listing");
        None
    }

    pub fn put(&self, public_key: &str, listing: Vec<FileEntry>) {
        let cached = CachedListing {
            entries: listing,
            stored_at: Instant::now(),
        };
        if let Some((evicted, _)) = self.entries.lock().push(public_key.to_string(), cached) {
            if evicted != public_key {
                debug!(public_key = %evicted, "Evicted least recently used listing");
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ListingCache {
    fn default() -> Self {
        Self::new(1024, DEFAULT_TTL)
    }
}
