//! Cached track URL source
//!
//! Wraps another [`TrackMetadataSource`] and keeps the last playable batch of
//! each track in an LRU map. A lookup yields the cached batch first (when it
//! is still within its time-to-live) and then whatever the wrapped source
//! yields, so consumers that stop at the first useful batch never touch the
//! network for recently played tracks.

use bridge_traits::error::BridgeError;
use bridge_traits::metadata::{MusicUrlBatch, MusicUrlStream, TrackMetadataSource};
use bridge_traits::time::Clock;
use core_runtime::config::CacheSettings;
use futures::stream::{self, StreamExt};
use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace};

#[derive(Debug, Clone)]
struct CachedBatch {
    batch: MusicUrlBatch,
    stored_at_millis: i64,
}

type UrlCache = Arc<Mutex<LruCache<u64, CachedBatch>>>;

pub struct CachedMusicUrlSource<S> {
    inner: S,
    cache: UrlCache,
    clock: Arc<dyn Clock>,
    ttl_millis: i64,
}

impl<S: TrackMetadataSource> CachedMusicUrlSource<S> {
    /// A zero capacity is bumped to one.
    pub fn new(inner: S, clock: Arc<dyn Clock>, capacity: usize, ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner,
            cache: Arc::new(Mutex::new(LruCache::new(capacity))),
            clock,
            ttl_millis: i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX),
        }
    }

    pub fn with_settings(inner: S, clock: Arc<dyn Clock>, settings: &CacheSettings) -> Self {
        Self::new(inner, clock, settings.capacity, settings.ttl)
    }

    /// Returns the cached batch for `track_id` if it has not expired.
    ///
    /// Expired entries are evicted on access.
    pub fn cached(&self, track_id: u64) -> Option<MusicUrlBatch> {
        let now = self.clock.unix_timestamp_millis();
        let mut cache = self.cache.lock();

        let fresh = match cache.get(&track_id) {
            Some(entry) => now.saturating_sub(entry.stored_at_millis) < self.ttl_millis,
            None => return None,
        };

        if fresh {
            cache.get(&track_id).map(|entry| entry.batch.clone())
        } else {
            trace!(track_id, "Evicting expired track url");
            cache.pop(&track_id);
            None
        }
    }

    pub fn invalidate(&self, track_id: u64) {
        self.cache.lock().pop(&track_id);
    }

    pub fn clear(&self) {
        self.cache.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.cache.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.lock().is_empty()
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S: TrackMetadataSource> TrackMetadataSource for CachedMusicUrlSource<S> {
    fn lookup(&self, track_id: u64) -> MusicUrlStream {
        let cache = Arc::clone(&self.cache);
        let clock = Arc::clone(&self.clock);

        // Only batches with a usable first candidate are stored.
        let fresh = self.inner.lookup(track_id).inspect(move |item| {
            if let Ok(batch) = item {
                if batch.first_url().is_some() {
                    let entry = CachedBatch {
                        batch: batch.clone(),
                        stored_at_millis: clock.unix_timestamp_millis(),
                    };
                    cache.lock().put(track_id, entry);
                }
            }
        });

        match self.cached(track_id) {
            Some(batch) => {
                debug!(track_id, "Serving track url from cache");
                stream::once(async move { Ok::<_, BridgeError>(batch) })
                    .chain(fresh)
                    .boxed()
            }
            None => fresh.boxed(),
        }
    }
}
