//! Data service: fetch, bucket, derive, cache
//!
//! Owns the remote source, the tracked-year list, and a single-slot
//! cache of the fetched entries. Week states are re-derived on every
//! read so "now" stays fresh across cache hits; only the fetch itself
//! is cached.

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::info;

use crate::error::Result;
use crate::source::DateSource;
use crate::weeks::{
    bucket_by_year, current_week_state, derive_week_states, DataPayload, EntriesByYear,
};

/// Cached result of one remote fetch
struct CachedEntries {
    entries_by_year: EntriesByYear,
    fetched_at: DateTime<Utc>,
}

/// Assembles the week-state payload, caching the remote fetch
///
/// The cache is a single slot behind a mutex. Holding the lock across
/// the fetch serializes concurrent cold reads, so the upstream is hit
/// at most once per refresh cycle.
pub struct DataService {
    source: Box<dyn DateSource>,
    tracked_years: Vec<String>,
    cache: Mutex<Option<CachedEntries>>,
}

impl DataService {
    pub fn new(source: Box<dyn DateSource>, tracked_years: Vec<String>) -> Self {
        Self {
            source,
            tracked_years,
            cache: Mutex::new(None),
        }
    }

    pub fn tracked_years(&self) -> &[String] {
        &self.tracked_years
    }

    /// Compute or serve the payload
    ///
    /// Cold cache: fetch, bucket, store. Warm cache: reuse the stored
    /// entries. Either way the week states are derived against the
    /// current date. A fetch failure propagates; the stale slot is not
    /// used as a fallback.
    pub async fn get_data(&self) -> Result<DataPayload> {
        let mut slot = self.cache.lock().await;

        if slot.is_none() {
            info!(source = self.source.name(), "data cache cold, fetching");
            let dates = self.source.fetch_dates().await?;
            let entries_by_year = bucket_by_year(&dates);
            *slot = Some(CachedEntries {
                entries_by_year,
                fetched_at: Utc::now(),
            });
        } else {
            info!("data cache warm, serving cached entries");
        }

        // Populated just above when the slot was empty
        let cached = slot
            .as_ref()
            .ok_or_else(|| crate::Error::Internal("cache slot empty after populate".into()))?;

        let today = Utc::now().date_naive();
        let week_states_by_year =
            derive_week_states(&cached.entries_by_year, &self.tracked_years, today);
        let current_week_state = current_week_state(&week_states_by_year, today);

        Ok(DataPayload {
            week_states_by_year,
            current_week_state,
        })
    }

    /// Empty the cache slot; the next read fetches again. Idempotent.
    pub async fn clear_cache(&self) {
        info!("clearing data cache");
        *self.cache.lock().await = None;
    }

    /// When the cached entries were fetched, if the cache is warm
    pub async fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.cache.lock().await.as_ref().map(|c| c.fetched_at)
    }
}
