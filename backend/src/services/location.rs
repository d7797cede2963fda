//! Debounced location autocomplete

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use shared::LocationSuggestion;
use tokio::sync::Mutex;
use tokio::task::AbortHandle;

use crate::config::LocationSearchConfig;
use crate::error::AppResult;
use crate::external::GeocodingClient;

struct Pending {
    generation: u64,
    abort: AbortHandle,
}

type PendingMap = Arc<Mutex<HashMap<String, Pending>>>;

fn forget(pending: &mut HashMap<String, Pending>, key: &str, generation: u64) {
    if pending.get(key).map(|p| p.generation) == Some(generation) {
        pending.remove(key);
    }
}

/// Cancels a call's work and clears its entry when the call ends, including
/// when the caller stops awaiting it
struct PendingGuard {
    pending: PendingMap,
    key: String,
    generation: u64,
    abort: AbortHandle,
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.abort.abort();

        if let Ok(mut pending) = self.pending.try_lock() {
            forget(&mut pending, &self.key, self.generation);
            return;
        }

        // Map is busy; clear the entry once it is free
        let pending = Arc::clone(&self.pending);
        let key = std::mem::take(&mut self.key);
        let generation = self.generation;
        if let Ok(runtime) = tokio::runtime::Handle::try_current() {
            runtime.spawn(async move {
                forget(&mut *pending.lock().await, &key, generation);
            });
        }
    }
}

/// Delays work per key and cancels the pending work for a key when newer
/// work for the same key arrives
#[derive(Clone)]
pub struct Debouncer {
    delay: Duration,
    next_generation: Arc<AtomicU64>,
    pending: PendingMap,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            next_generation: Arc::new(AtomicU64::new(0)),
            pending: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Run `work` after the quiet period. Returns `None` when a later call
    /// with the same key superseded this one.
    pub async fn run<F, T>(&self, key: &str, work: F) -> Option<T>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        let delay = self.delay;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            work.await
        });
        let guard = PendingGuard {
            pending: Arc::clone(&self.pending),
            key: key.to_string(),
            generation,
            abort: handle.abort_handle(),
        };

        let superseded = self.pending.lock().await.insert(
            key.to_string(),
            Pending {
                generation,
                abort: handle.abort_handle(),
            },
        );
        if let Some(previous) = superseded {
            previous.abort.abort();
            tracing::debug!(session = key, "Superseded pending location search");
        }

        let result = handle.await;
        drop(guard);

        match result {
            Ok(value) => Some(value),
            Err(e) if e.is_cancelled() => None,
            Err(e) => {
                tracing::error!(session = key, error = %e, "Debounced task failed");
                None
            }
        }
    }

    /// Number of keys with work still waiting
    #[cfg(test)]
    pub async fn pending_count(&self) -> usize {
        self.pending.lock().await.len()
    }
}

/// Location search service
#[derive(Clone)]
pub struct LocationService {
    geocoding: GeocodingClient,
    debouncer: Debouncer,
    max_results: u32,
}

impl LocationService {
    pub fn new(geocoding: GeocodingClient, config: &LocationSearchConfig) -> Self {
        Self {
            geocoding,
            debouncer: Debouncer::new(config.debounce()),
            max_results: config.max_results,
        }
    }

    /// Search places for a session's latest query. `Ok(None)` means a newer
    /// query from the same session replaced this one. Without a session the
    /// lookup runs immediately.
    pub async fn search(
        &self,
        session: Option<&str>,
        query: &str,
    ) -> AppResult<Option<Vec<LocationSuggestion>>> {
        // Typed coordinates need no lookup
        if let Some(coordinates) = shared::parse_coordinates(query) {
            return Ok(Some(vec![LocationSuggestion {
                name: query.trim().to_string(),
                country: None,
                admin_area: None,
                coordinates,
            }]));
        }

        let geocoding = self.geocoding.clone();
        let query = query.to_string();
        let count = self.max_results;

        let Some(session) = session else {
            return geocoding.search(&query, count).await.map(Some);
        };

        self.debouncer
            .run(session, async move { geocoding.search(&query, count).await })
            .await
            .transpose()
    }
}
