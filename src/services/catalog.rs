// SPDX-License-Identifier: MIT

//! Snapshot cache for the event and city catalog.
//!
//! Every finder request derives its views from a consistent snapshot of
//! the full event list. The snapshot is refreshed from Firestore at most
//! once per TTL window; concurrent requests during a refresh wait on a
//! single fetch instead of stampeding the database.

use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, RwLock};

use crate::db::FirestoreDb;
use crate::error::AppError;
use crate::models::{CityDirectory, Event};

const SNAPSHOT_TTL: Duration = Duration::from_secs(30);

/// Immutable catalog snapshot shared across concurrent requests.
#[derive(Clone)]
pub struct CatalogSnapshot {
    pub events: Arc<Vec<Event>>,
    pub cities: Arc<CityDirectory>,
}

struct CacheEntry {
    snapshot: CatalogSnapshot,
    expires_at: Instant,
}

/// Short-TTL cache over the Firestore event and city collections.
pub struct EventCatalog {
    db: FirestoreDb,
    cache: RwLock<Option<CacheEntry>>,
    refresh_lock: Mutex<()>,
}

impl EventCatalog {
    pub fn new(db: FirestoreDb) -> Self {
        Self {
            db,
            cache: RwLock::new(None),
            refresh_lock: Mutex::new(()),
        }
    }

    /// Current snapshot, refreshing from Firestore when the TTL lapsed.
    pub async fn snapshot(&self) -> Result<CatalogSnapshot, AppError> {
        if let Some(snapshot) = self.cached().await {
            return Ok(snapshot);
        }

        let _guard = self.refresh_lock.lock().await;

        // Another request may have refreshed while we waited on the lock.
        if let Some(snapshot) = self.cached().await {
            return Ok(snapshot);
        }

        let (raw_events, raw_cities) = futures_util::future::try_join(
            self.db.list_event_docs(),
            self.db.list_city_docs(),
        )
        .await?;

        let events: Vec<Event> = raw_events
            .iter()
            .map(|raw| Event::from_raw(raw.id.clone().unwrap_or_default(), raw))
            .collect();
        let cities = CityDirectory::from_docs(raw_cities);

        tracing::debug!(
            events = events.len(),
            cities = cities.names().len(),
            "Catalog snapshot refreshed"
        );

        let snapshot = CatalogSnapshot {
            events: Arc::new(events),
            cities: Arc::new(cities),
        };

        *self.cache.write().await = Some(CacheEntry {
            snapshot: snapshot.clone(),
            expires_at: Instant::now() + SNAPSHOT_TTL,
        });

        Ok(snapshot)
    }

    async fn cached(&self) -> Option<CatalogSnapshot> {
        let cache = self.cache.read().await;
        let now = Instant::now();
        cache
            .as_ref()
            .filter(|entry| entry.expires_at > now)
            .map(|entry| entry.snapshot.clone())
    }
}
