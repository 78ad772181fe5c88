//! In-memory session store that forgets expired sessions.
//!
//! Records live in a map keyed by session id. Expired records are dropped
//! when they are loaded and by a periodic sweep, so sessions abandoned by
//! cookieless clients do not accumulate.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tower_sessions::SessionStore;
use tower_sessions::cookie::time::OffsetDateTime;
use tower_sessions::session::{Id, Record};
use tower_sessions::session_store;

/// Session records held in process memory.
#[derive(Debug, Clone, Default)]
pub struct SweepingMemoryStore {
    records: Arc<Mutex<HashMap<Id, Record>>>,
}

impl SweepingMemoryStore {
    /// Drop every record whose expiry has passed. Returns how many went.
    pub async fn delete_expired(&self) -> usize {
        let now = OffsetDateTime::now_utc();
        let mut records = self.records.lock().await;
        let before = records.len();
        records.retain(|_, record| record.expiry_date > now);
        before - records.len()
    }

    /// Number of stored records, expired or not.
    pub async fn session_count(&self) -> usize {
        self.records.lock().await.len()
    }

    /// Run [`Self::delete_expired`] every `period` on a background task.
    #[must_use = "the sweep runs until the handle is aborted"]
    pub fn spawn_sweeper(&self, period: Duration) -> JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                interval.tick().await;
                let removed = store.delete_expired().await;
                if removed > 0 {
                    tracing::debug!(removed, "Deleted expired sessions");
                }
            }
        })
    }
}

#[async_trait]
impl SessionStore for SweepingMemoryStore {
    async fn create(&self, record: &mut Record) -> session_store::Result<()> {
        let mut records = self.records.lock().await;
        while records.contains_key(&record.id) {
            record.id = Id::default();
        }
        records.insert(record.id, record.clone());
        Ok(())
    }

    async fn save(&self, record: &Record) -> session_store::Result<()> {
        self.records.lock().await.insert(record.id, record.clone());
        Ok(())
    }

    async fn load(&self, session_id: &Id) -> session_store::Result<Option<Record>> {
        let mut records = self.records.lock().await;
        let Some(record) = records.get(session_id) else {
            return Ok(None);
        };
        if record.expiry_date > OffsetDateTime::now_utc() {
            return Ok(Some(record.clone()));
        }
        records.remove(session_id);
        Ok(None)
    }

    async fn delete(&self, session_id: &Id) -> session_store::Result<()> {
        self.records.lock().await.remove(session_id);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tower_sessions::cookie::time::Duration as TimeDuration;

    use super::*;

    fn record(expires_in: TimeDuration) -> Record {
        Record {
            id: Id::default(),
            data: HashMap::new(),
            expiry_date: OffsetDateTime::now_utc() + expires_in,
        }
    }

    #[tokio::test]
    async fn test_delete_expired_keeps_live_sessions() {
        let store = SweepingMemoryStore::default();
        let live = record(TimeDuration::hours(1));
        let stale = record(TimeDuration::seconds(-1));
        store.save(&live).await.unwrap();
        store.save(&stale).await.unwrap();

        assert_eq!(store.delete_expired().await, 1);
        assert_eq!(store.session_count().await, 1);
        assert_eq!(store.load(&live.id).await.unwrap().map(|r| r.id), Some(live.id));
        assert!(store.load(&stale.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_loading_expired_session_forgets_it() {
        let store = SweepingMemoryStore::default();
        let stale = record(TimeDuration::seconds(-1));
        store.save(&stale).await.unwrap();

        assert!(store.load(&stale.id).await.unwrap().is_none());
        assert_eq!(store.session_count().await, 0);
    }

    #[tokio::test]
    async fn test_create_never_overwrites() {
        let store = SweepingMemoryStore::default();
        let first = record(TimeDuration::hours(1));
        store.save(&first).await.unwrap();

        let mut second = record(TimeDuration::hours(1));
        second.id = first.id;
        store.create(&mut second).await.unwrap();

        assert_ne!(second.id, first.id);
        assert_eq!(store.session_count().await, 2);
        assert_eq!(store.load(&first.id).await.unwrap().map(|r| r.id), Some(first.id));
    }

    #[tokio::test]
    async fn test_sweeper_runs_periodically() {
        let store = SweepingMemoryStore::default();
        store.save(&record(TimeDuration::seconds(-1))).await.unwrap();

        let sweeper = store.spawn_sweeper(Duration::from_millis(10));
        tokio::time::sleep(Duration::from_millis(100)).await;
        sweeper.abort();

        assert_eq!(store.session_count().await, 0);
    }
}
