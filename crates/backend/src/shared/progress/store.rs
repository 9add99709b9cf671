use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use contracts::usecases::u501_csv_import::ImportProgress;

/// Хранилище снимков прогресса задач импорта. Снимки живут ограниченное
/// время: перезапись продлевает срок, истекшая запись неотличима от
/// отсутствующей
#[async_trait]
pub trait ProgressStore: Send + Sync {
    async fn put(&self, job_id: &str, progress: &ImportProgress) -> anyhow::Result<()>;

    async fn get(&self, job_id: &str) -> anyhow::Result<Option<ImportProgress>>;
}

struct StoredProgress {
    progress: ImportProgress,
    stored_at: Instant,
}

/// In-memory реализация хранилища прогресса
pub struct InMemoryProgressStore {
    entries: RwLock<HashMap<String, StoredProgress>>,
    retention: Duration,
}

impl InMemoryProgressStore {
    pub fn new(retention: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            retention,
        }
    }

    /// Убрать истекшие записи из памяти
    pub fn cleanup_expired(&self) {
        let mut entries = self.entries.write().unwrap();
        let before = entries.len();
        entries.retain(|_, stored| stored.stored_at.elapsed() < self.retention);
        let removed = before - entries.len();
        if removed > 0 {
            tracing::info!("Removed {} expired progress entries", removed);
        }
    }
}

#[async_trait]
impl ProgressStore for InMemoryProgressStore {
    async fn put(&self, job_id: &str, progress: &ImportProgress) -> anyhow::Result<()> {
        let mut entries = self.entries.write().unwrap();
        entries.insert(
            job_id.to_string(),
            StoredProgress {
                progress: progress.clone(),
                stored_at: Instant::now(),
            },
        );
        Ok(())
    }

    async fn get(&self, job_id: &str) -> anyhow::Result<Option<ImportProgress>> {
        let entries = self.entries.read().unwrap();
        match entries.get(job_id) {
            Some(stored) if stored.stored_at.elapsed() < self.retention => {
                Ok(Some(stored.progress.clone()))
            }
            _ => Ok(None),
        }
    }
}

/// Периодически чистить истекшие записи хранилища
pub fn spawn_cleanup_task(
    store: Arc<InMemoryProgressStore>,
    period: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            interval.tick().await;
            store.cleanup_expired();
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::usecases::u501_csv_import::ImportStatus;

    #[tokio::test]
    async fn test_put_get_roundtrip() {
        let store = InMemoryProgressStore::new(Duration::from_secs(60));
        let snapshot = ImportProgress::processing(5, 10, "Processed 5/10 rows");

        store.put("job-1", &snapshot).await.unwrap();
        let loaded = store.get("job-1").await.unwrap().unwrap();
        assert_eq!(loaded, snapshot);

        assert!(store.get("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_put_overwrites_previous_snapshot() {
        let store = InMemoryProgressStore::new(Duration::from_secs(60));

        store
            .put("job-1", &ImportProgress::processing(1, 10, "Processed 1/10 rows"))
            .await
            .unwrap();
        store
            .put(
                "job-1",
                &ImportProgress::terminal(ImportStatus::Completed, 10, 10, "done", Vec::new()),
            )
            .await
            .unwrap();

        let loaded = store.get("job-1").await.unwrap().unwrap();
        assert_eq!(loaded.status, ImportStatus::Completed);
        assert_eq!(loaded.percentage, 100);
    }

    #[tokio::test]
    async fn test_expired_entries_read_as_absent() {
        let store = InMemoryProgressStore::new(Duration::from_millis(20));
        store
            .put("job-1", &ImportProgress::processing(1, 2, "Processed 1/2 rows"))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(40)).await;
        assert!(store.get("job-1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_overwrite_refreshes_retention() {
        let store = InMemoryProgressStore::new(Duration::from_millis(50));
        store
            .put("job-1", &ImportProgress::processing(1, 2, "Processed 1/2 rows"))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(30)).await;
        store
            .put("job-1", &ImportProgress::processing(2, 2, "Processed 2/2 rows"))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(30)).await;
        // Первая запись уже истекла бы, перезапись продлила срок
        assert!(store.get("job-1").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_cleanup_drops_only_expired() {
        let store = InMemoryProgressStore::new(Duration::from_millis(30));
        store
            .put("old", &ImportProgress::processing(1, 2, "Processed 1/2 rows"))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(40)).await;
        store
            .put("fresh", &ImportProgress::processing(1, 2, "Processed 1/2 rows"))
            .await
            .unwrap();

        store.cleanup_expired();
        assert!(store.get("old").await.unwrap().is_none());
        assert!(store.get("fresh").await.unwrap().is_some());
    }
}
