use std::sync::Arc;
use std::time::Duration;

use contracts::usecases::u501_csv_import::ImportProgress;
use tokio_stream::wrappers::ReceiverStream;

use super::store::ProgressStore;

/// Подписка на прогресс задачи. Хранилище опрашивается с заданным
/// периодом, повторные одинаковые снимки не отдаются. Поток закрывается
/// после терминального снимка или когда подписчик отпал; пока записей
/// нет, поток просто молчит
pub fn watch(
    store: Arc<dyn ProgressStore>,
    job_id: String,
    poll_interval: Duration,
) -> ReceiverStream<ImportProgress> {
    let (tx, rx) = tokio::sync::mpsc::channel(16);

    tokio::spawn(async move {
        let mut last: Option<ImportProgress> = None;
        let mut interval = tokio::time::interval(poll_interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            interval.tick().await;

            let snapshot = match store.get(&job_id).await {
                Ok(Some(snapshot)) => snapshot,
                Ok(None) => continue,
                Err(e) => {
                    tracing::warn!("Progress read error for job {}: {}", job_id, e);
                    continue;
                }
            };

            if last.as_ref() == Some(&snapshot) {
                continue;
            }

            let terminal = snapshot.is_terminal();
            if tx.send(snapshot.clone()).await.is_err() {
                break;
            }
            last = Some(snapshot);
            if terminal {
                break;
            }
        }
    });

    ReceiverStream::new(rx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::progress::InMemoryProgressStore;
    use contracts::usecases::u501_csv_import::ImportStatus;
    use tokio_stream::StreamExt;

    fn test_store() -> Arc<InMemoryProgressStore> {
        Arc::new(InMemoryProgressStore::new(Duration::from_secs(60)))
    }

    #[tokio::test]
    async fn test_watch_emits_changes_and_closes_on_terminal() {
        let store = test_store();
        store
            .put("job-1", &ImportProgress::processing(1, 2, "Processed 1/2 rows"))
            .await
            .unwrap();

        let mut stream = watch(store.clone(), "job-1".to_string(), Duration::from_millis(5));

        let first = stream.next().await.unwrap();
        assert_eq!(first.current, 1);
        assert_eq!(first.status, ImportStatus::Processing);

        // Идентичная перезапись не порождает событие, терминальный
        // снимок закрывает поток
        store
            .put("job-1", &ImportProgress::processing(1, 2, "Processed 1/2 rows"))
            .await
            .unwrap();
        store
            .put(
                "job-1",
                &ImportProgress::terminal(
                    ImportStatus::Completed,
                    2,
                    2,
                    "Successfully processed 2 rows",
                    Vec::new(),
                ),
            )
            .await
            .unwrap();

        let second = stream.next().await.unwrap();
        assert!(second.is_terminal());
        assert_eq!(second.percentage, 100);
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn test_watch_is_silent_until_first_snapshot() {
        let store = test_store();
        let mut stream = watch(store.clone(), "job-1".to_string(), Duration::from_millis(5));

        let waited =
            tokio::time::timeout(Duration::from_millis(40), stream.next()).await;
        assert!(waited.is_err());

        store
            .put("job-1", &ImportProgress::processing(0, 4, "Starting to process 4 rows..."))
            .await
            .unwrap();
        let first = tokio::time::timeout(Duration::from_millis(200), stream.next())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(first.total, 4);
    }

    #[tokio::test]
    async fn test_watch_stops_polling_when_subscriber_drops() {
        let store = test_store();
        let stream = watch(store.clone(), "job-1".to_string(), Duration::from_millis(5));
        drop(stream);

        // Фоновая задача держит свой клон Arc и отпустит его, как только
        // заметит закрытый канал на первой отправке
        store
            .put("job-1", &ImportProgress::processing(1, 2, "Processed 1/2 rows"))
            .await
            .unwrap();
        for _ in 0..50 {
            if Arc::strong_count(&store) == 1 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(Arc::strong_count(&store), 1);
    }
}
