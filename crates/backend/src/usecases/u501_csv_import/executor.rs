use std::sync::Arc;

use async_trait::async_trait;
use contracts::usecases::u501_csv_import::{ImportProgress, ImportStatus, ImportSummary};
use sea_orm::DatabaseConnection;

use crate::shared::progress::ProgressStore;

use super::pipeline::{self, ProgressReporter};

/// Исполнитель задачи импорта: ведет снимки прогресса в хранилище
/// от старта до терминального состояния
pub struct ImportExecutor {
    db: DatabaseConnection,
    store: Arc<dyn ProgressStore>,
    chunk_size: usize,
}

/// Репортер, пишущий снимки в хранилище прогресса. Сбой записи
/// логируется и не прерывает импорт
struct StoreReporter<'a> {
    store: &'a dyn ProgressStore,
    job_id: &'a str,
}

#[async_trait]
impl ProgressReporter for StoreReporter<'_> {
    async fn report(&self, current: usize, total: usize, message: &str) {
        let snapshot = ImportProgress::processing(current, total, message);
        if let Err(e) = self.store.put(self.job_id, &snapshot).await {
            tracing::warn!("Progress update error for job {}: {}", self.job_id, e);
        }
    }
}

impl ImportExecutor {
    pub fn new(db: DatabaseConnection, store: Arc<dyn ProgressStore>, chunk_size: usize) -> Self {
        Self { db, store, chunk_size }
    }

    /// Выполнить задачу импорта целиком. Исход всегда выражается
    /// терминальным снимком в хранилище, наружу ошибки не всплывают
    pub async fn run_job(&self, job_id: &str, csv_content: &str) -> ImportSummary {
        tracing::info!("Starting CSV import job {}", job_id);

        let reporter = StoreReporter { store: self.store.as_ref(), job_id };
        reporter.report(0, 0, "Starting CSV processing...").await;

        let summary = pipeline::process_csv(&self.db, &reporter, self.chunk_size, csv_content).await;

        let status = if summary.success { ImportStatus::Completed } else { ImportStatus::Failed };
        let snapshot = ImportProgress::terminal(
            status,
            summary.processed,
            summary.total_rows,
            summary.message.clone(),
            summary.errors.clone(),
        );
        self.put_terminal(job_id, &snapshot).await;

        tracing::info!(
            "CSV import job {} finished: {} ({} of {} rows, {} errors)",
            job_id,
            if summary.success { "completed" } else { "failed" },
            summary.processed,
            summary.total_rows,
            summary.error_count
        );
        summary
    }

    /// Отметить задачу проваленной, когда конвейер даже не отработал
    /// (например, таск запаниковал)
    pub async fn fail_job(&self, job_id: &str, message: &str) {
        let snapshot = ImportProgress::terminal(ImportStatus::Failed, 0, 0, message, Vec::new());
        self.put_terminal(job_id, &snapshot).await;
    }

    async fn put_terminal(&self, job_id: &str, snapshot: &ImportProgress) {
        if let Err(e) = self.store.put(job_id, snapshot).await {
            tracing::warn!("Progress update error for job {}: {}", job_id, e);
        }
    }
}
