use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};

use crate::usecases::u501_csv_import::ImportExecutor;

use super::queue::ImportJob;

/// Запустить пул воркеров импорта. Воркеры разбирают общую очередь,
/// одна задача целиком занимает одного воркера до своего завершения
pub fn spawn_import_workers(
    workers: usize,
    rx: mpsc::UnboundedReceiver<ImportJob>,
    executor: Arc<ImportExecutor>,
) {
    let rx = Arc::new(Mutex::new(rx));
    for worker_id in 0..workers {
        let rx = Arc::clone(&rx);
        let executor = Arc::clone(&executor);
        tokio::spawn(async move {
            tracing::info!("CSV import worker {} started", worker_id);
            loop {
                let job = {
                    let mut rx = rx.lock().await;
                    rx.recv().await
                };
                let job = match job {
                    Some(job) => job,
                    None => break,
                };

                let job_id = job.job_id.clone();
                tracing::info!("Worker {} picked up job {}", worker_id, job_id);

                // Задача выполняется в отдельном таске: ее паника не
                // должна валить воркера
                let task_executor = Arc::clone(&executor);
                let handle = tokio::spawn(async move {
                    task_executor.run_job(&job.job_id, &job.csv_content).await
                });

                match handle.await {
                    Ok(summary) => {
                        tracing::info!(
                            "Worker {} finished job {}: {} ({} of {} rows, {} errors)",
                            worker_id,
                            job_id,
                            if summary.success { "completed" } else { "failed" },
                            summary.processed,
                            summary.total_rows,
                            summary.error_count
                        );
                    }
                    Err(e) => {
                        tracing::error!("Worker {}: job {} crashed: {}", worker_id, job_id, e);
                        executor
                            .fail_job(&job_id, "An error occurred during CSV processing")
                            .await;
                    }
                }
            }
            tracing::info!("CSV import worker {} stopped", worker_id);
        });
    }
}
