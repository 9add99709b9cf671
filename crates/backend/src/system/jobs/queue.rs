use tokio::sync::mpsc;
use uuid::Uuid;

/// Задача импорта, ожидающая воркера
#[derive(Debug)]
pub struct ImportJob {
    pub job_id: String,
    pub csv_content: String,
}

/// Очередь задач импорта без ограничения длины. `submit` возвращает id
/// задачи сразу, не дожидаясь начала обработки
#[derive(Clone)]
pub struct ImportJobQueue {
    tx: mpsc::UnboundedSender<ImportJob>,
}

impl ImportJobQueue {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ImportJob>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn submit(&self, csv_content: String) -> anyhow::Result<String> {
        let job_id = Uuid::new_v4().to_string();
        let job = ImportJob {
            job_id: job_id.clone(),
            csv_content,
        };
        self.tx
            .send(job)
            .map_err(|_| anyhow::anyhow!("Import queue is closed"))?;
        tracing::info!("Queued CSV import job {}", job_id);
        Ok(job_id)
    }
}
