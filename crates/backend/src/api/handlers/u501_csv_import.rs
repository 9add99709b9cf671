use std::time::Duration;

use axum::extract::{Multipart, Path, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::Json;
use contracts::usecases::u501_csv_import::{ImportResponse, ImportStatus};
use serde_json::{json, Value};
use tokio_stream::{Stream, StreamExt};

use crate::shared::error::{ApiError, ServiceError};
use crate::shared::progress::watch;
use crate::state::AppState;

/// POST /api/upload — принять CSV и поставить задачу импорта в очередь
pub async fn upload_csv(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ImportResponse>, ApiError> {
    let mut file: Option<(String, axum::body::Bytes)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Error reading file: {}", e)))?
    {
        if field.name() == Some("file") {
            let filename = field.file_name().unwrap_or_default().to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| ApiError::bad_request(format!("Error reading file: {}", e)))?;
            file = Some((filename, data));
            break;
        }
    }

    let (filename, data) = file.ok_or_else(|| ApiError::bad_request("No file provided"))?;
    if !filename.ends_with(".csv") {
        return Err(ApiError::bad_request("File must be a CSV file"));
    }

    let csv_content = String::from_utf8(data.to_vec())
        .map_err(|e| ApiError::bad_request(format!("Error reading file: {}", e)))?;
    if csv_content.trim().is_empty() {
        return Err(ApiError::bad_request("CSV file is empty"));
    }

    let job_id = state.imports.submit(csv_content).map_err(ServiceError::Internal)?;

    Ok(Json(ImportResponse {
        job_id,
        status: ImportStatus::Processing,
        message: "CSV upload started. Use the job_id to check progress.".to_string(),
    }))
}

/// GET /api/upload/status/:job_id — снимок прогресса для polling.
/// Отсутствие записи означает, что задача еще не началась или истекла
pub async fn get_import_status(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Json<Value> {
    match state.progress.get(&job_id).await {
        Ok(Some(progress)) => {
            let mut body = serde_json::to_value(&progress).unwrap_or_default();
            if let Value::Object(map) = &mut body {
                map.insert("job_id".to_string(), Value::String(job_id));
            }
            Json(body)
        }
        Ok(None) => Json(json!({
            "job_id": job_id,
            "status": "pending",
            "message": "Job not found or not started",
        })),
        Err(e) => {
            tracing::warn!("Progress read error for job {}: {}", job_id, e);
            Json(json!({
                "job_id": job_id,
                "status": "error",
                "message": "Error reading progress data",
            }))
        }
    }
}

/// GET /api/upload/stream/:job_id — прогресс задачи как SSE-поток
pub async fn stream_import_progress(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    let poll_interval = Duration::from_millis(state.config.progress.poll_interval_ms);
    let stream = watch(state.progress.clone(), job_id, poll_interval)
        .map(|snapshot| Event::default().json_data(&snapshot));
    Sse::new(stream).keep_alive(KeepAlive::default())
}
