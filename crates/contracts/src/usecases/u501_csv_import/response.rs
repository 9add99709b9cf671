use serde::{Deserialize, Serialize};

use super::progress::{ImportStatus, RowError};

/// Ответ на принятую загрузку CSV
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportResponse {
    /// Уникальный ID задачи импорта
    pub job_id: String,

    /// Статус запуска
    pub status: ImportStatus,

    /// Сообщение
    pub message: String,
}

/// Итог выполнения импорта целиком
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub success: bool,
    pub message: String,
    /// Строк обработано (попытки, включая строки провалившихся чанков)
    pub processed: usize,
    pub total_rows: usize,
    pub errors: Vec<RowError>,
    pub error_count: usize,
}

impl ImportSummary {
    /// Импорт не состоялся до начала обработки строк
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            processed: 0,
            total_rows: 0,
            errors: Vec::new(),
            error_count: 0,
        }
    }

    /// Пустой файл: импорт не стартует
    pub fn empty_file() -> Self {
        Self::failed("CSV file is empty")
    }

    pub fn completed(processed: usize, total_rows: usize, errors: Vec<RowError>) -> Self {
        Self {
            success: true,
            message: format!("Successfully processed {} rows", processed),
            processed,
            total_rows,
            error_count: errors.len(),
            errors,
        }
    }
}
