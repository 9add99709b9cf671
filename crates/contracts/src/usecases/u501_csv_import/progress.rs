use serde::{Deserialize, Serialize};

/// Статус задачи импорта
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportStatus {
    /// Задача принята, но еще не начала выполняться
    Pending,

    /// Импорт выполняется
    Processing,

    /// Импорт завершен (ошибки по строкам не отменяют завершение)
    Completed,

    /// Импорт провален
    Failed,

    /// Данные прогресса невозможно прочитать
    Error,
}

/// Ошибка обработки строки или чанка
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowError {
    pub row: usize,
    pub error: String,
}

/// Снимок прогресса импорта (для polling и SSE)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportProgress {
    pub current: usize,
    pub total: usize,
    pub percentage: u8,
    pub message: String,
    pub status: ImportStatus,

    /// Полный список ошибок. Только в терминальном снимке
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<RowError>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_count: Option<usize>,
}

impl ImportProgress {
    /// Промежуточный снимок выполняющегося импорта
    pub fn processing(current: usize, total: usize, message: impl Into<String>) -> Self {
        Self {
            current,
            total,
            percentage: percentage_of(current, total),
            message: message.into(),
            status: ImportStatus::Processing,
            errors: None,
            error_count: None,
        }
    }

    /// Терминальный снимок: percentage всегда 100, ошибки прилагаются
    pub fn terminal(
        status: ImportStatus,
        current: usize,
        total: usize,
        message: impl Into<String>,
        errors: Vec<RowError>,
    ) -> Self {
        Self {
            current,
            total,
            percentage: 100,
            message: message.into(),
            status,
            error_count: Some(errors.len()),
            errors: Some(errors),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.status, ImportStatus::Completed | ImportStatus::Failed)
    }
}

/// floor(current / total * 100), 0 при total == 0
fn percentage_of(current: usize, total: usize) -> u8 {
    if total == 0 {
        0
    } else {
        (current * 100 / total) as u8
    }
}
