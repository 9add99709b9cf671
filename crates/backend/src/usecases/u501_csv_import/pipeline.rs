use std::collections::HashMap;

use async_trait::async_trait;
use contracts::usecases::u501_csv_import::{ImportSummary, RowError};
use sea_orm::DatabaseConnection;

use super::chunk;
use super::validator;

/// Получатель промежуточных снимков прогресса. Реализация сама решает,
/// куда их писать; ее ошибки не должны прерывать импорт
#[async_trait]
pub trait ProgressReporter: Send + Sync {
    async fn report(&self, current: usize, total: usize, message: &str);
}

/// Прогнать содержимое CSV через конвейер импорта: парсинг, разбивка на
/// чанки, upsert каждого чанка своей транзакцией. Ошибка чанка
/// откатывает только его строки и не останавливает конвейер, счетчик
/// обработанных строк при этом продвигается как обычно
pub async fn process_csv(
    db: &DatabaseConnection,
    reporter: &dyn ProgressReporter,
    chunk_size: usize,
    csv_content: &str,
) -> ImportSummary {
    let (rows, mut errors) = match parse_rows(csv_content) {
        Ok(parsed) => parsed,
        Err(message) => {
            tracing::error!("CSV import aborted: {}", message);
            return ImportSummary::failed(message);
        }
    };

    if rows.is_empty() {
        return ImportSummary::empty_file();
    }

    let total_rows = rows.len();
    reporter
        .report(0, total_rows, &format!("Starting to process {} rows...", total_rows))
        .await;

    let mut processed = 0usize;
    for (chunk_index, chunk_rows) in rows.chunks(chunk_size).enumerate() {
        let chunk_start = chunk_index * chunk_size;

        let mut valid: Vec<validator::ValidRow> = Vec::with_capacity(chunk_rows.len());
        for (offset, row) in chunk_rows.iter().enumerate() {
            let row_num = chunk_start + offset + 1;
            match validator::validate_row(row, row_num) {
                Ok(parsed) => valid.push(parsed),
                Err(message) => errors.push(RowError { row: row_num, error: message }),
            }
        }

        match chunk::upsert_chunk(db, &valid).await {
            Ok(outcome) => {
                tracing::debug!(
                    "Chunk at row {}: {} inserted, {} updated",
                    chunk_start + 1,
                    outcome.inserted,
                    outcome.updated
                );
            }
            Err(e) => {
                let row = chunk_start + 1;
                let message = format!("Error processing chunk starting at row {}: {}", row, e);
                tracing::warn!("{}", message);
                errors.push(RowError { row, error: message });
            }
        }

        processed += chunk_rows.len();
        reporter
            .report(
                processed,
                total_rows,
                &format!("Processed {}/{} rows", processed, total_rows),
            )
            .await;
    }

    ImportSummary::completed(processed, total_rows, errors)
}

type RawRow = HashMap<String, String>;

/// Разобрать CSV в строки-словари по заголовку. BOM в начале файла
/// отбрасывается, кривые записи пропускаются с ошибкой по их номеру.
/// Err только когда не читается сам заголовок
fn parse_rows(csv_content: &str) -> Result<(Vec<RawRow>, Vec<RowError>), String> {
    let text = csv_content.trim_start_matches('\u{FEFF}');

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = match reader.headers() {
        Ok(headers) => headers.clone(),
        Err(e) => return Err(format!("Failed to read CSV headers: {}", e)),
    };

    let mut rows: Vec<RawRow> = Vec::new();
    let mut errors: Vec<RowError> = Vec::new();

    for (index, result) in reader.records().enumerate() {
        let row_num = index + 1;
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!("Skipping malformed CSV record {}: {}", row_num, e);
                errors.push(RowError {
                    row: row_num,
                    error: format!("Row {}: invalid CSV record: {}", row_num, e),
                });
                continue;
            }
        };

        let mut row = RawRow::new();
        for (i, header) in headers.iter().enumerate() {
            if let Some(value) = record.get(i) {
                row.insert(header.to_string(), value.to_string());
            }
        }
        rows.push(row);
    }

    Ok((rows, errors))
}
