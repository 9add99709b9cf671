pub mod progress;
pub mod response;

pub use progress::{ImportProgress, ImportStatus, RowError};
pub use response::{ImportResponse, ImportSummary};

use crate::usecases::common::UseCaseMetadata;

pub struct CsvImport;

impl UseCaseMetadata for CsvImport {
    fn usecase_index() -> &'static str {
        "u501"
    }

    fn usecase_name() -> &'static str {
        "csv_import"
    }

    fn display_name() -> &'static str {
        "Импорт каталога из CSV"
    }

    fn description() -> &'static str {
        "Загрузка товаров из CSV файла с чанковым upsert и прогрессом"
    }
}
