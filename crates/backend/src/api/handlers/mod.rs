// Aggregate handlers
pub mod a001_product;
pub mod a002_webhook;

// UseCase handlers
pub mod u501_csv_import;
