pub mod common;
pub mod u501_csv_import;
