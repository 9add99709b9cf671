pub mod u501_csv_import;
