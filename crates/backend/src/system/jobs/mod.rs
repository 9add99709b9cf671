pub mod queue;
pub mod worker;

pub use queue::{ImportJob, ImportJobQueue};
pub use worker::spawn_import_workers;
