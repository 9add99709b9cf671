pub mod store;
pub mod watch;

pub use store::{spawn_cleanup_task, InMemoryProgressStore, ProgressStore};
pub use watch::watch;
