pub mod chunk;
pub mod executor;
pub mod pipeline;
pub mod validator;

pub use executor::ImportExecutor;
