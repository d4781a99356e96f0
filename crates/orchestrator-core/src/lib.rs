pub mod cleanup;
pub mod config;
pub mod documents;
pub mod error;
pub mod hosting;
pub mod pipeline;
pub mod prompts;
pub mod query;
pub mod secrets;
pub mod types;

#[cfg(test)]
mod fakes;

pub use error::{HostingError, OrchestratorError, Result};
