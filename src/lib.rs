//! Dependency update driver: checks every top-level dependency of a
//! repository for updates and opens a pull request per update.
pub mod cli;
pub mod config;
pub mod decision;
pub mod ecosystem;
pub mod error;
pub mod forge;
pub mod merge;
pub mod orchestrator;
pub mod pull_request;

pub use cli::Args;
pub use config::RunConfig;
pub use error::{BumpkinError, Result};
pub use orchestrator::{Orchestrator, RunSummary};

#[cfg(test)]
pub mod test_helpers;
