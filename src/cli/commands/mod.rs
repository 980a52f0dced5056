//! CLI command implementations.

mod agent;
mod config;
mod search;
mod serve;
mod tools;

pub use agent::run_agent;
pub use config::run_config;
pub use search::run_search;
pub use serve::run_serve;
pub use tools::run_tools;
