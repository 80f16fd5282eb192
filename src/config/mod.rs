//! Configuration Management
//!
//! Hierarchical resolution:
//! 1. Built-in defaults
//! 2. Global config (~/.config/reportdraft/config.toml)
//! 3. Project config (.reportdraft/config.toml)
//! 4. Environment variables (REPORTDRAFT_*)
//! 5. CLI arguments (highest priority)

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::*;
