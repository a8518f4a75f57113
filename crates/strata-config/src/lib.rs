//! Runtime settings for Strata, persisted as `config.ron`.
//!
//! Every section is `#[serde(default)]`, so older or partial files keep loading
//! and unknown keys are ignored. [`CliArgs`] values override what was loaded.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{CONFIG_FILE, Config, DebugConfig, PlayerConfig, ViewConfig, WorldConfig};
pub use error::ConfigError;
