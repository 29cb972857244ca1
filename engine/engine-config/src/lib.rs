//! Centralized configuration loading from reversi.toml.
//!
//! # Configuration Priority
//!
//! Settings are loaded with the following priority (highest to lowest):
//! 1. Environment variables (`REVERSI_<SECTION>_<KEY>`)
//! 2. reversi.toml file
//! 3. Built-in defaults (config.defaults.toml, embedded at compile time)
//!
//! Command-line flags of the `reversi` binary sit above all three.
//!
//! # Environment Variable Override Pattern
//!
//! ```text
//! REVERSI_<SECTION>_<KEY>=value
//!
//! Examples:
//!     REVERSI_COMMON_LOG_LEVEL=debug
//!     REVERSI_SEARCH_ITERATIONS=2000
//!     REVERSI_SEARCH_SEED=42
//! ```

mod defaults;
mod loader;
mod structs;

pub use defaults::*;
pub use loader::{apply_env_overrides, load_config, load_from_path, CONFIG_SEARCH_PATHS};
pub use structs::*;
