//! Configuration struct definitions.
//!
//! All config structs with serde deserialization support and default values.

use crate::defaults;
use serde::Deserialize;

// ============================================================================
// Serde default functions (required for #[serde(default = "...")])
// These call the accessor functions from defaults module
// ============================================================================

fn d_log_level() -> String {
    defaults::log_level().into()
}
fn d_iterations() -> u32 {
    defaults::iterations()
}
fn d_seed() -> Option<u64> {
    defaults::seed()
}

// ============================================================================
// Config structs
// ============================================================================

/// Root configuration structure matching reversi.toml
#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
pub struct CentralConfig {
    #[serde(default)]
    pub common: CommonConfig,
    #[serde(default)]
    pub search: SearchSettings,
}

/// Settings shared by every entry point
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct CommonConfig {
    /// Fallback `tracing` filter when `RUST_LOG` is unset
    #[serde(default = "d_log_level")]
    pub log_level: String,
}

impl Default for CommonConfig {
    fn default() -> Self {
        Self {
            log_level: defaults::log_level().into(),
        }
    }
}

/// Engine search settings
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SearchSettings {
    /// Iterations per engine move
    #[serde(default = "d_iterations")]
    pub iterations: u32,
    /// Fixed playout seed (None = fresh entropy per search)
    #[serde(default = "d_seed")]
    pub seed: Option<u64>,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            iterations: defaults::iterations(),
            seed: defaults::seed(),
        }
    }
}
