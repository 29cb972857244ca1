//! Command-line configuration for the `reversi` binary.
//!
//! Defaults come from the central config (reversi.toml plus REVERSI_*
//! environment overrides); CLI arguments take highest priority.

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use engine_config::{load_config, CentralConfig};
use mcts::SearchConfig;
use once_cell::sync::Lazy;
use tracing::level_filters::LevelFilter;

// Load central config once at startup
static CENTRAL_CONFIG: Lazy<CentralConfig> = Lazy::new(load_config);

fn default_iterations() -> u32 {
    CENTRAL_CONFIG.search.iterations
}

fn default_seed() -> Option<u64> {
    CENTRAL_CONFIG.search.seed
}

fn default_log_level() -> String {
    CENTRAL_CONFIG.common.log_level.clone()
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Play Black against the engine, entering moves like `3C`
    Play,
    /// Let the engine play both sides and show its root statistics
    Demo,
}

#[derive(Parser, Debug, Clone)]
#[command(name = "reversi")]
#[command(about = "Reversi against a UCT Monte Carlo Tree Search engine")]
#[command(
    long_about = "Reversi against a UCT Monte Carlo Tree Search engine.

Defaults are loaded from reversi.toml with REVERSI_* environment variable
overrides. CLI arguments take highest priority."
)]
pub struct Config {
    #[command(subcommand)]
    pub mode: Option<Mode>,

    /// Search iterations per engine move
    #[arg(long, global = true, default_value_t = default_iterations())]
    pub iterations: u32,

    /// Seed for engine playouts (omit for a different game every run)
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value_t = default_log_level())]
    pub log_level: String,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.iterations == 0 {
            return Err(anyhow!("iterations must be greater than 0"));
        }

        if self.log_level.parse::<LevelFilter>().is_err() {
            return Err(anyhow!(
                "invalid log level '{}', expected one of trace, debug, info, warn, error",
                self.log_level
            ));
        }

        Ok(())
    }

    /// Selected mode, `play` when none was given.
    pub fn mode(&self) -> Mode {
        self.mode.unwrap_or(Mode::Play)
    }

    /// Search settings with the seed falling back to the central config.
    pub fn search_config(&self) -> SearchConfig {
        SearchConfig::default()
            .with_iterations(self.iterations)
            .with_seed(self.seed.or_else(default_seed))
    }
}
