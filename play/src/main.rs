//! reversi - play Reversi against a UCT search engine
//!
//! Two modes:
//! 1. `play`: the human plays Black from stdin, the engine answers as White
//! 2. `demo`: the engine plays both sides and prints its root statistics

use anyhow::Result;
use clap::Parser;
use games_reversi::BoardState;
use mcts::SearchEngine;
use tracing::info;

mod config;
mod game;
mod render;

use crate::config::{Config, Mode};

fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // Board output owns stdout
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    Ok(())
}

fn main() -> Result<()> {
    let config = Config::parse();
    config.validate()?;

    init_tracing(&config.log_level)?;

    let search = config.search_config();
    info!(
        mode = ?config.mode(),
        iterations = search.iterations,
        seed = ?search.seed,
        "Starting reversi"
    );

    let engine = SearchEngine::with_config(search);
    let mut rng = engine.config().rng();
    let mut stdout = std::io::stdout().lock();

    let winner = match config.mode() {
        Mode::Play => {
            let mut stdin = std::io::stdin().lock();
            game::play_game(
                &engine,
                BoardState::new(),
                &mut rng,
                &mut stdin,
                &mut stdout,
            )?
        }
        Mode::Demo => game::run_demo(&engine, &mut rng, &mut stdout)?,
    };

    info!(?winner, "Game over");
    Ok(())
}
