//! Game loops: human (Black) against the engine, and engine self-play.
//!
//! Both loops write everything to an `impl Write` and the human loop reads
//! from an `impl BufRead`, so they run the same way on a terminal and in
//! tests.

use std::io::{BufRead, Write};

use anyhow::{anyhow, Result};
use games_reversi::{BoardState, Move, Player};
use mcts::{ChildStats, SearchEngine};
use rand::Rng;
use tracing::{debug, info};

use crate::render::{glyph, render};

/// Play a game with the human as Black, starting from `state`.
///
/// Returns the winner, or an error if `input` runs dry before the end.
pub fn play_game<R, W, G>(
    engine: &SearchEngine,
    mut state: BoardState,
    rng: &mut G,
    input: &mut R,
    out: &mut W,
) -> Result<Player>
where
    R: BufRead,
    W: Write,
    G: Rng + ?Sized,
{
    write!(out, "{}", render(&state))?;

    while state.is_normal() {
        if state.current_player() == Player::Black {
            writeln!(out, "Your Turn...")?;

            if state.legal_moves_mask(Player::Black) == 0 {
                info!("No legal move for Black, passing");
                state.play(Move::Pass);
            } else {
                let command = read_command(input)?;

                let mv = match command.parse::<Move>() {
                    Ok(mv) => mv,
                    Err(_) => {
                        writeln!(out, " - Invalid Input -")?;
                        continue;
                    }
                };

                if let Err(e) = state.try_play(mv) {
                    debug!(%mv, error = %e, "Rejected move");
                    writeln!(out, " - Invalid Move -")?;
                    continue;
                }
            }
        } else {
            writeln!(out, "(~_~)...thinking...")?;
            let result = engine.run(&state, rng)?;
            info!(mv = %result.mv, simulations = result.simulations, "Engine moved");
            state = result.state;
        }

        write!(out, "{}", render(&state))?;
    }

    let winner = state.winner();
    write_outcome(out, winner)?;
    Ok(winner)
}

/// Let the engine play both sides from the opening, printing the board and
/// the root statistics after every move.
pub fn run_demo<W, G>(engine: &SearchEngine, rng: &mut G, out: &mut W) -> Result<Player>
where
    W: Write,
    G: Rng + ?Sized,
{
    let mut state = BoardState::new();
    write!(out, "{}", render(&state))?;

    while state.is_normal() {
        let mover = state.current_player();
        let result = engine.run(&state, rng)?;

        writeln!(out, "{} plays {}", glyph(mover), result.mv)?;
        for child in &result.children {
            writeln!(out, "{}", format_child(child))?;
        }

        state = result.state;
        write!(out, "{}", render(&state))?;
    }

    let winner = state.winner();
    info!(
        ?winner,
        black = state.black_count(),
        white = state.white_count(),
        "Demo finished"
    );
    write_outcome(out, winner)?;
    Ok(winner)
}

/// Next non-blank input line, trimmed.
fn read_command<R: BufRead>(input: &mut R) -> Result<String> {
    let mut line = String::new();
    loop {
        line.clear();
        if input.read_line(&mut line)? == 0 {
            return Err(anyhow!("input closed before the game ended"));
        }
        let command = line.trim();
        if !command.is_empty() {
            return Ok(command.to_string());
        }
    }
}

fn format_child(child: &ChildStats<Move>) -> String {
    let value = if child.value == f32::MAX {
        "-".to_string()
    } else {
        format!("{:.4}", child.value)
    };
    format!(
        "  {:>4}  visits {:>6}  wins {:>6}  value {}",
        child.mv.to_string(),
        child.visits,
        child.wins,
        value
    )
}

fn write_outcome<W: Write>(out: &mut W, winner: Player) -> Result<()> {
    match winner {
        Player::Black => {
            writeln!(out, "   - Winner: {} -", glyph(Player::Black))?;
            writeln!(out, "     <(/_\\)>\n")?;
        }
        Player::White => {
            writeln!(out, "   - Winner: {} -", glyph(Player::White))?;
            writeln!(out, "     <(^_^)@\n")?;
        }
        Player::Draw => writeln!(out, "     - DRAW -\n")?,
    }
    Ok(())
}
