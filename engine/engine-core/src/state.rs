//! Game-state contract for tree search
//!
//! The search driver needs a handful of capabilities from a game state:
//! who moves next, whether the game is over, how to reach every successor
//! state, and how to finish a game randomly. `GameState` captures exactly
//! that set so additional games can plug into the same driver.

use rand::seq::SliceRandom;
use rand::Rng;
use std::fmt::Debug;

/// A searchable two-player game state.
///
/// Implementations must be cheap to clone and a clone must never share
/// mutable storage with its source: the search keeps one copy per tree node
/// and runs playouts on throwaway copies.
///
/// # Type Parameters
///
/// * `Move` - A single ply, including the game's "pass" move if it has one
/// * `Player` - Side to move; also used to report results, so it may carry a
///   draw value that is never a valid mover
pub trait GameState: Clone + Debug {
    /// A single ply
    type Move: Copy + PartialEq + Debug;

    /// Side to move, also used as the result of a finished game
    type Player: Copy + PartialEq + Debug;

    /// The player whose turn it is.
    fn current_player(&self) -> Self::Player;

    /// True when neither side has a legal move.
    fn is_end(&self) -> bool;

    /// True while the game is still in progress.
    fn is_normal(&self) -> bool {
        !self.is_end()
    }

    /// Every legal move for the current player, in a stable order.
    fn legal_moves(&self) -> Vec<Self::Move>;

    /// The move played when the current player has no legal move but the
    /// game is not over.
    fn pass_move(&self) -> Self::Move;

    /// Apply a move for the current player and hand the turn over.
    ///
    /// The move must come from `legal_moves` or be `pass_move`; anything
    /// else is a contract violation and may panic.
    fn play(&mut self, mv: Self::Move);

    /// Result of a finished game.
    fn winner(&self) -> Self::Player;

    /// All states reachable in one ply, paired with the move that reaches
    /// them.
    ///
    /// When the current player has no legal move a single forced-pass
    /// successor is returned instead, so a non-terminal state always has at
    /// least one successor.
    fn successors(&self) -> Vec<(Self::Move, Self)> {
        let moves = self.legal_moves();
        let moves = if moves.is_empty() {
            vec![self.pass_move()]
        } else {
            moves
        };

        moves
            .into_iter()
            .map(|mv| {
                let mut next = self.clone();
                next.play(mv);
                (mv, next)
            })
            .collect()
    }

    /// Play uniformly random moves on a copy of this state until the game
    /// ends, and return the winner. `self` is left untouched.
    fn simulate<R: Rng + ?Sized>(&self, rng: &mut R) -> Self::Player {
        let mut state = self.clone();

        while state.is_normal() {
            let mv = match state.legal_moves().choose(rng) {
                Some(&mv) => mv,
                None => state.pass_move(),
            };
            state.play(mv);
        }

        state.winner()
    }
}
