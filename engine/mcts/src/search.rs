//! UCT search driver.
//!
//! Each iteration runs the four MCTS phases on a fresh tree rooted at a copy
//! of the caller's state:
//! 1. Selection: follow the highest UCB1 values down to a leaf
//! 2. Expansion: attach every successor of a non-terminal leaf
//! 3. Simulation: random playout from the first new child (or the terminal leaf)
//! 4. Backpropagation: credit the playout result up to the root

use engine_core::GameState;
use rand::Rng;
use thiserror::Error;
use tracing::{debug, trace};

use crate::config::SearchConfig;
use crate::tree::{ChildStats, MctsTree};

/// Errors that can occur during MCTS search.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error("Root state is terminal, no move to search")]
    TerminalRoot,

    #[error("Search ran no iterations")]
    NoSimulations,
}

/// Result of an MCTS search.
#[derive(Debug, Clone)]
pub struct SearchResult<S: GameState> {
    /// Move leading to the chosen child
    pub mv: S::Move,

    /// State after playing `mv`
    pub state: S,

    /// Number of playouts credited to the root
    pub simulations: u32,

    /// Visits, wins and UCB1 value of every root child, in successor order
    pub children: Vec<ChildStats<S::Move>>,
}

/// Fixed-budget UCT search engine.
#[derive(Debug, Clone, Default)]
pub struct SearchEngine {
    config: SearchConfig,
}

impl SearchEngine {
    /// Engine running `iterations` rounds per search with OS-seeded playouts.
    pub fn new(iterations: u32) -> Self {
        Self::with_config(SearchConfig::default().with_iterations(iterations))
    }

    pub fn with_config(config: SearchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// State reached by the most promising move from `root`.
    ///
    /// `root` is only read; the search works on its own copy.
    pub fn search<S: GameState>(&self, root: &S) -> Result<S, SearchError> {
        let mut rng = self.config.rng();
        self.search_with_rng(root, &mut rng)
    }

    /// Same as [`SearchEngine::search`], drawing playouts from `rng`.
    pub fn search_with_rng<S, R>(&self, root: &S, rng: &mut R) -> Result<S, SearchError>
    where
        S: GameState,
        R: Rng + ?Sized,
    {
        self.run(root, rng).map(|result| result.state)
    }

    /// Run the search and report the chosen move along with root statistics.
    pub fn run<S, R>(&self, root: &S, rng: &mut R) -> Result<SearchResult<S>, SearchError>
    where
        S: GameState,
        R: Rng + ?Sized,
    {
        if root.is_end() {
            return Err(SearchError::TerminalRoot);
        }

        let mut tree = MctsTree::new(root.clone());
        for iteration in 0..self.config.iterations {
            Self::iterate(&mut tree, iteration, rng);
        }

        let best_id = tree.best_child().ok_or(SearchError::NoSimulations)?;
        let best = tree.get(best_id);
        let mv = best.mv.ok_or(SearchError::NoSimulations)?;
        let stats = tree.stats();

        debug!(
            iterations = self.config.iterations,
            nodes = stats.total_nodes,
            max_depth = stats.max_depth,
            best_move = ?mv,
            best_visits = best.visit_count,
            best_wins = best.win_count,
            "Search complete"
        );

        Ok(SearchResult {
            mv,
            state: best.state.clone(),
            simulations: stats.root_visits as u32,
            children: tree.child_stats(),
        })
    }

    /// Run one select -> expand -> simulate -> backpropagate round.
    fn iterate<S, R>(tree: &mut MctsTree<S>, iteration: u32, rng: &mut R)
    where
        S: GameState,
        R: Rng + ?Sized,
    {
        let mut leaf_id = tree.select(tree.root());
        if tree.get(leaf_id).state.is_normal() {
            leaf_id = tree.expand(leaf_id);
        }

        let winner = tree.simulate(leaf_id, rng);
        tree.backpropagate(leaf_id, winner);

        trace!(
            iteration,
            leaf = leaf_id.0,
            winner = ?winner,
            "MCTS iteration complete"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use games_reversi::{BoardState, Move, Player};
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn board(rows: [&str; 8], player: Player) -> BoardState {
        BoardState::from_layout(&rows.concat(), player).unwrap()
    }

    /// Black to move with two empty-square choices left: (6,7) ends in a
    /// Black win whatever follows, (2,2) in a White win.
    const ENDGAME: [&str; 8] = [
        "xxxoooox",
        "oxxoooox",
        "ox oxxox",
        "o xxooox",
        "xxxoxxxx",
        "xoooxxoo",
        "oxxoxoxo",
        "oxoxxo o",
    ];

    #[test]
    fn test_search_returns_a_root_successor() {
        let engine = SearchEngine::with_config(SearchConfig::for_testing());
        let root = BoardState::new();

        let next = engine.search(&root).unwrap();

        let successors: Vec<BoardState> =
            root.successors().into_iter().map(|(_, s)| s).collect();
        assert!(successors.contains(&next));
        assert_eq!(next.current_player(), Player::White);

        // Caller's state untouched
        assert_eq!(root, BoardState::new());
    }

    #[test]
    fn test_search_prefers_winning_move() {
        let root = board(ENDGAME, Player::Black);
        assert_eq!(
            root.enum_valid_moves(Player::Black),
            vec![Move::at(2, 2), Move::at(6, 7)]
        );

        let engine = SearchEngine::new(1_000);
        let mut rng = ChaCha20Rng::seed_from_u64(42);
        let result = engine.run(&root, &mut rng).unwrap();

        assert_eq!(result.mv, Move::at(6, 7));
        assert_eq!(result.children.len(), 2);
        assert!(result.children[1].visits > result.children[0].visits);

        let mut expected = root.clone();
        expected.play(Move::at(6, 7));
        assert_eq!(result.state, expected);
    }

    #[test]
    fn test_search_with_os_seed_prefers_winning_move() {
        let root = board(ENDGAME, Player::Black);
        let mut expected = root.clone();
        expected.play(Move::at(6, 7));

        let next = SearchEngine::new(500).search(&root).unwrap();
        assert_eq!(next, expected);
    }

    #[test]
    fn test_search_is_deterministic_per_seed() {
        let engine = SearchEngine::with_config(SearchConfig::for_testing());
        let root = BoardState::new();

        let first = engine.search(&root).unwrap();
        let second = engine.search(&root).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_run_reports_root_statistics() {
        let engine = SearchEngine::new(64);
        let mut rng = ChaCha20Rng::seed_from_u64(42);

        let result = engine.run(&BoardState::new(), &mut rng).unwrap();

        assert_eq!(result.simulations, 64);
        assert_eq!(result.children.len(), 4);
        let child_visits: f32 = result.children.iter().map(|c| c.visits).sum();
        assert_eq!(child_visits, 64.0);
        assert!(result.children.iter().all(|c| c.visits >= 1.0));
    }

    #[test]
    fn test_single_iteration_picks_first_child() {
        let engine = SearchEngine::new(1);
        let mut rng = ChaCha20Rng::seed_from_u64(42);

        let result = engine.run(&BoardState::new(), &mut rng).unwrap();

        assert_eq!(result.mv, Move::at(3, 2));
        assert_eq!(result.simulations, 1);
    }

    #[test]
    fn test_forced_pass_is_returned() {
        // Black has nothing to play but White can still reply at (0,2)
        let rows = [
            "o       ",
            "x       ",
            "        ",
            "        ",
            "        ",
            "        ",
            "        ",
            "        ",
        ];
        let root = board(rows, Player::Black);
        let mut rng = ChaCha20Rng::seed_from_u64(42);

        let result = SearchEngine::new(10).run(&root, &mut rng).unwrap();

        assert_eq!(result.mv, Move::Pass);
        assert_eq!(result.state, board(rows, Player::White));
    }

    #[test]
    fn test_terminal_root_is_an_error() {
        let full = BoardState::from_layout(&"x".repeat(64), Player::White).unwrap();
        let engine = SearchEngine::with_config(SearchConfig::for_testing());

        assert_eq!(engine.search(&full), Err(SearchError::TerminalRoot));
    }

    #[test]
    fn test_zero_iterations_is_an_error() {
        let engine = SearchEngine::new(0);
        assert_eq!(
            engine.search(&BoardState::new()),
            Err(SearchError::NoSimulations)
        );
    }

    #[test]
    fn test_engine_config() {
        assert_eq!(SearchEngine::new(123).config().iterations, 123);
        assert_eq!(SearchEngine::new(123).config().seed, None);
        assert_eq!(
            SearchEngine::default().config(),
            &SearchConfig::default()
        );
    }
}
