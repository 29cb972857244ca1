//! Monte Carlo Tree Search (UCT) for any game implementing the `engine-core`
//! [`GameState`](engine_core::GameState) contract.
//!
//! # Overview
//!
//! Each search grows a fresh tree from a copy of the root state. Every
//! iteration runs four phases:
//!
//! 1. **Selection**: descend through the children with the highest cached
//!    UCB1 value until reaching a leaf
//! 2. **Expansion**: attach one child per successor of a non-terminal leaf
//! 3. **Simulation**: play uniformly random moves from the first new child
//!    until the game ends
//! 4. **Backpropagation**: update visit and win counts from that child up to
//!    the root, refreshing each node's UCB1 value
//!
//! After the budget is spent the most visited root child is returned.
//!
//! # Usage
//!
//! ```rust,ignore
//! use games_reversi::BoardState;
//! use mcts::SearchEngine;
//!
//! let engine = SearchEngine::new(10_000);
//! let next = engine.search(&BoardState::new())?;
//! ```
//!
//! # Configuration
//!
//! [`SearchConfig`] carries the iteration budget and an optional playout
//! seed. The exploration constant is fixed at `sqrt(2)`.

pub mod config;
pub mod node;
pub mod search;
pub mod tree;

// Re-export main types
pub use config::SearchConfig;
pub use node::{MctsNode, NodeId};
pub use search::{SearchEngine, SearchError, SearchResult};
pub use tree::{ChildStats, MctsTree, TreeStats};
