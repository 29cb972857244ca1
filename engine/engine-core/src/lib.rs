//! Core traits for the Reversi search engine
//!
//! This crate provides the one abstraction the tree search needs from a game:
//! - `GameState`: terminality, successor generation (including forced passes),
//!   random playouts and winner detection
//!
//! Game crates implement `GameState` for their board type; the `mcts` crate is
//! generic over it and never needs to know which game it is searching.

pub mod state;

pub use state::GameState;
