//! MCTS tree node representation.
//!
//! Each node owns the game state reached by playing `mv` from its parent and
//! the win/visit statistics that drive UCB1 selection.

use engine_core::GameState;

/// Index into the node arena. Using a newtype for type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const NONE: NodeId = NodeId(u32::MAX);

    pub fn is_none(self) -> bool {
        self == Self::NONE
    }

    pub fn is_some(self) -> bool {
        !self.is_none()
    }
}

/// A node in the MCTS tree.
#[derive(Debug, Clone)]
pub struct MctsNode<S: GameState> {
    /// Parent node index (NONE for root)
    pub parent: NodeId,

    /// Move that led to this node from parent (None for root)
    pub mv: Option<S::Move>,

    /// Game state at this node
    pub state: S,

    /// Number of playouts that passed through this node
    pub visit_count: f32,

    /// Playouts won by the player who moved into this node
    pub win_count: f32,

    /// Cached UCB1 value, as seen from the parent.
    /// `f32::MAX` until the first backpropagation so unvisited children are
    /// always tried first.
    pub value: f32,

    /// Children in successor order. Empty until node is expanded.
    pub children: Vec<NodeId>,
}

impl<S: GameState> MctsNode<S> {
    /// Create a new root node.
    pub fn new_root(state: S) -> Self {
        Self {
            parent: NodeId::NONE,
            mv: None,
            state,
            visit_count: 0.0,
            win_count: 0.0,
            value: f32::MAX,
            children: Vec::new(),
        }
    }

    /// Create a new child node.
    pub fn new_child(parent: NodeId, mv: S::Move, state: S) -> Self {
        Self {
            parent,
            mv: Some(mv),
            ..Self::new_root(state)
        }
    }

    /// Fraction of visits that were wins. Returns 0.0 if never visited.
    #[inline]
    pub fn win_rate(&self) -> f32 {
        if self.visit_count == 0.0 {
            0.0
        } else {
            self.win_count / self.visit_count
        }
    }

    /// UCB1 value for this node given its parent's visit count.
    ///
    /// `wins / visits + sqrt(2 * ln(parent_visits + 1) / visits)`
    ///
    /// Only meaningful once the node has been visited.
    #[inline]
    pub fn ucb_value(&self, parent_visits: f32) -> f32 {
        let exploration = (2.0 * (parent_visits + 1.0).ln() / self.visit_count).sqrt();
        self.win_rate() + exploration
    }

    /// Check if this node has been expanded (has children).
    #[inline]
    pub fn is_expanded(&self) -> bool {
        !self.children.is_empty()
    }

    /// Check if this is a leaf node (not expanded or terminal).
    #[inline]
    pub fn is_leaf(&self) -> bool {
        !self.is_expanded() || self.state.is_end()
    }
}
