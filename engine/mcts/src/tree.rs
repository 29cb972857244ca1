//! MCTS tree structure with arena allocation.
//!
//! Nodes live in a contiguous Vec and reference each other by NodeId, so
//! parent links never own anything and dropping the tree frees every node
//! at once. A child is always allocated after its parent.

use engine_core::GameState;
use rand::Rng;

use crate::node::{MctsNode, NodeId};

/// MCTS tree with arena-based node storage.
#[derive(Debug)]
pub struct MctsTree<S: GameState> {
    /// Arena storing all nodes
    nodes: Vec<MctsNode<S>>,

    /// Root node index (always 0 after initialization)
    root: NodeId,
}

impl<S: GameState> MctsTree<S> {
    /// Create a new tree whose root holds `root_state`.
    pub fn new(root_state: S) -> Self {
        Self {
            nodes: vec![MctsNode::new_root(root_state)],
            root: NodeId(0),
        }
    }

    /// Get the root node ID.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Get a reference to a node by ID.
    #[inline]
    pub fn get(&self, id: NodeId) -> &MctsNode<S> {
        &self.nodes[id.0 as usize]
    }

    /// Get a mutable reference to a node by ID.
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut MctsNode<S> {
        &mut self.nodes[id.0 as usize]
    }

    /// Allocate a new node and return its ID.
    pub fn allocate(&mut self, node: MctsNode<S>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Get the total number of nodes in the tree.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree is empty (should never be true after construction).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get the arena slice for read access.
    #[inline]
    pub fn arena(&self) -> &[MctsNode<S>] {
        &self.nodes
    }

    /// Child of `node_id` with the highest cached value.
    /// The first child wins ties. Returns None for an unexpanded node.
    pub fn select_child(&self, node_id: NodeId) -> Option<NodeId> {
        self.get(node_id)
            .children
            .iter()
            .copied()
            .fold(None, |best, id| match best {
                Some(best) if self.get(best).value >= self.get(id).value => Some(best),
                _ => Some(id),
            })
    }

    /// Descend from `from` along the highest-valued children until reaching
    /// a node with no children or a terminal node.
    pub fn select(&self, from: NodeId) -> NodeId {
        let mut current = from;

        while !self.get(current).is_leaf() {
            match self.select_child(current) {
                Some(child_id) => current = child_id,
                None => break,
            }
        }

        current
    }

    /// Add a child to a parent node.
    /// Returns the new child's NodeId.
    pub fn add_child(&mut self, parent_id: NodeId, mv: S::Move, state: S) -> NodeId {
        let child_id = self.allocate(MctsNode::new_child(parent_id, mv, state));
        self.get_mut(parent_id).children.push(child_id);
        child_id
    }

    /// Attach one child per successor of `node_id` and return the first.
    ///
    /// # Panics
    ///
    /// If the node is terminal or has already been expanded.
    pub fn expand(&mut self, node_id: NodeId) -> NodeId {
        let node = self.get(node_id);
        assert!(
            node.state.is_normal(),
            "cannot expand terminal node {}",
            node_id.0
        );
        assert!(
            !node.is_expanded(),
            "node {} is already expanded",
            node_id.0
        );

        let successors = node.state.successors();
        assert!(
            !successors.is_empty(),
            "non-terminal node {} has no successors",
            node_id.0
        );

        let first = NodeId(self.nodes.len() as u32);
        for (mv, state) in successors {
            self.add_child(node_id, mv, state);
        }

        first
    }

    /// Random playout from a copy of the node's state. The tree is untouched.
    pub fn simulate<R: Rng + ?Sized>(&self, node_id: NodeId, rng: &mut R) -> S::Player {
        self.get(node_id).state.simulate(rng)
    }

    /// Record a playout result on every node from `leaf_id` up to the root.
    ///
    /// A node scores a win when its mover is not the winner, i.e. when the
    /// player who moved into it won. Each non-root node then refreshes its
    /// UCB1 value against the parent's visit count before the parent itself
    /// is updated.
    pub fn backpropagate(&mut self, leaf_id: NodeId, winner: S::Player) {
        let mut current_id = leaf_id;

        while current_id.is_some() {
            let parent_id = self.get(current_id).parent;
            let parent_visits = parent_id.is_some().then(|| self.get(parent_id).visit_count);

            let node = self.get_mut(current_id);
            node.visit_count += 1.0;
            if node.state.current_player() != winner {
                node.win_count += 1.0;
            }
            if let Some(parent_visits) = parent_visits {
                node.value = node.ucb_value(parent_visits);
            }

            current_id = parent_id;
        }
    }

    /// Most visited child of the root. The first child wins ties.
    pub fn best_child(&self) -> Option<NodeId> {
        self.get(self.root)
            .children
            .iter()
            .copied()
            .fold(None, |best, id| match best {
                Some(best) if self.get(best).visit_count >= self.get(id).visit_count => {
                    Some(best)
                }
                _ => Some(id),
            })
    }

    /// Copy of the state held by the most visited child of the root.
    /// Returns None if the root has no children.
    pub fn best_move(&self) -> Option<S> {
        self.best_child().map(|id| self.get(id).state.clone())
    }

    /// Per-child statistics of the root, in successor order.
    pub fn child_stats(&self) -> Vec<ChildStats<S::Move>> {
        self.get(self.root)
            .children
            .iter()
            .filter_map(|&id| {
                let child = self.get(id);
                child.mv.map(|mv| ChildStats {
                    mv,
                    visits: child.visit_count,
                    wins: child.win_count,
                    value: child.value,
                })
            })
            .collect()
    }

    /// Get statistics about the tree for debugging.
    pub fn stats(&self) -> TreeStats {
        let root = self.get(self.root);
        TreeStats {
            total_nodes: self.nodes.len(),
            root_visits: root.visit_count,
            max_depth: self.compute_max_depth(),
        }
    }

    // Parents precede children in the arena, so one forward pass suffices.
    fn compute_max_depth(&self) -> u32 {
        let mut depths = vec![0u32; self.nodes.len()];
        for (i, node) in self.nodes.iter().enumerate() {
            if node.parent.is_some() {
                depths[i] = depths[node.parent.0 as usize] + 1;
            }
        }
        depths.into_iter().max().unwrap_or(0)
    }
}

/// Statistics of one root child.
#[derive(Debug, Clone, PartialEq)]
pub struct ChildStats<M> {
    pub mv: M,
    pub visits: f32,
    pub wins: f32,
    pub value: f32,
}

/// Statistics about an MCTS tree.
#[derive(Debug, Clone)]
pub struct TreeStats {
    pub total_nodes: usize,
    pub root_visits: f32,
    pub max_depth: u32,
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

    /// Black on (0,1) under White on (0,0): Black must pass, White can reply.
    const CORNER_PAIR: [&str; 8] = [
        "o       ",
        "x       ",
        "        ",
        "        ",
        "        ",
        "        ",
        "        ",
        "        ",
    ];

    #[test]
    fn test_new_tree() {
        let tree = MctsTree::new(BoardState::new());

        assert_eq!(tree.len(), 1);
        assert!(!tree.is_empty());
        assert_eq!(tree.root(), NodeId(0));

        let root = tree.get(tree.root());
        assert!(root.parent.is_none());
        assert_eq!(root.state, BoardState::new());
    }

    #[test]
    fn test_add_child() {
        let mut tree = MctsTree::new(BoardState::new());
        let mut state = BoardState::new();
        state.play(Move::at(3, 2));

        let child_id = tree.add_child(tree.root(), Move::at(3, 2), state.clone());

        assert_eq!(tree.len(), 2);
        assert_eq!(child_id, NodeId(1));
        assert_eq!(tree.get(tree.root()).children, vec![NodeId(1)]);

        let child = tree.get(child_id);
        assert_eq!(child.parent, tree.root());
        assert_eq!(child.mv, Some(Move::at(3, 2)));
        assert_eq!(child.state, state);
    }

    #[test]
    fn test_expand_opening() {
        let mut tree = MctsTree::new(BoardState::new());

        let first = tree.expand(tree.root());

        assert_eq!(first, NodeId(1));
        assert_eq!(tree.len(), 5);

        let moves: Vec<Move> = tree
            .get(tree.root())
            .children
            .iter()
            .filter_map(|&id| tree.get(id).mv)
            .collect();
        assert_eq!(
            moves,
            vec![Move::at(3, 2), Move::at(2, 3), Move::at(5, 4), Move::at(4, 5)]
        );

        for &id in &tree.get(tree.root()).children {
            let child = tree.get(id);
            assert_eq!(child.parent, tree.root());
            assert_eq!(child.state.current_player(), Player::White);
            assert_eq!(child.state.black_count(), 4);
            assert_eq!(child.state.white_count(), 1);
        }

        // Root state untouched
        assert_eq!(tree.get(tree.root()).state, BoardState::new());
    }

    #[test]
    fn test_expand_forced_pass() {
        let mut tree = MctsTree::new(board(CORNER_PAIR, Player::Black));

        let first = tree.expand(tree.root());

        assert_eq!(tree.get(tree.root()).children, vec![first]);
        let child = tree.get(first);
        assert_eq!(child.mv, Some(Move::Pass));
        assert_eq!(child.state, board(CORNER_PAIR, Player::White));
    }

    #[test]
    #[should_panic(expected = "already expanded")]
    fn test_expand_twice_panics() {
        let mut tree = MctsTree::new(BoardState::new());
        tree.expand(tree.root());
        tree.expand(tree.root());
    }

    #[test]
    #[should_panic(expected = "terminal")]
    fn test_expand_terminal_panics() {
        let empty = BoardState::from_layout(&" ".repeat(64), Player::Black).unwrap();
        let mut tree = MctsTree::new(empty);
        tree.expand(tree.root());
    }

    #[test]
    fn test_backpropagate() {
        let mut tree = MctsTree::new(BoardState::new());
        let first = tree.expand(tree.root());
        let second = NodeId(first.0 + 1);

        // Black moved into `first`; a Black win counts for it
        tree.backpropagate(first, Player::Black);

        let child = tree.get(first);
        assert_eq!(child.visit_count, 1.0);
        assert_eq!(child.win_count, 1.0);
        // 1/1 + sqrt(2 * ln(0 + 1) / 1)
        assert!((child.value - 1.0).abs() < 1e-6);

        let root = tree.get(tree.root());
        assert_eq!(root.visit_count, 1.0);
        assert_eq!(root.win_count, 0.0);
        assert_eq!(root.value, f32::MAX);

        tree.backpropagate(second, Player::White);

        let child = tree.get(second);
        assert_eq!(child.visit_count, 1.0);
        assert_eq!(child.win_count, 0.0);
        // 0/1 + sqrt(2 * ln(1 + 1) / 1)
        assert!((child.value - 1.177_41).abs() < 1e-4);

        let root = tree.get(tree.root());
        assert_eq!(root.visit_count, 2.0);
        assert_eq!(root.win_count, 1.0);
    }

    #[test]
    fn test_backpropagate_draw_counts_for_both_sides() {
        let mut tree = MctsTree::new(BoardState::new());
        let first = tree.expand(tree.root());

        tree.backpropagate(first, Player::Draw);

        assert_eq!(tree.get(first).win_count, 1.0);
        assert_eq!(tree.get(tree.root()).win_count, 1.0);
    }

    #[test]
    fn test_backpropagate_chain() {
        let mut tree = MctsTree::new(BoardState::new());
        let child = tree.expand(tree.root());
        let grandchild = tree.expand(child);

        tree.backpropagate(grandchild, Player::White);

        for id in [grandchild, child, tree.root()] {
            assert_eq!(tree.get(id).visit_count, 1.0);
        }
        // White moved into the grandchild, Black into the child
        assert_eq!(tree.get(grandchild).win_count, 1.0);
        assert_eq!(tree.get(child).win_count, 0.0);
    }

    #[test]
    fn test_select_prefers_unvisited_first_child_on_ties() {
        let mut tree = MctsTree::new(BoardState::new());
        let first = tree.expand(tree.root());

        // Fresh children all carry f32::MAX: the first one wins
        assert_eq!(tree.select(tree.root()), first);

        tree.backpropagate(first, Player::Black);
        tree.backpropagate(NodeId(first.0 + 1), Player::White);

        // Two visited children now rank below the untouched ones
        assert_eq!(tree.select(tree.root()), NodeId(first.0 + 2));
    }

    #[test]
    fn test_select_descends_to_leaf() {
        let mut tree = MctsTree::new(BoardState::new());
        assert_eq!(tree.select(tree.root()), tree.root());

        let child = tree.expand(tree.root());
        let grandchild = tree.expand(child);

        // Steer selection through `child`
        let children = tree.get(tree.root()).children.clone();
        for id in children {
            tree.get_mut(id).value = 0.0;
        }
        tree.get_mut(child).value = 5.0;

        assert_eq!(tree.select(tree.root()), grandchild);
    }

    #[test]
    fn test_simulate_leaves_tree_untouched() {
        let mut tree = MctsTree::new(BoardState::new());
        let first = tree.expand(tree.root());
        let before = tree.get(first).state.clone();
        let mut rng = ChaCha20Rng::seed_from_u64(42);

        for _ in 0..5 {
            let winner = tree.simulate(first, &mut rng);
            assert!(matches!(
                winner,
                Player::Black | Player::White | Player::Draw
            ));
        }

        assert_eq!(tree.get(first).state, before);
        assert_eq!(tree.get(first).visit_count, 0.0);
        assert_eq!(tree.len(), 5);
    }

    #[test]
    fn test_best_move() {
        let mut tree = MctsTree::new(BoardState::new());
        assert!(tree.best_move().is_none());

        let first = tree.expand(tree.root());
        let children = tree.get(tree.root()).children.clone();

        tree.get_mut(children[1]).visit_count = 7.0;
        tree.get_mut(children[3]).visit_count = 7.0;
        tree.get_mut(first).visit_count = 3.0;

        // Tie between the 2nd and 4th child resolves to the 2nd
        assert_eq!(tree.best_child(), Some(children[1]));

        let mut expected = BoardState::new();
        expected.play(Move::at(2, 3));
        assert_eq!(tree.best_move(), Some(expected));
    }

    #[test]
    fn test_child_stats() {
        let mut tree = MctsTree::new(BoardState::new());
        let first = tree.expand(tree.root());
        tree.backpropagate(first, Player::Black);

        let stats = tree.child_stats();
        assert_eq!(stats.len(), 4);
        assert_eq!(stats[0].mv, Move::at(3, 2));
        assert_eq!(stats[0].visits, 1.0);
        assert_eq!(stats[0].wins, 1.0);
        assert_eq!(stats[1].visits, 0.0);
        assert_eq!(stats[1].value, f32::MAX);
    }

    #[test]
    fn test_tree_stats() {
        let mut tree = MctsTree::new(BoardState::new());
        assert_eq!(tree.stats().max_depth, 0);

        let child = tree.expand(tree.root());
        let grandchild = tree.expand(child);
        tree.backpropagate(grandchild, Player::Black);

        let stats = tree.stats();
        assert_eq!(stats.total_nodes, tree.len());
        assert_eq!(stats.root_visits, 1.0);
        assert_eq!(stats.max_depth, 2);
    }
}
