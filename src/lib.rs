//! Single-threaded Monte Carlo Tree Search engine specialized for combinatorial minimization
//! (branch-and-bound flavored MCTS) rather than classical two-player game play.
//!
//! Users implement [`state::State`] for their problem, then hand it to [`solver::Solver`], which
//! builds an arena-based [`tree::Tree`] of [`tree::TreeNode`]s, selects promising frontier nodes
//! via a UCT-style score adapted for minimization ([`stats`]), lazily expands them
//! ([`expansion::Expansion`]), simulates to a terminal state, and backpropagates the resulting
//! [`solution::Solution`] up the tree, optionally pruning subtrees whose bound can no longer beat
//! the best feasible solution found so far.

pub mod clock;
pub mod error;
pub mod expansion;
pub mod infeasible;
pub mod rng;
pub mod solution;
pub mod solver;
pub mod state;
pub mod stats;
pub mod tree;

pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::infeasible::{Infeasible, Objective};
    pub use crate::rng::{RngHandle, RngState};
    pub use crate::solution::{Solution, SolutionTracker};
    pub use crate::solver::{Solver, SolverOptions};
    pub use crate::state::State;
    pub use crate::tree::{Tree, TreeNode};
}
