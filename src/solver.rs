use crate::error::Error;
use crate::infeasible::Objective;
use crate::rng::{RngHandle, RngState};
use crate::solution::{Solution, SolutionTracker};
use crate::state::State;
use crate::tree::Tree;
use log::{debug, info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Construction options for [`Solver`], mirroring a constructor's keyword arguments one-for-one.
pub struct SolverOptions {
    /// `None` means "decide automatically from `State::has_bound()`".
    pub pruning: Option<bool>,
    pub rng_seed: Option<u64>,
    /// Takes precedence over `rng_seed` if both are set.
    pub rng_state: Option<RngState>,
    pub status_interval: Duration,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            pruning: None,
            rng_seed: None,
            rng_state: None,
            status_interval: Duration::from_secs_f64(1.0),
        }
    }
}

/// Drives MCTS iterations over a [`Tree`], owning the global solution trackers, the RNG, and the
/// CPU clock used to enforce time limits.
pub struct Solver<S: State> {
    pub tree: Tree<S>,
    pruning: bool,
    status_interval: Duration,
    status_last: Duration,
    cpu: crate::clock::Clock,
    iters: u64,
    rng: RngHandle,
    feas: SolutionTracker<S::Data>,
    infeas: SolutionTracker<S::Data>,
    overall: SolutionTracker<S::Data>,
}

impl<S: State> Solver<S> {
    pub fn new(root: S, options: SolverOptions) -> Self {
        let pruning = options.pruning.unwrap_or_else(|| root.has_bound());
        info!("Pruning is {}.", if pruning { "enabled" } else { "disabled" });

        let rng = match (options.rng_state, options.rng_seed) {
            (Some(state), _) => {
                info!("Setting RNG state to {}...", state);
                RngHandle::from_state(state)
            }
            (None, Some(seed)) => {
                info!("Seeding RNG with {}...", seed);
                RngHandle::from_seed(seed)
            }
            (None, None) => RngHandle::from_seed(rand::random()),
        };
        info!("RNG initial state is {}.", rng.state());

        Self {
            tree: Tree::new(root),
            pruning,
            status_interval: options.status_interval,
            status_last: Duration::ZERO,
            cpu: crate::clock::Clock::new(),
            iters: 0,
            rng,
            feas: SolutionTracker::new(),
            infeas: SolutionTracker::new(),
            overall: SolutionTracker::new(),
        }
    }

    /// Runs the search until `time_limit`/`iter_limit` is reached, the tree is proved exhausted,
    /// or `cancel` is flagged. Returns the best solution found, or `Ok(None)` if none was.
    pub fn run(
        &mut self,
        time_limit: Duration,
        iter_limit: u64,
        cancel: &AtomicBool,
    ) -> Result<Option<Solution<S::Data>>, Error> {
        info!("Running with time_limit={:?} and iter_limit={}", time_limit, iter_limit);
        let time_limit = self.cpu.elapsed() + time_limit;
        let iter_limit = self.iters.saturating_add(iter_limit);
        self.show_status(true);

        self.cpu.start();
        let mut cancelled = false;
        while self.cpu.elapsed() < time_limit
            && self.iters < iter_limit
            && !self.tree.node(self.tree.root()).is_exhausted()
        {
            if cancel.load(Ordering::Relaxed) {
                cancelled = true;
                break;
            }
            self.show_status(false);

            let node = self.tree.select(&mut self.rng);
            let created = self.tree.expand(node, self.pruning)?;
            for child in created {
                debug_assert_eq!(self.tree.node(child).parent, Some(node));
                let is_terminal = self
                    .tree
                    .node(child)
                    .state
                    .as_ref()
                    .map(|s| s.is_terminal())
                    .unwrap_or(false);
                if is_terminal {
                    let sol = self
                        .tree
                        .node(child)
                        .state
                        .as_ref()
                        .expect("terminal check already confirmed a state is present")
                        .solution();
                    self.backpropagate_and_route(child, sol)?;
                    // The backpropagation above may have triggered a pruning sweep that already
                    // removed this node; only delete it if it is still attached.
                    if self.tree.node(child).root == self.tree.root() {
                        self.tree.delete(child)?;
                    }
                } else {
                    for sol in self.tree.simulate(child, &mut self.rng)? {
                        self.backpropagate_and_route(child, sol)?;
                    }
                    debug_assert!(self.tree.node(child).stats.overall.count > 0);
                }
            }
            self.iters += 1;
        }
        self.cpu.stop();

        if cancelled {
            warn!("Search cancelled.");
        }
        self.show_status(true);
        info!("Search stopped.");

        if self.overall.count == 0 {
            warn!("Unable to find any solution.");
            return Ok(None);
        }
        if self.tree.node(self.tree.root()).is_exhausted() {
            info!("Search tree exhausted.");
            if self.feas.count == 0 {
                warn!("Unable to find feasible solutions.");
            } else {
                info!("Solution is optimal.");
                self.overall.best.is_opt = true;
            }
        }
        Ok(Some(self.overall.best.clone()))
    }

    /// Backpropagates `sol` through the tree, then routes the root's resulting tracker updates
    /// into this solver's own trackers (feas/infeas/overall), mirroring the root-to-solver
    /// wiring used to trigger pruning and status logging.
    fn backpropagate_and_route(&mut self, node: usize, sol: Solution<S::Data>) -> Result<(), Error> {
        self.tree.backpropagate(node, sol.clone());
        self.route_update(sol)
    }

    fn route_update(&mut self, sol: Solution<S::Data>) -> Result<(), Error> {
        let prior_best_feas = self.feas.best.value;
        let prior_worst_feas = self.feas.worst.value;
        let prior_best_infeas = self.infeas.best.value;
        let prior_worst_infeas = self.infeas.worst.value;
        let prior_best_overall = self.overall.best.value;
        let prior_worst_overall = self.overall.worst.value;

        if sol.is_feasible() {
            self.feas.update(sol.clone());
        } else {
            self.infeas.update(sol.clone());
        }
        self.overall.update(sol);

        if sol_improved(self.feas.best.value, prior_best_feas) {
            debug!("New best feasible solution: {} -> {}", prior_best_feas, self.feas.best.value);
        }
        if sol_improved(self.feas.worst.value, prior_worst_feas) {
            debug!("New worst feasible solution: {} -> {}", prior_worst_feas, self.feas.worst.value);
        }
        if sol_improved(self.infeas.best.value, prior_best_infeas) {
            debug!("New best infeasible solution: {} -> {}", prior_best_infeas, self.infeas.best.value);
        }
        if sol_improved(self.infeas.worst.value, prior_worst_infeas) {
            debug!("New worst infeasible solution: {} -> {}", prior_worst_infeas, self.infeas.worst.value);
        }
        if sol_improved(self.overall.best.value, prior_best_overall) {
            info!("New best overall solution: {} -> {}", prior_best_overall, self.overall.best.value);
            self.overall.best.iteration = Some(self.iters);
            self.overall.best.found_at = Some(self.cpu.elapsed());
            if self.pruning && self.overall.best.is_feasible() {
                let removed = self.tree.prune(self.overall.best.value)?;
                info!("Pruning removed {} nodes.", removed);
            }
            self.show_status(true);
        }
        if sol_improved(self.overall.worst.value, prior_worst_overall) {
            debug!("New worst overall solution: {} -> {}", prior_worst_overall, self.overall.worst.value);
        }
        Ok(())
    }

    fn show_status(&mut self, force: bool) {
        let now = self.cpu.elapsed();
        if !force && now.saturating_sub(self.status_last) < self.status_interval {
            return;
        }
        self.status_last = now;
        let mut parts = vec![format!(
            "iter={:<6} time={:<6.2} nodes={:<6} |",
            self.iters,
            now.as_secs_f64(),
            self.tree.tree_size()
        )];
        if self.overall.count == 0 {
            parts.push("Search starting...".to_string());
        }
        if self.feas.count > 0 {
            parts.push(format!(
                "feas[b={}, w={}, c={}/{} ({:.1}%)]",
                self.feas.best.value,
                self.feas.worst.value,
                self.feas.count,
                self.overall.count,
                100.0 * self.feas.count as f64 / self.overall.count as f64
            ));
        }
        if self.infeas.count > 0 {
            parts.push(format!(
                "infeas[b={}, w={}, c={}/{} ({:.1}%)]",
                self.infeas.best.value,
                self.infeas.worst.value,
                self.infeas.count,
                self.overall.count,
                100.0 * self.infeas.count as f64 / self.overall.count as f64
            ));
        }
        info!("{}", parts.join("  "));
    }
}

fn sol_improved(new: Objective, old: Objective) -> bool {
    new != old
}
