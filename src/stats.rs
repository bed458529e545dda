use crate::infeasible::Objective;
use crate::solution::{Solution, SolutionTracker};

/// Per-node statistics: trackers for feasible, infeasible, and overall solutions, plus the
/// solutions whose simulation originated at this exact node.
///
/// `Stats` is deliberately decoupled from [`crate::tree::TreeNode`]'s internal representation;
/// [`Stats::refresh`] and the scoring methods take the inputs they need as arguments instead of
/// reaching into a tree reference, which keeps this module pure and independently testable.
pub struct Stats<D = ()> {
    own_sols: Vec<Solution<D>>,
    pub feas: SolutionTracker<D>,
    pub infeas: SolutionTracker<D>,
    pub overall: SolutionTracker<D>,
}

/// Inputs [`Stats::refresh`] needs from a node's children, gathered by the caller (the arena
/// owns parent/child links, `Stats` does not).
pub struct ChildExtrema<D> {
    pub feas: [Solution<D>; 2],
    pub infeas: [Solution<D>; 2],
    pub overall: [Solution<D>; 2],
}

impl<D: Clone> Stats<D> {
    pub fn new() -> Self {
        Self {
            own_sols: Vec::new(),
            feas: SolutionTracker::new(),
            infeas: SolutionTracker::new(),
            overall: SolutionTracker::new(),
        }
    }

    /// Integrates a solution that was backpropagated from `is_origin` (true iff the simulation
    /// that produced `sol` started at this exact node).
    pub fn update(&mut self, sol: Solution<D>, is_origin: bool) {
        if is_origin {
            self.own_sols.push(sol.clone());
        }
        if sol.is_feasible() {
            self.feas.update(sol.clone());
        } else {
            self.infeas.update(sol.clone());
        }
        self.overall.update(sol);
    }

    /// Recomputes all three trackers from `children`'s extrema plus this node's own solutions.
    ///
    /// All three `SolutionTracker::refresh` calls are evaluated unconditionally: short-circuit
    /// boolean evaluation here would leave a tracker stale whenever an earlier one already
    /// reported a change.
    pub fn refresh(&mut self, children: impl IntoIterator<Item = ChildExtrema<D>>) -> bool {
        let mut feas_sols = Vec::new();
        let mut infeas_sols = Vec::new();
        let mut overall_sols = Vec::new();
        for child in children {
            feas_sols.extend(child.feas);
            infeas_sols.extend(child.infeas);
            overall_sols.extend(child.overall);
        }
        for sol in &self.own_sols {
            if sol.is_feasible() {
                feas_sols.push(sol.clone());
            } else {
                infeas_sols.push(sol.clone());
            }
            overall_sols.push(sol.clone());
        }
        let feas_changed = self.feas.refresh(feas_sols);
        let infeas_changed = self.infeas.refresh(infeas_sols);
        let overall_changed = self.overall.refresh(overall_sols);
        feas_changed || infeas_changed || overall_changed
    }

    pub fn child_extrema(&self) -> ChildExtrema<D> {
        ChildExtrema {
            feas: self.feas.extrema(),
            infeas: self.infeas.extrema(),
            overall: self.overall.extrema(),
        }
    }
}

impl<D: Clone> Default for Stats<D> {
    fn default() -> Self {
        Self::new()
    }
}

/// Mild bias toward shallower nodes, favoring expansion over deep exploitation.
pub fn depth_score(depth: u32) -> f64 {
    1.0 / (1.0 + depth as f64)
}

/// Parent-relative context needed to score a node during selection. Passed in explicitly rather
/// than resolved through a tree reference, keeping the scoring formulas testable in isolation.
pub struct ParentContext<'a, D> {
    pub feas: &'a SolutionTracker<D>,
    pub infeas: &'a SolutionTracker<D>,
    pub overall: &'a SolutionTracker<D>,
}

/// UCT exploitation term adapted for minimization: how favorable this node's best known
/// solution is, rescaled relative to its parent's feasible (or infeasible) extrema.
pub fn opt_exploitation_score<D: Clone>(
    own: &Stats<D>,
    parent: Option<ParentContext<'_, D>>,
) -> f64 {
    let parent = match parent {
        None => return 0.0,
        Some(p) => p,
    };
    let best = &own.overall.best;
    let (z_node, z_best, z_worst, min_exploit, max_exploit) = match best.value {
        Objective::Feasible(v) => {
            let z_best = match parent.feas.best.value {
                Objective::Feasible(v) => v,
                Objective::Infeasible(_) => f64::NAN,
            };
            let z_worst = match parent.feas.worst.value {
                Objective::Feasible(v) => v,
                Objective::Infeasible(_) => f64::NAN,
            };
            let min_exploit = parent.infeas.count as f64 / parent.overall.count as f64;
            (v, z_best, z_worst, min_exploit, 1.0)
        }
        Objective::Infeasible(i) => {
            let z_best = match parent.infeas.best.value {
                Objective::Infeasible(inf) => inf.violation,
                Objective::Feasible(_) => f64::NAN,
            };
            let z_worst = match parent.infeas.worst.value {
                Objective::Infeasible(inf) => inf.violation,
                Objective::Feasible(_) => f64::NAN,
            };
            let max_exploit = parent.infeas.count as f64 / (1.0 + parent.overall.count as f64);
            (i.violation, z_best, z_worst, 0.0, max_exploit)
        }
    };
    let raw_exploit = if z_best == z_worst {
        0.0
    } else {
        (z_worst - z_node) / (z_worst - z_best)
    };
    min_exploit + raw_exploit * (max_exploit - min_exploit)
}

/// UCT exploration term (unweighted; no exploration coefficient). `+infinity` at the root so
/// the root is always fully expanded before the usual visit-count tradeoff applies anywhere
/// else.
pub fn uct_exploration_score(own_overall_count: u64, parent_overall_count: Option<u64>) -> f64 {
    match parent_overall_count {
        None => f64::INFINITY,
        Some(n) => (2.0 * (n as f64).ln() / own_overall_count as f64).sqrt(),
    }
}
