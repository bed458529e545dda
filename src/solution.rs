use crate::infeasible::Objective;
use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// A candidate solution produced by a simulation or extracted from a terminal state.
///
/// Solutions are immutable except for `is_opt`, which the solver sets once it has proven the
/// search tree exhausted.
#[derive(Debug, Clone)]
pub struct Solution<D = ()> {
    /// Identifies this solution's construction site, surviving `clone()`. Used by
    /// [`SolutionTracker::refresh`] to tell "still the same solution" apart from "a different
    /// solution that happens to carry an equal value".
    id: u64,
    pub value: Objective,
    pub data: Option<D>,
    pub is_opt: bool,
    /// Iteration at which this solution became the solver's best overall, if it ever did.
    pub iteration: Option<u64>,
    /// Elapsed solver time at which this solution became the best overall, if it ever did.
    pub found_at: Option<Duration>,
}

impl<D> Solution<D> {
    pub fn new(value: impl Into<Objective>, data: Option<D>) -> Self {
        static NEXT_ID: AtomicU64 = AtomicU64::new(0);
        Self {
            id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
            value: value.into(),
            data,
            is_opt: false,
            iteration: None,
            found_at: None,
        }
    }

    pub fn is_feasible(&self) -> bool {
        self.value.is_feasible()
    }
}

impl<D> Display for Solution<D> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Solution(value={}{})", self.value, if self.is_opt { "*" } else { "" })
    }
}

/// Tracks the best and worst solutions seen so far, plus a count, notifying registered
/// observers synchronously whenever either extremum moves or a new solution arrives.
///
/// The initial best/worst are sentinel values ([`Objective::worst_possible`] /
/// [`Objective::NEG_INFINITY`]) which must be displaced by the first call to [`update`].
pub struct SolutionTracker<D = ()> {
    pub count: u64,
    pub best: Solution<D>,
    pub worst: Solution<D>,
    on_best: Vec<Box<dyn FnMut(&Solution<D>, &Solution<D>)>>,
    on_worst: Vec<Box<dyn FnMut(&Solution<D>, &Solution<D>)>>,
    on_update: Vec<Box<dyn FnMut(&Solution<D>)>>,
}

impl<D: Clone> SolutionTracker<D> {
    pub fn new() -> Self {
        Self {
            count: 0,
            best: Self::init_best(),
            worst: Self::init_worst(),
            on_best: Vec::new(),
            on_worst: Vec::new(),
            on_update: Vec::new(),
        }
    }

    /// The sentinel "infinitely bad" solution every real update must displace.
    pub fn init_best() -> Solution<D> {
        Solution::new(Objective::worst_possible(), None)
    }

    /// The sentinel "infinitely good" solution every real update must displace.
    pub fn init_worst() -> Solution<D> {
        Solution::new(Objective::NEG_INFINITY, None)
    }

    pub fn is_init_best(&self, sol: &Solution<D>) -> bool {
        sol.value == Objective::worst_possible() && sol.data.is_none()
    }

    pub fn is_init_worst(&self, sol: &Solution<D>) -> bool {
        sol.value == Objective::NEG_INFINITY && sol.data.is_none()
    }

    pub fn on_best(&mut self, handler: impl FnMut(&Solution<D>, &Solution<D>) + 'static) {
        self.on_best.push(Box::new(handler));
    }

    pub fn on_worst(&mut self, handler: impl FnMut(&Solution<D>, &Solution<D>) + 'static) {
        self.on_worst.push(Box::new(handler));
    }

    pub fn on_update(&mut self, handler: impl FnMut(&Solution<D>) + 'static) {
        self.on_update.push(Box::new(handler));
    }

    pub fn extrema(&self) -> [Solution<D>; 2] {
        [self.best.clone(), self.worst.clone()]
    }

    pub fn update(&mut self, sol: Solution<D>) {
        self.count += 1;
        if sol.value < self.best.value {
            let old = std::mem::replace(&mut self.best, sol.clone());
            for handler in self.on_best.iter_mut() {
                handler(&old, &self.best);
            }
        }
        if sol.value > self.worst.value {
            let old = std::mem::replace(&mut self.worst, sol.clone());
            for handler in self.on_worst.iter_mut() {
                handler(&old, &self.worst);
            }
        }
        for handler in self.on_update.iter_mut() {
            handler(&sol);
        }
    }

    /// Recomputes best/worst from `sols` only, leaving `count` untouched. Used after a subtree
    /// is removed from the tree, to re-derive a node's stats from its surviving children.
    ///
    /// Returns `true` iff either extremum actually changed (by identity, not merely by value: a
    /// different solution that happens to carry an equal value still counts as changed, since it
    /// may carry different `data`/`iteration`/`found_at`).
    pub fn refresh(&mut self, sols: impl IntoIterator<Item = Solution<D>>) -> bool {
        let mut new_best = Self::init_best();
        let mut new_worst = Self::init_worst();
        for sol in sols {
            if sol.value < new_best.value {
                new_best = sol.clone();
            }
            if sol.value > new_worst.value {
                new_worst = sol;
            }
        }
        let best_changed = !(self.is_init_best(&new_best) && self.is_init_best(&self.best))
            && new_best.id != self.best.id;
        let worst_changed = !(self.is_init_worst(&new_worst) && self.is_init_worst(&self.worst))
            && new_worst.id != self.worst.id;
        self.best = new_best;
        self.worst = new_worst;
        best_changed || worst_changed
    }
}

impl<D: Clone> Default for SolutionTracker<D> {
    fn default() -> Self {
        Self::new()
    }
}
