use crate::rng::RngHandle;
use crate::solution::Solution;

/// The problem-specific contract a user implements to drive the search.
///
/// Only [`copy`](State::copy), [`actions`](State::actions) and [`apply`](State::apply) are
/// mandatory. At least one of [`simulate`](State::simulate) or [`solution`](State::solution)
/// must also produce a usable result: the default [`simulate`](State::simulate) bottoms out in
/// [`solution`](State::solution), so a type that never overrides `simulate` must override
/// `solution`.
///
/// If [`is_terminal`](State::is_terminal) is overridden, [`solution`](State::solution) must be
/// implemented too, since a terminal node's solution is read directly rather than through
/// simulation.
pub trait State: Clone {
    type Action: Clone;
    type Data: Clone;

    /// Enumerates the actions available from this state. Must be finite.
    fn actions(&self) -> Vec<Self::Action>;

    /// Applies `action` to this state, mutating it in place.
    fn apply(&mut self, action: &Self::Action);

    /// Returns `true` if this state is terminal (a leaf with no further actions).
    ///
    /// The default is `false`. Overriding it lets a node's solution be extracted and the node
    /// removed from the tree within the same iteration it was created in, rather than waiting
    /// for a later iteration to discover it has no children.
    fn is_terminal(&self) -> bool {
        false
    }

    /// A lower bound on the objective value obtainable from this state onward.
    ///
    /// Returning `Some` here (and overriding [`has_bound`](State::has_bound) to return `true`)
    /// enables pruning by default.
    fn bound(&self) -> f64 {
        unimplemented!("state does not provide a bound; has_bound() should return false")
    }

    /// Capability flag replacing a "was `bound` overridden?" check: states that want pruning
    /// enabled automatically must override this to return `true` alongside a real
    /// [`bound`](State::bound) implementation.
    fn has_bound(&self) -> bool {
        false
    }

    /// Runs one or more simulations to a terminal state and returns the resulting solution(s).
    ///
    /// The default dives downward choosing uniformly at random among available actions (drawing
    /// from the supplied `rng`, never an ambient global generator, so a given seed replays
    /// deterministically) until [`is_terminal`](State::is_terminal) holds or no actions remain,
    /// then defers to [`solution`](State::solution).
    fn simulate(&self, rng: &mut RngHandle) -> Vec<Solution<Self::Data>> {
        let mut state = self.clone();
        loop {
            if state.is_terminal() {
                break;
            }
            let actions = state.actions();
            if actions.is_empty() {
                break;
            }
            let action = rng
                .choose(&actions)
                .expect("actions is non-empty: checked above")
                .clone();
            state.apply(&action);
        }
        vec![state.solution()]
    }

    /// Produces the [`Solution`] corresponding to this (terminal) state.
    ///
    /// Required if [`is_terminal`](State::is_terminal) is overridden, or if
    /// [`simulate`](State::simulate) is not.
    fn solution(&self) -> Solution<Self::Data> {
        unimplemented!("state does not provide a solution; simulate() must be overridden instead")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infeasible::Objective;

    #[derive(Clone)]
    struct Countdown {
        remaining: u32,
    }

    impl State for Countdown {
        type Action = ();
        type Data = ();

        fn actions(&self) -> Vec<Self::Action> {
            if self.remaining == 0 {
                Vec::new()
            } else {
                vec![()]
            }
        }

        fn apply(&mut self, _action: &Self::Action) {
            self.remaining -= 1;
        }

        fn is_terminal(&self) -> bool {
            self.remaining == 0
        }

        fn solution(&self) -> Solution<Self::Data> {
            Solution::new(0.0, None)
        }
    }

    #[test]
    fn default_simulate_reaches_terminal() {
        let mut rng = RngHandle::from_seed(1);
        let state = Countdown { remaining: 3 };
        let sols = state.simulate(&mut rng);
        assert_eq!(sols.len(), 1);
        assert_eq!(sols[0].value, Objective::Feasible(0.0));
    }
}
