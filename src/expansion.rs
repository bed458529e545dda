use crate::error::Error;
use crate::state::State;

/// Lazily produces child `(action, state)` pairs for a single parent state, one at a time.
///
/// Exactly one action is buffered ahead between `start()` and `is_finished`. This mirrors the
/// buffered-lookahead shape of an action iterator that must know whether more items remain
/// without consuming them.
pub struct Expansion<S: State> {
    state: S,
    remaining: std::vec::IntoIter<S::Action>,
    next_action: Option<S::Action>,
    started: bool,
    finished: bool,
}

impl<S: State> Expansion<S> {
    pub fn new(state: S) -> Self {
        Self {
            state,
            remaining: Vec::new().into_iter(),
            next_action: None,
            started: false,
            finished: false,
        }
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn start(&mut self) -> Result<(), Error> {
        if self.started {
            return Err(Error::Usage("multiple attempts to start node expansion".into()));
        }
        self.remaining = self.state.actions().into_iter();
        self.started = true;
        self.advance();
        Ok(())
    }

    /// Produces the next `(action, child_state)` pair by cloning the parent state and applying
    /// the buffered action.
    pub fn next(&mut self) -> Result<(S::Action, S), Error> {
        if !self.started {
            return Err(Error::Usage("node expansion has not been started".into()));
        }
        if self.finished {
            return Err(Error::Usage("node expansion is already finished".into()));
        }
        let action = self
            .next_action
            .clone()
            .expect("expansion not finished implies a buffered action is present");
        let mut child = self.state.clone();
        child.apply(&action);
        self.advance();
        Ok((action, child))
    }

    fn advance(&mut self) {
        match self.remaining.next() {
            Some(action) => self.next_action = Some(action),
            None => {
                self.next_action = None;
                self.finished = true;
            }
        }
    }
}
