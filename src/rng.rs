use crate::error::Error;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt::{Display, Formatter};

/// A snapshot of an [`RngHandle`]'s seed, suitable for logging or for restoring a generator to
/// replay a previous run deterministically.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RngState(pub u64);

impl Display for RngState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The solver-owned seedable random source used for tie-breaking during selection and for the
/// default random-descent simulation.
///
/// All randomness in this crate is drawn through a single `RngHandle`, never an ambient global
/// generator, so that a given seed replays the same search deterministically.
pub struct RngHandle {
    rng: StdRng,
    seed: u64,
}

impl RngHandle {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    pub fn from_state(state: RngState) -> Self {
        Self::from_seed(state.0)
    }

    /// The seed this handle was constructed (or last reseeded) with.
    pub fn state(&self) -> RngState {
        RngState(self.seed)
    }

    /// Picks a uniformly random element from `items`.
    ///
    /// Returns `Err(Error::Usage(_))` if `items` is empty, mirroring the "argument iterable
    /// must be non-empty" usage error raised by a bare max-of-iterable call on an empty
    /// collection.
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Result<&'a T, Error> {
        if items.is_empty() {
            return Err(Error::Usage("choose() called with an empty candidate list".into()));
        }
        let idx = self.rng.random_range(0..items.len());
        Ok(&items[idx])
    }

    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.rng.random_bool(p)
    }
}
