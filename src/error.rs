use thiserror::Error;

/// Errors surfaced by fallible entry points of the search engine.
///
/// `Usage` and `Contract` both indicate a violation of the `State`/`Expansion` contract by
/// calling code rather than ordinary control flow; cancellation and timeouts are not represented
/// here since they end a `run()` call cleanly rather than with an error.
#[derive(Debug, Error)]
pub enum Error {
    /// An operation was invoked in a state that does not permit it (double `start()`, `next()`
    /// before `start()`/after `is_finished`, re-parenting an already-attached node, etc).
    #[error("usage error: {0}")]
    Usage(String),

    /// The `State` implementation did not uphold its contract (e.g. `simulate()` produced no
    /// usable solution, or `solution()` was required but not implemented).
    #[error("contract violation: {0}")]
    Contract(String),

    /// `prune()` was called with an infeasible cutoff, which has no meaningful comparison
    /// against a real-valued bound.
    #[error("prune() requires a feasible cutoff value")]
    PruningPrecondition,
}

pub type Result<T> = std::result::Result<T, Error>;
