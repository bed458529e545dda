use std::time::{Duration, Instant};

/// A reentrant stopwatch used by the solver to enforce time limits.
///
/// `start()`/`stop()` calls nest: the clock only actually starts counting on the transition from
/// zero active trackers to one, and only folds the interval into `accumulated` on the transition
/// back to zero. This mirrors a CPU-time stopwatch's `tracking()` context manager, but measures
/// wall-clock time via [`Instant`] since the standard library exposes no portable process-CPU-time
/// API.
pub struct Clock {
    accumulated: Duration,
    running_since: Option<Instant>,
    depth: u32,
}

impl Clock {
    pub fn new() -> Self {
        Self {
            accumulated: Duration::ZERO,
            running_since: None,
            depth: 0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.depth > 0
    }

    /// Total elapsed time. While active, this keeps increasing; while inactive, it holds steady.
    pub fn elapsed(&self) -> Duration {
        match self.running_since {
            Some(start) => self.accumulated + start.elapsed(),
            None => self.accumulated,
        }
    }

    pub fn start(&mut self) {
        if self.depth == 0 {
            self.running_since = Some(Instant::now());
        }
        self.depth += 1;
    }

    pub fn stop(&mut self) {
        if self.depth == 0 {
            return;
        }
        self.depth -= 1;
        if self.depth == 0 {
            if let Some(start) = self.running_since.take() {
                self.accumulated += start.elapsed();
            }
        }
    }

    /// Resets the clock to zero. `force` is required while the clock is active.
    pub fn reset(&mut self, force: bool) {
        if !force && self.depth > 0 {
            panic!("cannot reset an active clock without force=true");
        }
        self.accumulated = Duration::ZERO;
        self.running_since = None;
        self.depth = 0;
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_start_stop_only_accumulates_once() {
        let mut clock = Clock::new();
        clock.start();
        clock.start();
        assert!(clock.is_active());
        clock.stop();
        assert!(clock.is_active()); // one tracker still active
        clock.stop();
        assert!(!clock.is_active());
    }

    #[test]
    fn elapsed_holds_steady_while_inactive() {
        let mut clock = Clock::new();
        clock.start();
        clock.stop();
        let a = clock.elapsed();
        let b = clock.elapsed();
        assert_eq!(a, b);
    }
}
