//! End-to-end coverage of the solver against small 0/1 knapsack instances, plus a handful of
//! scenario tests for the tree and value-ordering invariants that are awkward to exercise
//! through a full solver run.

use log::{Level, Log, Metadata, Record};
use optmcts::prelude::*;
use std::sync::atomic::AtomicBool;
use std::sync::{Mutex, OnceLock};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Item {
    value: f64,
    weight: f64,
}

impl Item {
    fn ratio(&self) -> f64 {
        self.value / self.weight
    }
}

#[derive(Clone)]
struct KnapsackState {
    items_left: Vec<Item>,
    items_packed: Vec<Item>,
    capacity_required: f64,
    capacity_left: f64,
    total_value: f64,
}

impl KnapsackState {
    fn new(values: &[f64], weights: &[f64], capacity: f64) -> Self {
        let mut items_left: Vec<Item> = values
            .iter()
            .zip(weights)
            .map(|(&value, &weight)| Item { value, weight })
            .collect();
        items_left.sort_by(|a, b| a.ratio().partial_cmp(&b.ratio()).unwrap());
        let capacity_required = items_left.iter().map(|i| i.weight).sum();
        Self {
            items_left,
            items_packed: Vec::new(),
            capacity_required,
            capacity_left: capacity,
            total_value: 0.0,
        }
    }
}

impl State for KnapsackState {
    type Action = bool;
    type Data = Vec<Item>;

    fn actions(&self) -> Vec<Self::Action> {
        if self.items_left.is_empty() {
            Vec::new()
        } else {
            vec![true, false]
        }
    }

    fn apply(&mut self, pack_item: &Self::Action) {
        let item = self.items_left.pop().unwrap();
        self.capacity_required -= item.weight;
        if *pack_item {
            self.items_packed.push(item);
            self.total_value += item.value;
            self.capacity_left -= item.weight;
            self.items_left.retain(|i| i.weight <= self.capacity_left);
            self.capacity_required = self.items_left.iter().map(|i| i.weight).sum();
        }
        if self.capacity_required <= self.capacity_left {
            self.total_value += self.items_left.iter().map(|i| i.value).sum::<f64>();
            self.capacity_left -= self.items_left.iter().map(|i| i.weight).sum::<f64>();
            self.items_packed.append(&mut self.items_left);
            self.capacity_required = 0.0;
        }
    }

    fn is_terminal(&self) -> bool {
        self.items_left.is_empty()
    }

    fn solution(&self) -> Solution<Self::Data> {
        Solution::new(-self.total_value, Some(self.items_packed.clone()))
    }

    fn bound(&self) -> f64 {
        let mut bound = self.total_value;
        let mut capacity = self.capacity_left;
        for item in self.items_left.iter().rev() {
            if item.weight <= capacity {
                bound += item.value;
                capacity -= item.weight;
            } else {
                bound += item.value * capacity / item.weight;
                break;
            }
        }
        -bound
    }

    fn has_bound(&self) -> bool {
        true
    }
}

fn solve(state: KnapsackState, seed: u64) -> (Solution<Vec<Item>>, bool) {
    let mut solver = Solver::new(
        state,
        SolverOptions {
            rng_seed: Some(seed),
            ..Default::default()
        },
    );
    let cancel = AtomicBool::new(false);
    let best = solver
        .run(Duration::from_secs(10), 500_000, &cancel)
        .expect("fixture states never violate the state contract")
        .expect("a knapsack instance always has a feasible packing");
    (best, best_is_exhausted(&solver))
}

fn best_is_exhausted<S: State>(solver: &Solver<S>) -> bool {
    solver.tree.node(solver.tree.root()).is_exhausted()
}

/// S1: five-item instance, optimal packed value 51 (objective -51 since the engine minimizes).
#[test]
fn instance_2_finds_optimum() {
    let values = [24.0, 13.0, 23.0, 15.0, 16.0];
    let weights = [12.0, 7.0, 11.0, 8.0, 9.0];
    let state = KnapsackState::new(&values, &weights, 26.0);
    let (best, exhausted) = solve(state, 1);
    assert_eq!(best.value, Objective::Feasible(-51.0));
    assert!(exhausted);
    assert!(best.is_opt);
}

/// S2: ten-item instance, optimal packed value 309.
#[test]
fn instance_1_finds_optimum() {
    let values = [92.0, 57.0, 49.0, 68.0, 60.0, 43.0, 67.0, 84.0, 87.0, 72.0];
    let weights = [23.0, 31.0, 29.0, 44.0, 53.0, 38.0, 63.0, 85.0, 89.0, 82.0];
    let state = KnapsackState::new(&values, &weights, 165.0);
    let (best, exhausted) = solve(state, 7);
    assert_eq!(best.value, Objective::Feasible(-309.0));
    assert!(exhausted);
}

/// S7: same seed, same instance, replays to the identical optimum and exhaustion outcome.
#[test]
fn same_seed_replays_the_same_result() {
    let values = [24.0, 13.0, 23.0, 15.0, 16.0];
    let weights = [12.0, 7.0, 11.0, 8.0, 9.0];
    let (first, _) = solve(KnapsackState::new(&values, &weights, 26.0), 99);
    let (second, _) = solve(KnapsackState::new(&values, &weights, 26.0), 99);
    assert_eq!(first.value, second.value);
}

/// S3: the 24-item, large-capacity instance. Given a generous iteration budget, branch-and-bound
/// pruning on `bound()` drives the search to the known optimum of 13,549,094. Ignored by default
/// since it takes noticeably longer than the other fixtures; run explicitly with
/// `cargo test -- --ignored` to exercise it.
#[test]
#[ignore]
fn instance_8_finds_optimum() {
    let values = [
        825594.0, 1677009.0, 1676628.0, 1523970.0, 943972.0, 97426.0, 69666.0, 1296457.0,
        1679693.0, 1902996.0, 1844992.0, 1049289.0, 1252836.0, 1319836.0, 953277.0, 2067538.0,
        675367.0, 853655.0, 1826027.0, 65731.0, 901489.0, 577243.0, 466257.0, 369261.0,
    ];
    let weights = [
        382745.0, 799601.0, 909247.0, 729069.0, 467902.0, 44328.0, 34610.0, 698150.0, 823460.0,
        903959.0, 853665.0, 551830.0, 610856.0, 670702.0, 488960.0, 951111.0, 323046.0, 446298.0,
        931161.0, 31385.0, 496951.0, 264724.0, 224916.0, 169684.0,
    ];
    let state = KnapsackState::new(&values, &weights, 6_404_180.0);
    let mut solver = Solver::new(state, SolverOptions { rng_seed: Some(5), ..Default::default() });
    let cancel = AtomicBool::new(false);
    let best = solver
        .run(Duration::from_secs(60), 2_000_000, &cancel)
        .expect("fixture state never violates the state contract")
        .expect("the instance always has a feasible packing");
    assert_eq!(best.value, Objective::Feasible(-13_549_094.0));
}

/// S6: a state exposing `bound()` auto-enables pruning, and it measurably shrinks the tree
/// relative to an unpruned run of the same instance.
#[test]
fn pruning_reduces_final_tree_size() {
    let values = [92.0, 57.0, 49.0, 68.0, 60.0, 43.0, 67.0, 84.0, 87.0, 72.0];
    let weights = [23.0, 31.0, 29.0, 44.0, 53.0, 38.0, 63.0, 85.0, 89.0, 82.0];

    let pruned_state = KnapsackState::new(&values, &weights, 165.0);
    let mut pruned = Solver::new(
        pruned_state,
        SolverOptions { rng_seed: Some(3), ..Default::default() },
    );
    let cancel = AtomicBool::new(false);
    pruned.run(Duration::from_secs(10), 500_000, &cancel).unwrap();

    let unpruned_state = KnapsackState::new(&values, &weights, 165.0);
    let mut unpruned = Solver::new(
        unpruned_state,
        SolverOptions { pruning: Some(false), rng_seed: Some(3), ..Default::default() },
    );
    unpruned.run(Duration::from_secs(10), 500_000, &cancel).unwrap();

    assert!(pruned.tree.tree_size() <= unpruned.tree.tree_size());
}

/// A minimal `log::Log` that records every emitted message's formatted text, installed once for
/// the whole test binary so individual tests can assert on lines a run produced.
struct LineRecorder {
    lines: Mutex<Vec<String>>,
}

impl Log for LineRecorder {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= Level::Debug
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            self.lines.lock().unwrap().push(record.args().to_string());
        }
    }

    fn flush(&self) {}
}

static RECORDER: OnceLock<&'static LineRecorder> = OnceLock::new();

fn recorder() -> &'static LineRecorder {
    *RECORDER.get_or_init(|| {
        let recorder: &'static LineRecorder =
            Box::leak(Box::new(LineRecorder { lines: Mutex::new(Vec::new()) }));
        log::set_logger(recorder).expect("a test binary installs its logger exactly once");
        log::set_max_level(log::LevelFilter::Debug);
        recorder
    })
}

/// S9: running the solver produces an `info`-level "Pruning is ..." line at construction and,
/// once a feasible solution is found, an `info`-level "New best overall solution" line.
#[test]
fn status_logging_reports_pruning_and_new_best() {
    let recorder = recorder();
    let values = [24.0, 13.0, 23.0, 15.0, 16.0];
    let weights = [12.0, 7.0, 11.0, 8.0, 9.0];
    let state = KnapsackState::new(&values, &weights, 26.0);
    let _ = solve(state, 11);

    let lines = recorder.lines.lock().unwrap();
    assert!(lines.iter().any(|l| l.starts_with("Pruning is")));
    assert!(lines.iter().any(|l| l.starts_with("New best overall solution")));
}
