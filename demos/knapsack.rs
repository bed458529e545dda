use colored::Colorize;
use optmcts::prelude::*;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

/// A single item with an associated value/weight ratio, used to bias the branching order toward
/// the most attractive items first.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Item {
    name: usize,
    value: f64,
    weight: f64,
}

impl Item {
    fn ratio(&self) -> f64 {
        self.value / self.weight
    }
}

fn build_items(values: &[f64], weights: &[f64]) -> Vec<Item> {
    values
        .iter()
        .zip(weights)
        .enumerate()
        .map(|(i, (&value, &weight))| Item { name: i, value, weight })
        .collect()
}

/// 0/1 knapsack search state: at each step, decide whether to pack the next most attractive
/// remaining item. Once the remaining items fit entirely within the leftover capacity, they are
/// all packed at once and the state becomes terminal.
#[derive(Clone)]
struct KnapsackState {
    items_left: Vec<Item>,
    items_packed: Vec<Item>,
    capacity_required: f64,
    capacity_left: f64,
    total_value: f64,
}

impl KnapsackState {
    fn new(items: Vec<Item>, capacity: f64) -> Self {
        let mut items_left = items.clone();
        items_left.sort_by(|a, b| a.ratio().partial_cmp(&b.ratio()).unwrap());
        let capacity_required = items.iter().map(|i| i.weight).sum();
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
        let item = self.items_left.pop().expect("actions() guards against an empty list");
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
        // The engine minimizes, so the packed value is negated.
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

fn instance_2() -> (Vec<Item>, f64) {
    let values = [24.0, 13.0, 23.0, 15.0, 16.0];
    let weights = [12.0, 7.0, 11.0, 8.0, 9.0];
    (build_items(&values, &weights), 26.0)
}

fn instance_1() -> (Vec<Item>, f64) {
    let values = [92.0, 57.0, 49.0, 68.0, 60.0, 43.0, 67.0, 84.0, 87.0, 72.0];
    let weights = [23.0, 31.0, 29.0, 44.0, 53.0, 38.0, 63.0, 85.0, 89.0, 82.0];
    (build_items(&values, &weights), 165.0)
}

/// A 24-item, large-capacity instance used to demonstrate pruning on a much bigger search space
/// than `instance_1`/`instance_2`.
fn instance_8() -> (Vec<Item>, f64) {
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
    (build_items(&values, &weights), 6_404_180.0)
}

fn main() {
    env_logger::init();

    let instances = [
        ("instance_2", instance_2()),
        ("instance_1", instance_1()),
        ("instance_8", instance_8()),
    ];
    for (name, (items, capacity)) in instances {
        println!("{}", "_".repeat(80).bright_white());
        println!("{}", name.bright_white());

        let item_count = items.len();
        let root = KnapsackState::new(items, capacity);
        let mut solver = Solver::new(
            root,
            SolverOptions {
                rng_seed: Some(42),
                ..Default::default()
            },
        );
        let cancel = AtomicBool::new(false);
        let (time_limit, iter_limit) = if item_count > 10 {
            (Duration::from_secs(30), 1_000_000)
        } else {
            (Duration::from_secs(5), 200_000)
        };
        let best = solver
            .run(time_limit, iter_limit, &cancel)
            .expect("search should not hit a usage or contract error")
            .expect("a solution should always be found for a knapsack instance");

        let value = match best.value {
            Objective::Feasible(v) => -v,
            Objective::Infeasible(i) => {
                println!("{}", format!("no feasible packing found ({})", i).red());
                continue;
            }
        };
        println!(
            "{} {}",
            "best packed value:".bright_white(),
            format!("{}", value).green()
        );
        if let Some(items) = best.data {
            let names: Vec<String> = items.iter().map(|i| i.name.to_string()).collect();
            println!("{} {}", "items:".bright_white(), names.join(", ").yellow());
        }
    }
}
