//! Bandit loop benchmarks
//!
//! - Full runs per policy across arm counts
//! - Single UCB decision at a late round
//! - CSV parsing of a generated reward table
//!
//! ## Performance Targets
//! - UCB run: O(R·K), < 1ms for 10k rounds over 4 arms
//! - CSV parse: < 5ms for a 10k x 4 table

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use deeproute_bandit::{run, BanditLoop, PolicyKind, PolicyOptions, SelectionPolicy, Ucb};
use deeproute_core::RewardTable;

const ROUNDS: usize = 10_000;

fn probabilities(arms: usize) -> Vec<f64> {
    (0..arms).map(|a| (a as f64 + 1.0) / (arms as f64 + 2.0)).collect()
}

// ============================================================================
// Full Run Benchmarks
// ============================================================================

fn bench_run_by_arm_count(c: &mut Criterion) {
    for kind in PolicyKind::ALL {
        let mut group = c.benchmark_group(format!("run/{kind}"));
        group.throughput(Throughput::Elements(ROUNDS as u64));

        for arms in [2, 4, 8, 16] {
            let table = RewardTable::bernoulli(ROUNDS, &probabilities(arms), 2019).unwrap();
            group.bench_with_input(BenchmarkId::from_parameter(arms), &table, |b, table| {
                b.iter(|| {
                    let policy = kind.build(&PolicyOptions::default()).unwrap();
                    run(black_box(table), policy, ROUNDS, arms).unwrap()
                })
            });
        }
        group.finish();
    }
}

// ============================================================================
// Decision Benchmarks
// ============================================================================

fn bench_ucb_select(c: &mut Criterion) {
    let table = RewardTable::bernoulli(ROUNDS, &probabilities(8), 7).unwrap();
    let mut bandit = BanditLoop::new(&table, Box::new(Ucb::default()), ROUNDS, 8).unwrap();
    let mut stats = bandit.new_stats();
    for _ in 0..ROUNDS / 2 {
        bandit.step(&mut stats).unwrap();
    }

    let mut ucb = Ucb::default();
    c.bench_function("ucb/select_8_arms", |b| {
        b.iter(|| ucb.select(black_box(ROUNDS / 2), &stats))
    });
}

// ============================================================================
// Reward Table Benchmarks
// ============================================================================

fn bench_csv_parse(c: &mut Criterion) {
    let csv = RewardTable::bernoulli(ROUNDS, &probabilities(4), 1)
        .unwrap()
        .to_csv_string();

    c.bench_function("reward_table/from_csv_str", |b| {
        b.iter(|| RewardTable::from_csv_str(black_box(&csv)).unwrap())
    });
}

criterion_group!(
    name = run_benchmarks;
    config = Criterion::default();
    targets = bench_run_by_arm_count,
);

criterion_group!(
    name = decision_benchmarks;
    config = Criterion::default();
    targets = bench_ucb_select, bench_csv_parse,
);

criterion_main!(run_benchmarks, decision_benchmarks);
