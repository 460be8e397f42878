use criterion::{
    black_box,
    criterion_group,
    criterion_main,
    BenchmarkId,
    Criterion,
};
use divmine_solver::{
    Dataset,
    Miner,
    MinerConfig,
    Propagation,
};
use rand::{
    rngs::SmallRng,
    Rng,
    SeedableRng,
};

criterion_group!(bench_mine, closed_patterns, closed_diversity);
criterion_main!(bench_mine);

/// Returns a random dataset with the given item density.
fn random_dataset(seed: u64, len_items: usize, len_transactions: usize, density: f64) -> Dataset {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut input = String::new();
    for _ in 0..len_transactions {
        input.push_str(&rng.gen_range(1, len_items + 1).to_string());
        for id in 1..=len_items {
            if rng.gen::<f64>() < density {
                input.push(' ');
                input.push_str(&id.to_string());
            }
        }
        input.push('\n');
    }
    Dataset::parse(&input).unwrap()
}

fn closed_patterns(c: &mut Criterion) {
    let mut g = c.benchmark_group("Miner::run closed patterns");
    g.sample_size(10);
    g.sampling_mode(criterion::SamplingMode::Flat);
    let dataset = random_dataset(1, 30, 500, 0.3);
    let min_frequency = dataset.min_frequency(5.0);
    for propagation in [Propagation::Fresh, Propagation::Incremental] {
        let config = MinerConfig::closed_patterns(min_frequency).with_propagation(propagation);
        g.bench_function(BenchmarkId::from_parameter(format!("{:?}", propagation)), |bencher| {
            bencher.iter(|| {
                let outcome = black_box(Miner::new(&dataset, config.clone()).unwrap().run());
                assert!(outcome.completion.is_complete());
            })
        });
    }
}

fn closed_diversity(c: &mut Criterion) {
    let mut g = c.benchmark_group("Miner::run closed diversity");
    g.sample_size(10);
    g.sampling_mode(criterion::SamplingMode::Flat);
    let dataset = random_dataset(2, 60, 2_000, 0.25);
    let min_frequency = dataset.min_frequency(2.0);
    for propagation in [Propagation::Fresh, Propagation::Incremental] {
        for bound in [0.1, 0.3] {
            let config = MinerConfig::closed_diversity(min_frequency, bound)
                .with_propagation(propagation);
            let id = format!("{:?} (bound = {})", propagation, bound);
            g.bench_function(BenchmarkId::from_parameter(id), |bencher| {
                bencher.iter(|| {
                    let outcome = black_box(Miner::new(&dataset, config.clone()).unwrap().run());
                    assert!(outcome.completion.is_complete());
                })
            });
        }
    }
}
