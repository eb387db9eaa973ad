use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::time::Instant;

use tabumip::model::{Expression, Model, Sense};
use tabumip::neighborhood::{AcceptMask, Neighborhood};
use tabumip::options::Options;
use tabumip::tabu_search::TabuSearch;
use tabumip::ATol;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn knapsack_model(num_items: usize) -> Model {
    let mut model = Model::new();
    let mut objective = Expression::constant(0.0);
    let mut weights = Expression::constant(-(num_items as f64) / 2.0);
    for i in 0..num_items {
        let x = model.create_variable(&format!("x{i}"), 0, 1).unwrap();
        objective.add_term(x, ((i % 7) + 1) as f64);
        weights.add_term(x, 1.0);
    }
    model.set_objective(objective);
    model.create_constraint("capacity", weights, Sense::Less).unwrap();
    model.setup();
    model
}

fn bench_run_pass(c: &mut Criterion) {
    let mut group = c.benchmark_group("tabu-search-run-pass");
    for size in [50usize, 200] {
        group.bench_with_input(BenchmarkId::new("binary-knapsack", size), &size, |b, &size| {
            let options = Options::default();
            b.iter(|| {
                let mut model = knapsack_model(size);
                let neighborhood = Neighborhood::new(&options.neighborhood, None).unwrap();
                let mut search = TabuSearch::new(neighborhood, model.variables().len()).unwrap();
                search.setup(&model);
                let mut rng = ChaCha8Rng::seed_from_u64(7);
                let atol = ATol::new(options.general.atol).unwrap();
                black_box(search.run_pass(
                    black_box(&mut model),
                    &options,
                    atol,
                    &mut rng,
                    Instant::now(),
                    None,
                    false,
                ))
            });
        });
    }
    group.finish();
}

fn bench_scoring_only(c: &mut Criterion) {
    use tabumip::neighborhood::{evaluate_all, ScoringContext};

    let mut group = c.benchmark_group("tabu-search-move-scoring");
    for size in [50usize, 200, 800] {
        group.bench_with_input(BenchmarkId::new("binary-knapsack", size), &size, |b, &size| {
            let model = knapsack_model(size);
            let mut neighborhood = Neighborhood::new(&tabumip::options::NeighborhoodOptions::default(), None).unwrap();
            neighborhood.setup(&model);
            let mut rng = ChaCha8Rng::seed_from_u64(11);
            let candidates = neighborhood.update_moves(
                &model,
                &tabumip::options::NeighborhoodOptions::default(),
                AcceptMask::all(),
                &mut rng,
                true,
            );
            let local_penalty = vec![1.0; model.constraints().len()];
            let frequency = vec![0u64; model.variables().len()];
            let ctx = ScoringContext {
                local_penalty: &local_penalty,
                frequency_penalty_coefficient: 0.0,
                frequency: &frequency,
                lagrangian_penalty_coefficient: 0.0,
                lagrangian_duals: None,
            };
            b.iter(|| black_box(evaluate_all(black_box(&model), &ctx, black_box(&candidates), true)));
        });
    }
    group.finish();
}

criterion_group!(tabu_search_benches, bench_run_pass, bench_scoring_only);
criterion_main!(tabu_search_benches);
