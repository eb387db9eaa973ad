use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use tabumip::model::{Expression, Model, Sense};
use tabumip::neighborhood::{AcceptMask, Neighborhood};
use tabumip::options::NeighborhoodOptions;

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

fn bench_update_moves(c: &mut Criterion) {
    let mut group = c.benchmark_group("neighborhood-update-moves");
    for size in [50usize, 200, 800] {
        group.bench_with_input(BenchmarkId::new("binary-knapsack", size), &size, |b, &size| {
            let model = knapsack_model(size);
            let options = NeighborhoodOptions::default();
            let mut neighborhood = Neighborhood::new(&options, None).unwrap();
            neighborhood.setup(&model);
            let mut rng = ChaCha8Rng::seed_from_u64(42);
            b.iter(|| {
                black_box(neighborhood.update_moves(
                    black_box(&model),
                    black_box(&options),
                    AcceptMask::all(),
                    &mut rng,
                    true,
                ))
            });
        });
    }
    group.finish();
}

criterion_group!(neighborhood_benches, bench_update_moves);
criterion_main!(neighborhood_benches);
