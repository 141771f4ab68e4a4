use criterion::{black_box, criterion_group, criterion_main, Criterion};
use plant_growth_sim::{GrowthEvaluator, Reading, Simulation};

fn bench_calculate_growth(c: &mut Criterion) {
    let evaluator = GrowthEvaluator::default();
    let readings = [
        Reading::new(80.0, 8.0, 22.0),
        Reading::new(30.0, 11.0, 15.0),
        Reading::new(20.0, 8.0, 22.0),
        Reading::new(1000.0, 8.0, 22.0),
    ];

    c.bench_function("calculate_growth", |b| {
        b.iter(|| {
            for r in &readings {
                black_box(evaluator.calculate_growth(
                    black_box(r.water),
                    black_box(r.light),
                    black_box(r.temperature),
                ));
            }
        })
    });
}

fn bench_session_step(c: &mut Criterion) {
    let readings = [Reading::default(); 4];
    c.bench_function("simulate_all_4_plants", |b| {
        b.iter(|| {
            let mut sim = Simulation::default();
            black_box(sim.simulate_all(black_box(&readings)).ok());
        })
    });
}

criterion_group!(benches, bench_calculate_growth, bench_session_step);
criterion_main!(benches);
