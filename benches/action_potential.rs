//! Action potential benchmarks

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use cardio_sim::config::SessionParameters;
use cardio_sim::{evaluate, CellType, Drug, DrugState, SimulationSession};

fn bench_evaluate_drug_free(c: &mut Criterion) {
    let drugs = DrugState::new();

    c.bench_function("evaluate_drug_free", |b| {
        b.iter(|| evaluate(black_box(150.0), CellType::Ventricular, 1.0, black_box(&drugs)))
    });
}

fn bench_evaluate_all_drugs(c: &mut Criterion) {
    let drugs = DrugState::new()
        .with(Drug::Ttx, 0.02)
        .and_then(|d| d.with(Drug::Verapamil, 0.1))
        .and_then(|d| d.with(Drug::Diltiazem, 0.05))
        .unwrap();

    c.bench_function("evaluate_all_drugs", |b| {
        b.iter(|| evaluate(black_box(150.0), CellType::Ventricular, 1.0, black_box(&drugs)))
    });
}

fn bench_session_second(c: &mut Criterion) {
    c.bench_function("session_one_second", |b| {
        b.iter(|| {
            let mut session = SimulationSession::new(SessionParameters::default()).unwrap();
            session.run_for(black_box(1000.0)).unwrap()
        })
    });
}

criterion_group!(
    benches,
    bench_evaluate_drug_free,
    bench_evaluate_all_drugs,
    bench_session_second
);
criterion_main!(benches);
