//! Benchmarks for the backdrop simulations.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use portfolio_backdrop::{
    compute::{CellularAutomaton, FieldSimulation, FlockSimulation, SimRng, Simulation},
    render::{RecordingSurface, Surface},
    schema::{AutomatonConfig, FieldConfig, FlockConfig},
};

const VIEWPORTS: [(f32, f32); 3] = [(640.0, 480.0), (1280.0, 720.0), (2560.0, 1440.0)];

fn bench_automaton_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("automaton_generation");
    let config = AutomatonConfig::default();

    for (width, height) in VIEWPORTS {
        let mut automaton = CellularAutomaton::new(width, height, &config, SimRng::new(42));

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}x{}", width, height)),
            &width,
            |b, _| {
                b.iter(|| {
                    black_box(&mut automaton).generation();
                });
            },
        );
    }

    group.finish();
}

fn bench_flock_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("flock_step");

    for count in [50, 200, 600] {
        let config = FlockConfig {
            count,
            ..FlockConfig::default()
        };
        let mut flock = FlockSimulation::new(1280.0, 720.0, &config, SimRng::new(42));
        let mut surface = RecordingSurface::new(1280.0, 720.0);

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}_boids", count)),
            &count,
            |b, _| {
                b.iter(|| {
                    surface.clear();
                    flock.step(black_box(&mut surface));
                });
            },
        );
    }

    group.finish();
}

fn bench_field_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("field_step");

    for particle_count in [120, 600, 1500] {
        let config = FieldConfig {
            particle_count,
            ..FieldConfig::default()
        };
        let mut field = FieldSimulation::new(1280.0, 720.0, &config, SimRng::new(42));
        let mut surface = RecordingSurface::new(1280.0, 720.0);

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}_particles", particle_count)),
            &particle_count,
            |b, _| {
                b.iter(|| {
                    surface.clear();
                    field.step(black_box(&mut surface));
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_automaton_generation,
    bench_flock_step,
    bench_field_step
);
criterion_main!(benches);
