//! Benchmarks for the host-authoritative field loop and shader assembly.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::{Vec2, Vec3};

use wavefield::shader;
use wavefield::{DomainBounds, FieldEvaluator, FieldProfile, HostBuffers, ParticleStore, SizeRange};

fn store(count: u32) -> ParticleStore {
    ParticleStore::initialize_with_seed(
        count,
        DomainBounds::default(),
        SizeRange::default(),
        Vec3::splat(0.2),
        42,
    )
    .expect("valid store")
}

fn bench_evaluate_into(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate_into");

    for count in [2_000u32, 20_000, 200_000] {
        let store = store(count);
        for profile in FieldProfile::builtin() {
            let name = profile.name;
            let evaluator = FieldEvaluator::new(profile);
            let mut buffers = HostBuffers::new(&store);

            group.bench_with_input(BenchmarkId::new(name, count), &count, |b, _| {
                let mut t = 0.0f32;
                b.iter(|| {
                    t += 1.0 / 60.0;
                    buffers.evaluate_into(&evaluator, &store, black_box(Vec2::new(1.0, -0.5)), t);
                    black_box(buffers.take_dirty().map(|bytes| bytes.len()))
                })
            });
        }
    }

    group.finish();
}

fn bench_single_sample(c: &mut Criterion) {
    let store = store(1);
    let particle = store.particles()[0];
    let evaluator = FieldEvaluator::new(FieldProfile::drift());

    c.bench_function("sample_one", |b| {
        b.iter(|| black_box(evaluator.sample(black_box(&particle), Vec2::ZERO, 3.0)))
    });
}

fn bench_shader_assembly(c: &mut Criterion) {
    let mut group = c.benchmark_group("shader_assembly");
    let profile = FieldProfile::trefoil();

    group.bench_function("device_render", |b| {
        b.iter(|| black_box(shader::device_render_shader(&profile)))
    });
    group.bench_function("probe", |b| b.iter(|| black_box(shader::probe_shader(&profile))));

    group.finish();
}

criterion_group!(benches, bench_evaluate_into, bench_single_sample, bench_shader_assembly);
criterion_main!(benches);
