//! Combat Benchmarks
//!
//! Damage resolution and full simulated frames

use std::hint::black_box;

use armada_combat::ai::Behavior;
use armada_combat::damage::{DamageConfig, Pools, calculate_damage_split};
use armada_combat::ship::ShipClass;
use armada_combat::{SimulationContext, WeaponType, context};
use armada_core::math::Vec2;
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn bench_damage_resolution(c: &mut Criterion) {
    let config = DamageConfig::default();
    let split = calculate_damage_split(WeaponType::Missile, 80.0);

    c.bench_function("damage_resolve", |b| {
        b.iter_batched(
            || Pools::new(200.0, 250.0),
            |mut pools| {
                for _ in 0..10 {
                    black_box(config.resolve(&mut pools, split.energy, split.mass));
                }
                pools
            },
            criterion::BatchSize::SmallInput,
        );
    });
}

fn populated_context(enemies: usize) -> SimulationContext {
    let mut rng = StdRng::seed_from_u64(42);
    let mut ctx = SimulationContext::default();
    for i in 0..enemies {
        let class = if i % 10 == 0 { ShipClass::Heavy } else { ShipClass::Fighter };
        let behavior = Behavior::ALL[i % Behavior::ALL.len()];
        ctx.spawn_enemy_around(&mut rng, class, behavior, 300.0, 900.0);
    }
    ctx.input.set_movement_axes(1.0, 0.0);
    ctx.input.aim = Vec2::new(500.0, 0.0);
    ctx.input.primary_fire = true;
    ctx.events.clear();
    ctx
}

fn bench_simulated_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("simulated_frame");

    for count in [10, 50, 200].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, &count| {
            b.iter_batched(
                || populated_context(count),
                |mut ctx| {
                    for _ in 0..60 {
                        context::physics_system(&mut ctx, 1.0 / 60.0).ok();
                        context::gameplay_system(&mut ctx, 1.0 / 60.0).ok();
                        ctx.events.clear();
                    }
                    ctx
                },
                criterion::BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_damage_resolution, bench_simulated_frame);
criterion_main!(benches);
