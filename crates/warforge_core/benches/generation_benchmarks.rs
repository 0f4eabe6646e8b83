use criterion::{black_box, criterion_group, criterion_main, Criterion};
use warforge_core::behavior::tick_all;
use warforge_core::entity::{generate_entities, EntityOptions};
use warforge_core::overrides::parse_command;
use warforge_core::pipeline::{generate, GenerationRequest};
use warforge_core::world::{generate_world, WorldOptions};
use warforge_core::SeededRng;

fn bench_world_generation(c: &mut Criterion) {
    let options = WorldOptions::default();

    c.bench_function("world_generation_64x64", |b| {
        b.iter(|| {
            let mut rng = SeededRng::new(42);
            let world = generate_world(&mut rng, black_box(&options));
            black_box(world)
        })
    });
}

fn bench_full_generation(c: &mut Criterion) {
    let request = GenerationRequest::default().with_seed(42);

    c.bench_function("full_generation_64x64", |b| {
        b.iter(|| black_box(generate(black_box(&request))))
    });
}

fn bench_tick_all(c: &mut Criterion) {
    let mut rng = SeededRng::new(42);
    let Ok(world) = generate_world(&mut rng, &WorldOptions::default()) else {
        return;
    };
    let options = EntityOptions {
        density: 1.0,
        ..EntityOptions::default()
    };
    let roster = generate_entities(&mut rng.fork("entities"), &world, &options);

    c.bench_function("tick_all_dense_roster", |b| {
        b.iter(|| black_box(tick_all(black_box(&roster), 1.0)))
    });
}

fn bench_parse_command(c: &mut Criterion) {
    let commands = [
        "spawn 10 infantry at 20,20 faction hostile",
        "set weather storm intensity 80",
        "trigger battle at poi_3",
        "make it rain",
    ];

    c.bench_function("parse_command_mixed", |b| {
        b.iter(|| {
            for command in &commands {
                black_box(parse_command(black_box(command)));
            }
        })
    });
}

criterion_group!(
    benches,
    bench_world_generation,
    bench_full_generation,
    bench_tick_all,
    bench_parse_command
);
criterion_main!(benches);
