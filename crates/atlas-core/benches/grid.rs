use atlas_core::{MapConfig, PointTable, build_grid_artifact};
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const WORDS: [&str; 12] = [
    "neural", "network", "protein", "folding", "graph", "theory", "quantum", "optics", "robot",
    "control", "language", "model",
];

fn table(n: usize) -> PointTable {
    let mut rng = StdRng::seed_from_u64(7);
    let mut xs = Vec::with_capacity(n);
    let mut ys = Vec::with_capacity(n);
    let mut texts = Vec::with_capacity(n);
    for i in 0..n {
        let cluster = (i % 4) as f64 * 20.0;
        xs.push(cluster + rng.random_range(-5.0..5.0));
        ys.push(cluster + rng.random_range(-5.0..5.0));
        let a = WORDS[rng.random_range(0..WORDS.len())];
        let b = WORDS[(i % 4) * 3];
        texts.push(format!("{a} {b}"));
    }
    PointTable::new(xs, ys, texts)
}

fn artifact_benchmark(c: &mut Criterion) {
    let table = table(2000);
    let config = MapConfig {
        grid_size: 100,
        max_zoom_scale: 50.0,
        ..MapConfig::default()
    };

    c.bench_function("build_grid_artifact_2000", |b| {
        b.iter(|| build_grid_artifact(black_box(&table), None, &config).unwrap())
    });
}

criterion_group!(benches, artifact_benchmark);
criterion_main!(benches);
