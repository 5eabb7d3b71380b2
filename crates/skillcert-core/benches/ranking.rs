use criterion::{black_box, criterion_group, criterion_main, Criterion};

use skillcert_core::model::RankDefinition;
use skillcert_core::progress::render_bar;
use skillcert_core::rank::resolve;

fn make_ladder(rungs: u32) -> Vec<RankDefinition> {
    (0..rungs)
        .map(|i| RankDefinition {
            name: format!("rank {i}"),
            icon: String::new(),
            min_points: i * 100,
        })
        .collect()
}

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("rank_resolve");

    for rungs in [5u32, 50, 500] {
        let ladder = make_ladder(rungs);
        let midpoint = (rungs * 100) / 2;
        group.bench_function(format!("rungs={rungs}"), |b| {
            b.iter(|| resolve(black_box(midpoint), black_box(&ladder)))
        });
    }

    group.finish();
}

fn bench_render_bar(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_bar");

    group.bench_function("sweep", |b| {
        b.iter(|| {
            for percent in 0u8..=100 {
                black_box(render_bar(black_box(percent)));
            }
        })
    });

    group.finish();
}

criterion_group!(benches, bench_resolve, bench_render_bar);
criterion_main!(benches);
