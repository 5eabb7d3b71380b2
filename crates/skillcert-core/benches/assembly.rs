use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use skillcert_core::assembler::{interleave, target_quota};
use skillcert_core::model::{Difficulty, OptionLabel, Question};

fn make_questions(count: u64) -> Vec<Question> {
    (0..count)
        .map(|i| Question {
            id: i,
            text: format!("question {i}"),
            options: ["a".into(), "b".into(), "c".into(), "d".into()],
            correct: OptionLabel::A,
            difficulty: Difficulty::ALL[(i % 3) as usize],
            category_ids: vec![1],
            explanation: None,
            relevance_until: None,
            active: true,
        })
        .collect()
}

fn bench_target_quota(c: &mut Criterion) {
    let mut group = c.benchmark_group("target_quota");

    group.bench_function("total=10", |b| b.iter(|| target_quota(black_box(10))));
    group.bench_function("total=100", |b| b.iter(|| target_quota(black_box(100))));
    group.bench_function("total=10000", |b| b.iter(|| target_quota(black_box(10000))));

    group.finish();
}

fn bench_interleave(c: &mut Criterion) {
    let mut group = c.benchmark_group("interleave");

    for size in [20u64, 200, 2000] {
        group.bench_function(format!("questions={size}"), |b| {
            let questions = make_questions(size);
            let mut rng = StdRng::seed_from_u64(42);
            b.iter_batched(
                || questions.clone(),
                |mut qs| interleave(black_box(&mut qs), &mut rng),
                criterion::BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

criterion_group!(benches, bench_target_quota, bench_interleave);
criterion_main!(benches);
