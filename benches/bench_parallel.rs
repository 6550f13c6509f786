use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use ratatoskr::{
    bitvector::{BitVector, RandomBits},
    evaluation::Evaluator,
    initialization::Builder,
    representation::Individual,
};

const BITS: usize = 256;

fn builder() -> Builder<BitVector> {
    Builder::new(Individual::new(BitVector::zeros(BITS)), RandomBits::default())
}

fn bench_evaluation(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluation");
    let size = 4096;
    let population = builder().populate(size, 4, Some(1)).unwrap();

    for threads in [1, 2, 4, 8].iter() {
        let mut evaluator = Evaluator::<BitVector>::from_fn(size, *threads, None, |individual, _| {
            let zeros = (BITS - individual.featuremap().ones()) as f32;
            individual.score(zeros, zeros);
            Ok(())
        })
        .unwrap();

        group.bench_with_input(BenchmarkId::new("threads", threads), &population, |b, population| {
            b.iter(|| {
                let mut fresh = population.clone();
                evaluator.evaluate_population(black_box(&mut fresh)).unwrap()
            })
        });
    }

    group.finish();
}

fn bench_initialization(c: &mut Criterion) {
    let mut group = c.benchmark_group("initialization");
    let builder = builder();

    for threads in [1, 2, 4, 8].iter() {
        group.bench_with_input(BenchmarkId::new("threads", threads), threads, |b, threads| {
            b.iter(|| builder.populate(black_box(4096), *threads, Some(3)).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_evaluation, bench_initialization);
criterion_main!(benches);
