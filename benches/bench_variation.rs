use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use ratatoskr::{
    bitvector::{BitVector, RandomBits},
    evolution::{EvolutionOptions, EvolutionarySystemBuilder},
    initialization::Builder,
    representation::{Individual, Population},
    rng::Random,
    variation::{Breeder, VariationSource},
};

const BITS: usize = 64;

fn scored_population(size: usize) -> Population<BitVector> {
    let builder = Builder::new(Individual::new(BitVector::zeros(BITS)), RandomBits::default());
    let mut population = builder.populate(size, 4, Some(5)).unwrap();
    for individual in population.individuals_mut() {
        let zeros = (BITS - individual.featuremap().ones()) as f32;
        individual.score(zeros, zeros);
        individual.adjust(0.5, 1.0);
    }
    population
}

fn bench_weighted_sampling(c: &mut Criterion) {
    let mut group = c.benchmark_group("weighted_sampling");
    let mut random = Random::from_seed(1);

    for size in [10, 100, 1000, 10000].iter() {
        let weights: Vec<f32> = (0..*size).map(|i| 1.0 / (1.0 + i as f32)).collect();
        group.bench_with_input(BenchmarkId::from_parameter(size), &weights, |b, weights| {
            b.iter(|| random.sample_weighted_index(black_box(weights)).unwrap())
        });
    }

    group.finish();
}

fn bench_vary(c: &mut Criterion) {
    let mut group = c.benchmark_group("vary");

    for size in [64, 512, 2048].iter() {
        let population = scored_population(*size);
        let root = VariationSource::default_tree(1.0 / BITS as f64, 0.5).unwrap();
        let mut breeder = Breeder::new(root, *size, 4, Some(2)).unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(size), &population, |b, population| {
            b.iter(|| breeder.vary(black_box(population)).unwrap())
        });
    }

    group.finish();
}

fn bench_run(c: &mut Criterion) {
    c.bench_function("onemax_run", |b| {
        b.iter(|| {
            let options = EvolutionOptions::builder()
                .population_size(128)
                .generations(20)
                .threads(4)
                .seed(9)
                .build();
            let mut system = EvolutionarySystemBuilder::new()
                .with_builder(Builder::new(
                    Individual::new(BitVector::zeros(BITS)),
                    RandomBits::default(),
                ))
                .with_problem_fn(|individual: &mut Individual<BitVector>, _| {
                    let zeros = (BITS - individual.featuremap().ones()) as f32;
                    individual.score(zeros, zeros);
                    Ok(())
                })
                .with_variation(VariationSource::default_tree(1.0 / BITS as f64, 0.5).unwrap())
                .with_options(options)
                .build()
                .unwrap();
            system.run().unwrap()
        })
    });
}

criterion_group!(benches, bench_weighted_sampling, bench_vary, bench_run);
criterion_main!(benches);
