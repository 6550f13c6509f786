use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use ratatoskr::{
    error::{EvolutionError, ResultExt},
    evaluation::Evaluator,
    initialization::Builder,
    representation::{Individual, Population},
    worker::{partition, Worker},
};

fn indexed(size: usize) -> Population<usize> {
    Population::new((0..size).map(Individual::new).collect()).unwrap()
}

#[test]
fn test_each_individual_scored_once_by_its_owner() {
    let size = 103;
    let visits: Arc<Vec<AtomicUsize>> = Arc::new((0..size).map(|_| AtomicUsize::new(0)).collect());
    let counter = Arc::clone(&visits);

    let mut evaluator = Evaluator::<usize>::from_fn(size, 8, Some(2), move |individual, worker| {
        let index = *individual.featuremap();
        if !worker.range().contains(&index) {
            return Err(EvolutionError::Evaluation(format!(
                "worker {:?} touched individual {}",
                worker.range(),
                index
            )));
        }
        counter[index].fetch_add(1, Ordering::SeqCst);
        individual.score(index as f32, 0.0);
        Ok(())
    })
    .unwrap();

    let mut population = indexed(size);
    assert_eq!(evaluator.evaluate_population(&mut population).unwrap(), size);
    assert!(visits.iter().all(|count| count.load(Ordering::SeqCst) == 1));

    // already evaluated individuals are skipped and keep their scores
    let before = population.clone();
    assert_eq!(evaluator.evaluate_population(&mut population).unwrap(), 0);
    assert_eq!(population, before);
    assert!(visits.iter().all(|count| count.load(Ordering::SeqCst) == 1));
}

#[test]
fn test_one_failing_worker_fails_the_phase() {
    let mut evaluator = Evaluator::<usize>::from_fn(12, 4, None, |individual, _| {
        if *individual.featuremap() == 7 {
            return Err(EvolutionError::Evaluation("bad individual".to_string()));
        }
        individual.score(1.0, 1.0);
        Ok(())
    })
    .unwrap();

    let mut population = indexed(12);
    match evaluator.evaluate_population(&mut population) {
        Err(EvolutionError::Evaluation(msg)) => assert_eq!(msg, "bad individual"),
        other => panic!("Expected Evaluation error, got {:?}", other),
    }
}

#[test]
fn test_callback_errors_carry_context() {
    // feature maps are raw text that has to be parsed before scoring
    let mut evaluator = Evaluator::<String>::from_fn(4, 2, None, |individual, _| {
        let value: f32 = individual
            .featuremap()
            .parse()
            .context(format!("Unreadable genome {:?}", individual.featuremap()))?;
        individual.score(value, value);
        Ok(())
    })
    .unwrap();

    let genomes = ["1.5", "2", "x7", "0"];
    let mut population =
        Population::new(genomes.iter().map(|g| Individual::new(g.to_string())).collect()).unwrap();
    match evaluator.evaluate_population(&mut population) {
        Err(EvolutionError::Other(msg)) => assert!(msg.starts_with("Unreadable genome \"x7\": ")),
        other => panic!("Expected Other error, got {:?}", other),
    }
}

#[test]
fn test_builder_workers_initialize_their_own_chunks() {
    let builder = Builder::from_fn(Individual::new((0usize, 0usize)), |individual, worker| {
        *individual.featuremap_mut() = (worker.onset(), worker.offset());
        Ok(())
    });

    let population = builder.populate(11, 3, Some(8)).unwrap();
    let ranges = partition(11, 3).unwrap();
    for (index, individual) in population.iter().enumerate() {
        let (onset, offset) = *individual.featuremap();
        assert!((onset..offset).contains(&index));
        assert!(ranges.contains(&(onset..offset)));
        assert!(!individual.is_evaluated());
    }
}

#[test]
fn test_worker_streams_are_independent() {
    let mut workers = Worker::partitioned(40, 4, Some(17)).unwrap();
    let draws: Vec<Vec<f64>> = workers
        .iter_mut()
        .map(|worker| (0..8).map(|_| worker.random.sample()).collect())
        .collect();

    for (i, first) in draws.iter().enumerate() {
        for second in &draws[i + 1..] {
            assert_ne!(first, second);
        }
    }

    let mut again = Worker::partitioned(40, 4, Some(17)).unwrap();
    let replay: Vec<f64> = (0..8).map(|_| again[2].random.sample()).collect();
    assert_eq!(replay, draws[2]);
}
