use fixneat::logging::{EvolutionLogger, ReportingLevel};
use fixneat::{EvolutionError, Population, PopulationConfig};
use fixneat_nn::genomics::{GeneticConfig, NNGenome};

use std::num::NonZeroUsize;

/// Runs one generation in which each individual survives
/// for as long as its output on `sensors` stays below 0.5,
/// up to `cap` ticks.
fn run_generation(population: &mut Population<GeneticConfig, NNGenome>, sensors: [f32; 3], cap: u64) {
    let mut states = vec![(); population.individuals().count()];
    while !population.is_extinct() {
        population.step_live(&mut states, |individual, _| {
            let decision = individual.genome_mut().evaluate(&sensors);
            if decision > 0.5 || individual.lifespan() >= cap {
                individual.kill();
            } else {
                individual.tick();
            }
        });
    }
}

fn population(size: usize) -> Population<GeneticConfig, NNGenome> {
    let population_config = PopulationConfig {
        size: NonZeroUsize::new(size).unwrap(),
        ..PopulationConfig::default()
    };
    Population::new(population_config, GeneticConfig::default())
}

#[test]
fn size_holds_across_generations() {
    let mut population = population(25);
    for _ in 0..15 {
        run_generation(&mut population, [0.2, 0.9, 0.4], 30);
        population.evolve().unwrap();
        assert_eq!(population.individuals().count(), 25);
        assert_eq!(population.alive_count(), 25);
        assert!(population.species().count() >= 1);
    }
    assert_eq!(population.generation(), 16);
}

#[test]
fn best_fitness_never_decreases() {
    let mut population = population(20);
    let mut previous = 0.0;
    for _ in 0..10 {
        run_generation(&mut population, [0.5, 0.5, 0.5], 40);
        population.evolve().unwrap();
        assert!(population.best_fitness() >= previous);
        previous = population.best_fitness();
    }
}

#[test]
fn champion_reaches_cap() {
    // With 60 random genomes, some answer low on these sensors
    // from the start, and elitism keeps them.
    let mut population = population(60);
    for _ in 0..10 {
        run_generation(&mut population, [1.0, 1.0, 1.0], 25);
        population.evolve().unwrap();
    }
    let (champion, fitness) = population.champion().unwrap();
    assert_eq!(fitness, 25.0);
    assert!(champion.clone().evaluate(&[1.0, 1.0, 1.0]) <= 0.5);
}

#[test]
fn no_champion_before_first_tick() {
    let population = population(10);
    assert!(matches!(population.champion(), Err(EvolutionError::NoChampion)));
}

#[test]
fn seeded_population_forms_single_species() {
    let config = GeneticConfig::default();
    let seed = NNGenome::new(&config);
    let mut population = Population::from_genome(
        &seed,
        PopulationConfig {
            size: NonZeroUsize::new(10).unwrap(),
            ..PopulationConfig::default()
        },
        config,
    );
    run_generation(&mut population, [0.0, 0.0, 0.0], 10);
    population.evolve().unwrap();

    assert_eq!(population.species().count(), 1);
    assert_eq!(population.species().next().unwrap().len(), 10);
    // 1 champion + 9 offspring.
    assert_eq!(population.individuals().count(), 10);
    let champion = population.individuals().next().unwrap().genome();
    assert!(champion.weights().eq(seed.weights()));
}

#[test]
fn logger_tracks_generations() {
    let mut population = population(15);
    let mut logger = EvolutionLogger::new(ReportingLevel::SpeciesChampions);
    for _ in 0..3 {
        run_generation(&mut population, [0.3, 0.3, 0.3], 20);
        population.evolve().unwrap();
        logger.log(&population, &|i| [i.fitness()], ["fitness"]);
    }

    let generations: Vec<usize> = logger.iter().map(|log| log.generation_number).collect();
    assert_eq!(generations, [1, 2, 3]);
    for log in logger.iter() {
        let stats = &log.genome_stats[0].1;
        assert!(stats.minimum <= stats.median && stats.median <= stats.maximum);
        assert!(stats.maximum <= log.best_fitness);
    }
}
