//! A Population is a collection of individuals, each
//! wrapping a genome. At every generation boundary they
//! are grouped into species, which are pruned, ranked
//! and bred into the next generation.
mod config;
mod errors;
mod individual;
pub mod logging;
mod offspring_factory;
mod species;
#[cfg(test)]
pub(crate) mod testing;

use crate::Genome;
pub use config::PopulationConfig;
pub use errors::EvolutionError;
pub use individual::Individual;
use offspring_factory::OffspringFactory;
pub use species::{Species, SpeciesID};

use log::{debug, info, warn};

/// A population of individuals.
///
/// Each generation passes through three states: it is
/// _live_ while the driver runs its episodes, _all dead_
/// once every individual has been killed (see
/// [`is_extinct`]), and _evolving_ during the call to
/// [`evolve`], which installs the next live generation.
///
/// [`is_extinct`]: Population::is_extinct
/// [`evolve`]: Population::evolve
pub struct Population<C, G> {
    individuals: Vec<Individual<G>>,
    species: Vec<Species<G>>,
    generation: usize,
    best_fitness: f32,
    best_genome: Option<G>,
    population_config: PopulationConfig,
    genetic_config: C,
}

impl<C, G> Population<C, G>
where
    G: Genome<Config = C> + Clone,
{
    /// Creates a new population of randomized genomes
    /// using the passed configurations.
    ///
    /// The type of `genetic_config` depends on the implementation
    /// of [`Genome`], and is effectively opaque to the population.
    ///
    /// [`Genome`]: crate::Genome
    ///
    /// # Examples
    /// ```
    /// # use fixneat_nn::genomics::{GeneticConfig, NNGenome as G};
    /// use fixneat::{Population, PopulationConfig};
    ///
    /// let pop_config = PopulationConfig {
    ///     // Set desired configuration
    ///     ..PopulationConfig::default()
    /// };
    /// # let genetic_config = GeneticConfig::default();
    ///
    /// // With `G` a suitable type implementing `Genome`...
    /// let population = Population::<_, G>::new(pop_config, genetic_config);
    /// # assert_eq!(population.individuals().count(), 50);
    /// ```
    pub fn new(population_config: PopulationConfig, genetic_config: C) -> Population<C, G> {
        let individuals = (0..population_config.size.get())
            .map(|_| Individual::new(G::new(&genetic_config)))
            .collect();
        Population::with_individuals(individuals, population_config, genetic_config)
    }

    /// Creates a new population in which every individual
    /// carries a copy of `genome`. Useful for resuming
    /// training from a saved champion.
    ///
    /// # Examples
    /// ```
    /// use fixneat::{Population, PopulationConfig};
    /// use fixneat_nn::genomics::{GeneticConfig, NNGenome};
    ///
    /// let genetic_config = GeneticConfig::default();
    /// let genome = NNGenome::new(&genetic_config);
    /// let population = Population::from_genome(
    ///     &genome,
    ///     PopulationConfig::default(),
    ///     genetic_config,
    /// );
    ///
    /// assert!(population
    ///     .individuals()
    ///     .all(|i| i.genome().weights().eq(genome.weights())));
    /// ```
    pub fn from_genome(
        genome: &G,
        population_config: PopulationConfig,
        genetic_config: C,
    ) -> Population<C, G> {
        let individuals = (0..population_config.size.get())
            .map(|_| Individual::new(genome.clone()))
            .collect();
        Population::with_individuals(individuals, population_config, genetic_config)
    }

    fn with_individuals(
        individuals: Vec<Individual<G>>,
        population_config: PopulationConfig,
        genetic_config: C,
    ) -> Population<C, G> {
        Population {
            individuals,
            species: vec![],
            generation: 1,
            best_fitness: 0.0,
            best_genome: None,
            population_config,
            genetic_config,
        }
    }

    /// Advances every live individual through `step`, pairing
    /// each with the driver-side state at the same index in
    /// `states` (e.g. a simulated body). Afterwards, the
    /// population's best-ever record is updated from the
    /// individuals' lifespans.
    ///
    /// # Panics
    /// Panics if `states` and the population differ in length.
    ///
    /// # Examples
    /// ```
    /// # use fixneat_nn::genomics::{GeneticConfig, NNGenome as G};
    /// use fixneat::{Population, PopulationConfig};
    /// use std::num::NonZeroUsize;
    ///
    /// # let genetic_config = GeneticConfig::default();
    /// let mut population = Population::<_, G>::new(
    ///     PopulationConfig {
    ///         size: NonZeroUsize::new(3).unwrap(),
    ///         ..PopulationConfig::default()
    ///     },
    ///     genetic_config,
    /// );
    ///
    /// // Each individual survives for as many ticks as its budget.
    /// let mut budgets = vec![1, 5, 2];
    /// while !population.is_extinct() {
    ///     population.step_live(&mut budgets, |individual, budget| {
    ///         if *budget == 0 {
    ///             individual.kill();
    ///         } else {
    ///             *budget -= 1;
    ///             individual.tick();
    ///         }
    ///     });
    /// }
    ///
    /// assert_eq!(population.best_fitness(), 5.0);
    /// ```
    pub fn step_live<S, F>(&mut self, states: &mut [S], mut step: F)
    where
        F: FnMut(&mut Individual<G>, &mut S),
    {
        assert_eq!(
            states.len(),
            self.individuals.len(),
            "one driver state per individual required"
        );
        for (individual, state) in self.individuals.iter_mut().zip(states) {
            if individual.is_alive() {
                step(individual, state);
                individual.calculate_fitness();
            }
        }
        self.record_best();
    }

    /// Parallel version of [`step_live`]. Live individuals are
    /// advanced concurrently; the best-ever record is updated
    /// once all of them have been stepped.
    ///
    /// [`step_live`]: Population::step_live
    ///
    /// # Panics
    /// Panics if `states` and the population differ in length.
    #[cfg(feature = "parallel")]
    pub fn par_step_live<S, F>(&mut self, states: &mut [S], step: F)
    where
        S: Send,
        G: Send,
        F: Fn(&mut Individual<G>, &mut S) + Sync + Send,
    {
        use rayon::prelude::*;

        assert_eq!(
            states.len(),
            self.individuals.len(),
            "one driver state per individual required"
        );
        self.individuals
            .par_iter_mut()
            .zip(states.par_iter_mut())
            .filter(|(individual, _)| individual.is_alive())
            .for_each(|(individual, state)| {
                step(individual, state);
                individual.calculate_fitness();
            });
        self.record_best();
    }

    /// Returns whether every individual's episode has ended.
    ///
    /// # Examples
    /// ```
    /// # use fixneat_nn::genomics::{GeneticConfig, NNGenome as G};
    /// use fixneat::{Population, PopulationConfig};
    ///
    /// # let genetic_config = GeneticConfig::default();
    /// let mut population = Population::<_, G>::new(PopulationConfig::default(), genetic_config);
    /// assert!(!population.is_extinct());
    ///
    /// population.individuals_mut().for_each(|i| i.kill());
    /// assert!(population.is_extinct());
    /// ```
    pub fn is_extinct(&self) -> bool {
        self.individuals.iter().all(|i| !i.is_alive())
    }

    /// Returns the number of individuals still alive.
    pub fn alive_count(&self) -> usize {
        self.individuals.iter().filter(|i| i.is_alive()).count()
    }

    /// Breeds the next generation from the current one.
    ///
    /// In order, this:
    /// 1. assigns every individual's fitness from its lifespan,
    ///    updating the best-ever record,
    /// 2. assigns every individual to the first species it is
    ///    compatible with, founding new species as needed,
    /// 3. updates every species' fitness records,
    /// 4. removes species left without members,
    /// 5. removes species stale for [`stagnation_threshold`]
    ///    generations, always sparing the last one standing,
    /// 6. ranks members within species, and species by
    ///    benchmark fitness,
    /// 7. refills the population with each species' champion,
    ///    an even share of offspring per species, and any
    ///    remainder from the best species.
    ///
    /// It is meant to be called once every individual is dead,
    /// but does not enforce this.
    ///
    /// # Errors
    /// Returns an error if the population is empty, or a
    /// surviving species has no champion. Neither can happen
    /// through normal use; on error, the population should be
    /// [reset].
    ///
    /// [`stagnation_threshold`]: PopulationConfig::stagnation_threshold
    /// [reset]: Population::reset
    ///
    /// # Examples
    /// ```
    /// # use fixneat_nn::genomics::{GeneticConfig, NNGenome as G};
    /// use fixneat::{Population, PopulationConfig};
    ///
    /// # let genetic_config = GeneticConfig::default();
    /// // With `G` a suitable type implementing `Genome`...
    /// let mut population = Population::<_, G>::new(PopulationConfig::default(), genetic_config);
    ///
    /// // Run the generation's episodes...
    /// population.individuals_mut().for_each(|i| i.kill());
    ///
    /// if let Err(e) = population.evolve() {
    ///     eprintln!("{}", e);
    /// }
    /// # assert_eq!(population.generation(), 2);
    /// ```
    pub fn evolve(&mut self) -> Result<(), EvolutionError> {
        if self.individuals.is_empty() {
            return Err(EvolutionError::EmptyPopulation);
        }

        self.calculate_fitness();
        self.speciate();
        for species in &mut self.species {
            species.compute_average_fitness();
        }
        self.remove_extinct_species();
        self.remove_stale_species();
        self.sort_species_by_fitness();

        self.individuals = OffspringFactory::new(
            &self.species,
            &self.genetic_config,
            &self.population_config,
        )
        .generate_offspring()?;

        info!(
            "generation {} complete: best fitness {}, {} species",
            self.generation,
            self.best_fitness,
            self.species.len()
        );
        self.generation += 1;
        Ok(())
    }

    /// Assigns every individual's fitness, and updates
    /// the best-ever record.
    fn calculate_fitness(&mut self) {
        for individual in &mut self.individuals {
            individual.calculate_fitness();
        }
        self.record_best();
    }

    /// Records the fittest current individual as the
    /// best-ever, if it beats the previous record.
    fn record_best(&mut self) {
        let best = self.individuals.iter().max_by(|a, b| {
            a.fitness()
                .partial_cmp(&b.fitness())
                .unwrap_or_else(|| panic!("invalid individual fitnesses detected (NaN)"))
        });
        if let Some(best) = best {
            if best.fitness() > self.best_fitness {
                self.best_fitness = best.fitness();
                self.best_genome = Some(best.genome().clone());
            }
        }
    }

    /// Empties all species and reassigns every individual,
    /// in order, to the first species it is compatible with.
    /// Individuals compatible with no species found a new one.
    fn speciate(&mut self) {
        for species in &mut self.species {
            species.clear_members();
        }

        let mut new_species_count = 0;
        for individual in std::mem::take(&mut self.individuals) {
            let threshold = self.population_config.distance_threshold;
            match self.species.iter_mut().find(|s| {
                s.is_compatible(individual.genome(), &self.genetic_config, threshold)
            }) {
                Some(species) => species.add_member(individual),
                None => {
                    let id = SpeciesID(self.generation, new_species_count);
                    self.species.push(Species::new(id, individual));
                    new_species_count += 1;
                }
            }
        }
        debug!(
            "speciation: {} species, {} newly founded",
            self.species.len(),
            new_species_count
        );
    }

    /// Removes all species left without members.
    fn remove_extinct_species(&mut self) {
        self.species.retain(|s| {
            if s.is_empty() {
                debug!("species {:?} went extinct", s.id());
            }
            !s.is_empty()
        });
    }

    /// Removes all species which have stagnated for too long.
    /// If that would leave no species, the last one standing
    /// is spared and its staleness reset.
    fn remove_stale_species(&mut self) {
        let threshold = self.population_config.stagnation_threshold.get();
        let mut i = 0;
        while i < self.species.len() {
            if self.species[i].staleness() >= threshold {
                if self.species.len() > 1 {
                    let species = self.species.remove(i);
                    debug!(
                        "species {:?} culled after {} stale generations",
                        species.id(),
                        species.staleness()
                    );
                    continue;
                }
                warn!(
                    "all species stale; sparing species {:?}",
                    self.species[i].id()
                );
                self.species[i].reset_staleness();
            }
            i += 1;
        }
    }

    /// Ranks each species' members by decreasing fitness,
    /// then the species themselves by decreasing benchmark fitness.
    fn sort_species_by_fitness(&mut self) {
        for species in &mut self.species {
            species.rank_members();
        }
        self.species.sort_by(|s1, s2| {
            s2.benchmark_fitness()
                .partial_cmp(&s1.benchmark_fitness())
                .unwrap_or_else(|| panic!("invalid species fitnesses detected (NaN)"))
        });
    }

    /// Resets the population to an initial randomized state.
    ///
    /// # Examples
    /// ```
    /// # use fixneat_nn::genomics::{GeneticConfig, NNGenome as G};
    /// use fixneat::{Population, PopulationConfig};
    ///
    /// # let genetic_config = GeneticConfig::default();
    /// // With `G` a suitable type implementing `Genome`...
    /// let mut population = Population::<_, G>::new(
    ///     PopulationConfig::default(),
    ///     genetic_config,
    /// );
    ///
    /// // Evolve the population on some task, until
    /// // population.evolve() returns an Err.
    /// population.reset();
    /// # assert_eq!(population.generation(), 1);
    /// ```
    pub fn reset(&mut self)
    where
        C: Clone,
    {
        *self = Population::new(self.population_config.clone(), self.genetic_config.clone());
    }

    /// Returns the best genome ever recorded, with its fitness.
    ///
    /// # Errors
    /// Returns [`NoChampion`] if no individual has yet
    /// survived a single tick.
    ///
    /// [`NoChampion`]: EvolutionError::NoChampion
    ///
    /// # Examples
    /// ```
    /// # use fixneat_nn::genomics::{GeneticConfig, NNGenome as G};
    /// use fixneat::{EvolutionError, Population, PopulationConfig};
    ///
    /// # let genetic_config = GeneticConfig::default();
    /// let mut population = Population::<_, G>::new(PopulationConfig::default(), genetic_config);
    /// assert_eq!(population.champion().unwrap_err(), EvolutionError::NoChampion);
    ///
    /// let mut states = vec![(); 50];
    /// population.step_live(&mut states, |individual, _| individual.tick());
    ///
    /// let (_genome, fitness) = population.champion().unwrap();
    /// assert_eq!(fitness, 1.0);
    /// ```
    pub fn champion(&self) -> Result<(&G, f32), EvolutionError> {
        self.best_genome
            .as_ref()
            .map(|genome| (genome, self.best_fitness))
            .ok_or(EvolutionError::NoChampion)
    }

    /// Returns the best fitness ever recorded.
    pub fn best_fitness(&self) -> f32 {
        self.best_fitness
    }

    /// Returns an iterator over the current generation.
    pub fn individuals(&self) -> impl Iterator<Item = &Individual<G>> {
        self.individuals.iter()
    }

    /// Returns a mutable iterator over the current generation.
    pub fn individuals_mut(&mut self) -> impl Iterator<Item = &mut Individual<G>> {
        self.individuals.iter_mut()
    }

    /// Returns an iterator over all species as of the
    /// last generational turnover. Their members are the
    /// individuals of the previous generation, ranked.
    pub fn species(&self) -> impl Iterator<Item = &Species<G>> {
        self.species.iter()
    }

    /// Returns the current generation number,
    /// starting from 1.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Returns the population's configuration.
    pub fn config(&self) -> &PopulationConfig {
        &self.population_config
    }

    /// Returns the genetic configuration genomes are
    /// created and mutated with.
    pub fn genetic_config(&self) -> &C {
        &self.genetic_config
    }
}

#[cfg(test)]
mod tests {
    use super::testing::Weights;
    use super::*;
    use std::num::NonZeroUsize;

    fn config(size: usize, stagnation_threshold: usize) -> PopulationConfig {
        PopulationConfig {
            size: NonZeroUsize::new(size).unwrap(),
            distance_threshold: 1.2,
            stagnation_threshold: NonZeroUsize::new(stagnation_threshold).unwrap(),
        }
    }

    /// A population whose individuals carry the given
    /// single-weight genomes and lifespans.
    fn population(genomes_and_lifespans: &[(f32, u64)], stagnation: usize) -> Population<f32, Weights> {
        let individuals = genomes_and_lifespans
            .iter()
            .map(|(w, lifespan)| {
                let mut individual = Individual::new(Weights(vec![*w]));
                for _ in 0..*lifespan {
                    individual.tick();
                }
                individual.kill();
                individual
            })
            .collect::<Vec<_>>();
        let size = individuals.len();
        Population::with_individuals(individuals, config(size, stagnation), 0.0)
    }

    #[test]
    fn first_fit_speciation() {
        // 1.0 and 2.0 are compatible, but 2.0 is only ever
        // measured against the representative 0.0.
        let mut population = population(&[(0.0, 1), (1.0, 1), (2.0, 1), (2.5, 1)], 8);
        population.calculate_fitness();
        population.speciate();
        let sizes: Vec<usize> = population.species().map(Species::len).collect();
        assert_eq!(sizes, [2, 2]);
    }

    #[test]
    fn identical_genomes_share_species() {
        let mut population = population(&[(0.3, 1); 6], 8);
        population.evolve().unwrap();
        assert_eq!(population.species().count(), 1);
        assert_eq!(population.species().next().unwrap().len(), 6);
    }

    #[test]
    fn extinct_species_removed() {
        let mut population = population(&[(0.0, 1), (5.0, 1)], 8);
        population.evolve().unwrap();
        assert_eq!(population.species().count(), 2);

        // Every individual now lands in the first species.
        population.individuals = (0..2)
            .map(|_| Individual::with_fitness(Weights(vec![0.0]), 1.0))
            .collect();
        population.evolve().unwrap();
        assert_eq!(population.species().count(), 1);
    }

    #[test]
    fn stale_species_culled() {
        let mut population = population(&[(0.0, 3), (5.0, 1)], 1);
        population.calculate_fitness();
        population.speciate();
        population.species.iter_mut().for_each(|s| {
            s.compute_average_fitness();
        });
        // Neither species improves.
        population.species[0].clear_members();
        population.species[0].add_member(Individual::with_fitness(Weights(vec![0.0]), 1.0));
        population.species[1].clear_members();
        population.species[1].add_member(Individual::with_fitness(Weights(vec![5.0]), 1.0));
        population.species.iter_mut().for_each(|s| {
            s.compute_average_fitness();
        });
        population.remove_stale_species();

        // Exactly one species survives, with its staleness reset.
        assert_eq!(population.species().count(), 1);
        assert_eq!(population.species[0].staleness(), 0);
    }

    #[test]
    fn fresh_species_survive_stale_ones() {
        let mut population = population(&[(0.0, 3), (5.0, 1)], 1);
        population.calculate_fitness();
        population.speciate();
        population.species.iter_mut().for_each(|s| {
            s.compute_average_fitness();
        });
        population.species[0].clear_members();
        population.species[0].add_member(Individual::with_fitness(Weights(vec![0.0]), 1.0));
        population.species[1].clear_members();
        population.species[1].add_member(Individual::with_fitness(Weights(vec![5.0]), 9.0));
        population.species.iter_mut().for_each(|s| {
            s.compute_average_fitness();
        });
        population.remove_stale_species();

        assert_eq!(population.species().count(), 1);
        assert_eq!(population.species[0].representative(), &Weights(vec![5.0]));
    }

    #[test]
    fn species_ranked_by_benchmark() {
        let mut population = population(&[(0.0, 2), (5.0, 9), (10.0, 4)], 8);
        population.evolve().unwrap();
        let benchmarks: Vec<f32> = population.species().map(Species::benchmark_fitness).collect();
        assert_eq!(benchmarks, [9.0, 4.0, 2.0]);
    }

    #[test]
    fn population_size_is_invariant() {
        for species_count in 1..=10 {
            let genomes: Vec<(f32, u64)> = (0..10)
                .map(|i| ((i % species_count) as f32 * 10.0, i as u64))
                .collect();
            let mut population = population(&genomes, 8);
            population.evolve().unwrap();
            assert_eq!(population.species().count(), species_count);
            assert_eq!(population.individuals().count(), 10);
            assert!(population.individuals().all(Individual::is_alive));
        }
    }

    #[test]
    fn single_species_refill() {
        let mut population = population(&[(0.0, 4); 10], 8);
        population.evolve().unwrap();
        assert_eq!(population.species().count(), 1);
        assert_eq!(population.individuals().count(), 10);
    }

    #[test]
    fn stagnation_collapse_refills_population() {
        let genomes: Vec<(f32, u64)> = (0..10).map(|i| ((i % 2) as f32 * 5.0, 3)).collect();
        let mut population = population(&genomes, 1);
        population.evolve().unwrap();
        assert_eq!(population.species().count(), 2);

        // No species improves on its benchmark, so all go stale at once.
        population.individuals_mut().for_each(|i| i.kill());
        population.evolve().unwrap();

        let staleness: Vec<usize> = population.species().map(Species::staleness).collect();
        assert_eq!(staleness, [0]);
        assert_eq!(population.individuals().count(), 10);
        assert!(population.individuals().all(Individual::is_alive));
    }

    #[test]
    fn best_ever_survives_generations() {
        let mut population = population(&[(0.0, 7), (0.5, 3)], 8);
        population.evolve().unwrap();
        assert_eq!(population.champion().unwrap(), (&Weights(vec![0.0]), 7.0));

        // A worse generation does not displace the record.
        population.individuals_mut().for_each(|i| i.kill());
        population.evolve().unwrap();
        assert_eq!(population.best_fitness(), 7.0);
        assert_eq!(population.generation(), 3);
    }

    #[test]
    fn step_live_skips_dead() {
        let mut population = population(&[(0.0, 0); 3], 8);
        population.individuals[1] = Individual::new(Weights(vec![0.0]));
        let mut steps = vec![0; 3];
        population.step_live(&mut steps, |individual, count| {
            *count += 1;
            individual.tick();
        });
        assert_eq!(steps, [0, 1, 0]);
        assert_eq!(population.alive_count(), 1);
        assert_eq!(population.best_fitness(), 1.0);
    }

    #[test]
    #[should_panic(expected = "one driver state per individual required")]
    fn step_live_state_mismatch() {
        let mut population = population(&[(0.0, 0); 3], 8);
        population.step_live(&mut [(); 2], |_, _| {});
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn par_step_live_matches_sequential() {
        let mut population = population(&[(0.0, 0); 4], 8);
        population
            .individuals_mut()
            .enumerate()
            .for_each(|(i, individual)| *individual = Individual::new(Weights(vec![i as f32])));
        let mut budgets = vec![1u64, 4, 2, 3];
        while !population.is_extinct() {
            population.par_step_live(&mut budgets, |individual, budget| {
                if *budget == 0 {
                    individual.kill();
                } else {
                    *budget -= 1;
                    individual.tick();
                }
            });
        }
        assert_eq!(population.champion().unwrap(), (&Weights(vec![1.0]), 4.0));
    }
}
