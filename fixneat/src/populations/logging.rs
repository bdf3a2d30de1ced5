use super::{Individual, Population, SpeciesID};

use crate::Genome;

use std::fmt;

/// Defines different possible reporting levels for logging.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportingLevel {
    /// Clones the entire last generation.
    AllGenomes,
    /// Clones species and their champions.
    SpeciesChampions,
    /// Clones only the best-ever genome.
    PopulationChampion,
    /// Clones no genomes.
    NoGenomes,
}

/// A snapshot of a population, taken
/// after a generational turnover.
#[derive(Clone, Debug)]
pub struct Log<G> {
    pub generation_number: usize,
    pub generation_sample: GenerationMemberRecord<G>,
    pub species_count: usize,
    pub best_fitness: f32,
    pub genome_stats: Vec<(String, Stats)>,
}

impl<G> fmt::Display for Log<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Log {{")?;
        writeln!(f, "\tgeneration_number: {}", self.generation_number)?;
        writeln!(f, "\tspecies_count: {}", self.species_count)?;
        writeln!(f, "\tbest_fitness: {}", self.best_fitness)?;
        for (name, stats) in &self.genome_stats {
            writeln!(f, "\t{}: {}", name, stats)?;
        }
        write!(f, "}}")
    }
}

/// A struct for reporting basic statistical data.
#[derive(Clone, Debug, PartialEq)]
pub struct Stats {
    pub maximum: f32,
    pub minimum: f32,
    pub mean: f32,
    pub median: f32,
}

impl Stats {
    /// Returns statistics about numbers in a sequence,
    /// or `None` if the sequence is empty.
    ///
    /// # Panics
    /// Panics if the data contains NaN.
    ///
    /// # Examples
    /// ```
    /// use fixneat::logging::Stats;
    ///
    /// let stats = Stats::from([-2.0, -1.0, 0.5, 1.0, 1.5].iter().copied()).unwrap();
    /// assert_eq!(stats.maximum, 1.5);
    /// assert_eq!(stats.minimum, -2.0);
    /// assert_eq!(stats.mean, 0.0);
    /// assert_eq!(stats.median, 0.5);
    ///
    /// assert!(Stats::from(std::iter::empty()).is_none());
    /// ```
    pub fn from(data: impl Iterator<Item = f32>) -> Option<Stats> {
        let mut data: Vec<f32> = data.collect();
        if data.is_empty() {
            return None;
        }
        data.sort_by(|a, b| {
            a.partial_cmp(b)
                .unwrap_or_else(|| panic!("NaN in statistics data"))
        });

        let mid = data.len() / 2;
        let median = if data.len() % 2 == 0 {
            (data[mid - 1] + data[mid]) / 2.0
        } else {
            data[mid]
        };
        Some(Stats {
            maximum: data[data.len() - 1],
            minimum: data[0],
            mean: data.iter().sum::<f32>() / data.len() as f32,
            median,
        })
    }
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "max {:.3}, min {:.3}, mean {:.3}, median {:.3}",
            self.maximum, self.minimum, self.mean, self.median
        )
    }
}

/// A reporting-level dependant store
/// of genomes from a population.
#[derive(Clone, Debug)]
pub enum GenerationMemberRecord<G> {
    /// Species IDs, member genomes and staleness.
    Species(Vec<(SpeciesID, Vec<G>, usize)>),
    /// Only species IDs, species champions, and staleness.
    SpeciesChampions(Vec<(SpeciesID, G, usize)>),
    /// Only the best-ever genome, if any was recorded.
    PopulationChampion(Option<G>),
    /// Empty.
    None,
}

/// A log of the evolution of a population over time.
#[derive(Clone, Debug)]
pub struct EvolutionLogger<G> {
    reporting_level: ReportingLevel,
    logs: Vec<Log<G>>,
}

impl<G: Genome + Clone> EvolutionLogger<G> {
    /// Returns a logger with the appropiate reporting level.
    ///
    /// # Examples
    /// ```
    /// # use fixneat_nn::genomics::NNGenome as G;
    /// use fixneat::logging::{EvolutionLogger, ReportingLevel};
    ///
    /// // With `G` a suitable type implementing `Genome`...
    /// let logger = EvolutionLogger::<G>::new(ReportingLevel::NoGenomes);
    /// # assert_eq!(logger.iter().count(), 0);
    /// ```
    pub fn new(reporting_level: ReportingLevel) -> EvolutionLogger<G> {
        EvolutionLogger {
            reporting_level,
            logs: vec![],
        }
    }

    /// Store a snapshot of a population, meant to be
    /// taken right after [`evolve`].
    ///
    /// Statistics are computed over the members of the
    /// population's species, that is, the generation
    /// that was just evaluated. The `stat_extractor`
    /// provides a way of obtaining arbitrary statistics
    /// on those individuals, where each statistic is
    /// named by `stat_names`.
    ///
    /// [`evolve`]: Population::evolve
    ///
    /// # Examples
    /// ```
    /// # use fixneat_nn::genomics::{GeneticConfig, NNGenome as G};
    /// use fixneat::{Population, PopulationConfig};
    /// use fixneat::logging::{EvolutionLogger, ReportingLevel};
    ///
    /// // With `G` a suitable type implementing `Genome`...
    /// let mut logger = EvolutionLogger::<G>::new(ReportingLevel::NoGenomes);
    /// # let genetic_config = GeneticConfig::default();
    /// let mut population = Population::new(PopulationConfig::default(), genetic_config);
    ///
    /// // Run a generation and evolve the population...
    /// population.individuals_mut().for_each(|i| i.kill());
    /// population.evolve().unwrap();
    /// // Then log a snapshot.
    /// logger.log(&population, &|i| [i.fitness()], ["fitness"]);
    /// # assert_eq!(logger.iter().next().unwrap().generation_number, 1);
    /// ```
    pub fn log<C, F, const N: usize>(
        &mut self,
        population: &Population<C, G>,
        stat_extractor: &F,
        stat_names: [&str; N],
    ) where
        G: Genome<Config = C>,
        F: Fn(&Individual<G>) -> [f32; N],
    {
        let stats = population
            .species()
            .flat_map(|s| s.members())
            .map(stat_extractor);
        let genome_stats = stat_names
            .iter()
            .map(|name| name.to_string())
            .zip(unzip_n_vecs(stats))
            .filter_map(|(name, data)| Some((name, Stats::from(data.into_iter())?)))
            .collect();

        self.logs.push(Log {
            // Snapshots follow `evolve`, which has already
            // advanced the generation counter.
            generation_number: population.generation().saturating_sub(1),
            generation_sample: self.sample(population),
            species_count: population.species().count(),
            best_fitness: population.best_fitness(),
            genome_stats,
        })
    }

    fn sample<C>(&self, population: &Population<C, G>) -> GenerationMemberRecord<G>
    where
        G: Genome<Config = C>,
    {
        match self.reporting_level {
            ReportingLevel::AllGenomes => GenerationMemberRecord::Species(
                population
                    .species()
                    .map(|s| {
                        let genomes = s.members().map(|i| i.genome().clone()).collect();
                        (s.id(), genomes, s.staleness())
                    })
                    .collect(),
            ),
            ReportingLevel::SpeciesChampions => GenerationMemberRecord::SpeciesChampions(
                population
                    .species()
                    .filter_map(|s| Some((s.id(), s.champion()?.genome().clone(), s.staleness())))
                    .collect(),
            ),
            ReportingLevel::PopulationChampion => GenerationMemberRecord::PopulationChampion(
                population.champion().ok().map(|(g, _)| g.clone()),
            ),
            ReportingLevel::NoGenomes => GenerationMemberRecord::None,
        }
    }

    /// Iterate over all logged snapshots.
    ///
    /// # Examples
    /// ```
    /// # use fixneat_nn::genomics::NNGenome as G;
    /// use fixneat::logging::{EvolutionLogger, ReportingLevel};
    ///
    /// // With `G` a suitable type implementing `Genome`...
    /// let logger = EvolutionLogger::<G>::new(ReportingLevel::AllGenomes);
    /// // Log some stuff... then
    /// for log in logger.iter() {
    ///     println!("{}", log);
    /// }
    /// ```
    pub fn iter(&self) -> impl Iterator<Item = &Log<G>> {
        self.logs.iter()
    }
}

fn unzip_n_vecs<T, const N: usize>(iter: impl Iterator<Item = [T; N]>) -> Vec<Vec<T>> {
    let mut vecs: Vec<Vec<T>> = (0..N).map(|_| Vec::new()).collect();
    for items in iter {
        for (vec, item) in vecs.iter_mut().zip(items) {
            vec.push(item);
        }
    }
    vecs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::populations::testing::Weights;
    use crate::PopulationConfig;
    use std::num::NonZeroUsize;

    fn evolved_population() -> Population<f32, Weights> {
        let config = PopulationConfig {
            size: NonZeroUsize::new(4).unwrap(),
            ..PopulationConfig::default()
        };
        let mut population = Population::new(config, 0.0);
        let mut budgets = vec![2u64, 6, 4, 0];
        while !population.is_extinct() {
            population.step_live(&mut budgets, |individual, budget| {
                if *budget == 0 {
                    individual.kill();
                } else {
                    *budget -= 1;
                    individual.tick();
                }
            });
        }
        population.evolve().unwrap();
        population
    }

    #[test]
    fn median_of_even_length() {
        let stats = Stats::from([4.0, 1.0, 3.0, 2.0].iter().copied()).unwrap();
        assert_eq!(stats.median, 2.5);
        assert_eq!(stats.mean, 2.5);
        assert_eq!(stats.minimum, 1.0);
        assert_eq!(stats.maximum, 4.0);
    }

    #[test]
    fn single_value_stats() {
        let stats = Stats::from(std::iter::once(7.0)).unwrap();
        assert_eq!(
            stats,
            Stats {
                maximum: 7.0,
                minimum: 7.0,
                mean: 7.0,
                median: 7.0
            }
        );
    }

    #[test]
    fn unzip_columns() {
        let columns = unzip_n_vecs(vec![[1, 2], [3, 4], [5, 6]].into_iter());
        assert_eq!(columns, vec![vec![1, 3, 5], vec![2, 4, 6]]);
    }

    #[test]
    fn logs_lifespan_stats() {
        let population = evolved_population();
        let mut logger = EvolutionLogger::new(ReportingLevel::PopulationChampion);
        logger.log(
            &population,
            &|i| [i.fitness(), i.lifespan() as f32 * 2.0],
            ["fitness", "double lifespan"],
        );

        let log = logger.iter().next().unwrap();
        assert_eq!(log.generation_number, 1);
        assert_eq!(log.species_count, 1);
        assert_eq!(log.best_fitness, 6.0);
        assert_eq!(log.genome_stats[0].0, "fitness");
        assert_eq!(log.genome_stats[0].1.maximum, 6.0);
        assert_eq!(log.genome_stats[0].1.mean, 3.0);
        assert_eq!(log.genome_stats[1].1.maximum, 12.0);
        assert!(matches!(
            log.generation_sample,
            GenerationMemberRecord::PopulationChampion(Some(_))
        ));
    }

    #[test]
    fn species_champion_sample() {
        let population = evolved_population();
        let mut logger = EvolutionLogger::new(ReportingLevel::SpeciesChampions);
        logger.log(&population, &|i| [i.fitness()], ["fitness"]);
        match &logger.iter().next().unwrap().generation_sample {
            GenerationMemberRecord::SpeciesChampions(champions) => {
                assert_eq!(champions.len(), 1);
                assert_eq!(champions[0].0, SpeciesID(1, 0));
            }
            other => panic!("unexpected sample {:?}", other),
        };
    }

    #[test]
    fn display_lists_stats() {
        let population = evolved_population();
        let mut logger = EvolutionLogger::new(ReportingLevel::NoGenomes);
        logger.log(&population, &|i| [i.fitness()], ["fitness"]);
        let text = logger.iter().next().unwrap().to_string();
        assert!(text.contains("generation_number: 1"));
        assert!(text.contains("fitness: max 6.000"));
    }
}
