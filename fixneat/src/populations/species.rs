use super::{EvolutionError, Individual};
use crate::Genome;

use log::trace;
use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;

/// Species identifier. Specifies
/// the generation in which the species
/// was born, and the count of other species
/// born in the _same generation_ before
/// the one identified (i.e, if it was the
/// third species born in generation 5, it
/// will be species [5, 2]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SpeciesID(pub usize, pub usize);

/// Species are collections of mutually compatible
/// (within a certain [genetic distance]) individuals.
/// Membership is determined by calculating the
/// genetic distance to a _representative_, and is
/// rebuilt from scratch every generation.
///
/// The representative starts out as the genome of the
/// species' founder, and thereafter follows the best
/// genome the species has produced: it is refreshed
/// every time the members are cleared for a new
/// speciation pass.
///
/// Species go stale after every generation that does
/// not improve their benchmark (best ever) fitness,
/// and are culled by the population once
/// [`stagnation_threshold`] is reached.
///
/// [genetic distance]: crate::PopulationConfig::distance_threshold
/// [`stagnation_threshold`]: crate::PopulationConfig::stagnation_threshold
#[derive(Debug, Clone)]
pub struct Species<G> {
    id: SpeciesID,
    pub(super) members: Vec<Individual<G>>,
    representative: G,
    benchmark_genome: G,
    benchmark_fitness: f32,
    average_fitness: f32,
    staleness: usize,
}

impl<G: Genome + Clone> Species<G> {
    /// Creates a new species with the specified ID and
    /// founder. The founder's genome becomes the species
    /// representative, and the founder its first member.
    ///
    /// # Examples
    /// ```
    /// use fixneat::{Individual, Species, SpeciesID};
    /// use fixneat_nn::genomics::{GeneticConfig, NNGenome};
    ///
    /// let species = Species::new(
    ///     SpeciesID(1, 0),
    ///     Individual::new(NNGenome::new(&GeneticConfig::default())),
    /// );
    /// # assert_eq!(species.len(), 1);
    /// ```
    pub fn new(id: SpeciesID, founder: Individual<G>) -> Species<G> {
        let representative = founder.genome().clone();
        Species {
            id,
            members: vec![founder],
            benchmark_genome: representative.clone(),
            representative,
            benchmark_fitness: 0.0,
            average_fitness: 0.0,
            staleness: 0,
        }
    }

    /// Returns the species' ID.
    pub fn id(&self) -> SpeciesID {
        self.id
    }

    /// Returns the species' representative.
    pub fn representative(&self) -> &G {
        &self.representative
    }

    /// Returns the genetic distance between the species'
    /// representative and `other`.
    pub fn genetic_distance<C>(&self, other: &G, config: &C) -> f32
    where
        G: Genome<Config = C>,
    {
        G::genetic_distance(&self.representative, other, config)
    }

    /// Returns whether `genome` is close enough to the
    /// species' representative to join the species.
    ///
    /// # Examples
    /// ```
    /// use fixneat::{Individual, Species, SpeciesID};
    /// use fixneat_nn::genomics::{GeneticConfig, NNGenome};
    ///
    /// let config = GeneticConfig::default();
    /// let genome = NNGenome::new(&config);
    /// let species = Species::new(SpeciesID(1, 0), Individual::new(genome.clone()));
    ///
    /// // A genome is always compatible with an identical one.
    /// assert!(species.is_compatible(&genome, &config, 1.2));
    /// ```
    pub fn is_compatible<C>(&self, genome: &G, config: &C, distance_threshold: f32) -> bool
    where
        G: Genome<Config = C>,
    {
        let distance = self.genetic_distance(genome, config);
        distance == 0.0 || distance < distance_threshold
    }

    /// Adds an individual to the species.
    /// The representative is left untouched.
    pub fn add_member(&mut self, individual: Individual<G>) {
        self.members.push(individual);
    }

    /// Empties the species for a new speciation pass,
    /// adopting the benchmark genome as representative.
    pub(super) fn clear_members(&mut self) {
        self.members.clear();
        self.representative = self.benchmark_genome.clone();
    }

    /// Computes and returns the mean fitness of the species'
    /// members, updating the benchmark fitness and staleness
    /// along the way.
    ///
    /// If the best member beats the benchmark fitness, it
    /// becomes the new benchmark and staleness is reset.
    /// Otherwise, the species grows one generation staler.
    /// An empty species is left as-is.
    pub fn compute_average_fitness(&mut self) -> f32 {
        let best = match self.members.iter().max_by(|a, b| {
            a.fitness()
                .partial_cmp(&b.fitness())
                .unwrap_or_else(|| panic!("uncomparable fitness value detected"))
        }) {
            Some(best) => best,
            None => return 0.0,
        };

        if best.fitness() > self.benchmark_fitness {
            self.benchmark_fitness = best.fitness();
            self.benchmark_genome = best.genome().clone();
            self.staleness = 0;
        } else {
            self.staleness += 1;
        }

        self.average_fitness =
            self.members.iter().map(Individual::fitness).sum::<f32>() / self.members.len() as f32;
        trace!(
            "species {:?}: average fitness {}, benchmark {}, staleness {}",
            self.id,
            self.average_fitness,
            self.benchmark_fitness,
            self.staleness
        );
        self.average_fitness
    }

    /// Sorts the members by descending fitness, making
    /// the fittest member the species' [champion].
    ///
    /// [champion]: Species::champion
    pub fn rank_members(&mut self) {
        self.members.sort_by(|a, b| {
            b.fitness()
                .partial_cmp(&a.fitness())
                .unwrap_or_else(|| panic!("invalid individual fitnesses detected (NaN)"))
        });
    }

    /// Returns the species' champion: its first member
    /// after [ranking], or `None` if the species is empty.
    ///
    /// [ranking]: Species::rank_members
    pub fn champion(&self) -> Option<&Individual<G>> {
        self.members.first()
    }

    /// Produces a new, mutated individual from a parent chosen
    /// from the species' members with probability proportional
    /// to its fitness. If no member has any fitness, the parent
    /// is chosen uniformly.
    ///
    /// # Errors
    /// Returns an error if the species has no members.
    ///
    /// # Examples
    /// ```
    /// use fixneat::{Individual, Species, SpeciesID};
    /// use fixneat_nn::genomics::{GeneticConfig, NNGenome};
    ///
    /// let config = GeneticConfig::default();
    /// let species = Species::new(
    ///     SpeciesID(1, 0),
    ///     Individual::new(NNGenome::new(&config)),
    /// );
    ///
    /// let child = species.produce_offspring(&config).unwrap();
    /// assert!(child.is_alive());
    /// assert_eq!(child.lifespan(), 0);
    /// ```
    pub fn produce_offspring<C>(&self, config: &C) -> Result<Individual<G>, EvolutionError>
    where
        G: Genome<Config = C>,
    {
        let mut rng = rand::thread_rng();
        let parent = match WeightedIndex::new(self.members.iter().map(Individual::fitness)) {
            Ok(fitness_weights) => &self.members[fitness_weights.sample(&mut rng)],
            Err(_) => self
                .members
                .choose(&mut rng)
                .ok_or(EvolutionError::EmptySpecies(self.id))?,
        };
        let mut child = parent.genome().clone();
        child.mutate(config);
        Ok(Individual::new(child))
    }

    /// Returns the best fitness the species has ever achieved.
    pub fn benchmark_fitness(&self) -> f32 {
        self.benchmark_fitness
    }

    /// Returns the mean member fitness, as of the last
    /// call to [`compute_average_fitness`].
    ///
    /// [`compute_average_fitness`]: Species::compute_average_fitness
    pub fn average_fitness(&self) -> f32 {
        self.average_fitness
    }

    /// Returns the number of generations since the species'
    /// benchmark fitness last improved.
    pub fn staleness(&self) -> usize {
        self.staleness
    }

    pub(super) fn reset_staleness(&mut self) {
        self.staleness = 0;
    }

    /// Returns an iterator over the species' members.
    pub fn members(&self) -> impl Iterator<Item = &Individual<G>> {
        self.members.iter()
    }

    /// Returns the number of members in the species.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns whether the species has no members left.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
