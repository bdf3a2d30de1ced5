use super::*;

/// Auxiliary type for offspring generation.
/// Handles all the tasks of refilling a population
/// from its ranked species: carrying over each
/// species' champion, allotting an even share of
/// offspring to every species, and topping up from
/// the best species.
pub(super) struct OffspringFactory<'a, C, G> {
    species: &'a [Species<G>],
    genetic_config: &'a C,
    population_config: &'a PopulationConfig,
}

impl<'a, C, G> OffspringFactory<'a, C, G>
where
    G: Genome<Config = C> + Clone,
{
    /// `species` must be non-empty, with members and
    /// species already ranked by decreasing fitness.
    pub(super) fn new(
        species: &'a [Species<G>],
        genetic_config: &'a C,
        population_config: &'a PopulationConfig,
    ) -> OffspringFactory<'a, C, G> {
        OffspringFactory {
            species,
            genetic_config,
            population_config,
        }
    }

    /// Generate exactly [`size`] new individuals.
    ///
    /// [`size`]: PopulationConfig::size
    pub(super) fn generate_offspring(&self) -> Result<Vec<Individual<G>>, EvolutionError> {
        if self.species.is_empty() {
            return Err(EvolutionError::EmptyPopulation);
        }
        let size = self.population_config.size.get();
        let mut offspring = Vec::with_capacity(size);

        self.add_species_champions(&mut offspring)?;
        self.add_allotted_offspring(&mut offspring, self.allotted_offspring_per_species())?;
        self.top_up(&mut offspring, size)?;

        debug_assert_eq!(offspring.len(), size);
        Ok(offspring)
    }

    /// Number of offspring each species receives
    /// after its champion has been carried over.
    fn allotted_offspring_per_species(&self) -> usize {
        let species_count = self.species.len();
        self.population_config.size.get().saturating_sub(species_count) / species_count
    }

    /// Add an unmutated copy of each
    /// species' champion to the offspring.
    fn add_species_champions(
        &self,
        offspring: &mut Vec<Individual<G>>,
    ) -> Result<(), EvolutionError> {
        for species in self.species {
            let champion = species.champion().ok_or(EvolutionError::NoChampion)?;
            offspring.push(Individual::new(champion.genome().clone()));
        }
        Ok(())
    }

    fn add_allotted_offspring(
        &self,
        offspring: &mut Vec<Individual<G>>,
        allotted: usize,
    ) -> Result<(), EvolutionError> {
        for species in self.species {
            for _ in 0..allotted {
                offspring.push(species.produce_offspring(self.genetic_config)?);
            }
        }
        Ok(())
    }

    /// Fill the remaining slots, left over from
    /// rounding the allotment down, with offspring
    /// of the highest-ranked species.
    fn top_up(&self, offspring: &mut Vec<Individual<G>>, size: usize) -> Result<(), EvolutionError> {
        let best = &self.species[0];
        while offspring.len() < size {
            offspring.push(best.produce_offspring(self.genetic_config)?);
        }
        Ok(())
    }
}
