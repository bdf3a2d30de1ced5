/// A member of the population: a genome together with
/// the state of its current episode.
///
/// The driver advances live individuals with [`tick`] and
/// ends their episode with [`kill`]. Fitness is derived from
/// the number of ticks survived when the generation ends.
///
/// [`tick`]: Individual::tick
/// [`kill`]: Individual::kill
#[derive(Clone, Debug)]
pub struct Individual<G> {
    genome: G,
    lifespan: u64,
    fitness: f32,
    alive: bool,
}

impl<G> Individual<G> {
    /// Returns a live individual with no
    /// accumulated lifespan.
    ///
    /// # Examples
    /// ```
    /// use fixneat::Individual;
    ///
    /// let individual = Individual::new("genome");
    ///
    /// assert!(individual.is_alive());
    /// assert_eq!(individual.lifespan(), 0);
    /// assert_eq!(individual.fitness(), 0.0);
    /// ```
    pub fn new(genome: G) -> Individual<G> {
        Individual {
            genome,
            lifespan: 0,
            fitness: 0.0,
            alive: true,
        }
    }

    /// Returns the individual's genome.
    pub fn genome(&self) -> &G {
        &self.genome
    }

    /// Returns a mutable reference to the individual's genome,
    /// e.g. for evaluation of genomes which keep scratch state.
    pub fn genome_mut(&mut self) -> &mut G {
        &mut self.genome
    }

    /// Consumes the individual, returning its genome.
    pub fn into_genome(self) -> G {
        self.genome
    }

    /// Records one more tick survived.
    ///
    /// # Examples
    /// ```
    /// use fixneat::Individual;
    ///
    /// let mut individual = Individual::new(());
    /// individual.tick();
    /// individual.tick();
    ///
    /// assert_eq!(individual.lifespan(), 2);
    /// ```
    pub fn tick(&mut self) {
        self.lifespan += 1;
    }

    /// Ends the individual's episode.
    ///
    /// # Examples
    /// ```
    /// use fixneat::Individual;
    ///
    /// let mut individual = Individual::new(());
    /// individual.kill();
    ///
    /// assert!(!individual.is_alive());
    /// ```
    pub fn kill(&mut self) {
        self.alive = false;
    }

    /// Returns whether the individual's episode is still running.
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Returns the number of ticks survived.
    pub fn lifespan(&self) -> u64 {
        self.lifespan
    }

    /// Returns the individual's fitness, as of
    /// the last fitness assignment.
    pub fn fitness(&self) -> f32 {
        self.fitness
    }

    /// Assigns the individual's fitness from its lifespan.
    pub(super) fn calculate_fitness(&mut self) {
        self.fitness = self.lifespan as f32;
    }

    #[cfg(test)]
    pub(super) fn with_fitness(genome: G, fitness: f32) -> Individual<G> {
        Individual {
            genome,
            lifespan: fitness as u64,
            fitness,
            alive: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fitness_follows_lifespan() {
        let mut individual = Individual::new(0u8);
        for _ in 0..42 {
            individual.tick();
        }
        assert_eq!(individual.fitness(), 0.0);
        individual.calculate_fitness();
        assert_eq!(individual.fitness(), 42.0);
    }

    #[test]
    fn dead_individuals_keep_lifespan() {
        let mut individual = Individual::new(0u8);
        individual.tick();
        individual.kill();
        assert!(!individual.is_alive());
        assert_eq!(individual.lifespan(), 1);
    }
}
