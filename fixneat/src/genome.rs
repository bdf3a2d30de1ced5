/// An interface for genomes that can be evolved by a [`Population`].
///
/// Genomes have a fixed structure for their whole lifetime: the
/// population only ever clones and mutates them.
///
/// [`Population`]: crate::Population
pub trait Genome {
    type Config;

    /// Returns a randomized genome.
    fn new(config: &Self::Config) -> Self;

    /// Returns the genetic distance between two genomes.
    ///
    /// Must be 0 for genomes with identical parameters,
    /// and symmetric in its arguments.
    fn genetic_distance(first: &Self, second: &Self, config: &Self::Config) -> f32;

    /// Mutates the genome in place.
    fn mutate(&mut self, config: &Self::Config);
}
