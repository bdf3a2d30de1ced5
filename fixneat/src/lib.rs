//! Generational neuroevolution of small fixed-topology genomes.
//!
//! This is a pared-down relative of NEAT: genomes never gain or lose
//! structure and never mate. Each generation, individuals are grouped
//! into species by weight similarity, stagnant species are pruned, the
//! champion of every species is carried over unchanged, and the rest of
//! the population is refilled with mutated clones of fit parents.
//!
//! The engine is driven from the outside. A driver runs episodes,
//! advancing each live [`Individual`] one tick at a time and killing it
//! on failure; once [`Population::is_extinct`] reports that every
//! individual is dead, the driver calls [`Population::evolve`] to breed
//! the next generation. The genome representation is left to implementors
//! of the [`Genome`] trait; a neural network genome is supplied by the
//! `fixneat-nn` crate.
//!
//! # Example usage: evolving a constant-output controller with `fixneat-nn`
//! ```
//! use fixneat::{Population, PopulationConfig};
//! use fixneat_nn::genomics::{GeneticConfig, NNGenome};
//! use std::num::NonZeroUsize;
//!
//! let genetic_config = GeneticConfig {
//!     input_count: NonZeroUsize::new(3).unwrap(),
//!     ..GeneticConfig::default()
//! };
//! let population_config = PopulationConfig {
//!     size: NonZeroUsize::new(30).unwrap(),
//!     ..PopulationConfig::default()
//! };
//!
//! let mut population = Population::<_, NNGenome>::new(population_config, genetic_config);
//! let mut bodies = vec![(); 30];
//! for _ in 0..5 {
//!     // Individuals survive for as long as their decision stays low.
//!     while !population.is_extinct() {
//!         population.step_live(&mut bodies, |individual, _| {
//!             let decision = individual.genome_mut().evaluate(&[0.5, 1.0, 0.5]);
//!             if decision > 0.5 || individual.lifespan() >= 100 {
//!                 individual.kill();
//!             } else {
//!                 individual.tick();
//!             }
//!         });
//!     }
//!     population.evolve().unwrap();
//! }
//!
//! assert_eq!(population.individuals().count(), 30);
//! assert_eq!(population.generation(), 6);
//! ```

mod genome;
mod populations;

pub use genome::*;
pub use populations::*;
