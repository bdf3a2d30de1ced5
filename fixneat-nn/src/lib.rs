//! # fixneat-nn
//! A fixed-topology neural network implementation of the
//! [`fixneat`] crate's `Genome` trait.
//!
//! An [`NNGenome`] is a two-layer network: one input node per sensor
//! plus a bias node, all wired directly into a single sigmoid output.
//! Evolution only ever touches the connection weights, which can be
//! saved to and loaded from a plain one-weight-per-line text format.
//!
//! [`NNGenome`]: crate::genomics::NNGenome
//!
//! # Example usage: training a controller that answers "high" on bright input
//! ```
//! use fixneat::{Population, PopulationConfig};
//! use fixneat_nn::genomics::{GeneticConfig, NNGenome};
//! use std::num::NonZeroUsize;
//!
//! let genetic_config = GeneticConfig {
//!     input_count: NonZeroUsize::new(1).unwrap(),
//!     ..GeneticConfig::default()
//! };
//! let population_config = PopulationConfig {
//!     size: NonZeroUsize::new(40).unwrap(),
//!     ..PopulationConfig::default()
//! };
//!
//! let mut population = Population::<_, NNGenome>::new(population_config, genetic_config);
//! let mut inputs = vec![0.0f32; 40];
//! for _ in 0..10 {
//!     // Individuals live for as long as they keep answering correctly.
//!     while !population.is_extinct() {
//!         population.step_live(&mut inputs, |individual, input| {
//!             *input = if individual.lifespan() % 2 == 0 { 1.0 } else { 0.0 };
//!             let answer = individual.genome_mut().evaluate(&[*input]) > 0.5;
//!             if answer != (*input > 0.5) || individual.lifespan() >= 50 {
//!                 individual.kill();
//!             } else {
//!                 individual.tick();
//!             }
//!         });
//!     }
//!     if let Err(e) = population.evolve() {
//!         eprintln!("{}", e);
//!         break;
//!     }
//! }
//!
//! let (champion, fitness) = population.champion().unwrap();
//! println!("best lifespan {}: {}", fitness, champion);
//! ```

pub mod genomics;

/// Identifier type of the nodes in a genome.
pub type NodeId = usize;
