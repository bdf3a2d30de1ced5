use serde::{Deserialize, Serialize};

use std::num::NonZeroUsize;

/// Configuration data for population generation
/// and evolution.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PopulationConfig {
    /// Size of the population. Every generation
    /// holds exactly this many individuals.
    pub size: NonZeroUsize,
    /// Genetic distance threshold, at or beyond which
    /// genomes are considered as belonging to
    /// different species.
    pub distance_threshold: f32,
    /// Number of generations without a benchmark fitness
    /// increase after which a species is culled.
    pub stagnation_threshold: NonZeroUsize,
}

impl PopulationConfig {
    /// Returns a "zero-valued" default configuration.
    /// All values are 0, or in the case of
    /// `NonZeroUsize`s, 1.
    ///
    /// # Note
    /// This value is not suitable for use in most experiments.
    /// It is meant as a way to abbreviate configuration
    /// instantiation, or to fill in unused values.
    ///
    /// # Examples
    /// ```
    /// use fixneat::PopulationConfig;
    ///
    /// let cfg1 = PopulationConfig::zero();
    ///
    /// let cfg2 = PopulationConfig {
    ///     // Specify some values here...
    ///     distance_threshold: 0.5,
    ///     // Default the rest...
    ///     ..PopulationConfig::zero()
    /// };
    /// # assert_eq!(cfg1.size.get(), 1);
    /// # assert_eq!(cfg2.stagnation_threshold.get(), 1);
    /// ```
    pub const fn zero() -> PopulationConfig {
        PopulationConfig {
            size: NonZeroUsize::MIN,
            distance_threshold: 0.0,
            stagnation_threshold: NonZeroUsize::MIN,
        }
    }
}

impl Default for PopulationConfig {
    /// The standard settings: 50 individuals, a
    /// compatibility threshold of 1.2, and culling after
    /// 8 generations of stagnation.
    ///
    /// # Examples
    /// ```
    /// use fixneat::PopulationConfig;
    ///
    /// let config = PopulationConfig::default();
    /// assert_eq!(config.size.get(), 50);
    /// assert_eq!(config.distance_threshold, 1.2);
    /// assert_eq!(config.stagnation_threshold.get(), 8);
    /// ```
    fn default() -> PopulationConfig {
        PopulationConfig {
            size: non_zero(50),
            distance_threshold: 1.2,
            stagnation_threshold: non_zero(8),
        }
    }
}

const fn non_zero(n: usize) -> NonZeroUsize {
    match NonZeroUsize::new(n) {
        Some(n) => n,
        None => panic!("population parameter must be non-zero"),
    }
}
