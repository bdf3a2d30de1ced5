use serde::{Deserialize, Serialize};

use std::num::NonZeroUsize;

/// Configuration data for genome generation
/// and mutation.
///
/// # Note
/// All quantities expressing probabilities
/// should be in the range [0.0, 1.0]. Using
/// values that are not in this bound may result
/// in odd behaviours and/or incorrect programs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeneticConfig {
    /// Number of sensor inputs in a genome.
    /// A bias input is always added on top.
    pub input_count: NonZeroUsize,
    /// Maximum magnitude of a connection's weight.
    pub weight_bound: f32,
    /// Chance that a genome's weights are mutated at all
    /// when it is mutated.
    pub mutation_chance: f32,
    /// Chance of a weight being reset rather than nudged
    /// during mutation.
    pub weight_reset_chance: f32,
    /// Standard deviation of the normally distributed
    /// nudge applied to weights during mutation.
    /// It is assumed to be lesser than [`weight_bound`]
    ///
    /// [`weight_bound`]: GeneticConfig::weight_bound
    pub weight_mutation_power: f32,
}

impl GeneticConfig {
    /// Returns a "zero-valued" default configuration.
    /// All values are 0, or in the case of
    /// `NonZeroUsize`s, 1.
    ///
    /// # Note
    /// This value is not suitable for use in most experiments.
    /// It is meant as a way to fill in unused values during
    /// configuration instantiation.
    ///
    /// # Examples
    /// ```
    /// use fixneat_nn::genomics::GeneticConfig;
    ///
    /// let cfg1 = GeneticConfig::zero();
    ///
    /// let cfg2 = GeneticConfig {
    ///     // Specify some values here...
    ///     weight_bound: 2.0,
    ///     mutation_chance: 1.0,
    ///     // Default the rest...
    ///     ..GeneticConfig::zero()
    /// };
    /// # assert_eq!(cfg1.input_count.get(), 1);
    /// # assert_eq!(cfg2.weight_reset_chance, 0.0);
    /// ```
    pub const fn zero() -> GeneticConfig {
        GeneticConfig {
            input_count: NonZeroUsize::MIN,
            weight_bound: 0.0,
            mutation_chance: 0.0,
            weight_reset_chance: 0.0,
            weight_mutation_power: 0.0,
        }
    }
}

impl Default for GeneticConfig {
    /// The standard settings: 3 sensors, weights bounded
    /// to ±1, an 80% chance of mutation, and per weight
    /// a 10% chance of reset or else a nudge with
    /// standard deviation 1/50.
    fn default() -> GeneticConfig {
        GeneticConfig {
            input_count: non_zero(3),
            weight_bound: 1.0,
            mutation_chance: 0.8,
            weight_reset_chance: 0.1,
            weight_mutation_power: 1.0 / 50.0,
        }
    }
}

const fn non_zero(n: usize) -> NonZeroUsize {
    match NonZeroUsize::new(n) {
        Some(n) => n,
        None => panic!("genetic parameter must be non-zero"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = GeneticConfig::default();
        assert_eq!(config.input_count.get(), 3);
        assert_eq!(config.weight_bound, 1.0);
        assert_eq!(config.mutation_chance, 0.8);
        assert_eq!(config.weight_reset_chance, 0.1);
        assert_eq!(config.weight_mutation_power, 0.02);
    }

    #[test]
    fn serde_round_trip() {
        let config = GeneticConfig {
            input_count: NonZeroUsize::new(5).unwrap(),
            ..GeneticConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(serde_json::from_str::<GeneticConfig>(&json).unwrap(), config);
    }

    #[test]
    fn zero_inputs_rejected() {
        let json = r#"{"input_count":0,"weight_bound":1.0,"mutation_chance":0.8,
            "weight_reset_chance":0.1,"weight_mutation_power":0.02}"#;
        assert!(serde_json::from_str::<GeneticConfig>(json).is_err());
    }
}
