use crate::genomics::{GeneticConfig, Node};
use crate::NodeId;

use rand::{thread_rng, Rng};
use rand_distr::StandardNormal;

/// Connections are directed, weighted
/// edges between two nodes of a genome.
#[derive(Debug, PartialEq)]
pub struct Connection {
    from: NodeId,
    to: NodeId,
    weight: f32,
    enabled: bool,
}

impl Connection {
    /// Returns a new _enabled_ connection.
    ///
    /// # Examples
    /// ```
    /// use fixneat_nn::genomics::Connection;
    ///
    /// let connection = Connection::new(0, 4, 0.5);
    /// assert!(connection.is_enabled());
    /// ```
    pub fn new(from: NodeId, to: NodeId, weight: f32) -> Connection {
        Connection {
            from,
            to,
            weight,
            enabled: true,
        }
    }

    /// Returns a random weight, uniformly
    /// distributed over ±[`weight_bound`].
    ///
    /// [`weight_bound`]: GeneticConfig::weight_bound
    pub(super) fn random_weight(config: &GeneticConfig) -> f32 {
        thread_rng().gen_range(-config.weight_bound..=config.weight_bound)
    }

    /// Mutates the connection's weight. With probability
    /// [`weight_reset_chance`] the weight is replaced with
    /// a fresh random one; otherwise it is nudged by
    /// normally distributed noise scaled by
    /// [`weight_mutation_power`], and clamped into
    /// ±[`weight_bound`].
    ///
    /// [`weight_reset_chance`]: GeneticConfig::weight_reset_chance
    /// [`weight_mutation_power`]: GeneticConfig::weight_mutation_power
    /// [`weight_bound`]: GeneticConfig::weight_bound
    ///
    /// # Examples
    /// ```
    /// use fixneat_nn::genomics::{Connection, GeneticConfig};
    ///
    /// let config = GeneticConfig::default();
    /// let mut connection = Connection::new(0, 4, 0.99);
    /// for _ in 0..1000 {
    ///     connection.mutate_weight(&config);
    /// }
    /// assert!(connection.weight().abs() <= config.weight_bound);
    /// ```
    pub fn mutate_weight(&mut self, config: &GeneticConfig) {
        let mut rng = thread_rng();
        if rng.gen::<f32>() < config.weight_reset_chance {
            self.weight = Self::random_weight(config);
        } else {
            let noise: f32 = rng.sample(StandardNormal);
            self.weight = (self.weight + noise * config.weight_mutation_power)
                .clamp(-config.weight_bound, config.weight_bound);
        }
    }

    /// Returns a copy of the connection running between
    /// `from` and `to`, with the same weight and status.
    pub fn clone_between(&self, from: &Node, to: &Node) -> Connection {
        Connection {
            from: from.id(),
            to: to.id(),
            weight: self.weight,
            enabled: self.enabled,
        }
    }

    /// Returns the ID of the connection's source node.
    pub fn from(&self) -> NodeId {
        self.from
    }

    /// Returns the ID of the connection's destination node.
    pub fn to(&self) -> NodeId {
        self.to
    }

    /// Returns the connection's weight.
    pub fn weight(&self) -> f32 {
        self.weight
    }

    pub(super) fn set_weight(&mut self, weight: f32) {
        self.weight = weight;
    }

    /// Returns whether the connection carries
    /// signal during evaluation.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[cfg(test)]
    pub(super) fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
}
