//! Genomes are the focus of evolution. Here they are
//! small fixed-topology networks: a layer of sensor and
//! bias nodes, fully connected to a single output node.
//! Only connection weights are ever mutated.

mod config;
mod connection;
mod errors;
mod nodes;
mod persistence;

pub use config::GeneticConfig;
pub use connection::Connection;
pub use errors::WeightLoadError;
pub use nodes::{Node, INPUT_LAYER, OUTPUT_LAYER};

use crate::NodeId;

use rand::{thread_rng, Rng};

use std::fmt;

/// A fixed-topology network genome.
///
/// Nodes `0..input_count` are sensors, node `input_count`
/// is the bias, and node `input_count + 1` is the output.
/// Every sensor and the bias are connected to the output,
/// in that order.
#[derive(Debug)]
pub struct NNGenome {
    input_count: usize,
    layers: usize,
    nodes: Vec<Node>,
    connections: Vec<Connection>,
    /// Node indices in evaluation order.
    net: Vec<usize>,
    /// Per node index: (connection index, destination node index).
    outgoing: Vec<Vec<(usize, usize)>>,
}

impl NNGenome {
    /// Creates a new genome with uniformly random
    /// weights in ±[`weight_bound`].
    ///
    /// [`weight_bound`]: GeneticConfig::weight_bound
    ///
    /// # Examples
    /// ```
    /// use fixneat_nn::genomics::{GeneticConfig, NNGenome};
    ///
    /// let genome = NNGenome::new(&GeneticConfig::default());
    ///
    /// // 3 sensors, 1 bias, 1 output.
    /// assert_eq!(genome.nodes().count(), 5);
    /// assert_eq!(genome.connections().count(), 4);
    /// ```
    pub fn new(config: &GeneticConfig) -> NNGenome {
        let input_count = config.input_count.get();
        let bias = input_count;
        let output = input_count + 1;

        let mut nodes: Vec<Node> = (0..=bias).map(|id| Node::new(id, INPUT_LAYER)).collect();
        nodes.push(Node::new(output, OUTPUT_LAYER));
        let connections = (0..=bias)
            .map(|id| Connection::new(id, output, Connection::random_weight(config)))
            .collect();

        let mut genome = NNGenome {
            input_count,
            layers: 2,
            nodes,
            connections,
            net: vec![],
            outgoing: vec![],
        };
        genome.generate_net();
        genome
    }

    /// Rebuilds each node's outgoing connection
    /// list from the genome's connections.
    fn connect_nodes(&mut self) {
        let mut outgoing = vec![vec![]; self.nodes.len()];
        for (i, connection) in self.connections.iter().enumerate() {
            if let (Some(from), Some(to)) =
                (self.find_node(connection.from()), self.find_node(connection.to()))
            {
                outgoing[from].push((i, to));
            }
        }
        self.outgoing = outgoing;
    }

    /// Rebuilds the node adjacency and the evaluation order:
    /// every node, grouped by ascending layer and otherwise
    /// in genome order.
    pub fn generate_net(&mut self) {
        self.connect_nodes();
        self.net = (0..self.layers)
            .flat_map(|layer| {
                self.nodes
                    .iter()
                    .enumerate()
                    .filter(move |(_, node)| node.layer() == layer)
                    .map(|(i, _)| i)
            })
            .collect();
    }

    /// Feeds `sensors` forward through the network,
    /// returning the output node's value, in [0, 1].
    ///
    /// # Panics
    /// Panics if the number of sensor values
    /// does not match the genome's input count.
    ///
    /// # Examples
    /// ```
    /// use fixneat_nn::genomics::{GeneticConfig, NNGenome};
    ///
    /// let mut genome = NNGenome::new(&GeneticConfig::default());
    /// genome.set_weights(&[0.0; 4]).unwrap();
    ///
    /// assert_eq!(genome.evaluate(&[0.5, 1.0, 0.5]), 0.5);
    /// ```
    pub fn evaluate(&mut self, sensors: &[f32]) -> f32 {
        assert_eq!(
            sensors.len(),
            self.input_count,
            "expected {} sensor values, got {}",
            self.input_count,
            sensors.len()
        );
        let (bias, output_node) = (self.bias_index(), self.output_index());
        for (node, value) in self.nodes.iter_mut().zip(sensors) {
            node.set_output(*value);
        }
        self.nodes[bias].set_output(1.0);

        for &i in &self.net {
            let output = self.nodes[i].activate();
            for &(c, to) in &self.outgoing[i] {
                let connection = &self.connections[c];
                if connection.is_enabled() {
                    self.nodes[to].add_input(connection.weight() * output);
                }
            }
        }

        for node in &mut self.nodes {
            node.reset_input();
        }
        self.nodes[output_node].output()
    }

    /// Mutates every connection weight, with probability
    /// [`mutation_chance`]. Otherwise the genome is left as-is.
    ///
    /// [`mutation_chance`]: GeneticConfig::mutation_chance
    pub fn mutate(&mut self, config: &GeneticConfig) {
        if thread_rng().gen::<f32>() < config.mutation_chance {
            for connection in &mut self.connections {
                connection.mutate_weight(config);
            }
        }
    }

    /// Returns the index of the node with the specified ID.
    pub fn find_node(&self, id: NodeId) -> Option<usize> {
        self.nodes.iter().position(|node| node.id() == id)
    }

    /// Returns the genetic distance between two genomes:
    /// the sum of the absolute differences of their weights,
    /// matched by connection order. Genomes with different
    /// connection counts are infinitely distant.
    ///
    /// # Examples
    /// ```
    /// use fixneat_nn::genomics::{GeneticConfig, NNGenome};
    ///
    /// let config = GeneticConfig::default();
    /// let mut a = NNGenome::new(&config);
    /// let mut b = NNGenome::new(&config);
    /// a.set_weights(&[0.5, 0.0, 0.0, -1.0]).unwrap();
    /// b.set_weights(&[0.0, 0.0, 0.25, 1.0]).unwrap();
    ///
    /// assert_eq!(NNGenome::genetic_distance(&a, &b), 2.75);
    /// ```
    pub fn genetic_distance(first: &NNGenome, second: &NNGenome) -> f32 {
        if first.connections.len() != second.connections.len() {
            return f32::INFINITY;
        }
        first
            .weights()
            .zip(second.weights())
            .map(|(a, b)| (a - b).abs())
            .sum()
    }

    /// Returns the number of sensor inputs.
    pub fn input_count(&self) -> usize {
        self.input_count
    }

    /// Returns an iterator over the genome's nodes.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// Returns an iterator over the genome's connections.
    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.connections.iter()
    }

    /// Returns the IDs of the genome's nodes in evaluation order.
    pub fn net(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.net.iter().map(move |&i| self.nodes[i].id())
    }

    /// Returns the connection weights, in connection order.
    pub fn weights(&self) -> impl Iterator<Item = f32> + '_ {
        self.connections.iter().map(Connection::weight)
    }

    /// Overwrites the connection weights, in connection order.
    /// Weights are taken as-is, without clamping.
    ///
    /// # Errors
    /// Returns [`ShapeMismatch`] and leaves the genome untouched
    /// if `weights` does not hold one value per connection.
    ///
    /// [`ShapeMismatch`]: WeightLoadError::ShapeMismatch
    pub fn set_weights(&mut self, weights: &[f32]) -> Result<(), WeightLoadError> {
        if weights.len() != self.connections.len() {
            return Err(WeightLoadError::ShapeMismatch {
                expected: self.connections.len(),
                found: weights.len(),
            });
        }
        for (connection, weight) in self.connections.iter_mut().zip(weights) {
            connection.set_weight(*weight);
        }
        Ok(())
    }

    fn bias_index(&self) -> usize {
        self.input_count
    }

    fn output_index(&self) -> usize {
        self.input_count + 1
    }
}

impl Clone for NNGenome {
    /// Deep-copies the genome. Node evaluation state is
    /// not carried over, and every cloned connection runs
    /// between the clone's own nodes.
    fn clone(&self) -> NNGenome {
        let mut clone = NNGenome {
            input_count: self.input_count,
            layers: self.layers,
            nodes: self.nodes.clone(),
            connections: Vec::with_capacity(self.connections.len()),
            net: vec![],
            outgoing: vec![],
        };
        for connection in &self.connections {
            if let (Some(from), Some(to)) =
                (clone.find_node(connection.from()), clone.find_node(connection.to()))
            {
                let copy = connection.clone_between(&clone.nodes[from], &clone.nodes[to]);
                clone.connections.push(copy);
            }
        }
        clone.generate_net();
        clone
    }
}

impl fmt::Display for NNGenome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NNGenome {{ inputs: {}, weights: [", self.input_count)?;
        for (i, weight) in self.weights().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{:.4}", weight)?;
        }
        write!(f, "] }}")
    }
}

impl fixneat::Genome for NNGenome {
    type Config = GeneticConfig;

    fn new(config: &GeneticConfig) -> NNGenome {
        NNGenome::new(config)
    }

    fn genetic_distance(first: &NNGenome, second: &NNGenome, _: &GeneticConfig) -> f32 {
        NNGenome::genetic_distance(first, second)
    }

    fn mutate(&mut self, config: &GeneticConfig) {
        NNGenome::mutate(self, config)
    }
}
