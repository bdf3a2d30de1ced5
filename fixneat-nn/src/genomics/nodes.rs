use crate::NodeId;

/// Layer of the input and bias nodes.
pub const INPUT_LAYER: usize = 0;
/// Layer of the output node.
pub const OUTPUT_LAYER: usize = 1;

/// Nodes are the computation units of a genome.
/// They accumulate weighted input during an
/// evaluation, and hold their latest output.
///
/// Input-layer nodes output whatever value they
/// were assigned; output-layer nodes apply the
/// [sigmoid] function to their input sum.
///
/// [sigmoid]: https://en.wikipedia.org/wiki/Sigmoid_function
#[derive(Debug)]
pub struct Node {
    id: NodeId,
    layer: usize,
    input_sum: f32,
    output: f32,
}

impl Node {
    /// Returns a new node with no accumulated input.
    ///
    /// # Examples
    /// ```
    /// use fixneat_nn::genomics::{Node, OUTPUT_LAYER};
    ///
    /// let node = Node::new(4, OUTPUT_LAYER);
    /// assert_eq!(node.output(), 0.0);
    /// ```
    pub fn new(id: NodeId, layer: usize) -> Node {
        Node {
            id,
            layer,
            input_sum: 0.0,
            output: 0.0,
        }
    }

    /// Returns the node's ID.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Returns the node's layer.
    pub fn layer(&self) -> usize {
        self.layer
    }

    /// Returns the sum of the weighted inputs
    /// received since the last reset.
    pub fn input_sum(&self) -> f32 {
        self.input_sum
    }

    /// Returns the node's latest output.
    pub fn output(&self) -> f32 {
        self.output
    }

    pub(super) fn set_output(&mut self, output: f32) {
        self.output = output;
    }

    pub(super) fn add_input(&mut self, value: f32) {
        self.input_sum += value;
    }

    pub(super) fn reset_input(&mut self) {
        self.input_sum = 0.0;
    }

    /// Computes and returns the node's output. The
    /// caller propagates it along outgoing connections.
    pub(super) fn activate(&mut self) -> f32 {
        if self.layer == OUTPUT_LAYER {
            self.output = sigmoid(self.input_sum);
        }
        self.output
    }
}

impl Clone for Node {
    /// Clones the node's identity only; the
    /// evaluation state of the clone starts at 0.
    fn clone(&self) -> Node {
        Node::new(self.id, self.layer)
    }
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}
