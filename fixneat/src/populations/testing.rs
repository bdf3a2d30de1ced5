//! A minimal genome for exercising the population machinery.

use crate::Genome;

/// A bare weight vector. Its configuration is the amount
/// added to every weight on mutation, and the value every
/// weight of a new genome starts at.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Weights(pub Vec<f32>);

impl Genome for Weights {
    type Config = f32;

    fn new(config: &f32) -> Weights {
        Weights(vec![*config; 3])
    }

    fn genetic_distance(first: &Weights, second: &Weights, _: &f32) -> f32 {
        first
            .0
            .iter()
            .zip(&second.0)
            .map(|(a, b)| (a - b).abs())
            .sum()
    }

    fn mutate(&mut self, config: &f32) {
        for w in &mut self.0 {
            *w += config;
        }
    }
}
