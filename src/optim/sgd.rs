use crate::{math::matrix::Matrix, layers::dense::Layer};

/// Plain stochastic gradient descent.
#[derive(Debug, Clone)]
pub struct Sgd {
    pub learning_rate: f64,
}

impl Sgd {
    pub fn new(learning_rate: f64) -> Sgd {
        Sgd { learning_rate }
    }

    /// Applies one SGD weight update to a layer given its averaged gradients.
    pub fn step(&self, layer: &mut Layer, weights_grad: &Matrix, biases_grad: &Matrix) {
        let lr = self.learning_rate;
        layer.weights = layer.weights.clone() - weights_grad.map(|g| g * lr);
        layer.biases = layer.biases.clone() - biases_grad.map(|g| g * lr);
    }
}
