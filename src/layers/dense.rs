use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::{math::matrix::Matrix, activation::activation::ActivationFunction};

/// Fully connected layer computing `a = f(x W + b)` for a `1 x input_size` row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layer {
    pub size: usize,
    pub input_size: usize,
    pub weights: Matrix,
    pub biases: Matrix,
    pub activator: ActivationFunction,
    // Cached by the last forward pass for backprop; never persisted.
    #[serde(skip)]
    pub(crate) neurons: Matrix,
    #[serde(skip)]
    pre_neurons: Matrix,
}

impl Layer {
    pub fn new<R: Rng + ?Sized>(
        size: usize,
        input_size: usize,
        activation: ActivationFunction,
        rng: &mut R,
    ) -> Layer {
        let weights = if activation.prefers_he_init() {
            Matrix::he(input_size, size, rng)
        } else {
            Matrix::xavier(input_size, size, rng)
        };

        Layer {
            size,
            input_size,
            weights,
            biases: Matrix::zeros(1, size),
            activator: activation,
            neurons: Matrix::zeros(1, size),
            pre_neurons: Matrix::zeros(1, size),
        }
    }

    pub fn feed_from(&mut self, input: &Matrix) -> Matrix {
        let z = &(input * &self.weights) + &self.biases;
        let a = self.activator.apply(&z);
        self.pre_neurons = z;
        self.neurons = a.clone();
        a
    }

    /// Computes gradient adjustments. Returns (weights_grad, biases_grad).
    /// `next_layer_delta` is dL/da for this layer.
    pub fn compute_gradients(&self, next_layer_delta: &Matrix, inputs: &Matrix) -> (Matrix, Matrix) {
        let act_derivative = self.pre_neurons.map(|x| self.activator.derivative(x));
        let layer_delta = next_layer_delta.hadamard(&act_derivative);
        let weights_grad = &inputs.transpose() * &layer_delta;
        (weights_grad, layer_delta)
    }

    /// Clears activations cached by the last forward pass.
    pub(crate) fn reset_cache(&mut self) {
        self.neurons = Matrix::zeros(1, self.size);
        self.pre_neurons = Matrix::zeros(1, self.size);
    }

    pub fn parameter_count(&self) -> usize {
        self.weights.rows * self.weights.cols + self.biases.cols
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn forward_produces_layer_width() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut layer = Layer::new(4, 3, ActivationFunction::ReLU, &mut rng);
        let out = layer.feed_from(&Matrix::row(vec![0.1, 0.2, 0.3]));
        assert_eq!((out.rows, out.cols), (1, 4));
        assert!(out.data[0].iter().all(|&x| x >= 0.0));
    }

    #[test]
    fn identity_gradient_is_outer_product() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut layer = Layer::new(2, 2, ActivationFunction::Identity, &mut rng);
        let x = Matrix::row(vec![1.0, 2.0]);
        layer.feed_from(&x);
        let (w_grad, b_grad) = layer.compute_gradients(&Matrix::row(vec![0.5, -1.0]), &x);
        assert_eq!(w_grad.data, vec![vec![0.5, -1.0], vec![1.0, -2.0]]);
        assert_eq!(b_grad.data, vec![vec![0.5, -1.0]]);
    }
}
