use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::{layers::dense::Layer, math::matrix::Matrix, network::spec::LayerSpec};

/// Ordered stack of dense layers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Network {
    pub layers: Vec<Layer>,
}

impl Network {
    pub fn new<R: Rng + ?Sized>(layer_specs: &[LayerSpec], rng: &mut R) -> Network {
        let layers = layer_specs.iter()
            .map(|spec| Layer::new(spec.size, spec.input_size, spec.activation, rng))
            .collect();
        Network { layers }
    }

    /// Forward pass for one example; caches activations in each layer for backprop.
    pub fn forward(&mut self, input: &[f64]) -> Vec<f64> {
        let mut current = Matrix::row(input.to_vec());
        for layer in &mut self.layers {
            current = layer.feed_from(&current);
        }
        current.into_row()
    }

    /// Backward pass for the example most recently passed to `forward`.
    ///
    /// `output_delta` is dL/dz of the output layer. Gradients are added into
    /// `acc`, one (weights, biases) pair per layer.
    pub fn backward(&self, input: &[f64], output_delta: Vec<f64>, acc: &mut [(Matrix, Matrix)]) {
        let mut delta = Matrix::row(output_delta);

        for i in (0..self.layers.len()).rev() {
            let input_for_layer = if i == 0 {
                Matrix::row(input.to_vec())
            } else {
                self.layers[i - 1].neurons.clone()
            };

            let (w_grad, b_grad) = self.layers[i].compute_gradients(&delta, &input_for_layer);

            if i > 0 {
                // Propagate through W to get dL/da of the previous layer.
                delta = &b_grad * &self.layers[i].weights.transpose();
            }

            let (w_acc, b_acc) = &mut acc[i];
            *w_acc = w_acc.clone() + w_grad;
            *b_acc = b_acc.clone() + b_grad;
        }
    }

    /// Zeroed gradient storage shaped like this network's parameters.
    pub fn zero_gradients(&self) -> Vec<(Matrix, Matrix)> {
        self.layers.iter()
            .map(|layer| (
                Matrix::zeros(layer.weights.rows, layer.weights.cols),
                Matrix::zeros(layer.biases.rows, layer.biases.cols),
            ))
            .collect()
    }

    /// Architecture actually held by the layers, for comparison with a `NetworkSpec`.
    pub fn layer_specs(&self) -> Vec<LayerSpec> {
        self.layers.iter()
            .map(|l| LayerSpec { size: l.size, input_size: l.input_size, activation: l.activator })
            .collect()
    }

    pub fn parameter_count(&self) -> usize {
        self.layers.iter().map(Layer::parameter_count).sum()
    }
}
