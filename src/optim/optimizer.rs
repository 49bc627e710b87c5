use serde::{Serialize, Deserialize};

use crate::{layers::dense::Layer, math::matrix::Matrix};
use crate::optim::{adam::Adam, sgd::Sgd};

/// Optimizer selected by name when a classifier is compiled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimizerKind {
    Sgd,
    Adam,
}

impl OptimizerKind {
    pub fn name(&self) -> &'static str {
        match self {
            OptimizerKind::Sgd => "sgd",
            OptimizerKind::Adam => "adam",
        }
    }

    /// Instantiates the optimizer with fresh state.
    pub fn build(self, learning_rate: f64) -> Optimizer {
        match self {
            OptimizerKind::Sgd => Optimizer::Sgd(Sgd::new(learning_rate)),
            OptimizerKind::Adam => Optimizer::Adam(Adam::new(learning_rate)),
        }
    }
}

/// A stateful optimizer applying one averaged mini-batch gradient to every layer.
#[derive(Debug, Clone)]
pub enum Optimizer {
    Sgd(Sgd),
    Adam(Adam),
}

impl Optimizer {
    /// `grads` holds one (weights_grad, biases_grad) pair per layer, in layer order.
    pub fn step(&mut self, layers: &mut [Layer], grads: &[(Matrix, Matrix)]) {
        match self {
            Optimizer::Sgd(sgd) => {
                for (layer, (w, b)) in layers.iter_mut().zip(grads) {
                    sgd.step(layer, w, b);
                }
            }
            Optimizer::Adam(adam) => {
                adam.begin_step();
                for (i, (layer, (w, b))) in layers.iter_mut().zip(grads).enumerate() {
                    adam.step(i, layer, w, b);
                }
            }
        }
    }
}
