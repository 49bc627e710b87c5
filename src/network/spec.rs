use std::collections::HashSet;

use serde::{Serialize, Deserialize};

use crate::activation::activation::ActivationFunction;
use crate::error::{ClassifierError, Result};

/// Describes one dense layer.
///
/// - `size`       — number of neurons in this layer
/// - `input_size` — output size of the previous layer, or the feature count
///                  for the first layer
/// - `activation` — activation applied after the affine transform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSpec {
    pub size: usize,
    pub input_size: usize,
    pub activation: ActivationFunction,
}

/// Architecture of a tabular classifier: which columns it reads, the hidden
/// stack, and how many classes it scores.
///
/// Stored at the head of every weights file so a load can refuse weights
/// trained for a different architecture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSpec {
    /// Feature columns, in the order they are packed into the input vector.
    pub feature_names: Vec<String>,
    pub hidden_widths: Vec<usize>,
    pub n_classes: usize,
    pub hidden_activation: ActivationFunction,
}

impl NetworkSpec {
    pub fn new(
        feature_names: Vec<String>,
        hidden_widths: Vec<usize>,
        n_classes: usize,
        hidden_activation: ActivationFunction,
    ) -> Result<NetworkSpec> {
        if feature_names.is_empty() {
            return Err(ClassifierError::invalid("at least one feature column is required"));
        }
        let mut seen = HashSet::new();
        if let Some(dup) = feature_names.iter().find(|name| !seen.insert(name.as_str())) {
            return Err(ClassifierError::invalid(format!("duplicate feature column `{dup}`")));
        }
        if let Some(pos) = hidden_widths.iter().position(|&w| w == 0) {
            return Err(ClassifierError::invalid(format!("hidden layer {pos} has width 0")));
        }
        if n_classes < 2 {
            return Err(ClassifierError::invalid(format!(
                "n_classes must be at least 2, got {n_classes}"
            )));
        }
        if hidden_activation == ActivationFunction::Softmax {
            return Err(ClassifierError::invalid("softmax is reserved for the output layer"));
        }

        Ok(NetworkSpec { feature_names, hidden_widths, n_classes, hidden_activation })
    }

    /// Hidden layers in order, then the softmax output layer.
    pub fn layer_specs(&self) -> Vec<LayerSpec> {
        let mut specs = Vec::with_capacity(self.hidden_widths.len() + 1);
        let mut input_size = self.feature_names.len();
        for &size in &self.hidden_widths {
            specs.push(LayerSpec { size, input_size, activation: self.hidden_activation });
            input_size = size;
        }
        specs.push(LayerSpec {
            size: self.n_classes,
            input_size,
            activation: ActivationFunction::Softmax,
        });
        specs
    }
}
