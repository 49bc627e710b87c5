use serde::{Serialize, Deserialize};

/// Selects which loss the training loop minimizes.
///
/// Only categorical cross-entropy is offered: the output layer is always
/// Softmax and the backward pass relies on the combined softmax + CE gradient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LossType {
    #[serde(rename = "categorical_crossentropy")]
    CrossEntropy,
}

impl LossType {
    pub fn name(&self) -> &'static str {
        match self {
            LossType::CrossEntropy => "categorical_crossentropy",
        }
    }
}
