use crate::loss::loss_type::LossType;

/// Hyperparameters for one `train_loop` run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainConfig {
    /// Full passes over the training feeder.
    pub epochs: usize,
    pub loss_type: LossType,
}

impl TrainConfig {
    pub fn new(epochs: usize, loss_type: LossType) -> Self {
        TrainConfig { epochs, loss_type }
    }
}
