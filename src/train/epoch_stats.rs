/// Per-epoch training statistics returned by `train_loop`.
#[derive(Debug, Clone, PartialEq)]
pub struct EpochStats {
    /// 1-based epoch number.
    pub epoch: usize,
    pub total_epochs: usize,
    /// Mean loss over the training examples seen during the epoch.
    pub train_loss: f64,
    /// Fraction of training examples whose argmax matched the label, in [0, 1].
    pub train_accuracy: f64,
    pub val_loss: Option<f64>,
    pub val_accuracy: Option<f64>,
    /// Wall-clock duration of the epoch, validation included.
    pub elapsed_ms: u64,
}
