pub mod error;
pub mod logging;
pub mod math;
pub mod activation;
pub mod layers;
pub mod network;
pub mod loss;
pub mod optim;
pub mod train;
pub mod data;
pub mod classifier;
pub mod run;

// Convenience re-exports
pub use error::{ClassifierError, Result};
pub use math::matrix::Matrix;
pub use activation::activation::ActivationFunction;
pub use layers::dense::Layer;
pub use network::{Network, NetworkSpec};
pub use loss::LossType;
pub use optim::{Optimizer, OptimizerKind};
pub use train::{train_loop, EpochStats, TrainConfig};
pub use data::{make_batches, partition, split, Batch, BatchFeeder, Dataset, PartitionCounts, Row, TARGET};
pub use classifier::{reduce_prediction, DnnClassifier};
pub use run::{run, Outcome, RunConfig, RunMode, RunReport};
