use rand::Rng;
use tracing::{info, warn};

use crate::classifier::dnn::DnnClassifier;
use crate::data::batch::make_batches;
use crate::data::dataset::Dataset;
use crate::data::split::{partition, PartitionCounts};
use crate::error::Result;
use crate::run::config::{RunConfig, RunMode};
use crate::train::EpochStats;

/// What a finished run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub counts: PartitionCounts,
    pub outcome: Outcome,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Weights were written to the configured path.
    Trained { history: Vec<EpochStats> },
    /// One class index per test row, in test order.
    Predicted { classes: Vec<usize> },
}

/// Partitions `dataset`, builds and compiles the classifier, then trains or
/// infers according to `config.mode`.
pub fn run<R: Rng + ?Sized>(config: &RunConfig, dataset: &Dataset, rng: &mut R) -> Result<RunReport> {
    let parts = partition(dataset, config.test_fraction, config.val_fraction, rng)?;
    let counts = parts.counts();

    let mut model = DnnClassifier::build(
        config.feature_names.clone(),
        config.hidden_widths.clone(),
        config.n_classes,
        config.hidden_activation,
        rng,
    )?;
    model.compile(model.default_optimizer(), model.default_loss(), config.learning_rate)?;

    let outcome = match config.mode {
        RunMode::Train => {
            let train = make_batches(&parts.train, true, config.batch_size)?;
            let val = make_batches(&parts.val, false, config.batch_size)?;
            let epochs = config.epochs.unwrap_or_else(|| model.default_training_epochs());

            let history = model.fit(&train, Some(&val), epochs, rng)?;
            model.save_weights(&config.weights_path)?;
            info!(epochs, path = %config.weights_path.display(), "training done");
            Outcome::Trained { history }
        }
        RunMode::Infer => {
            let test = make_batches(&parts.test, false, config.batch_size)?;

            // Runs on the fresh random weights; only a failure here matters.
            let discarded = model.predict(&test, rng)?;
            warn!(rows = discarded.len(), "discarding predictions made before loading weights");

            model.load_weights(&config.weights_path)?;
            let predictions = model.predict(&test, rng)?;
            let classes = model.reduce_predictions(&predictions);
            info!(rows = classes.len(), "inference done");
            Outcome::Predicted { classes }
        }
    };

    Ok(RunReport { counts, outcome })
}
