use std::path::Path;

use rand::Rng;
use tracing::info;

use crate::activation::activation::ActivationFunction;
use crate::classifier::features::FeatureLayout;
use crate::classifier::weights::SavedModel;
use crate::data::batch::BatchFeeder;
use crate::error::{ClassifierError, Result};
use crate::loss::loss_type::LossType;
use crate::network::{Network, NetworkSpec};
use crate::optim::optimizer::{Optimizer, OptimizerKind};
use crate::train::{evaluate, train_loop, EpochStats, TrainConfig};

/// Learning rate used when a classifier is compiled without an explicit one.
pub const DEFAULT_LEARNING_RATE: f64 = 0.001;

/// A feed-forward classifier over named numeric feature columns.
///
/// Lifecycle: `build` (random weights) -> `compile` (pick optimizer and loss)
/// -> `fit` or `load_weights` -> `predict`.
#[derive(Debug)]
pub struct DnnClassifier {
    spec: NetworkSpec,
    layout: FeatureLayout,
    network: Network,
    compiled: Option<Compiled>,
}

#[derive(Debug)]
struct Compiled {
    optimizer: Optimizer,
    loss: LossType,
}

impl DnnClassifier {
    /// Builds the network: `feature_names.len()` inputs, one dense layer per
    /// entry of `hidden_widths`, then a softmax layer of `n_classes`.
    pub fn build<R: Rng + ?Sized>(
        feature_names: Vec<String>,
        hidden_widths: Vec<usize>,
        n_classes: usize,
        hidden_activation: ActivationFunction,
        rng: &mut R,
    ) -> Result<DnnClassifier> {
        let spec = NetworkSpec::new(feature_names, hidden_widths, n_classes, hidden_activation)?;
        Ok(DnnClassifier::from_spec(spec, rng))
    }

    pub fn from_spec<R: Rng + ?Sized>(spec: NetworkSpec, rng: &mut R) -> DnnClassifier {
        let network = Network::new(&spec.layer_specs(), rng);
        info!(
            features = spec.feature_names.len(),
            hidden = ?spec.hidden_widths,
            classes = spec.n_classes,
            parameters = network.parameter_count(),
            "built classifier"
        );
        DnnClassifier {
            layout: FeatureLayout::new(spec.feature_names.clone()),
            spec,
            network,
            compiled: None,
        }
    }

    pub fn default_optimizer(&self) -> OptimizerKind {
        OptimizerKind::Adam
    }

    pub fn default_loss(&self) -> LossType {
        LossType::CrossEntropy
    }

    pub fn default_training_epochs(&self) -> usize {
        5
    }

    /// Class index of the most probable class.
    pub fn reduce_prediction(&self, distribution: &[f64]) -> usize {
        reduce_prediction(distribution)
    }

    pub fn reduce_predictions(&self, distributions: &[Vec<f64>]) -> Vec<usize> {
        distributions.iter().map(|d| reduce_prediction(d)).collect()
    }

    /// Attaches a freshly initialized optimizer and the loss used by `fit`.
    /// Compiling again resets optimizer state.
    pub fn compile(&mut self, optimizer: OptimizerKind, loss: LossType, learning_rate: f64) -> Result<()> {
        if !(learning_rate > 0.0 && learning_rate.is_finite()) {
            return Err(ClassifierError::invalid(format!(
                "learning rate must be positive, got {learning_rate}"
            )));
        }
        info!(optimizer = optimizer.name(), loss = loss.name(), learning_rate, "compiled classifier");
        self.compiled = Some(Compiled { optimizer: optimizer.build(learning_rate), loss });
        Ok(())
    }

    /// Trains on `train` for `epochs` epochs, scoring `val` after each one.
    pub fn fit<R: Rng + ?Sized>(
        &mut self,
        train: &BatchFeeder<'_>,
        val: Option<&BatchFeeder<'_>>,
        epochs: usize,
        rng: &mut R,
    ) -> Result<Vec<EpochStats>> {
        let compiled = self.compiled.as_mut().ok_or_else(|| {
            ClassifierError::invalid("classifier must be compiled before fit")
        })?;
        let config = TrainConfig::new(epochs, compiled.loss);
        train_loop(
            &mut self.network,
            &mut compiled.optimizer,
            &self.layout,
            self.spec.n_classes,
            train,
            val,
            &config,
            rng,
        )
    }

    /// One probability distribution per row, in batch order.
    pub fn predict<R: Rng + ?Sized>(&mut self, feeder: &BatchFeeder<'_>, rng: &mut R) -> Result<Vec<Vec<f64>>> {
        let mut out = Vec::with_capacity(feeder.len());
        for batch in feeder.batches(rng) {
            for input in self.layout.assemble(&batch)? {
                out.push(self.network.forward(&input));
            }
        }
        Ok(out)
    }

    /// Mean loss and accuracy over `feeder`, using the compiled loss
    /// (categorical cross-entropy when not compiled).
    pub fn evaluate<R: Rng + ?Sized>(&mut self, feeder: &BatchFeeder<'_>, rng: &mut R) -> Result<(f64, f64)> {
        let loss = self.compiled.as_ref().map_or(self.default_loss(), |c| c.loss);
        let tally = evaluate(&mut self.network, &self.layout, self.spec.n_classes, feeder, loss, rng)?;
        Ok((tally.mean_loss(), tally.accuracy()))
    }

    pub fn save_weights<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        SavedModel::from_parts(&self.spec, &self.network).save_json(path)?;
        info!(path = %path.display(), "saved weights");
        Ok(())
    }

    /// Replaces the current weights with those stored at `path`. The file
    /// must describe exactly this classifier's architecture.
    pub fn load_weights<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        let saved = SavedModel::load_json(path)?;
        self.network = saved.into_network(&self.spec)?;
        info!(path = %path.display(), "loaded weights");
        Ok(())
    }
}

/// Argmax; ties go to the lowest index. An empty slice maps to class 0.
pub fn reduce_prediction(distribution: &[f64]) -> usize {
    let mut best = 0;
    for (i, &p) in distribution.iter().enumerate().skip(1) {
        if p > distribution[best] {
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::batch::make_batches;
    use crate::data::dataset::Dataset;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn names() -> Vec<String> {
        (1..=5).map(|i| format!("c{i}")).collect()
    }

    fn classifier(seed: u64) -> DnnClassifier {
        DnnClassifier::build(names(), vec![10, 10], 3, ActivationFunction::Identity, &mut StdRng::seed_from_u64(seed))
            .unwrap()
    }

    #[test]
    fn reduce_prediction_takes_first_maximum() {
        assert_eq!(reduce_prediction(&[0.1, 0.7, 0.2]), 1);
        assert_eq!(reduce_prediction(&[0.5, 0.5, 0.0]), 0);
        assert_eq!(reduce_prediction(&[0.2, 0.4, 0.4]), 1);
        assert_eq!(reduce_prediction(&[]), 0);
    }

    #[test]
    fn defaults_match_the_compile_contract() {
        let clf = classifier(0);
        assert_eq!(clf.default_optimizer().name(), "adam");
        assert_eq!(clf.default_loss().name(), "categorical_crossentropy");
        assert_eq!(clf.default_training_epochs(), 5);
    }

    #[test]
    fn predictions_are_distributions() {
        let mut rng = StdRng::seed_from_u64(3);
        let ds = Dataset::synthetic(40, &names(), 3, &mut rng);
        let feeder = make_batches(&ds, false, 16).unwrap();
        let mut clf = classifier(1);

        let preds = clf.predict(&feeder, &mut rng).unwrap();
        assert_eq!(preds.len(), 40);
        for p in &preds {
            assert_eq!(p.len(), 3);
            assert!(p.iter().all(|&x| x >= 0.0));
            assert!((p.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        }
        assert!(clf.reduce_predictions(&preds).iter().all(|&c| c < 3));
    }

    #[test]
    fn evaluate_agrees_with_final_validation_stats() {
        let mut rng = StdRng::seed_from_u64(6);
        let ds = Dataset::synthetic(50, &names(), 3, &mut rng);
        let train = make_batches(&ds, true, 16).unwrap();
        let val = make_batches(&ds, false, 16).unwrap();
        let mut clf = classifier(5);
        clf.compile(clf.default_optimizer(), clf.default_loss(), DEFAULT_LEARNING_RATE).unwrap();

        let history = clf.fit(&train, Some(&val), 3, &mut rng).unwrap();
        let last = history.last().unwrap();
        let (loss, accuracy) = clf.evaluate(&val, &mut rng).unwrap();

        assert!(loss > 0.0);
        assert!((0.0..=1.0).contains(&accuracy));
        assert_eq!(Some(loss), last.val_loss);
        assert_eq!(Some(accuracy), last.val_accuracy);
    }

    #[test]
    fn fit_requires_compile() {
        let mut rng = StdRng::seed_from_u64(3);
        let ds = Dataset::synthetic(10, &names(), 3, &mut rng);
        let feeder = make_batches(&ds, true, 4).unwrap();
        let mut clf = classifier(2);
        assert!(matches!(clf.fit(&feeder, None, 1, &mut rng), Err(ClassifierError::InvalidArgument(_))));

        clf.compile(clf.default_optimizer(), clf.default_loss(), DEFAULT_LEARNING_RATE).unwrap();
        let epochs = clf.default_training_epochs();
        assert_eq!(clf.fit(&feeder, Some(&feeder), epochs, &mut rng).unwrap().len(), 5);
    }

    #[test]
    fn wrong_columns_are_a_shape_mismatch() {
        let mut rng = StdRng::seed_from_u64(3);
        let other: Vec<String> = vec!["x".into(), "y".into()];
        let ds = Dataset::synthetic(4, &other, 3, &mut rng);
        let feeder = make_batches(&ds, false, 4).unwrap();
        let mut clf = classifier(4);
        assert!(matches!(clf.predict(&feeder, &mut rng), Err(ClassifierError::ShapeMismatch { .. })));
    }

    #[test]
    fn build_rejects_single_class() {
        let res = DnnClassifier::build(names(), vec![4], 1, ActivationFunction::Identity, &mut StdRng::seed_from_u64(0));
        assert!(matches!(res, Err(ClassifierError::InvalidArgument(_))));
    }
}
