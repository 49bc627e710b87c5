use std::time::Instant;

use rand::Rng;
use tracing::{debug, info};

use crate::classifier::dnn::reduce_prediction;
use crate::classifier::features::FeatureLayout;
use crate::data::batch::{Batch, BatchFeeder};
use crate::error::{ClassifierError, Result};
use crate::loss::cross_entropy::{one_hot, CrossEntropyLoss};
use crate::loss::loss_type::LossType;
use crate::network::network::Network;
use crate::optim::optimizer::Optimizer;
use crate::train::epoch_stats::EpochStats;
use crate::train::train_config::TrainConfig;

// ---------------------------------------------------------------------------
// Public entry points
// ---------------------------------------------------------------------------

/// Trains `network` for `config.epochs` epochs of mini-batch updates and
/// returns the statistics of every epoch.
///
/// Each batch from `train` is packed through `layout`, gradients are
/// accumulated per example, averaged over the batch and applied with one
/// optimizer step. `val`, when given, is scored after every epoch without
/// touching the weights.
#[allow(clippy::too_many_arguments)]
pub fn train_loop<R: Rng + ?Sized>(
    network: &mut Network,
    optimizer: &mut Optimizer,
    layout: &FeatureLayout,
    n_classes: usize,
    train: &BatchFeeder<'_>,
    val: Option<&BatchFeeder<'_>>,
    config: &TrainConfig,
    rng: &mut R,
) -> Result<Vec<EpochStats>> {
    if train.is_empty() {
        return Err(ClassifierError::invalid("training set is empty"));
    }

    let mut history = Vec::with_capacity(config.epochs);

    for epoch in 1..=config.epochs {
        let t_start = Instant::now();

        let train_tally = run_one_epoch(network, optimizer, layout, n_classes, train, config.loss_type, rng)?;

        let val_tally = match val {
            Some(feeder) if !feeder.is_empty() => {
                Some(evaluate(network, layout, n_classes, feeder, config.loss_type, rng)?)
            }
            _ => None,
        };

        let stats = EpochStats {
            epoch,
            total_epochs: config.epochs,
            train_loss: train_tally.mean_loss(),
            train_accuracy: train_tally.accuracy(),
            val_loss: val_tally.map(|t| t.mean_loss()),
            val_accuracy: val_tally.map(|t| t.accuracy()),
            elapsed_ms: t_start.elapsed().as_millis() as u64,
        };

        info!(
            epoch,
            total = config.epochs,
            loss = stats.train_loss,
            accuracy = stats.train_accuracy,
            val_loss = ?stats.val_loss,
            val_accuracy = ?stats.val_accuracy,
            elapsed_ms = stats.elapsed_ms,
            "epoch finished"
        );
        history.push(stats);
    }

    Ok(history)
}

/// Running loss and accuracy over a set of examples.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Tally {
    pub examples: usize,
    pub loss_sum: f64,
    pub correct: usize,
}

impl Tally {
    fn record(&mut self, loss: f64, hit: bool) {
        self.examples += 1;
        self.loss_sum += loss;
        if hit {
            self.correct += 1;
        }
    }

    pub fn mean_loss(&self) -> f64 {
        if self.examples == 0 {
            0.0
        } else {
            self.loss_sum / self.examples as f64
        }
    }

    pub fn accuracy(&self) -> f64 {
        if self.examples == 0 {
            0.0
        } else {
            self.correct as f64 / self.examples as f64
        }
    }
}

/// Scores every batch of `feeder` without gradient accumulation.
pub fn evaluate<R: Rng + ?Sized>(
    network: &mut Network,
    layout: &FeatureLayout,
    n_classes: usize,
    feeder: &BatchFeeder<'_>,
    loss_type: LossType,
    rng: &mut R,
) -> Result<Tally> {
    let mut tally = Tally::default();
    for batch in feeder.batches(rng) {
        let inputs = pack(layout, &batch, n_classes)?;
        for (input, &label) in inputs.iter().zip(&batch.labels) {
            let output = network.forward(input);
            let expected = one_hot(label, n_classes);
            tally.record(compute_loss(&output, &expected, loss_type), reduce_prediction(&output) == label);
        }
    }
    Ok(tally)
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn run_one_epoch<R: Rng + ?Sized>(
    network: &mut Network,
    optimizer: &mut Optimizer,
    layout: &FeatureLayout,
    n_classes: usize,
    feeder: &BatchFeeder<'_>,
    loss_type: LossType,
    rng: &mut R,
) -> Result<Tally> {
    let mut tally = Tally::default();

    for (batch_idx, batch) in feeder.batches(rng).enumerate() {
        let inputs = pack(layout, &batch, n_classes)?;
        let mut acc_grads = network.zero_gradients();

        for (input, &label) in inputs.iter().zip(&batch.labels) {
            let output = network.forward(input);
            let expected = one_hot(label, n_classes);

            tally.record(compute_loss(&output, &expected, loss_type), reduce_prediction(&output) == label);

            let error = compute_loss_derivative(&output, &expected, loss_type);
            network.backward(input, error, &mut acc_grads);
        }

        let inv_batch = 1.0 / batch.len() as f64;
        let averaged: Vec<_> = acc_grads.into_iter()
            .map(|(w, b)| (w.map(|x| x * inv_batch), b.map(|x| x * inv_batch)))
            .collect();
        optimizer.step(&mut network.layers, &averaged);

        debug!(batch = batch_idx, size = batch.len(), running_loss = tally.mean_loss(), "applied batch");
    }

    Ok(tally)
}

/// Dense inputs for a batch, after checking every label fits the output layer.
fn pack(layout: &FeatureLayout, batch: &Batch, n_classes: usize) -> Result<Vec<Vec<f64>>> {
    if let Some(&bad) = batch.labels.iter().find(|&&l| l >= n_classes) {
        return Err(ClassifierError::invalid(format!(
            "label {bad} is out of range for {n_classes} classes"
        )));
    }
    layout.assemble(batch)
}

fn compute_loss(predicted: &[f64], expected: &[f64], loss_type: LossType) -> f64 {
    match loss_type {
        LossType::CrossEntropy => CrossEntropyLoss::loss(predicted, expected),
    }
}

fn compute_loss_derivative(predicted: &[f64], expected: &[f64], loss_type: LossType) -> Vec<f64> {
    match loss_type {
        LossType::CrossEntropy => CrossEntropyLoss::derivative(predicted, expected),
    }
}
