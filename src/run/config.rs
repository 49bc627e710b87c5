use std::path::PathBuf;

use serde::Deserialize;

use crate::activation::activation::ActivationFunction;
use crate::classifier::dnn::DEFAULT_LEARNING_RATE;

/// Which terminal branch a run takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    /// Fit on the train split and write the weights file.
    Train,
    /// Load the weights file and classify the test split.
    Infer,
}

/// Everything a run needs. Also the YAML config file format; omitted keys
/// keep their defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    pub mode: RunMode,
    /// Rows of synthetic data to generate.
    pub rows: usize,
    pub feature_names: Vec<String>,
    pub hidden_widths: Vec<usize>,
    pub n_classes: usize,
    pub hidden_activation: ActivationFunction,
    pub test_fraction: f64,
    pub val_fraction: f64,
    pub batch_size: usize,
    pub weights_path: PathBuf,
    /// Overrides the classifier's default epoch count.
    pub epochs: Option<usize>,
    pub learning_rate: f64,
    /// Seeds every random draw of the run; entropy when absent.
    pub seed: Option<u64>,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            mode: RunMode::Infer,
            rows: 300,
            feature_names: (1..=5).map(|i| format!("c{i}")).collect(),
            hidden_widths: vec![10, 10],
            n_classes: 3,
            hidden_activation: ActivationFunction::Identity,
            test_fraction: 0.2,
            val_fraction: 0.2,
            batch_size: 32,
            weights_path: PathBuf::from("my_model.json"),
            epochs: None,
            learning_rate: DEFAULT_LEARNING_RATE,
            seed: None,
        }
    }
}

impl RunConfig {
    pub fn from_yaml_str(text: &str) -> Result<RunConfig, serde_yaml::Error> {
        serde_yaml::from_str(text)
    }
}
