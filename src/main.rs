use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use tabular_dnn::{logging, run, Dataset, Outcome, RunConfig, RunMode};

/// Trains a small feed-forward classifier on synthetic tabular data, or
/// loads its weights and classifies the held-out test rows.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// YAML run configuration; flags below override its values.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    #[arg(long, value_enum)]
    mode: Option<RunMode>,
    /// Weights file written by train and read by infer.
    #[arg(long, value_name = "PATH")]
    weights: Option<PathBuf>,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long, value_name = "INT")]
    epochs: Option<usize>,
    #[arg(long, value_name = "INT")]
    rows: Option<usize>,
    #[arg(long, value_name = "INT")]
    batch_size: Option<usize>,
}

impl Cli {
    fn into_config(self) -> anyhow::Result<RunConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("reading config {}", path.display()))?;
                RunConfig::from_yaml_str(&text)
                    .with_context(|| format!("parsing config {}", path.display()))?
            }
            None => RunConfig::default(),
        };

        if let Some(mode) = self.mode {
            config.mode = mode;
        }
        if let Some(weights) = self.weights {
            config.weights_path = weights;
        }
        if let Some(rows) = self.rows {
            config.rows = rows;
        }
        if let Some(batch_size) = self.batch_size {
            config.batch_size = batch_size;
        }
        config.seed = self.seed.or(config.seed);
        config.epochs = self.epochs.or(config.epochs);
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    logging::init_logging()?;
    let config = Cli::parse().into_config()?;
    info!(mode = ?config.mode, seed = ?config.seed, "starting run");

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let dataset = Dataset::synthetic(config.rows, &config.feature_names, config.n_classes, &mut rng);

    let report = run(&config, &dataset, &mut rng).context("run failed")?;

    println!("{} train examples", report.counts.train);
    println!("{} validation examples", report.counts.val);
    println!("{} test examples", report.counts.test);

    match report.outcome {
        Outcome::Trained { .. } => println!("Done training."),
        Outcome::Predicted { classes } => {
            println!("{classes:?}");
            println!("Done predicting.");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn config_file(yaml: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(yaml.as_bytes()).unwrap();
        file
    }

    const FILE_YAML: &str = "mode: infer\nweights_path: from_file.json\nrows: 120\nbatch_size: 8\nseed: 11\nepochs: 3\n";

    #[test]
    fn flags_override_file_values() {
        let file = config_file(FILE_YAML);
        let cli = Cli::try_parse_from([
            "tabular-dnn",
            "--config", file.path().to_str().unwrap(),
            "--mode", "train",
            "--weights", "from_flag.json",
            "--rows", "60",
            "--batch-size", "4",
            "--seed", "99",
            "--epochs", "7",
        ])
        .unwrap();

        let config = cli.into_config().unwrap();
        assert_eq!(config.mode, RunMode::Train);
        assert_eq!(config.weights_path, PathBuf::from("from_flag.json"));
        assert_eq!(config.rows, 60);
        assert_eq!(config.batch_size, 4);
        assert_eq!(config.seed, Some(99));
        assert_eq!(config.epochs, Some(7));
    }

    #[test]
    fn omitted_flags_keep_file_values() {
        let file = config_file(FILE_YAML);
        let cli = Cli::try_parse_from(["tabular-dnn", "--config", file.path().to_str().unwrap()]).unwrap();

        let config = cli.into_config().unwrap();
        assert_eq!(config.mode, RunMode::Infer);
        assert_eq!(config.weights_path, PathBuf::from("from_file.json"));
        assert_eq!(config.rows, 120);
        assert_eq!(config.batch_size, 8);
        assert_eq!(config.seed, Some(11));
        assert_eq!(config.epochs, Some(3));
        assert_eq!(config.hidden_widths, vec![10, 10]);
    }

    #[test]
    fn no_config_file_means_defaults() {
        let config = Cli::try_parse_from(["tabular-dnn"]).unwrap().into_config().unwrap();
        assert_eq!(config, RunConfig::default());
    }

    #[test]
    fn unreadable_config_is_an_error() {
        let cli = Cli::try_parse_from(["tabular-dnn", "--config", "/nonexistent/run.yaml"]).unwrap();
        assert!(cli.into_config().is_err());
    }
}
