use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::Path;

use serde::{Serialize, Deserialize};

use crate::error::{ClassifierError, Result};
use crate::network::{Network, NetworkSpec};

/// On-disk form of a classifier: its architecture followed by every layer's
/// weights and biases, as pretty-printed JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedModel {
    pub spec: NetworkSpec,
    pub network: Network,
}

impl SavedModel {
    pub fn from_parts(spec: &NetworkSpec, network: &Network) -> SavedModel {
        SavedModel { spec: spec.clone(), network: network.clone() }
    }

    pub fn save_json(&self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }

    pub fn load_json(path: &Path) -> Result<SavedModel> {
        let file = File::open(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ClassifierError::FileNotFound(path.to_path_buf()),
            _ => ClassifierError::Io(e),
        })?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    /// Yields the stored network if it was saved for `expected` and every
    /// weight matrix has the shape that architecture implies.
    pub fn into_network(self, expected: &NetworkSpec) -> Result<Network> {
        if &self.spec != expected {
            return Err(ClassifierError::shape(
                format!("{expected:?}"),
                format!("{:?}", self.spec),
            ));
        }

        let wanted = expected.layer_specs();
        if self.network.layer_specs() != wanted {
            return Err(ClassifierError::shape(format!("{wanted:?}"), format!("{:?}", self.network.layer_specs())));
        }
        for (i, layer) in self.network.layers.iter().enumerate() {
            let w_ok = layer.weights.rows == layer.input_size
                && layer.weights.cols == layer.size
                && layer.weights.data.len() == layer.input_size
                && layer.weights.data.iter().all(|r| r.len() == layer.size);
            let b_ok = layer.biases.rows == 1
                && layer.biases.data.len() == 1
                && layer.biases.data[0].len() == layer.size;
            if !(w_ok && b_ok) {
                return Err(ClassifierError::shape(
                    format!("layer {i}: {}x{} weights, 1x{} biases", layer.input_size, layer.size, layer.size),
                    format!(
                        "{}x{} weights, {}x{} biases",
                        layer.weights.rows, layer.weights.cols, layer.biases.rows, layer.biases.cols
                    ),
                ));
            }
        }

        let mut network = self.network;
        for layer in &mut network.layers {
            layer.reset_cache();
        }
        Ok(network)
    }
}
