use crate::data::batch::Batch;
use crate::error::{ClassifierError, Result};

/// Packs a column-wise batch into one dense row per example, columns in
/// `names` order.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureLayout {
    names: Vec<String>,
}

impl FeatureLayout {
    pub fn new(names: Vec<String>) -> FeatureLayout {
        FeatureLayout { names }
    }

    pub fn assemble(&self, batch: &Batch) -> Result<Vec<Vec<f64>>> {
        let n = batch.len();
        let columns = self.names.iter()
            .map(|name| {
                let column = batch.features.get(name).ok_or_else(|| {
                    ClassifierError::shape(
                        format!("feature column `{name}`"),
                        format!("columns {:?}", batch.features.keys().collect::<Vec<_>>()),
                    )
                })?;
                if column.len() != n {
                    return Err(ClassifierError::shape(
                        format!("{n} values in `{name}`"),
                        column.len(),
                    ));
                }
                Ok(column.as_slice())
            })
            .collect::<Result<Vec<&[f64]>>>()?;

        Ok((0..n).map(|i| columns.iter().map(|c| c[i]).collect()).collect())
    }
}
