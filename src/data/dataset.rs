use std::collections::BTreeMap;

use rand::Rng;

use crate::error::{ClassifierError, Result};

/// Column holding the integer class label.
pub const TARGET: &str = "target";

/// One example: column name -> scalar value.
pub type Row = BTreeMap<String, f64>;

/// An ordered collection of rows sharing one column set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    rows: Vec<Row>,
}

impl Dataset {
    /// Fails if any row's column set differs from the first row's.
    pub fn new(rows: Vec<Row>) -> Result<Dataset> {
        if let Some(first) = rows.first() {
            for (i, row) in rows.iter().enumerate().skip(1) {
                if !row.keys().eq(first.keys()) {
                    return Err(ClassifierError::invalid(format!(
                        "row {i} has columns {:?}, expected {:?}",
                        row.keys().collect::<Vec<_>>(),
                        first.keys().collect::<Vec<_>>(),
                    )));
                }
            }
        }
        Ok(Dataset { rows })
    }

    /// Uniform features in [0, 1) and a uniform label in `0..n_classes`.
    pub fn synthetic<R: Rng + ?Sized>(
        n_rows: usize,
        feature_names: &[String],
        n_classes: usize,
        rng: &mut R,
    ) -> Dataset {
        let rows = (0..n_rows)
            .map(|_| {
                let mut row: Row = feature_names.iter()
                    .map(|name| (name.clone(), rng.gen::<f64>()))
                    .collect();
                row.insert(TARGET.to_string(), rng.gen_range(0..n_classes.max(1)) as f64);
                row
            })
            .collect();
        Dataset { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Column names of the first row (all rows share them).
    pub fn columns(&self) -> Vec<&str> {
        self.rows.first()
            .map(|r| r.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    // Row subsets of an already validated dataset keep its column invariant.
    pub(crate) fn from_validated(rows: Vec<Row>) -> Dataset {
        Dataset { rows }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn row(pairs: &[(&str, f64)]) -> Row {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let err = Dataset::new(vec![
            row(&[("c1", 0.1), (TARGET, 0.0)]),
            row(&[("c2", 0.1), (TARGET, 1.0)]),
        ]).unwrap_err();
        assert!(matches!(err, ClassifierError::InvalidArgument(_)));
    }

    #[test]
    fn synthetic_rows_follow_the_schema() {
        let names: Vec<String> = (1..=5).map(|i| format!("c{i}")).collect();
        let ds = Dataset::synthetic(300, &names, 3, &mut StdRng::seed_from_u64(0));
        assert_eq!(ds.len(), 300);
        assert_eq!(ds.columns(), vec!["c1", "c2", "c3", "c4", "c5", TARGET]);
        for r in ds.rows() {
            let t = r[TARGET];
            assert!(t == 0.0 || t == 1.0 || t == 2.0);
            assert!(names.iter().all(|n| (0.0..1.0).contains(&r[n])));
        }
    }
}
