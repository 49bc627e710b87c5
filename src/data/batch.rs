use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::data::dataset::{Dataset, TARGET};
use crate::error::{ClassifierError, Result};

/// A group of rows rendered column-wise, with labels pulled out of `target`.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    pub features: BTreeMap<String, Vec<f64>>,
    pub labels: Vec<usize>,
}

impl Batch {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Restartable source of batches over one dataset.
///
/// Labels are checked once up front so iteration itself cannot fail.
#[derive(Debug)]
pub struct BatchFeeder<'a> {
    dataset: &'a Dataset,
    labels: Vec<usize>,
    shuffle: bool,
    batch_size: usize,
}

/// Builds a feeder yielding `batch_size` rows at a time, reshuffled on every
/// pass when `shuffle` is set.
pub fn make_batches(dataset: &Dataset, shuffle: bool, batch_size: usize) -> Result<BatchFeeder<'_>> {
    if batch_size == 0 {
        return Err(ClassifierError::invalid("batch_size must be at least 1"));
    }

    let labels = dataset.rows().iter().enumerate()
        .map(|(i, row)| {
            let value = *row.get(TARGET).ok_or_else(|| {
                ClassifierError::invalid(format!("row {i} has no `{TARGET}` column"))
            })?;
            if value < 0.0 || value.fract() != 0.0 || !value.is_finite() {
                return Err(ClassifierError::invalid(format!(
                    "row {i} has label {value}; labels must be non-negative integers"
                )));
            }
            Ok(value as usize)
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(BatchFeeder { dataset, labels, shuffle, batch_size })
}

impl<'a> BatchFeeder<'a> {
    /// Starts a fresh pass over the data.
    pub fn batches<R: Rng + ?Sized>(&self, rng: &mut R) -> Batches<'_> {
        let mut order: Vec<usize> = (0..self.dataset.len()).collect();
        if self.shuffle {
            order.shuffle(rng);
        }
        Batches { feeder: self, order, cursor: 0 }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.dataset.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dataset.is_empty()
    }

    pub fn num_batches(&self) -> usize {
        self.len().div_ceil(self.batch_size)
    }
}

/// One pass of batches, produced lazily.
#[derive(Debug)]
pub struct Batches<'f> {
    feeder: &'f BatchFeeder<'f>,
    order: Vec<usize>,
    cursor: usize,
}

impl Iterator for Batches<'_> {
    type Item = Batch;

    fn next(&mut self) -> Option<Batch> {
        if self.cursor >= self.order.len() {
            return None;
        }
        let end = (self.cursor + self.feeder.batch_size).min(self.order.len());
        let indices = &self.order[self.cursor..end];
        self.cursor = end;

        let rows = self.feeder.dataset.rows();
        let mut features: BTreeMap<String, Vec<f64>> = BTreeMap::new();
        let mut labels = Vec::with_capacity(indices.len());

        for &idx in indices {
            for (column, &value) in &rows[idx] {
                if column != TARGET {
                    features.entry(column.clone()).or_default().push(value);
                }
            }
            labels.push(self.feeder.labels[idx]);
        }

        Some(Batch { features, labels })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.order.len() - self.cursor).div_ceil(self.feeder.batch_size);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Batches<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::dataset::Row;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn dataset(n: usize) -> Dataset {
        let rows = (0..n)
            .map(|i| {
                let mut r = Row::new();
                r.insert("c1".to_string(), i as f64);
                r.insert("c2".to_string(), -(i as f64));
                r.insert(TARGET.to_string(), (i % 3) as f64);
                r
            })
            .collect();
        Dataset::new(rows).unwrap()
    }

    #[test]
    fn exact_multiple_gives_full_batches() {
        let ds = dataset(192);
        let feeder = make_batches(&ds, true, 32).unwrap();
        let sizes: Vec<usize> = feeder.batches(&mut StdRng::seed_from_u64(1)).map(|b| b.len()).collect();
        assert_eq!(sizes, vec![32; 6]);
        assert_eq!(feeder.num_batches(), 6);
    }

    #[test]
    fn final_batch_is_short() {
        let ds = dataset(60);
        let feeder = make_batches(&ds, false, 32).unwrap();
        let sizes: Vec<usize> = feeder.batches(&mut StdRng::seed_from_u64(1)).map(|b| b.len()).collect();
        assert_eq!(sizes, vec![32, 28]);
    }

    #[test]
    fn unshuffled_keeps_order_and_splits_out_target() {
        let ds = dataset(5);
        let feeder = make_batches(&ds, false, 2).unwrap();
        let first = feeder.batches(&mut StdRng::seed_from_u64(1)).next().unwrap();
        assert_eq!(first.features.keys().collect::<Vec<_>>(), vec!["c1", "c2"]);
        assert_eq!(first.features["c1"], vec![0.0, 1.0]);
        assert_eq!(first.labels, vec![0, 1]);
    }

    #[test]
    fn shuffled_passes_are_independent_permutations() {
        let ds = dataset(50);
        let feeder = make_batches(&ds, true, 50).unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        let a = feeder.batches(&mut rng).next().unwrap();
        let b = feeder.batches(&mut rng).next().unwrap();
        assert_ne!(a.features["c1"], b.features["c1"]);

        let mut sorted = a.features["c1"].clone();
        sorted.sort_by(f64::total_cmp);
        assert_eq!(sorted, (0..50).map(|i| i as f64).collect::<Vec<_>>());
    }

    #[test]
    fn rejects_zero_batch_size_and_bad_labels() {
        let ds = dataset(3);
        assert!(make_batches(&ds, false, 0).is_err());

        let mut r = Row::new();
        r.insert(TARGET.to_string(), 1.5);
        let bad = Dataset::new(vec![r]).unwrap();
        assert!(matches!(make_batches(&bad, false, 1), Err(ClassifierError::InvalidArgument(_))));
    }

    #[test]
    fn empty_dataset_yields_no_batches() {
        let ds = Dataset::default();
        let feeder = make_batches(&ds, true, 8).unwrap();
        assert_eq!(feeder.batches(&mut StdRng::seed_from_u64(0)).count(), 0);
    }
}
