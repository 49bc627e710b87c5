use rand::seq::SliceRandom;
use rand::Rng;
use tracing::info;

use crate::data::dataset::Dataset;
use crate::error::{ClassifierError, Result};

/// Randomly splits `dataset` into `(complement, sample)`.
///
/// `sample` holds `round(fraction * len)` rows drawn without replacement; the
/// remaining rows form `complement`. Both come back shuffled.
pub fn split<R: Rng + ?Sized>(
    dataset: &Dataset,
    fraction: f64,
    rng: &mut R,
) -> Result<(Dataset, Dataset)> {
    if !(fraction > 0.0 && fraction < 1.0) {
        return Err(ClassifierError::invalid(format!(
            "split fraction must lie in (0, 1), got {fraction}"
        )));
    }
    if dataset.is_empty() {
        return Err(ClassifierError::invalid("cannot split an empty dataset"));
    }

    let n = dataset.len();
    let n_sample = (fraction * n as f64).round() as usize;

    let mut rows = dataset.rows().to_vec();
    rows.shuffle(rng);
    let complement = rows.split_off(n_sample);

    Ok((Dataset::from_validated(complement), Dataset::from_validated(rows)))
}

/// Row totals of each partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartitionCounts {
    pub train: usize,
    pub val: usize,
    pub test: usize,
}

/// Disjoint train / validation / test subsets of one dataset.
#[derive(Debug, Clone)]
pub struct Partitions {
    pub train: Dataset,
    pub val: Dataset,
    pub test: Dataset,
}

impl Partitions {
    pub fn counts(&self) -> PartitionCounts {
        PartitionCounts {
            train: self.train.len(),
            val: self.val.len(),
            test: self.test.len(),
        }
    }
}

/// Splits off `test_fraction` of the rows as the test set, then
/// `val_fraction` of what remains as the validation set.
pub fn partition<R: Rng + ?Sized>(
    dataset: &Dataset,
    test_fraction: f64,
    val_fraction: f64,
    rng: &mut R,
) -> Result<Partitions> {
    let (rest, test) = split(dataset, test_fraction, rng)?;
    let (train, val) = split(&rest, val_fraction, rng)?;
    let parts = Partitions { train, val, test };

    let counts = parts.counts();
    info!(train = counts.train, val = counts.val, test = counts.test, "partitioned dataset");
    Ok(parts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::dataset::{Row, TARGET};
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn indexed(n: usize) -> Dataset {
        let rows = (0..n)
            .map(|i| {
                let mut r = Row::new();
                r.insert("id".to_string(), i as f64);
                r.insert(TARGET.to_string(), (i % 3) as f64);
                r
            })
            .collect();
        Dataset::new(rows).unwrap()
    }

    fn sorted_ids(ds: &Dataset) -> Vec<u64> {
        let mut ids: Vec<u64> = ds.rows().iter().map(|r| r["id"] as u64).collect();
        ids.sort_unstable();
        ids
    }

    #[test]
    fn three_hundred_rows_split_into_192_48_60() {
        let parts = partition(&indexed(300), 0.2, 0.2, &mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(parts.counts(), PartitionCounts { train: 192, val: 48, test: 60 });
    }

    #[test]
    fn rejects_bad_fractions_and_empty_input() {
        let mut rng = StdRng::seed_from_u64(0);
        for f in [0.0, 1.0, -0.1, 1.5, f64::NAN] {
            assert!(matches!(
                split(&indexed(10), f, &mut rng),
                Err(ClassifierError::InvalidArgument(_))
            ));
        }
        assert!(matches!(
            split(&Dataset::default(), 0.5, &mut rng),
            Err(ClassifierError::InvalidArgument(_))
        ));
    }

    #[test]
    fn duplicates_are_preserved() {
        let mut r = Row::new();
        r.insert(TARGET.to_string(), 1.0);
        let ds = Dataset::new(vec![r; 7]).unwrap();
        let (rest, sample) = split(&ds, 0.5, &mut StdRng::seed_from_u64(9)).unwrap();
        assert_eq!(rest.len() + sample.len(), 7);
        assert_eq!(sample.len(), 4);
    }

    proptest! {
        #[test]
        fn split_is_a_multiset_partition(n in 1usize..400, f in 0.01f64..0.99, seed in any::<u64>()) {
            let ds = indexed(n);
            let (rest, sample) = split(&ds, f, &mut StdRng::seed_from_u64(seed)).unwrap();

            prop_assert_eq!(sample.len(), (f * n as f64).round() as usize);

            let mut union: Vec<u64> = sorted_ids(&rest);
            union.extend(sorted_ids(&sample));
            union.sort_unstable();
            prop_assert_eq!(union, sorted_ids(&ds));
        }
    }
}
