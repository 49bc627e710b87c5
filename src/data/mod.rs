pub mod batch;
pub mod dataset;
pub mod split;

pub use batch::{make_batches, Batch, BatchFeeder, Batches};
pub use dataset::{Dataset, Row, TARGET};
pub use split::{partition, split, PartitionCounts, Partitions};
