pub mod epoch_stats;
pub mod loop_fn;
pub mod train_config;

pub use epoch_stats::EpochStats;
pub use loop_fn::{evaluate, train_loop, Tally};
pub use train_config::TrainConfig;
