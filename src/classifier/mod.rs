pub mod dnn;
pub mod features;
pub mod weights;

pub use dnn::{reduce_prediction, DnnClassifier, DEFAULT_LEARNING_RATE};
pub use features::FeatureLayout;
pub use weights::SavedModel;
