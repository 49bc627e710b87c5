pub mod cross_entropy;
pub mod loss_type;

pub use cross_entropy::{CrossEntropyLoss, one_hot};
pub use loss_type::LossType;
