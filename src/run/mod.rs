pub mod config;
pub mod driver;

pub use config::{RunConfig, RunMode};
pub use driver::{run, Outcome, RunReport};
