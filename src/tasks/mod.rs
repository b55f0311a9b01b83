//! Tasks and the distribution they are offered from.

mod distribution;
mod task;

pub use distribution::{sample_task, TableDistribution, TaskDistribution, TaskError};
pub use task::Task;
