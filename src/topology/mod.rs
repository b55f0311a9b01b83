//! Road network the agent travels on.

mod error;
mod graph;

pub use error::TopologyError;
pub use graph::{City, CityId, Topology};
