use petgraph::graph::NodeIndex;
use thiserror::Error;

use super::policy::PolicyTable;

/// Errors raised while building, solving, or querying the decision process.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MdpError {
    #[error("Cannot build a state space: topology has no cities")]
    EmptyTopology,

    #[error("Discount factor must lie in (0, 1), got {0}")]
    InvalidDiscount(f64),

    #[error("Convergence epsilon must be positive and finite, got {0}")]
    InvalidEpsilon(f64),

    #[error("Cost per distance unit must be finite, got {0}")]
    InvalidCost(f64),

    #[error("Sweep limit must be at least 1")]
    InvalidSweepLimit,

    #[error("Probability tolerance must be non-negative and finite, got {0}")]
    InvalidTolerance(f64),

    #[error("Task probabilities at city {city:?} sum to {sum}, expected 1")]
    OracleInconsistency { city: NodeIndex, sum: f64 },

    #[error("Task probability from {origin:?} to {destination:?} is {probability}, expected [0, 1]")]
    InvalidProbability {
        origin: NodeIndex,
        destination: Option<NodeIndex>,
        probability: f64,
    },

    #[error("Task reward from {origin:?} to {destination:?} is {reward}, expected non-negative")]
    InvalidReward {
        origin: NodeIndex,
        destination: NodeIndex,
        reward: f64,
    },

    #[error("Value iteration did not converge after {sweeps} sweeps (last max change {max_diff})")]
    NonConvergence {
        sweeps: usize,
        max_diff: f64,
        /// Policy after the last sweep, for diagnosis only.
        partial: Box<PolicyTable>,
    },

    #[error("No state ({current:?}, {target:?}) in the state space")]
    UnknownState {
        current: NodeIndex,
        target: NodeIndex,
    },
}
