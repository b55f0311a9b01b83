//! Discounted decision process over `(current city, task destination)`
//! states, solved offline by value iteration.
//!
//! # Module Structure
//!
//! - [`state`] - states and the candidate moves of each
//! - [`model`] - validated snapshot of the task distribution
//! - [`solver`] - Bellman sweeps and the convergence loop
//! - [`policy`] - the frozen result, looked up at decision time
//! - [`config`] - solver parameters

pub mod config;
pub mod error;
pub mod model;
pub mod policy;
pub mod solver;
pub mod state;


pub use config::SolverConfig;
pub use error::MdpError;
pub use model::TransitionModel;
pub use policy::{PolicyEntry, PolicyTable};
pub use solver::{solve, Sweep, ValueIteration};
pub use state::{Candidate, State, StateSpace};
