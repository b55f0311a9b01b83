//! reactive_mdp - offline-solved reactive pickup-and-delivery agent
//!
//! An agent travels a road network and is sometimes offered a task bound for
//! another city. The decision process over `(current city, task destination)`
//! states is solved once by value iteration; afterwards every decision is a
//! constant-time policy lookup.
//!
//! ```
//! use reactive_mdp::behavior::{Action, ReactiveBehavior};
//! use reactive_mdp::mdp::SolverConfig;
//! use reactive_mdp::tasks::{TableDistribution, Task};
//! use reactive_mdp::topology::Topology;
//!
//! let topology = Topology::from_routes(&[("A", "B", 1.0), ("B", "C", 1.0)]).unwrap();
//! let tasks = TableDistribution::uniform(&topology, 0.5, 20.0).unwrap();
//! let agent = ReactiveBehavior::setup(&topology, &tasks, SolverConfig::default()).unwrap();
//!
//! let a = topology.find("A").unwrap();
//! let c = topology.find("C").unwrap();
//! let task = Task::new(0, a, c, 40.0);
//! assert_eq!(agent.decide(a, Some(&task)).unwrap(), Action::Pickup(task));
//! ```

pub mod behavior;
pub mod mdp;
pub mod simulation;
pub mod tasks;
pub mod topology;

pub use behavior::{Action, Behavior, ReactiveBehavior};
pub use mdp::{solve, PolicyTable, SolverConfig};
pub use topology::{CityId, Topology};
