//! Single-agent pickup-and-delivery simulation.
//!
//! Drives a [`Behavior`](crate::behavior::Behavior) through the loop
//! offer → act → travel → offer, charging travel cost and paying delivery
//! rewards. Used to evaluate behaviors against each other.

mod metrics;

pub use metrics::EvaluationMetrics;

use petgraph::graph::NodeIndex;
use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;

use crate::behavior::{Action, BehaviorError};
use crate::tasks::{sample_task, Task, TaskDistribution};
use crate::topology::{CityId, Topology};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimulationError {
    #[error(transparent)]
    Behavior(#[from] BehaviorError),

    #[error("Unknown city index: {0:?}")]
    UnknownCity(NodeIndex),

    #[error("No road from {from:?} to {to:?}")]
    IllegalMove { from: NodeIndex, to: NodeIndex },

    #[error("Task #{0} is not the task on offer")]
    WrongPickup(u64),
}

/// Result of executing one action.
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// City the agent arrived in.
    pub city: CityId,
    /// Reward earned (delivery reward, or 0 for an empty move).
    pub reward: f64,
    /// Distance travelled.
    pub distance: f64,
    /// Reward minus travel cost.
    pub profit: f64,
    /// Whether a task was delivered.
    pub delivered: bool,
}

/// Simulation state of a single agent.
///
/// # Lifecycle
///
/// 1. Call [`Simulation::new`] with the world, the start city, and a seed.
/// 2. Call [`Simulation::reset`] to start an episode.
/// 3. Repeatedly ask the behavior for an action at [`current`](Self::current)
///    with [`offered`](Self::offered), and execute it with
///    [`step`](Self::step).
#[derive(Debug)]
pub struct Simulation<'a, D: TaskDistribution + ?Sized> {
    topology: &'a Topology,
    distribution: &'a D,
    cost_per_distance_unit: f64,
    start: CityId,
    current: CityId,
    offered: Option<Task>,
    next_task_id: u64,
    /// Steps executed this episode.
    pub t: u64,
    rng: StdRng,
    seed: u64,
}

impl<'a, D: TaskDistribution + ?Sized> Simulation<'a, D> {
    /// Creates a simulation starting every episode at `start`.
    pub fn new(
        topology: &'a Topology,
        distribution: &'a D,
        cost_per_distance_unit: f64,
        start: CityId,
        seed: u64,
    ) -> Result<Self, SimulationError> {
        if !topology.contains(start) {
            return Err(SimulationError::UnknownCity(start));
        }
        Ok(Self {
            topology,
            distribution,
            cost_per_distance_unit,
            start,
            current: start,
            offered: None,
            next_task_id: 0,
            t: 0,
            rng: StdRng::seed_from_u64(seed),
            seed,
        })
    }

    /// Resets the agent to the start city and draws the first offer.
    pub fn reset(&mut self) -> Option<&Task> {
        self.rng = StdRng::seed_from_u64(self.seed);
        self.seed += 1; // different seed each episode
        self.t = 0;
        self.next_task_id = 0;
        self.current = self.start;
        self.offer();
        self.offered.as_ref()
    }

    pub fn current(&self) -> CityId {
        self.current
    }

    /// Task offered at the current city, if any.
    pub fn offered(&self) -> Option<&Task> {
        self.offered.as_ref()
    }

    fn offer(&mut self) {
        self.offered = sample_task(
            self.distribution,
            self.current,
            self.topology.city_count(),
            &mut self.rng,
            self.next_task_id,
        );
        if self.offered.is_some() {
            self.next_task_id += 1;
        }
    }

    /// Executes an action and draws the offer at the arrival city.
    ///
    /// # Errors
    ///
    /// - `IllegalMove` if a move does not follow a road, or a task's
    ///   destination is unreachable
    /// - `WrongPickup` if the picked-up task is not the one on offer
    pub fn step(&mut self, action: Action) -> Result<StepResult, SimulationError> {
        let city = action.destination();
        let (reward, distance, delivered) = match &action {
            Action::Move(_) => {
                let distance = self
                    .topology
                    .road_length(self.current, city)
                    .ok_or(SimulationError::IllegalMove {
                        from: self.current,
                        to: city,
                    })?;
                (0.0, distance, false)
            }
            Action::Pickup(task) => {
                if self.offered.as_ref() != Some(task) {
                    return Err(SimulationError::WrongPickup(task.id));
                }
                let distance = self
                    .topology
                    .distance(self.current, city)
                    .ok_or(SimulationError::IllegalMove {
                        from: self.current,
                        to: city,
                    })?;
                (task.reward, distance, true)
            }
        };

        self.current = city;
        self.t += 1;
        self.offer();

        Ok(StepResult {
            city,
            reward,
            distance,
            profit: reward - distance * self.cost_per_distance_unit,
            delivered,
        })
    }
}
