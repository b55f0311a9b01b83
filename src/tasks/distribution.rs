use petgraph::graph::NodeIndex;
use rand::Rng;
use thiserror::Error;

use super::task::Task;
use crate::topology::{CityId, Topology};

/// Source of the task-appearance model the solver plans against.
///
/// Implementations must be pure: the same arguments always return the same
/// numbers, otherwise solving twice may give different policies.
pub trait TaskDistribution {
    /// Probability that a task bound for `destination` is offered at `origin`.
    ///
    /// `None` asks for the probability that no task is offered at all. For
    /// every origin the no-task probability plus the probabilities of all
    /// other destinations must sum to 1.
    fn probability(&self, origin: CityId, destination: Option<CityId>) -> f64;

    /// Reward paid for carrying a task from `origin` to `destination`.
    fn reward(&self, origin: CityId, destination: CityId) -> f64;
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum TaskError {
    #[error("Unknown city index: {0:?}")]
    UnknownCity(NodeIndex),

    #[error("A task cannot be delivered to its own pickup city {0:?}")]
    SelfDelivery(NodeIndex),

    #[error("Probability must lie in [0, 1], got {0}")]
    InvalidProbability(f64),

    #[error("Reward must be non-negative and finite, got {0}")]
    InvalidReward(f64),
}

/// Dense in-memory task distribution.
///
/// Every origin starts with "no task" at probability 1; setting a task
/// probability does not adjust the no-task entry, callers keep the rows
/// consistent themselves (the solver rejects rows that do not sum to 1).
#[derive(Debug, Clone, PartialEq)]
pub struct TableDistribution {
    city_count: usize,
    /// Row-major `origin × destination`; the diagonal holds the no-task
    /// probability.
    probabilities: Vec<f64>,
    rewards: Vec<f64>,
}

impl TableDistribution {
    /// Creates a distribution in which no task is ever offered.
    pub fn new(city_count: usize) -> Self {
        let mut probabilities = vec![0.0; city_count * city_count];
        for city in 0..city_count {
            probabilities[city * city_count + city] = 1.0;
        }
        Self {
            city_count,
            probabilities,
            rewards: vec![0.0; city_count * city_count],
        }
    }

    /// Builds the usual generated distribution: at every city a task is
    /// offered with probability `task_probability`, its destination uniform
    /// among the other reachable cities, paying `reward_per_distance` per unit
    /// of shortest-path distance.
    pub fn uniform(
        topology: &Topology,
        task_probability: f64,
        reward_per_distance: f64,
    ) -> Result<Self, TaskError> {
        check_probability(task_probability)?;
        check_reward(reward_per_distance)?;

        let mut table = Self::new(topology.city_count());
        for origin in topology.cities() {
            let distances = topology.distances_from(origin);
            let destinations: Vec<(CityId, f64)> = topology
                .cities()
                .filter(|&d| d != origin)
                .filter_map(|d| distances[d.index()].map(|dist| (d, dist)))
                .collect();
            if destinations.is_empty() {
                continue;
            }
            let share = task_probability / destinations.len() as f64;
            for (destination, dist) in destinations {
                table.set_task(origin, destination, share, reward_per_distance * dist)?;
            }
            table.set_no_task(origin, 1.0 - task_probability)?;
        }
        Ok(table)
    }

    pub fn city_count(&self) -> usize {
        self.city_count
    }

    fn index(&self, origin: CityId, destination: CityId) -> Result<usize, TaskError> {
        if origin.index() >= self.city_count {
            return Err(TaskError::UnknownCity(origin));
        }
        if destination.index() >= self.city_count {
            return Err(TaskError::UnknownCity(destination));
        }
        Ok(origin.index() * self.city_count + destination.index())
    }

    /// Sets probability and reward of a task from `origin` to `destination`.
    pub fn set_task(
        &mut self,
        origin: CityId,
        destination: CityId,
        probability: f64,
        reward: f64,
    ) -> Result<(), TaskError> {
        if origin == destination {
            return Err(TaskError::SelfDelivery(origin));
        }
        check_probability(probability)?;
        check_reward(reward)?;
        let idx = self.index(origin, destination)?;
        self.probabilities[idx] = probability;
        self.rewards[idx] = reward;
        Ok(())
    }

    /// Sets the probability that no task is offered at `origin`.
    pub fn set_no_task(&mut self, origin: CityId, probability: f64) -> Result<(), TaskError> {
        check_probability(probability)?;
        let idx = self.index(origin, origin)?;
        self.probabilities[idx] = probability;
        Ok(())
    }
}

impl TaskDistribution for TableDistribution {
    fn probability(&self, origin: CityId, destination: Option<CityId>) -> f64 {
        let destination = destination.unwrap_or(origin);
        self.index(origin, destination)
            .map(|idx| self.probabilities[idx])
            .unwrap_or(0.0)
    }

    fn reward(&self, origin: CityId, destination: CityId) -> f64 {
        if origin == destination {
            return 0.0;
        }
        self.index(origin, destination)
            .map(|idx| self.rewards[idx])
            .unwrap_or(0.0)
    }
}

fn check_probability(p: f64) -> Result<(), TaskError> {
    if !(0.0..=1.0).contains(&p) {
        return Err(TaskError::InvalidProbability(p));
    }
    Ok(())
}

fn check_reward(r: f64) -> Result<(), TaskError> {
    if !r.is_finite() || r < 0.0 {
        return Err(TaskError::InvalidReward(r));
    }
    Ok(())
}

/// Draws the task (if any) offered at `origin`.
///
/// Destinations are visited in index order against a single uniform draw;
/// whatever probability mass is left over means no task.
pub fn sample_task<D, R>(
    distribution: &D,
    origin: CityId,
    city_count: usize,
    rng: &mut R,
    id: u64,
) -> Option<Task>
where
    D: TaskDistribution + ?Sized,
    R: Rng,
{
    let draw: f64 = rng.gen();
    let mut cumulative = 0.0;
    for index in 0..city_count {
        let destination = NodeIndex::new(index);
        if destination == origin {
            continue;
        }
        cumulative += distribution.probability(origin, Some(destination));
        if draw < cumulative {
            let reward = distribution.reward(origin, destination);
            return Some(Task::new(id, origin, destination, reward));
        }
    }
    None
}
