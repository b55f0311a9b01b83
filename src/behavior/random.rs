//! Random behavior for testing and baselines.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::action::Action;
use super::error::BehaviorError;
use super::trait_::Behavior;
use crate::tasks::Task;
use crate::topology::{CityId, Topology};

/// Picks up offered tasks with a fixed probability, otherwise wanders to a
/// uniformly random neighbor.
///
/// Ignores the decision process entirely. Used for sanity checks and as a
/// lower-bound baseline.
#[derive(Debug, Clone)]
pub struct RandomBehavior {
    pickup_probability: f64,
    neighbors: Vec<Vec<CityId>>,
    rng: StdRng,
}

impl RandomBehavior {
    /// Creates a new random behavior.
    ///
    /// # Arguments
    ///
    /// * `topology` - Road network the agent wanders on
    /// * `pickup_probability` - Chance of accepting an offered task, clamped to `[0, 1]`
    /// * `seed` - Random seed for reproducible runs
    pub fn new(topology: &Topology, pickup_probability: f64, seed: u64) -> Self {
        Self {
            pickup_probability: pickup_probability.clamp(0.0, 1.0),
            neighbors: topology.cities().map(|c| topology.neighbors(c)).collect(),
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Behavior for RandomBehavior {
    fn act(&mut self, current: CityId, task: Option<&Task>) -> Result<Action, BehaviorError> {
        if let Some(task) = task {
            if task.pickup != current {
                return Err(BehaviorError::TaskElsewhere {
                    current,
                    offered: task.pickup,
                });
            }
            if self.rng.gen::<f64>() < self.pickup_probability {
                return Ok(Action::Pickup(task.clone()));
            }
        }

        let neighbors = self
            .neighbors
            .get(current.index())
            .filter(|n| !n.is_empty())
            .ok_or(BehaviorError::NoMoveAvailable(current))?;
        let next = neighbors[self.rng.gen_range(0..neighbors.len())];
        Ok(Action::Move(next))
    }

    fn name(&self) -> &str {
        "random"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn star() -> Topology {
        Topology::from_routes(&[("hub", "a", 1.0), ("hub", "b", 2.0), ("hub", "c", 3.0)]).unwrap()
    }

    #[test]
    fn random_moves_stay_on_roads() {
        let topology = star();
        let hub = topology.find("hub").unwrap();
        let mut behavior = RandomBehavior::new(&topology, 0.5, 1);
        for _ in 0..100 {
            match behavior.act(hub, None).unwrap() {
                Action::Move(next) => assert!(topology.has_neighbor(hub, next)),
                other => panic!("unexpected action {other:?}"),
            }
        }
    }

    #[test]
    fn certain_pickup() {
        let topology = star();
        let hub = topology.find("hub").unwrap();
        let a = topology.find("a").unwrap();
        let task = Task::new(0, hub, a, 1.0);
        let mut always = RandomBehavior::new(&topology, 1.0, 2);
        let mut never = RandomBehavior::new(&topology, 0.0, 2);
        for _ in 0..20 {
            assert!(always.act(hub, Some(&task)).unwrap().is_pickup());
            assert!(!never.act(hub, Some(&task)).unwrap().is_pickup());
        }
    }

    #[test]
    fn same_seed_same_walk() {
        let topology = star();
        let hub = topology.find("hub").unwrap();
        let mut first = RandomBehavior::new(&topology, 0.5, 9);
        let mut second = RandomBehavior::new(&topology, 0.5, 9);
        for _ in 0..30 {
            assert_eq!(first.act(hub, None), second.act(hub, None));
        }
    }

    #[test]
    fn isolated_city_cannot_move() {
        let mut topology = Topology::new();
        let solo = topology.add_city("solo").unwrap();
        let mut behavior = RandomBehavior::new(&topology, 0.5, 3);
        assert_eq!(
            behavior.act(solo, None),
            Err(BehaviorError::NoMoveAvailable(solo))
        );
    }
}
