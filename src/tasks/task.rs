use std::fmt;

use crate::topology::CityId;

/// A transportable item offered to the agent at its pickup city.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Task {
    /// Running identifier assigned by whoever generated the task.
    pub id: u64,
    /// City where the task is offered.
    pub pickup: CityId,
    /// City the task must be carried to.
    pub delivery: CityId,
    /// Reward paid on delivery.
    pub reward: f64,
}

impl Task {
    pub fn new(id: u64, pickup: CityId, delivery: CityId, reward: f64) -> Self {
        Self {
            id,
            pickup,
            delivery,
            reward,
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Task#{} ({} -> {}, reward {:.2})",
            self.id,
            self.pickup.index(),
            self.delivery.index(),
            self.reward
        )
    }
}
