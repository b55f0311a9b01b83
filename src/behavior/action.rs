use std::fmt;

use crate::tasks::Task;
use crate::topology::CityId;

/// What the agent does at a decision point.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Action {
    /// Travel empty to a neighboring city.
    Move(CityId),
    /// Take the offered task and carry it to its delivery city.
    Pickup(Task),
}

impl Action {
    /// City the agent ends up in after executing the action.
    pub fn destination(&self) -> CityId {
        match self {
            Action::Move(city) => *city,
            Action::Pickup(task) => task.delivery,
        }
    }

    pub fn is_pickup(&self) -> bool {
        matches!(self, Action::Pickup(_))
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Move(city) => write!(f, "move to {}", city.index()),
            Action::Pickup(task) => write!(f, "pick up {}", task),
        }
    }
}
