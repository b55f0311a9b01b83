//! Behavior trait consulted by the simulation driver.

use super::action::Action;
use super::error::BehaviorError;
use crate::tasks::Task;
use crate::topology::CityId;

/// Decides what an agent does at each decision point.
pub trait Behavior: Send + Sync {
    /// Chooses an action for an agent standing at `current`, optionally
    /// offered `task`.
    ///
    /// # Arguments
    ///
    /// * `current` - City the agent is in
    /// * `task` - Task offered at `current`, if any
    fn act(&mut self, current: CityId, task: Option<&Task>) -> Result<Action, BehaviorError>;

    /// Returns a human-readable name for this behavior.
    fn name(&self) -> &str;
}
