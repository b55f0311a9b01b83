//! Policy-driven behavior.
//!
//! Solves the decision process once at construction and afterwards answers
//! every request with a single table lookup.

use tracing::trace;

use super::action::Action;
use super::error::BehaviorError;
use super::trait_::Behavior;
use crate::mdp::{self, MdpError, PolicyTable, SolverConfig};
use crate::tasks::{Task, TaskDistribution};
use crate::topology::{CityId, Topology};

/// Behavior that follows a solved [`PolicyTable`].
///
/// The table is never modified after construction, so a `ReactiveBehavior`
/// can be shared between threads and queried concurrently through
/// [`decide`](Self::decide).
#[derive(Debug, Clone)]
pub struct ReactiveBehavior {
    policy: PolicyTable,
    /// First neighbor of each city, used when the policy says "stay".
    fallback: Vec<Option<CityId>>,
}

impl ReactiveBehavior {
    /// Wraps an already solved policy for `topology`.
    pub fn new(policy: PolicyTable, topology: &Topology) -> Self {
        let fallback = topology
            .cities()
            .map(|city| topology.neighbors(city).first().copied())
            .collect();
        Self { policy, fallback }
    }

    /// Solves the decision process for `topology` and `distribution`.
    pub fn setup<D>(
        topology: &Topology,
        distribution: &D,
        config: SolverConfig,
    ) -> Result<Self, MdpError>
    where
        D: TaskDistribution + ?Sized,
    {
        let policy = mdp::solve(topology, distribution, config)?;
        Ok(Self::new(policy, topology))
    }

    pub fn policy(&self) -> &PolicyTable {
        &self.policy
    }

    /// Translates the policy entry of the current state into an action.
    ///
    /// - Without a task the state is `(current, current)` and the agent
    ///   moves toward the entry's best action.
    /// - With a task to `dest` the state is `(current, dest)`; the task is
    ///   picked up if the best action is `dest`, otherwise it is left behind
    ///   and the agent moves toward the best action.
    ///
    /// A best action equal to `current` is replaced by the first neighbor of
    /// `current`.
    ///
    /// # Errors
    ///
    /// - `Policy(UnknownState)` if the state is not in the solved table
    /// - `TaskElsewhere` if the task is not offered at `current`
    /// - `NoMoveAvailable` if the agent must move but `current` has no neighbor
    pub fn decide(&self, current: CityId, task: Option<&Task>) -> Result<Action, BehaviorError> {
        let target = match task {
            Some(task) if task.pickup != current => {
                return Err(BehaviorError::TaskElsewhere {
                    current,
                    offered: task.pickup,
                })
            }
            Some(task) => task.delivery,
            None => current,
        };

        let entry = self.policy.lookup(current, target)?;
        let action = match task {
            Some(task) if target != current && entry.best_action == target => {
                Action::Pickup(task.clone())
            }
            _ => Action::Move(self.move_from(current, entry.best_action)?),
        };
        trace!(city = current.index(), %action, "decided");
        Ok(action)
    }

    fn move_from(&self, current: CityId, best: CityId) -> Result<CityId, BehaviorError> {
        if best != current {
            return Ok(best);
        }
        self.fallback
            .get(current.index())
            .copied()
            .flatten()
            .ok_or(BehaviorError::NoMoveAvailable(current))
    }
}

impl Behavior for ReactiveBehavior {
    fn act(&mut self, current: CityId, task: Option<&Task>) -> Result<Action, BehaviorError> {
        self.decide(current, task)
    }

    fn name(&self) -> &str {
        "reactive"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mdp::PolicyEntry;
    use crate::tasks::TableDistribution;
    use petgraph::graph::NodeIndex;

    /// A - B - C line; tasks A→C pay well, everything else pays nothing.
    fn line() -> (Topology, TableDistribution, [CityId; 3]) {
        let topology = Topology::from_routes(&[("A", "B", 1.0), ("B", "C", 1.0)]).unwrap();
        let ids = ["A", "B", "C"].map(|n| topology.find(n).unwrap());
        let [a, b, c] = ids;
        let mut table = TableDistribution::new(3);
        table.set_task(a, c, 0.5, 50.0).unwrap();
        table.set_no_task(a, 0.5).unwrap();
        table.set_task(c, a, 0.5, 0.0).unwrap();
        table.set_no_task(c, 0.5).unwrap();
        table.set_task(b, c, 0.2, 0.0).unwrap();
        table.set_no_task(b, 0.8).unwrap();
        (topology, table, ids)
    }

    fn solved() -> (ReactiveBehavior, [CityId; 3]) {
        let (topology, table, ids) = line();
        let config = SolverConfig {
            cost_per_distance_unit: 1.0,
            discount: 0.9,
            ..SolverConfig::default()
        };
        (ReactiveBehavior::setup(&topology, &table, config).unwrap(), ids)
    }

    #[test]
    fn picks_up_profitable_task() {
        let (behavior, [a, _, c]) = solved();
        let task = Task::new(1, a, c, 50.0);
        assert_eq!(
            behavior.decide(a, Some(&task)).unwrap(),
            Action::Pickup(task)
        );
    }

    #[test]
    fn declines_task_leading_away_from_profit() {
        let (behavior, [a, b, c]) = solved();
        let task = Task::new(2, b, c, 0.0);
        assert_eq!(behavior.decide(b, Some(&task)).unwrap(), Action::Move(a));
    }

    #[test]
    fn moves_without_task() {
        let (behavior, [_, b, c]) = solved();
        let entry = behavior.policy().lookup(c, c).unwrap();
        assert_eq!(entry.best_action, b);
        assert_eq!(behavior.decide(c, None).unwrap(), Action::Move(b));
    }

    #[test]
    fn decide_is_idempotent() {
        let (behavior, [_, b, c]) = solved();
        let before = behavior.policy().clone();
        let task = Task::new(3, b, c, 0.0);
        let first = behavior.decide(b, Some(&task)).unwrap();
        for _ in 0..10 {
            assert_eq!(behavior.decide(b, Some(&task)).unwrap(), first);
            assert_eq!(behavior.decide(c, None).unwrap(), Action::Move(b));
        }
        assert_eq!(behavior.policy(), &before);
    }

    #[test]
    fn self_move_falls_back_to_first_neighbor() {
        let (topology, _, [a, b, _]) = line();
        let entries = (0..9)
            .map(|i| PolicyEntry {
                value: 0.0,
                best_action: NodeIndex::new(i / 3),
            })
            .collect();
        let behavior = ReactiveBehavior::new(PolicyTable::new(3, entries, 1), &topology);
        assert_eq!(behavior.decide(a, None).unwrap(), Action::Move(b));
    }

    #[test]
    fn isolated_city_cannot_move() {
        let mut topology = Topology::new();
        let solo = topology.add_city("solo").unwrap();
        let behavior =
            ReactiveBehavior::setup(&topology, &TableDistribution::new(1), SolverConfig::default())
                .unwrap();
        assert_eq!(
            behavior.decide(solo, None),
            Err(BehaviorError::NoMoveAvailable(solo))
        );
    }

    #[test]
    fn unknown_state_is_surfaced() {
        let (behavior, [a, _, _]) = solved();
        let ghost = NodeIndex::new(8);
        assert!(matches!(
            behavior.decide(ghost, None),
            Err(BehaviorError::Policy(MdpError::UnknownState { .. }))
        ));
        let task = Task::new(4, a, ghost, 1.0);
        assert!(matches!(
            behavior.decide(a, Some(&task)),
            Err(BehaviorError::Policy(MdpError::UnknownState { .. }))
        ));
    }

    #[test]
    fn task_must_be_offered_here() {
        let (behavior, [a, b, c]) = solved();
        let task = Task::new(5, b, c, 1.0);
        assert_eq!(
            behavior.decide(a, Some(&task)),
            Err(BehaviorError::TaskElsewhere {
                current: a,
                offered: b
            })
        );
    }
}
