use petgraph::graph::NodeIndex;
use tracing::warn;

use super::error::MdpError;
use super::state::StateSpace;
use crate::tasks::TaskDistribution;

/// Validated snapshot of a [`TaskDistribution`] over a state space.
///
/// Row-major `origin × destination` like the state layout; the diagonal
/// holds the no-task probability and a zero reward.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionModel {
    city_count: usize,
    probabilities: Vec<f64>,
    rewards: Vec<f64>,
}

impl TransitionModel {
    /// Queries the oracle for every `(origin, destination)` pair and checks
    /// that each origin's row is a probability distribution.
    ///
    /// Rows are never renormalized.
    ///
    /// # Errors
    ///
    /// - `InvalidProbability` for a probability outside `[0, 1]`
    /// - `InvalidReward` for a negative or non-finite reward
    /// - `OracleInconsistency` for a row whose sum is further than
    ///   `tolerance` from 1
    pub fn capture<D>(space: &StateSpace, oracle: &D, tolerance: f64) -> Result<Self, MdpError>
    where
        D: TaskDistribution + ?Sized,
    {
        let n = space.city_count();
        let mut probabilities = vec![0.0; n * n];
        let mut rewards = vec![0.0; n * n];

        for o in 0..n {
            let origin = NodeIndex::new(o);
            let mut sum = 0.0;
            for d in 0..n {
                let destination = NodeIndex::new(d);
                let (asked, reward) = if o == d {
                    (None, 0.0)
                } else {
                    (Some(destination), oracle.reward(origin, destination))
                };
                let probability = oracle.probability(origin, asked);
                if !(0.0..=1.0).contains(&probability) {
                    return Err(MdpError::InvalidProbability {
                        origin,
                        destination: asked,
                        probability,
                    });
                }
                if !reward.is_finite() || reward < 0.0 {
                    return Err(MdpError::InvalidReward {
                        origin,
                        destination,
                        reward,
                    });
                }
                probabilities[o * n + d] = probability;
                rewards[o * n + d] = reward;
                sum += probability;
            }
            if !((sum - 1.0).abs() <= tolerance) {
                warn!(city = o, sum, "rejecting task distribution");
                return Err(MdpError::OracleInconsistency { city: origin, sum });
            }
        }

        Ok(Self {
            city_count: n,
            probabilities,
            rewards,
        })
    }

    pub fn city_count(&self) -> usize {
        self.city_count
    }

    /// Probability of arriving in `(city, target)`; `target == city` is the
    /// no-task case.
    pub fn probability(&self, city: usize, target: usize) -> f64 {
        self.probabilities[city * self.city_count + target]
    }

    /// Reward of carrying a task from `origin` to `destination`.
    pub fn reward(&self, origin: usize, destination: usize) -> f64 {
        self.rewards[origin * self.city_count + destination]
    }

    /// Expected value of arriving at each city: `Σ_t P(city, t) · V(city, t)`.
    pub fn expected_arrival_values(&self, values: &[f64]) -> Vec<f64> {
        let n = self.city_count;
        (0..n)
            .map(|city| {
                let row = city * n..(city + 1) * n;
                self.probabilities[row.clone()]
                    .iter()
                    .zip(&values[row])
                    .map(|(p, v)| p * v)
                    .sum()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::TableDistribution;
    use crate::topology::Topology;

    fn pair() -> (Topology, StateSpace) {
        let topology = Topology::from_routes(&[("A", "B", 1.0)]).unwrap();
        let space = StateSpace::build(&topology).unwrap();
        (topology, space)
    }

    struct Skewed;

    impl TaskDistribution for Skewed {
        fn probability(&self, _origin: NodeIndex, destination: Option<NodeIndex>) -> f64 {
            match destination {
                None => 0.5,
                Some(_) => 0.7,
            }
        }

        fn reward(&self, _origin: NodeIndex, _destination: NodeIndex) -> f64 {
            1.0
        }
    }

    #[test]
    fn captures_consistent_table() {
        let (topology, space) = pair();
        let a = topology.find("A").unwrap();
        let b = topology.find("B").unwrap();
        let mut table = TableDistribution::new(2);
        table.set_task(a, b, 0.25, 8.0).unwrap();
        table.set_no_task(a, 0.75).unwrap();

        let model = TransitionModel::capture(&space, &table, 1e-9).unwrap();
        assert_eq!(model.probability(0, 1), 0.25);
        assert_eq!(model.probability(0, 0), 0.75);
        assert_eq!(model.probability(1, 1), 1.0);
        assert_eq!(model.reward(0, 1), 8.0);
        assert_eq!(model.reward(0, 0), 0.0);
    }

    #[test]
    fn rejects_rows_not_summing_to_one() {
        let (_, space) = pair();
        let err = TransitionModel::capture(&space, &Skewed, 1e-6).unwrap_err();
        match err {
            MdpError::OracleInconsistency { city, sum } => {
                assert_eq!(city, NodeIndex::new(0));
                assert!((sum - 1.2).abs() < 1e-12);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn tolerance_allows_rounding() {
        let (_, space) = pair();
        assert!(TransitionModel::capture(&space, &Skewed, 0.25).is_ok());
    }

    #[test]
    fn expected_arrival_values_weight_by_probability() {
        let (topology, space) = pair();
        let a = topology.find("A").unwrap();
        let b = topology.find("B").unwrap();
        let mut table = TableDistribution::new(2);
        table.set_task(a, b, 0.5, 1.0).unwrap();
        table.set_no_task(a, 0.5).unwrap();
        let model = TransitionModel::capture(&space, &table, 1e-9).unwrap();

        let expected = model.expected_arrival_values(&[2.0, 4.0, 10.0, 20.0]);
        assert_eq!(expected, vec![3.0, 20.0]);
    }
}
