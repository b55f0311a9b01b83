//! Evaluation metrics for comparing behaviors.

use std::fmt;

use tracing::debug;

use super::{Simulation, SimulationError};
use crate::behavior::Behavior;
use crate::tasks::TaskDistribution;

/// Aggregated evaluation metrics over multiple episodes.
#[derive(Debug, Clone)]
pub struct EvaluationMetrics {
    /// Mean total delivery reward per episode.
    pub mean_reward: f64,
    /// Mean total distance travelled per episode.
    pub mean_distance: f64,
    /// Mean reward minus travel cost per episode.
    pub mean_profit: f64,
    /// Mean number of tasks delivered per episode.
    pub mean_deliveries: f64,
    /// Mean number of offered tasks left behind per episode.
    pub mean_declined: f64,
    /// Number of episodes evaluated.
    pub n_episodes: usize,
    /// Steps per episode.
    pub steps: u64,
}

/// Tracks per-episode statistics during evaluation.
#[derive(Debug, Default)]
struct EpisodeStats {
    reward: f64,
    distance: f64,
    profit: f64,
    deliveries: u32,
    declined: u32,
}

impl EvaluationMetrics {
    /// Evaluates a behavior over multiple episodes and returns aggregated
    /// metrics.
    ///
    /// # Arguments
    ///
    /// * `sim` - The simulation to evaluate in
    /// * `behavior` - The behavior to evaluate
    /// * `n_episodes` - Number of episodes to run
    /// * `steps` - Actions per episode
    pub fn evaluate<D>(
        sim: &mut Simulation<'_, D>,
        behavior: &mut dyn Behavior,
        n_episodes: usize,
        steps: u64,
    ) -> Result<Self, SimulationError>
    where
        D: TaskDistribution + ?Sized,
    {
        let mut all_stats = Vec::with_capacity(n_episodes);

        for episode in 0..n_episodes {
            sim.reset();
            let mut stats = EpisodeStats::default();

            while sim.t < steps {
                let offered = sim.offered().cloned();
                let action = behavior.act(sim.current(), offered.as_ref())?;
                if offered.is_some() && !action.is_pickup() {
                    stats.declined += 1;
                }
                let result = sim.step(action)?;
                stats.reward += result.reward;
                stats.distance += result.distance;
                stats.profit += result.profit;
                if result.delivered {
                    stats.deliveries += 1;
                }
            }

            debug!(
                behavior = behavior.name(),
                episode,
                profit = stats.profit,
                deliveries = stats.deliveries,
                "episode finished"
            );
            all_stats.push(stats);
        }

        let n = all_stats.len().max(1) as f64;
        let mean = |f: fn(&EpisodeStats) -> f64| all_stats.iter().map(f).sum::<f64>() / n;

        Ok(Self {
            mean_reward: mean(|s| s.reward),
            mean_distance: mean(|s| s.distance),
            mean_profit: mean(|s| s.profit),
            mean_deliveries: mean(|s| s.deliveries as f64),
            mean_declined: mean(|s| s.declined as f64),
            n_episodes,
            steps,
        })
    }

    /// Mean profit per unit of distance travelled.
    pub fn profit_per_distance(&self) -> f64 {
        if self.mean_distance > 0.0 {
            self.mean_profit / self.mean_distance
        } else {
            0.0
        }
    }
}

impl fmt::Display for EvaluationMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "=== Evaluation Metrics ({} episodes x {} steps) ===",
            self.n_episodes, self.steps
        )?;
        writeln!(f, "  Mean reward:          {:.2}", self.mean_reward)?;
        writeln!(f, "  Mean distance:        {:.2}", self.mean_distance)?;
        writeln!(f, "  Mean profit:          {:.2}", self.mean_profit)?;
        writeln!(f, "  Mean deliveries:      {:.1}", self.mean_deliveries)?;
        writeln!(f, "  Mean declined:        {:.1}", self.mean_declined)?;
        write!(
            f,
            "  Profit per distance:  {:.3}",
            self.profit_per_distance()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behavior::{RandomBehavior, ReactiveBehavior};
    use crate::mdp::SolverConfig;
    use crate::tasks::TableDistribution;
    use crate::topology::Topology;

    fn network() -> Topology {
        Topology::from_routes(&[
            ("Geneva", "Lausanne", 6.2),
            ("Lausanne", "Bern", 10.1),
            ("Bern", "Zurich", 12.5),
            ("Zurich", "Basel", 8.7),
            ("Basel", "Bern", 9.9),
            ("Lausanne", "Neuchatel", 7.3),
            ("Neuchatel", "Bern", 5.1),
        ])
        .unwrap()
    }

    #[test]
    fn evaluate_completes() {
        let topology = network();
        let table = TableDistribution::uniform(&topology, 0.5, 10.0).unwrap();
        let start = topology.find("Bern").unwrap();
        let mut sim = Simulation::new(&topology, &table, 5.0, start, 42).unwrap();
        let mut behavior = RandomBehavior::new(&topology, 0.85, 42);
        let metrics = EvaluationMetrics::evaluate(&mut sim, &mut behavior, 3, 20).unwrap();
        assert_eq!(metrics.n_episodes, 3);
        assert!(metrics.mean_distance > 0.0);
        let expected_profit = metrics.mean_reward - 5.0 * metrics.mean_distance;
        assert!((metrics.mean_profit - expected_profit).abs() < 1e-6);
    }

    #[test]
    fn reactive_loses_less_than_random_on_unprofitable_tasks() {
        // Every task pays less than it costs to carry.
        let topology = network();
        let table = TableDistribution::uniform(&topology, 0.8, 2.0).unwrap();
        let cost = 5.0;
        let start = topology.find("Lausanne").unwrap();
        let config = SolverConfig {
            cost_per_distance_unit: cost,
            ..SolverConfig::default()
        };

        let mut reactive = ReactiveBehavior::setup(&topology, &table, config).unwrap();
        let mut random = RandomBehavior::new(&topology, 0.85, 7);

        let mut sim = Simulation::new(&topology, &table, cost, start, 7).unwrap();
        let reactive_metrics = EvaluationMetrics::evaluate(&mut sim, &mut reactive, 10, 100).unwrap();
        let mut sim = Simulation::new(&topology, &table, cost, start, 7).unwrap();
        let random_metrics = EvaluationMetrics::evaluate(&mut sim, &mut random, 10, 100).unwrap();

        assert!(reactive_metrics.mean_profit > random_metrics.mean_profit);
    }

    #[test]
    fn zero_episodes_yields_zero_means() {
        let topology = network();
        let table = TableDistribution::new(topology.city_count());
        let start = topology.find("Basel").unwrap();
        let mut sim = Simulation::new(&topology, &table, 1.0, start, 0).unwrap();
        let mut behavior = RandomBehavior::new(&topology, 0.5, 0);
        let metrics = EvaluationMetrics::evaluate(&mut sim, &mut behavior, 0, 10).unwrap();
        assert_eq!(metrics.mean_profit, 0.0);
        assert_eq!(metrics.profit_per_distance(), 0.0);
    }
}
