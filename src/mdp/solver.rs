//! Synchronous value iteration.
//!
//! Each sweep computes, for every state `s = (c, t)` and every candidate next
//! city `n`,
//!
//! ```text
//! Q(s, n) = reward(c, t)·[n == t, t != c]
//!         − distance(c, n) · cost_per_distance_unit
//!         + discount · Σ_t' P(n, t') · V(n, t')
//! ```
//!
//! from the previous sweep's values only, and keeps the first maximizing
//! candidate. Sweeps repeat until the largest change of any state value falls
//! below `epsilon`.

use tracing::{debug, info, warn};

use super::config::SolverConfig;
use super::error::MdpError;
use super::model::TransitionModel;
use super::policy::{PolicyEntry, PolicyTable};
use super::state::{Candidate, State, StateSpace};
use crate::tasks::TaskDistribution;
use crate::topology::Topology;

/// Result of a single Bellman sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct Sweep {
    pub entries: Vec<PolicyEntry>,
    /// Largest absolute value change against the input values.
    pub max_diff: f64,
}

/// Value-iteration solver.
#[derive(Debug, Clone, Default)]
pub struct ValueIteration {
    config: SolverConfig,
}

impl ValueIteration {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Solves the decision process over `space` with tasks drawn from
    /// `oracle`.
    ///
    /// Every entry starts at value `0` with the self-move as best action.
    ///
    /// # Errors
    ///
    /// - configuration errors from [`SolverConfig::validate`]
    /// - oracle errors from [`TransitionModel::capture`]
    /// - `NonConvergence` (carrying the last table) when `max_sweeps` sweeps
    ///   run without the largest change dropping below `epsilon`
    pub fn solve<D>(&self, space: &StateSpace, oracle: &D) -> Result<PolicyTable, MdpError>
    where
        D: TaskDistribution + ?Sized,
    {
        self.config.validate()?;
        let model = TransitionModel::capture(space, oracle, self.config.probability_tolerance)?;

        let mut values = vec![0.0; space.len()];
        let mut sweeps = 0;
        loop {
            let sweep = self.sweep(space, &model, &values);
            sweeps += 1;
            debug!(sweep = sweeps, max_diff = sweep.max_diff, "value iteration sweep");

            if sweep.max_diff < self.config.epsilon {
                info!(
                    sweeps,
                    states = space.len(),
                    "value iteration converged"
                );
                return Ok(PolicyTable::new(space.city_count(), sweep.entries, sweeps));
            }
            if sweeps >= self.config.max_sweeps {
                warn!(
                    sweeps,
                    max_diff = sweep.max_diff,
                    "value iteration hit the sweep limit"
                );
                return Err(MdpError::NonConvergence {
                    sweeps,
                    max_diff: sweep.max_diff,
                    partial: Box::new(PolicyTable::new(
                        space.city_count(),
                        sweep.entries,
                        sweeps,
                    )),
                });
            }
            values = sweep.entries.iter().map(|e| e.value).collect();
        }
    }

    /// Runs one Bellman sweep over every state from `values`.
    ///
    /// `values` must be in state-space layout order; it is never modified.
    pub fn sweep(&self, space: &StateSpace, model: &TransitionModel, values: &[f64]) -> Sweep {
        let arrival = model.expected_arrival_values(values);
        let mut max_diff = 0.0_f64;

        let entries = space
            .states()
            .enumerate()
            .map(|(index, state)| {
                let entry = best_move(
                    state,
                    space.candidates(index),
                    model,
                    &arrival,
                    &self.config,
                );
                let diff = (entry.value - values[index]).abs();
                // NaN never counts as converged
                max_diff = if diff.is_nan() {
                    f64::INFINITY
                } else {
                    max_diff.max(diff)
                };
                entry
            })
            .collect();

        Sweep { entries, max_diff }
    }
}

/// Maximizes `Q(state, ·)` over `candidates`; the first maximal candidate
/// wins.
///
/// The first candidate seeds the result, so the best action is always one of
/// the candidates even when every `Q` is `-inf` or NaN.
fn best_move(
    state: State,
    candidates: &[Candidate],
    model: &TransitionModel,
    arrival: &[f64],
    config: &SolverConfig,
) -> PolicyEntry {
    let (c, t) = (state.current.index(), state.target.index());
    let q = |candidate: &Candidate| {
        let n = candidate.city.index();
        let mut q = config.discount * arrival[n] - candidate.distance * config.cost_per_distance_unit;
        if n == t && t != c {
            q += model.reward(c, t);
        }
        q
    };

    let Some((first, rest)) = candidates.split_first() else {
        return PolicyEntry {
            value: f64::NEG_INFINITY,
            best_action: state.current,
        };
    };
    let mut best = PolicyEntry {
        value: q(first),
        best_action: first.city,
    };
    for candidate in rest {
        let value = q(candidate);
        if value > best.value {
            best = PolicyEntry {
                value,
                best_action: candidate.city,
            };
        }
    }

    best
}

/// Builds the state space of `topology` and solves it with `config`.
pub fn solve<D>(
    topology: &Topology,
    oracle: &D,
    config: SolverConfig,
) -> Result<PolicyTable, MdpError>
where
    D: TaskDistribution + ?Sized,
{
    let space = StateSpace::build(topology)?;
    ValueIteration::new(config).solve(&space, oracle)
}
